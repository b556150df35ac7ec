// SPDX-License-Identifier: MPL-2.0
//! `toastbox` keeps the lifecycle of toast notifications: creation, timed
//! auto-dismiss, pause and resume, delayed removal and promise-driven
//! loading/success/error transitions.
//!
//! It renders nothing. A UI layer subscribes to a [`Manager`] and draws the
//! snapshots it receives.

#![doc(html_root_url = "https://docs.rs/toastbox/0.1.0")]

pub mod config;
pub mod domain;
pub mod error;
pub mod notifications;

pub use config::{Config, Policy};
pub use error::{Error, Result};
pub use notifications::{Kind, Manager, NotificationId, NotifyOptions, PromiseMessages};
