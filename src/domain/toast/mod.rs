// SPDX-License-Identifier: MPL-2.0
//! Notification queue domain types.
//!
//! - [`QueueLimit`]: How many notifications the store keeps

mod newtypes;

pub use newtypes::{queue_limit_bounds, QueueLimit};
