// SPDX-License-Identifier: MPL-2.0
//! Toast notification lifecycle.
//!
//! Notifications are short messages that appear, count down, get dismissed
//! and are finally removed. This module keeps that lifecycle consistent
//! without rendering anything: a renderer subscribes to the [`Manager`] and
//! draws whatever snapshot it receives.
//!
//! # Components
//!
//! - [`Notification`] - a single record with its kind, message and timing
//! - [`reduce`] - the pure transition function over [`State`]
//! - [`Manager`] - cloneable handle dispatching transitions, publishing
//!   snapshots and driving timers
//! - [`offset`] - stacking offsets derived from a snapshot
//!
//! # Usage
//!
//! ```no_run
//! use toastbox::config::Policy;
//! use toastbox::notifications::{Manager, PromiseMessages};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = Manager::new(Policy::default())?;
//! let _subscription = manager.subscribe(|state| {
//!     for notification in state.visible() {
//!         println!("{}", notification.text());
//!     }
//! });
//!
//! manager.success("Saved");
//! let bytes = manager
//!     .promise(
//!         async { Ok::<_, std::io::Error>(42) },
//!         PromiseMessages::new("Uploading", "Uploaded", "Upload failed"),
//!     )
//!     .await?;
//! # let _ = bytes;
//! # Ok(())
//! # }
//! ```
//!
//! # Lifecycle
//!
//! - Auto-dismiss: plain, error and custom after 4s, success after 2s,
//!   loading never (all configurable through [`Policy`](crate::config::Policy))
//! - Dismissed notifications are removed after 1s
//! - At most 20 notifications are kept, oldest dropped first
//! - `pause()` freezes every countdown until `resume()`

mod bus;
mod layout;
mod manager;
mod notification;
mod promise;
mod store;
mod timers;

pub use bus::{Callback, Subscription};
pub use layout::{offset, LayoutOptions};
pub use manager::{Manager, NotifyOptions};
pub use notification::{
    Kind, KindDurations, Lifetime, Message, Notification, NotificationId, Position, Render,
};
pub use promise::{Outcome, PromiseMessages};
pub use store::{reduce, Action, NotificationPatch, State};
pub use timers::{Cancel, Schedule, TimerToken};
