// SPDX-License-Identifier: MPL-2.0
//! Core notification data structures.
//!
//! This module defines the `Notification` record and the small value types
//! (`Kind`, `Lifetime`, `Position`, `Message`) it is built from.

use crate::config::defaults::{
    DEFAULT_CUSTOM_DURATION_MS, DEFAULT_ERROR_DURATION_MS, DEFAULT_LOADING_DURATION_MS,
    DEFAULT_PLAIN_DURATION_MS, DEFAULT_SUCCESS_DURATION_MS,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Unique identifier for a notification.
///
/// Callers may pick their own ids (to update a notification later);
/// otherwise [`NotificationId::generate`] hands out `toast-<n>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(Arc<str>);

impl NotificationId {
    /// Creates a new unique notification ID.
    pub fn generate() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(format!("toast-{}", COUNTER.fetch_add(1, Ordering::Relaxed)).into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NotificationId {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl From<String> for NotificationId {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

/// Kind of notification. Determines the default auto-dismiss delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Kind {
    #[default]
    Plain,
    Success,
    Error,
    /// Pending work; never auto-dismisses by default.
    Loading,
    Custom,
}

/// How long a notification stays before it is dismissed automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    After(Duration),
    Infinite,
}

impl Lifetime {
    /// Builds a lifetime from milliseconds, `None` meaning infinite.
    #[must_use]
    pub const fn from_millis(millis: Option<u64>) -> Self {
        match millis {
            Some(ms) => Lifetime::After(Duration::from_millis(ms)),
            None => Lifetime::Infinite,
        }
    }

    #[must_use]
    pub fn as_duration(self) -> Option<Duration> {
        match self {
            Lifetime::After(duration) => Some(duration),
            Lifetime::Infinite => None,
        }
    }
}

/// Default lifetime for each [`Kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindDurations {
    pub plain: Lifetime,
    pub success: Lifetime,
    pub error: Lifetime,
    pub loading: Lifetime,
    pub custom: Lifetime,
}

impl KindDurations {
    #[must_use]
    pub fn get(&self, kind: Kind) -> Lifetime {
        match kind {
            Kind::Plain => self.plain,
            Kind::Success => self.success,
            Kind::Error => self.error,
            Kind::Loading => self.loading,
            Kind::Custom => self.custom,
        }
    }
}

impl Default for KindDurations {
    fn default() -> Self {
        Self {
            plain: Lifetime::from_millis(DEFAULT_PLAIN_DURATION_MS),
            success: Lifetime::from_millis(DEFAULT_SUCCESS_DURATION_MS),
            error: Lifetime::from_millis(DEFAULT_ERROR_DURATION_MS),
            loading: Lifetime::from_millis(DEFAULT_LOADING_DURATION_MS),
            custom: Lifetime::from_millis(DEFAULT_CUSTOM_DURATION_MS),
        }
    }
}

/// Placement hint for the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    TopLeft,
    #[default]
    TopCenter,
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Position {
    /// Returns true for the three top anchors.
    #[must_use]
    pub fn is_top(self) -> bool {
        matches!(
            self,
            Position::TopLeft | Position::TopCenter | Position::TopRight
        )
    }
}

/// Function producing the text of a notification from its current state.
pub type Render = Arc<dyn Fn(&Notification) -> String + Send + Sync>;

/// Notification content, either fixed or computed when it is read.
#[derive(Clone)]
pub enum Message {
    Static(String),
    Computed(Render),
}

impl Message {
    /// Wraps a closure that renders the text from the notification itself.
    pub fn computed<F>(render: F) -> Self
    where
        F: Fn(&Notification) -> String + Send + Sync + 'static,
    {
        Message::Computed(Arc::new(render))
    }

    /// Resolves the message against `notification`.
    #[must_use]
    pub fn resolve(&self, notification: &Notification) -> String {
        match self {
            Message::Static(text) => text.clone(),
            Message::Computed(render) => render(notification),
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Static(text) => f.debug_tuple("Static").field(text).finish(),
            Message::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<&str> for Message {
    fn from(value: &str) -> Self {
        Message::Static(value.to_string())
    }
}

impl From<String> for Message {
    fn from(value: String) -> Self {
        Message::Static(value)
    }
}

/// A notification tracked by the store.
///
/// Fields are only mutated by the store's transition function; everything
/// else reads them through the accessors below.
#[derive(Debug, Clone)]
pub struct Notification {
    pub(crate) id: NotificationId,
    pub(crate) kind: Kind,
    pub(crate) message: Message,
    pub(crate) created_at: Instant,
    pub(crate) visible: bool,
    pub(crate) dismissed: bool,
    pub(crate) pause_duration: Duration,
    pub(crate) duration: Lifetime,
    pub(crate) position: Option<Position>,
    pub(crate) remove_delay: Option<Duration>,
    pub(crate) height: Option<u32>,
}

impl Notification {
    /// Creates a visible notification with a fresh id and the default
    /// lifetime for `kind`.
    pub fn new(kind: Kind, message: impl Into<Message>) -> Self {
        Self {
            id: NotificationId::generate(),
            kind,
            message: message.into(),
            created_at: Instant::now(),
            visible: true,
            dismissed: false,
            pause_duration: Duration::ZERO,
            duration: KindDurations::default().get(kind),
            position: None,
            remove_delay: None,
            height: None,
        }
    }

    pub fn plain(message: impl Into<Message>) -> Self {
        Self::new(Kind::Plain, message)
    }

    pub fn success(message: impl Into<Message>) -> Self {
        Self::new(Kind::Success, message)
    }

    pub fn error(message: impl Into<Message>) -> Self {
        Self::new(Kind::Error, message)
    }

    pub fn loading(message: impl Into<Message>) -> Self {
        Self::new(Kind::Loading, message)
    }

    pub fn custom(message: impl Into<Message>) -> Self {
        Self::new(Kind::Custom, message)
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<NotificationId>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Lifetime) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub fn with_remove_delay(mut self, delay: Duration) -> Self {
        self.remove_delay = Some(delay);
        self
    }

    /// Overrides the creation timestamp (mostly useful for replaying events).
    #[must_use]
    pub fn created_at_instant(mut self, created_at: Instant) -> Self {
        self.created_at = created_at;
        self
    }

    #[must_use]
    pub fn id(&self) -> &NotificationId {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Resolves the message to display now.
    #[must_use]
    pub fn text(&self) -> String {
        self.message.resolve(self)
    }

    #[must_use]
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn dismissed(&self) -> bool {
        self.dismissed
    }

    #[must_use]
    pub fn pause_duration(&self) -> Duration {
        self.pause_duration
    }

    #[must_use]
    pub fn duration(&self) -> Lifetime {
        self.duration
    }

    #[must_use]
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    #[must_use]
    pub fn remove_delay(&self) -> Option<Duration> {
        self.remove_delay
    }

    #[must_use]
    pub fn height(&self) -> Option<u32> {
        self.height
    }

    /// Instant at which the countdown runs out, accounting for time spent
    /// paused. `None` for infinite lifetimes, including durations too long
    /// to be represented as an instant.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.duration.as_duration().and_then(|duration| {
            self.created_at
                .checked_add(duration)?
                .checked_add(self.pause_duration)
        })
    }

    /// Time left before auto-dismiss, saturating at zero.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}
