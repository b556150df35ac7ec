// SPDX-License-Identifier: MPL-2.0
//! Notification store state and its transition function.
//!
//! [`reduce`] is the only place notification fields change. It never
//! mutates its input: every call returns a new [`State`], sharing the
//! untouched entries through `Arc` so observers can compare them with
//! [`Arc::ptr_eq`].

use super::notification::{Kind, Lifetime, Message, Notification, NotificationId, Position};
use crate::config::Policy;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Snapshot of every active notification plus the store-wide pause marker.
#[derive(Debug, Clone, Default)]
pub struct State {
    notifications: Vec<Arc<Notification>>,
    paused_at: Option<Instant>,
}

impl State {
    /// Active notifications, newest first.
    #[must_use]
    pub fn notifications(&self) -> &[Arc<Notification>] {
        &self.notifications
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter().map(AsRef::as_ref)
    }

    /// Notifications that are still shown (not dismissed).
    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.iter().filter(|n| n.visible())
    }

    #[must_use]
    pub fn get(&self, id: &NotificationId) -> Option<&Arc<Notification>> {
        self.notifications.iter().find(|n| n.id() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    #[must_use]
    pub fn paused_at(&self) -> Option<Instant> {
        self.paused_at
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }
}

/// Partial update for a notification, matched by id.
///
/// Unset fields keep their current value. When the id is unknown the patch
/// is turned into a new notification (see [`NotificationPatch::into_notification`]).
#[derive(Debug, Clone)]
pub struct NotificationPatch {
    id: NotificationId,
    kind: Option<Kind>,
    message: Option<Message>,
    duration: Option<Lifetime>,
    position: Option<Position>,
    remove_delay: Option<Duration>,
    visible: Option<bool>,
    dismissed: Option<bool>,
    height: Option<u32>,
    restart: bool,
}

impl NotificationPatch {
    pub fn new(id: impl Into<NotificationId>) -> Self {
        Self {
            id: id.into(),
            kind: None,
            message: None,
            duration: None,
            position: None,
            remove_delay: None,
            visible: None,
            dismissed: None,
            height: None,
            restart: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> &NotificationId {
        &self.id
    }

    /// Changes the kind. Unless [`duration`](Self::duration) is also set,
    /// the lifetime switches to the policy default of the new kind.
    #[must_use]
    pub fn kind(mut self, kind: Kind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn duration(mut self, duration: Lifetime) -> Self {
        self.duration = Some(duration);
        self
    }

    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub fn remove_delay(mut self, delay: Duration) -> Self {
        self.remove_delay = Some(delay);
        self
    }

    #[must_use]
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    #[must_use]
    pub fn dismissed(mut self, dismissed: bool) -> Self {
        self.dismissed = Some(dismissed);
        self
    }

    #[must_use]
    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Shows the notification again with a fresh countdown.
    #[must_use]
    pub fn revive(self) -> Self {
        let mut patch = self.visible(true).dismissed(false);
        patch.restart = true;
        patch
    }

    /// Builds the notification an upsert creates when the id is unknown.
    #[must_use]
    pub fn into_notification(self, policy: &Policy, now: Instant) -> Notification {
        let kind = self.kind.unwrap_or_default();
        Notification {
            id: self.id,
            kind,
            message: self.message.unwrap_or_else(|| Message::Static(String::new())),
            created_at: now,
            visible: self.visible.unwrap_or(true),
            dismissed: self.dismissed.unwrap_or(false),
            pause_duration: Duration::ZERO,
            duration: self
                .duration
                .unwrap_or_else(|| policy.durations.get(kind)),
            position: self.position,
            remove_delay: self.remove_delay,
            height: self.height,
        }
    }

    fn apply(self, base: &Notification, policy: &Policy, now: Instant) -> Notification {
        let mut merged = base.clone();
        if let Some(kind) = self.kind {
            if kind != merged.kind && self.duration.is_none() {
                merged.duration = policy.durations.get(kind);
            }
            merged.kind = kind;
        }
        if let Some(message) = self.message {
            merged.message = message;
        }
        if let Some(duration) = self.duration {
            merged.duration = duration;
        }
        if let Some(position) = self.position {
            merged.position = Some(position);
        }
        if let Some(delay) = self.remove_delay {
            merged.remove_delay = Some(delay);
        }
        if let Some(visible) = self.visible {
            merged.visible = visible;
        }
        if let Some(dismissed) = self.dismissed {
            merged.dismissed = dismissed;
        }
        if let Some(height) = self.height {
            merged.height = Some(height);
        }
        if self.restart {
            merged.created_at = now;
            merged.pause_duration = Duration::ZERO;
        }
        merged
    }
}

impl From<Notification> for NotificationPatch {
    /// Every field of `notification` is written, with a fresh countdown.
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            kind: Some(notification.kind),
            message: Some(notification.message),
            duration: Some(notification.duration),
            position: notification.position,
            remove_delay: notification.remove_delay,
            visible: Some(notification.visible),
            dismissed: Some(notification.dismissed),
            height: notification.height,
            restart: true,
        }
    }
}

/// A state transition request.
#[derive(Debug, Clone)]
pub enum Action {
    /// Prepends a notification, evicting the oldest beyond the limit.
    Add(Notification),
    /// Merges into the matching notification, or adds it when absent.
    Update(NotificationPatch),
    /// Hides one notification, or all of them for `None`.
    Dismiss(Option<NotificationId>),
    /// Deletes one notification, or all of them for `None`.
    Remove(Option<NotificationId>),
    StartPause,
    EndPause,
    /// Records the rendered height of a notification.
    SetHeight(NotificationId, u32),
}

impl Action {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Action::Add(_) => "add",
            Action::Update(_) => "update",
            Action::Dismiss(_) => "dismiss",
            Action::Remove(_) => "remove",
            Action::StartPause => "start_pause",
            Action::EndPause => "end_pause",
            Action::SetHeight(..) => "set_height",
        }
    }
}

/// Applies `action` to `state`, returning the next state.
///
/// Total and deterministic for a given `(state, action, policy, now)`;
/// unknown ids are no-ops except for [`Action::Update`], which upserts.
#[must_use]
pub fn reduce(state: &State, action: Action, policy: &Policy, now: Instant) -> State {
    match action {
        Action::Add(notification) => add(state, notification, policy),
        Action::Update(patch) => {
            match state.notifications.iter().position(|n| n.id() == patch.id()) {
                Some(index) => {
                    let mut notifications = state.notifications.clone();
                    notifications[index] =
                        Arc::new(patch.apply(&state.notifications[index], policy, now));
                    State {
                        notifications,
                        paused_at: state.paused_at,
                    }
                }
                None => add(state, patch.into_notification(policy, now), policy),
            }
        }
        Action::Dismiss(target) => map_matching(state, target.as_ref(), |n| {
            if n.dismissed && !n.visible {
                return None;
            }
            let mut dismissed = n.clone();
            dismissed.dismissed = true;
            dismissed.visible = false;
            Some(dismissed)
        }),
        Action::Remove(Some(id)) => State {
            notifications: state
                .notifications
                .iter()
                .filter(|n| *n.id() != id)
                .cloned()
                .collect(),
            paused_at: state.paused_at,
        },
        Action::Remove(None) => State {
            notifications: Vec::new(),
            paused_at: state.paused_at,
        },
        Action::StartPause => State {
            notifications: state.notifications.clone(),
            paused_at: state.paused_at.or(Some(now)),
        },
        Action::EndPause => match state.paused_at {
            Some(paused_at) => {
                let elapsed = now.saturating_duration_since(paused_at);
                let resumed = map_matching(state, None, |n| {
                    let mut resumed = n.clone();
                    resumed.pause_duration = resumed.pause_duration.saturating_add(elapsed);
                    Some(resumed)
                });
                State {
                    paused_at: None,
                    ..resumed
                }
            }
            None => state.clone(),
        },
        Action::SetHeight(id, height) => map_matching(state, Some(&id), |n| {
            if n.height == Some(height) {
                return None;
            }
            let mut measured = n.clone();
            measured.height = Some(height);
            Some(measured)
        }),
    }
}

fn add(state: &State, notification: Notification, policy: &Policy) -> State {
    let limit = policy.limit.value();
    let mut notifications = Vec::with_capacity(limit.min(state.notifications.len() + 1));
    let id = notification.id.clone();
    notifications.push(Arc::new(notification));
    notifications.extend(
        state
            .notifications
            .iter()
            .filter(|n| *n.id() != id)
            .take(limit.saturating_sub(1))
            .cloned(),
    );
    State {
        notifications,
        paused_at: state.paused_at,
    }
}

/// Rebuilds the entries matching `target` (all entries for `None`).
/// `change` returns `None` to keep an entry as is.
fn map_matching<F>(state: &State, target: Option<&NotificationId>, change: F) -> State
where
    F: Fn(&Notification) -> Option<Notification>,
{
    let notifications = state
        .notifications
        .iter()
        .map(|n| {
            if target.is_some_and(|id| n.id() != id) {
                return Arc::clone(n);
            }
            change(n.as_ref()).map_or_else(|| Arc::clone(n), Arc::new)
        })
        .collect();
    State {
        notifications,
        paused_at: state.paused_at,
    }
}
