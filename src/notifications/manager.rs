// SPDX-License-Identifier: MPL-2.0
//! Notification lifecycle management.
//!
//! The `Manager` owns the store, fans committed snapshots out to subscribers
//! and keeps the auto-dismiss and removal timers in line with the current
//! state. It is a cheap, cloneable handle: every clone drives the same store.
//!
//! Transitions are applied one at a time, in the order they were requested.
//! Calls made from inside a subscriber (or from a timer firing while another
//! transition is being applied) are queued and applied once the current
//! transition has been published, so `snapshot()` right after such a call
//! may not include it yet.

use super::bus::{Bus, Subscription};
use super::layout::LayoutOptions;
use super::notification::{Kind, Lifetime, Message, Notification, NotificationId, Position};
use super::store::{reduce, Action, NotificationPatch, State};
use super::timers::{Schedule, TimerToken, Timers};
use crate::config::Policy;
use crate::error::Result;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio::time::Instant;

/// Per-call overrides for [`Manager::notify`].
#[derive(Debug, Clone, Default)]
pub struct NotifyOptions {
    id: Option<NotificationId>,
    duration: Option<Lifetime>,
    position: Option<Position>,
    remove_delay: Option<Duration>,
}

impl NotifyOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a caller-chosen id. If a notification with this id is already
    /// active it is replaced in place instead of duplicated.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<NotificationId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Lifetime) -> Self {
        self.duration = Some(duration);
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

    fn build(self, kind: Kind, message: Message, policy: &Policy) -> (Notification, bool) {
        let explicit_id = self.id.is_some();
        let mut notification = Notification::new(kind, message)
            .with_duration(self.duration.unwrap_or_else(|| policy.durations.get(kind)));
        if let Some(id) = self.id {
            notification = notification.with_id(id);
        }
        if let Some(position) = self.position {
            notification = notification.with_position(position);
        }
        if let Some(delay) = self.remove_delay {
            notification = notification.with_remove_delay(delay);
        }
        (notification, explicit_id)
    }
}

/// Handle to a notification store.
#[derive(Clone)]
pub struct Manager {
    inner: Arc<Inner>,
}

struct Inner {
    policy: Policy,
    runtime: Handle,
    bus: Bus,
    core: Mutex<Core>,
}

struct Core {
    snapshot: Arc<State>,
    pending: VecDeque<Queued>,
    draining: bool,
    timers: Timers<AbortHandle>,
}

/// An action waiting to be applied. Actions delivered by a timer carry its
/// token and are dropped once that timer has been superseded.
struct Queued {
    action: Action,
    token: Option<TimerToken>,
}

impl From<Action> for Queued {
    fn from(action: Action) -> Self {
        Self {
            action,
            token: None,
        }
    }
}

/// Clears the draining flag if applying a transition unwinds, so later
/// dispatches are not queued forever behind a drain that never finishes.
struct DrainGuard<'a> {
    inner: &'a Inner,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.inner.lock().draining = false;
        }
    }
}

/// Arms timers as tasks on the manager's runtime. Tasks only hold a weak
/// reference, so they never keep a dropped manager alive.
struct TokioScheduler<'a> {
    runtime: &'a Handle,
    target: Weak<Inner>,
}

impl Schedule for TokioScheduler<'_> {
    type Handle = AbortHandle;

    fn schedule(&self, deadline: Instant, token: TimerToken, action: Action) -> AbortHandle {
        let target = self.target.clone();
        self.runtime
            .spawn(async move {
                tokio::time::sleep_until(deadline).await;
                if let Some(inner) = target.upgrade() {
                    inner.enqueue(Queued {
                        action,
                        token: Some(token),
                    });
                }
            })
            .abort_handle()
    }
}

impl Manager {
    /// Creates a manager bound to the tokio runtime of the calling thread.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRuntime`](crate::error::Error::NoRuntime) when
    /// called outside a tokio runtime.
    pub fn new(policy: Policy) -> Result<Self> {
        Ok(Self::with_runtime(policy, Handle::try_current()?))
    }

    /// Creates a manager whose timers run on `runtime`.
    #[must_use]
    pub fn with_runtime(policy: Policy, runtime: Handle) -> Self {
        tracing::debug!(limit = policy.limit.value(), "notification manager created");
        Self {
            inner: Arc::new(Inner {
                policy,
                runtime,
                bus: Bus::default(),
                core: Mutex::new(Core {
                    snapshot: Arc::new(State::default()),
                    pending: VecDeque::new(),
                    draining: false,
                    timers: Timers::new(),
                }),
            }),
        }
    }

    #[must_use]
    pub fn policy(&self) -> &Policy {
        &self.inner.policy
    }

    /// Layout options matching the policy's default position.
    #[must_use]
    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions::from(&self.inner.policy)
    }

    /// Returns the last committed state.
    #[must_use]
    pub fn snapshot(&self) -> Arc<State> {
        Arc::clone(&self.inner.lock().snapshot)
    }

    /// Registers `callback` for every snapshot committed from now on.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Arc<State>) + Send + Sync + 'static,
    {
        self.inner.bus.subscribe(Arc::new(callback))
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.bus.len()
    }

    /// Shows a notification and returns its id.
    ///
    /// The lifetime defaults to the policy's duration for `kind`.
    pub fn notify(
        &self,
        message: impl Into<Message>,
        kind: Kind,
        options: NotifyOptions,
    ) -> NotificationId {
        let (notification, explicit_id) = options.build(kind, message.into(), &self.inner.policy);
        let id = notification.id().clone();
        if explicit_id {
            self.dispatch(Action::Update(NotificationPatch::from(notification)));
        } else {
            self.dispatch(Action::Add(notification));
        }
        id
    }

    pub fn plain(&self, message: impl Into<Message>) -> NotificationId {
        self.notify(message, Kind::Plain, NotifyOptions::default())
    }

    pub fn success(&self, message: impl Into<Message>) -> NotificationId {
        self.notify(message, Kind::Success, NotifyOptions::default())
    }

    pub fn error(&self, message: impl Into<Message>) -> NotificationId {
        self.notify(message, Kind::Error, NotifyOptions::default())
    }

    pub fn loading(&self, message: impl Into<Message>) -> NotificationId {
        self.notify(message, Kind::Loading, NotifyOptions::default())
    }

    pub fn custom(&self, message: impl Into<Message>) -> NotificationId {
        self.notify(message, Kind::Custom, NotifyOptions::default())
    }

    /// Merges `patch` into the matching notification, creating it if absent.
    pub fn update(&self, patch: NotificationPatch) {
        self.dispatch(Action::Update(patch));
    }

    /// Hides one notification, or every notification for `None`. Hidden
    /// notifications are removed after their removal delay.
    pub fn dismiss(&self, id: Option<&NotificationId>) {
        self.dispatch(Action::Dismiss(id.cloned()));
    }

    pub fn dismiss_all(&self) {
        self.dismiss(None);
    }

    /// Deletes one notification, or every notification for `None`, without
    /// waiting for the removal delay.
    pub fn remove(&self, id: Option<&NotificationId>) {
        self.dispatch(Action::Remove(id.cloned()));
    }

    pub fn remove_all(&self) {
        self.remove(None);
    }

    /// Freezes every auto-dismiss countdown until [`Manager::resume`].
    pub fn pause(&self) {
        self.dispatch(Action::StartPause);
    }

    pub fn resume(&self) {
        self.dispatch(Action::EndPause);
    }

    /// Records the rendered height of a notification, used by
    /// [`offset`](super::layout::offset).
    pub fn set_height(&self, id: &NotificationId, height: u32) {
        self.dispatch(Action::SetHeight(id.clone(), height));
    }

    /// Queues `action` and applies it, along with anything queued meanwhile.
    pub fn dispatch(&self, action: Action) {
        self.inner.dispatch(action);
    }
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.inner.lock();
        f.debug_struct("Manager")
            .field("notifications", &core.snapshot.len())
            .field("paused", &core.snapshot.is_paused())
            .field("subscribers", &self.inner.bus.len())
            .field("armed_timers", &core.timers.armed_auto_dismiss())
            .field("pending_removals", &core.timers.pending_removals())
            .finish()
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Core> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dispatch(self: &Arc<Self>, action: Action) {
        self.enqueue(Queued::from(action));
    }

    fn enqueue(self: &Arc<Self>, queued: Queued) {
        {
            let mut core = self.lock();
            core.pending.push_back(queued);
            if core.draining {
                return;
            }
            core.draining = true;
        }
        self.drain();
    }

    fn drain(self: &Arc<Self>) {
        let _guard = DrainGuard { inner: self };
        loop {
            let snapshot = {
                let mut core = self.lock();
                let action = loop {
                    let Some(queued) = core.pending.pop_front() else {
                        core.draining = false;
                        return;
                    };
                    match queued.token {
                        Some(token) if !core.timers.is_armed(token) => {
                            tracing::trace!(
                                action = queued.action.name(),
                                "dropping superseded timer"
                            );
                        }
                        _ => break queued.action,
                    }
                };
                let name = action.name();
                let next = Arc::new(reduce(
                    &core.snapshot,
                    action,
                    &self.policy,
                    Instant::now(),
                ));
                core.snapshot = Arc::clone(&next);
                tracing::debug!(
                    action = name,
                    len = next.len(),
                    paused = next.is_paused(),
                    "transition applied"
                );
                next
            };

            let failures = self.bus.publish(&snapshot);
            if failures > 0 {
                tracing::debug!(failures, "fan-out finished with failing subscribers");
            }

            let mut core = self.lock();
            let scheduler = TokioScheduler {
                runtime: &self.runtime,
                target: Arc::downgrade(self),
            };
            let current = Arc::clone(&core.snapshot);
            let expired = core
                .timers
                .sync(&current, &self.policy, Instant::now(), &scheduler);
            core.pending.extend(
                expired
                    .into_iter()
                    .map(|id| Queued::from(Action::Dismiss(Some(id)))),
            );
        }
    }
}
