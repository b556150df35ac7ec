// SPDX-License-Identifier: MPL-2.0
//! Auto-dismiss and delayed-removal timers.
//!
//! Auto-dismiss timers are recomputed from scratch after every transition:
//! all armed timers are cancelled, then one timer per counting-down
//! notification is armed for its remaining time. Nothing is armed while the
//! store is paused, so resuming simply re-arms with the accumulated pause
//! duration folded in.
//!
//! Removal timers live in a side table keyed by id and survive
//! recomputation; they are cancelled when their notification is revived or
//! disappears.
//!
//! Every armed timer carries a [`TimerToken`]. Cancelling cannot stop a
//! task that already woke up, so the action a timer delivers is only
//! applied while its token is still armed here.

use super::notification::NotificationId;
use super::store::{Action, State};
use crate::config::Policy;
use std::collections::HashMap;
use tokio::task::AbortHandle;
use tokio::time::Instant;

/// A scheduled timer that can be cancelled.
pub trait Cancel {
    fn cancel(&self);
}

impl Cancel for AbortHandle {
    fn cancel(&self) {
        self.abort();
    }
}

/// Identifies one arming of a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// Arms a timer that delivers `action`, tagged with `token`, at `deadline`.
pub trait Schedule {
    type Handle: Cancel;

    fn schedule(&self, deadline: Instant, token: TimerToken, action: Action) -> Self::Handle;
}

struct Armed<H> {
    token: TimerToken,
    handle: H,
}

/// Timer side tables owned by the manager.
pub(crate) struct Timers<H: Cancel> {
    next_token: u64,
    auto_dismiss: Vec<Armed<H>>,
    removals: HashMap<NotificationId, Armed<H>>,
}

impl<H: Cancel> Timers<H> {
    pub(crate) fn new() -> Self {
        Self {
            next_token: 0,
            auto_dismiss: Vec::new(),
            removals: HashMap::new(),
        }
    }

    fn arm<S>(&mut self, scheduler: &S, deadline: Instant, action: Action) -> Armed<H>
    where
        S: Schedule<Handle = H>,
    {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        Armed {
            token,
            handle: scheduler.schedule(deadline, token, action),
        }
    }

    /// Re-arms timers against the committed `state`.
    ///
    /// Returns the ids whose countdown already ran out; the caller dismisses
    /// them right away.
    pub(crate) fn sync<S>(
        &mut self,
        state: &State,
        policy: &Policy,
        now: Instant,
        scheduler: &S,
    ) -> Vec<NotificationId>
    where
        S: Schedule<Handle = H>,
    {
        for armed in self.auto_dismiss.drain(..) {
            armed.handle.cancel();
        }

        let mut expired = Vec::new();
        if !state.is_paused() {
            for notification in state.iter().filter(|n| n.visible() && !n.dismissed()) {
                let Some(deadline) = notification.deadline() else {
                    continue;
                };
                if deadline <= now {
                    expired.push(notification.id().clone());
                    continue;
                }
                tracing::trace!(
                    id = %notification.id(),
                    remaining_ms = deadline.saturating_duration_since(now).as_millis() as u64,
                    "arming auto-dismiss"
                );
                let action = Action::Dismiss(Some(notification.id().clone()));
                let armed = self.arm(scheduler, deadline, action);
                self.auto_dismiss.push(armed);
            }
        }

        self.removals.retain(|id, armed| {
            let pending = state.get(id).is_some_and(|n| n.dismissed());
            if !pending {
                armed.handle.cancel();
            }
            pending
        });

        for notification in state.iter().filter(|n| n.dismissed()) {
            if self.removals.contains_key(notification.id()) {
                continue;
            }
            let delay = notification.remove_delay().unwrap_or(policy.remove_delay);
            let Some(deadline) = now.checked_add(delay) else {
                tracing::trace!(id = %notification.id(), "removal delay out of range, keeping");
                continue;
            };
            tracing::trace!(
                id = %notification.id(),
                delay_ms = delay.as_millis() as u64,
                "arming removal"
            );
            let action = Action::Remove(Some(notification.id().clone()));
            let armed = self.arm(scheduler, deadline, action);
            self.removals.insert(notification.id().clone(), armed);
        }

        expired
    }

    /// Returns true while the timer armed with `token` is still wanted.
    pub(crate) fn is_armed(&self, token: TimerToken) -> bool {
        self.auto_dismiss.iter().any(|armed| armed.token == token)
            || self.removals.values().any(|armed| armed.token == token)
    }

    pub(crate) fn removal_token(&self, id: &NotificationId) -> Option<TimerToken> {
        self.removals.get(id).map(|armed| armed.token)
    }

    pub(crate) fn armed_auto_dismiss(&self) -> usize {
        self.auto_dismiss.len()
    }

    pub(crate) fn pending_removals(&self) -> usize {
        self.removals.len()
    }

    pub(crate) fn cancel_all(&mut self) {
        for armed in self.auto_dismiss.drain(..) {
            armed.handle.cancel();
        }
        for (_, armed) in self.removals.drain() {
            armed.handle.cancel();
        }
    }
}

impl<H: Cancel> Drop for Timers<H> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
