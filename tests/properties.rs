// SPDX-License-Identifier: MPL-2.0
//! Properties of the transition function over arbitrary inputs.

use proptest::prelude::*;
use std::time::Duration;
use tokio::time::Instant;
use toastbox::config::Policy;
use toastbox::notifications::{
    reduce, Action, Kind, Lifetime, Notification, NotificationPatch, State,
};

fn arb_kind() -> impl Strategy<Value = Kind> {
    prop_oneof![
        Just(Kind::Plain),
        Just(Kind::Success),
        Just(Kind::Error),
        Just(Kind::Loading),
        Just(Kind::Custom),
    ]
}

fn seeded(count: usize, policy: &Policy, now: Instant) -> State {
    (0..count).fold(State::default(), |state, i| {
        reduce(
            &state,
            Action::Add(Notification::plain("seed").with_id(format!("seed-{i}"))),
            policy,
            now,
        )
    })
}

fn ids(state: &State) -> Vec<String> {
    state.iter().map(|n| n.id().to_string()).collect()
}

proptest! {
    #[test]
    fn prop_adds_respect_bound_and_order(
        limit in 1usize..=30,
        kinds in prop::collection::vec(arb_kind(), 0..60),
    ) {
        let policy = Policy::default().with_limit(limit);
        let now = Instant::now();
        let mut state = State::default();
        let mut last = None;

        for (i, kind) in kinds.iter().enumerate() {
            let id = format!("n{i}");
            state = reduce(
                &state,
                Action::Add(Notification::new(*kind, "x").with_id(id.clone())),
                &policy,
                now,
            );
            prop_assert!(state.len() <= limit);
            prop_assert_eq!(state.iter().next().map(|n| n.id().to_string()), Some(id.clone()));
            last = Some(id);
        }

        prop_assert_eq!(state.len(), kinds.len().min(limit));
        prop_assert_eq!(state.iter().next().map(|n| n.id().to_string()), last);
    }

    #[test]
    fn prop_update_of_unknown_id_equals_add(
        existing in 0usize..25,
        kind in arb_kind(),
        text in "[a-z ]{0,16}",
    ) {
        let policy = Policy::default();
        let now = Instant::now();
        let base = seeded(existing, &policy, now);
        let patch = NotificationPatch::new("ghost").kind(kind).message(text.clone());

        let upserted = reduce(&base, Action::Update(patch.clone()), &policy, now);
        let added = reduce(&base, Action::Add(patch.into_notification(&policy, now)), &policy, now);

        prop_assert_eq!(ids(&upserted), ids(&added));
        let ghost = upserted.iter().next().expect("upserted entry is newest");
        prop_assert_eq!(ghost.kind(), kind);
        prop_assert_eq!(ghost.text(), text);
        prop_assert_eq!(ghost.duration(), policy.durations.get(kind));
    }

    #[test]
    fn prop_dismiss_then_remove_equals_remove(count in 1usize..20, pick in any::<prop::sample::Index>()) {
        let policy = Policy::default();
        let now = Instant::now();
        let base = seeded(count, &policy, now);
        let target = base.notifications()[pick.index(count)].id().clone();

        let dismissed = reduce(&base, Action::Dismiss(Some(target.clone())), &policy, now);
        let both = reduce(&dismissed, Action::Remove(Some(target.clone())), &policy, now);
        let only = reduce(&base, Action::Remove(Some(target)), &policy, now);

        prop_assert_eq!(ids(&both), ids(&only));
        prop_assert!(both.iter().all(|n| !n.dismissed()));
    }

    #[test]
    fn prop_pause_preserves_remaining_time(
        duration_ms in 1u64..10_000,
        elapsed_ratio in 0.0f64..1.0,
        paused_ms in 0u64..100_000,
    ) {
        let policy = Policy::default();
        let start = Instant::now();
        let elapsed = Duration::from_millis((duration_ms as f64 * elapsed_ratio) as u64);
        let notification = Notification::plain("countdown")
            .with_duration(Lifetime::After(Duration::from_millis(duration_ms)))
            .created_at_instant(start);
        let state = reduce(&State::default(), Action::Add(notification), &policy, start);

        let pause_at = start + elapsed;
        let resume_at = pause_at + Duration::from_millis(paused_ms);
        let before = state.iter().next().and_then(|n| n.remaining(pause_at));

        let state = reduce(&state, Action::StartPause, &policy, pause_at);
        let state = reduce(&state, Action::EndPause, &policy, resume_at);
        let after = state.iter().next().and_then(|n| n.remaining(resume_at));

        prop_assert_eq!(before, after);
        prop_assert_eq!(
            state.iter().next().map(|n| n.pause_duration()),
            Some(Duration::from_millis(paused_ms))
        );
    }
}
