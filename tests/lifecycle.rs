// SPDX-License-Identifier: MPL-2.0
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;
use toastbox::config::Policy;
use toastbox::notifications::{Kind, Manager, NotificationPatch, NotifyOptions, State};
use toastbox::Error;

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn manager() -> Manager {
    Manager::new(Policy::default()).expect("tokio runtime is running")
}

#[tokio::test(start_paused = true)]
async fn success_is_dismissed_then_removed() {
    let manager = manager();
    let id = manager.success("Saved");

    sleep(ms(1999)).await;
    assert!(manager.snapshot().get(&id).is_some_and(|n| n.visible()));

    sleep(ms(2)).await;
    let snapshot = manager.snapshot();
    let saved = snapshot.get(&id).expect("still present during removal delay");
    assert!(saved.dismissed());
    assert!(!saved.visible());

    sleep(ms(997)).await;
    assert!(manager.snapshot().get(&id).is_some());

    sleep(ms(3)).await;
    assert!(manager.snapshot().get(&id).is_none());
}

#[tokio::test(start_paused = true)]
async fn queue_keeps_the_most_recent_twenty() {
    let manager = manager();
    let ids: Vec<_> = (0..25).map(|i| manager.plain(format!("message {i}"))).collect();

    let snapshot = manager.snapshot();
    assert_eq!(snapshot.len(), 20);
    let kept: Vec<_> = snapshot.iter().map(|n| n.id().clone()).collect();
    let expected: Vec<_> = ids.iter().rev().take(20).cloned().collect();
    assert_eq!(kept, expected);
}

#[tokio::test(start_paused = true)]
async fn dismiss_all_hides_without_removing() {
    let manager = manager();
    manager.plain("one");
    manager.error("two");
    manager.loading("three");

    manager.dismiss_all();

    let snapshot = manager.snapshot();
    assert_eq!(snapshot.len(), 3);
    assert!(snapshot.iter().all(|n| n.dismissed() && !n.visible()));

    sleep(ms(1001)).await;
    assert!(manager.snapshot().is_empty());
}

#[tokio::test(start_paused = true)]
async fn remove_skips_the_removal_delay() {
    let manager = manager();
    let id = manager.loading("Working");

    manager.remove(Some(&id));
    assert!(manager.snapshot().is_empty());

    sleep(ms(5000)).await;
    assert!(manager.snapshot().is_empty());
}

#[tokio::test(start_paused = true)]
async fn loading_never_dismisses_itself() {
    let manager = manager();
    let id = manager.loading("Working");

    sleep(Duration::from_secs(60)).await;
    assert!(manager.snapshot().get(&id).is_some_and(|n| n.visible()));
}

#[tokio::test(start_paused = true)]
async fn pause_freezes_the_countdown() {
    let manager = manager();
    let id = manager.success("Saved");

    sleep(ms(500)).await;
    manager.pause();
    sleep(ms(5000)).await;
    assert!(
        manager.snapshot().get(&id).is_some_and(|n| n.visible()),
        "nothing is dismissed while paused"
    );

    manager.resume();
    sleep(ms(1499)).await;
    assert!(manager.snapshot().get(&id).is_some_and(|n| n.visible()));

    sleep(ms(2)).await;
    assert!(manager.snapshot().get(&id).is_some_and(|n| n.dismissed()));
}

#[tokio::test(start_paused = true)]
async fn pause_does_not_delay_removal_of_dismissed_notifications() {
    let manager = manager();
    let id = manager.plain("bye");
    manager.dismiss(Some(&id));
    manager.pause();

    sleep(ms(1001)).await;
    assert!(manager.snapshot().is_empty());
    assert!(manager.snapshot().is_paused());
}

#[tokio::test(start_paused = true)]
async fn reviving_cancels_pending_removal() {
    let manager = manager();
    let id = manager.notify("Syncing", Kind::Plain, NotifyOptions::new().with_id("sync"));
    manager.dismiss(Some(&id));

    sleep(ms(500)).await;
    manager.update(NotificationPatch::new("sync").revive());

    sleep(ms(1000)).await;
    let snapshot = manager.snapshot();
    let sync = snapshot.get(&id).expect("revived notification is kept");
    assert!(sync.visible());
    assert!(!sync.dismissed());

    // The countdown restarted at 500ms.
    sleep(ms(3001)).await;
    assert!(manager.snapshot().get(&id).is_some_and(|n| n.dismissed()));
}

#[tokio::test(start_paused = true)]
async fn dismissing_twice_arms_a_single_removal() {
    let manager = manager();
    let id = manager.plain("once");
    manager.dismiss(Some(&id));

    sleep(ms(600)).await;
    manager.dismiss(Some(&id));

    sleep(ms(401)).await;
    assert!(manager.snapshot().is_empty(), "removal counts from the first dismissal");
}

#[tokio::test(start_paused = true)]
async fn reentrant_dispatch_is_applied_after_the_current_transition() {
    let manager = manager();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    let reentrant = manager.clone();
    let subscription = manager.subscribe(move |state: &Arc<State>| {
        let ids: Vec<String> = state.iter().map(|n| n.id().to_string()).collect();
        let first_trigger = ids == ["trigger"];
        sink.lock().unwrap().push(ids);
        if first_trigger {
            reentrant.notify("follow", Kind::Plain, NotifyOptions::new().with_id("follow"));
        }
    });

    manager.notify("trigger", Kind::Plain, NotifyOptions::new().with_id("trigger"));

    assert_eq!(
        *seen.lock().unwrap(),
        vec![vec!["trigger".to_string()], vec!["follow".into(), "trigger".into()]]
    );
    assert_eq!(manager.snapshot().len(), 2);
    subscription.unsubscribe();
}

#[tokio::test(start_paused = true)]
async fn panicking_subscriber_does_not_block_others() {
    let manager = manager();
    let received = Arc::new(Mutex::new(0_usize));

    let _bad = manager.subscribe(|_: &Arc<State>| panic!("renderer crashed"));
    let sink = Arc::clone(&received);
    let _good = manager.subscribe(move |_: &Arc<State>| *sink.lock().unwrap() += 1);

    manager.plain("one");
    manager.plain("two");

    assert_eq!(*received.lock().unwrap(), 2);
    assert_eq!(manager.snapshot().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn dropped_subscription_stops_receiving() {
    let manager = manager();
    let received = Arc::new(Mutex::new(0_usize));
    let sink = Arc::clone(&received);

    let subscription = manager.subscribe(move |_: &Arc<State>| *sink.lock().unwrap() += 1);
    manager.plain("seen");
    drop(subscription);
    manager.plain("unseen");

    assert_eq!(*received.lock().unwrap(), 1);
    assert_eq!(manager.subscriber_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn late_timers_after_removal_are_harmless() {
    let manager = manager();
    let first = manager.success("first");
    manager.dismiss(Some(&first));
    manager.remove(Some(&first));
    let second = manager.error("second");

    sleep(ms(3000)).await;
    let snapshot = manager.snapshot();
    assert!(snapshot.get(&first).is_none());
    assert!(snapshot.get(&second).is_some_and(|n| n.visible()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_callers_lose_no_transitions() {
    let manager = Manager::new(Policy::default().with_limit(100)).expect("runtime");

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let manager = manager.clone();
            std::thread::spawn(move || {
                for i in 0..10 {
                    manager.notify(
                        format!("{worker}/{i}"),
                        Kind::Loading,
                        NotifyOptions::new().with_id(format!("w{worker}-{i}")),
                    );
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().expect("worker thread");
    }

    assert_eq!(manager.snapshot().len(), 40);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn revive_racing_a_firing_removal_keeps_the_notification() {
    let manager = manager();

    for round in 0..100u64 {
        let options = NotifyOptions::new()
            .with_id(format!("race-{round}"))
            .with_remove_delay(ms(2));
        let id = manager.notify("Racing", Kind::Loading, options);
        manager.dismiss(Some(&id));

        // Land the revive around the moment the removal fires.
        std::thread::sleep(Duration::from_micros(1_000 + (round % 10) * 200));
        manager.update(NotificationPatch::new(id.clone()).revive());

        sleep(ms(10)).await;
        let snapshot = manager.snapshot();
        let revived = snapshot.get(&id).expect("revived notification survives");
        assert!(revived.visible(), "round {round}");
        assert!(!revived.dismissed(), "round {round}");
    }
}

#[test]
fn manager_requires_a_runtime() {
    assert!(matches!(Manager::new(Policy::default()), Err(Error::NoRuntime)));
}
