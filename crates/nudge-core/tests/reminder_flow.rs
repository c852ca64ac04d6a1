use std::cell::RefCell;

use chrono::{DateTime, Duration, TimeZone, Utc};
use nudge_core::reminder::{Notifier, REMINDER_TITLE, run_reminder_pass};
use nudge_core::store::TaskStore;

struct RecordingNotifier {
    calls: RefCell<Vec<(String, String)>>,
}

impl RecordingNotifier {
    fn new() -> Self {
        Self {
            calls: RefCell::new(vec![]),
        }
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, body: &str) -> bool {
        self.calls
            .borrow_mut()
            .push((title.to_string(), body.to_string()));
        true
    }
}

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .expect("valid now")
}

#[test]
fn past_due_tasks_notify_and_future_ones_wait() {
    let now = fixed_now();
    let mut store = TaskStore::new();
    let overdue = store
        .add("due yesterday", Some(now - Duration::days(1)), now)
        .expect("added");
    let upcoming = store
        .add("due tomorrow", Some(now + Duration::days(1)), now)
        .expect("added");

    let notifier = RecordingNotifier::new();
    let fired = run_reminder_pass(&mut store, now, &notifier);

    assert_eq!(fired, 1);
    assert!(store.get(overdue).expect("present").notified);
    assert!(!store.get(upcoming).expect("present").notified);

    let calls = notifier.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, REMINDER_TITLE);
    assert_eq!(calls[0].1, "due yesterday");
}

#[test]
fn repeated_passes_notify_exactly_once() {
    let now = fixed_now();
    let mut store = TaskStore::new();
    store
        .add("nag me once", Some(now - Duration::hours(2)), now)
        .expect("added");

    let notifier = RecordingNotifier::new();
    run_reminder_pass(&mut store, now, &notifier);
    run_reminder_pass(&mut store, now, &notifier);
    run_reminder_pass(&mut store, now + Duration::minutes(5), &notifier);

    assert_eq!(notifier.calls().len(), 1);
}

#[test]
fn tasks_without_due_dates_never_notify() {
    let now = fixed_now();
    let mut store = TaskStore::new();
    store.add("no deadline", None, now).expect("added");

    let notifier = RecordingNotifier::new();
    let fired = run_reminder_pass(&mut store, now + Duration::days(365), &notifier);

    assert_eq!(fired, 0);
    assert!(notifier.calls().is_empty());
}

#[test]
fn task_due_exactly_now_notifies() {
    let now = fixed_now();
    let mut store = TaskStore::new();
    let id = store.add("on the dot", Some(now), now).expect("added");

    let notifier = RecordingNotifier::new();
    let fired = run_reminder_pass(&mut store, now, &notifier);

    assert_eq!(fired, 1);
    assert!(store.get(id).expect("present").notified);
}

#[test]
fn several_tasks_due_in_one_tick_each_notify_once() {
    let now = fixed_now();
    let mut store = TaskStore::new();
    for i in 1..=3 {
        store
            .add(
                &format!("overdue {i}"),
                Some(now - Duration::minutes(i)),
                now,
            )
            .expect("added");
    }

    let notifier = RecordingNotifier::new();
    let fired = run_reminder_pass(&mut store, now, &notifier);

    assert_eq!(fired, 3);
    assert_eq!(notifier.calls().len(), 3);
    assert!(store.tasks().iter().all(|task| task.notified));
}

#[test]
fn completing_a_task_after_notification_does_not_rearm_it() {
    let now = fixed_now();
    let mut store = TaskStore::new();
    let id = store
        .add("one shot", Some(now - Duration::hours(1)), now)
        .expect("added");

    let notifier = RecordingNotifier::new();
    run_reminder_pass(&mut store, now, &notifier);

    store.toggle_complete(id);
    store.toggle_complete(id);
    run_reminder_pass(&mut store, now + Duration::hours(1), &notifier);

    assert_eq!(notifier.calls().len(), 1);
}
