use chrono::{
  DateTime,
  Utc
};
use tracing::{
  debug,
  info
};

use crate::store::TaskStore;
use crate::task::Task;

/// Reference cadence of the
/// reminder scan.
pub const REMINDER_INTERVAL_MS: u32 =
  30_000;

/// Title shown on every reminder
/// notification; the body is the
/// task text.
pub const REMINDER_TITLE: &str =
  "AI Reminder!";

/// Delivery seam for reminder
/// notifications. The frontend
/// implements this over the browser
/// Notification API; tests record
/// calls instead.
pub trait Notifier {
  /// Best-effort delivery. Returns
  /// whether anything was shown.
  fn notify(
    &self,
    title: &str,
    body: &str
  ) -> bool;
}

/// Ids of tasks eligible for a
/// reminder at `now`: due date
/// passed, still open, not yet
/// notified.
pub fn due_reminder_ids(
  tasks: &[Task],
  now: DateTime<Utc>
) -> Vec<i64> {
  tasks
    .iter()
    .filter(|task| {
      task.reminder_due(now)
    })
    .map(|task| task.id)
    .collect()
}

/// One reminder scan. Each eligible
/// task gets one delivery attempt
/// and is marked notified through
/// the store whether or not
/// delivery succeeded: fire and
/// mark, no retry. Repeating the
/// pass is harmless because the
/// notified flag is checked before
/// acting, which also keeps an
/// overlapping tick from
/// double-notifying.
pub fn run_reminder_pass(
  store: &mut TaskStore,
  now: DateTime<Utc>,
  notifier: &dyn Notifier
) -> usize {
  let due_ids = due_reminder_ids(
    store.tasks(),
    now
  );
  if due_ids.is_empty() {
    return 0;
  }

  let mut fired = 0_usize;
  for id in due_ids {
    let Some(task) = store.get(id)
    else {
      continue;
    };

    let delivered = notifier.notify(
      REMINDER_TITLE,
      &task.text
    );
    if !delivered {
      debug!(
        id,
        "notification delivery \
         unavailable; marking \
         notified anyway"
      );
    }

    store.mark_notified(id);
    fired += 1;
  }

  info!(
    fired,
    "reminder pass completed"
  );
  fired
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;

  use chrono::{
    Duration,
    TimeZone,
    Utc
  };

  use super::{
    Notifier,
    due_reminder_ids,
    run_reminder_pass
  };
  use crate::store::TaskStore;

  struct RecordingNotifier {
    bodies: RefCell<Vec<String>>,
    delivered: bool
  }

  impl RecordingNotifier {
    fn new(delivered: bool) -> Self {
      Self {
        bodies: RefCell::new(vec![]),
        delivered
      }
    }
  }

  impl Notifier for RecordingNotifier {
    fn notify(
      &self,
      _title: &str,
      body: &str
    ) -> bool {
      self
        .bodies
        .borrow_mut()
        .push(body.to_string());
      self.delivered
    }
  }

  #[test]
  fn undelivered_reminders_are_still_marked(
  ) {
    let now = Utc
      .with_ymd_and_hms(
        2026, 3, 1, 9, 0, 0
      )
      .single()
      .expect("valid now");
    let mut store = TaskStore::new();
    let id = store
      .add(
        "water the plants",
        Some(now - Duration::hours(1)),
        now
      )
      .expect("added");

    let notifier =
      RecordingNotifier::new(false);
    let fired = run_reminder_pass(
      &mut store,
      now,
      &notifier
    );

    assert_eq!(fired, 1);
    assert!(
      store
        .get(id)
        .expect("task present")
        .notified
    );
  }

  #[test]
  fn completed_tasks_never_remind() {
    let now = Utc
      .with_ymd_and_hms(
        2026, 3, 1, 9, 0, 0
      )
      .single()
      .expect("valid now");
    let mut store = TaskStore::new();
    let id = store
      .add(
        "ship the release",
        Some(now - Duration::hours(1)),
        now
      )
      .expect("added");
    store.toggle_complete(id);

    assert!(
      due_reminder_ids(
        store.tasks(),
        now
      )
      .is_empty()
    );
  }
}
