use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::task::Task;

/// In-memory task store. Single owner of all task records for the
/// lifetime of the page load; every mutation rebuilds the backing
/// collection so observers comparing snapshots always see a fresh
/// value. That replace-don't-patch behavior is the reactivity
/// contract the frontend renders against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<Task>,
    last_id: i64,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the demo tasks shown on first paint.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let mut store = Self::new();
        let _ = store.add("Draft Q3 marketing report", None, now);
        let _ = store.add(
            "Schedule weekly project sync",
            Some(now + chrono::Duration::days(2)),
            now,
        );
        let groceries = store.add("Buy groceries for the week", None, now);
        if let Some(id) = groceries {
            store.toggle_complete(id);
        }
        store
    }

    /// Ids derive from the creation timestamp in milliseconds. Two
    /// adds inside the same millisecond would collide, so the id is
    /// bumped past the last one issued.
    fn next_id(&mut self, now: DateTime<Utc>) -> i64 {
        let candidate = now.timestamp_millis();
        let id = if candidate > self.last_id {
            candidate
        } else {
            self.last_id + 1
        };
        self.last_id = id;
        id
    }

    /// Add a task to the front of the collection. Blank trimmed text
    /// is a silent no-op returning `None`; otherwise the new task's
    /// id is returned. Clearing the input fields that fed this call
    /// stays with the caller.
    #[tracing::instrument(skip(self, text, now))]
    pub fn add(
        &mut self,
        text: &str,
        due: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Option<i64> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            debug!("ignoring add with blank text");
            return None;
        }

        let id = self.next_id(now);
        let task = Task::new(id, trimmed.to_string(), due);

        let mut next = Vec::with_capacity(self.tasks.len() + 1);
        next.push(task);
        next.extend(self.tasks.iter().cloned());
        self.tasks = next;

        info!(id, due = ?due, count = self.tasks.len(), "task added");
        Some(id)
    }

    /// Remove the task with the given id; no-op when absent.
    #[tracing::instrument(skip(self))]
    pub fn delete(&mut self, id: i64) {
        let before = self.tasks.len();
        self.tasks = self
            .tasks
            .iter()
            .filter(|task| task.id != id)
            .cloned()
            .collect();
        if self.tasks.len() != before {
            info!(id, count = self.tasks.len(), "task deleted");
        }
    }

    /// Flip the completion flag; no-op when absent.
    #[tracing::instrument(skip(self))]
    pub fn toggle_complete(&mut self, id: i64) {
        self.tasks = self
            .tasks
            .iter()
            .map(|task| {
                if task.id == id {
                    let mut next = task.clone();
                    next.completed = !next.completed;
                    debug!(id, completed = next.completed, "toggled completion");
                    next
                } else {
                    task.clone()
                }
            })
            .collect();
    }

    /// Begin editing one task. Every other task's editing flag is
    /// cleared in the same pass, so at most one task is ever editing.
    #[tracing::instrument(skip(self))]
    pub fn start_editing(&mut self, id: i64) {
        self.tasks = self
            .tasks
            .iter()
            .map(|task| {
                let mut next = task.clone();
                next.editing = task.id == id;
                next
            })
            .collect();
    }

    /// Store the trimmed replacement text and leave editing mode. A
    /// blank trimmed edit keeps the existing text; the add path
    /// already refuses blank tasks and saving must not create one.
    #[tracing::instrument(skip(self, new_text))]
    pub fn save_edit(&mut self, id: i64, new_text: &str) {
        let trimmed = new_text.trim().to_string();
        self.tasks = self
            .tasks
            .iter()
            .map(|task| {
                if task.id == id {
                    let mut next = task.clone();
                    if trimmed.is_empty() {
                        debug!(id, "rejecting blank edit; keeping previous text");
                    } else {
                        next.text = trimmed.clone();
                    }
                    next.editing = false;
                    next
                } else {
                    task.clone()
                }
            })
            .collect();
    }

    /// Leave editing mode without touching the text.
    #[tracing::instrument(skip(self))]
    pub fn cancel_edit(&mut self, id: i64) {
        self.tasks = self
            .tasks
            .iter()
            .map(|task| {
                if task.id == id {
                    let mut next = task.clone();
                    next.editing = false;
                    next
                } else {
                    task.clone()
                }
            })
            .collect();
    }

    /// Mark a task as having had its reminder fired. Called by the
    /// reminder pass, never by the frontend directly.
    #[tracing::instrument(skip(self))]
    pub fn mark_notified(&mut self, id: i64) {
        self.tasks = self
            .tasks
            .iter()
            .map(|task| {
                if task.id == id {
                    let mut next = task.clone();
                    next.notified = true;
                    next
                } else {
                    task.clone()
                }
            })
            .collect();
    }

    /// Freshly computed display snapshot: open tasks before completed
    /// ones, dated tasks before undated within each group, due dates
    /// ascending. The sort is stable, so two undated tasks keep their
    /// collection order (newest first, since `add` prepends).
    pub fn sorted_view(&self) -> Vec<Task> {
        let mut view = self.tasks.clone();
        view.sort_by(|a, b| {
            match a.completed.cmp(&b.completed) {
                Ordering::Equal => {}
                other => return other,
            }
            match (a.due, b.due) {
                (Some(a_due), Some(b_due)) => a_due.cmp(&b_due),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        });
        view
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
