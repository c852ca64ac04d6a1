use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single to-do entry. The store owns every instance; everything
/// handed out elsewhere is a snapshot clone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: i64,

    pub text: String,

    #[serde(default)]
    pub completed: bool,

    /// Transient UI state. At most one task in a store has this set.
    #[serde(default)]
    pub editing: bool,

    #[serde(default)]
    pub due: Option<DateTime<Utc>>,

    /// One-way flag: set when a reminder has fired for this task,
    /// never cleared afterwards.
    #[serde(default)]
    pub notified: bool,
}

impl Task {
    pub fn new(id: i64, text: String, due: Option<DateTime<Utc>>) -> Self {
        Self {
            id,
            text,
            completed: false,
            editing: false,
            due,
            notified: false,
        }
    }

    /// Eligible for a reminder at `now`: has a due date that has
    /// passed, is still open, and has not been notified yet.
    pub fn reminder_due(&self, now: DateTime<Utc>) -> bool {
        self.due.map(|due| due <= now).unwrap_or(false) && !self.completed && !self.notified
    }
}
