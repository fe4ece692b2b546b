/// What the host knows when an utterance arrives
///
/// The interpreter never touches storage; the host loads one of these and
/// passes it in.

use crate::db::{Event, Note, Reminder, Task};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub notes: Vec<Note>,
    pub reminders: Vec<Reminder>,
    pub events: Vec<Event>,
}

impl Snapshot {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            ..Self::default()
        }
    }

    pub fn pending_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| !t.completed)
    }
}
