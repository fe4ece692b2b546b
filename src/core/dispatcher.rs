// Applies interpreted commands to the store
//
// The interpreter only describes what should happen. This is where drafts
// become rows and queries become lists.

use crate::core::analytics::{Period, ProductivityReport};
use crate::db::{
    Database, Event, EventInput, NoteInput, Reminder, ReminderInput, Task, TaskInput,
};
use crate::error::{ErrandError, Result};
use crate::interpreter::{Action, CommandResult, SmartSuggestion, Snapshot, TaskRef};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::sync::Arc;

// How much of the store a snapshot carries
const SNAPSHOT_NOTES: i64 = 20;
const SNAPSHOT_EVENTS: i64 = 50;

/// Everything on the calendar for one day
#[derive(Debug, Clone)]
pub struct DayAgenda {
    pub date: NaiveDate,
    pub events: Vec<Event>,
    pub tasks_due: Vec<Task>,
    pub reminders: Vec<Reminder>,
}

impl DayAgenda {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.tasks_due.is_empty() && self.reminders.is_empty()
    }
}

/// What applying a result did
#[derive(Debug, Clone)]
pub enum Outcome {
    TaskCreated(Task),
    TaskCompleted(Task),
    NoteCreated(i64),
    ReminderCreated(i64),
    EventCreated(i64),
    Agenda(DayAgenda),
    Report(ProductivityReport),
    Suggestions(Vec<SmartSuggestion>),
    /// Ambiguous reference; the user still has to pick one
    AwaitingChoice(Vec<TaskRef>),
    /// Nothing to store (help, failures)
    Nothing,
}

pub struct Dispatcher {
    db: Arc<Database>,
}

impl Dispatcher {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Current store state, as the interpreter sees it
    pub async fn load_snapshot(&self, now: NaiveDateTime) -> Result<Snapshot> {
        Ok(Snapshot {
            tasks: self.db.get_tasks(false).await?,
            notes: self.db.get_notes(SNAPSHOT_NOTES).await?,
            reminders: self.db.get_pending_reminders().await?,
            events: self.db.get_upcoming_events(now, SNAPSHOT_EVENTS).await?,
        })
    }

    /// Carry out a command result
    ///
    /// # Returns
    /// * `Ok(Outcome)` - What was stored or looked up
    /// * `Err(ErrandError::TaskNotFound)` - If a referenced task vanished
    pub async fn apply(&self, result: &CommandResult, now: NaiveDateTime) -> Result<Outcome> {
        let Some(action) = &result.action else {
            return Ok(Outcome::Nothing);
        };
        tracing::debug!(action = action.name(), "dispatching");

        let outcome = match action {
            Action::CreateTask(draft) => {
                let id = self
                    .db
                    .create_task(TaskInput {
                        title: draft.title.clone(),
                        priority: draft.priority.value,
                        category: draft.category.value,
                        estimated_duration: i64::from(draft.estimated_duration.value),
                        tags: draft.tags.clone(),
                        due_date: draft.due_date,
                    })
                    .await?;
                let task = self
                    .db
                    .get_task_by_id(id)
                    .await?
                    .ok_or(ErrandError::TaskNotFound(id))?;
                Outcome::TaskCreated(task)
            }
            Action::CompleteTask(task) | Action::CompleteSelectedTask(task) => {
                Outcome::TaskCompleted(self.db.complete_task(task.task_id, now).await?)
            }
            Action::SelectTask(candidates) => Outcome::AwaitingChoice(candidates.tasks.clone()),
            Action::CreateNote(draft) => Outcome::NoteCreated(
                self.db
                    .create_note(NoteInput {
                        title: draft.title.clone(),
                        content: draft.content.clone(),
                        category: draft.category.value,
                        tags: draft.tags.clone(),
                    })
                    .await?,
            ),
            Action::CreateReminder(draft) => Outcome::ReminderCreated(
                self.db
                    .create_reminder(ReminderInput {
                        title: draft.title.clone(),
                        reminder_time: draft.reminder_time.value,
                        reminder_type: draft.reminder_type.clone(),
                    })
                    .await?,
            ),
            Action::CreateEvent(draft) => Outcome::EventCreated(
                self.db
                    .create_event(EventInput {
                        title: draft.title.clone(),
                        event_type: draft.event_type.clone(),
                        start_time: draft.start.value,
                        end_time: draft.end,
                    })
                    .await?,
            ),
            Action::CheckSchedule(query) => Outcome::Agenda(self.agenda(query.date.date()).await?),
            Action::Productivity(query) => {
                let period = query.period.parse::<Period>().unwrap_or_else(|e| {
                    tracing::warn!(period = %query.period, error = %e, "falling back to a weekly report");
                    Period::Week
                });
                Outcome::Report(self.report(period, now).await?)
            }
            Action::GetSuggestions(query) => Outcome::Suggestions(query.suggestions.clone()),
            Action::Help => Outcome::Nothing,
        };

        Ok(outcome)
    }

    pub async fn agenda(&self, date: NaiveDate) -> Result<DayAgenda> {
        let start = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| ErrandError::Generic(format!("invalid day: {}", date)))?;
        let end = start + Duration::days(1);

        let reminders = self
            .db
            .get_pending_reminders()
            .await?
            .into_iter()
            .filter(|r| r.reminder_time >= start && r.reminder_time < end)
            .collect();

        Ok(DayAgenda {
            date,
            events: self.db.get_events_between(start, end).await?,
            tasks_due: self.db.get_tasks_due_between(start, end).await?,
            reminders,
        })
    }

    pub async fn report(&self, period: Period, now: NaiveDateTime) -> Result<ProductivityReport> {
        let tasks = self.db.get_tasks(true).await?;
        Ok(ProductivityReport::build(&tasks, period, now))
    }
}
