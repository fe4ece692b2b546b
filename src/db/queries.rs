/// SQL query functions for database operations
///
/// All queries use sqlx for type safety.

use crate::db::models::*;
use crate::db::Database;
use crate::error::{ErrandError, Result};
use chrono::NaiveDateTime;
use sqlx::Row;

impl Database {
    /// Insert a new task
    ///
    /// # Returns
    /// * `Ok(i64)` - The task ID
    pub async fn create_task(&self, input: TaskInput) -> Result<i64> {
        let tags_json = serde_json::to_string(&input.tags)?;

        let result = sqlx::query(
            r#"
            INSERT INTO tasks (title, priority, category, estimated_duration, tags, due_date)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&input.title)
        .bind(input.priority.to_string())
        .bind(input.category.to_string())
        .bind(input.estimated_duration)
        .bind(tags_json)
        .bind(input.due_date)
        .fetch_one(self.pool())
        .await?;

        Ok(result.get(0))
    }

    /// Get tasks, pending ones first
    ///
    /// # Arguments
    /// * `include_completed` - Also return tasks already marked done
    pub async fn get_tasks(&self, include_completed: bool) -> Result<Vec<Task>> {
        let tasks = if include_completed {
            sqlx::query_as::<_, Task>(
                "SELECT * FROM tasks ORDER BY completed ASC, due_date IS NULL, due_date ASC, id ASC",
            )
            .fetch_all(self.pool())
            .await?
        } else {
            sqlx::query_as::<_, Task>(
                "SELECT * FROM tasks WHERE completed = 0 ORDER BY due_date IS NULL, due_date ASC, id ASC",
            )
            .fetch_all(self.pool())
            .await?
        };

        Ok(tasks)
    }

    pub async fn get_task_by_id(&self, id: i64) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(task)
    }

    /// Mark a task complete
    ///
    /// # Returns
    /// * `Err(ErrandError::TaskNotFound)` - If no open task has this id
    pub async fn complete_task(&self, id: i64, completed_at: NaiveDateTime) -> Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET completed = 1, completed_at = ? WHERE id = ? AND completed = 0 RETURNING *",
        )
        .bind(completed_at)
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        task.ok_or(ErrandError::TaskNotFound(id))
    }

    /// Tasks due inside [start, end)
    pub async fn get_tasks_due_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE due_date >= ? AND due_date < ? ORDER BY due_date ASC",
        )
        .bind(start)
        .bind(end)
        .fetch_all(self.pool())
        .await?;

        Ok(tasks)
    }

    pub async fn create_note(&self, input: NoteInput) -> Result<i64> {
        let tags_json = serde_json::to_string(&input.tags)?;

        let result = sqlx::query(
            r#"
            INSERT INTO notes (title, content, category, tags)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&input.title)
        .bind(&input.content)
        .bind(input.category.to_string())
        .bind(tags_json)
        .fetch_one(self.pool())
        .await?;

        Ok(result.get(0))
    }

    pub async fn get_notes(&self, limit: i64) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>("SELECT * FROM notes ORDER BY id DESC LIMIT ?")
            .bind(limit)
            .fetch_all(self.pool())
            .await?;

        Ok(notes)
    }

    pub async fn create_reminder(&self, input: ReminderInput) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO reminders (title, reminder_time, reminder_type)
            VALUES (?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&input.title)
        .bind(input.reminder_time)
        .bind(&input.reminder_type)
        .fetch_one(self.pool())
        .await?;

        Ok(result.get(0))
    }

    /// Get reminders that haven't been dismissed, soonest first
    pub async fn get_pending_reminders(&self) -> Result<Vec<Reminder>> {
        let reminders = sqlx::query_as::<_, Reminder>(
            "SELECT * FROM reminders WHERE completed = 0 ORDER BY reminder_time ASC",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(reminders)
    }

    pub async fn create_event(&self, input: EventInput) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO events (title, event_type, start_time, end_time)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&input.title)
        .bind(&input.event_type)
        .bind(input.start_time)
        .bind(input.end_time)
        .fetch_one(self.pool())
        .await?;

        Ok(result.get(0))
    }

    /// Events starting inside [start, end)
    pub async fn get_events_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE start_time >= ? AND start_time < ? ORDER BY start_time ASC",
        )
        .bind(start)
        .bind(end)
        .fetch_all(self.pool())
        .await?;

        Ok(events)
    }

    /// Upcoming events from a given moment
    pub async fn get_upcoming_events(&self, from: NaiveDateTime, limit: i64) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE end_time >= ? ORDER BY start_time ASC LIMIT ?",
        )
        .bind(from)
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        Ok(events)
    }

    /// Append a processed utterance to the conversation log
    pub async fn log_utterance(
        &self,
        input: &str,
        action: Option<&str>,
        success: bool,
        message: &str,
    ) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO conversation_log (input, action, success, message)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(input)
        .bind(action)
        .bind(success)
        .bind(message)
        .fetch_one(self.pool())
        .await?;

        Ok(result.get(0))
    }

    /// Most recent utterances, newest first
    pub async fn get_conversation_log(&self, limit: i64) -> Result<Vec<ConversationLogEntry>> {
        let entries = sqlx::query_as::<_, ConversationLogEntry>(
            "SELECT * FROM conversation_log ORDER BY id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        Ok(entries)
    }
}
