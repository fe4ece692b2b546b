/// Data models for database entities
///
/// All models map to database tables and use sqlx for type-safe queries.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

/// Represents a stored task
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub priority: String,
    pub category: String,
    pub estimated_duration: i64, // minutes
    pub tags: Option<String>,    // JSON array
    pub due_date: Option<NaiveDateTime>,
    pub completed: bool,
    pub completed_at: Option<NaiveDateTime>,
    pub created_at: String, // ISO 8601 format from SQLite
}

impl Task {
    /// Parse tags from JSON string
    pub fn get_tags(&self) -> Vec<String> {
        self.tags
            .as_ref()
            .and_then(|t| serde_json::from_str(t).ok())
            .unwrap_or_default()
    }

    /// Unknown priority strings read as medium
    pub fn priority_level(&self) -> Priority {
        self.priority.parse().unwrap_or_default()
    }

    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        !self.completed && self.due_date.map_or(false, |due| due < now)
    }
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskInput {
    pub title: String,
    pub priority: Priority,
    pub category: Category,
    pub estimated_duration: i64,
    pub tags: Vec<String>,
    pub due_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: Option<String>, // JSON array
    pub created_at: String,
}

impl Note {
    pub fn get_tags(&self) -> Vec<String> {
        self.tags
            .as_ref()
            .and_then(|t| serde_json::from_str(t).ok())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteInput {
    pub title: String,
    pub content: String,
    pub category: Category,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reminder {
    pub id: i64,
    pub title: String,
    pub reminder_time: NaiveDateTime,
    pub reminder_type: String,
    pub completed: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderInput {
    pub title: String,
    pub reminder_time: NaiveDateTime,
    pub reminder_type: String,
}

/// Calendar event
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub event_type: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub created_at: String,
}

impl Event {
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventInput {
    pub title: String,
    pub event_type: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

/// One processed utterance, as written to the conversation log
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ConversationLogEntry {
    pub id: i64,
    pub input: String,
    pub action: Option<String>,
    pub success: bool,
    pub message: String,
    pub timestamp: String, // ISO 8601 format from SQLite
}

/// Task priority levels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            other => Err(format!("unknown priority '{}'", other)),
        }
    }
}

/// Task and note categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Work,
    Personal,
    Health,
    Shopping,
    Finance,
    Learning,
    Household,
    #[default]
    General,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Work,
        Category::Personal,
        Category::Health,
        Category::Shopping,
        Category::Finance,
        Category::Learning,
        Category::Household,
        Category::General,
    ];
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Health => "health",
            Category::Shopping => "shopping",
            Category::Finance => "finance",
            Category::Learning => "learning",
            Category::Household => "household",
            Category::General => "general",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.to_string() == wanted)
            .ok_or_else(|| format!("unknown category '{}'", wanted))
    }
}
