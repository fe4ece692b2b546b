/// Result types produced by the command interpreter
///
/// Every utterance ends up as exactly one `CommandResult`. What the host
/// should do with it is carried by `Action`, one variant per action, so
/// consumers can match exhaustively instead of probing optional fields.

use crate::db::{Category, Priority, Task};
use crate::interpreter::suggestions::SmartSuggestion;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Where a slot value came from
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SlotSource {
    /// Said outright ("2 hours", "urgent", "at 3pm")
    Stated,
    /// Guessed from keywords ("research" means a long task)
    Inferred,
    /// Nothing to go on, fallback value used
    Defaulted,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Slot<T> {
    pub value: T,
    pub source: SlotSource,
}

impl<T> Slot<T> {
    pub fn stated(value: T) -> Self {
        Self {
            value,
            source: SlotSource::Stated,
        }
    }

    pub fn inferred(value: T) -> Self {
        Self {
            value,
            source: SlotSource::Inferred,
        }
    }

    pub fn defaulted(value: T) -> Self {
        Self {
            value,
            source: SlotSource::Defaulted,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        self.source == SlotSource::Defaulted
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub priority: Slot<Priority>,
    /// Minutes
    pub estimated_duration: Slot<u32>,
    pub category: Slot<Category>,
    pub tags: Vec<String>,
    pub due_date: Option<NaiveDateTime>,
}

/// A reference to a task the host already knows about
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskRef {
    pub task_id: i64,
    pub title: String,
}

impl From<&Task> for TaskRef {
    fn from(task: &Task) -> Self {
        Self {
            task_id: task.id,
            title: task.title.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TaskCandidates {
    pub query: String,
    pub tasks: Vec<TaskRef>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub category: Slot<Category>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReminderDraft {
    pub title: String,
    pub reminder_time: Slot<NaiveDateTime>,
    pub reminder_type: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub title: String,
    pub event_type: String,
    pub start: Slot<NaiveDateTime>,
    pub end: NaiveDateTime,
    /// Minutes
    pub duration: Slot<u32>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScheduleQuery {
    pub phrase: String,
    pub date: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductivityQuery {
    pub period: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SuggestionQuery {
    pub area: String,
    pub suggestions: Vec<SmartSuggestion>,
}

/// What the host should do next
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Action {
    CreateTask(TaskDraft),
    CompleteTask(TaskRef),
    /// Several tasks matched; ask the user which one
    SelectTask(TaskCandidates),
    CompleteSelectedTask(TaskRef),
    CreateNote(NoteDraft),
    CreateReminder(ReminderDraft),
    CreateEvent(EventDraft),
    CheckSchedule(ScheduleQuery),
    Productivity(ProductivityQuery),
    GetSuggestions(SuggestionQuery),
    Help,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::CreateTask(_) => "createTask",
            Action::CompleteTask(_) => "completeTask",
            Action::SelectTask(_) => "selectTask",
            Action::CompleteSelectedTask(_) => "completeSelectedTask",
            Action::CreateNote(_) => "createNote",
            Action::CreateReminder(_) => "createReminder",
            Action::CreateEvent(_) => "createEvent",
            Action::CheckSchedule(_) => "checkSchedule",
            Action::Productivity(_) => "productivity",
            Action::GetSuggestions(_) => "getSuggestions",
            Action::Help => "help",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CommandResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl CommandResult {
    pub fn ok(action: Action, message: impl Into<String>) -> Self {
        Self {
            success: true,
            action: Some(action),
            message: message.into(),
            suggestions: Vec::new(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            action: None,
            message: message.into(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_suggestions<I, S>(mut self, suggestions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggestions = suggestions.into_iter().map(Into::into).collect();
        self
    }

    pub fn action_name(&self) -> Option<&'static str> {
        self.action.as_ref().map(Action::name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_serializes_with_type_tag() {
        let result = CommandResult::ok(
            Action::CompleteTask(TaskRef {
                task_id: 7,
                title: "Buy milk".to_string(),
            }),
            "Done",
        );

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["action"]["type"], "completeTask");
        assert_eq!(json["action"]["data"]["taskId"], 7);
        assert!(json.get("suggestions").is_none());
    }

    #[test]
    fn test_failure_has_no_action() {
        let result = CommandResult::failure("nope").with_suggestions(["help"]);
        assert!(!result.success);
        assert_eq!(result.action_name(), None);
        assert_eq!(result.suggestions, vec!["help".to_string()]);
    }

    #[test]
    fn test_slot_provenance() {
        let slot = Slot::defaulted(60u32);
        assert!(slot.is_defaulted());
        assert_eq!(serde_json::to_value(&slot).unwrap()["source"], "defaulted");
        assert!(!Slot::inferred(30u32).is_defaulted());
    }
}
