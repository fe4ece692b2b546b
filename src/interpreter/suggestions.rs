/// Suggestion engine
///
/// Ranks follow-up commands from the current task and calendar state.

use crate::db::Priority;
use crate::interpreter::snapshot::Snapshot;
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

// A backlog beyond this many open tasks earns a triage nudge
const BUSY_BACKLOG: usize = 10;

/// Suggestion with reasoning
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SmartSuggestion {
    pub command: String,
    pub reason: String,
    pub confidence: f64,
}

impl SmartSuggestion {
    fn new(command: impl Into<String>, reason: impl Into<String>, confidence: f64) -> Self {
        Self {
            command: command.into(),
            reason: reason.into(),
            confidence,
        }
    }
}

/// Example commands shown by help and by failed interpretations
pub fn help_suggestions() -> Vec<String> {
    [
        "create task buy groceries",
        "remind me to call mom at 6pm",
        "schedule lunch with Alex tomorrow at noon",
        "what's my schedule for today",
        "complete task buy groceries",
        "take a note about the project kickoff",
        "how productive am i this week",
        "what should i work on next",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

pub struct SuggestionEngine;

impl SuggestionEngine {
    /// Generate ranked suggestions for a snapshot
    ///
    /// # Arguments
    /// * `snapshot` - Current tasks, reminders and events
    /// * `now` - Reference time for "overdue", "today" and "soon"
    /// * `limit` - Maximum number of suggestions returned
    ///
    /// # Returns
    /// Suggestions sorted by confidence, highest first, without duplicate commands
    pub fn generate(snapshot: &Snapshot, now: NaiveDateTime, limit: usize) -> Vec<SmartSuggestion> {
        let mut suggestions = Vec::new();

        suggestions.extend(Self::suggest_from_tasks(snapshot, now));
        suggestions.extend(Self::suggest_from_calendar(snapshot, now));

        // Sort by confidence
        suggestions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        let mut seen = Vec::new();
        suggestions.retain(|s| {
            if seen.contains(&s.command) {
                false
            } else {
                seen.push(s.command.clone());
                true
            }
        });

        suggestions.truncate(limit);
        suggestions
    }

    fn suggest_from_tasks(snapshot: &Snapshot, now: NaiveDateTime) -> Vec<SmartSuggestion> {
        let mut suggestions = Vec::new();
        let today = now.date();
        let pending: Vec<_> = snapshot.pending_tasks().collect();

        if pending.is_empty() {
            suggestions.push(SmartSuggestion::new(
                "create task plan tomorrow",
                "Your task list is empty",
                0.5,
            ));
            return suggestions;
        }

        for task in &pending {
            let command = format!("complete task {}", task.title);

            if task.is_overdue(now) && task.due_date.map(|d| d.date()) != Some(today) {
                suggestions.push(SmartSuggestion::new(
                    command,
                    format!("'{}' is overdue", task.title),
                    0.9,
                ));
            } else if task.due_date.map(|d| d.date()) == Some(today) {
                suggestions.push(SmartSuggestion::new(
                    command,
                    format!("'{}' is due today", task.title),
                    0.8,
                ));
            } else {
                match task.priority_level() {
                    Priority::Urgent => suggestions.push(SmartSuggestion::new(
                        command,
                        format!("'{}' is urgent", task.title),
                        0.75,
                    )),
                    Priority::High => suggestions.push(SmartSuggestion::new(
                        command,
                        format!("'{}' is high priority", task.title),
                        0.65,
                    )),
                    Priority::Medium | Priority::Low => {}
                }
            }
        }

        if pending.len() > BUSY_BACKLOG {
            suggestions.push(SmartSuggestion::new(
                "how productive am i this week",
                format!("{} open tasks; see where time is going", pending.len()),
                0.4,
            ));
        }

        suggestions
    }

    fn suggest_from_calendar(snapshot: &Snapshot, now: NaiveDateTime) -> Vec<SmartSuggestion> {
        let mut suggestions = Vec::new();
        let today = now.date();

        let later_today = snapshot
            .events
            .iter()
            .filter(|e| e.start_time > now && e.start_time.date() == today)
            .count();
        if later_today > 0 {
            let noun = if later_today == 1 { "event" } else { "events" };
            suggestions.push(SmartSuggestion::new(
                "what's my schedule for today",
                format!("{} {} later today", later_today, noun),
                0.7,
            ));
        }

        let horizon = now + Duration::hours(1);
        for reminder in snapshot
            .reminders
            .iter()
            .filter(|r| !r.completed && r.reminder_time > now && r.reminder_time <= horizon)
        {
            suggestions.push(SmartSuggestion::new(
                reminder.title.to_lowercase(),
                format!("Reminder due at {}", reminder.reminder_time.format("%H:%M")),
                0.6,
            ));
        }

        suggestions
    }
}
