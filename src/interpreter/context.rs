/// Conversation context
///
/// A short memory of recent utterances, owned by the caller. It exists so
/// "the second one" can be resolved after an ambiguous task reference.

use crate::interpreter::command::{Action, CommandResult, TaskRef};
use crate::interpreter::normalizer::{contains_phrase, padded_words};
use chrono::NaiveDateTime;
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

const FOLLOW_UP_MARKERS: &[&str] = &["yes", "no", "that one", "the first", "the second", "option"];

const ORDINALS: &[(&str, usize)] = &[
    ("first", 0),
    ("1st", 0),
    ("second", 1),
    ("2nd", 1),
    ("third", 2),
    ("3rd", 2),
];

#[derive(Debug, Clone, PartialEq)]
pub struct ContextEntry {
    pub input: String,
    pub timestamp: NaiveDateTime,
    /// Action name once the utterance has been interpreted
    pub action: Option<String>,
    /// Candidates offered when the action was `selectTask`
    pub candidates: Vec<TaskRef>,
}

#[derive(Debug, Clone)]
pub struct ConversationContext {
    entries: VecDeque<ContextEntry>,
    capacity: usize,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// A capacity of 0 is treated as 1
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an utterance, evicting the oldest entry when full
    pub fn record(&mut self, input: &str, timestamp: NaiveDateTime) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(ContextEntry {
            input: input.to_string(),
            timestamp,
            action: None,
            candidates: Vec::new(),
        });
    }

    /// Attach the outcome to the most recent entry
    pub fn resolve_last(&mut self, result: &CommandResult) {
        let Some(last) = self.entries.back_mut() else {
            return;
        };
        last.action = result.action_name().map(String::from);
        last.candidates = match &result.action {
            Some(Action::SelectTask(candidates)) => candidates.tasks.clone(),
            _ => Vec::new(),
        };
    }

    /// The entry before the most recent one
    pub fn previous(&self) -> Option<&ContextEntry> {
        let len = self.entries.len();
        if len < 2 {
            return None;
        }
        self.entries.get(len - 2)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first
    pub fn entries(&self) -> impl Iterator<Item = &ContextEntry> {
        self.entries.iter()
    }
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves "the second one" against the candidates of a preceding
/// `selectTask`. Returns None when the input isn't a follow-up to one.
pub fn resolve_follow_up(text: &str, context: &ConversationContext) -> Option<CommandResult> {
    let padded = padded_words(text);
    if !FOLLOW_UP_MARKERS.iter().any(|m| contains_phrase(&padded, m)) {
        return None;
    }

    let previous = context.previous()?;
    if previous.action.as_deref() != Some("selectTask") {
        return None;
    }

    let index = ordinal_index(&padded);
    let result = match previous.candidates.get(index) {
        Some(task) => CommandResult::ok(
            Action::CompleteSelectedTask(task.clone()),
            format!("Completed task: {}", task.title),
        ),
        None => CommandResult::failure(format!(
            "There are only {} options to choose from",
            previous.candidates.len()
        ))
        .with_suggestions(
            previous
                .candidates
                .iter()
                .map(|t| format!("complete task {}", t.title)),
        ),
    };

    Some(result)
}

// Zero-based candidate index named in the text, first by default
fn ordinal_index(padded: &str) -> usize {
    if let Some((_, index)) = ORDINALS.iter().find(|(word, _)| contains_phrase(padded, word)) {
        return *index;
    }

    // "option 2", "number 3", or a lone digit
    padded
        .split_whitespace()
        .find_map(|word| word.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .map(|n| n - 1)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::command::TaskCandidates;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn select_result() -> CommandResult {
        CommandResult::ok(
            Action::SelectTask(TaskCandidates {
                query: "buy".to_string(),
                tasks: vec![
                    TaskRef {
                        task_id: 1,
                        title: "Buy milk".to_string(),
                    },
                    TaskRef {
                        task_id: 2,
                        title: "Buy bread".to_string(),
                    },
                ],
            }),
            "Which one?",
        )
    }

    fn after_select(follow_up: &str) -> ConversationContext {
        let mut context = ConversationContext::new();
        context.record("complete buy", now());
        context.resolve_last(&select_result());
        context.record(follow_up, now());
        context
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut context = ConversationContext::with_capacity(3);
        for i in 0..5 {
            context.record(&format!("utterance {}", i), now());
        }

        assert_eq!(context.len(), 3);
        let inputs: Vec<&str> = context.entries().map(|e| e.input.as_str()).collect();
        assert_eq!(inputs, vec!["utterance 2", "utterance 3", "utterance 4"]);

        context.clear();
        assert!(context.is_empty());
    }

    #[test]
    fn test_resolve_last_keeps_candidates() {
        let mut context = ConversationContext::new();
        context.record("complete buy", now());
        context.resolve_last(&select_result());

        let entry = context.entries().last().unwrap();
        assert_eq!(entry.action.as_deref(), Some("selectTask"));
        assert_eq!(entry.candidates.len(), 2);
    }

    #[test]
    fn test_second_one_picks_second_candidate() {
        let context = after_select("the second one");
        let result = resolve_follow_up("the second one", &context).unwrap();

        assert!(result.success);
        assert_eq!(result.action_name(), Some("completeSelectedTask"));
        match result.action {
            Some(Action::CompleteSelectedTask(task)) => assert_eq!(task.task_id, 2),
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_yes_defaults_to_first_candidate() {
        let context = after_select("yes");
        let result = resolve_follow_up("yes", &context).unwrap();
        match result.action {
            Some(Action::CompleteSelectedTask(task)) => assert_eq!(task.task_id, 1),
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_option_number_past_end_fails() {
        let context = after_select("option 3");
        let result = resolve_follow_up("option 3", &context).unwrap();
        assert!(!result.success);
        assert_eq!(result.suggestions.len(), 2);
    }

    #[test]
    fn test_follow_up_needs_preceding_selection() {
        let mut context = ConversationContext::new();
        context.record("create task buy milk", now());
        context.record("yes", now());
        assert!(resolve_follow_up("yes", &context).is_none());

        let context = after_select("buy milk");
        assert!(resolve_follow_up("buy milk", &context).is_none());
    }
}
