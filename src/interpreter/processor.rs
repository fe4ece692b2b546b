/// Command processor
///
/// Turns one utterance into one `CommandResult`. Matching, slot extraction
/// and fallback handling all happen here; storage is the host's job.

use crate::error::{ErrandError, Result};
use crate::interpreter::command::{
    Action, CommandResult, EventDraft, NoteDraft, ProductivityQuery, ReminderDraft,
    ScheduleQuery, Slot, SuggestionQuery, TaskCandidates, TaskDraft, TaskRef,
};
use crate::interpreter::context::{resolve_follow_up, ConversationContext};
use crate::interpreter::fuzzy::TaskMatcher;
use crate::interpreter::inference;
use crate::interpreter::normalizer::{capitalize, normalize, Utterance};
use crate::interpreter::patterns::{IntentKind, IntentTable, MatchResult};
use crate::interpreter::slots::{leading_words, SlotExtractor};
use crate::interpreter::snapshot::Snapshot;
use crate::interpreter::suggestions::{help_suggestions, SuggestionEngine, DEFAULT_SUGGESTION_LIMIT};
use crate::interpreter::temporal::DateResolver;
use chrono::{Duration, Local, NaiveDateTime, Timelike};

const NOTE_TITLE_WORDS: usize = 5;
const DEFAULT_SCHEDULE_PHRASE: &str = "today";
const DEFAULT_PERIOD: &str = "week";
const DEFAULT_AREA: &str = "general";
const DEFAULT_REMINDER_TITLE: &str = "Reminder";

pub struct CommandProcessor {
    table: IntentTable,
    slots: SlotExtractor,
    resolver: DateResolver,
    matcher: TaskMatcher,
    suggestion_limit: usize,
}

impl CommandProcessor {
    /// Build the processor, compiling every pattern up front
    ///
    /// # Returns
    /// * `Err(ErrandError::Pattern)` - if a built-in pattern fails to compile
    pub fn new() -> Result<Self> {
        Ok(Self {
            table: IntentTable::new()?,
            slots: SlotExtractor::new()?,
            resolver: DateResolver::new()?,
            matcher: TaskMatcher::new(),
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
        })
    }

    pub fn with_suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = limit;
        self
    }

    pub fn table(&self) -> &IntentTable {
        &self.table
    }

    /// Interpret an utterance.
    ///
    /// Never fails: internal errors come back as a failure result with help
    /// suggestions. Every non-empty utterance is recorded in `context`.
    pub fn process(
        &self,
        text: &str,
        snapshot: &Snapshot,
        context: &mut ConversationContext,
        now: NaiveDateTime,
    ) -> CommandResult {
        let utterance = normalize(text);
        if utterance.is_empty() {
            return CommandResult::failure("No command given. Try one of these:")
                .with_suggestions(help_suggestions());
        }

        context.record(&utterance.text, now);

        let result = match self.interpret(&utterance, snapshot, context, now) {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(input = %utterance.text, error = %e, "failed to interpret command");
                internal_failure()
            }
        };

        context.resolve_last(&result);
        result
    }

    /// `process` against the local clock
    pub fn process_now(
        &self,
        text: &str,
        snapshot: &Snapshot,
        context: &mut ConversationContext,
    ) -> CommandResult {
        self.process(text, snapshot, context, Local::now().naive_local())
    }

    fn interpret(
        &self,
        utterance: &Utterance,
        snapshot: &Snapshot,
        context: &ConversationContext,
        now: NaiveDateTime,
    ) -> Result<CommandResult> {
        if let Some(matched) = self.table.find_match(&utterance.text) {
            tracing::debug!(intent = %matched.intent, "matched command");
            return self.extract(&matched, snapshot, now);
        }

        if let Some(result) = resolve_follow_up(&utterance.lowered, context) {
            tracing::debug!(action = ?result.action_name(), "resolved follow-up");
            return Ok(result);
        }

        let result = inference::infer(&utterance.lowered);
        tracing::warn!(input = %utterance.text, "no command matched");
        Ok(result)
    }

    fn extract(
        &self,
        matched: &MatchResult,
        snapshot: &Snapshot,
        now: NaiveDateTime,
    ) -> Result<CommandResult> {
        match matched.intent {
            IntentKind::CreateTask => self.create_task(required(matched)?, now),
            IntentKind::CompleteTask => Ok(self.complete_task(required(matched)?, snapshot)),
            IntentKind::CreateNote => Ok(self.create_note(required(matched)?)),
            IntentKind::CreateReminder => self.create_reminder(required(matched)?, now),
            IntentKind::CreateEvent => self.create_event(required(matched)?, now),
            IntentKind::CheckSchedule => Ok(self.check_schedule(matched.capture(0), now)),
            IntentKind::Productivity => Ok(productivity(matched.capture(0))),
            IntentKind::GetSuggestions => Ok(self.suggestions(matched.capture(0), snapshot, now)),
            IntentKind::Help => Ok(CommandResult::ok(
                Action::Help,
                "Here are some things you can ask me:",
            )
            .with_suggestions(help_suggestions())),
        }
    }

    fn create_task(&self, text: &str, now: NaiveDateTime) -> Result<CommandResult> {
        let body = self.slots.strip_hashtags(text);

        // the clause only counts as a due date when it resolves
        let (title, due_date) = match self.slots.split_due_clause(&body) {
            Some((head, clause)) => match self.resolver.resolve_combined(clause, now) {
                Some(due) => (head, Some(due)),
                None => (body.as_str(), None),
            },
            None => (body.as_str(), None),
        };

        if title.is_empty() {
            return Err(ErrandError::InvalidCommand(format!("task without a title: {}", text)));
        }

        let draft = TaskDraft {
            title: capitalize(title),
            priority: self.slots.detect_priority(text),
            estimated_duration: self.slots.estimate_duration(text),
            category: self.slots.detect_category(text),
            tags: self.slots.extract_tags(text),
            due_date,
        };

        let message = match draft.due_date {
            Some(due) => format!("Created task: {} (due {})", draft.title, format_when(due)),
            None => format!("Created task: {}", draft.title),
        };

        Ok(CommandResult::ok(Action::CreateTask(draft), message))
    }

    fn complete_task(&self, description: &str, snapshot: &Snapshot) -> CommandResult {
        let matches = self.matcher.find_matches(description, &snapshot.tasks);

        match matches.as_slice() {
            [] => CommandResult::failure(format!(
                "I couldn't find a task matching '{}'",
                description
            ))
            .with_suggestions(
                snapshot
                    .pending_tasks()
                    .take(3)
                    .map(|t| format!("complete task {}", t.title)),
            ),
            [task] => CommandResult::ok(
                Action::CompleteTask(TaskRef::from(*task)),
                format!("Completed task: {}", task.title),
            ),
            several => {
                let tasks: Vec<TaskRef> = several.iter().map(|t| TaskRef::from(*t)).collect();
                let choices: Vec<String> = tasks
                    .iter()
                    .enumerate()
                    .map(|(i, t)| format!("{}. {}", i + 1, t.title))
                    .collect();

                CommandResult::ok(
                    Action::SelectTask(TaskCandidates {
                        query: description.to_string(),
                        tasks,
                    }),
                    format!(
                        "I found {} tasks matching '{}'. Which one did you mean?",
                        several.len(),
                        description
                    ),
                )
                .with_suggestions(choices)
            }
        }
    }

    fn create_note(&self, text: &str) -> CommandResult {
        let plain = self.slots.strip_hashtags(text);
        let title = capitalize(&leading_words(&plain, NOTE_TITLE_WORDS));

        let draft = NoteDraft {
            title,
            content: text.to_string(),
            category: self.slots.detect_category(text),
            tags: self.slots.extract_tags(text),
        };
        let message = format!("Saved note: {}", draft.title);

        CommandResult::ok(Action::CreateNote(draft), message)
    }

    fn create_reminder(&self, text: &str, now: NaiveDateTime) -> Result<CommandResult> {
        let (title, reminder_time) = match self.resolver.extract_span(text, now) {
            Some(span) => (trim_connectors(&span.remainder), Slot::stated(span.at)),
            None => (text.to_string(), Slot::defaulted(default_reminder_time(now)?)),
        };
        // "remind me at 3pm" names a time and nothing else
        let title = if title.is_empty() {
            DEFAULT_REMINDER_TITLE.to_string()
        } else {
            capitalize(&title)
        };

        let draft = ReminderDraft {
            reminder_type: self.slots.reminder_type(text).to_string(),
            title,
            reminder_time,
        };
        let message = if draft.title == DEFAULT_REMINDER_TITLE {
            format!("Reminder set for {}", format_when(draft.reminder_time.value))
        } else {
            format!(
                "I'll remind you to {} {}",
                lower_first(&draft.title),
                format_when(draft.reminder_time.value)
            )
        };

        Ok(CommandResult::ok(Action::CreateReminder(draft), message))
    }

    fn create_event(&self, text: &str, now: NaiveDateTime) -> Result<CommandResult> {
        let (event_type, duration) = self.slots.event_type(text);
        let cleaned = self.slots.clean_event_title(text);

        let (title, start) = match self.resolver.extract_span(&cleaned, now) {
            Some(span) => (self.slots.clean_event_title(&span.remainder), Slot::stated(span.at)),
            None => (cleaned, Slot::defaulted(next_full_hour(now)?)),
        };
        let title = if title.is_empty() {
            capitalize(event_type)
        } else {
            capitalize(&title)
        };

        let end = start
            .value
            .checked_add_signed(Duration::minutes(i64::from(duration.value)))
            .ok_or_else(|| ErrandError::Generic(format!("event end out of range: {}", text)))?;

        let draft = EventDraft {
            title,
            event_type: event_type.to_string(),
            start,
            end,
            duration,
        };
        let message = format!(
            "Scheduled {} for {} ({} min)",
            draft.title,
            format_when(draft.start.value),
            draft.duration.value
        );

        Ok(CommandResult::ok(Action::CreateEvent(draft), message))
    }

    fn check_schedule(&self, phrase: Option<&str>, now: NaiveDateTime) -> CommandResult {
        let phrase = phrase.unwrap_or(DEFAULT_SCHEDULE_PHRASE);

        match self.resolver.resolve_combined(phrase, now) {
            Some(date) => CommandResult::ok(
                Action::CheckSchedule(ScheduleQuery {
                    phrase: phrase.to_string(),
                    date,
                }),
                format!("Here's your schedule for {}", date.format("%A, %B %-d")),
            ),
            None => CommandResult::failure(format!("I couldn't work out which day '{}' is", phrase))
                .with_suggestions([
                    "what's my schedule for today",
                    "what's my schedule for tomorrow",
                    "what do i have on friday",
                ]),
        }
    }

    fn suggestions(&self, area: Option<&str>, snapshot: &Snapshot, now: NaiveDateTime) -> CommandResult {
        let suggestions = SuggestionEngine::generate(snapshot, now, self.suggestion_limit);
        let commands: Vec<String> = suggestions.iter().map(|s| s.command.clone()).collect();

        let message = match suggestions.first() {
            Some(top) => format!("{}. Try: {}", top.reason, top.command),
            None => "Nothing needs your attention right now".to_string(),
        };

        CommandResult::ok(
            Action::GetSuggestions(SuggestionQuery {
                area: area.unwrap_or(DEFAULT_AREA).to_lowercase(),
                suggestions,
            }),
            message,
        )
        .with_suggestions(commands)
    }
}

fn required(matched: &MatchResult) -> Result<&str> {
    matched.capture(0).ok_or_else(|| {
        ErrandError::InvalidCommand(format!("{} matched without its subject", matched.intent))
    })
}

fn productivity(period: Option<&str>) -> CommandResult {
    let period = period
        .map(|p| {
            let lowered = p.to_lowercase();
            ["this ", "last ", "the ", "past "]
                .iter()
                .fold(lowered, |acc, prefix| match acc.strip_prefix(prefix) {
                    Some(rest) => rest.to_string(),
                    None => acc,
                })
        })
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| DEFAULT_PERIOD.to_string());

    let message = format!("Here's how your {} is going", period);
    CommandResult::ok(Action::Productivity(ProductivityQuery { period }), message)
}

/// Canned answer for anything that went wrong inside the interpreter
fn internal_failure() -> CommandResult {
    CommandResult::failure("Sorry, something went wrong while reading that. Try one of these:")
        .with_suggestions(help_suggestions())
}

fn default_reminder_time(now: NaiveDateTime) -> Result<NaiveDateTime> {
    now.checked_add_signed(Duration::hours(1))
        .ok_or_else(|| ErrandError::Generic("reminder time out of range".to_string()))
}

fn next_full_hour(now: NaiveDateTime) -> Result<NaiveDateTime> {
    now.date()
        .and_hms_opt(now.hour(), 0, 0)
        .and_then(|hour| hour.checked_add_signed(Duration::hours(1)))
        .ok_or_else(|| ErrandError::Generic("event start out of range".to_string()))
}

// "call Sarah at" -> "call Sarah"
fn trim_connectors(text: &str) -> String {
    let mut words: Vec<&str> = text.split_whitespace().collect();
    while let Some(last) = words.last() {
        if matches!(last.to_lowercase().as_str(), "at" | "on" | "in" | "by" | "for") {
            words.pop();
        } else {
            break;
        }
    }
    words.join(" ")
}

fn lower_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn format_when(at: NaiveDateTime) -> String {
    at.format("%a %b %-d at %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Category, Priority, Task};
    use crate::interpreter::command::SlotSource;
    use chrono::NaiveDate;

    // 2026-03-02 is a Monday
    fn now() -> NaiveDateTime {
        at(2026, 3, 2, 10, 30)
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn task(id: i64, title: &str) -> Task {
        Task {
            id,
            title: title.to_string(),
            priority: "medium".to_string(),
            category: "general".to_string(),
            estimated_duration: 60,
            tags: None,
            due_date: None,
            completed: false,
            completed_at: None,
            created_at: "2026-03-01 08:00:00".to_string(),
        }
    }

    fn processor() -> CommandProcessor {
        CommandProcessor::new().unwrap()
    }

    fn run(text: &str) -> CommandResult {
        let mut context = ConversationContext::new();
        processor().process(text, &Snapshot::default(), &mut context, now())
    }

    #[test]
    fn test_create_task_defaults() {
        let result = run("create task water the plants");
        assert!(result.success);

        match result.action {
            Some(Action::CreateTask(draft)) => {
                assert_eq!(draft.title, "Water the plants");
                assert_eq!(draft.priority, Slot::defaulted(Priority::Medium));
                assert_eq!(draft.estimated_duration, Slot::defaulted(60));
                assert_eq!(draft.category, Slot::defaulted(Category::General));
                assert!(draft.tags.is_empty());
                assert_eq!(draft.due_date, None);
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_create_task_urgency_wins() {
        let result = run("add task important report, low priority but urgent");
        match result.action {
            Some(Action::CreateTask(draft)) => {
                assert_eq!(draft.priority.value, Priority::Urgent);
                assert_eq!(draft.priority.source, SlotSource::Stated);
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_create_task_with_due_clause() {
        let result = run("add a task to call the bank by friday #money");
        match result.action {
            Some(Action::CreateTask(draft)) => {
                assert_eq!(draft.title, "Call the bank");
                assert_eq!(draft.due_date, Some(at(2026, 3, 6, 10, 30)));
                assert_eq!(draft.estimated_duration, Slot::inferred(30));
                assert_eq!(draft.category.value, Category::Finance);
                assert_eq!(draft.tags, vec!["money".to_string()]);
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_unresolvable_due_clause_stays_in_title() {
        let result = run("create task stand by me");
        match result.action {
            Some(Action::CreateTask(draft)) => {
                assert_eq!(draft.title, "Stand by me");
                assert_eq!(draft.due_date, None);
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_complete_ambiguous_then_follow_up() {
        let processor = processor();
        let snapshot = Snapshot::with_tasks(vec![task(1, "Buy milk"), task(2, "Buy bread")]);
        let mut context = ConversationContext::new();

        let result = processor.process("complete buy", &snapshot, &mut context, now());
        assert!(result.success);
        match &result.action {
            Some(Action::SelectTask(candidates)) => assert_eq!(candidates.tasks.len(), 2),
            other => panic!("unexpected action {:?}", other),
        }

        let result = processor.process("the second one", &snapshot, &mut context, now());
        assert_eq!(result.action_name(), Some("completeSelectedTask"));
        assert_eq!(context.len(), 2);
    }

    #[test]
    fn test_complete_single_and_missing() {
        let processor = processor();
        let snapshot = Snapshot::with_tasks(vec![task(1, "Buy milk"), task(2, "Walk dog")]);
        let mut context = ConversationContext::new();

        let result = processor.process("complete task buy milk", &snapshot, &mut context, now());
        match result.action {
            Some(Action::CompleteTask(task)) => assert_eq!(task.task_id, 1),
            other => panic!("unexpected action {:?}", other),
        }

        let result = processor.process("finish the taxes", &snapshot, &mut context, now());
        assert!(!result.success);
        assert!(result.message.contains("couldn't find"));
    }

    #[test]
    fn test_reminder_call_sarah() {
        let result = run("remind me to call Sarah at 3pm");
        match result.action {
            Some(Action::CreateReminder(draft)) => {
                assert!(draft.title.starts_with("Call Sarah"));
                assert_eq!(draft.reminder_time, Slot::stated(at(2026, 3, 2, 15, 0)));
                assert_eq!(draft.reminder_type, "call");
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_reminder_past_time_rolls_to_tomorrow() {
        let result = run("remind me to take my pills at 8am");
        match result.action {
            Some(Action::CreateReminder(draft)) => {
                assert_eq!(draft.title, "Take my pills");
                assert_eq!(draft.reminder_time.value, at(2026, 3, 3, 8, 0));
                assert_eq!(draft.reminder_type, "medication");
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_reminder_without_time_defaults_to_an_hour() {
        let result = run("remind me to stretch");
        match result.action {
            Some(Action::CreateReminder(draft)) => {
                assert_eq!(draft.title, "Stretch");
                assert_eq!(draft.reminder_time, Slot::defaulted(at(2026, 3, 2, 11, 30)));
                assert_eq!(draft.reminder_type, "general");
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_reminder_with_only_a_time_keeps_it() {
        let result = run("remind me at 3pm");
        match result.action {
            Some(Action::CreateReminder(draft)) => {
                assert_eq!(draft.title, "Reminder");
                assert_eq!(draft.reminder_time, Slot::stated(at(2026, 3, 2, 15, 0)));
            }
            other => panic!("unexpected action {:?}", other),
        }
        assert_eq!(result.message, "Reminder set for Mon Mar 2 at 15:00");

        match run("remind me tomorrow").action {
            Some(Action::CreateReminder(draft)) => {
                assert_eq!(draft.title, "Reminder");
                assert_eq!(draft.reminder_time, Slot::stated(at(2026, 3, 3, 9, 0)));
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_reminder_in_relative_time() {
        let result = run("remind me to check the oven in 20 minutes");
        match result.action {
            Some(Action::CreateReminder(draft)) => {
                assert_eq!(draft.title, "Check the oven");
                assert_eq!(draft.reminder_time, Slot::stated(at(2026, 3, 2, 10, 50)));
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_create_task_in_relative_time_sets_due_date() {
        let result = run("create task call mom in 30 minutes");
        match result.action {
            Some(Action::CreateTask(draft)) => {
                assert_eq!(draft.title, "Call mom");
                assert_eq!(draft.due_date, Some(at(2026, 3, 2, 11, 0)));
                assert_eq!(draft.estimated_duration, Slot::inferred(30));
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_event_in_relative_time() {
        let result = run("schedule a meeting with Bo in 2 hours");
        match result.action {
            Some(Action::CreateEvent(draft)) => {
                assert_eq!(draft.title, "Meeting with Bo");
                assert_eq!(draft.start, Slot::stated(at(2026, 3, 2, 12, 30)));
                assert_eq!(draft.duration, Slot::inferred(60));
                assert_eq!(draft.end, at(2026, 3, 2, 13, 30));
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_numbers_never_panic() {
        let result = run("what's my schedule in 99999999999999999 days");
        assert!(!result.success);
        assert!(!result.suggestions.is_empty());

        for text in [
            "remind me to stretch in 99999999999999999 hours",
            "create task file taxes in 9223372036854775807 minutes",
            "schedule a call in 99999999999 weeks",
        ] {
            let result = run(text);
            assert!(result.success, "{}", text);
        }
    }

    #[test]
    fn test_process_now_uses_the_local_clock() {
        let mut context = ConversationContext::new();
        let before = Local::now().naive_local();
        let result = processor().process_now("remind me to stretch", &Snapshot::default(), &mut context);

        match result.action {
            Some(Action::CreateReminder(draft)) => {
                assert!(draft.reminder_time.value >= before + Duration::hours(1));
            }
            other => panic!("unexpected action {:?}", other),
        }
        assert_eq!(context.len(), 1);
    }

    #[test]
    fn test_event_lunch_tomorrow_at_noon() {
        let result = run("schedule lunch with Alex tomorrow at noon");
        match result.action {
            Some(Action::CreateEvent(draft)) => {
                assert_eq!(draft.title, "Lunch with Alex");
                assert_eq!(draft.event_type, "lunch");
                assert_eq!(draft.start, Slot::stated(at(2026, 3, 3, 12, 0)));
                assert_eq!(draft.end, at(2026, 3, 3, 13, 0));
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_event_explicit_duration_and_default_start() {
        let result = run("book a meeting with the design team for 2 hours");
        match result.action {
            Some(Action::CreateEvent(draft)) => {
                assert_eq!(draft.title, "Meeting with the design team");
                assert_eq!(draft.duration, Slot::stated(120));
                assert_eq!(draft.start, Slot::defaulted(at(2026, 3, 2, 11, 0)));
                assert_eq!(draft.end, at(2026, 3, 2, 13, 0));
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_schedule_for_today() {
        let result = run("what's my schedule for today");
        match result.action {
            Some(Action::CheckSchedule(query)) => {
                assert_eq!(query.phrase, "today");
                assert_eq!(query.date, at(2026, 3, 2, 9, 0));
            }
            other => panic!("unexpected action {:?}", other),
        }

        match run("show my calendar").action {
            Some(Action::CheckSchedule(query)) => assert_eq!(query.phrase, "today"),
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_schedule_unknown_day_fails() {
        let result = run("what's my schedule for the heat death of the universe");
        assert!(!result.success);
        assert!(!result.suggestions.is_empty());
    }

    #[test]
    fn test_note_title_is_first_five_words() {
        let result = run("take a note about the offsite agenda for the whole team #planning");
        match result.action {
            Some(Action::CreateNote(draft)) => {
                assert_eq!(draft.title, "The offsite agenda for the");
                assert!(draft.content.ends_with("#planning"));
                assert_eq!(draft.tags, vec!["planning".to_string()]);
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_productivity_period() {
        match run("how productive am i this week").action {
            Some(Action::Productivity(query)) => assert_eq!(query.period, "week"),
            other => panic!("unexpected action {:?}", other),
        }
        match run("show my stats").action {
            Some(Action::Productivity(query)) => assert_eq!(query.period, "week"),
            other => panic!("unexpected action {:?}", other),
        }
        match run("how did i do last month").action {
            Some(Action::Productivity(query)) => assert_eq!(query.period, "month"),
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_suggestions_query_carries_ranking() {
        let processor = processor().with_suggestion_limit(2);
        let mut context = ConversationContext::new();
        let result = processor.process("what should i work on next", &Snapshot::default(), &mut context, now());

        match &result.action {
            Some(Action::GetSuggestions(query)) => {
                assert_eq!(query.area, "general");
                assert_eq!(query.suggestions.len(), 1);
            }
            other => panic!("unexpected action {:?}", other),
        }
        assert_eq!(result.suggestions, vec!["create task plan tomorrow".to_string()]);
    }

    #[test]
    fn test_help() {
        let result = run("help");
        assert_eq!(result.action, Some(Action::Help));
        assert!(!result.suggestions.is_empty());
    }

    #[test]
    fn test_gibberish_fails_with_suggestions() {
        let result = run("flarp zingle wumbo");
        assert!(!result.success);
        assert!(result.action.is_none());
        assert!(!result.suggestions.is_empty());
    }

    #[test]
    fn test_empty_input_is_not_recorded() {
        let mut context = ConversationContext::new();
        let result = processor().process("   ", &Snapshot::default(), &mut context, now());
        assert!(!result.success);
        assert!(!result.suggestions.is_empty());
        assert!(context.is_empty());
    }

    #[test]
    fn test_context_records_action_names() {
        let processor = processor();
        let mut context = ConversationContext::new();
        processor.process("create task buy milk", &Snapshot::default(), &mut context, now());
        processor.process("asdf", &Snapshot::default(), &mut context, now());

        let actions: Vec<Option<String>> = context.entries().map(|e| e.action.clone()).collect();
        assert_eq!(actions, vec![Some("createTask".to_string()), None]);
    }

    #[test]
    fn test_internal_failure_result() {
        let result = internal_failure();
        assert!(!result.success);
        assert!(result.message.starts_with("Sorry"));
        assert!(!result.suggestions.is_empty());
    }

    #[test]
    fn test_helpers() {
        assert_eq!(trim_connectors("call Sarah at"), "call Sarah");
        assert_eq!(lower_first("Call Sarah"), "call Sarah");
        assert_eq!(next_full_hour(at(2026, 3, 2, 23, 15)).unwrap(), at(2026, 3, 3, 0, 0));
    }
}
