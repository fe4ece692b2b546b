// The intent table: which utterances mean what
//
// Rules are evaluated in ascending priority, declaration order breaking
// ties. The first rule whose pattern matches the whole utterance wins.
// `matching_intents` lists every intent that would have matched, which is
// how the tests catch two intents fighting over the same phrasing.

use crate::error::Result;
use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum IntentKind {
    CreateReminder,
    CreateTask,
    CompleteTask,
    CreateNote,
    CreateEvent,
    CheckSchedule,
    Productivity,
    GetSuggestions,
    Help,
}

impl IntentKind {
    pub fn name(&self) -> &'static str {
        match self {
            IntentKind::CreateReminder => "createReminder",
            IntentKind::CreateTask => "createTask",
            IntentKind::CompleteTask => "completeTask",
            IntentKind::CreateNote => "createNote",
            IntentKind::CreateEvent => "createEvent",
            IntentKind::CheckSchedule => "checkSchedule",
            IntentKind::Productivity => "productivity",
            IntentKind::GetSuggestions => "getSuggestions",
            IntentKind::Help => "help",
        }
    }
}

impl std::fmt::Display for IntentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// (intent, priority, pattern). Patterns get the (?i) flag and are anchored.
const RULES: &[(IntentKind, u8, &str)] = &[
    // Reminders go first: "remind me to finish X" is a reminder, not a task
    (IntentKind::CreateReminder, 10, r"remind me (?:to |about |that )?(.+)"),
    (IntentKind::CreateReminder, 10, r"(?:set|create|add|make) (?:a |an )?reminder (?:to |for |about |that )?(.+)"),
    (IntentKind::CreateReminder, 10, r"don'?t let me forget (?:to |about )?(.+)"),
    (IntentKind::CreateTask, 20, r"(?:create|add|make|new) (?:a |an )?(?:new )?(?:task|todo|to-do)(?::| to| called| named)? (.+)"),
    (IntentKind::CreateTask, 20, r"(?:i need to|i have to|i must|i should|todo:?) (.+)"),
    (IntentKind::CompleteTask, 30, r"(?:complete|finish|done with|mark|check off|tick off) (?:the )?(?:task )?(.+?)(?: as (?:done|complete|completed|finished))?"),
    (IntentKind::CompleteTask, 30, r"i(?: finished| completed| did| am done with|'m done with) (?:the )?(?:task )?(.+)"),
    (IntentKind::CreateNote, 40, r"(?:create|add|make|take|write|new) (?:a |an )?note(?::| about| on| that| saying)? (.+)"),
    (IntentKind::CreateNote, 40, r"note:? (.+)"),
    (IntentKind::CreateNote, 40, r"(?:jot down|write down) (.+)"),
    (IntentKind::CreateEvent, 50, r"(?:schedule|book|plan|arrange|set up) (?:a |an )?(.+)"),
    (IntentKind::CreateEvent, 50, r"(?:add|create|put) (?:a |an )?(?:new )?((?:event|meeting|appointment|call)\b.*)"),
    (IntentKind::CheckSchedule, 60, r"what(?:'s| is) (?:on )?my (?:schedule|calendar|agenda)(?: (?:for|on))?(?: (.+))?"),
    (IntentKind::CheckSchedule, 60, r"(?:show|check|view|get) (?:me )?my (?:schedule|calendar|agenda)(?: (?:for|on))?(?: (.+))?"),
    (IntentKind::CheckSchedule, 60, r"what do i have(?: (?:on|planned|scheduled|going on))?(?: (?:for|on))?(?: (.+))?"),
    (IntentKind::CheckSchedule, 60, r"am i (?:free|busy)(?: (?:on|for))?(?: (.+))?"),
    (IntentKind::Productivity, 70, r"(?:how productive (?:am i|was i|have i been)|how am i doing|how did i do)(?: (.+))?"),
    (IntentKind::Productivity, 70, r"(?:show|get|view) (?:me )?(?:my )?(?:productivity|stats|statistics|analytics|progress)(?: (?:for|over))?(?: (.+))?"),
    (IntentKind::GetSuggestions, 80, r"what should i (?:do|work on|focus on)(?: (?:next|now|first))?(?: (?:for|about|on) (.+))?"),
    (IntentKind::GetSuggestions, 80, r"(?:any |give me |show me )?(?:suggestions|recommendations|ideas)(?: (?:for|about|on) (.+))?"),
    (IntentKind::GetSuggestions, 80, r"suggest(?: something)?(?: (?:for|about|on) (.+))?"),
    (IntentKind::Help, 90, r"(?:help|what can you do|commands|how does this work)"),
];

pub struct IntentRule {
    pub intent: IntentKind,
    pub priority: u8,
    regex: Regex,
}

impl IntentRule {
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

/// Which intent matched, plus its capture groups
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub intent: IntentKind,
    /// Group 1.. in order; groups that didn't participate are empty strings
    pub captures: Vec<String>,
}

impl MatchResult {
    /// Non-empty capture by zero-based index
    pub fn capture(&self, index: usize) -> Option<&str> {
        self.captures
            .get(index)
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
    }
}

pub struct IntentTable {
    rules: Vec<IntentRule>,
}

impl IntentTable {
    pub fn new() -> Result<Self> {
        let mut rules = RULES
            .iter()
            .map(|(intent, priority, pattern)| {
                let regex = Regex::new(&format!("(?i)^(?:{})$", pattern))?;
                Ok(IntentRule {
                    intent: *intent,
                    priority: *priority,
                    regex,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        // stable, so declaration order survives inside a priority level
        rules.sort_by_key(|rule| rule.priority);

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    /// First matching rule, or None
    pub fn find_match(&self, text: &str) -> Option<MatchResult> {
        self.rules.iter().find_map(|rule| {
            rule.regex.captures(text).map(|caps| MatchResult {
                intent: rule.intent,
                captures: caps
                    .iter()
                    .skip(1)
                    .map(|group| group.map(|g| g.as_str().to_string()).unwrap_or_default())
                    .collect(),
            })
        })
    }

    /// All intents with at least one matching rule, in evaluation order
    pub fn matching_intents(&self, text: &str) -> Vec<IntentKind> {
        let mut intents = Vec::new();
        for rule in &self.rules {
            if rule.regex.is_match(text) && !intents.contains(&rule.intent) {
                intents.push(rule.intent);
            }
        }
        intents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> IntentTable {
        IntentTable::new().unwrap()
    }

    #[test]
    fn test_rules_sorted_by_priority() {
        let table = table();
        let priorities: Vec<u8> = table.rules().iter().map(|r| r.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);
        assert!(table.rules().iter().all(|r| r.pattern().starts_with("(?i)^")));
    }

    #[test]
    fn test_create_task_capture_keeps_case() {
        let m = table().find_match("Create task Call Sarah").unwrap();
        assert_eq!(m.intent, IntentKind::CreateTask);
        assert_eq!(m.capture(0), Some("Call Sarah"));
    }

    #[test]
    fn test_complete_task_strips_suffix() {
        let m = table().find_match("mark buy milk as done").unwrap();
        assert_eq!(m.intent, IntentKind::CompleteTask);
        assert_eq!(m.capture(0), Some("buy milk"));

        let m = table().find_match("complete buy").unwrap();
        assert_eq!(m.capture(0), Some("buy"));
    }

    #[test]
    fn test_optional_capture_is_none() {
        let m = table().find_match("what's my schedule").unwrap();
        assert_eq!(m.intent, IntentKind::CheckSchedule);
        assert_eq!(m.capture(0), None);

        let m = table().find_match("what's my schedule for today").unwrap();
        assert_eq!(m.capture(0), Some("today"));
    }

    #[test]
    fn test_whole_utterance_only() {
        assert!(table().find_match("please help me out here").is_none());
        assert_eq!(table().find_match("help").unwrap().intent, IntentKind::Help);
    }

    #[test]
    fn test_reminder_outranks_task_phrasing() {
        let m = table().find_match("remind me to complete the report").unwrap();
        assert_eq!(m.intent, IntentKind::CreateReminder);
    }

    #[test]
    fn test_canonical_phrasings_have_one_intent() {
        let table = table();
        let samples = [
            ("create task buy milk", IntentKind::CreateTask),
            ("add a task to call the bank by friday", IntentKind::CreateTask),
            ("i need to renew my passport", IntentKind::CreateTask),
            ("complete task buy milk", IntentKind::CompleteTask),
            ("i finished the report", IntentKind::CompleteTask),
            ("take a note about the offsite", IntentKind::CreateNote),
            ("note: wifi password is on the fridge", IntentKind::CreateNote),
            ("jot down gift ideas for mom", IntentKind::CreateNote),
            ("remind me to call Sarah at 3pm", IntentKind::CreateReminder),
            ("set a reminder to water the plants", IntentKind::CreateReminder),
            ("schedule lunch with Alex tomorrow", IntentKind::CreateEvent),
            ("add a meeting with the design team on friday", IntentKind::CreateEvent),
            ("what's my schedule for today", IntentKind::CheckSchedule),
            ("show my calendar for tomorrow", IntentKind::CheckSchedule),
            ("what do i have on monday", IntentKind::CheckSchedule),
            ("how productive am i this week", IntentKind::Productivity),
            ("show my stats", IntentKind::Productivity),
            ("what should i work on next", IntentKind::GetSuggestions),
            ("any suggestions", IntentKind::GetSuggestions),
            ("help", IntentKind::Help),
        ];

        for (sample, expected) in samples {
            let intents = table.matching_intents(sample);
            assert_eq!(intents, vec![expected], "'{}' matched {:?}", sample, intents);
        }
    }

    #[test]
    fn test_known_overlap_resolved_by_priority() {
        // the leading verb decides, not the word "schedule" further in
        let table = table();
        let intents = table.matching_intents("remind me to schedule a dentist visit");
        assert_eq!(intents, vec![IntentKind::CreateReminder]);

        let intents = table.matching_intents("i need to schedule a dentist visit");
        assert_eq!(intents, vec![IntentKind::CreateTask]);
    }
}
