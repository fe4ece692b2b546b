// Slot extraction: pulls priority, duration, category, tags and due dates
// out of free text.
//
// All lookups are keyword tables checked in order. Nothing here fails; a slot
// with nothing to go on gets its default and says so via SlotSource.

use crate::db::{Category, Priority};
use crate::error::Result;
use crate::interpreter::command::Slot;
use crate::interpreter::normalizer::{contains_phrase, padded_words};
use regex::Regex;

pub const DEFAULT_TASK_MINUTES: u32 = 60;
pub const SIMPLE_TASK_MINUTES: u32 = 30;
pub const COMPLEX_TASK_MINUTES: u32 = 120;
pub const DEFAULT_EVENT_MINUTES: u32 = 60;

// Checked in this order, so urgency beats everything else
const PRIORITY_KEYWORDS: &[(Priority, &[&str])] = &[
    (
        Priority::Urgent,
        &["urgent", "asap", "immediately", "critical", "emergency"],
    ),
    (Priority::High, &["important", "high priority", "soon"]),
    (
        Priority::Low,
        &["low priority", "whenever", "someday", "eventually", "no rush"],
    ),
];

const COMPLEX_KEYWORDS: &[&str] = &[
    "research", "analyze", "analyse", "develop", "design", "build", "implement", "prepare",
    "plan", "study", "write", "report", "presentation",
];

const SIMPLE_KEYWORDS: &[&str] = &[
    "call", "email", "text", "reply", "check", "send", "quick", "pay", "ping",
];

const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Work,
        &[
            "meeting", "project", "client", "report", "presentation", "deadline", "office",
            "boss", "colleague", "proposal", "work",
        ],
    ),
    (
        Category::Personal,
        &["family", "friend", "birthday", "mom", "dad", "anniversary", "party"],
    ),
    (
        Category::Health,
        &[
            "doctor", "dentist", "gym", "workout", "exercise", "medicine", "medication", "yoga",
            "run",
        ],
    ),
    (
        Category::Shopping,
        &["buy", "shop", "shopping", "groceries", "grocery", "purchase", "order", "pick up"],
    ),
    (
        Category::Finance,
        &["pay", "bill", "bank", "tax", "taxes", "budget", "invoice", "rent", "insurance"],
    ),
    (
        Category::Learning,
        &["study", "learn", "course", "read", "lecture", "homework", "practice"],
    ),
    (
        Category::Household,
        &["clean", "laundry", "dishes", "repair", "fix", "vacuum", "trash", "cook"],
    ),
];

// Event keyword -> (event type, typical length in minutes)
const EVENT_TYPES: &[(&str, &str, u32)] = &[
    ("standup", "standup", 15),
    ("stand-up", "standup", 15),
    ("lunch", "lunch", 60),
    ("dinner", "dinner", 90),
    ("breakfast", "breakfast", 45),
    ("coffee", "coffee", 30),
    ("interview", "interview", 60),
    ("meeting", "meeting", 60),
    ("call", "call", 30),
    ("appointment", "appointment", 60),
    ("party", "party", 120),
];

const REMINDER_TYPES: &[(&str, &[&str])] = &[
    ("call", &["call", "phone", "ring"]),
    ("email", &["email", "mail", "reply"]),
    ("meeting", &["meeting", "standup", "interview"]),
    ("medication", &["medication", "medicine", "pill", "pills", "meds"]),
    ("payment", &["pay", "bill", "rent", "invoice"]),
];

// Words dropped from the front of an event title
const EVENT_FILLER: &[&str] = &["a", "an", "the", "new", "event"];

pub struct SlotExtractor {
    duration_re: Regex,
    hashtag_re: Regex,
    group_tag_re: Regex,
    due_clause_re: Regex,
    relative_clause_re: Regex,
}

impl SlotExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            duration_re: Regex::new(
                r"(?i)\b(?:for\s+)?(\d+(?:\.\d+)?)\s*(hours?|hrs?|h|minutes?|mins?|m)\b",
            )?,
            hashtag_re: Regex::new(r"#([\w-]+)")?,
            group_tag_re: Regex::new(r"(?i)\b(?:project|client|team)\s+([a-z0-9][\w-]*)")?,
            due_clause_re: Regex::new(r"(?i)^(.+?)\s+(?:due by|due on|due|by|before)\s+(.+)$")?,
            relative_clause_re: Regex::new(
                r"(?i)^(.+?)\s+(in\s+(?:\d+|an?|one|two|three)\s*(?:minutes?|mins?|hours?|hrs?|days?|weeks?))$",
            )?,
        })
    }

    pub fn detect_priority(&self, text: &str) -> Slot<Priority> {
        let padded = padded_words(text);
        PRIORITY_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| contains_phrase(&padded, k)))
            .map(|(priority, _)| Slot::stated(*priority))
            .unwrap_or_else(|| Slot::defaulted(Priority::Medium))
    }

    /// Explicit "N hours/minutes" wins; otherwise keyword complexity
    pub fn estimate_duration(&self, text: &str) -> Slot<u32> {
        if let Some(minutes) = self.explicit_minutes(text) {
            return Slot::stated(minutes);
        }

        let padded = padded_words(text);
        if COMPLEX_KEYWORDS.iter().any(|k| contains_phrase(&padded, k)) {
            return Slot::inferred(COMPLEX_TASK_MINUTES);
        }
        if SIMPLE_KEYWORDS.iter().any(|k| contains_phrase(&padded, k)) {
            return Slot::inferred(SIMPLE_TASK_MINUTES);
        }

        Slot::defaulted(DEFAULT_TASK_MINUTES)
    }

    /// "for 2 hours" is a duration; "in 2 hours" is a point in time and
    /// is left to the date resolver.
    pub fn explicit_minutes(&self, text: &str) -> Option<u32> {
        let caps = self
            .duration_re
            .captures_iter(text)
            .find(|caps| caps.get(0).is_some_and(|m| !follows_in(text, m.start())))?;
        let amount: f64 = caps[1].parse().ok()?;
        let unit = caps[2].to_lowercase();

        let minutes = if unit.starts_with('h') {
            amount * 60.0
        } else {
            amount
        };
        if minutes <= 0.0 {
            return None;
        }

        Some(minutes.round() as u32)
    }

    pub fn detect_category(&self, text: &str) -> Slot<Category> {
        let padded = padded_words(text);
        CATEGORY_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| contains_phrase(&padded, k)))
            .map(|(category, _)| Slot::inferred(*category))
            .unwrap_or_else(|| Slot::defaulted(Category::General))
    }

    /// Hashtags plus "project X", "client X", "team X", lowercased, deduped
    pub fn extract_tags(&self, text: &str) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();

        let found = self
            .hashtag_re
            .captures_iter(text)
            .chain(self.group_tag_re.captures_iter(text))
            .map(|caps| caps[1].to_lowercase());

        for tag in found {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        tags
    }

    pub fn strip_hashtags(&self, text: &str) -> String {
        self.hashtag_re
            .replace_all(text, "")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Splits "pay rent by friday" into ("pay rent", "friday") and
    /// "call mom in 30 minutes" into ("call mom", "in 30 minutes")
    pub fn split_due_clause<'a>(&self, text: &'a str) -> Option<(&'a str, &'a str)> {
        let caps = self
            .due_clause_re
            .captures(text)
            .or_else(|| self.relative_clause_re.captures(text))?;
        let head = caps.get(1)?.as_str();
        let clause = caps.get(2)?.as_str();
        Some((head, clause))
    }

    /// Event type and its typical length, from the first keyword present
    pub fn event_type(&self, text: &str) -> (&'static str, Slot<u32>) {
        let padded = padded_words(text);
        let found = EVENT_TYPES
            .iter()
            .find(|(keyword, _, _)| contains_phrase(&padded, keyword));

        match (found, self.explicit_minutes(text)) {
            (Some(&(_, kind, _)), Some(minutes)) => (kind, Slot::stated(minutes)),
            (Some(&(_, kind, minutes)), None) => (kind, Slot::inferred(minutes)),
            (None, Some(minutes)) => ("event", Slot::stated(minutes)),
            (None, None) => ("event", Slot::defaulted(DEFAULT_EVENT_MINUTES)),
        }
    }

    /// Strips duration phrases and leading filler words from an event
    /// description. Relative times ("in 2 hours") stay for the resolver.
    pub fn clean_event_title(&self, text: &str) -> String {
        let mut without_duration = String::with_capacity(text.len());
        let mut last = 0;
        for m in self.duration_re.find_iter(text) {
            if follows_in(text, m.start()) {
                continue;
            }
            without_duration.push_str(&text[last..m.start()]);
            without_duration.push(' ');
            last = m.end();
        }
        without_duration.push_str(&text[last..]);

        let mut words: Vec<&str> = without_duration.split_whitespace().collect();

        while let Some(first) = words.first() {
            if EVENT_FILLER.contains(&first.to_lowercase().as_str()) {
                words.remove(0);
            } else {
                break;
            }
        }
        // dangling connectors left behind by removed phrases
        while let Some(last) = words.last() {
            if matches!(last.to_lowercase().as_str(), "at" | "on" | "for" | "from" | "in") {
                words.pop();
            } else {
                break;
            }
        }

        words.join(" ")
    }

    pub fn reminder_type(&self, text: &str) -> &'static str {
        let padded = padded_words(text);
        REMINDER_TYPES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| contains_phrase(&padded, k)))
            .map(|(kind, _)| *kind)
            .unwrap_or("general")
    }
}

// Whether the word right before byte `start` is "in"
fn follows_in(text: &str, start: usize) -> bool {
    text[..start]
        .split_whitespace()
        .next_back()
        .is_some_and(|word| word.eq_ignore_ascii_case("in"))
}

/// First `max` words of a text
pub fn leading_words(text: &str, max: usize) -> String {
    text.split_whitespace()
        .take(max)
        .collect::<Vec<_>>()
        .join(" ")
}
