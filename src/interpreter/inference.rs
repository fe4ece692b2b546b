// Keyword fallback for utterances no rule matched.
//
// Nothing here produces an action. The goal is a clarifying answer that
// points the user at a phrasing that would have worked.

use crate::interpreter::command::CommandResult;
use crate::interpreter::normalizer::{contains_phrase, padded_words};
use crate::interpreter::suggestions::help_suggestions;

struct Bucket {
    name: &'static str,
    keywords: &'static [&'static str],
    message: &'static str,
    suggestions: &'static [&'static str],
}

// Checked in order; the first bucket with a keyword present answers
const BUCKETS: &[Bucket] = &[
    Bucket {
        name: "task",
        keywords: &["task", "todo", "to-do", "chore", "errand", "finish", "done"],
        message: "It sounds like this is about a task. Try phrasing it like one of these:",
        suggestions: &[
            "create task <what needs doing>",
            "complete task <task name>",
            "i need to <what needs doing> by friday",
        ],
    },
    Bucket {
        name: "schedule",
        keywords: &["schedule", "calendar", "agenda", "meeting", "appointment", "event", "busy", "free"],
        message: "It sounds like this is about your calendar. Try:",
        suggestions: &[
            "what's my schedule for today",
            "schedule a meeting with the team tomorrow at 10am",
            "am i free on friday",
        ],
    },
    Bucket {
        name: "note",
        keywords: &["note", "notes", "write", "jot", "idea", "ideas", "remember"],
        message: "Want to save a note? Try:",
        suggestions: &["take a note about <topic>", "note: <what to remember>"],
    },
    Bucket {
        name: "reminder",
        keywords: &["remind", "reminder", "reminders", "alert", "forget", "ping"],
        message: "Want a reminder? Try:",
        suggestions: &[
            "remind me to <something> at 3pm",
            "set a reminder to <something> tomorrow",
        ],
    },
    Bucket {
        name: "query",
        keywords: &["what", "when", "how", "show", "list", "which", "stats", "progress", "productive"],
        message: "Not sure what you're asking. You can ask things like:",
        suggestions: &[
            "what's my schedule for tomorrow",
            "how productive am i this week",
            "what should i work on next",
        ],
    },
];

/// Clarifying failure for an utterance with no matching rule
pub fn infer(text: &str) -> CommandResult {
    let padded = padded_words(text);

    match BUCKETS
        .iter()
        .find(|bucket| bucket.keywords.iter().any(|k| contains_phrase(&padded, k)))
    {
        Some(bucket) => {
            tracing::debug!(bucket = bucket.name, "inferred intent area");
            CommandResult::failure(bucket.message).with_suggestions(bucket.suggestions.iter().copied())
        }
        None => CommandResult::failure(
            "I'm not sure what you mean. Here are some things you can say:",
        )
        .with_suggestions(help_suggestions()),
    }
}
