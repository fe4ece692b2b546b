/// Fuzzy task matching
///
/// Resolves "complete the milk thing" against the user's open tasks.

use crate::db::Task;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::collections::HashSet;

/// Handles task lookup by free-text description
pub struct TaskMatcher {
    matcher: SkimMatcherV2,
}

impl TaskMatcher {
    pub fn new() -> Self {
        Self {
            matcher: SkimMatcherV2::default(),
        }
    }

    /// Open tasks matching a description.
    ///
    /// Tiers, first non-empty one wins:
    /// 1. exact title (case-insensitive)
    /// 2. substring either way
    /// 3. shared words >= min(2, words in description)
    ///
    /// Several hits come back best fuzzy score first.
    pub fn find_matches<'a>(&self, description: &str, tasks: &'a [Task]) -> Vec<&'a Task> {
        let wanted = description.trim().to_lowercase();
        if wanted.is_empty() {
            return Vec::new();
        }

        let open: Vec<&Task> = tasks.iter().filter(|t| !t.completed).collect();

        let exact: Vec<&Task> = open
            .iter()
            .copied()
            .filter(|t| t.title.to_lowercase() == wanted)
            .collect();
        if !exact.is_empty() {
            return exact;
        }

        let substring: Vec<&Task> = open
            .iter()
            .copied()
            .filter(|t| {
                let title = t.title.to_lowercase();
                title.contains(&wanted) || wanted.contains(&title)
            })
            .collect();
        if !substring.is_empty() {
            return self.rank(&wanted, substring);
        }

        let wanted_words: HashSet<&str> = wanted.split_whitespace().collect();
        let required = wanted_words.len().min(2);
        let overlapping: Vec<&Task> = open
            .iter()
            .copied()
            .filter(|t| {
                let title = t.title.to_lowercase();
                let shared = title
                    .split_whitespace()
                    .collect::<HashSet<_>>()
                    .intersection(&wanted_words)
                    .count();
                shared >= required
            })
            .collect();

        self.rank(&wanted, overlapping)
    }

    fn rank<'a>(&self, wanted: &str, tasks: Vec<&'a Task>) -> Vec<&'a Task> {
        let mut scored: Vec<(i64, &Task)> = tasks
            .into_iter()
            .map(|t| {
                let score = self.matcher.fuzzy_match(&t.title, wanted).unwrap_or(0);
                (score, t)
            })
            .collect();

        // stable: equal scores keep list order
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        scored.into_iter().map(|(_, t)| t).collect()
    }
}

impl Default for TaskMatcher {
    fn default() -> Self {
        Self::new()
    }
}
