/// Relative date/time resolution
///
/// Turns phrases like "tomorrow", "3pm" or "friday" into timestamps.
/// Everything here is a pure function of the phrase and the `now` passed in.

use crate::error::Result;
use crate::interpreter::normalizer::{contains_phrase, padded_words};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use regex::Regex;

/// Hour used when a phrase names a day but no time
pub const DEFAULT_HOUR: u32 = 9;

const WEEKDAYS: [(&str, Weekday); 7] = [
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sunday", Weekday::Sun),
];

const MONTHS: [&str; 24] = [
    "january", "february", "march", "april", "may", "june", "july", "august",
    "september", "october", "november", "december", "jan", "feb", "mar", "apr",
    "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec",
];

// Words allowed inside a purely temporal phrase
const TEMPORAL_WORDS: &[&str] = &[
    "at", "on", "in", "by", "this", "next", "the", "of", "around", "a", "an", "one", "two",
    "three", "today", "tomorrow", "tonight", "morning", "afternoon", "evening", "night",
    "noon", "midnight", "week", "month", "year", "minute", "minutes", "min", "mins", "hour",
    "hours", "hr", "hrs", "day", "days", "weeks", "am", "pm",
];

/// A stretch of words that resolved to a timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct TemporalSpan {
    pub phrase: String,
    /// The input with the phrase cut out
    pub remainder: String,
    pub at: NaiveDateTime,
}

pub struct DateResolver {
    time_re: Regex,
    relative_re: Regex,
    ordinal_re: Regex,
    numeric_token_re: Regex,
}

impl DateResolver {
    pub fn new() -> Result<Self> {
        Ok(Self {
            time_re: Regex::new(r"\b(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\b")?,
            relative_re: Regex::new(
                r"\bin\s+(\d+|an?|one|two|three)\s*(minutes?|mins?|hours?|hrs?|days?|weeks?)\b",
            )?,
            ordinal_re: Regex::new(r"\b(\d{1,2})(?:st|nd|rd|th)\b")?,
            numeric_token_re: Regex::new(r"^\d{1,4}(?:[:/\-.]\d{1,4})*(?:am|pm|st|nd|rd|th)?$")?,
        })
    }

    /// Resolve a phrase against `now`. The first rule that applies wins;
    /// rules are never combined ("next week at 3pm" is next week, 09:00).
    pub fn resolve(&self, phrase: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let lowered = phrase.trim().to_lowercase();
        if lowered.is_empty() {
            return None;
        }
        let padded = padded_words(&lowered);
        let today = now.date();

        if contains_phrase(&padded, "today") {
            return at_default_hour(today);
        }
        if contains_phrase(&padded, "tomorrow") {
            return today.succ_opt().and_then(at_default_hour);
        }
        if lowered.contains("next week") {
            return today
                .checked_add_signed(Duration::days(7))
                .and_then(at_default_hour);
        }
        if let Some((time, _)) = self.find_time(&lowered) {
            // next occurrence: a time that isn't strictly ahead means tomorrow
            let candidate = today.and_time(time);
            return if candidate > now {
                Some(candidate)
            } else {
                candidate.checked_add_signed(Duration::days(1))
            };
        }
        if let Some(target) = find_weekday(&padded) {
            let mut days = target.num_days_from_monday() as i64
                - now.weekday().num_days_from_monday() as i64;
            if days <= 0 {
                days += 7;
            }
            return now.checked_add_signed(Duration::days(days));
        }
        if let Some(offset) = self.relative_offset(&lowered) {
            return now.checked_add_signed(offset);
        }

        self.parse_absolute(&lowered, now)
    }

    /// Like `resolve`, but a time of day is applied on top of whatever day
    /// the rest of the phrase names ("tomorrow at 3pm", "friday at 10:30").
    pub fn resolve_combined(&self, phrase: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let lowered = phrase.trim().to_lowercase();
        let Some((time, (start, end))) = self.find_time(&lowered) else {
            return self.resolve(phrase, now);
        };

        let day_part = format!("{} {}", &lowered[..start], &lowered[end..]);
        match self.resolve(&day_part, now) {
            Some(day) => Some(day.date().and_time(time)),
            None => self.resolve(phrase, now),
        }
    }

    /// Finds the earliest, longest run of temporal words that resolves.
    pub fn extract_span(&self, text: &str, now: NaiveDateTime) -> Option<TemporalSpan> {
        let words: Vec<&str> = text.split_whitespace().collect();

        for start in 0..words.len() {
            if !self.is_temporal_word(words[start]) {
                continue;
            }
            for end in (start + 1..=words.len()).rev() {
                if !words[start..end].iter().all(|w| self.is_temporal_word(w)) {
                    continue;
                }
                let phrase = words[start..end].join(" ");
                if let Some(at) = self.resolve_combined(&phrase, now) {
                    let remainder = words[..start]
                        .iter()
                        .chain(words[end..].iter())
                        .copied()
                        .collect::<Vec<_>>()
                        .join(" ");
                    return Some(TemporalSpan {
                        phrase,
                        remainder,
                        at,
                    });
                }
            }
        }

        None
    }

    fn is_temporal_word(&self, word: &str) -> bool {
        let w = word
            .trim_matches(|c: char| matches!(c, ',' | '.' | ';' | '!' | '?'))
            .to_lowercase();
        if w.is_empty() {
            return false;
        }
        TEMPORAL_WORDS.contains(&w.as_str())
            || WEEKDAYS.iter().any(|(name, _)| *name == w)
            || MONTHS.contains(&w.as_str())
            || self.numeric_token_re.is_match(&w)
    }

    /// Clock time in the phrase, with its byte span. Bare numbers don't
    /// count: "5" is not a time, "5pm" and "17:00" are.
    fn find_time(&self, lowered: &str) -> Option<(NaiveTime, (usize, usize))> {
        for caps in self.time_re.captures_iter(lowered) {
            let Some(whole) = caps.get(0) else { continue };
            let Ok(mut hour) = caps[1].parse::<u32>() else { continue };
            let minute = caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok());
            let meridiem = caps.get(3).map(|m| m.as_str());

            match meridiem {
                Some(half) => {
                    if hour == 0 || hour > 12 {
                        continue;
                    }
                    hour %= 12;
                    if half == "pm" {
                        hour += 12;
                    }
                }
                None if minute.is_none() => continue,
                None => {}
            }

            if let Some(time) = NaiveTime::from_hms_opt(hour, minute.unwrap_or(0), 0) {
                return Some((time, (whole.start(), whole.end())));
            }
        }

        for (word, hour) in [("noon", 12), ("midnight", 0)] {
            if let Some(start) = find_word(lowered, word) {
                let time = NaiveTime::from_hms_opt(hour, 0, 0)?;
                return Some((time, (start, start + word.len())));
            }
        }

        None
    }

    fn relative_offset(&self, lowered: &str) -> Option<Duration> {
        let caps = self.relative_re.captures(lowered)?;
        let amount: i64 = match &caps[1] {
            "a" | "an" | "one" => 1,
            "two" => 2,
            "three" => 3,
            digits => digits.parse().ok()?,
        };
        let unit = &caps[2];

        // amounts past chrono's range don't resolve
        if unit.starts_with("min") {
            Duration::try_minutes(amount)
        } else if unit.starts_with('h') {
            Duration::try_hours(amount)
        } else if unit.starts_with('d') {
            Duration::try_days(amount)
        } else {
            Duration::try_weeks(amount)
        }
    }

    /// Generic date formats. Year-less dates mean the next time that date
    /// comes around.
    fn parse_absolute(&self, lowered: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let cleaned = self.ordinal_re.replace_all(lowered, "$1").replace(',', " ");
        let cleaned = cleaned
            .trim_start_matches("on ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        for format in ["%Y-%m-%d", "%m/%d/%Y", "%B %d %Y", "%d %B %Y"] {
            if let Ok(date) = NaiveDate::parse_from_str(&cleaned, format) {
                return at_default_hour(date);
            }
        }

        let today = now.date();
        for format in ["%B %d %Y", "%d %B %Y"] {
            let with_year = format!("{} {}", cleaned, today.year());
            if let Ok(date) = NaiveDate::parse_from_str(&with_year, format) {
                let date = if date < today {
                    date.with_year(today.year() + 1)?
                } else {
                    date
                };
                return at_default_hour(date);
            }
        }

        None
    }
}

fn at_default_hour(date: NaiveDate) -> Option<NaiveDateTime> {
    date.and_hms_opt(DEFAULT_HOUR, 0, 0)
}

/// Byte offset of `word` standing on its own, so "noon" never hits "afternoon"
fn find_word(text: &str, word: &str) -> Option<usize> {
    text.match_indices(word).map(|(start, _)| start).find(|&start| {
        let before = text[..start].chars().next_back();
        let after = text[start + word.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

fn find_weekday(padded: &str) -> Option<Weekday> {
    WEEKDAYS
        .iter()
        .find(|(name, _)| contains_phrase(padded, name))
        .map(|(_, day)| *day)
}
