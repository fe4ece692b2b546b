// Cleans up raw input before anything tries to match it
//
// Matching runs case-insensitively on `text` so captured titles keep the
// user's capitalization. Keyword lookups use `lowered`.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    /// Whitespace-collapsed, trailing punctuation removed, case preserved
    pub text: String,
    pub lowered: String,
}

impl Utterance {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

pub fn normalize(raw: &str) -> Utterance {
    let collapsed = raw
        .replace('\0', "")
        .replace(['\u{2018}', '\u{2019}'], "'")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let text = collapsed
        .trim_end_matches(|c: char| matches!(c, '.' | '!' | '?'))
        .trim_end()
        .to_string();
    let lowered = text.to_lowercase();

    Utterance { text, lowered }
}

/// Pads a phrase as " word word " so whole-word lookups are a plain `contains`
pub(crate) fn padded_words(text: &str) -> String {
    let words: Vec<String> = text
        .to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '-'))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect();

    format!(" {} ", words.join(" "))
}

pub(crate) fn contains_phrase(padded: &str, phrase: &str) -> bool {
    padded.contains(&format!(" {} ", phrase))
}

/// Uppercases the first character, leaves the rest alone
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
