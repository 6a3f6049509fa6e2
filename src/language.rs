//! Language detection seam.
//!
//! The normalizer asks a [`LanguageDetector`] about each substantial cleaned
//! element and takes a majority vote. Any backend can be plugged in; the
//! bundled [`ScriptDetector`] only tells scripts apart.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A language code as returned by a detector (e.g. `en`, `am`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Create a code; stored lowercase.
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_ascii_lowercase())
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Detected document language.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Language {
    /// A detector returned this code
    Known(LanguageCode),
    /// No element qualified or detection never succeeded
    #[default]
    Unknown,
}

impl Language {
    /// Code string, `unknown` when undetected.
    pub fn as_str(&self) -> &str {
        match self {
            Language::Known(code) => code.as_str(),
            Language::Unknown => "unknown",
        }
    }

    /// Check if a language was detected.
    pub fn is_known(&self) -> bool {
        matches!(self, Language::Known(_))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.as_str().to_string()
    }
}

impl From<String> for Language {
    fn from(code: String) -> Self {
        if code.trim().is_empty() || code.eq_ignore_ascii_case("unknown") {
            Language::Unknown
        } else {
            Language::Known(LanguageCode::new(code))
        }
    }
}

/// Why a detector gave no answer for a piece of text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetectionError {
    /// The text carries no usable signal.
    #[error("language could not be determined")]
    Undetectable,

    /// The backend failed.
    #[error("language detector failed: {0}")]
    Backend(String),
}

/// External language identification capability.
pub trait LanguageDetector: Send + Sync {
    /// Detect the language of `text`.
    fn detect(&self, text: &str) -> Result<LanguageCode, DetectionError>;
}

impl<F> LanguageDetector for F
where
    F: Fn(&str) -> Result<LanguageCode, DetectionError> + Send + Sync,
{
    fn detect(&self, text: &str) -> Result<LanguageCode, DetectionError> {
        self(text)
    }
}

/// Script families [`ScriptDetector`] recognizes, with the code reported.
const SCRIPTS: &[(&str, fn(char) -> bool)] = &[
    ("en", is_latin),
    ("am", is_ethiopic),
    ("ar", is_arabic),
    ("zh", is_cjk),
];

fn is_latin(c: char) -> bool {
    c.is_ascii_alphabetic() || ('\u{00C0}'..='\u{024F}').contains(&c)
}

fn is_ethiopic(c: char) -> bool {
    ('\u{1200}'..='\u{137F}').contains(&c)
}

fn is_arabic(c: char) -> bool {
    ('\u{0600}'..='\u{06FF}').contains(&c)
}

fn is_cjk(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

/// Script-majority detector.
///
/// Reports the script holding a strict majority of the letters. Latin text
/// is reported as `en`, so it cannot separate languages sharing a script.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptDetector;

impl ScriptDetector {
    /// Create a new detector.
    pub fn new() -> Self {
        Self
    }
}

impl LanguageDetector for ScriptDetector {
    fn detect(&self, text: &str) -> Result<LanguageCode, DetectionError> {
        let mut counts = [0usize; SCRIPTS.len()];
        let mut letters = 0usize;

        for c in text.chars().filter(|c| c.is_alphabetic()) {
            letters += 1;
            if let Some(index) = SCRIPTS.iter().position(|(_, test)| test(c)) {
                counts[index] += 1;
            }
        }

        if letters == 0 {
            return Err(DetectionError::Undetectable);
        }

        SCRIPTS
            .iter()
            .zip(counts)
            .find(|(_, count)| count * 2 > letters)
            .map(|((code, _), _)| LanguageCode::new(code))
            .ok_or(DetectionError::Undetectable)
    }
}

/// Most frequent code; ties go to the code encountered first.
pub fn vote(codes: &[LanguageCode]) -> Language {
    let mut tally: Vec<(&LanguageCode, usize)> = Vec::new();
    for code in codes {
        match tally.iter().position(|(seen, _)| *seen == code) {
            Some(index) => tally[index].1 += 1,
            None => tally.push((code, 1)),
        }
    }

    let mut best: Option<(&LanguageCode, usize)> = None;
    for (code, count) in tally {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((code, count));
        }
    }

    best.map(|(code, _)| Language::Known(code.clone()))
        .unwrap_or(Language::Unknown)
}
