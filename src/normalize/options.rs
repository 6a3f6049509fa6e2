//! Cleaning levels and pass configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cleaning intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleaningLevel {
    /// Unicode, invisible characters, line breaks and whitespace only
    Minimal,
    /// Minimal plus header/footer removal
    #[default]
    Standard,
    /// Standard plus redundant-content filtering
    Aggressive,
}

impl CleaningLevel {
    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CleaningLevel::Minimal => "minimal",
            CleaningLevel::Standard => "standard",
            CleaningLevel::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for CleaningLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CleaningLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(CleaningLevel::Minimal),
            "standard" => Ok(CleaningLevel::Standard),
            "aggressive" => Ok(CleaningLevel::Aggressive),
            _ => Err(Error::InvalidCleaningLevel(s.to_string())),
        }
    }
}

/// Which cleaning passes run, derived from a [`CleaningLevel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleaningOptions {
    /// Level these options were built from (reported in results)
    pub level: CleaningLevel,

    /// Drop page-number, confidentiality, date, chapter and copyright lines
    pub remove_headers_footers: bool,

    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Strip zero-width, BOM, non-standard spaces and control characters
    pub remove_invisible_chars: bool,

    /// Normalize line endings and join wrongly-wrapped sentences
    pub repair_line_breaks: bool,

    /// Collapse spaces and tabs, trim lines, cap blank-line runs
    pub standardize_whitespace: bool,

    /// Drop short, symbol-heavy and repeated lines
    pub filter_redundant: bool,

    /// Run the language detector on cleaned elements
    pub detect_language: bool,

    /// Elements must be longer than this (in characters) to vote on language
    pub language_min_chars: usize,
}

impl CleaningOptions {
    /// Create options from a level.
    pub fn from_level(level: CleaningLevel) -> Self {
        match level {
            CleaningLevel::Minimal => Self::minimal(),
            CleaningLevel::Standard => Self::standard(),
            CleaningLevel::Aggressive => Self::aggressive(),
        }
    }

    /// Minimal cleaning options.
    pub fn minimal() -> Self {
        Self {
            level: CleaningLevel::Minimal,
            remove_headers_footers: false,
            normalize_unicode: true,
            remove_invisible_chars: true,
            repair_line_breaks: true,
            standardize_whitespace: true,
            filter_redundant: false,
            detect_language: true,
            language_min_chars: 50,
        }
    }

    /// Standard cleaning options.
    pub fn standard() -> Self {
        Self {
            level: CleaningLevel::Standard,
            remove_headers_footers: true,
            ..Self::minimal()
        }
    }

    /// Aggressive cleaning options.
    pub fn aggressive() -> Self {
        Self {
            level: CleaningLevel::Aggressive,
            filter_redundant: true,
            ..Self::standard()
        }
    }

    /// Enable or disable header/footer removal.
    pub fn with_header_footer_removal(mut self, enabled: bool) -> Self {
        self.remove_headers_footers = enabled;
        self
    }

    /// Enable or disable redundant-content filtering.
    pub fn with_redundant_filter(mut self, enabled: bool) -> Self {
        self.filter_redundant = enabled;
        self
    }

    /// Enable or disable language detection.
    pub fn with_language_detection(mut self, enabled: bool) -> Self {
        self.detect_language = enabled;
        self
    }

    /// Set the minimum element length for language detection.
    pub fn with_language_min_chars(mut self, chars: usize) -> Self {
        self.language_min_chars = chars;
        self
    }
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self::standard()
    }
}

impl From<CleaningLevel> for CleaningOptions {
    fn from(level: CleaningLevel) -> Self {
        Self::from_level(level)
    }
}
