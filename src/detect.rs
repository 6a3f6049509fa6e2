//! Document format detection.
//!
//! The format picks which heading rule set is active during structural
//! extraction. Markup rules run before the general rules.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static MARKDOWN_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s+").expect("valid heading regex"));
static PIPE_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\|.*\|").expect("valid pipe row regex"));

/// Hints that name a markup format directly.
const MARKDOWN_HINTS: &[&str] = &["md", "markdown", "mdx"];

/// Rule set selected for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    /// Markdown-like markup: hash headings, pipe tables
    Markdown,
    /// Anything else
    #[default]
    PlainText,
}

impl DocumentFormat {
    /// Stable name used in logs and summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Markdown => "markdown",
            DocumentFormat::PlainText => "plain_text",
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check whether an acquisition-layer hint names a markup format.
///
/// Hints are compared case-insensitively; a leading dot (file extension
/// style) is ignored.
pub fn is_markup_hint(hint: &str) -> bool {
    let hint = hint.trim().trim_start_matches('.').to_ascii_lowercase();
    MARKDOWN_HINTS.contains(&hint.as_str())
}

/// Detect the document format from the hint, falling back to content.
///
/// # Example
/// ```
/// use docprep::detect::{detect_format, DocumentFormat};
///
/// assert_eq!(detect_format("plain words", "md"), DocumentFormat::Markdown);
/// assert_eq!(detect_format("## Usage", "unknown"), DocumentFormat::Markdown);
/// assert_eq!(detect_format("plain words", "pdf"), DocumentFormat::PlainText);
/// ```
pub fn detect_format(text: &str, hint: &str) -> DocumentFormat {
    if is_markup_hint(hint) {
        return DocumentFormat::Markdown;
    }

    if MARKDOWN_HEADING.is_match(text) || PIPE_ROW.is_match(text) {
        return DocumentFormat::Markdown;
    }

    DocumentFormat::PlainText
}
