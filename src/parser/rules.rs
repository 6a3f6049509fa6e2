//! Line classification rules.
//!
//! Heading rules are ordered `(pattern, level)` tables evaluated
//! first-match-wins. Markup rules run before the general rules.

use crate::detect::DocumentFormat;
use regex::Regex;
use std::sync::LazyLock;

/// How a matching heading rule computes its level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelRule {
    /// Constant level
    Fixed(u8),
    /// Length of the first capture group (number of `#` markers)
    MarkerDepth,
}

/// A single heading rule.
#[derive(Debug)]
pub struct HeadingRule {
    /// Rule name for debug logging
    pub name: &'static str,
    /// Pattern tested against the trimmed line
    pub pattern: Regex,
    /// Level computation
    pub level: LevelRule,
}

impl HeadingRule {
    fn new(name: &'static str, pattern: &str, level: LevelRule) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("valid heading rule"),
            level,
        }
    }

    /// Level of `line` under this rule, if it matches.
    pub fn level_of(&self, line: &str) -> Option<u8> {
        let caps = self.pattern.captures(line)?;
        match self.level {
            LevelRule::Fixed(level) => Some(level),
            LevelRule::MarkerDepth => caps.get(1).map(|m| m.as_str().len() as u8),
        }
    }
}

static MARKDOWN_HEADING_RULES: LazyLock<Vec<HeadingRule>> = LazyLock::new(|| {
    vec![
        HeadingRule::new("hash_marker", r"^(#{1,6})\s+(.+)$", LevelRule::MarkerDepth),
        // Every word capitalized, a single trailing period.
        HeadingRule::new(
            "title_sentence",
            r"^[A-Z0-9][^.\s]*(?:\s+[A-Z0-9][^.\s]*)*\.$",
            LevelRule::Fixed(1),
        ),
    ]
});

static GENERAL_HEADING_RULES: LazyLock<Vec<HeadingRule>> = LazyLock::new(|| {
    vec![
        HeadingRule::new("all_caps", r"^[A-Z][A-Z\s]{9,}$", LevelRule::Fixed(1)),
        HeadingRule::new("numbered_section", r"^\d+\.\s+[A-Z]", LevelRule::Fixed(2)),
        HeadingRule::new("colon_label", r"^[A-Z][a-z\s]+:$", LevelRule::Fixed(2)),
    ]
});

static LIST_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^\s*[-•*]\s+(.+)$",
        r"^\s*\d+\.\s+(.+)$",
        r"^\s*[a-zA-Z]\.\s+(.+)$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid list pattern"))
    .collect()
});

static TABLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"^\|.*\|", r"^\s*\+[-+\s]+\+\s*$"]
        .iter()
        .map(|p| Regex::new(p).expect("valid table pattern"))
        .collect()
});

static TABLE_CONTINUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s|+\-]").expect("valid continuation pattern"));

const FENCE: &str = "```";
const CODE_INDENT: &str = "    ";

/// Heading rules specific to a format, run before the general ones.
pub fn format_rules(format: DocumentFormat) -> &'static [HeadingRule] {
    match format {
        DocumentFormat::Markdown => MARKDOWN_HEADING_RULES.as_slice(),
        DocumentFormat::PlainText => &[],
    }
}

/// Heading level of a trimmed line, if any heading rule matches.
pub fn heading_level(line: &str, format: DocumentFormat) -> Option<u8> {
    format_rules(format)
        .iter()
        .chain(GENERAL_HEADING_RULES.iter())
        .find_map(|rule| {
            let level = rule.level_of(line)?;
            log::trace!("heading rule {} matched {:?}", rule.name, line);
            Some(level)
        })
}

/// Check whether a trimmed line is a bullet, numbered or lettered item.
pub fn is_list_item(line: &str) -> bool {
    LIST_PATTERNS.iter().any(|re| re.is_match(line))
}

/// Check whether a trimmed line is a pipe row or ASCII border.
pub fn is_table_row(line: &str) -> bool {
    TABLE_PATTERNS.iter().any(|re| re.is_match(line))
}

/// Check whether a raw line keeps a table going.
pub fn continues_table(raw: &str) -> bool {
    !raw.trim().is_empty() && TABLE_CONTINUATION.is_match(raw)
}

/// Check whether a trimmed line opens or closes a fenced code block.
pub fn is_fence(line: &str) -> bool {
    line.starts_with(FENCE)
}

/// Check whether a raw line belongs to an indented code block.
pub fn is_indented_code(raw: &str) -> bool {
    raw.starts_with(CODE_INDENT)
}

/// Lines that end a running paragraph.
pub fn is_structured_line(line: &str, format: DocumentFormat) -> bool {
    heading_level(line, format).is_some() || is_list_item(line) || is_table_row(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MD: DocumentFormat = DocumentFormat::Markdown;
    const PLAIN: DocumentFormat = DocumentFormat::PlainText;

    #[test]
    fn test_hash_marker_depth() {
        assert_eq!(heading_level("# Title", MD), Some(1));
        assert_eq!(heading_level("### Deep dive", MD), Some(3));
        assert_eq!(heading_level("###### Six", MD), Some(6));
        assert_eq!(heading_level("#NoSpace", MD), None);
    }

    #[test]
    fn test_markdown_rules_inactive_for_plain_text() {
        assert_eq!(heading_level("# Title", PLAIN), None);
        assert_eq!(heading_level("Getting Started.", PLAIN), None);
    }

    #[test]
    fn test_title_sentence() {
        assert_eq!(heading_level("Getting Started.", MD), Some(1));
        assert_eq!(heading_level("Release 2 Notes.", MD), Some(1));
        assert_eq!(heading_level("Some paragraph text here.", MD), None);
        assert_eq!(heading_level("Version 1.2 Notes.", MD), None);
    }

    #[test]
    fn test_general_rules() {
        assert_eq!(heading_level("TABLE OF CONTENTS", PLAIN), Some(1));
        assert_eq!(heading_level("ABSTRACTED", PLAIN), Some(1));
        assert_eq!(heading_level("SHORT CAPS", PLAIN), Some(1));
        assert_eq!(heading_level("TOO SHORT", PLAIN), None);
        assert_eq!(heading_level("2. Background", PLAIN), Some(2));
        assert_eq!(heading_level("Key findings:", PLAIN), Some(2));
        assert_eq!(heading_level("Key Findings:", PLAIN), None);
    }

    #[test]
    fn test_list_patterns() {
        assert!(is_list_item("- item one"));
        assert!(is_list_item("• bullet"));
        assert!(is_list_item("* starred"));
        assert!(is_list_item("12. twelfth"));
        assert!(is_list_item("b. second letter"));
        assert!(!is_list_item("-dash"));
        assert!(!is_list_item("plain text"));
    }

    #[test]
    fn test_table_patterns() {
        assert!(is_table_row("| a | b |"));
        assert!(is_table_row("+----+----+"));
        assert!(!is_table_row("a | b | c"));
        assert!(!is_table_row("| lonely"));
    }

    #[test]
    fn test_table_continuation() {
        assert!(continues_table("|---|---|"));
        assert!(continues_table("+--+"));
        assert!(continues_table("  indented row"));
        assert!(!continues_table(""));
        assert!(!continues_table("   "));
        assert!(!continues_table("Text after table"));
    }

    #[test]
    fn test_code_markers() {
        assert!(is_fence("```rust"));
        assert!(is_fence("```"));
        assert!(!is_fence("``not"));
        assert!(is_indented_code("    let x = 1;"));
        assert!(!is_indented_code("   three spaces"));
    }

    #[test]
    fn test_structured_line() {
        assert!(is_structured_line("## Next", MD));
        assert!(is_structured_line("- item", PLAIN));
        assert!(is_structured_line("| x | y |", PLAIN));
        assert!(!is_structured_line("continuation of text", MD));
    }
}
