//! Individual cleaning passes.
//!
//! Every pass is a pure function from element text to cleaned text plus the
//! stats delta it produced. The normalizer runs them in a fixed order:
//! header/footer removal must see the original line boundaries, so it runs
//! before any pass that rewrites lines.

use super::CleaningStats;
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Signature shared by all passes.
pub type Pass = fn(&str) -> (String, CleaningStats);

/// Anchored near line start.
static HEADER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)^.{0,50}?(?:page|p\.)\s*\d+$",
        r"(?i)^.{0,30}?(?:confidential|draft|internal)",
        r"(?i)^.{0,30}?\d{1,2}/\d{1,2}/\d{2,4}",
        r"(?i)^.{0,30}?(?:chapter|ch\.|section)\s+\d+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid header pattern"))
    .collect()
});

/// Matched anywhere in the line.
static FOOTER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)(?:page|p\.)\s*\d+$",
        r"(?i)\d{1,2}/\d{1,2}/\d{2,4}",
        r"(?i)(?:copyright|©|all rights reserved)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid footer pattern"))
    .collect()
});

static MULTI_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" {2,}").expect("valid space pattern"));
static TAB_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\t+").expect("valid tab pattern"));
static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid newline pattern"));

/// Zero-width, byte-order-mark and non-standard space code points.
const INVISIBLE_CHARS: [char; 7] = [
    '\u{200B}', // zero-width space
    '\u{200C}', // zero-width non-joiner
    '\u{200D}', // zero-width joiner
    '\u{2060}', // word joiner
    '\u{FEFF}', // byte order mark
    '\u{00A0}', // no-break space
    '\u{3000}', // ideographic space
];

/// Lines shorter than this are noise.
const MIN_LINE_CHARS: usize = 3;
/// Lines with a larger share of symbols are noise.
const MAX_SPECIAL_RATIO: f64 = 0.7;

/// Which rule removed a boilerplate line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boilerplate {
    /// Matched a header pattern
    Header,
    /// Matched a footer pattern
    Footer,
}

/// Classify a line as header or footer boilerplate.
///
/// Header patterns are tried first; a line is attributed to at most one rule.
/// Matching runs on a probe of the line in NFC with invisible characters
/// removed and whitespace collapsed, so later passes cannot uncover new
/// matches.
pub fn classify_boilerplate(line: &str) -> Option<Boilerplate> {
    let probe = probe(line);
    if HEADER_PATTERNS.iter().any(|re| re.is_match(&probe)) {
        return Some(Boilerplate::Header);
    }
    if FOOTER_PATTERNS.iter().any(|re| re.is_match(&probe)) {
        return Some(Boilerplate::Footer);
    }
    None
}

fn probe(line: &str) -> String {
    line.nfc()
        .filter(|c| !is_invisible(*c))
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drop page-number, confidentiality, date, chapter and copyright lines.
pub fn remove_headers_footers(content: &str) -> (String, CleaningStats) {
    let mut stats = CleaningStats::default();
    let mut kept = Vec::new();

    for line in content.split('\n') {
        match classify_boilerplate(line) {
            Some(Boilerplate::Header) => stats.headers_removed += 1,
            Some(Boilerplate::Footer) => stats.footers_removed += 1,
            None => kept.push(line),
        }
    }

    (kept.join("\n"), stats)
}

/// Canonical composition (NFC).
pub fn normalize_unicode(content: &str) -> (String, CleaningStats) {
    let mut stats = CleaningStats::default();
    let normalized: String = content.nfc().collect();
    if normalized != content {
        stats.unicode_fixed += 1;
    }
    (normalized, stats)
}

/// Check whether a character is stripped by [`remove_invisible_chars`].
///
/// Covers the fixed invisible set plus C0/C1 controls other than tab,
/// newline and carriage return (line endings are folded later).
pub fn is_invisible(c: char) -> bool {
    INVISIBLE_CHARS.contains(&c)
        || matches!(
            c,
            '\u{0000}'..='\u{0008}'
                | '\u{000B}'
                | '\u{000C}'
                | '\u{000E}'..='\u{001F}'
                | '\u{007F}'..='\u{009F}'
        )
}

/// Strip invisible and control characters.
pub fn remove_invisible_chars(content: &str) -> (String, CleaningStats) {
    let mut stats = CleaningStats::default();
    let mut cleaned = String::with_capacity(content.len());

    for c in content.chars() {
        if is_invisible(c) {
            stats.invisible_chars_removed += 1;
        } else {
            cleaned.push(c);
        }
    }

    (cleaned, stats)
}

/// Fold line endings to `\n` and mark wrongly-wrapped sentences.
///
/// A break is repaired when the line before it ends in a lowercase letter
/// and the line after it starts with one: the line gets a trailing space
/// and the repair is counted. The line boundary itself is kept, so later
/// line-based passes still see each source line on its own. Breaks after
/// punctuation are left alone.
pub fn repair_line_breaks(content: &str) -> (String, CleaningStats) {
    let mut stats = CleaningStats::default();
    let unified = content.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = unified.split('\n').map(str::trim).collect();
    let mut repaired = String::with_capacity(unified.len());

    for (i, line) in lines.iter().enumerate() {
        repaired.push_str(line);
        let Some(next) = lines.get(i + 1) else {
            break;
        };
        if ends_lowercase(line) && starts_lowercase(next) {
            repaired.push(' ');
            stats.line_breaks_fixed += 1;
        }
        repaired.push('\n');
    }

    (repaired, stats)
}

fn ends_lowercase(line: &str) -> bool {
    line.chars().last().is_some_and(char::is_lowercase)
}

fn starts_lowercase(line: &str) -> bool {
    line.chars().next().is_some_and(char::is_lowercase)
}

/// Collapse space and tab runs, trim lines, keep at most two blank lines.
pub fn standardize_whitespace(content: &str) -> (String, CleaningStats) {
    let mut stats = CleaningStats::default();

    let collapsed = MULTI_SPACE.replace_all(content, " ");
    let collapsed = TAB_RUN.replace_all(&collapsed, " ");
    let trimmed = collapsed
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");
    let standardized = BLANK_RUN.replace_all(&trimmed, "\n\n").into_owned();

    if standardized != content {
        stats.whitespace_normalized += 1;
    }

    (standardized, stats)
}

/// Drop short lines, symbol-heavy lines and repeats of the previous kept line.
pub fn filter_redundant_lines(content: &str) -> (String, CleaningStats) {
    let mut stats = CleaningStats::default();
    let mut kept: Vec<&str> = Vec::new();

    for line in content.split('\n').map(str::trim) {
        let redundant = is_noise_line(line) || kept.last() == Some(&line);
        if redundant {
            // Blank separators are not counted as removed content.
            if !line.is_empty() {
                stats.redundant_lines_removed += 1;
            }
            continue;
        }
        kept.push(line);
    }

    (kept.join("\n"), stats)
}

fn is_noise_line(line: &str) -> bool {
    let len = line.chars().count();
    if len < MIN_LINE_CHARS {
        return true;
    }
    special_char_ratio(line) > MAX_SPECIAL_RATIO
}

/// Share of characters that are neither alphanumeric nor whitespace.
pub fn special_char_ratio(line: &str) -> f64 {
    let len = line.chars().count();
    if len == 0 {
        return 0.0;
    }
    let special = line
        .chars()
        .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
        .count();
    special as f64 / len as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_marker_is_header() {
        let (text, stats) = remove_headers_footers("Page 1\n\nReal content line.");
        assert_eq!(text, "\nReal content line.");
        assert_eq!(stats.headers_removed, 1);
        assert_eq!(stats.footers_removed, 0);
    }

    #[test]
    fn test_header_patterns() {
        assert_eq!(
            classify_boilerplate("CONFIDENTIAL - do not share"),
            Some(Boilerplate::Header)
        );
        assert_eq!(
            classify_boilerplate("Printed 12/05/2023 by admin"),
            Some(Boilerplate::Header)
        );
        assert_eq!(
            classify_boilerplate("Chapter 3 Methods"),
            Some(Boilerplate::Header)
        );
        assert_eq!(classify_boilerplate("  p. 17"), Some(Boilerplate::Header));
    }

    #[test]
    fn test_footer_patterns() {
        let line = "This report was produced for the regional board and issued on 3/4/21";
        assert_eq!(classify_boilerplate(line), Some(Boilerplate::Footer));
        assert_eq!(
            classify_boilerplate("Acme Widgets Incorporated and subsidiaries © 2024"),
            Some(Boilerplate::Footer)
        );
        assert_eq!(
            classify_boilerplate("Material from the archive, All Rights Reserved."),
            Some(Boilerplate::Footer)
        );
    }

    #[test]
    fn test_ordinary_lines_survive() {
        assert_eq!(classify_boilerplate("The results were encouraging."), None);
        let (text, stats) = remove_headers_footers("alpha\nbeta");
        assert_eq!(text, "alpha\nbeta");
        assert_eq!(stats.boilerplate_removed(), 0);
    }

    #[test]
    fn test_probe_sees_through_invisible_chars() {
        assert_eq!(
            classify_boilerplate("Pa\u{200B}ge\u{00A0}\u{00A0}4"),
            Some(Boilerplate::Header)
        );
    }

    #[test]
    fn test_probe_composes_before_matching() {
        // Each decomposed letter is two code points until NFC.
        let line = format!("{}confidential", "e\u{0301}".repeat(20));
        assert_eq!(line.chars().count(), 52);
        assert_eq!(classify_boilerplate(&line), Some(Boilerplate::Header));
    }

    #[test]
    fn test_normalize_unicode() {
        let (text, stats) = normalize_unicode("cafe\u{0301}");
        assert_eq!(text, "café");
        assert_eq!(stats.unicode_fixed, 1);

        let (_, stats) = normalize_unicode("already composed");
        assert_eq!(stats.unicode_fixed, 0);
    }

    #[test]
    fn test_remove_invisible_chars() {
        let input = "a\u{200B}b\u{FEFF}c\u{0007}d\u{0085}e\tf\ng\r";
        let (text, stats) = remove_invisible_chars(input);
        assert_eq!(text, "abcde\tf\ng\r");
        assert_eq!(stats.invisible_chars_removed, 4);
    }

    #[test]
    fn test_repair_marks_lowercase_breaks() {
        let (text, stats) = repair_line_breaks("the quick brown\nfox jumps\r\nover it");
        assert_eq!(text, "the quick brown \nfox jumps \nover it");
        assert_eq!(stats.line_breaks_fixed, 2);
    }

    #[test]
    fn test_repaired_lines_stay_separate_for_later_passes() {
        let (text, stats) = repair_line_breaks("ok\n!!!!!!!!!!\nok\nok");
        assert_eq!(stats.line_breaks_fixed, 1);

        let (text, _) = standardize_whitespace(&text);
        assert_eq!(text, "ok\n!!!!!!!!!!\nok\nok");

        let (text, _) = filter_redundant_lines(&text);
        assert!(!text.contains("ok"));
    }

    #[test]
    fn test_repair_does_not_create_boilerplate() {
        let (text, _) = repair_line_breaks("The publisher keeps all\nrights reserved under the law");
        assert!(text.split('\n').all(|line| classify_boilerplate(line).is_none()));
    }

    #[test]
    fn test_repair_keeps_sentence_breaks() {
        let (text, stats) = repair_line_breaks("First sentence.\nsecond line\nThird");
        assert_eq!(text, "First sentence.\nsecond line\nThird");
        assert_eq!(stats.line_breaks_fixed, 0);
    }

    #[test]
    fn test_repair_folds_bare_carriage_returns() {
        let (text, _) = repair_line_breaks("One\rTwo");
        assert_eq!(text, "One\nTwo");
    }

    #[test]
    fn test_standardize_whitespace() {
        let (text, stats) = standardize_whitespace("  a   b\t\tc  \n\n\n\n\nd");
        assert_eq!(text, "a b c\n\nd");
        assert_eq!(stats.whitespace_normalized, 1);

        let (_, stats) = standardize_whitespace("clean text");
        assert_eq!(stats.whitespace_normalized, 0);
    }

    #[test]
    fn test_filter_symbol_and_short_lines() {
        let (text, stats) = filter_redundant_lines("ok\n!!!!!!!!!!\nok\nok");
        assert!(!text.contains("!!!!!!!!!!"));
        assert!(text.lines().filter(|l| *l == "ok").count() <= 1);
        assert_eq!(stats.redundant_lines_removed, 4);
    }

    #[test]
    fn test_filter_drops_repeat_of_previous_kept_line() {
        let (text, _) = filter_redundant_lines("okay\n!!!!!!!!!!\nokay\nokay\nnext line");
        assert_eq!(text, "okay\nnext line");
    }

    #[test]
    fn test_special_char_ratio() {
        assert_eq!(special_char_ratio(""), 0.0);
        assert!((special_char_ratio("ab!!") - 0.5).abs() < 1e-9);
        assert!(special_char_ratio("==== x ====") > MAX_SPECIAL_RATIO);
    }
}
