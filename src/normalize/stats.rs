//! Cleaning statistics.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Counters collected during one normalization run.
///
/// Each cleaning pass returns its own delta; deltas are combined with
/// field-wise addition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningStats {
    /// Characters across all source elements
    pub original_chars: usize,

    /// Characters across all kept, cleaned elements
    pub cleaned_chars: usize,

    /// Lines dropped by header patterns
    pub headers_removed: usize,

    /// Lines dropped by footer patterns
    pub footers_removed: usize,

    /// Elements changed by Unicode normalization
    pub unicode_fixed: usize,

    /// Invisible and control characters stripped
    pub invisible_chars_removed: usize,

    /// Wrongly-wrapped line breaks joined
    pub line_breaks_fixed: usize,

    /// Elements changed by whitespace standardization
    pub whitespace_normalized: usize,

    /// Lines dropped by redundant-content filtering
    pub redundant_lines_removed: usize,
}

impl CleaningStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Percentage of original characters removed, within `[0, 100]`.
    pub fn reduction_percentage(&self) -> f64 {
        if self.original_chars == 0 {
            return 0.0;
        }
        let removed = self.original_chars as f64 - self.cleaned_chars as f64;
        (removed / self.original_chars as f64 * 100.0).clamp(0.0, 100.0)
    }

    /// Header and footer lines removed.
    pub fn boilerplate_removed(&self) -> usize {
        self.headers_removed + self.footers_removed
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &CleaningStats) {
        self.original_chars += other.original_chars;
        self.cleaned_chars += other.cleaned_chars;
        self.headers_removed += other.headers_removed;
        self.footers_removed += other.footers_removed;
        self.unicode_fixed += other.unicode_fixed;
        self.invisible_chars_removed += other.invisible_chars_removed;
        self.line_breaks_fixed += other.line_breaks_fixed;
        self.whitespace_normalized += other.whitespace_normalized;
        self.redundant_lines_removed += other.redundant_lines_removed;
    }
}

impl AddAssign for CleaningStats {
    fn add_assign(&mut self, other: CleaningStats) {
        self.merge(&other);
    }
}

impl Add for CleaningStats {
    type Output = CleaningStats;

    fn add(mut self, other: CleaningStats) -> CleaningStats {
        self.merge(&other);
        self
    }
}
