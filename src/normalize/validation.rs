//! Advisory validation of normalization results.

use serde::Serialize;
use thiserror::Error;

/// Reduction above this percentage is rejected.
const MAX_REDUCTION: f64 = 60.0;
/// Reduction above this percentage draws a warning.
const WARN_REDUCTION: f64 = 40.0;
/// Quality below this score is rejected.
const MIN_QUALITY: f64 = 0.5;
/// Quality below this score draws a warning.
const WARN_QUALITY: f64 = 0.7;

/// A single finding of [`ValidationReport`].
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "issue", content = "value", rename_all = "snake_case")]
pub enum ValidationIssue {
    #[error("excessive content reduction: {0:.1}%")]
    ExcessiveReduction(f64),

    #[error("high content reduction: {0:.1}%")]
    HighReduction(f64),

    #[error("quality score below threshold: {0:.2}")]
    QualityBelowThreshold(f64),

    #[error("moderate quality score: {0:.2}")]
    ModerateQuality(f64),

    #[error("no content remaining after cleaning")]
    NoContentRemaining,
}

/// Verdict on a normalized document.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ValidationReport {
    /// False when any error was found
    pub is_valid: bool,

    /// Non-fatal findings
    pub warnings: Vec<ValidationIssue>,

    /// Findings that make the result unacceptable
    pub errors: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Classify one result from its headline numbers.
    pub fn assess(reduction: f64, quality: f64, elements_kept: usize) -> Self {
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        if reduction > MAX_REDUCTION {
            errors.push(ValidationIssue::ExcessiveReduction(reduction));
        } else if reduction > WARN_REDUCTION {
            warnings.push(ValidationIssue::HighReduction(reduction));
        }

        if quality < MIN_QUALITY {
            errors.push(ValidationIssue::QualityBelowThreshold(quality));
        } else if quality < WARN_QUALITY {
            warnings.push(ValidationIssue::ModerateQuality(quality));
        }

        if elements_kept == 0 {
            errors.push(ValidationIssue::NoContentRemaining);
        }

        Self {
            is_valid: errors.is_empty(),
            warnings,
            errors,
        }
    }

    /// Check if there are warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
