//! Normalization and cleaning module.

mod document;
mod normalizer;
mod options;
pub mod passes;
mod stats;
mod validation;

pub use document::{NormalizationMetadata, NormalizedDocument};
pub use normalizer::Normalizer;
pub use options::{CleaningLevel, CleaningOptions};
pub use stats::CleaningStats;
pub use validation::{ValidationIssue, ValidationReport};
