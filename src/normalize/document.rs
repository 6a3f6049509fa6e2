//! The result of normalizing one document.

use super::{CleaningLevel, CleaningStats, ValidationReport};
use crate::language::Language;
use crate::model::{DocumentElement, DocumentStructure};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Bookkeeping about one normalization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NormalizationMetadata {
    /// Level the run was configured with
    pub cleaning_level: CleaningLevel,

    /// Non-blank source elements fed through the passes
    pub elements_processed: usize,

    /// Elements still non-empty after cleaning
    pub elements_kept: usize,
}

/// Cleaned elements plus statistics, language and quality.
///
/// The source structure is shared, not copied; several normalizations of the
/// same structure point at one allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedDocument {
    /// Structure the elements were cleaned from
    pub structure: Arc<DocumentStructure>,

    /// Cleaned, non-empty elements in document order
    pub elements: Vec<DocumentElement>,

    /// Counters collected over all passes
    pub stats: CleaningStats,

    /// Majority language of substantial elements
    pub detected_language: Language,

    /// Heuristic fidelity score in `[0, 1]`
    pub quality_score: f64,

    /// Run bookkeeping
    pub metadata: NormalizationMetadata,
}

impl NormalizedDocument {
    /// Cleaned text, elements separated by a blank line.
    pub fn text(&self) -> String {
        self.elements
            .iter()
            .map(|e| e.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Check if nothing survived cleaning.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Run the advisory acceptance check.
    pub fn validate(&self) -> ValidationReport {
        ValidationReport::assess(
            self.stats.reduction_percentage(),
            self.quality_score,
            self.elements.len(),
        )
    }

    /// One-line human readable summary.
    pub fn summary(&self) -> String {
        format!(
            "Language: {} | Quality: {:.2} | Reduction: {:.1}% | Headers removed: {} | Footers removed: {} | Elements: {}/{}",
            self.detected_language,
            self.quality_score,
            self.stats.reduction_percentage(),
            self.stats.headers_removed,
            self.stats.footers_removed,
            self.metadata.elements_kept,
            self.metadata.elements_processed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::LanguageCode;
    use crate::model::{ElementKind, LineSpan};

    fn sample() -> NormalizedDocument {
        let elements = vec![
            DocumentElement::new("Intro", ElementKind::Heading, 1, 0, LineSpan::new(0, 0)),
            DocumentElement::new("Body text", ElementKind::Paragraph, 0, 1, LineSpan::new(2, 2)),
        ];
        NormalizedDocument {
            structure: Arc::new(DocumentStructure::from_elements(elements.clone())),
            elements,
            stats: CleaningStats {
                original_chars: 16,
                cleaned_chars: 14,
                headers_removed: 1,
                ..Default::default()
            },
            detected_language: Language::Known(LanguageCode::new("en")),
            quality_score: 0.9,
            metadata: NormalizationMetadata {
                cleaning_level: CleaningLevel::Standard,
                elements_processed: 2,
                elements_kept: 2,
            },
        }
    }

    #[test]
    fn test_text_joins_with_blank_line() {
        assert_eq!(sample().text(), "Intro\n\nBody text");
    }

    #[test]
    fn test_summary() {
        assert_eq!(
            sample().summary(),
            "Language: en | Quality: 0.90 | Reduction: 12.5% | Headers removed: 1 | Footers removed: 0 | Elements: 2/2"
        );
    }

    #[test]
    fn test_validate_does_not_mutate() {
        let doc = sample();
        let before = doc.clone();
        let report = doc.validate();
        assert!(report.is_valid);
        assert_eq!(doc, before);
    }

    #[test]
    fn test_serialize_embeds_structure() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.contains("\"structure\""));
        assert!(json.contains("\"detected_language\":\"en\""));
        assert!(json.contains("\"cleaning_level\":\"standard\""));
    }
}
