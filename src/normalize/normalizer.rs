//! Per-element cleaning pipeline, language vote and quality scoring.

use super::passes::{self, Pass};
use super::{CleaningLevel, CleaningOptions, CleaningStats, NormalizationMetadata, NormalizedDocument};
use crate::language::{self, LanguageCode, LanguageDetector, ScriptDetector};
use crate::model::{DocumentElement, DocumentStructure};
use std::fmt;
use std::sync::Arc;

/// Cleans the elements of a [`DocumentStructure`].
///
/// Holds no per-document state, so one normalizer can be shared across
/// threads and reused for any number of documents.
#[derive(Clone)]
pub struct Normalizer {
    options: CleaningOptions,
    detector: Arc<dyn LanguageDetector>,
}

impl Normalizer {
    /// Create a normalizer for a cleaning level with the script detector.
    pub fn new(level: CleaningLevel) -> Self {
        Self::with_options(CleaningOptions::from_level(level))
    }

    /// Create a normalizer from explicit options.
    pub fn with_options(options: CleaningOptions) -> Self {
        Self {
            options,
            detector: Arc::new(ScriptDetector::new()),
        }
    }

    /// Replace the language detector.
    pub fn with_detector(mut self, detector: Arc<dyn LanguageDetector>) -> Self {
        self.detector = detector;
        self
    }

    /// Options in effect.
    pub fn options(&self) -> &CleaningOptions {
        &self.options
    }

    /// Shared handle to the language detector.
    pub fn detector(&self) -> Arc<dyn LanguageDetector> {
        Arc::clone(&self.detector)
    }

    /// Enabled passes in their fixed order.
    ///
    /// Header/footer removal runs first so its anchors still see the
    /// original line boundaries.
    fn passes(&self) -> Vec<Pass> {
        let o = &self.options;
        [
            (o.remove_headers_footers, passes::remove_headers_footers as Pass),
            (o.normalize_unicode, passes::normalize_unicode),
            (o.remove_invisible_chars, passes::remove_invisible_chars),
            (o.repair_line_breaks, passes::repair_line_breaks),
            (o.standardize_whitespace, passes::standardize_whitespace),
            (o.filter_redundant, passes::filter_redundant_lines),
        ]
        .into_iter()
        .filter_map(|(enabled, pass)| enabled.then_some(pass))
        .collect()
    }

    /// Normalize a structure.
    ///
    /// Never fails: detector errors only drop the element from the language
    /// vote.
    pub fn normalize(&self, structure: impl Into<Arc<DocumentStructure>>) -> NormalizedDocument {
        let structure = structure.into();
        let passes = self.passes();

        let mut stats = CleaningStats {
            original_chars: structure.elements.iter().map(DocumentElement::char_len).sum(),
            ..Default::default()
        };
        let mut elements = Vec::with_capacity(structure.elements.len());
        let mut processed = 0;

        for element in structure.elements.iter().filter(|e| !e.is_empty()) {
            processed += 1;
            let mut content = element.content.clone();
            for pass in &passes {
                let (cleaned, delta) = pass(&content);
                stats += delta;
                content = cleaned;
            }

            if content.trim().is_empty() {
                log::trace!("dropped {} after cleaning", element.id());
                continue;
            }

            elements.push(DocumentElement {
                content,
                ..element.clone()
            });
        }

        stats.cleaned_chars = elements.iter().map(DocumentElement::char_len).sum();

        let detected_language = if self.options.detect_language {
            self.detect_language(&elements)
        } else {
            language::Language::Unknown
        };
        let quality_score = quality_score(&stats, &elements);

        log::debug!(
            "normalized {} elements ({} kept) at {} level, reduction {:.1}%, quality {:.2}",
            processed,
            elements.len(),
            self.options.level,
            stats.reduction_percentage(),
            quality_score
        );

        NormalizedDocument {
            metadata: NormalizationMetadata {
                cleaning_level: self.options.level,
                elements_processed: processed,
                elements_kept: elements.len(),
            },
            structure,
            elements,
            stats,
            detected_language,
            quality_score,
        }
    }

    fn detect_language(&self, elements: &[DocumentElement]) -> language::Language {
        let codes: Vec<LanguageCode> = elements
            .iter()
            .filter(|e| e.content.trim().chars().count() > self.options.language_min_chars)
            .filter_map(|e| match self.detector.detect(&e.content) {
                Ok(code) => Some(code),
                Err(err) => {
                    log::debug!("language detection skipped {}: {}", e.id(), err);
                    None
                }
            })
            .collect();

        language::vote(&codes)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(CleaningLevel::default())
    }
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Heuristic fidelity score, clamped to `[0, 1]`.
fn quality_score(stats: &CleaningStats, elements: &[DocumentElement]) -> f64 {
    let mut score = 1.0;

    let reduction = stats.reduction_percentage();
    if reduction > 50.0 {
        score -= 0.3;
    } else if reduction > 30.0 {
        score -= 0.2;
    } else if reduction > 15.0 {
        score -= 0.1;
    }

    if !elements.is_empty() {
        let total: usize = elements.iter().map(DocumentElement::char_len).sum();
        let mean = total as f64 / elements.len() as f64;
        if mean > 100.0 {
            score += 0.1;
        } else if mean < 20.0 {
            score -= 0.1;
        }
    }

    if stats.boilerplate_removed() as f64 > 0.5 * elements.len() as f64 {
        score -= 0.2;
    }

    f64::clamp(score, 0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{DetectionError, Language};
    use crate::model::{ElementKind, LineSpan};

    fn paragraph(content: &str, position: usize) -> DocumentElement {
        DocumentElement::new(
            content,
            ElementKind::Paragraph,
            0,
            position,
            LineSpan::new(position, position),
        )
    }

    fn structure(contents: &[&str]) -> DocumentStructure {
        DocumentStructure::from_elements(
            contents
                .iter()
                .enumerate()
                .map(|(i, c)| paragraph(c, i))
                .collect(),
        )
    }

    const LONG_EN: &str = "The committee reviewed the proposal in detail and agreed to move forward with it.";

    #[test]
    fn test_header_footer_scenario() {
        let doc = Normalizer::new(CleaningLevel::Standard).normalize(structure(&[
            "Page 1\nActual content line here.\nCopyright 2024",
        ]));
        assert_eq!(doc.elements.len(), 1);
        assert_eq!(doc.elements[0].content, "Actual content line here.");
        assert_eq!(doc.stats.headers_removed, 1);
        assert_eq!(doc.stats.footers_removed, 1);
    }

    #[test]
    fn test_minimal_keeps_boilerplate() {
        let doc = Normalizer::new(CleaningLevel::Minimal)
            .normalize(structure(&["Page 1\nActual content line here."]));
        assert_eq!(doc.stats.boilerplate_removed(), 0);
        assert!(doc.elements[0].content.starts_with("Page 1"));
    }

    #[test]
    fn test_empty_elements_dropped() {
        let doc = Normalizer::new(CleaningLevel::Standard)
            .normalize(structure(&["Page 7", "Real paragraph text.", "   "]));
        assert_eq!(doc.elements.len(), 1);
        assert_eq!(doc.elements[0].position, 1);
        assert_eq!(doc.metadata.elements_processed, 2);
        assert_eq!(doc.metadata.elements_kept, 1);
        assert_eq!(doc.stats.cleaned_chars, "Real paragraph text.".len());
    }

    #[test]
    fn test_cleaned_elements_keep_relations() {
        let parsed = crate::parse("# Intro\n\nFirst   paragraph.", "md");
        let doc = Normalizer::new(CleaningLevel::Standard).normalize(parsed.clone());
        assert_eq!(doc.elements.len(), 2);
        assert_eq!(doc.elements[1].content, "First paragraph.");
        assert_eq!(doc.elements[1].kind, parsed.elements[1].kind);
        assert_eq!(doc.elements[1].span, parsed.elements[1].span);
        assert_eq!(doc.elements[0].children_ids, parsed.elements[0].children_ids);
        assert_eq!(*doc.structure, parsed);
    }

    #[test]
    fn test_structure_is_shared() {
        let shared = Arc::new(structure(&["Some text to clean."]));
        let doc = Normalizer::default().normalize(Arc::clone(&shared));
        assert!(Arc::ptr_eq(&doc.structure, &shared));
    }

    #[test]
    fn test_language_vote() {
        let doc = Normalizer::default().normalize(structure(&[LONG_EN, "short", LONG_EN]));
        assert_eq!(doc.detected_language.as_str(), "en");
    }

    #[test]
    fn test_short_elements_do_not_vote() {
        let doc = Normalizer::default().normalize(structure(&["Too short to vote on."]));
        assert_eq!(doc.detected_language, Language::Unknown);
    }

    #[test]
    fn test_failing_detector_is_skipped() {
        let flaky = |text: &str| -> Result<LanguageCode, DetectionError> {
            if text.contains("committee") {
                Err(DetectionError::Backend("timeout".to_string()))
            } else {
                Ok(LanguageCode::new("fr"))
            }
        };
        let other = "Une phrase assez longue pour passer le seuil de detection de langue.";
        let doc = Normalizer::default()
            .with_detector(Arc::new(flaky))
            .normalize(structure(&[LONG_EN, other, LONG_EN]));
        assert_eq!(doc.detected_language.as_str(), "fr");

        let never = |_: &str| -> Result<LanguageCode, DetectionError> {
            Err(DetectionError::Undetectable)
        };
        let doc = Normalizer::default()
            .with_detector(Arc::new(never))
            .normalize(structure(&[LONG_EN]));
        assert_eq!(doc.detected_language, Language::Unknown);
        assert_eq!(doc.elements.len(), 1);
    }

    #[test]
    fn test_language_detection_disabled() {
        let options = CleaningOptions::standard().with_language_detection(false);
        let doc = Normalizer::with_options(options).normalize(structure(&[LONG_EN]));
        assert_eq!(doc.detected_language, Language::Unknown);
    }

    #[test]
    fn test_quality_reduction_bands() {
        let elements = vec![paragraph(&"x".repeat(50), 0)];
        let stats = |original| CleaningStats {
            original_chars: original,
            cleaned_chars: 50,
            ..Default::default()
        };
        assert!((quality_score(&stats(50), &elements) - 1.0).abs() < 1e-9);
        // 20% removed
        assert!((quality_score(&stats(62), &elements) - 0.9).abs() < 1e-9);
        // 37.5% removed
        assert!((quality_score(&stats(80), &elements) - 0.8).abs() < 1e-9);
        // 75% removed
        assert!((quality_score(&stats(200), &elements) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_quality_length_and_boilerplate() {
        let long = vec![paragraph(&"y".repeat(150), 0)];
        let stats = CleaningStats {
            original_chars: 150,
            cleaned_chars: 150,
            ..Default::default()
        };
        assert_eq!(quality_score(&stats, &long), 1.0);

        let short = vec![paragraph("tiny", 0), paragraph("also tiny", 1)];
        let stats = CleaningStats {
            original_chars: 13,
            cleaned_chars: 13,
            headers_removed: 2,
            ..Default::default()
        };
        assert!((quality_score(&stats, &short) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_quality_penalties_accumulate() {
        let stats = CleaningStats {
            original_chars: 1000,
            cleaned_chars: 0,
            headers_removed: 40,
            ..Default::default()
        };
        let score = quality_score(&stats, &[]);
        assert!((score - 0.5).abs() < 1e-9);

        let elements = vec![paragraph("a", 0)];
        let stats = CleaningStats {
            original_chars: 1000,
            cleaned_chars: 1,
            headers_removed: 40,
            ..Default::default()
        };
        let score = quality_score(&stats, &elements);
        assert!((0.0..=1.0).contains(&score));
        assert!((score - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_empty_structure() {
        let doc = Normalizer::default().normalize(DocumentStructure::default());
        assert!(doc.is_empty());
        assert_eq!(doc.stats.reduction_percentage(), 0.0);
        assert_eq!(doc.quality_score, 1.0);
        assert!(!doc.validate().is_valid);
    }
}
