//! # docprep
//!
//! Structural extraction and cleaning of raw document text.
//!
//! Text goes through two stages: the [`StructureParser`] turns it into a
//! typed, hierarchical [`DocumentStructure`], and the [`Normalizer`] cleans
//! every element into a [`NormalizedDocument`] with statistics, detected
//! language and a quality score.
//!
//! ## Quick Start
//!
//! ```
//! use docprep::{process, CleaningLevel};
//!
//! let doc = process("# Title\n\nSome paragraph text here.", "md", CleaningLevel::Standard);
//! assert_eq!(doc.structure.table_of_contents.len(), 1);
//! assert!(doc.quality_score <= 1.0);
//! println!("{}", doc.summary());
//! ```
//!
//! ## Features
//!
//! - **Format detection**: Markdown or plain text, from a hint or the text
//! - **Structure extraction**: Headings, paragraphs, lists, tables, code blocks
//! - **Cleaning levels**: Minimal, standard and aggressive pass sets
//! - **Pluggable language detection**: Any [`LanguageDetector`] backend
//! - **Parallel batches**: Uses Rayon across independent documents

pub mod detect;
pub mod error;
pub mod language;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use detect::{detect_format, DocumentFormat};
pub use error::{Error, Result};
pub use language::{DetectionError, Language, LanguageCode, LanguageDetector, ScriptDetector};
pub use model::{
    DocumentElement, DocumentStructure, ElementId, ElementKind, LineSpan, StructureMetadata,
    TocEntry,
};
pub use normalize::{
    CleaningLevel, CleaningOptions, CleaningStats, NormalizationMetadata, NormalizedDocument,
    Normalizer, ValidationIssue, ValidationReport,
};
pub use parser::StructureParser;
pub use render::JsonFormat;

use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;

/// Extract the structure of a text.
///
/// # Example
///
/// ```
/// use docprep::{parse, ElementKind};
///
/// let structure = parse("- item one\n- item two", "txt");
/// assert_eq!(structure.elements.len(), 2);
/// assert!(structure.elements.iter().all(|e| e.kind == ElementKind::ListItem));
/// ```
pub fn parse(text: &str, format_hint: &str) -> DocumentStructure {
    StructureParser::new().parse(text, format_hint)
}

/// Clean a structure at the given level with the default language detector.
pub fn normalize(
    structure: impl Into<Arc<DocumentStructure>>,
    level: CleaningLevel,
) -> NormalizedDocument {
    Normalizer::new(level).normalize(structure)
}

/// Parse then normalize.
pub fn process(text: &str, format_hint: &str, level: CleaningLevel) -> NormalizedDocument {
    normalize(parse(text, format_hint), level)
}

/// Read a decoded text file and run it through both stages.
///
/// The file extension is used as the format hint.
pub fn process_file<P: AsRef<Path>>(path: P, level: CleaningLevel) -> Result<NormalizedDocument> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let hint = path
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(process(&text, &hint, level))
}

/// Builder for configuring and running the pipeline.
///
/// # Example
///
/// ```
/// use docprep::{CleaningLevel, DocPrep};
///
/// let docs = DocPrep::new()
///     .with_level(CleaningLevel::Aggressive)
///     .process_batch(&[("# One\n\nFirst.", "md"), ("Second document.", "txt")]);
/// assert_eq!(docs.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocPrep {
    parser: StructureParser,
    normalizer: Normalizer,
}

impl DocPrep {
    /// Create a new builder with standard cleaning.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cleaning level, keeping the current detector.
    pub fn with_level(self, level: CleaningLevel) -> Self {
        self.with_options(CleaningOptions::from_level(level))
    }

    /// Set explicit cleaning options, keeping the current detector.
    pub fn with_options(mut self, options: CleaningOptions) -> Self {
        let detector = self.normalizer.detector();
        self.normalizer = Normalizer::with_options(options).with_detector(detector);
        self
    }

    /// Set the language detector.
    pub fn with_detector(mut self, detector: Arc<dyn LanguageDetector>) -> Self {
        self.normalizer = self.normalizer.with_detector(detector);
        self
    }

    /// Cleaning options in effect.
    pub fn options(&self) -> &CleaningOptions {
        self.normalizer.options()
    }

    /// Run one document through both stages.
    pub fn process(&self, text: &str, format_hint: &str) -> NormalizedDocument {
        self.normalizer
            .normalize(self.parser.parse(text, format_hint))
    }

    /// Run independent documents in parallel; output order follows input.
    pub fn process_batch<S, H>(&self, documents: &[(S, H)]) -> Vec<NormalizedDocument>
    where
        S: AsRef<str> + Sync,
        H: AsRef<str> + Sync,
    {
        log::debug!("processing batch of {} documents", documents.len());
        documents
            .par_iter()
            .map(|(text, hint)| self.process(text.as_ref(), hint.as_ref()))
            .collect()
    }
}
