//! Document-level structure types.

use super::{DocumentElement, ElementId, ElementKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The complete structure of one parsed document.
///
/// Elements live in a single arena; `parent_id`, `children_ids` and the
/// hierarchy map are index relations into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStructure {
    /// Elements in document order
    pub elements: Vec<DocumentElement>,

    /// Parent id to ordered child ids
    pub hierarchy: BTreeMap<ElementId, Vec<ElementId>>,

    /// Document-level metadata
    pub metadata: StructureMetadata,

    /// Flat projection of title and heading elements
    pub table_of_contents: Vec<TocEntry>,
}

impl DocumentStructure {
    /// Create an empty structure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a list of elements with no hierarchy, metadata or TOC.
    ///
    /// Useful when callers assemble elements themselves and only need the
    /// normalizer.
    pub fn from_elements(elements: Vec<DocumentElement>) -> Self {
        Self {
            elements,
            ..Default::default()
        }
    }

    /// Check if the structure has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Get an element by id.
    pub fn get(&self, id: ElementId) -> Option<&DocumentElement> {
        self.elements.get(id.index())
    }

    /// All elements of one kind, in document order.
    pub fn elements_of_kind(&self, kind: ElementKind) -> Vec<&DocumentElement> {
        self.elements.iter().filter(|e| e.kind == kind).collect()
    }

    /// The enclosing heading of an element, if any.
    pub fn parent_of(&self, id: ElementId) -> Option<&DocumentElement> {
        self.get(id)
            .and_then(|e| e.parent_id)
            .and_then(|parent| self.get(parent))
    }

    /// Elements directly nested under `id`.
    pub fn children_of(&self, id: ElementId) -> Vec<&DocumentElement> {
        self.hierarchy
            .get(&id)
            .map(|children| children.iter().filter_map(|c| self.get(*c)).collect())
            .unwrap_or_default()
    }

    /// One-line summary of the structure.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        if let Some(ref title) = self.metadata.title {
            parts.push(format!("Title: {}", title));
        }
        parts.push(format!("Elements: {}", self.metadata.total_elements));
        parts.push(format!("Words: {}", self.metadata.word_count));
        if !self.table_of_contents.is_empty() {
            parts.push(format!("Sections: {}", self.table_of_contents.len()));
        }

        parts.join(" | ")
    }
}

/// Document-level metadata derived during extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureMetadata {
    /// Number of extracted elements
    pub total_elements: usize,

    /// Element count per kind
    pub element_types: BTreeMap<ElementKind, usize>,

    /// Whitespace-separated tokens in the source text
    pub word_count: usize,

    /// Characters in the source text
    pub char_count: usize,

    /// Newline-separated lines in the source text
    pub line_count: usize,

    /// Content of the first level-1 title or heading
    pub title: Option<String>,
}

impl StructureMetadata {
    /// Count of elements of one kind.
    pub fn count_of(&self, kind: ElementKind) -> usize {
        self.element_types.get(&kind).copied().unwrap_or(0)
    }
}

/// A single table of contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Heading content
    pub title: String,

    /// Heading level
    pub level: u8,

    /// Position of the heading element
    pub position: usize,

    /// Id of the heading element
    pub element_id: ElementId,
}
