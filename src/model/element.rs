//! Element-level types.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of a structural element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Document title
    Title,
    /// Section heading
    Heading,
    /// Subsection heading
    Subheading,
    /// Body text
    Paragraph,
    /// Single bullet, numbered or lettered list entry
    ListItem,
    /// Pipe-delimited or ASCII-bordered table
    Table,
    /// Fenced or indented code
    CodeBlock,
    /// Quoted passage
    Quote,
    /// Document metadata block
    Metadata,
    /// Content that could not be classified
    Unknown,
}

impl ElementKind {
    /// All kinds in declaration order.
    pub const ALL: [ElementKind; 10] = [
        ElementKind::Title,
        ElementKind::Heading,
        ElementKind::Subheading,
        ElementKind::Paragraph,
        ElementKind::ListItem,
        ElementKind::Table,
        ElementKind::CodeBlock,
        ElementKind::Quote,
        ElementKind::Metadata,
        ElementKind::Unknown,
    ];

    /// The serialized name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Title => "title",
            ElementKind::Heading => "heading",
            ElementKind::Subheading => "subheading",
            ElementKind::Paragraph => "paragraph",
            ElementKind::ListItem => "list_item",
            ElementKind::Table => "table",
            ElementKind::CodeBlock => "code_block",
            ElementKind::Quote => "quote",
            ElementKind::Metadata => "metadata",
            ElementKind::Unknown => "unknown",
        }
    }

    /// Title and Heading elements open a hierarchy scope.
    pub fn is_heading_like(&self) -> bool {
        matches!(self, ElementKind::Title | ElementKind::Heading)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index of an element in its structure's element arena.
///
/// The id equals the element's `position`, so lookups are a plain slice index.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ElementId(pub usize);

impl ElementId {
    /// Arena index of this id.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element_{}", self.0)
    }
}

impl FromStr for ElementId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.strip_prefix("element_")
            .and_then(|n| n.parse::<usize>().ok())
            .map(ElementId)
            .ok_or_else(|| Error::InvalidElementId(s.to_string()))
    }
}

impl From<usize> for ElementId {
    fn from(index: usize) -> Self {
        ElementId(index)
    }
}

/// Inclusive, zero-based source line range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LineSpan {
    /// First source line
    pub start: usize,
    /// Last source line
    pub end: usize,
}

impl LineSpan {
    /// Create a span covering `start..=end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of source lines covered.
    pub fn line_count(&self) -> usize {
        self.end.saturating_sub(self.start) + 1
    }
}

/// A structural unit of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentElement {
    /// Text covered by this element (possibly multi-line)
    pub content: String,

    /// Element kind
    pub kind: ElementKind,

    /// Hierarchy depth (1 = top-level heading, 0 = non-hierarchical)
    pub level: u8,

    /// Zero-based position among all elements of the document
    pub position: usize,

    /// Source lines this element was extracted from
    pub span: LineSpan,

    /// Nearest enclosing heading or title
    pub parent_id: Option<ElementId>,

    /// Elements directly nested under this one (headings only)
    pub children_ids: Vec<ElementId>,
}

impl DocumentElement {
    /// Create a new element without relations.
    pub fn new(
        content: impl Into<String>,
        kind: ElementKind,
        level: u8,
        position: usize,
        span: LineSpan,
    ) -> Self {
        Self {
            content: content.into(),
            kind,
            level,
            position,
            span,
            parent_id: None,
            children_ids: Vec::new(),
        }
    }

    /// Arena id of this element.
    pub fn id(&self) -> ElementId {
        ElementId(self.position)
    }

    /// Check if the content is blank.
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Content length in characters.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Check if this is a title or heading.
    pub fn is_heading(&self) -> bool {
        self.kind.is_heading_like()
    }
}
