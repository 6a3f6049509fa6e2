//! Structural extraction from decoded text.

use super::rules;
use crate::detect::{detect_format, DocumentFormat};
use crate::model::{
    DocumentElement, DocumentStructure, ElementId, ElementKind, LineSpan, StructureMetadata,
    TocEntry,
};
use std::collections::BTreeMap;

/// Level assigned to list items, tables and code blocks.
const BLOCK_LEVEL: u8 = 1;
/// Level assigned to paragraphs.
const PARAGRAPH_LEVEL: u8 = 0;

/// Result of classifying the element that starts at a line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Classified {
    kind: ElementKind,
    level: u8,
    lines: Vec<String>,
}

/// Turns an unstructured character stream into a typed element sequence.
///
/// The parser is stateless; one instance can be shared across threads and
/// used for any number of documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructureParser;

impl StructureParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse text into a document structure.
    ///
    /// Empty or whitespace-only text yields an empty structure.
    ///
    /// # Example
    /// ```
    /// use docprep::parser::StructureParser;
    /// use docprep::model::ElementKind;
    ///
    /// let structure = StructureParser::new().parse("# Title\n\nSome paragraph text here.", "md");
    /// assert_eq!(structure.elements.len(), 2);
    /// assert_eq!(structure.elements[0].kind, ElementKind::Heading);
    /// assert_eq!(structure.elements[1].kind, ElementKind::Paragraph);
    /// ```
    pub fn parse(&self, text: &str, format_hint: &str) -> DocumentStructure {
        if text.trim().is_empty() {
            return DocumentStructure::default();
        }

        let lines: Vec<&str> = text.split('\n').collect();
        let format = detect_format(text, format_hint);
        log::debug!(
            "StructureParser: format={} (hint {:?}), {} lines",
            format,
            format_hint,
            lines.len()
        );

        let mut elements = self.parse_elements(&lines, format);
        let hierarchy = build_hierarchy(&mut elements);
        let metadata = extract_metadata(&elements, text);
        let table_of_contents = table_of_contents(&elements);

        log::debug!(
            "StructureParser: {} elements, {} parents, {} toc entries",
            elements.len(),
            hierarchy.len(),
            table_of_contents.len()
        );

        DocumentStructure {
            elements,
            hierarchy,
            metadata,
            table_of_contents,
        }
    }

    fn parse_elements(&self, lines: &[&str], format: DocumentFormat) -> Vec<DocumentElement> {
        let mut elements = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            if lines[i].trim().is_empty() {
                i += 1;
                continue;
            }

            let classified = classify(lines, i, format)
                .unwrap_or_else(|| paragraph(lines, i, format));

            let consumed = classified.lines.len().max(1);
            let span = LineSpan::new(i, i + consumed - 1);
            let position = elements.len();
            elements.push(DocumentElement::new(
                classified.lines.join("\n"),
                classified.kind,
                classified.level,
                position,
                span,
            ));
            i += consumed;
        }

        elements
    }
}

/// Classify the element starting at `start`, first match wins.
fn classify(lines: &[&str], start: usize, format: DocumentFormat) -> Option<Classified> {
    let raw = lines[start];
    let line = raw.trim();

    if let Some(level) = rules::heading_level(line, format) {
        return Some(Classified {
            kind: ElementKind::Heading,
            level,
            lines: vec![line.to_string()],
        });
    }

    if rules::is_list_item(line) {
        return Some(Classified {
            kind: ElementKind::ListItem,
            level: BLOCK_LEVEL,
            lines: vec![line.to_string()],
        });
    }

    if rules::is_table_row(line) {
        return Some(Classified {
            kind: ElementKind::Table,
            level: BLOCK_LEVEL,
            lines: table_lines(lines, start),
        });
    }

    if rules::is_fence(line) {
        return Some(Classified {
            kind: ElementKind::CodeBlock,
            level: BLOCK_LEVEL,
            lines: fenced_code_lines(lines, start),
        });
    }

    if rules::is_indented_code(raw) {
        return Some(Classified {
            kind: ElementKind::CodeBlock,
            level: BLOCK_LEVEL,
            lines: indented_code_lines(lines, start),
        });
    }

    None
}

/// Consecutive non-blank lines up to the next structured line.
fn paragraph(lines: &[&str], start: usize, format: DocumentFormat) -> Classified {
    let mut collected = Vec::new();

    for (offset, raw) in lines[start..].iter().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            break;
        }
        if offset > 0 && rules::is_structured_line(line, format) {
            break;
        }
        collected.push(line.to_string());
    }

    Classified {
        kind: ElementKind::Paragraph,
        level: PARAGRAPH_LEVEL,
        lines: collected,
    }
}

fn table_lines(lines: &[&str], start: usize) -> Vec<String> {
    let mut collected = vec![lines[start].to_string()];
    collected.extend(
        lines[start + 1..]
            .iter()
            .take_while(|raw| rules::continues_table(raw))
            .map(|raw| raw.to_string()),
    );
    collected
}

fn fenced_code_lines(lines: &[&str], start: usize) -> Vec<String> {
    let mut collected = vec![lines[start].trim().to_string()];
    let mut i = start + 1;

    while i < lines.len() && !rules::is_fence(lines[i].trim()) {
        collected.push(lines[i].to_string());
        i += 1;
    }
    // Closing fence, when present.
    if i < lines.len() {
        collected.push(lines[i].to_string());
    }

    collected
}

fn indented_code_lines(lines: &[&str], start: usize) -> Vec<String> {
    lines[start..]
        .iter()
        .take_while(|raw| rules::is_indented_code(raw))
        .map(|raw| raw.to_string())
        .collect()
}

/// Assign parents from an explicit heading stack.
///
/// Only titles and headings are pushed; every element pops entries whose
/// level is not strictly lower than its own, so parent levels are always
/// strictly lower than child levels.
fn build_hierarchy(elements: &mut [DocumentElement]) -> BTreeMap<ElementId, Vec<ElementId>> {
    let mut hierarchy: BTreeMap<ElementId, Vec<ElementId>> = BTreeMap::new();
    let mut stack: Vec<(ElementId, u8)> = Vec::new();

    for index in 0..elements.len() {
        let id = elements[index].id();
        let level = elements[index].level;

        while stack.last().is_some_and(|&(_, top)| top >= level) {
            stack.pop();
        }

        if let Some(&(parent, _)) = stack.last() {
            elements[index].parent_id = Some(parent);
            elements[parent.index()].children_ids.push(id);
            hierarchy.entry(parent).or_default().push(id);
        }

        if elements[index].is_heading() {
            stack.push((id, level));
        }
    }

    hierarchy
}

fn extract_metadata(elements: &[DocumentElement], text: &str) -> StructureMetadata {
    let mut element_types = BTreeMap::new();
    for element in elements {
        *element_types.entry(element.kind).or_insert(0) += 1;
    }

    let title = elements
        .iter()
        .find(|e| e.is_heading() && e.level == 1)
        .map(|e| e.content.clone());

    StructureMetadata {
        total_elements: elements.len(),
        element_types,
        word_count: text.split_whitespace().count(),
        char_count: text.chars().count(),
        line_count: text.split('\n').count(),
        title,
    }
}

fn table_of_contents(elements: &[DocumentElement]) -> Vec<TocEntry> {
    elements
        .iter()
        .filter(|e| e.is_heading())
        .map(|e| TocEntry {
            title: e.content.clone(),
            level: e.level,
            position: e.position,
            element_id: e.id(),
        })
        .collect()
}
