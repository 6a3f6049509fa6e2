//! Document model types.
//!
//! This module defines the representation that bridges structural
//! extraction and normalization. Elements live in one arena per document;
//! hierarchy relations are plain index lookups into it.

mod element;
mod structure;

pub use element::{DocumentElement, ElementId, ElementKind, LineSpan};
pub use structure::{DocumentStructure, StructureMetadata, TocEntry};
