//! Structural extraction module.

pub mod rules;
mod structure_parser;

pub use structure_parser::StructureParser;
