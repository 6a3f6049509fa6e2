//! Error types for docprep library.
//!
//! Parsing and normalization are total over decoded text and never fail.
//! These errors cover the surrounding surface: configuration parsing,
//! id lookups and serialization.

use std::io;
use thiserror::Error;

/// Result type alias for docprep operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur around document processing.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The cleaning level name is not one of minimal, standard, aggressive.
    #[error("Invalid cleaning level: {0} (expected minimal, standard or aggressive)")]
    InvalidCleaningLevel(String),

    /// An element id string is not of the form `element_<n>`.
    #[error("Invalid element id: {0}")]
    InvalidElementId(String),

    /// Error during rendering.
    #[error("Rendering error: {0}")]
    Render(String),
}
