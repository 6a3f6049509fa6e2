//! Rendering module for serialized output.

mod json;

pub use json::{from_json, to_json, JsonFormat};
