//! Reading notebooks from their JSON representation.

use crate::ast::Notebook;
use crate::error::{ParseError, Result};
use serde_json::Value;
use std::path::Path;

/// The only notebook format major version this crate understands.
pub const SUPPORTED_NBFORMAT: u32 = 4;

/// Parse a notebook from its JSON source text.
pub fn parse(input: &str) -> Result<Notebook> {
    let value: Value = serde_json::from_str(input).map_err(ParseError::from)?;
    parse_value(value)
}

/// Build a notebook from an already decoded JSON value.
pub fn parse_value(value: Value) -> Result<Notebook> {
    // serde also accepts a sequence for a struct, and every notebook field
    // has a default, so `[]` would decode as an empty notebook.
    if !value.is_object() {
        return Err(ParseError::Json(format!(
            "expected a notebook object, found {}",
            json_kind(&value)
        ))
        .into());
    }

    // Check the version first: a v3 notebook would otherwise fail with a
    // confusing shape error about missing `cells`.
    if let Some(version) = value.get("nbformat").and_then(Value::as_u64) {
        if version != u64::from(SUPPORTED_NBFORMAT) {
            let version = u32::try_from(version).unwrap_or(u32::MAX);
            return Err(ParseError::UnsupportedVersion(version).into());
        }
    }

    let notebook = serde_json::from_value(value).map_err(ParseError::from)?;
    Ok(notebook)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Read and parse a notebook file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Notebook> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}
