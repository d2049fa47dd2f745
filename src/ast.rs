//! Data model for Jupyter notebooks (nbformat v4).
//!
//! The types deserialize directly from the notebook JSON. Cells and outputs
//! with a type tag this crate does not know about deserialize to an `Unknown`
//! variant, so that rendering can degrade gracefully instead of failing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A complete parsed notebook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    /// Notebook root-level metadata.
    #[serde(default)]
    pub metadata: NotebookMetadata,
    /// Notebook format (major number).
    #[serde(default = "default_nbformat")]
    pub nbformat: u32,
    /// Notebook format (minor number).
    #[serde(default)]
    pub nbformat_minor: u32,
    /// Cells in display order.
    #[serde(default)]
    pub cells: Vec<Cell>,
}

fn default_nbformat() -> u32 {
    4
}

impl Notebook {
    /// Name of the programming language of the notebook's code cells.
    ///
    /// Taken from `language_info.name`, then `kernelspec.language`.
    pub fn language(&self) -> Option<&str> {
        self.metadata
            .language_info
            .as_ref()
            .map(|info| info.name.as_str())
            .or_else(|| {
                self.metadata
                    .kernelspec
                    .as_ref()
                    .and_then(|spec| spec.language.as_deref())
            })
    }
}

/// Notebook root-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotebookMetadata {
    /// Declared title of the notebook.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Kernel information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernelspec: Option<KernelSpec>,
    /// Language information of the kernel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_info: Option<LanguageInfo>,
    /// Author(s) of the notebook; entries are arbitrary JSON in the wild.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<Value>,
    /// Any other metadata keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Kernel specification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KernelSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Kernel language information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageInfo {
    /// The programming language which this kernel runs.
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Text stored either as one string or as an array of line fragments.
///
/// Fragments are joined by plain concatenation; they already carry their own
/// line endings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MultilineString {
    Single(String),
    Lines(Vec<String>),
}

impl Default for MultilineString {
    fn default() -> Self {
        Self::Single(String::new())
    }
}

impl MultilineString {
    /// Recover the logical text.
    pub fn join(&self) -> String {
        match self {
            Self::Single(s) => s.clone(),
            Self::Lines(lines) => lines.concat(),
        }
    }

    /// `""` and `[]` are empty; `[""]` is not.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(s) => s.is_empty(),
            Self::Lines(lines) => lines.is_empty(),
        }
    }

    /// Append the fragments of `other` after our own.
    pub fn append(&mut self, other: &MultilineString) {
        let mut lines = match std::mem::take(self) {
            Self::Single(s) => vec![s],
            Self::Lines(lines) => lines,
        };
        match other {
            Self::Single(s) => lines.push(s.clone()),
            Self::Lines(more) => lines.extend(more.iter().cloned()),
        }
        *self = Self::Lines(lines);
    }
}

impl From<&str> for MultilineString {
    fn from(s: &str) -> Self {
        Self::Single(s.to_string())
    }
}

impl From<Vec<&str>> for MultilineString {
    fn from(lines: Vec<&str>) -> Self {
        Self::Lines(lines.into_iter().map(String::from).collect())
    }
}

/// One cell of a notebook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
pub enum Cell {
    Markdown(MarkdownCell),
    Raw(RawCell),
    Code(CodeCell),
    /// A cell type from a newer format version.
    #[serde(other)]
    Unknown,
}

/// Narrative (Markdown) cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkdownCell {
    #[serde(default)]
    pub source: MultilineString,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// Raw cell, passed through verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCell {
    #[serde(default)]
    pub source: MultilineString,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// Code cell with its outputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeCell {
    #[serde(default)]
    pub source: MultilineString,
    /// `None` when the cell was never executed.
    #[serde(default)]
    pub execution_count: Option<u32>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub outputs: Vec<Output>,
}

/// One result record of a code cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum Output {
    ExecuteResult(ExecuteResult),
    DisplayData(DisplayData),
    Stream(StreamOutput),
    Error(ErrorOutput),
    /// An output type from a newer format version.
    #[serde(other)]
    Unknown,
}

/// Result of executing a code cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecuteResult {
    #[serde(default)]
    pub data: MimeBundle,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub execution_count: Option<u32>,
}

/// Rich data displayed by a code cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayData {
    #[serde(default)]
    pub data: MimeBundle,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// Text written to a named stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamOutput {
    /// Stream name, e.g. `stdout` or `stderr`.
    pub name: String,
    #[serde(default)]
    pub text: MultilineString,
}

/// An error raised while executing a code cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorOutput {
    #[serde(default)]
    pub ename: String,
    #[serde(default)]
    pub evalue: String,
    #[serde(default)]
    pub traceback: Vec<String>,
}

/// Alternative representations of one output, keyed by media type.
pub type MimeBundle = BTreeMap<String, MimeData>;

/// One representation inside a [`MimeBundle`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MimeData {
    Text(MultilineString),
    /// Structured data such as `application/json`.
    Json(Value),
}

impl MimeData {
    /// Text handed to a media-type renderer.
    pub fn join(&self) -> String {
        match self {
            Self::Text(text) => text.join(),
            Self::Json(value) => value.to_string(),
        }
    }

    /// Whether this representation carries anything worth rendering.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Text(MultilineString::Single(s)) => !s.is_empty(),
            Self::Text(MultilineString::Lines(_)) => true,
            Self::Json(value) => !value.is_null(),
        }
    }
}

impl From<&str> for MimeData {
    fn from(s: &str) -> Self {
        Self::Text(s.into())
    }
}

impl From<Vec<&str>> for MimeData {
    fn from(lines: Vec<&str>) -> Self {
        Self::Text(lines.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_multiline_join() {
        let text = MultilineString::from(vec!["foo\n", "bar"]);
        assert_eq!(text.join(), "foo\nbar");
        assert_eq!(MultilineString::from("baz").join(), "baz");
    }

    #[test]
    fn test_multiline_empty() {
        assert!(MultilineString::from("").is_empty());
        assert!(MultilineString::Lines(vec![]).is_empty());
        assert!(!MultilineString::from(vec![""]).is_empty());
    }

    #[test]
    fn test_multiline_append() {
        let mut text = MultilineString::from("a");
        text.append(&MultilineString::from(vec!["b", "c"]));
        assert_eq!(text, MultilineString::from(vec!["a", "b", "c"]));
        assert_eq!(text.join(), "abc");
    }

    #[test]
    fn test_unknown_cell_type() {
        let cell: Cell = serde_json::from_value(json!({
            "cell_type": "whatever",
            "metadata": {},
        }))
        .unwrap();
        assert_eq!(cell, Cell::Unknown);
    }

    #[test]
    fn test_code_cell_outputs() {
        let cell: Cell = serde_json::from_value(json!({
            "cell_type": "code",
            "source": ["print(1)\n", "print(2)"],
            "execution_count": null,
            "metadata": {},
            "outputs": [
                {"output_type": "stream", "name": "stdout", "text": ["1\n", "2\n"]},
                {"output_type": "display_data", "data": {"application/json": {"a": 1}}, "metadata": {}},
                {"output_type": "future_output"},
            ],
        }))
        .unwrap();

        let Cell::Code(code) = cell else {
            panic!("expected code cell");
        };
        assert_eq!(code.execution_count, None);
        assert_eq!(code.source.join(), "print(1)\nprint(2)");
        assert_eq!(code.outputs.len(), 3);
        assert_eq!(code.outputs[2], Output::Unknown);

        let Output::DisplayData(display) = &code.outputs[1] else {
            panic!("expected display data");
        };
        assert_eq!(display.data["application/json"].join(), r#"{"a":1}"#);
    }

    #[test]
    fn test_language_fallback() {
        let notebook: Notebook = serde_json::from_value(json!({
            "metadata": {"kernelspec": {"name": "ir", "display_name": "R", "language": "R"}},
            "nbformat": 4,
            "nbformat_minor": 2,
            "cells": [],
        }))
        .unwrap();
        assert_eq!(notebook.language(), Some("R"));
    }

    #[test]
    fn test_mime_presence() {
        assert!(!MimeData::from("").is_present());
        assert!(MimeData::Text(MultilineString::Lines(Vec::new())).is_present());
        assert!(!MimeData::Json(Value::Null).is_present());
    }
}
