//! Reading the title of a notebook.

use crate::ast::{Cell, Notebook};
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// Title of the notebook, or an empty string if it has none.
///
/// The title is taken from the notebook metadata. Without one, and when
/// the first cell is a Markdown cell, it is the text of the first level 1
/// heading in that cell, with formatting stripped.
pub fn title_of(notebook: &Notebook) -> String {
    if let Some(title) = notebook.metadata.title.as_deref().filter(|t| !t.is_empty()) {
        return title.to_string();
    }

    match notebook.cells.first() {
        Some(Cell::Markdown(cell)) => first_heading(&cell.source.join()).unwrap_or_default(),
        _ => String::new(),
    }
}

/// Text of the first level 1 heading in `markdown`.
fn first_heading(markdown: &str) -> Option<String> {
    let mut title: Option<String> = None;

    for event in Parser::new_ext(markdown, Options::empty()) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => title = Some(String::new()),
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                return title.map(|t| t.trim().to_string());
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(title) = title.as_mut() {
                    title.push_str(&text);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn notebook(metadata: Value, cells: Value) -> Notebook {
        serde_json::from_value(json!({
            "metadata": metadata,
            "nbformat": 4,
            "nbformat_minor": 3,
            "cells": cells,
        }))
        .unwrap()
    }

    fn markdown_cell(source: Value) -> Value {
        json!({"cell_type": "markdown", "metadata": {}, "source": source})
    }

    #[test]
    fn test_metadata_title_wins() {
        let nb = notebook(
            json!({"title": "Metadata Title"}),
            json!([markdown_cell(json!("# Markdown Title\n\nLorem ipsum dolor"))]),
        );
        assert_eq!(title_of(&nb), "Metadata Title");
    }

    #[test]
    fn test_title_from_markdown() {
        let nb = notebook(
            json!({}),
            json!([markdown_cell(json!("# Markdown Title\n\nLorem ipsum dolor"))]),
        );
        assert_eq!(title_of(&nb), "Markdown Title");
    }

    #[test]
    fn test_empty_metadata_title_is_ignored() {
        let nb = notebook(json!({"title": ""}), json!([markdown_cell(json!("# Other"))]));
        assert_eq!(title_of(&nb), "Other");
    }

    #[test]
    fn test_formatting_is_stripped() {
        let nb = notebook(
            json!({}),
            json!([markdown_cell(json!([
                "# *Title* Level 1\n",
                "\n",
                "Lorem ipsum\n",
                "\n",
                "## Title Level 2\n",
                "\n",
                "dolor sit amet\n",
            ]))]),
        );
        assert_eq!(title_of(&nb), "Title Level 1");
    }

    #[test]
    fn test_title_not_on_first_line() {
        let nb = notebook(
            json!({}),
            json!([markdown_cell(json!("Lorem ipsum\n\n# Title Level 1\n\ndolor sit amet.\n"))]),
        );
        assert_eq!(title_of(&nb), "Title Level 1");
    }

    #[test]
    fn test_first_of_multiple_titles() {
        let nb = notebook(
            json!({}),
            json!([markdown_cell(json!(["# First Title\n\nLorem ipsum\n\n# Second Title\n\ndolor sit amet\n"]))]),
        );
        assert_eq!(title_of(&nb), "First Title");
    }

    #[test]
    fn test_setext_heading() {
        let nb = notebook(json!({}), json!([markdown_cell(json!("Setext\n======\n"))]));
        assert_eq!(title_of(&nb), "Setext");
    }

    #[test]
    fn test_no_level_1_title() {
        let nb = notebook(
            json!({}),
            json!([markdown_cell(json!(["Lorem ipsum\n", "## dolor sit amet\n"]))]),
        );
        assert_eq!(title_of(&nb), "");
    }

    #[test]
    fn test_first_cell_not_markdown() {
        let nb = notebook(
            json!({}),
            json!([
                {"cell_type": "raw", "metadata": {}, "source": "Lorem ipsum\n"},
                markdown_cell(json!("# Later")),
            ]),
        );
        assert_eq!(title_of(&nb), "");
    }

    #[test]
    fn test_no_cells() {
        assert_eq!(title_of(&notebook(json!({}), json!([]))), "");
    }
}
