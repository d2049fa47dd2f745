//! The notebook renderer.
//!
//! [`NbRenderer`] holds the configuration of a render: the element builder,
//! the text converters and the media-type renderers. Walking the notebook is
//! done by the [`Render`] trait. Each of its methods handles one node type
//! and by default calls the free function of the same name, so an
//! implementation can override a single node type and keep the rest.
//!
//! ```
//! use ipynb_render::render::{Element, NbRenderer, Render, RendererOptions};
//!
//! let notebook = ipynb_render::parse(r#"{"metadata": {}, "nbformat": 4, "nbformat_minor": 5, "cells": []}"#).unwrap();
//! let renderer = NbRenderer::new(Default::default(), RendererOptions::<Element>::default());
//! let html = renderer.render(&notebook).unwrap().outer_html();
//! assert_eq!(html, r#"<div class="nb-notebook"></div>"#);
//! ```

use crate::ast::{
    Cell, CodeCell, DisplayData, ErrorOutput, ExecuteResult, MarkdownCell, MimeBundle, Notebook,
    Output, RawCell, StreamOutput,
};
use crate::error::{RenderError, Result};
use crate::render::data::builtin_renderers;
use crate::render::element::{Attrs, Body, ElementBuilder, MinimalElement};
use crate::render::escape::escape_html;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Converts text (Markdown or text with ANSI escape codes) to HTML.
pub type TextConverter = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Highlights source code; called with the code and the language name.
pub type CodeHighlighter = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

/// Renders one representation of an output into an element.
pub type DataRenderer<E> = Arc<dyn Fn(&NbRenderer<E>, &str) -> Result<E> + Send + Sync>;

/// Language of code cells when the notebook does not declare one.
pub const DEFAULT_LANGUAGE: &str = "python";

/// Options of [`NbRenderer::new`]. Converters left out fall back to an
/// escaping (or, for Markdown, identity) pass-through.
pub struct RendererOptions<E> {
    /// Additional media-type renderers. A renderer for a built-in type
    /// replaces the built-in one.
    pub data_renderers: Vec<(String, DataRenderer<E>)>,
    /// Media types in priority order. Defaults to the additional types in
    /// the given order followed by the remaining built-in types.
    pub data_types_priority: Option<Vec<String>>,
    pub markdown_renderer: Option<TextConverter>,
    pub ansi_codes_renderer: Option<TextConverter>,
    pub code_highlighter: Option<CodeHighlighter>,
    /// Language used when the notebook metadata does not declare one.
    pub default_language: Option<String>,
}

impl<E> Default for RendererOptions<E> {
    fn default() -> Self {
        Self {
            data_renderers: Vec::new(),
            data_types_priority: None,
            markdown_renderer: None,
            ansi_codes_renderer: None,
            code_highlighter: None,
            default_language: None,
        }
    }
}

/// Renders notebooks into trees of `E`.
///
/// The configuration is fixed at construction; rendering never mutates the
/// renderer or the notebook, so one renderer can be shared between threads.
pub struct NbRenderer<E> {
    el: ElementBuilder<E>,
    markdown_renderer: TextConverter,
    ansi_codes_renderer: TextConverter,
    code_highlighter: CodeHighlighter,
    data_renderers: HashMap<String, DataRenderer<E>>,
    data_types_priority: Vec<String>,
    default_language: String,
}

impl<E> fmt::Debug for NbRenderer<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NbRenderer")
            .field("el", &self.el)
            .field("data_types_priority", &self.data_types_priority)
            .field("default_language", &self.default_language)
            .finish_non_exhaustive()
    }
}

impl<E: MinimalElement + 'static> NbRenderer<E> {
    /// Create a renderer building its elements with `el`.
    pub fn new(el: ElementBuilder<E>, opts: RendererOptions<E>) -> Self {
        let RendererOptions {
            data_renderers: user_renderers,
            data_types_priority,
            markdown_renderer,
            ansi_codes_renderer,
            code_highlighter,
            default_language,
        } = opts;

        let mut priority: Vec<String> = Vec::new();
        let mut data_renderers = HashMap::new();

        for (mime_type, renderer) in builtin_renderers::<E>() {
            data_renderers.insert(mime_type.to_string(), renderer);
        }
        for (mime_type, renderer) in user_renderers {
            if !priority.contains(&mime_type) {
                priority.push(mime_type.clone());
            }
            data_renderers.insert(mime_type, renderer);
        }
        for (mime_type, _) in builtin_renderers::<E>() {
            if !priority.iter().any(|t| t == mime_type) {
                priority.push(mime_type.to_string());
            }
        }

        Self {
            el,
            markdown_renderer: markdown_renderer
                .unwrap_or_else(|| Arc::new(|markdown: &str| markdown.to_string()) as TextConverter),
            ansi_codes_renderer: ansi_codes_renderer
                .unwrap_or_else(|| Arc::new(escape_html) as TextConverter),
            code_highlighter: code_highlighter.unwrap_or_else(|| {
                Arc::new(|code: &str, _lang: &str| escape_html(code)) as CodeHighlighter
            }),
            data_renderers,
            data_types_priority: data_types_priority.unwrap_or(priority),
            default_language: default_language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        }
    }
}

impl<E: MinimalElement> NbRenderer<E> {
    pub fn element_builder(&self) -> &ElementBuilder<E> {
        &self.el
    }

    /// Build an element with the renderer's element builder.
    pub fn el(&self, tag: &str, attrs: Attrs<'_>, body: Body<E>) -> E {
        self.el.build(tag, attrs, body)
    }

    /// Convert Markdown to HTML.
    pub fn render_markdown(&self, markdown: &str) -> String {
        (self.markdown_renderer)(markdown)
    }

    /// Convert text with ANSI escape codes to HTML.
    pub fn render_ansi_codes(&self, text: &str) -> String {
        (self.ansi_codes_renderer)(text)
    }

    /// Highlight `code` written in `lang` as HTML.
    pub fn highlight_code(&self, code: &str, lang: &str) -> String {
        (self.code_highlighter)(code, lang)
    }

    /// Media types in priority order.
    pub fn data_types_priority(&self) -> &[String] {
        &self.data_types_priority
    }

    /// Whether a renderer is registered for `mime_type`.
    pub fn has_data_renderer(&self, mime_type: &str) -> bool {
        self.data_renderers.contains_key(mime_type)
    }

    /// Language of the notebook's code cells.
    pub fn notebook_language<'a>(&'a self, notebook: &'a Notebook) -> &'a str {
        notebook.language().unwrap_or(&self.default_language)
    }

    /// Render `data` with the renderer registered for `mime_type`.
    pub fn render_data(&self, mime_type: &str, data: &str) -> Result<E> {
        let render = self
            .data_renderers
            .get(mime_type)
            .ok_or_else(|| RenderError::MissingRenderer(mime_type.to_string()))?;
        render(self, data)
    }

    /// The media type of `bundle` to render: the first type in priority
    /// order that the bundle contains and that has a renderer.
    pub fn resolve_data_type<'a>(&'a self, bundle: &MimeBundle) -> Option<&'a str> {
        self.data_types_priority
            .iter()
            .find(|mime_type| {
                bundle.get(mime_type.as_str()).is_some_and(|data| data.is_present())
                    && self.has_data_renderer(mime_type)
            })
            .map(String::as_str)
    }
}

/// Per-node rendering of a notebook.
///
/// Only [`Render::renderer`] is required. Every other method defaults to the
/// free function of the same name in this module.
pub trait Render<E: MinimalElement> {
    /// The configuration to render with.
    fn renderer(&self) -> &NbRenderer<E>;

    /// Render the whole notebook.
    fn render(&self, notebook: &Notebook) -> Result<E> {
        render_notebook(self, notebook)
    }

    fn render_cell(&self, cell: &Cell, notebook: &Notebook) -> Result<E> {
        render_cell(self, cell, notebook)
    }

    fn render_markdown_cell(&self, cell: &MarkdownCell, notebook: &Notebook) -> Result<E> {
        render_markdown_cell(self, cell, notebook)
    }

    fn render_raw_cell(&self, cell: &RawCell, notebook: &Notebook) -> Result<E> {
        render_raw_cell(self, cell, notebook)
    }

    fn render_code_cell(&self, cell: &CodeCell, notebook: &Notebook) -> Result<E> {
        render_code_cell(self, cell, notebook)
    }

    fn render_source(&self, cell: &CodeCell, notebook: &Notebook) -> Result<E> {
        render_source(self, cell, notebook)
    }

    fn render_output(&self, output: &Output, cell: &CodeCell) -> Result<E> {
        render_output(self, output, cell)
    }

    fn render_display_data(&self, output: &DisplayData) -> Result<E> {
        render_display_data(self, output)
    }

    fn render_execute_result(&self, output: &ExecuteResult) -> Result<E> {
        render_execute_result(self, output)
    }

    fn render_error(&self, error: &ErrorOutput) -> Result<E> {
        render_error(self, error)
    }

    fn render_stream(&self, stream: &StreamOutput) -> Result<E> {
        render_stream(self, stream)
    }
}

impl<E: MinimalElement> Render<E> for NbRenderer<E> {
    fn renderer(&self) -> &NbRenderer<E> {
        self
    }
}

pub fn render_notebook<E, R>(r: &R, notebook: &Notebook) -> Result<E>
where
    E: MinimalElement,
    R: Render<E> + ?Sized,
{
    log::debug!("Rendering notebook with {} cells", notebook.cells.len());

    let children = notebook
        .cells
        .iter()
        .map(|cell| r.render_cell(cell, notebook))
        .collect::<Result<Vec<_>>>()?;

    Ok(r.renderer()
        .el("div", Attrs::Classes(&["notebook"]), Body::Children(children)))
}

pub fn render_cell<E, R>(r: &R, cell: &Cell, notebook: &Notebook) -> Result<E>
where
    E: MinimalElement,
    R: Render<E> + ?Sized,
{
    match cell {
        Cell::Code(cell) => r.render_code_cell(cell, notebook),
        Cell::Markdown(cell) => r.render_markdown_cell(cell, notebook),
        Cell::Raw(cell) => r.render_raw_cell(cell, notebook),
        Cell::Unknown => {
            log::warn!("Skipping cell of unsupported type");
            Ok(unsupported(r.renderer(), "<!-- Unsupported cell type -->"))
        }
    }
}

pub fn render_markdown_cell<E, R>(r: &R, cell: &MarkdownCell, _notebook: &Notebook) -> Result<E>
where
    E: MinimalElement,
    R: Render<E> + ?Sized,
{
    let renderer = r.renderer();
    let html = renderer.render_markdown(&cell.source.join());
    Ok(renderer.el(
        "section",
        Attrs::Classes(&["cell", "markdown-cell"]),
        Body::Html(html),
    ))
}

pub fn render_raw_cell<E, R>(r: &R, cell: &RawCell, _notebook: &Notebook) -> Result<E>
where
    E: MinimalElement,
    R: Render<E> + ?Sized,
{
    Ok(r.renderer().el(
        "section",
        Attrs::Classes(&["cell", "raw-cell"]),
        Body::Html(cell.source.join()),
    ))
}

pub fn render_code_cell<E, R>(r: &R, cell: &CodeCell, notebook: &Notebook) -> Result<E>
where
    E: MinimalElement,
    R: Render<E> + ?Sized,
{
    let source = if cell.source.is_empty() {
        r.renderer().el("div", Attrs::None, Body::Empty)
    } else {
        r.render_source(cell, notebook)?
    };

    let mut children = vec![source];
    for output in coalesce_streams(&cell.outputs) {
        children.push(r.render_output(&output, cell)?);
    }

    Ok(r.renderer().el(
        "section",
        Attrs::Classes(&["cell", "code-cell"]),
        Body::Children(children),
    ))
}

pub fn render_source<E, R>(r: &R, cell: &CodeCell, notebook: &Notebook) -> Result<E>
where
    E: MinimalElement,
    R: Render<E> + ?Sized,
{
    let renderer = r.renderer();
    let lang = renderer.notebook_language(notebook);
    let html = renderer.highlight_code(&cell.source.join(), lang);

    let lang_class = format!("lang-{}", lang);
    let code = renderer.el(
        "code",
        Attrs::Map(&[("class", lang_class.as_str()), ("data-language", lang)]),
        Body::Html(html),
    );
    let pre = renderer.el("pre", Attrs::None, Body::Children(vec![code]));

    // "input" and data-prompt-number are kept for stylesheets written for
    // notebook.js.
    let count = cell.execution_count.map(|n| n.to_string());
    let attrs = execution_count_attrs(count.as_deref(), "source input");

    Ok(renderer.el("div", Attrs::Map(&attrs), Body::Children(vec![pre])))
}

pub fn render_output<E, R>(r: &R, output: &Output, cell: &CodeCell) -> Result<E>
where
    E: MinimalElement,
    R: Render<E> + ?Sized,
{
    let inner = match output {
        Output::DisplayData(output) => r.render_display_data(output)?,
        Output::ExecuteResult(output) => r.render_execute_result(output)?,
        Output::Stream(stream) => r.render_stream(stream)?,
        Output::Error(error) => r.render_error(error)?,
        Output::Unknown => {
            log::warn!("Skipping output of unsupported type");
            unsupported(r.renderer(), "<!-- Unsupported output type -->")
        }
    };

    let count = cell.execution_count.map(|n| n.to_string());
    let attrs = execution_count_attrs(count.as_deref(), "output");

    Ok(r.renderer()
        .el("div", Attrs::Map(&attrs), Body::Children(vec![inner])))
}

pub fn render_display_data<E, R>(r: &R, output: &DisplayData) -> Result<E>
where
    E: MinimalElement,
    R: Render<E> + ?Sized,
{
    render_bundle(r.renderer(), &output.data)
}

pub fn render_execute_result<E, R>(r: &R, output: &ExecuteResult) -> Result<E>
where
    E: MinimalElement,
    R: Render<E> + ?Sized,
{
    render_bundle(r.renderer(), &output.data)
}

pub fn render_error<E, R>(r: &R, error: &ErrorOutput) -> Result<E>
where
    E: MinimalElement,
    R: Render<E> + ?Sized,
{
    let renderer = r.renderer();
    let html = renderer.render_ansi_codes(&error.traceback.join("\n"));
    // "pyerr" is the notebook.js name of the class.
    Ok(renderer.el("pre", Attrs::Classes(&["error", "pyerr"]), Body::Html(html)))
}

pub fn render_stream<E, R>(r: &R, stream: &StreamOutput) -> Result<E>
where
    E: MinimalElement,
    R: Render<E> + ?Sized,
{
    let renderer = r.renderer();
    let html = renderer.render_ansi_codes(&stream.text.join());
    Ok(renderer.el(
        "pre",
        Attrs::Classes(&[stream.name.as_str()]),
        Body::Html(html),
    ))
}

fn render_bundle<E: MinimalElement>(renderer: &NbRenderer<E>, bundle: &MimeBundle) -> Result<E> {
    match renderer.resolve_data_type(bundle) {
        Some(mime_type) => {
            let data = bundle
                .get(mime_type)
                .map(|data| data.join())
                .unwrap_or_default();
            renderer.render_data(mime_type, &data)
        }
        None => {
            log::debug!(
                "No renderable representation among {:?}",
                bundle.keys().collect::<Vec<_>>()
            );
            Ok(renderer.el("div", Attrs::Classes(&["empty-output"]), Body::Empty))
        }
    }
}

fn unsupported<E: MinimalElement>(renderer: &NbRenderer<E>, comment: &str) -> E {
    renderer.el("div", Attrs::Classes(&[]), Body::Html(comment.to_string()))
}

fn execution_count_attrs<'a>(count: Option<&'a str>, class: &'a str) -> Vec<(&'a str, &'a str)> {
    let mut attrs = Vec::with_capacity(3);
    if let Some(count) = count {
        attrs.push(("data-execution-count", count));
        attrs.push(("data-prompt-number", count));
    }
    attrs.push(("class", class));
    attrs
}

/// Merge runs of consecutive stream outputs with the same name into one.
///
/// The outputs are not modified; merged streams are returned owned.
pub fn coalesce_streams(outputs: &[Output]) -> Vec<Cow<'_, Output>> {
    let mut coalesced: Vec<Cow<'_, Output>> = Vec::with_capacity(outputs.len());

    for output in outputs {
        if let (Output::Stream(next), Some(last)) = (output, coalesced.last_mut()) {
            let same_stream =
                matches!(last.as_ref(), Output::Stream(prev) if prev.name == next.name);
            if same_stream {
                if let Output::Stream(prev) = last.to_mut() {
                    prev.text.append(&next.text);
                }
                continue;
            }
        }
        coalesced.push(Cow::Borrowed(output));
    }

    coalesced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::MultilineString;
    use crate::error::Error;
    use crate::render::element::Element;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn notebook(value: serde_json::Value) -> Notebook {
        serde_json::from_value(value).unwrap()
    }

    fn default_renderer() -> NbRenderer<Element> {
        NbRenderer::new(ElementBuilder::default(), RendererOptions::default())
    }

    fn stream(name: &str, text: &str) -> Output {
        Output::Stream(StreamOutput {
            name: name.to_string(),
            text: MultilineString::from(text),
        })
    }

    fn sample() -> Notebook {
        notebook(json!({
            "metadata": {"language_info": {"name": "python"}},
            "nbformat": 4,
            "nbformat_minor": 4,
            "cells": [
                {"cell_type": "markdown", "metadata": {}, "source": ["# Intro\n", "Some *text*"]},
                {
                    "cell_type": "code",
                    "execution_count": 3,
                    "metadata": {},
                    "source": ["print('<a>')\n", "1 + 1"],
                    "outputs": [
                        {"output_type": "stream", "name": "stdout", "text": "<a>\n"},
                        {"output_type": "execute_result", "execution_count": 3, "metadata": {},
                         "data": {"text/plain": "2"}},
                    ],
                },
                {"cell_type": "raw", "metadata": {}, "source": "<b>raw</b>"},
            ],
        }))
    }

    #[test]
    fn test_render_sample() {
        let html = default_renderer().render(&sample()).unwrap().outer_html();

        let expected = concat!(
            r#"<div class="nb-notebook">"#,
            r#"<section class="nb-cell nb-markdown-cell"># Intro"#,
            "\nSome *text*</section>",
            r#"<section class="nb-cell nb-code-cell">"#,
            r#"<div data-execution-count="3" data-prompt-number="3" class="nb-source nb-input">"#,
            r#"<pre><code class="lang-python" data-language="python">print('&lt;a&gt;')"#,
            "\n1 + 1</code></pre></div>",
            r#"<div data-execution-count="3" data-prompt-number="3" class="nb-output">"#,
            r#"<pre class="nb-stdout">&lt;a&gt;"#,
            "\n</pre></div>",
            r#"<div data-execution-count="3" data-prompt-number="3" class="nb-output">"#,
            r#"<pre class="nb-text-output">2</pre></div>"#,
            "</section>",
            r#"<section class="nb-cell nb-raw-cell"><b>raw</b></section>"#,
            "</div>",
        );
        assert_eq!(html, expected);
    }

    #[test]
    fn test_render_is_idempotent() {
        let renderer = default_renderer();
        let nb = sample();
        assert_eq!(renderer.render(&nb).unwrap(), renderer.render(&nb).unwrap());
    }

    #[test]
    fn test_cell_order_is_preserved() {
        let el = default_renderer().render(&sample()).unwrap();
        let classes: Vec<_> = el.children().map(|c| c.class_name().to_string()).collect();
        assert_eq!(
            classes,
            vec![
                "nb-cell nb-markdown-cell",
                "nb-cell nb-code-cell",
                "nb-cell nb-raw-cell"
            ]
        );
    }

    #[test]
    fn test_unknown_cell_is_placeholder() {
        let nb = notebook(json!({
            "metadata": {},
            "nbformat": 4,
            "nbformat_minor": 5,
            "cells": [{"cell_type": "unknown", "metadata": {}, "source": "x"}],
        }));

        let el = default_renderer().render(&nb).unwrap();
        let cell = el.child(0).unwrap();
        assert_eq!(cell.outer_html(), "<div><!-- Unsupported cell type --></div>");
    }

    #[test]
    fn test_unknown_output_is_placeholder() {
        let renderer = default_renderer();
        let cell = CodeCell::default();
        let el = renderer.render_output(&Output::Unknown, &cell).unwrap();
        assert_eq!(
            el.outer_html(),
            r#"<div class="nb-output"><div><!-- Unsupported output type --></div></div>"#
        );
    }

    #[test]
    fn test_empty_source_and_unexecuted_cell() {
        let nb = notebook(json!({
            "metadata": {},
            "nbformat": 4,
            "nbformat_minor": 5,
            "cells": [
                {"cell_type": "code", "execution_count": null, "metadata": {}, "source": [], "outputs": []},
                {"cell_type": "code", "execution_count": null, "metadata": {}, "source": "x", "outputs": []},
            ],
        }));
        let el = default_renderer().render(&nb).unwrap();

        let empty = el.child(0).unwrap();
        assert_eq!(empty.child(0).unwrap().outer_html(), "<div></div>");

        let source = el.child(1).unwrap().child(0).unwrap();
        assert_eq!(source.attribute("data-execution-count"), None);
        assert_eq!(source.attribute("data-prompt-number"), None);
        assert_eq!(source.class_name(), "nb-source nb-input");
    }

    #[test]
    fn test_language_falls_back_to_default() {
        let nb = notebook(json!({"metadata": {}, "nbformat": 4, "nbformat_minor": 5, "cells": []}));
        let renderer = NbRenderer::new(
            ElementBuilder::default(),
            RendererOptions::<Element> {
                default_language: Some("julia".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(renderer.notebook_language(&nb), "julia");
        assert_eq!(default_renderer().notebook_language(&nb), "python");
    }

    #[test]
    fn test_coalesce_streams() {
        let outputs = vec![stream("stdout", "a"), stream("stdout", "b"), stream("stderr", "c")];
        let coalesced = coalesce_streams(&outputs);

        assert_eq!(coalesced.len(), 2);
        let texts: Vec<_> = coalesced
            .iter()
            .map(|output| match output.as_ref() {
                Output::Stream(s) => (s.name.clone(), s.text.join()),
                other => panic!("unexpected output {:?}", other),
            })
            .collect();
        assert_eq!(
            texts,
            vec![
                ("stdout".to_string(), "ab".to_string()),
                ("stderr".to_string(), "c".to_string())
            ]
        );

        // The input is left alone.
        assert_eq!(outputs[0], stream("stdout", "a"));
    }

    #[test]
    fn test_coalesce_does_not_cross_other_outputs() {
        let outputs = vec![
            stream("stdout", "a"),
            Output::DisplayData(DisplayData::default()),
            stream("stdout", "b"),
        ];
        let coalesced = coalesce_streams(&outputs);
        assert_eq!(coalesced.len(), 3);
        assert!(coalesced.iter().all(|o| matches!(o, Cow::Borrowed(_))));
    }

    #[test]
    fn test_coalesce_keeps_fragments() {
        let outputs = vec![
            Output::Stream(StreamOutput {
                name: "stdout".into(),
                text: vec!["1\n", "2\n"].into(),
            }),
            Output::Stream(StreamOutput {
                name: "stdout".into(),
                text: vec!["3\n"].into(),
            }),
        ];
        let coalesced = coalesce_streams(&outputs);
        let Output::Stream(merged) = coalesced[0].as_ref() else {
            panic!("expected stream");
        };
        assert_eq!(merged.text, MultilineString::from(vec!["1\n", "2\n", "3\n"]));
    }

    #[test]
    fn test_resolve_prefers_html_over_plain() {
        let bundle: MimeBundle =
            serde_json::from_value(json!({"text/plain": "a", "text/html": "<p>b</p>"})).unwrap();
        assert_eq!(default_renderer().resolve_data_type(&bundle), Some("text/html"));
    }

    #[test]
    fn test_resolve_skips_types_without_renderer() {
        let bundle: MimeBundle = serde_json::from_value(json!({
            "application/vnd.custom+json": {"a": 1},
            "text/plain": "fallback",
        }))
        .unwrap();
        let renderer = NbRenderer::new(
            ElementBuilder::default(),
            RendererOptions::<Element> {
                data_types_priority: Some(vec![
                    "application/vnd.custom+json".to_string(),
                    "text/plain".to_string(),
                ]),
                ..Default::default()
            },
        );
        assert_eq!(renderer.resolve_data_type(&bundle), Some("text/plain"));
    }

    #[test]
    fn test_resolve_skips_empty_representation() {
        let bundle: MimeBundle =
            serde_json::from_value(json!({"text/html": "", "text/plain": "x"})).unwrap();
        assert_eq!(default_renderer().resolve_data_type(&bundle), Some("text/plain"));
    }

    #[test]
    fn test_empty_bundle_renders_placeholder() {
        let el = default_renderer()
            .render_display_data(&DisplayData::default())
            .unwrap();
        assert_eq!(el.outer_html(), r#"<div class="nb-empty-output"></div>"#);
    }

    #[test]
    fn test_user_renderer_overrides_and_goes_first() {
        let custom: DataRenderer<Element> = Arc::new(|r: &NbRenderer<Element>, data: &str| {
            Ok(r.el("pre", Attrs::Classes(&["custom"]), Body::Html(data.to_string())))
        });
        let renderer = NbRenderer::new(
            ElementBuilder::default(),
            RendererOptions {
                data_renderers: vec![
                    ("text/x-custom".to_string(), custom.clone()),
                    ("text/plain".to_string(), custom),
                ],
                ..Default::default()
            },
        );

        let priority = renderer.data_types_priority();
        assert_eq!(&priority[..3], &["text/x-custom", "text/plain", "image/png"]);
        assert_eq!(priority.iter().filter(|t| *t == "text/plain").count(), 1);

        let el = renderer.render_data("text/plain", "<i>").unwrap();
        assert_eq!(el.outer_html(), r#"<pre class="nb-custom"><i></pre>"#);
    }

    #[test]
    fn test_missing_renderer_is_error() {
        let err = default_renderer()
            .render_data("application/x-nothing", "")
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Render(RenderError::MissingRenderer(ref t)) if t == "application/x-nothing"
        ));
        assert_eq!(
            err.to_string(),
            "Render error: missing renderer for MIME type: application/x-nothing"
        );
    }

    #[test]
    fn test_error_output() {
        let error = ErrorOutput {
            ename: "ZeroDivisionError".into(),
            evalue: "division by zero".into(),
            traceback: vec!["Traceback".into(), "ZeroDivisionError: <0>".into()],
        };
        let el = default_renderer().render_error(&error).unwrap();
        assert_eq!(
            el.outer_html(),
            "<pre class=\"nb-error nb-pyerr\">Traceback\nZeroDivisionError: &lt;0&gt;</pre>"
        );
    }

    #[test]
    fn test_converters_are_used() {
        let renderer = NbRenderer::new(
            ElementBuilder::new(""),
            RendererOptions::<Element> {
                markdown_renderer: Some(Arc::new(|md: &str| format!("<p>{}</p>", md))),
                ansi_codes_renderer: Some(Arc::new(|text: &str| text.to_uppercase())),
                code_highlighter: Some(Arc::new(|code: &str, lang: &str| {
                    format!("{}:{}", lang, code)
                })),
                ..Default::default()
            },
        );

        let md = renderer
            .render_markdown_cell(
                &MarkdownCell {
                    source: "hi".into(),
                    ..Default::default()
                },
                &sample(),
            )
            .unwrap();
        assert_eq!(md.inner_html(), "<p>hi</p>");

        let out = renderer.render_stream(&StreamOutput {
            name: "stderr".into(),
            text: "warn".into(),
        });
        assert_eq!(out.unwrap().outer_html(), r#"<pre class="stderr">WARN</pre>"#);

        let cell = CodeCell {
            source: "x = 1".into(),
            ..Default::default()
        };
        let src = renderer.render_source(&cell, &sample()).unwrap();
        assert_eq!(src.child(0).unwrap().child(0).unwrap().inner_html(), "python:x = 1");
    }

    struct QuietStreams<'a>(&'a NbRenderer<Element>);

    impl Render<Element> for QuietStreams<'_> {
        fn renderer(&self) -> &NbRenderer<Element> {
            self.0
        }

        fn render_stream(&self, _stream: &StreamOutput) -> Result<Element> {
            Ok(Element::new("hr"))
        }
    }

    #[test]
    fn test_override_single_node_type() {
        let renderer = default_renderer();
        let el = QuietStreams(&renderer).render(&sample()).unwrap();

        let code_cell = el.child(1).unwrap();
        let stream_output = code_cell.child(1).unwrap();
        assert_eq!(stream_output.child(0).unwrap().outer_html(), "<hr>");

        // Other node types keep the default rendering.
        let result_output = code_cell.child(2).unwrap();
        assert_eq!(
            result_output.child(0).unwrap().outer_html(),
            r#"<pre class="nb-text-output">2</pre>"#
        );
    }
}
