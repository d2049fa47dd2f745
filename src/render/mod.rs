//! Rendering of notebooks into element trees.

pub mod ansi;
pub mod data;
pub mod element;
pub mod escape;
pub mod highlight;
pub mod html;
pub mod markdown;
pub mod math;
pub mod notebook;

pub use element::{Attrs, Body, Element, ElementBuilder, MinimalElement, Node};
pub use highlight::highlight_code;
pub use notebook::{
    coalesce_streams, CodeHighlighter, DataRenderer, NbRenderer, Render, RendererOptions,
    TextConverter,
};

use crate::config::RenderConfig;
use crate::render::markdown::{MarkdownOptions, MarkdownRenderer};
use crate::render::math::MathRenderer;
use std::sync::Arc;

/// Create a fully featured renderer producing [`Element`]s.
///
/// Markdown cells and outputs are converted with `pulldown-cmark` and the
/// math in them typeset with the configured backend. Code in code cells and
/// fenced code blocks is highlighted with `syntect`. ANSI escape sequences
/// are converted to styled spans. SageMath math output in `text/html` is
/// typeset too.
pub fn create_renderer(config: &RenderConfig) -> NbRenderer<Element> {
    create_renderer_with(ElementBuilder::new(config.class_prefix.as_str()), config)
}

/// Like [`create_renderer`], building elements with `el`.
pub fn create_renderer_with<E: MinimalElement + 'static>(
    el: ElementBuilder<E>,
    config: &RenderConfig,
) -> NbRenderer<E> {
    let math: Arc<dyn MathRenderer> = Arc::from(math::create_renderer(config.math_backend));

    let markdown = MarkdownRenderer::new(
        MarkdownOptions {
            header_anchors: config.header_anchors,
            header_prefix: config.header_prefix.clone(),
            header_ids_strip_accents: config.header_ids_strip_accents,
        },
        Arc::clone(&math),
    )
    .with_highlighter(Arc::new(highlight_code));

    let opts = RendererOptions {
        data_renderers: vec![(
            "text/html".to_string(),
            html::create_html_renderer(math),
        )],
        data_types_priority: config.data_types_priority.clone(),
        markdown_renderer: Some(Arc::new(move |text: &str| markdown.render(text))),
        ansi_codes_renderer: Some(Arc::new(ansi::ansi_to_html)),
        code_highlighter: Some(Arc::new(highlight_code)),
        default_language: Some(config.default_language.clone()),
    };

    NbRenderer::new(el, opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Notebook;
    use crate::render::math::MathBackend;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn notebook(cells: serde_json::Value) -> Notebook {
        serde_json::from_value(json!({
            "metadata": {"language_info": {"name": "python"}},
            "nbformat": 4,
            "nbformat_minor": 5,
            "cells": cells,
        }))
        .unwrap()
    }

    #[test]
    fn test_html_renderer_goes_first() {
        let renderer = create_renderer(&RenderConfig::default());
        assert_eq!(renderer.data_types_priority()[0], "text/html");
        assert_eq!(renderer.data_types_priority().len(), 9);
    }

    #[test]
    fn test_markdown_cell_with_math() {
        let renderer = create_renderer(&RenderConfig {
            header_anchors: false,
            ..Default::default()
        });
        let nb = notebook(json!([
            {"cell_type": "markdown", "metadata": {}, "source": ["# Euler\n", "$e^{i\\pi} = -1$"]},
        ]));

        let el = renderer.render(&nb).unwrap();
        assert_eq!(
            el.child(0).unwrap().inner_html(),
            "<h1 id=\"euler\">Euler</h1>\n<p><span class=\"math inline\">\\(e^{i\\pi} = -1\\)</span></p>\n"
        );
    }

    #[test]
    fn test_mathjax_backend() {
        let renderer = create_renderer(&RenderConfig {
            math_backend: MathBackend::MathJax,
            ..Default::default()
        });
        let html = renderer.render_markdown("$$x$$");
        assert_eq!(html, "<p><script type=\"math/tex; mode=display\">x</script></p>\n");
    }

    #[test]
    fn test_stream_with_ansi_codes() {
        let renderer = create_renderer(&RenderConfig::default());
        let nb = notebook(json!([{
            "cell_type": "code",
            "execution_count": 1,
            "metadata": {},
            "source": "warn()",
            "outputs": [
                {"output_type": "stream", "name": "stderr", "text": ["\u{1b}[31mWarning", "\u{1b}[0m: <x>\n"]},
            ],
        }]));

        let el = renderer.render(&nb).unwrap();
        let output = el.child(0).unwrap().child(1).unwrap();
        assert_eq!(
            output.child(0).unwrap().outer_html(),
            "<pre class=\"nb-stderr\"><span class=\"ansi-red-fg\">Warning</span>: &lt;x&gt;\n</pre>"
        );
    }

    #[test]
    fn test_markdown_output() {
        let renderer = create_renderer(&RenderConfig::default());
        let el = renderer.render_data("text/markdown", "**bold**").unwrap();
        assert_eq!(
            el.outer_html(),
            "<div class=\"nb-html-output\"><p><strong>bold</strong></p>\n</div>"
        );
    }

    #[test]
    fn test_configured_priority() {
        let renderer = create_renderer(&RenderConfig {
            data_types_priority: Some(vec!["text/plain".to_string(), "text/html".to_string()]),
            ..Default::default()
        });
        let bundle = serde_json::from_value(json!({"text/plain": "a", "text/html": "<p>b</p>"}))
            .unwrap();
        assert_eq!(renderer.resolve_data_type(&bundle), Some("text/plain"));
    }

    #[test]
    fn test_heading_ids_strip_accents() {
        let renderer = create_renderer(&RenderConfig {
            header_anchors: false,
            header_ids_strip_accents: true,
            ..Default::default()
        });
        assert_eq!(renderer.render_markdown("## Café"), "<h2 id=\"cafe\">Café</h2>\n");
    }

    #[test]
    fn test_code_cell_is_highlighted() {
        let renderer = create_renderer(&RenderConfig::default());
        let nb = notebook(json!([{
            "cell_type": "code",
            "execution_count": 1,
            "metadata": {},
            "source": "def f(): return 1",
            "outputs": [],
        }]));

        let el = renderer.render(&nb).unwrap();
        let code = el.child(0).unwrap().child(0).unwrap().child(0).unwrap().child(0).unwrap();
        assert_eq!(code.attribute("class"), Some("lang-python"));
        assert!(code.inner_html().contains(">def</span>"));
    }

    #[test]
    fn test_markdown_fence_is_highlighted() {
        let renderer = create_renderer(&RenderConfig::default());
        let html = renderer.render_markdown("```python\ndef f(): pass\n```");
        assert!(html.starts_with(r#"<pre><code class="language-python"><span class="hl-"#));
        assert!(html.ends_with("</code></pre>\n"));
    }

    #[test]
    fn test_unknown_language_is_escaped() {
        assert_eq!(highlight_code("a<b", "brainfuck"), "a&lt;b");
    }
}
