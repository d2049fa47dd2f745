//! # ipynb-render
//!
//! Renders Jupyter notebooks (nbformat v4) to HTML fragments.
//!
//! ## Features
//!
//! - **Cells**: Markdown, code (with execution counts) and raw cells
//! - **Outputs**: streams (consecutive chunks are merged), errors with ANSI
//!   colored tracebacks, and rich display data picked by media type priority
//! - **Code**: syntax highlighting of code cells and fenced code blocks
//!   with `syntect`
//! - **Math**: `$...$`, `$$...$$`, `\\(...\\)`, `\\[...\\]` and
//!   `\begin{env}...\end{env}` in Markdown, protected from the Markdown
//!   converter and typeset with a configurable backend
//! - **Extensible**: custom media-type renderers, converters and element
//!   types; any single node type can be rendered differently by implementing
//!   [`render::Render`]
//!
//! ## Quick Start
//!
//! ```rust
//! use ipynb_render::{render, RenderConfig};
//!
//! let input = r##"{
//!   "metadata": {"language_info": {"name": "python"}},
//!   "nbformat": 4,
//!   "nbformat_minor": 5,
//!   "cells": [
//!     {"cell_type": "markdown", "metadata": {}, "source": ["# Hello\n", "$E = mc^2$"]},
//!     {"cell_type": "code", "execution_count": 1, "metadata": {}, "source": "1 + 1",
//!      "outputs": [{"output_type": "execute_result", "execution_count": 1,
//!                   "metadata": {}, "data": {"text/plain": "2"}}]}
//!   ]
//! }"##;
//!
//! let html = render(input, &RenderConfig::default()).unwrap();
//! assert!(html.starts_with(r#"<div class="nb-notebook">"#));
//! assert!(html.contains("math inline"));
//! ```
//!
//! ## Configuration
//!
//! ### Math Backends
//!
//! - `KaTeX` (default): escaped TeX for client-side rendering with KaTeX
//! - `MathJax`: `math/tex` scripts for MathJax
//! - `MathML`: native browser rendering (requires `mathml` feature)
//!
//! ### Output
//!
//! The output is an HTML fragment with every CSS class name prefixed
//! (`nb-` by default), except the `lang-*` class of code blocks. Wrapping it
//! in a page with stylesheets is up to the caller.
//!
//! ## FFI
//!
//! The library provides a C-compatible FFI, see the `ffi` module.
//!
//! ## Features
//!
//! - `cli` (default): the `ipynb-render` command line tool
//! - `mathml`: Enable MathML rendering backend (requires `latex2mathml` crate)
//! - `wasm`: Enable WebAssembly bindings (requires `wasm-bindgen`)

pub mod ast;
pub mod config;
pub mod error;
pub mod parser;
pub mod render;
pub mod title;

// FFI module (only for non-WASM builds)
#[cfg(not(target_arch = "wasm32"))]
pub mod ffi;

#[cfg(feature = "wasm")]
pub mod wasm;

// Convenience re-exports
pub use ast::{Cell, MultilineString, Notebook, Output};
pub use config::RenderConfig;
pub use error::{Error, ParseError, RenderError, Result};
pub use parser::parse;
pub use render::math::MathBackend;
pub use render::{create_renderer, Element, NbRenderer, Render};
pub use title::title_of;

/// Parse a notebook and render it to an HTML fragment in one step.
pub fn render(input: &str, config: &RenderConfig) -> Result<String> {
    let notebook = parse(input)?;
    let renderer = create_renderer(config);
    Ok(renderer.render(&notebook)?.outer_html())
}

/// Parse a notebook and return its title, or an empty string.
pub fn read_title(input: &str) -> Result<String> {
    let notebook = parse(input)?;
    Ok(title_of(&notebook))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NOTEBOOK: &str = r##"{
        "metadata": {
            "kernelspec": {"name": "python3", "display_name": "Python 3", "language": "python"},
            "language_info": {"name": "python", "version": "3.8.0"}
        },
        "nbformat": 4,
        "nbformat_minor": 4,
        "cells": [
            {"cell_type": "markdown", "metadata": {}, "source": ["# Demo $x$\n", "\n", "Some text"]},
            {
                "cell_type": "code",
                "execution_count": 2,
                "metadata": {},
                "source": ["for i in range(2):\n", "    print(i)"],
                "outputs": [
                    {"output_type": "stream", "name": "stdout", "text": ["0\n"]},
                    {"output_type": "stream", "name": "stdout", "text": ["1\n"]},
                    {"output_type": "display_data", "metadata": {},
                     "data": {"image/png": "iVBORw0KGgo=\n", "text/plain": "<Figure>"}},
                    {"output_type": "error", "ename": "ValueError", "evalue": "bad",
                     "traceback": ["\u001b[0;31mValueError\u001b[0m: bad"]}
                ]
            }
        ]
    }"##;

    #[test]
    fn test_full_pipeline() {
        let html = render(NOTEBOOK, &RenderConfig::default()).unwrap();

        assert!(html.starts_with(r#"<div class="nb-notebook">"#));
        assert!(html.contains(r##"<h1 id="demo"><a class="anchor" href="#demo" aria-hidden="true"></a>Demo "##));
        assert!(html.contains(r#"<pre class="nb-stdout">0
1
</pre>"#));
        assert!(html.contains(r#"src="data:image/png;base64,iVBORw0KGgo=""#));
        assert!(!html.contains("&lt;Figure&gt;"));
        assert!(html.contains(
            r#"<pre class="nb-error nb-pyerr"><span class="ansi-red-fg">ValueError</span>: bad</pre>"#
        ));
    }

    #[test]
    fn test_class_prefix() {
        let config = RenderConfig {
            class_prefix: "x-".to_string(),
            ..Default::default()
        };
        let html = render(NOTEBOOK, &config).unwrap();
        assert!(html.starts_with(r#"<div class="x-notebook">"#));
        assert!(html.contains(r#"<code class="lang-python" data-language="python">"#));
    }

    #[test]
    fn test_read_title() {
        assert_eq!(read_title(NOTEBOOK).unwrap(), "Demo $x$");
    }

    #[test]
    fn test_render_rejects_invalid_json() {
        assert!(matches!(
            render("[]", &RenderConfig::default()),
            Err(Error::Parse(ParseError::Json(_)))
        ));
    }
}
