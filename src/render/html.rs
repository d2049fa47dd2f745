//! `text/html` output renderer with support for SageMath math output.
//!
//! SageMath displays (La)TeX results as HTML consisting of a single
//! `math/tex` script. Such output is typeset with the configured math
//! renderer instead of being inserted as-is.

use crate::render::element::{Attrs, Body, MinimalElement};
use crate::render::escape::escape_html;
use crate::render::math::MathRenderer;
use crate::render::notebook::{DataRenderer, NbRenderer};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

static SAGE_MATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*<html>\s*<script\s*type="math/tex(?:;[^"]*)">([\s\S]*)</script></html>\s*$"#)
        .expect("SageMath output pattern is valid")
});

/// The TeX of SageMath-style math output, if `data` is one.
pub fn extract_sage_math(data: &str) -> Option<&str> {
    SAGE_MATH
        .captures(data)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|tex| !tex.is_empty())
}

/// Create a `text/html` renderer typesetting SageMath output with `math`.
pub fn create_html_renderer<E: MinimalElement + 'static>(
    math: Arc<dyn MathRenderer>,
) -> DataRenderer<E> {
    Arc::new(move |r: &NbRenderer<E>, data: &str| {
        let el = match extract_sage_math(data) {
            Some(tex) => {
                let html = math.render_display(tex).unwrap_or_else(|err| {
                    log::warn!("Failed to render SageMath output: {}", err);
                    escape_html(tex)
                });
                r.el("div", Attrs::Classes(&["latex-output"]), Body::Html(html))
            }
            None => r.el(
                "div",
                Attrs::Classes(&["html-output"]),
                Body::Html(data.to_string()),
            ),
        };
        Ok(el)
    })
}
