//! Built-in renderers for the media types of output bundles.

use crate::error::Result;
use crate::render::element::{Attrs, Body, MinimalElement};
use crate::render::escape::escape_html;
use crate::render::notebook::{DataRenderer, NbRenderer};
use std::sync::Arc;

/// Media types with a built-in renderer, in default priority order.
pub const BUILTIN_DATA_TYPES: [&str; 9] = [
    "image/png",
    "image/jpeg",
    "image/svg+xml",
    "text/svg+xml",
    "text/html",
    "text/markdown",
    "text/latex",
    "application/javascript",
    "text/plain",
];

/// The built-in media-type renderers, in default priority order.
pub fn builtin_renderers<E: MinimalElement + 'static>() -> Vec<(&'static str, DataRenderer<E>)> {
    vec![
        ("image/png", embedded_image("png")),
        ("image/jpeg", embedded_image("jpeg")),
        ("image/svg+xml", raw_html("div", &["svg-output"])),
        ("text/svg+xml", data_fn(render_svg_alias)),
        ("text/html", raw_html("div", &["html-output"])),
        ("text/markdown", data_fn(render_markdown_data)),
        ("text/latex", raw_html("div", &["latex-output"])),
        ("application/javascript", raw_html("script", &[])),
        ("text/plain", data_fn(render_plain_text)),
    ]
}

fn data_fn<E: MinimalElement + 'static>(f: fn(&NbRenderer<E>, &str) -> Result<E>) -> DataRenderer<E> {
    Arc::new(f)
}

/// Renderer putting the data as raw HTML into a `tag` element.
pub fn raw_html<E: MinimalElement + 'static>(
    tag: &'static str,
    classes: &'static [&'static str],
) -> DataRenderer<E> {
    Arc::new(move |r: &NbRenderer<E>, data: &str| {
        Ok(r.el(tag, Attrs::Classes(classes), Body::Html(data.to_string())))
    })
}

/// Renderer for base64 encoded (or linked) images.
fn embedded_image<E: MinimalElement + 'static>(format: &'static str) -> DataRenderer<E> {
    Arc::new(move |r: &NbRenderer<E>, data: &str| {
        let src = if data.starts_with("http") {
            data.to_string()
        } else {
            format!("data:image/{};base64,{}", format, data.replace('\n', ""))
        };
        Ok(r.el(
            "img",
            Attrs::Map(&[("class", "image-output"), ("src", src.as_str())]),
            Body::Empty,
        ))
    })
}

// Old notebooks use text/svg+xml; render it like image/svg+xml, including a
// user-provided renderer for that type.
fn render_svg_alias<E: MinimalElement>(r: &NbRenderer<E>, data: &str) -> Result<E> {
    r.render_data("image/svg+xml", data)
}

fn render_markdown_data<E: MinimalElement>(r: &NbRenderer<E>, data: &str) -> Result<E> {
    let html = r.render_markdown(data);
    Ok(r.el("div", Attrs::Classes(&["html-output"]), Body::Html(html)))
}

fn render_plain_text<E: MinimalElement>(r: &NbRenderer<E>, data: &str) -> Result<E> {
    Ok(r.el(
        "pre",
        Attrs::Classes(&["text-output"]),
        Body::Html(escape_html(data)),
    ))
}
