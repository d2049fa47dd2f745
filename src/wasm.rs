//! WebAssembly bindings for JavaScript/TypeScript.
//!
//! # Usage (JavaScript/TypeScript)
//!
//! ```javascript
//! import init, { renderNotebook, readNotebookTitle, RenderOptions } from 'ipynb-render';
//!
//! await init();
//!
//! const json = await (await fetch('example.ipynb')).text();
//! const html = renderNotebook(json);
//!
//! const options = new RenderOptions();
//! options.setMathBackend('mathjax');
//! options.setClassPrefix('');
//! document.title = readNotebookTitle(json);
//! document.body.innerHTML = renderNotebook(json, options);
//! ```

#![cfg(feature = "wasm")]

use crate::ast::{Cell, Notebook};
use crate::config::RenderConfig;
use crate::parser::parse;
use crate::render::math::MathBackend;
use crate::title::title_of;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Initialize panic hook for better error messages in console
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Render a notebook given as JSON text to an HTML fragment.
#[wasm_bindgen(js_name = renderNotebook)]
pub fn render_notebook(input: &str, options: Option<RenderOptions>) -> Result<String, JsError> {
    let config = options.map(|o| o.to_render_config()).unwrap_or_default();
    crate::render(input, &config).map_err(|e| JsError::new(&e.to_string()))
}

/// Read the title of a notebook given as JSON text (possibly empty).
#[wasm_bindgen(js_name = readNotebookTitle)]
pub fn read_notebook_title(input: &str) -> Result<String, JsError> {
    crate::read_title(input).map_err(|e| JsError::new(&e.to_string()))
}

/// Summary of a notebook: title, language and cell counts.
#[wasm_bindgen(js_name = notebookInfo)]
pub fn notebook_info(input: &str) -> Result<JsValue, JsError> {
    let notebook = parse(input).map_err(|e| JsError::new(&e.to_string()))?;
    let info = NotebookInfo::from_notebook(&notebook);

    serde_wasm_bindgen::to_value(&info)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Get the library version.
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Configuration options for rendering.
#[wasm_bindgen]
#[derive(Clone)]
pub struct RenderOptions {
    math_backend: String,
    class_prefix: String,
    header_anchors: bool,
    header_ids_strip_accents: bool,
    default_language: String,
}

#[wasm_bindgen]
impl RenderOptions {
    /// Create a new options object with defaults.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let defaults = RenderConfig::default();
        Self {
            math_backend: "katex".to_string(),
            class_prefix: defaults.class_prefix,
            header_anchors: defaults.header_anchors,
            header_ids_strip_accents: defaults.header_ids_strip_accents,
            default_language: defaults.default_language,
        }
    }

    /// Set the math rendering backend: "katex", "mathjax", or "mathml".
    #[wasm_bindgen(js_name = setMathBackend)]
    pub fn set_math_backend(&mut self, backend: &str) {
        self.math_backend = backend.to_lowercase();
    }

    #[wasm_bindgen(js_name = getMathBackend)]
    pub fn get_math_backend(&self) -> String {
        self.math_backend.clone()
    }

    /// Set the CSS class prefix.
    #[wasm_bindgen(js_name = setClassPrefix)]
    pub fn set_class_prefix(&mut self, prefix: &str) {
        self.class_prefix = prefix.to_string();
    }

    /// Set whether Markdown headings get anchor links.
    #[wasm_bindgen(js_name = setHeaderAnchors)]
    pub fn set_header_anchors(&mut self, anchors: bool) {
        self.header_anchors = anchors;
    }

    /// Set whether accents are removed from Markdown heading ids.
    #[wasm_bindgen(js_name = setHeaderIdsStripAccents)]
    pub fn set_header_ids_strip_accents(&mut self, strip: bool) {
        self.header_ids_strip_accents = strip;
    }

    /// Set the language of code cells for notebooks that do not declare one.
    #[wasm_bindgen(js_name = setDefaultLanguage)]
    pub fn set_default_language(&mut self, lang: &str) {
        self.default_language = lang.to_string();
    }

    fn to_render_config(&self) -> RenderConfig {
        RenderConfig {
            math_backend: self.math_backend.parse().unwrap_or(MathBackend::KaTeX),
            class_prefix: self.class_prefix.clone(),
            header_anchors: self.header_anchors,
            header_ids_strip_accents: self.header_ids_strip_accents,
            default_language: self.default_language.clone(),
            ..Default::default()
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NotebookInfo {
    title: String,
    language: Option<String>,
    nbformat: String,
    code_cells: usize,
    markdown_cells: usize,
    raw_cells: usize,
    outputs: usize,
}

impl NotebookInfo {
    fn from_notebook(notebook: &Notebook) -> Self {
        let mut info = Self {
            title: title_of(notebook),
            language: notebook.language().map(String::from),
            nbformat: format!("{}.{}", notebook.nbformat, notebook.nbformat_minor),
            code_cells: 0,
            markdown_cells: 0,
            raw_cells: 0,
            outputs: 0,
        };

        for cell in &notebook.cells {
            match cell {
                Cell::Code(code) => {
                    info.code_cells += 1;
                    info.outputs += code.outputs.len();
                }
                Cell::Markdown(_) => info.markdown_cells += 1,
                Cell::Raw(_) => info.raw_cells += 1,
                Cell::Unknown => {}
            }
        }

        info
    }
}
