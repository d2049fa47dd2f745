//! C FFI layer for cross-language interoperability.

use crate::ast::Notebook;
use crate::config::RenderConfig;
use crate::parser::parse;
use crate::render::math::MathBackend;
use crate::render::{create_renderer, Render};
use crate::title::title_of;
use libc::{c_char, c_int};
use std::ffi::{CStr, CString};
use std::ptr;

/// Opaque handle to a parsed notebook.
pub struct IpynbNotebook {
    inner: Notebook,
}

/// Configuration for rendering.
#[repr(C)]
pub struct IpynbConfig {
    /// Math backend: 0 = KaTeX, 1 = MathJax, 2 = MathML
    pub math_backend: c_int,
    /// Prefix of CSS class names (null for the default `nb-`)
    pub class_prefix: *const c_char,
    /// Whether to put anchor links into Markdown headings
    pub header_anchors: c_int,
}

impl Default for IpynbConfig {
    fn default() -> Self {
        Self {
            math_backend: 0,
            class_prefix: ptr::null(),
            header_anchors: 1,
        }
    }
}

impl IpynbConfig {
    /// # Safety
    ///
    /// `class_prefix` must be null or a valid null-terminated string.
    unsafe fn to_render_config(&self) -> RenderConfig {
        let defaults = RenderConfig::default();
        RenderConfig {
            math_backend: match self.math_backend {
                1 => MathBackend::MathJax,
                2 => MathBackend::MathML,
                _ => MathBackend::KaTeX,
            },
            class_prefix: if self.class_prefix.is_null() {
                defaults.class_prefix.clone()
            } else {
                CStr::from_ptr(self.class_prefix)
                    .to_str()
                    .map(String::from)
                    .unwrap_or_else(|_| defaults.class_prefix.clone())
            },
            header_anchors: self.header_anchors != 0,
            ..defaults
        }
    }
}

/// Result type for FFI operations.
#[repr(C)]
pub struct IpynbResult {
    /// Pointer to result string (caller must free with ipynb_free_string)
    pub data: *mut c_char,
    /// Error message if data is null (caller must free with ipynb_free_string)
    pub error: *mut c_char,
}

impl IpynbResult {
    fn ok(data: String) -> Self {
        Self {
            data: to_c_string(data).into_raw(),
            error: ptr::null_mut(),
        }
    }

    fn err(error: String) -> Self {
        Self {
            data: ptr::null_mut(),
            error: to_c_string(error).into_raw(),
        }
    }
}

// Interior NUL bytes cannot cross the boundary; cut the string there.
fn to_c_string(s: String) -> CString {
    CString::new(s).unwrap_or_else(|e| {
        let pos = e.nul_position();
        let mut bytes = e.into_vec();
        bytes.truncate(pos);
        CString::new(bytes).unwrap_or_default()
    })
}

unsafe fn input_str<'a>(input: *const c_char) -> Result<&'a str, IpynbResult> {
    if input.is_null() {
        return Err(IpynbResult::err("Null input pointer".to_string()));
    }
    CStr::from_ptr(input)
        .to_str()
        .map_err(|_| IpynbResult::err("Invalid UTF-8 input".to_string()))
}

unsafe fn render_config(config: *const IpynbConfig) -> RenderConfig {
    if config.is_null() {
        RenderConfig::default()
    } else {
        (*config).to_render_config()
    }
}

/// Parse a notebook from its JSON text and return a handle.
///
/// Returns null if the input is not a valid nbformat v4 notebook.
///
/// # Safety
///
/// - `input` must be a valid null-terminated UTF-8 string.
/// - The returned notebook must be freed with `ipynb_free_notebook`.
#[no_mangle]
pub unsafe extern "C" fn ipynb_parse(input: *const c_char) -> *mut IpynbNotebook {
    let Ok(input) = input_str(input) else {
        return ptr::null_mut();
    };

    match parse(input) {
        Ok(notebook) => Box::into_raw(Box::new(IpynbNotebook { inner: notebook })),
        Err(e) => {
            log::debug!("Failed to parse notebook: {}", e);
            ptr::null_mut()
        }
    }
}

/// Render a parsed notebook to an HTML fragment.
///
/// # Safety
///
/// - `notebook` must be a valid pointer from `ipynb_parse`.
/// - `config` must be null or point to a valid `IpynbConfig`.
/// - The returned strings must be freed with `ipynb_free_result`.
#[no_mangle]
pub unsafe extern "C" fn ipynb_render_html(
    notebook: *const IpynbNotebook,
    config: *const IpynbConfig,
) -> IpynbResult {
    if notebook.is_null() {
        return IpynbResult::err("Null notebook pointer".to_string());
    }

    let notebook = &(*notebook).inner;
    let renderer = create_renderer(&render_config(config));

    match renderer.render(notebook) {
        Ok(el) => IpynbResult::ok(el.outer_html()),
        Err(e) => IpynbResult::err(e.to_string()),
    }
}

/// Parse and render in one step.
///
/// # Safety
///
/// - `input` must be a valid null-terminated UTF-8 string.
/// - `config` must be null or point to a valid `IpynbConfig`.
/// - The returned strings must be freed with `ipynb_free_result`.
#[no_mangle]
pub unsafe extern "C" fn ipynb_parse_and_render(
    input: *const c_char,
    config: *const IpynbConfig,
) -> IpynbResult {
    let input = match input_str(input) {
        Ok(s) => s,
        Err(result) => return result,
    };

    match crate::render(input, &render_config(config)) {
        Ok(html) => IpynbResult::ok(html),
        Err(e) => IpynbResult::err(e.to_string()),
    }
}

/// Get the title of a parsed notebook (possibly empty).
///
/// # Safety
///
/// - `notebook` must be a valid pointer from `ipynb_parse`.
/// - The returned string must be freed with `ipynb_free_string`.
#[no_mangle]
pub unsafe extern "C" fn ipynb_title(notebook: *const IpynbNotebook) -> *mut c_char {
    if notebook.is_null() {
        return ptr::null_mut();
    }
    to_c_string(title_of(&(*notebook).inner)).into_raw()
}

/// Free a string returned by ipynb functions.
///
/// # Safety
///
/// - `s` must be a pointer returned by an ipynb function, or null.
#[no_mangle]
pub unsafe extern "C" fn ipynb_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// Free a notebook handle.
///
/// # Safety
///
/// - `notebook` must be a pointer returned by `ipynb_parse`, or null.
#[no_mangle]
pub unsafe extern "C" fn ipynb_free_notebook(notebook: *mut IpynbNotebook) {
    if !notebook.is_null() {
        drop(Box::from_raw(notebook));
    }
}

/// Free a result struct.
///
/// # Safety
///
/// - `result` must be a valid IpynbResult.
#[no_mangle]
pub unsafe extern "C" fn ipynb_free_result(result: IpynbResult) {
    ipynb_free_string(result.data);
    ipynb_free_string(result.error);
}

/// Get the library version.
///
/// # Safety
///
/// The returned string is static and must not be freed.
#[no_mangle]
pub extern "C" fn ipynb_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
