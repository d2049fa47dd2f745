//! TeX to MathML conversion.
//!
//! With the `mathml` feature, expressions are converted by `latex2mathml`
//! and an expression it cannot convert is a [`crate::error::RenderError::Math`]; callers
//! fall back to the escaped source. Without the feature the markup is the
//! same as the KaTeX backend's, so the page can still typeset it in the
//! browser.

use super::MathRenderer;
use crate::error::Result;

#[cfg(feature = "mathml")]
use crate::error::RenderError;
#[cfg(not(feature = "mathml"))]
use super::KaTeXRenderer;

/// Math backend producing MathML.
#[derive(Debug, Default, Clone, Copy)]
pub struct MathMLRenderer;

impl MathMLRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl MathRenderer for MathMLRenderer {
    fn render_inline(&self, tex: &str) -> Result<String> {
        to_mathml(tex, false)
    }

    fn render_display(&self, tex: &str) -> Result<String> {
        to_mathml(tex, true)
    }
}

#[cfg(feature = "mathml")]
fn to_mathml(tex: &str, display_mode: bool) -> Result<String> {
    use latex2mathml::{latex_to_mathml, DisplayStyle};

    let style = if display_mode {
        DisplayStyle::Block
    } else {
        DisplayStyle::Inline
    };
    let mathml = latex_to_mathml(tex, style)
        .map_err(|err| RenderError::Math(format!("cannot convert {:?} to MathML: {}", tex, err)))?;

    // latex2mathml marks display math only with an attribute of <math>.
    Ok(if display_mode {
        format!(r#"<div class="math display">{}</div>"#, mathml)
    } else {
        mathml
    })
}

#[cfg(not(feature = "mathml"))]
fn to_mathml(tex: &str, display_mode: bool) -> Result<String> {
    KaTeXRenderer::new().render(tex, display_mode)
}
