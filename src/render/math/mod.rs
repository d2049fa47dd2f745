//! Math support: extraction from Markdown and rendering backends.

mod extract;
mod katex;
mod mathml;

pub use self::extract::{
    extract_math, parse_delimited_math, restore_math, strip_math, MathExpression,
};
pub use self::katex::KaTeXRenderer;
pub use self::mathml::MathMLRenderer;

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Math rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MathBackend {
    /// Output escaped TeX for KaTeX auto-render to typeset client-side.
    #[default]
    KaTeX,
    /// Output TeX in `math/tex` scripts for MathJax.
    MathJax,
    /// Convert to MathML for native browser rendering.
    MathML,
}

impl std::str::FromStr for MathBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "katex" => Ok(Self::KaTeX),
            "mathjax" => Ok(Self::MathJax),
            "mathml" => Ok(Self::MathML),
            _ => Err(format!(
                "Unknown math backend '{s}'. Expected: katex, mathjax, mathml"
            )),
        }
    }
}

/// Trait for math renderers.
pub trait MathRenderer: Send + Sync {
    /// Render inline math.
    fn render_inline(&self, tex: &str) -> Result<String>;

    /// Render display math.
    fn render_display(&self, tex: &str) -> Result<String>;

    /// Render `tex` in the given mode.
    fn render(&self, tex: &str, display_mode: bool) -> Result<String> {
        if display_mode {
            self.render_display(tex)
        } else {
            self.render_inline(tex)
        }
    }
}

/// Create a math renderer for the given backend.
pub fn create_renderer(backend: MathBackend) -> Box<dyn MathRenderer> {
    match backend {
        MathBackend::KaTeX => Box::new(KaTeXRenderer::new()),
        MathBackend::MathJax => Box::new(KaTeXRenderer::new_mathjax()),
        MathBackend::MathML => Box::new(MathMLRenderer::new()),
    }
}
