//! KaTeX/MathJax passthrough renderer.

use super::MathRenderer;
use crate::error::Result;
use crate::render::escape::escape_html;

/// Renderer that outputs escaped TeX for client-side typesetting.
pub struct KaTeXRenderer {
    use_mathjax: bool,
}

impl KaTeXRenderer {
    /// Create a new KaTeX renderer.
    pub fn new() -> Self {
        Self { use_mathjax: false }
    }

    /// Create a renderer configured for MathJax.
    pub fn new_mathjax() -> Self {
        Self { use_mathjax: true }
    }
}

impl Default for KaTeXRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MathRenderer for KaTeXRenderer {
    fn render_inline(&self, tex: &str) -> Result<String> {
        let escaped = escape_html(tex);

        if self.use_mathjax {
            Ok(format!(r#"<script type="math/tex">{}</script>"#, escaped))
        } else {
            Ok(format!(r#"<span class="math inline">\({}\)</span>"#, escaped))
        }
    }

    fn render_display(&self, tex: &str) -> Result<String> {
        let escaped = escape_html(tex);

        if self.use_mathjax {
            Ok(format!(
                r#"<script type="math/tex; mode=display">{}</script>"#,
                escaped
            ))
        } else {
            Ok(format!(r#"<div class="math display">\[{}\]</div>"#, escaped))
        }
    }
}
