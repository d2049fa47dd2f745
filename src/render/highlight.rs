//! Syntax highlighting of source code with `syntect`.
//!
//! Highlighted code is a tree of `span` elements with classes derived from
//! the syntect scopes, prefixed with `hl-` (e.g. `hl-keyword`), so the
//! colors come from a stylesheet and not from inline styles.

use crate::render::escape::escape_html;
use once_cell::sync::Lazy;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);

/// Prefix of the scope classes.
pub const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

/// Highlight `code` written in `lang` as HTML.
///
/// `lang` may be a language name (`python`, `Rust`) or a file extension
/// (`py`, `rs`). Code in a language without a known grammar is only
/// escaped.
pub fn highlight_code(code: &str, lang: &str) -> String {
    let Some(syntax) = find_syntax(lang) else {
        return escape_html(code);
    };

    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, CLASS_STYLE);

    for line in LinesWithEndings::from(code) {
        if let Err(err) = generator.parse_html_for_line_which_includes_newline(line) {
            log::warn!("Failed to highlight {} code: {}", lang, err);
            return escape_html(code);
        }
    }

    generator.finalize()
}

fn find_syntax(lang: &str) -> Option<&'static SyntaxReference> {
    let lang = lang.trim();
    if lang.is_empty() {
        return None;
    }
    SYNTAX_SET
        .find_syntax_by_token(lang)
        .or_else(|| SYNTAX_SET.find_syntax_by_token(&lang.to_lowercase()))
}
