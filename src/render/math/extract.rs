//! Hiding of delimited math expressions from a Markdown converter.
//!
//! [`extract_math`] replaces every math expression in the text with a
//! numbered marker `@@n@@`, so that the Markdown converter does not mangle
//! the TeX. After conversion, [`restore_math`] puts the rendered math back.
//!
//! Math delimiters must match, braces inside math must balance, and math
//! never spans a blank line (a paragraph break) unless braces are still open.
//! Dollar signs inside code spans and fenced code blocks are not delimiters.
//!
//! Text that already looks like a marker is escaped by inserting a zero
//! (`@@1@@` becomes `@@01@@`) and unescaped again by [`restore_math`].

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// A math expression found by [`extract_math`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathExpression {
    /// The expression including its delimiters.
    pub raw: String,
    /// The expression without delimiters, trimmed.
    pub value: String,
    /// Block (display) math rather than inline math.
    pub display_mode: bool,
}

/// Math delimiters, escaped delimiter-like characters, braces and runs of
/// line breaks. `\\(`, `\\)`, `\\[` and `\\]` are written with a doubled
/// backslash in Markdown source.
static MATH_SPLIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\$\$?|\\(?:begin|end)\{[a-z]*\*?\}|\\[{}$]|[{}]|(?:\n\s*)+|\\\\(?:\(|\)|\[|\])")
        .expect("math split pattern is valid")
});

static MARKER_LIKE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@@([0-9]+)@@").expect("marker pattern is valid"));

static MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@@([1-9][0-9]*)@@").expect("marker pattern is valid"));

static ESCAPED_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@@0([0-9]+)@@").expect("escaped marker pattern is valid"));

/// Start delimiters whose expressions are stripped of the delimiters, with
/// their display mode. Longer delimiters go first.
const DELIMITERS: [(&str, bool); 4] = [("$$", true), ("$", false), ("\\\\[", true), ("\\\\(", false)];

/// Extract math expressions from `text`.
///
/// Returns the text with each expression replaced by `@@n@@` (1-based) and
/// the expressions in order of extraction.
pub fn extract_math(text: &str) -> (String, Vec<MathExpression>) {
    let text = MARKER_LIKE.replace_all(text, "@@0${1}@@");

    let has_code_spans = text.contains('`');
    let text = if has_code_spans {
        escape_codes(&text)
    } else {
        text.into_owned()
    };
    let unescape = |s: &str| {
        if has_code_spans {
            unescape_codes(s)
        } else {
            s.to_string()
        }
    };

    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut blocks = split_blocks(&text);
    let mut math: Vec<String> = Vec::new();

    // Indices into `blocks`; delimiters and other special tokens sit at odd
    // indices.
    let mut start: Option<usize> = None;
    let mut last: Option<usize> = None;
    let mut end_delim: Option<String> = None;
    let mut braces = 0usize;

    let mut i = 1;
    while i < blocks.len() {
        if let Some(start_idx) = start {
            let block = blocks[i].as_str();

            if end_delim.as_deref() == Some(block) {
                if braces > 0 {
                    last = Some(i);
                } else {
                    take_math(&mut blocks, &mut math, start_idx, i, &unescape);
                    start = None;
                    end_delim = None;
                    last = None;
                }
            } else if block == "{" {
                braces += 1;
            } else if block == "}" {
                braces = braces.saturating_sub(1);
            } else if is_paragraph_break(block) {
                if let Some(last_idx) = last {
                    i = last_idx;
                    take_math(&mut blocks, &mut math, start_idx, i, &unescape);
                }
                start = None;
                end_delim = None;
                last = None;
                braces = 0;
            }
        } else {
            let block = blocks[i].as_str();
            let delim = match block {
                "$" | "$$" => Some(block.to_string()),
                "\\\\(" => Some("\\\\)".to_string()),
                "\\\\[" => Some("\\\\]".to_string()),
                _ => block
                    .strip_prefix("\\begin")
                    .map(|env| format!("\\end{}", env)),
            };
            if delim.is_some() {
                start = Some(i);
                end_delim = delim;
                braces = 0;
            }
        }
        i += 2;
    }

    if let (Some(start_idx), Some(last_idx)) = (start, last) {
        take_math(&mut blocks, &mut math, start_idx, last_idx, &unescape);
    }

    let text = unescape(&blocks.concat());
    let expressions = math.iter().map(|raw| parse_delimited_math(raw)).collect();

    (text, expressions)
}

/// Replace the markers in `text` with the strings of `math` (marker `@@n@@`
/// gets `math[n - 1]`) and unescape marker-like sequences.
///
/// Markers without a corresponding entry are removed.
pub fn restore_math<S: AsRef<str>>(text: &str, math: &[S]) -> String {
    let text = MARKER.replace_all(text, |caps: &Captures| {
        caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|n| math.get(n - 1))
            .map(|s| s.as_ref().to_string())
            .unwrap_or_default()
    });
    ESCAPED_MARKER.replace_all(&text, "@@${1}@@").into_owned()
}

/// Remove math markers from `text` and trim it.
pub fn strip_math(text: &str) -> String {
    restore_math::<&str>(text, &[]).trim().to_string()
}

/// Parse a chunk extracted by [`extract_math`].
///
/// An expression without a known start delimiter (e.g. `\begin{..}`) is
/// kept whole as its value and displayed as a block.
pub fn parse_delimited_math(raw: &str) -> MathExpression {
    match DELIMITERS.iter().find(|(delim, _)| raw.starts_with(*delim)) {
        Some((delim, display_mode)) => {
            let value = raw
                .get(delim.len()..raw.len().saturating_sub(delim.len()))
                .unwrap_or("")
                .trim();
            MathExpression {
                raw: raw.to_string(),
                value: value.to_string(),
                display_mode: *display_mode,
            }
        }
        None => MathExpression {
            raw: raw.to_string(),
            value: raw.to_string(),
            display_mode: true,
        },
    }
}

/// Split `text` into alternating plain text and special tokens.
fn split_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut pos = 0;
    for m in MATH_SPLIT.find_iter(text) {
        blocks.push(text[pos..m.start()].to_string());
        blocks.push(m.as_str().to_string());
        pos = m.end();
    }
    blocks.push(text[pos..].to_string());
    blocks
}

/// Collapse `blocks[start..=end]` into a marker and store the math.
fn take_math(
    blocks: &mut [String],
    math: &mut Vec<String>,
    start: usize,
    end: usize,
    unescape: &dyn Fn(&str) -> String,
) {
    let chunk = blocks[start..=end].concat();
    for block in &mut blocks[start + 1..=end] {
        block.clear();
    }
    math.push(unescape(&chunk));
    blocks[start] = format!("@@{}@@", math.len());
}

/// Whether a line-break token contains a blank line.
fn is_paragraph_break(block: &str) -> bool {
    let segments: Vec<&str> = block.split('\n').collect();
    segments.len() > 2
        && segments[1..segments.len() - 1]
            .iter()
            .any(|seg| !seg.contains(is_line_terminator))
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_line_start(chars: &[char], pos: usize) -> bool {
    pos == 0 || is_line_terminator(chars[pos - 1])
}

fn count_backticks(chars: &[char], pos: usize) -> usize {
    chars[pos.min(chars.len())..]
        .iter()
        .take_while(|&&c| c == '`')
        .count()
}

/// Hide `$` inside code spans and fenced code blocks behind `~D` (and `~`
/// itself behind `~T`), so they are not mistaken for math delimiters.
fn escape_codes(text: &str) -> String {
    let chars: Vec<char> = text.replace('~', "~T").chars().collect();
    let chars = escape_matches(&chars, match_code_span);
    let chars = escape_matches(&chars, match_fenced_code);
    chars.into_iter().collect()
}

/// Reverse [`escape_codes`].
fn unescape_codes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '~' {
            match chars.peek() {
                Some('T') => {
                    chars.next();
                    out.push('~');
                    continue;
                }
                Some('D') => {
                    chars.next();
                    out.push('$');
                    continue;
                }
                _ => {}
            }
        }
        out.push(c);
    }
    out
}

/// Scan left to right and escape `$` in every region found by `matcher`,
/// which returns the end of a region starting at the given position.
fn escape_matches(chars: &[char], matcher: fn(&[char], usize) -> Option<usize>) -> Vec<char> {
    let mut out = Vec::with_capacity(chars.len());
    let mut pos = 0;
    while pos < chars.len() {
        match matcher(chars, pos) {
            Some(end) => {
                for &c in &chars[pos..end] {
                    if c == '$' {
                        out.extend(['~', 'D']);
                    } else {
                        out.push(c);
                    }
                }
                pos = end;
            }
            None => {
                out.push(chars[pos]);
                pos += 1;
            }
        }
    }
    out
}

/// A code span at `pos`: either at a line start, or preceded by one
/// character that is not a backslash.
fn match_code_span(chars: &[char], pos: usize) -> Option<usize> {
    if is_line_start(chars, pos) {
        if let Some(end) = match_backtick_run(chars, pos) {
            return Some(end);
        }
    }
    if chars[pos] != '\\' {
        return match_backtick_run(chars, pos + 1);
    }
    None
}

/// A run of backticks at `pos`, single-line content not ending with a
/// backtick, and a closing run of the same length not followed by another
/// backtick. Shorter opening runs are tried when the longest one fails.
fn match_backtick_run(chars: &[char], pos: usize) -> Option<usize> {
    let max = count_backticks(chars, pos);

    for n in (1..=max).rev() {
        let content_start = pos + n;
        for last in content_start..chars.len() {
            let c = chars[last];
            if c == '\n' {
                break;
            }
            if c == '`' {
                continue;
            }
            let close = last + 1;
            if count_backticks(chars, close) == n {
                return Some(close + n);
            }
        }
    }
    None
}

/// A fenced code block at `pos`: a line start, up to three whitespace
/// characters, three or more backticks, and the nearest closing run of the
/// same length.
fn match_fenced_code(chars: &[char], pos: usize) -> Option<usize> {
    if !is_line_start(chars, pos) {
        return None;
    }

    let indent = chars[pos..]
        .iter()
        .take(4)
        .take_while(|c| c.is_whitespace())
        .count();
    if indent > 3 {
        return None;
    }

    let fence_start = pos + indent;
    let max = count_backticks(chars, fence_start);
    if max < 3 {
        return None;
    }

    for n in (3..=max).rev() {
        let body_start = fence_start + n;
        for close in body_start..chars.len() {
            if chars[close..].len() >= n && chars[close..close + n].iter().all(|&c| c == '`') {
                return Some(close + n);
            }
            if matches!(chars[close], '\r' | '\u{2028}' | '\u{2029}') {
                break;
            }
        }
    }
    None
}
