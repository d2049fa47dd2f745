//! Conversion of ANSI escape sequences in stream and error output to HTML.
//!
//! SGR sequences (`ESC [ ... m`) become `span` elements: the standard and
//! bright colors and the text attributes map to `ansi-*` classes, 256-color
//! and truecolor values to inline styles. All other escape sequences are
//! dropped.

use crate::render::escape::escape_html;
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_till, take_while},
    character::complete::{anychar, char, satisfy},
    combinator::{opt, value},
    sequence::preceded,
    IResult,
};

const COLOR_NAMES: [&str; 8] = [
    "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// One of the 16 standard colors; 8-15 are the bright ones.
    Named(u8),
    Rgb(u8, u8, u8),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Style {
    bold: bool,
    faint: bool,
    italic: bool,
    underline: bool,
    fg: Option<Color>,
    bg: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    /// Select Graphic Rendition parameters.
    Sgr(Vec<u16>),
    Ignored,
}

/// Convert `text` with ANSI escape sequences to HTML. The text is escaped.
pub fn ansi_to_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut style = Style::default();
    let mut input = text;

    while !input.is_empty() {
        let Ok((rest, token)) = token(input) else {
            break;
        };
        input = rest;

        match token {
            Token::Text(text) => push_styled(&mut out, &style, text),
            Token::Sgr(params) => style.apply(&params),
            Token::Ignored => {}
        }
    }

    out
}

fn token(input: &str) -> IResult<&str, Token<'_>> {
    alt((text, csi, osc, other_escape))(input)
}

fn text(input: &str) -> IResult<&str, Token<'_>> {
    let (input, text) = is_not("\x1b")(input)?;
    Ok((input, Token::Text(text)))
}

/// Control Sequence Introducer: `ESC [`, parameters, intermediates, final byte.
fn csi(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = tag("\x1b[")(input)?;
    let (input, params) = take_while(|c: char| ('\x30'..='\x3f').contains(&c))(input)?;
    let (input, _) = take_while(|c: char| ('\x20'..='\x2f').contains(&c))(input)?;
    let (input, final_byte) = satisfy(|c| ('\x40'..='\x7e').contains(&c))(input)?;

    if final_byte == 'm' && params.chars().all(|c| c.is_ascii_digit() || c == ';') {
        Ok((input, Token::Sgr(parse_params(params))))
    } else {
        Ok((input, Token::Ignored))
    }
}

/// Operating System Command, terminated by BEL or ST.
fn osc(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = tag("\x1b]")(input)?;
    let (input, _) = take_till(|c: char| c == '\x07' || c == '\x1b')(input)?;
    let (input, _) = opt(alt((tag("\x07"), tag("\x1b\\"))))(input)?;
    Ok((input, Token::Ignored))
}

fn other_escape(input: &str) -> IResult<&str, Token<'_>> {
    value(Token::Ignored, preceded(char('\x1b'), opt(anychar)))(input)
}

fn parse_params(params: &str) -> Vec<u16> {
    params
        .split(';')
        .map(|param| param.parse().unwrap_or(0))
        .collect()
}

impl Style {
    fn apply(&mut self, params: &[u16]) {
        let mut params = params.iter().copied();

        while let Some(code) = params.next() {
            match code {
                0 => *self = Style::default(),
                1 => self.bold = true,
                2 => self.faint = true,
                3 => self.italic = true,
                4 => self.underline = true,
                22 => {
                    self.bold = false;
                    self.faint = false;
                }
                23 => self.italic = false,
                24 => self.underline = false,
                30..=37 => self.fg = Some(Color::Named((code - 30) as u8)),
                38 => {
                    if let Some(color) = extended_color(&mut params) {
                        self.fg = Some(color);
                    }
                }
                39 => self.fg = None,
                40..=47 => self.bg = Some(Color::Named((code - 40) as u8)),
                48 => {
                    if let Some(color) = extended_color(&mut params) {
                        self.bg = Some(color);
                    }
                }
                49 => self.bg = None,
                90..=97 => self.fg = Some(Color::Named((code - 90 + 8) as u8)),
                100..=107 => self.bg = Some(Color::Named((code - 100 + 8) as u8)),
                _ => {}
            }
        }
    }

    fn is_plain(&self) -> bool {
        *self == Style::default()
    }
}

/// Parse the arguments of `38` and `48`: `5;n` or `2;r;g;b`.
fn extended_color(params: &mut impl Iterator<Item = u16>) -> Option<Color> {
    match params.next()? {
        5 => params.next().map(|n| color_256(clamp(n))),
        2 => {
            let r = params.next()?;
            let g = params.next()?;
            let b = params.next()?;
            Some(Color::Rgb(clamp(r), clamp(g), clamp(b)))
        }
        _ => None,
    }
}

fn clamp(n: u16) -> u8 {
    u8::try_from(n).unwrap_or(u8::MAX)
}

/// Color of the xterm 256-color palette.
fn color_256(n: u8) -> Color {
    match n {
        0..=15 => Color::Named(n),
        16..=231 => {
            let n = n - 16;
            let level = |v: u8| if v == 0 { 0 } else { 55 + v * 40 };
            Color::Rgb(level(n / 36), level((n / 6) % 6), level(n % 6))
        }
        _ => {
            let gray = 8 + (n - 232) * 10;
            Color::Rgb(gray, gray, gray)
        }
    }
}

fn color_name(n: u8) -> String {
    let name = COLOR_NAMES[usize::from(n % 8)];
    if n < 8 {
        name.to_string()
    } else {
        format!("bright-{}", name)
    }
}

fn push_styled(out: &mut String, style: &Style, text: &str) {
    if style.is_plain() {
        out.push_str(&escape_html(text));
        return;
    }

    let mut classes = Vec::new();
    let mut styles = Vec::new();

    match style.fg {
        Some(Color::Named(n)) => classes.push(format!("ansi-{}-fg", color_name(n))),
        Some(Color::Rgb(r, g, b)) => styles.push(format!("color: rgb({}, {}, {})", r, g, b)),
        None => {}
    }
    match style.bg {
        Some(Color::Named(n)) => classes.push(format!("ansi-{}-bg", color_name(n))),
        Some(Color::Rgb(r, g, b)) => {
            styles.push(format!("background-color: rgb({}, {}, {})", r, g, b))
        }
        None => {}
    }
    for (enabled, class) in [
        (style.bold, "ansi-bold"),
        (style.faint, "ansi-faint"),
        (style.italic, "ansi-italic"),
        (style.underline, "ansi-underline"),
    ] {
        if enabled {
            classes.push(class.to_string());
        }
    }

    out.push_str("<span");
    if !classes.is_empty() {
        out.push_str(&format!(r#" class="{}""#, classes.join(" ")));
    }
    if !styles.is_empty() {
        out.push_str(&format!(r#" style="{}""#, styles.join("; ")));
    }
    out.push('>');
    out.push_str(&escape_html(text));
    out.push_str("</span>");
}
