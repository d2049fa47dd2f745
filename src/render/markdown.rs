//! Markdown to HTML conversion with math support.
//!
//! Math is pulled out of the Markdown before it is handed to `pulldown-cmark`
//! and typeset separately, then put back into the produced HTML.

use crate::render::escape::{escape_attribute, escape_html};
use crate::render::math::{extract_math, restore_math, strip_math, MathRenderer};
use crate::render::notebook::CodeHighlighter;
use once_cell::sync::Lazy;
use pulldown_cmark::{
    html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd,
};
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

static HTML_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<[!/a-z].*?>").expect("HTML tag pattern is valid"));

static SLUG_PUNCTUATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r##"[\u{2000}-\u{206F}\u{2E00}-\u{2E7F}\\'!"#$%&()*+,./:;<=>?@\[\]^`{|}~]"##)
        .expect("punctuation pattern is valid")
});

/// Markdown converter options.
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
    /// Put an empty `a.anchor` link to the heading into each heading.
    pub header_anchors: bool,
    /// Prefix of generated heading ids.
    pub header_prefix: String,
    /// Remove accents from heading ids (`Příliš` becomes `prilis`).
    pub header_ids_strip_accents: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            header_anchors: true,
            header_prefix: String::new(),
            header_ids_strip_accents: false,
        }
    }
}

/// Converts Markdown with math to HTML.
pub struct MarkdownRenderer {
    options: MarkdownOptions,
    math: Arc<dyn MathRenderer>,
    highlighter: Option<CodeHighlighter>,
}

impl MarkdownRenderer {
    pub fn new(options: MarkdownOptions, math: Arc<dyn MathRenderer>) -> Self {
        Self {
            options,
            math,
            highlighter: None,
        }
    }

    /// Highlight fenced code blocks that name a language with `highlighter`.
    pub fn with_highlighter(mut self, highlighter: CodeHighlighter) -> Self {
        self.highlighter = Some(highlighter);
        self
    }

    /// Convert `markdown` to HTML.
    pub fn render(&self, markdown: &str) -> String {
        let (text, math) = extract_math(markdown);
        let html = self.render_markdown(&text);

        let math_html: Vec<String> = math
            .iter()
            .map(|expr| {
                self.math
                    .render(&expr.value, expr.display_mode)
                    .unwrap_or_else(|err| {
                        log::warn!("Failed to render math {:?}: {}", expr.raw, err);
                        escape_html(&expr.raw)
                    })
            })
            .collect();

        restore_math(&html, &math_html)
    }

    /// Convert Markdown without math handling; math markers are kept in the
    /// text, but stripped from heading ids, link and image URLs, titles and
    /// image descriptions.
    fn render_markdown(&self, markdown: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        let mut slugger = Slugger::default();
        let mut events: Vec<Event> = Vec::new();
        let mut heading: Option<(HeadingLevel, Vec<Event>)> = None;
        let mut code_block: Option<(String, String)> = None;
        let mut image_depth = 0usize;

        for event in Parser::new_ext(markdown, options) {
            let event = match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    heading = Some((level, Vec::new()));
                    continue;
                }
                Event::End(TagEnd::Heading(_)) => match heading.take() {
                    Some((level, inner)) => {
                        let html = self.render_heading(level, inner, &mut slugger);
                        Event::Html(html.into())
                    }
                    None => continue,
                },
                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    id,
                }) => Event::Start(Tag::Link {
                    link_type,
                    dest_url: strip_math_cow(dest_url),
                    title: strip_math_cow(title),
                    id,
                }),
                Event::Start(Tag::Image {
                    link_type,
                    dest_url,
                    title,
                    id,
                }) => {
                    image_depth += 1;
                    Event::Start(Tag::Image {
                        link_type,
                        dest_url: strip_math_cow(dest_url),
                        title: strip_math_cow(title),
                        id,
                    })
                }
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info)))
                    if self.highlighter.is_some() =>
                {
                    let lang = info.split_whitespace().next().unwrap_or("").to_string();
                    code_block = Some((lang, String::new()));
                    continue;
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some((_, code)) = code_block.as_mut() {
                        code.push_str(&text);
                    }
                    continue;
                }
                Event::End(TagEnd::CodeBlock) if code_block.is_some() => {
                    match code_block.take() {
                        Some((lang, code)) => Event::Html(self.render_code_block(&lang, &code).into()),
                        None => continue,
                    }
                }
                Event::End(TagEnd::Image) => {
                    image_depth = image_depth.saturating_sub(1);
                    Event::End(TagEnd::Image)
                }
                Event::Text(text) if image_depth > 0 => {
                    Event::Text(restore_math::<&str>(&text, &[]).into())
                }
                event => event,
            };

            match heading.as_mut() {
                Some((_, inner)) => inner.push(event),
                None => events.push(event),
            }
        }

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());
        out
    }

    fn render_code_block(&self, lang: &str, code: &str) -> String {
        let highlighted = match (&self.highlighter, lang) {
            (Some(highlighter), lang) if !lang.is_empty() => highlighter(code, lang),
            _ => escape_html(code),
        };

        if lang.is_empty() {
            format!("<pre><code>{}</code></pre>\n", highlighted)
        } else {
            format!(
                "<pre><code class=\"language-{}\">{}</code></pre>\n",
                escape_attribute(lang),
                highlighted
            )
        }
    }

    fn render_heading(&self, level: HeadingLevel, inner: Vec<Event>, slugger: &mut Slugger) -> String {
        let raw: String = inner
            .iter()
            .filter_map(|event| match event {
                Event::Text(text)
                | Event::Code(text)
                | Event::Html(text)
                | Event::InlineHtml(text) => Some(text.as_ref()),
                _ => None,
            })
            .collect();

        let mut id = format!("{}{}", self.options.header_prefix, slugger.slug(&strip_math(&raw)));
        if self.options.header_ids_strip_accents {
            id = strip_accents(&id);
        }
        let id = escape_attribute(&id);

        let mut text = String::new();
        html::push_html(&mut text, inner.into_iter());

        let anchor = if self.options.header_anchors {
            format!(r##"<a class="anchor" href="#{}" aria-hidden="true"></a>"##, id)
        } else {
            String::new()
        };

        format!("<{level} id=\"{id}\">{anchor}{text}</{level}>\n")
    }
}

fn strip_math_cow(text: CowStr<'_>) -> CowStr<'_> {
    if text.contains("@@") {
        strip_math(&text).into()
    } else {
        text
    }
}

fn strip_accents(text: &str) -> String {
    text.nfd().filter(|&c| !is_combining_mark(c)).collect()
}

/// Generates unique heading ids from heading text.
#[derive(Debug, Default)]
struct Slugger {
    seen: HashMap<String, usize>,
}

impl Slugger {
    fn slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        let mut slug = base.clone();

        if let Some(count) = self.seen.get(&base).copied() {
            let mut count = count;
            loop {
                count += 1;
                slug = format!("{}-{}", base, count);
                if !self.seen.contains_key(&slug) {
                    break;
                }
            }
            self.seen.insert(base, count);
        }

        self.seen.insert(slug.clone(), 0);
        slug
    }
}

fn slugify(text: &str) -> String {
    let text = text.trim().to_lowercase();
    let text = HTML_TAG.replace_all(&text, "");
    let text = SLUG_PUNCTUATION.replace_all(&text, "");
    text.chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect()
}
