//! Output element tree and the builder that constructs it.

use crate::render::escape::escape_attribute;
use std::fmt;
use std::sync::Arc;

/// Tags serialized without a closing tag.
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

/// The smallest element capability surface the renderer depends on.
///
/// Implement this for a foreign element type (a DOM binding, a virtual DOM
/// node, ...) to render notebooks into it.
pub trait MinimalElement {
    /// Set an attribute, replacing any previous value.
    fn set_attribute(&mut self, name: &str, value: &str);

    /// Append a child element after the existing content.
    fn append_child(&mut self, child: Self)
    where
        Self: Sized;

    /// Replace the whole content with trusted raw markup.
    fn set_inner_html(&mut self, html: String);
}

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Trusted markup, emitted verbatim.
    Html(String),
}

/// A node of the rendered output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    nodes: Vec<Node>,
}

impl Element {
    /// Create an empty element with the given tag.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attributes: Vec::new(),
            nodes: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Value of the attribute `name`, if set.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Attributes in the order they were first set.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// The `class` attribute, or an empty string.
    pub fn class_name(&self) -> &str {
        self.attribute("class").unwrap_or("")
    }

    /// All child nodes, including raw markup.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Child elements, skipping raw markup.
    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Html(_) => None,
        })
    }

    /// The `index`-th child element.
    pub fn child(&self, index: usize) -> Option<&Element> {
        self.children().nth(index)
    }

    /// Serialized content of this element.
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        self.write_nodes(&mut out);
        out
    }

    /// Serialized element including its own tag.
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (key, value) in &self.attributes {
            out.push_str(&format!(r#" {}="{}""#, key, escape_attribute(value)));
        }
        out.push('>');

        if VOID_TAGS.contains(&self.tag.as_str()) && self.nodes.is_empty() {
            return;
        }

        self.write_nodes(out);
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }

    fn write_nodes(&self, out: &mut String) {
        for node in &self.nodes {
            match node {
                Node::Element(el) => el.write_html(out),
                Node::Html(html) => out.push_str(html),
            }
        }
    }
}

impl MinimalElement for Element {
    fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self
                .attributes
                .push((name.to_string(), value.to_string())),
        }
    }

    fn append_child(&mut self, child: Self) {
        self.nodes.push(Node::Element(child));
    }

    fn set_inner_html(&mut self, html: String) {
        self.nodes.clear();
        if !html.is_empty() {
            self.nodes.push(Node::Html(html));
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.outer_html())
    }
}

/// Second argument of [`ElementBuilder::build`].
#[derive(Debug, Clone, Copy)]
pub enum Attrs<'a> {
    None,
    /// Class names, each run through the class prefix rule.
    Classes(&'a [&'a str]),
    /// Attributes set verbatim, except that `class` gets the prefix rule.
    Map(&'a [(&'a str, &'a str)]),
}

/// Third argument of [`ElementBuilder::build`].
#[derive(Debug, Clone)]
pub enum Body<E> {
    Empty,
    Children(Vec<E>),
    /// Raw inner markup; the caller is responsible for escaping.
    Html(String),
}

/// Function creating a bare element from a tag name.
pub type ElementFactory<E> = Arc<dyn Fn(&str) -> E + Send + Sync>;

/// Builds elements with prefixed class names.
pub struct ElementBuilder<E> {
    factory: ElementFactory<E>,
    class_prefix: String,
}

impl<E> Clone for ElementBuilder<E> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
            class_prefix: self.class_prefix.clone(),
        }
    }
}

impl<E> fmt::Debug for ElementBuilder<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementBuilder")
            .field("class_prefix", &self.class_prefix)
            .finish_non_exhaustive()
    }
}

/// Default prefix of all CSS class names except `lang-*`.
pub const DEFAULT_CLASS_PREFIX: &str = "nb-";

impl ElementBuilder<Element> {
    /// Builder producing [`Element`]s.
    pub fn new(class_prefix: impl Into<String>) -> Self {
        Self::with_factory(Element::new, class_prefix)
    }
}

impl Default for ElementBuilder<Element> {
    fn default() -> Self {
        Self::new(DEFAULT_CLASS_PREFIX)
    }
}

impl<E: MinimalElement> ElementBuilder<E> {
    /// Builder producing elements of a foreign type.
    pub fn with_factory<F>(factory: F, class_prefix: impl Into<String>) -> Self
    where
        F: Fn(&str) -> E + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
            class_prefix: class_prefix.into(),
        }
    }

    pub fn class_prefix(&self) -> &str {
        &self.class_prefix
    }

    /// Apply the prefix to a class name; `lang-*` markers are left alone.
    pub fn prefix_class(&self, name: &str) -> String {
        if name.starts_with("lang-") {
            name.to_string()
        } else {
            format!("{}{}", self.class_prefix, name)
        }
    }

    fn prefix_classes<'a>(&self, names: impl Iterator<Item = &'a str>) -> String {
        names
            .map(|name| self.prefix_class(name))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Build an element.
    pub fn build(&self, tag: &str, attrs: Attrs<'_>, body: Body<E>) -> E {
        let mut el = (self.factory)(tag);

        match attrs {
            Attrs::None => {}
            Attrs::Classes(classes) => {
                if !classes.is_empty() {
                    let value = self.prefix_classes(classes.iter().copied());
                    el.set_attribute("class", &value);
                }
            }
            Attrs::Map(pairs) => {
                for (key, value) in pairs {
                    if *key == "class" {
                        let value = self.prefix_classes(value.split(' '));
                        el.set_attribute(key, &value);
                    } else {
                        el.set_attribute(key, value);
                    }
                }
            }
        }

        match body {
            Body::Empty => {}
            Body::Children(children) => {
                for child in children {
                    el.append_child(child);
                }
            }
            Body::Html(html) => el.set_inner_html(html),
        }

        el
    }
}
