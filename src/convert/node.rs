//! Renderable node tree produced by the converter

use indexmap::IndexMap;

use crate::helpers::html_escape;

/// A render-ready node
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Pre-processed markup emitted verbatim. Only produced on the
    /// converter's degrade path when the body cannot be tokenized.
    RawHtml(String),
}

/// An element node with ordered attributes and a parsed style map
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    /// Attributes in document order, `style` excluded
    pub attrs: IndexMap<String, String>,
    /// Inline style declarations, keys camelCased
    pub style: IndexMap<String, String>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn child(mut self, node: Node) -> Self {
        self.children.push(node);
        self
    }

    /// Class attribute, empty string when unset
    pub fn class(&self) -> &str {
        self.attrs.get("class").map(|s| s.as_str()).unwrap_or("")
    }

    /// Append classes to the existing class attribute
    pub fn append_class(&mut self, classes: &str) {
        let current = self.class().trim().to_string();
        let merged = if current.is_empty() {
            classes.to_string()
        } else {
            format!("{} {}", current, classes)
        };
        self.attrs.insert("class".to_string(), merged);
    }

    /// Serialize the subtree to an HTML string
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        out.push('<');
        out.push_str(&self.tag);

        for (name, value) in &self.attrs {
            out.push_str(&format!(r#" {}="{}""#, name, html_escape(value)));
        }
        if !self.style.is_empty() {
            let css: Vec<String> = self
                .style
                .iter()
                .map(|(k, v)| format!("{}: {}", camel_to_kebab(k), v))
                .collect();
            out.push_str(&format!(r#" style="{}""#, html_escape(&css.join("; "))));
        }

        if is_void_element(&self.tag) && self.children.is_empty() {
            out.push_str(" />");
            return out;
        }

        out.push('>');
        for child in &self.children {
            out.push_str(&child.to_html());
        }
        out.push_str(&format!("</{}>", self.tag));
        out
    }
}

impl Node {
    pub fn text(text: &str) -> Node {
        Node::Text(text.to_string())
    }

    /// Serialize to an HTML string. Text is escaped; `RawHtml` is the one
    /// variant emitted as-is.
    pub fn to_html(&self) -> String {
        match self {
            Node::Element(el) => el.to_html(),
            Node::Text(text) => html_escape(text),
            Node::RawHtml(raw) => raw.clone(),
        }
    }

    /// Concatenated text content of the subtree
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(text) => text.clone(),
            Node::RawHtml(raw) => crate::helpers::strip_html(raw),
            Node::Element(el) => el.children.iter().map(|c| c.text_content()).collect(),
        }
    }
}

/// Elements with no closing tag
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

fn camel_to_kebab(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
