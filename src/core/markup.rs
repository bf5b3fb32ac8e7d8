//! Minimal typed markup tree for HTML and SVG output.
//!
//! Every text node and attribute value is escaped when rendered, so
//! server-supplied strings (signal names, annotation aux text) can be
//! placed into the tree as-is.

use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Markup already produced by this module's renderers; emitted verbatim.
    Raw(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
    self_closing: bool,
}

impl Element {
    pub fn new(name: &'static str) -> Self {
        Self { name, attrs: Vec::new(), children: Vec::new(), self_closing: false }
    }

    /// An element rendered as `<name ... />` (SVG shapes, `<br />`, `<input />`).
    pub fn leaf(name: &'static str) -> Self {
        Self { self_closing: true, ..Self::new(name) }
    }

    pub fn attr(mut self, key: &'static str, value: impl Display) -> Self {
        self.attrs.push((key, value.to_string()));
        self
    }

    pub fn attr_if(self, cond: bool, key: &'static str, value: impl Display) -> Self {
        if cond {
            self.attr(key, value)
        } else {
            self
        }
    }

    pub fn child(mut self, el: Element) -> Self {
        self.push(el);
        self
    }

    /// Appends `el` followed by a newline.
    pub fn child_line(mut self, el: Element) -> Self {
        self.push_line(el);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    pub fn push(&mut self, el: Element) {
        self.self_closing = false;
        self.children.push(Node::Element(el));
    }

    pub fn push_line(&mut self, el: Element) {
        self.push(el);
        self.children.push(Node::Text("\n".to_string()));
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.self_closing = false;
        self.children.push(Node::Text(text.into()));
    }

    /// Inserts rendered output of `render_plot` / `render_text` unescaped.
    pub fn push_raw(&mut self, markup: impl Into<String>) {
        self.self_closing = false;
        self.children.push(Node::Raw(markup.into()));
    }

    pub fn push_fragment(&mut self, fragment: Fragment) {
        if !fragment.nodes.is_empty() {
            self.self_closing = false;
            self.children.extend(fragment.nodes);
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    pub fn render_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.name);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            attr_escape_into(out, value);
            out.push('"');
        }
        if self.self_closing && self.children.is_empty() {
            out.push_str(" />");
            return;
        }
        out.push('>');
        for child in &self.children {
            render_node(out, child);
        }
        out.push_str("</");
        out.push_str(self.name);
        out.push('>');
    }
}

/// A sequence of sibling nodes with no wrapper element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    nodes: Vec<Node>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, el: Element) {
        self.nodes.push(Node::Element(el));
    }

    pub fn push_line(&mut self, el: Element) {
        self.push(el);
        self.nodes.push(Node::Text("\n".to_string()));
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.nodes.push(Node::Text(text.into()));
    }

    pub fn extend(&mut self, other: Fragment) {
        self.nodes.extend(other.nodes);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            render_node(&mut out, node);
        }
        out
    }
}

fn render_node(out: &mut String, node: &Node) {
    match node {
        Node::Element(el) => el.render_into(out),
        Node::Text(text) => text_escape_into(out, text),
        Node::Raw(markup) => out.push_str(markup),
    }
}

fn text_escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            _ => out.push(c),
        }
    }
}

fn attr_escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
