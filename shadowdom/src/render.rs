//! Markup rendering of element trees.

use std::fmt::Write;

use crate::element::{Content, Element};

/// Options for [`render_markup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Skip hidden elements and their descendants.
    pub skip_hidden: bool,
    /// Spaces per nesting level.
    pub indent: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            skip_hidden: false,
            indent: 2,
        }
    }
}

impl RenderOptions {
    /// Everything, including hidden elements.
    pub fn full() -> Self {
        Self::default()
    }

    /// Only what a user would see.
    pub fn visible() -> Self {
        Self {
            skip_hidden: true,
            ..Self::default()
        }
    }
}

/// Render an element tree as indented HTML-like markup.
///
/// Shadow trees are rendered inside `<template shadowrootmode="open">`.
pub fn render_markup(root: &Element, options: &RenderOptions) -> String {
    let mut out = String::new();
    render_element(root, options, 0, &mut out);
    out
}

fn render_element(element: &Element, options: &RenderOptions, level: usize, out: &mut String) {
    if options.skip_hidden && element.hidden {
        return;
    }

    if element.is_text() {
        if let Content::Text(text) = &element.content
            && !text.is_empty()
        {
            line(out, options, level, &escape(text));
        }
        return;
    }

    if element.is_fragment() {
        render_children(element, options, level, out);
        return;
    }

    line(out, options, level, &open_tag(element));

    if let Some(shadow) = &element.shadow {
        line(out, options, level + 1, "<template shadowrootmode=\"open\">");
        render_element(shadow, options, level + 2, out);
        line(out, options, level + 1, "</template>");
    }

    match &element.content {
        Content::Text(text) if !text.is_empty() => line(out, options, level + 1, &escape(text)),
        _ => render_children(element, options, level + 1, out),
    }

    line(out, options, level, &format!("</{}>", element.tag));
}

fn render_children(element: &Element, options: &RenderOptions, level: usize, out: &mut String) {
    for child in element.child_elements() {
        render_element(child, options, level, out);
    }
}

fn open_tag(element: &Element) -> String {
    let mut tag = format!("<{} id=\"{}\"", element.tag, escape(&element.id));
    if !element.classes.is_empty() {
        let _ = write!(tag, " class=\"{}\"", escape(&element.classes.join(" ")));
    }
    for (name, value) in &element.attributes {
        if value.is_empty() {
            let _ = write!(tag, " {name}");
        } else {
            let _ = write!(tag, " {}=\"{}\"", name, escape(value));
        }
    }
    if element.hidden {
        tag.push_str(" hidden");
    }
    tag.push('>');
    tag
}

fn line(out: &mut String, options: &RenderOptions, level: usize, text: &str) {
    out.push_str(&" ".repeat(level * options.indent));
    out.push_str(text);
    out.push('\n');
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
