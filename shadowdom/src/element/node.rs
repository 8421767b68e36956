use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::Content;
use crate::custom::CustomElement;
use crate::event::{Event, Handler};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn generate_id(prefix: &str) -> String {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id}")
}

/// Tag used for plain text nodes.
pub const TEXT_TAG: &str = "#text";
/// Tag used for fragments, which render only their children.
pub const FRAGMENT_TAG: &str = "#fragment";

#[derive(Clone)]
pub struct Element {
    // Identity
    pub id: String,
    pub tag: String,

    // Attributes
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,

    // Content
    pub content: Content,

    // Interaction
    /// Hidden elements are skipped by the visible view.
    pub hidden: bool,
    /// Clicks on non-clickable descendants are retargeted to the nearest
    /// clickable ancestor.
    pub clickable: bool,
    /// Event handlers as (event type, handler) pairs, in registration order.
    pub handlers: Vec<(String, Handler)>,

    // Custom element hosting
    /// Rendered shadow tree of a custom element host.
    pub shadow: Option<Box<Element>>,
    /// Instance backing a custom element host.
    pub instance: Option<Arc<dyn CustomElement>>,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            id: generate_id("el"),
            tag: "div".into(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            content: Content::None,
            hidden: false,
            clickable: false,
            handlers: Vec::new(),
            shadow: None,
            instance: None,
        }
    }
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers: Vec<&str> = self.handlers.iter().map(|(ty, _)| ty.as_str()).collect();
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("classes", &self.classes)
            .field("attributes", &self.attributes)
            .field("content", &self.content)
            .field("hidden", &self.hidden)
            .field("clickable", &self.clickable)
            .field("handlers", &handlers)
            .field("shadow", &self.shadow)
            .finish()
    }
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self {
            id: generate_id(&tag),
            tag,
            ..Default::default()
        }
    }

    pub fn div() -> Self {
        Self::new("div")
    }

    pub fn span() -> Self {
        Self::new("span")
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            id: generate_id("text"),
            tag: TEXT_TAG.into(),
            content: Content::Text(content.into()),
            ..Default::default()
        }
    }

    pub fn fragment() -> Self {
        Self {
            id: generate_id("fragment"),
            tag: FRAGMENT_TAG.into(),
            ..Default::default()
        }
    }

    /// Create a host element for a custom element, rendering its shadow tree.
    pub fn host(instance: Arc<dyn CustomElement>) -> Self {
        let shadow = instance.render();
        Self {
            id: instance.id().to_string(),
            tag: instance.tag().to_string(),
            shadow: Some(Box::new(shadow)),
            instance: Some(instance),
            ..Default::default()
        }
    }

    // Builder methods

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    /// Add a class only when `condition` holds.
    pub fn class_if(self, condition: bool, class: impl Into<String>) -> Self {
        if condition { self.class(class) } else { self }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set a boolean attribute (present with an empty value) when `condition` holds.
    pub fn attr_if(self, condition: bool, name: impl Into<String>) -> Self {
        if condition { self.attr(name, "") } else { self }
    }

    /// Set a `data-*` attribute.
    pub fn data(self, key: &str, value: impl Into<String>) -> Self {
        self.attr(format!("data-{key}"), value)
    }

    pub fn content(mut self, content: Content) -> Self {
        self.content = content;
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            _ => self.content = Content::Children(vec![child]),
        }
        self
    }

    pub fn children(mut self, children: Vec<Element>) -> Self {
        self.content = Content::Children(children);
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn clickable(mut self, clickable: bool) -> Self {
        self.clickable = clickable;
        self
    }

    /// Register a handler for `event_type` on this element.
    pub fn on<F>(mut self, event_type: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Event) + Send + Sync + 'static,
    {
        self.handlers.push((event_type.into(), Arc::new(handler)));
        self
    }

    // Accessors

    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn is_text(&self) -> bool {
        self.tag == TEXT_TAG
    }

    pub fn is_fragment(&self) -> bool {
        self.tag == FRAGMENT_TAG
    }

    pub fn is_host(&self) -> bool {
        self.instance.is_some()
    }

    pub fn child_elements(&self) -> &[Element] {
        match &self.content {
            Content::Children(children) => children,
            _ => &[],
        }
    }

    /// Handlers registered for `event_type`, cloned for dispatch.
    pub fn handlers_for(&self, event_type: &str) -> Vec<Handler> {
        self.handlers
            .iter()
            .filter(|(ty, _)| ty == event_type)
            .map(|(_, handler)| Arc::clone(handler))
            .collect()
    }

    /// Concatenated text of this element and its light-tree descendants.
    ///
    /// Shadow trees are not included.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(element: &Element, out: &mut String) {
    match &element.content {
        Content::None => {}
        Content::Text(s) => out.push_str(s),
        Content::Children(children) => {
            for child in children {
                collect_text(child, out);
            }
        }
    }
}
