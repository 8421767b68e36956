//! Events dispatched through the document.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::element::Element;

/// Event handler attached to an element or the document.
pub type Handler = Arc<dyn Fn(&mut Event) + Send + Sync>;

/// Options for constructing an [`Event`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventInit {
    /// Whether the event propagates to ancestors after the target.
    pub bubbles: bool,
    /// Whether the event crosses shadow tree boundaries.
    pub composed: bool,
    /// Payload carried by custom events.
    pub detail: Option<Value>,
}

impl EventInit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }

    pub fn composed(mut self, composed: bool) -> Self {
        self.composed = composed;
        self
    }

    pub fn detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// Snapshot of the element an event was dispatched at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTarget {
    pub id: String,
    pub tag: String,
    /// The element's `value` attribute, if any.
    pub value: Option<String>,
    /// The element's `data-*` attributes, keyed without the prefix.
    pub dataset: BTreeMap<String, String>,
}

impl EventTarget {
    pub fn from_element(element: &Element) -> Self {
        let dataset = element
            .attributes
            .iter()
            .filter_map(|(name, value)| {
                name.strip_prefix("data-")
                    .map(|key| (key.to_string(), value.clone()))
            })
            .collect();

        Self {
            id: element.id.clone(),
            tag: element.tag.clone(),
            value: element.attr_value("value").map(str::to_string),
            dataset,
        }
    }

    /// Look up a `data-*` attribute by key.
    pub fn data(&self, key: &str) -> Option<&str> {
        self.dataset.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct Event {
    event_type: String,
    bubbles: bool,
    composed: bool,
    detail: Option<Value>,
    target: Option<EventTarget>,
    current_target: Option<String>,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
}

impl Event {
    pub fn new(event_type: impl Into<String>, init: EventInit) -> Self {
        Self {
            event_type: event_type.into(),
            bubbles: init.bubbles,
            composed: init.composed,
            detail: init.detail,
            target: None,
            current_target: None,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    /// A pointer click: bubbles and crosses shadow boundaries.
    pub fn click() -> Self {
        Self::new("click", EventInit::new().bubbles(true).composed(true))
    }

    /// A form control change: bubbles but stays inside its shadow tree.
    pub fn change() -> Self {
        Self::new("change", EventInit::new().bubbles(true))
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn composed(&self) -> bool {
        self.composed
    }

    pub fn detail(&self) -> Option<&Value> {
        self.detail.as_ref()
    }

    /// Read a string field from an object detail.
    pub fn detail_str(&self, key: &str) -> Option<&str> {
        self.detail.as_ref()?.get(key)?.as_str()
    }

    /// The element the event was dispatched at. `None` for events dispatched
    /// at the document itself.
    pub fn target(&self) -> Option<&EventTarget> {
        self.target.as_ref()
    }

    /// Id of the element whose handlers are currently running. `None` while
    /// document listeners run.
    pub fn current_target(&self) -> Option<&str> {
        self.current_target.as_deref()
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn is_immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }

    pub(crate) fn set_target(&mut self, target: Option<EventTarget>) {
        self.target = target;
    }

    pub(crate) fn set_current_target(&mut self, id: Option<String>) {
        self.current_target = id;
    }
}
