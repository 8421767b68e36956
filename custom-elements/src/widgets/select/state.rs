//! Select widget state and configuration.

use std::sync::{Arc, Mutex, PoisonError};

use shadowdom::{CustomElement, Document, Element, ListenerHandle, WeakDocument};

use super::option::{parse_list, SelectOption};
use super::TAG;
use crate::state::State;

/// Internal state for a select widget.
#[derive(Debug, Clone, Default)]
pub(super) struct SelectInner {
    pub(super) list: Vec<SelectOption>,
    pub(super) placeholder: Option<String>,
    pub(super) selected: Option<String>,
    pub(super) event_name: Option<String>,
    pub(super) open: bool,
}

impl SelectInner {
    /// The selected value, treating an empty string as unset.
    pub(super) fn selected_value(&self) -> Option<&str> {
        self.selected.as_deref().filter(|value| !value.is_empty())
    }

    pub(super) fn selected_option(&self) -> Option<&SelectOption> {
        let selected = self.selected_value()?;
        self.list.iter().find(|option| option.value == selected)
    }
}

/// A dropdown select custom element (`custom-select`).
///
/// Clicking the summary row toggles the dropdown, clicking a row commits
/// its value, and a click anywhere else closes the dropdown. Committing a
/// value dispatches the configured event (if any) from the host element.
///
/// # Example
///
/// ```ignore
/// let language = SelectWidget::new("language-select", &document)
///     .with_list(vec![("en", "English").into(), ("nl", "Nederlands").into()])
///     .with_selected("en")
///     .with_event_name("language-changed");
/// ```
#[derive(Clone)]
pub struct SelectWidget {
    pub(super) id: String,
    pub(super) inner: State<SelectInner>,
    pub(super) document: WeakDocument,
    /// Document-level click listener that closes the dropdown.
    dismiss: Arc<Mutex<Option<ListenerHandle>>>,
}

impl std::fmt::Debug for SelectWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectWidget")
            .field("id", &self.id)
            .field("inner", &self.inner.get())
            .finish()
    }
}

impl SelectWidget {
    /// Create a select and subscribe its dismiss listener on `document`.
    pub fn new(id: impl Into<String>, document: &Document) -> Self {
        let widget = Self {
            id: id.into(),
            inner: State::default(),
            document: document.downgrade(),
            dismiss: Arc::new(Mutex::new(None)),
        };
        widget.acquire_dismiss(document);
        widget
    }

    pub fn with_list(self, list: Vec<SelectOption>) -> Self {
        self.set_list(list);
        self
    }

    pub fn with_placeholder(self, placeholder: impl Into<String>) -> Self {
        self.set_placeholder(Some(placeholder.into()));
        self
    }

    pub fn with_selected(self, selected: impl Into<String>) -> Self {
        self.set_selected(Some(selected.into()));
        self
    }

    pub fn with_event_name(self, event_name: impl Into<String>) -> Self {
        self.set_event_name(Some(event_name.into()));
        self
    }

    pub fn with_open(self, open: bool) -> Self {
        self.set_open(open);
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_open(&self) -> bool {
        self.inner.read(|s| s.open)
    }

    pub fn selected(&self) -> Option<String> {
        self.inner.read(|s| s.selected.clone())
    }

    pub fn placeholder(&self) -> Option<String> {
        self.inner.read(|s| s.placeholder.clone())
    }

    pub fn event_name(&self) -> Option<String> {
        self.inner.read(|s| s.event_name.clone())
    }

    pub fn list(&self) -> Vec<SelectOption> {
        self.inner.read(|s| s.list.clone())
    }

    /// Whether the document-level dismiss listener is registered.
    pub fn is_listening(&self) -> bool {
        self.dismiss
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Replace the option list.
    pub fn set_list(&self, list: Vec<SelectOption>) {
        self.inner.update(|s| s.list = list);
    }

    pub fn set_placeholder(&self, placeholder: Option<String>) {
        self.inner.update_if(|s| {
            let changed = s.placeholder != placeholder;
            s.placeholder = placeholder;
            changed
        });
    }

    /// Overwrite the selected value. Does not notify listeners.
    pub fn set_selected(&self, selected: Option<String>) {
        self.inner.update_if(|s| {
            let changed = s.selected != selected;
            s.selected = selected;
            changed
        });
    }

    /// Set the name of the event dispatched on selection. `None` or an empty
    /// name silences it.
    pub fn set_event_name(&self, event_name: Option<String>) {
        let event_name = event_name.filter(|name| !name.is_empty());
        self.inner.update_if(|s| {
            let changed = s.event_name != event_name;
            s.event_name = event_name;
            changed
        });
    }

    pub fn set_open(&self, open: bool) {
        self.inner.update_if(|s| std::mem::replace(&mut s.open, open) != open);
    }

    // -------------------------------------------------------------------------
    // Dismiss listener
    // -------------------------------------------------------------------------

    fn acquire_dismiss(&self, document: &Document) {
        let mut slot = self.dismiss.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return;
        }
        let inner = self.inner.clone();
        let id = self.id.clone();
        *slot = Some(document.add_listener("click", move |event| {
            Self::dismiss(&id, &inner, event);
        }));
    }

    fn release_dismiss(&self) {
        // Take the handle out first so it drops after the mutex is released.
        let handle = self
            .dismiss
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            log::debug!("SelectWidget::release_dismiss id={} listener={}", self.id, handle.id());
            handle.release();
        }
    }
}

impl CustomElement for SelectWidget {
    fn tag(&self) -> &str {
        TAG
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn render(&self) -> Element {
        self.build()
    }

    fn connected(&self, document: &Document) {
        // Reconnection after a removal needs the listener back.
        self.acquire_dismiss(document);
    }

    fn disconnected(&self, _document: &Document) {
        self.release_dismiss();
    }

    fn attribute_changed(&self, name: &str, value: Option<&str>) {
        match name {
            "placeholder" => self.set_placeholder(value.map(str::to_string)),
            "selected" => self.set_selected(value.map(str::to_string)),
            "event-name" | "eventname" => self.set_event_name(value.map(str::to_string)),
            "open" => self.set_open(value.is_some()),
            "list" => match parse_list(value.unwrap_or("[]")) {
                Ok(list) => self.set_list(list),
                Err(e) => log::warn!("SelectWidget id={} ignored invalid list: {}", self.id, e),
            },
            _ => log::debug!("SelectWidget id={} ignored attribute {}", self.id, name),
        }
    }
}
