//! The document: rendered tree, document-level listeners, and event dispatch.
//!
//! Dispatch order for an event targeted at an element:
//! 1. Handlers on the target
//! 2. Handlers on each ancestor, innermost first (only if the event bubbles)
//! 3. Document listeners
//!
//! A non-composed event stops at the root of the shadow tree it was
//! dispatched in. No lock is held while handlers run, so handlers may
//! dispatch further events or add and remove listeners.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use crate::custom::CustomElement;
use crate::element::{find_element, find_element_mut, Content, Element};
use crate::error::DomError;
use crate::event::{Event, EventTarget, Handler};
use crate::render::{render_markup, RenderOptions};

struct Listener {
    id: u64,
    event_type: String,
    handler: Handler,
}

#[derive(Default)]
struct DocumentInner {
    root: Option<Arc<dyn CustomElement>>,
    tree: Option<Element>,
    /// Hosts present in the last rendered tree, keyed by id.
    connected: BTreeMap<String, Arc<dyn CustomElement>>,
    listeners: Vec<Listener>,
    next_listener_id: u64,
}

/// Shared handle to a document. Cloning is cheap.
#[derive(Clone, Default)]
pub struct Document {
    inner: Arc<RwLock<DocumentInner>>,
}

/// Non-owning handle to a document, for components that live inside it.
#[derive(Clone, Default)]
pub struct WeakDocument {
    inner: Weak<RwLock<DocumentInner>>,
}

impl WeakDocument {
    pub fn upgrade(&self) -> Option<Document> {
        self.inner.upgrade().map(|inner| Document { inner })
    }
}

impl std::fmt::Debug for WeakDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WeakDocument(alive: {})", self.inner.strong_count() > 0)
    }
}

/// Registration of a document-level listener.
///
/// The listener is removed when the handle is released or dropped, so it is
/// removed exactly once.
#[must_use = "dropping a ListenerHandle removes its listener"]
pub struct ListenerHandle {
    id: u64,
    event_type: String,
    document: Weak<RwLock<DocumentInner>>,
}

impl ListenerHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Remove the listener now.
    pub fn release(self) {}
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        let Some(inner) = self.document.upgrade() else {
            return;
        };
        // The removed handler is dropped after the lock is released; it may
        // own other handles into this document.
        let removed: Vec<Listener> = {
            let mut guard = inner.write().unwrap_or_else(PoisonError::into_inner);
            let (removed, kept) = std::mem::take(&mut guard.listeners)
                .into_iter()
                .partition(|listener| listener.id == self.id);
            guard.listeners = kept;
            removed
        };
        drop(removed);
        log::debug!(
            "ListenerHandle::drop removed listener id={} type={}",
            self.id,
            self.event_type
        );
    }
}

impl std::fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("id", &self.id)
            .field("event_type", &self.event_type)
            .finish()
    }
}

struct PathEntry {
    id: String,
    /// Shadow nesting level of the tree this element lives in.
    depth: usize,
    handlers: Vec<Handler>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn downgrade(&self) -> WeakDocument {
        WeakDocument {
            inner: Arc::downgrade(&self.inner),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, DocumentInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DocumentInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    // -------------------------------------------------------------------------
    // Document-level listeners
    // -------------------------------------------------------------------------

    /// Register a document-level listener for `event_type`.
    pub fn add_listener<F>(&self, event_type: impl Into<String>, handler: F) -> ListenerHandle
    where
        F: Fn(&mut Event) + Send + Sync + 'static,
    {
        let event_type = event_type.into();
        let mut inner = self.write();
        let id = inner.next_listener_id;
        inner.next_listener_id += 1;
        inner.listeners.push(Listener {
            id,
            event_type: event_type.clone(),
            handler: Arc::new(handler),
        });
        log::debug!("Document::add_listener id={} type={}", id, event_type);

        ListenerHandle {
            id,
            event_type,
            document: Arc::downgrade(&self.inner),
        }
    }

    /// Number of document-level listeners registered for `event_type`.
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.read()
            .listeners
            .iter()
            .filter(|listener| listener.event_type == event_type)
            .count()
    }

    // -------------------------------------------------------------------------
    // Tree and lifecycle
    // -------------------------------------------------------------------------

    /// Mount `root` as the document's top-level custom element and render it.
    pub fn mount(&self, root: Arc<dyn CustomElement>) {
        log::debug!("Document::mount root={} tag={}", root.id(), root.tag());
        self.write().root = Some(root);
        self.update();
    }

    /// Re-render the tree from the root and run lifecycle callbacks for
    /// hosts that appeared or disappeared.
    pub fn update(&self) {
        let Some(root) = self.read().root.clone() else {
            return;
        };

        // Render outside the lock; components may read the document.
        let tree = Element::host(root);
        let mut hosts = BTreeMap::new();
        collect_hosts(&tree, &mut hosts);

        // The previous tree and host set are dropped outside the lock.
        let (removed, added, _stale) = {
            let mut inner = self.write();
            let removed: Vec<_> = inner
                .connected
                .iter()
                .filter(|(id, _)| !hosts.contains_key(*id))
                .map(|(_, host)| Arc::clone(host))
                .collect();
            let added: Vec<_> = hosts
                .iter()
                .filter(|(id, _)| !inner.connected.contains_key(*id))
                .map(|(_, host)| Arc::clone(host))
                .collect();
            let stale_hosts = std::mem::replace(&mut inner.connected, hosts);
            let stale_tree = inner.tree.replace(tree);
            (removed, added, (stale_hosts, stale_tree))
        };

        for host in removed {
            log::debug!("Document::update disconnected id={}", host.id());
            host.disconnected(self);
        }
        for host in added {
            log::debug!("Document::update connected id={}", host.id());
            host.connected(self);
        }
    }

    /// Remove the root and disconnect every host.
    pub fn unmount(&self) {
        let (removed, _stale) = {
            let mut inner = self.write();
            let stale = (inner.root.take(), inner.tree.take());
            let removed: Vec<_> = std::mem::take(&mut inner.connected).into_values().collect();
            (removed, stale)
        };
        for host in removed {
            log::debug!("Document::unmount disconnected id={}", host.id());
            host.disconnected(self);
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.read().root.is_some()
    }

    /// Whether a custom element with this id is currently connected.
    pub fn is_connected(&self, id: &str) -> bool {
        self.read().connected.contains_key(id)
    }

    /// Snapshot of the rendered tree.
    pub fn tree(&self) -> Option<Element> {
        self.read().tree.clone()
    }

    /// Snapshot of one element of the rendered tree.
    pub fn find(&self, id: &str) -> Option<Element> {
        let inner = self.read();
        inner.tree.as_ref().and_then(|tree| find_element(tree, id)).cloned()
    }

    /// Render the current tree as markup.
    pub fn markup(&self, options: &RenderOptions) -> Option<String> {
        self.read()
            .tree
            .as_ref()
            .map(|tree| render_markup(tree, options))
    }

    /// Forward an attribute change to a connected custom element.
    pub fn set_attribute(&self, id: &str, name: &str, value: Option<&str>) -> Result<(), DomError> {
        let host = {
            let inner = self.read();
            match inner.connected.get(id) {
                Some(host) => Arc::clone(host),
                None if inner.tree.as_ref().and_then(|t| find_element(t, id)).is_some() => {
                    return Err(DomError::NotACustomElement(id.to_string()));
                }
                None => return Err(DomError::ElementNotFound(id.to_string())),
            }
        };
        log::debug!("Document::set_attribute id={} name={} value={:?}", id, name, value);
        host.attribute_changed(name, value);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    /// Dispatch `event` at the element with id `target`, or at the document
    /// itself when `target` is `None`. Returns the event after dispatch.
    pub fn dispatch(&self, target: Option<&str>, mut event: Event) -> Result<Event, DomError> {
        let (path, listeners) = {
            let inner = self.read();
            let mut path = Vec::new();
            if let Some(id) = target {
                let tree = inner.tree.as_ref().ok_or(DomError::NotMounted)?;
                let snapshot = collect_path(tree, id, 0, event.event_type(), &mut path)
                    .ok_or_else(|| DomError::ElementNotFound(id.to_string()))?;
                event.set_target(Some(snapshot));
            }
            let listeners: Vec<Handler> = inner
                .listeners
                .iter()
                .filter(|listener| listener.event_type == event.event_type())
                .map(|listener| Arc::clone(&listener.handler))
                .collect();
            (path, listeners)
        };

        log::debug!(
            "Document::dispatch type={} target={:?} path_len={} listeners={}",
            event.event_type(),
            target,
            path.len(),
            listeners.len()
        );

        let target_depth = path.last().map(|entry| entry.depth).unwrap_or(0);
        for (index, entry) in path.iter().rev().enumerate() {
            if index > 0 && !event.bubbles() {
                return Ok(finish(event));
            }
            if entry.depth < target_depth && !event.composed() {
                return Ok(finish(event));
            }
            event.set_current_target(Some(entry.id.clone()));
            invoke(&entry.handlers, &mut event);
            if event.is_propagation_stopped() {
                return Ok(finish(event));
            }
        }

        let reaches_document =
            target.is_none() || (event.bubbles() && (event.composed() || target_depth == 0));
        if reaches_document {
            event.set_current_target(None);
            invoke(&listeners, &mut event);
        }

        Ok(finish(event))
    }

    /// Click the element with id `id`.
    ///
    /// The event targets the nearest clickable ancestor-or-self, or the
    /// element itself when nothing on its path is clickable.
    pub fn click(&self, id: &str) -> Result<Event, DomError> {
        let target = {
            let inner = self.read();
            let tree = inner.tree.as_ref().ok_or(DomError::NotMounted)?;
            resolve_click_target(tree, id).ok_or_else(|| DomError::ElementNotFound(id.to_string()))?
        };
        self.dispatch(Some(&target), Event::click())
    }

    /// Click somewhere outside every element.
    pub fn click_outside(&self) -> Event {
        match self.dispatch(None, Event::click()) {
            Ok(event) => event,
            // Dispatching at the document never looks up an element.
            Err(_) => Event::click(),
        }
    }

    /// Set the `value` attribute of a form control and dispatch `change` at it.
    pub fn change(&self, id: &str, value: &str) -> Result<Event, DomError> {
        {
            let mut inner = self.write();
            let element = inner
                .tree
                .as_mut()
                .and_then(|tree| find_element_mut(tree, id))
                .ok_or_else(|| DomError::ElementNotFound(id.to_string()))?;
            element.attributes.insert("value".into(), value.to_string());
        }
        self.dispatch(Some(id), Event::change())
    }
}

fn finish(mut event: Event) -> Event {
    event.set_current_target(None);
    event
}

fn invoke(handlers: &[Handler], event: &mut Event) {
    for handler in handlers {
        handler(event);
        if event.is_immediate_propagation_stopped() {
            break;
        }
    }
}

/// Build the root-to-target path. Returns the target snapshot when found.
fn collect_path(
    element: &Element,
    id: &str,
    depth: usize,
    event_type: &str,
    path: &mut Vec<PathEntry>,
) -> Option<EventTarget> {
    path.push(PathEntry {
        id: element.id.clone(),
        depth,
        handlers: element.handlers_for(event_type),
    });

    if element.id == id {
        return Some(EventTarget::from_element(element));
    }

    if let Content::Children(children) = &element.content {
        for child in children {
            if let Some(found) = collect_path(child, id, depth, event_type, path) {
                return Some(found);
            }
        }
    }

    if let Some(shadow) = &element.shadow
        && let Some(found) = collect_path(shadow, id, depth + 1, event_type, path)
    {
        return Some(found);
    }

    path.pop();
    None
}

fn resolve_click_target(root: &Element, id: &str) -> Option<String> {
    fn walk(element: &Element, id: &str, clickable: Option<&str>) -> Option<String> {
        let clickable = if element.clickable {
            Some(element.id.as_str())
        } else {
            clickable
        };

        if element.id == id {
            return Some(clickable.unwrap_or(&element.id).to_string());
        }

        if let Content::Children(children) = &element.content {
            for child in children {
                if let Some(found) = walk(child, id, clickable) {
                    return Some(found);
                }
            }
        }

        // Clickable ancestors outside a shadow tree do not capture clicks
        // made inside it.
        element.shadow.as_deref().and_then(|shadow| walk(shadow, id, None))
    }

    walk(root, id, None)
}

fn collect_hosts(element: &Element, hosts: &mut BTreeMap<String, Arc<dyn CustomElement>>) {
    if let Some(instance) = &element.instance {
        hosts.insert(element.id.clone(), Arc::clone(instance));
    }
    for child in element.child_elements() {
        collect_hosts(child, hosts);
    }
    if let Some(shadow) = &element.shadow {
        collect_hosts(shadow, hosts);
    }
}
