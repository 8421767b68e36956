//! Custom element trait.

use crate::document::Document;
use crate::element::Element;

/// A component that renders its own shadow tree inside a host element.
///
/// Instances are shared (`Arc<dyn CustomElement>`) between the rendered
/// tree and the document's set of connected hosts, so implementations keep
/// their mutable state behind interior mutability.
///
/// # Example
///
/// ```ignore
/// impl CustomElement for Greeting {
///     fn tag(&self) -> &str { "x-greeting" }
///     fn id(&self) -> &str { &self.id }
///     fn render(&self) -> Element {
///         Element::span().child(Element::text("hello"))
///     }
/// }
/// ```
pub trait CustomElement: Send + Sync {
    /// Tag name of the host element.
    fn tag(&self) -> &str;

    /// Stable id of the host element. Lifecycle tracking is keyed on it.
    fn id(&self) -> &str;

    /// Render the shadow tree. Must be a pure projection of state.
    fn render(&self) -> Element;

    /// Called after the host first appears in the document.
    fn connected(&self, _document: &Document) {}

    /// Called after the host is removed from the document.
    fn disconnected(&self, _document: &Document) {}

    /// Called when the document sets or removes an attribute on the host.
    fn attribute_changed(&self, _name: &str, _value: Option<&str>) {}
}
