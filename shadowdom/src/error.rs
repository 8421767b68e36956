use thiserror::Error;

/// Errors returned by [`Document`](crate::Document) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// No element with this id exists in the rendered tree.
    #[error("no element with id '{0}' in the document")]
    ElementNotFound(String),
    /// The element exists but is not backed by a custom element instance.
    #[error("element '{0}' is not a custom element")]
    NotACustomElement(String),
    /// The document has no mounted root.
    #[error("document has no mounted root")]
    NotMounted,
}
