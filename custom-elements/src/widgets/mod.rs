//! Built-in custom elements.
//!
//! Each widget is a cheaply clonable handle around shared `State`. The
//! document holds one clone as the mounted instance; the handlers attached
//! to the rendered tree hold others.

pub mod select;

pub use select::SelectWidget;
