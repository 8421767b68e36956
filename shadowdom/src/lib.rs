pub mod custom;
pub mod document;
pub mod element;
pub mod error;
pub mod event;
pub mod render;

pub use custom::CustomElement;
pub use document::{Document, ListenerHandle, WeakDocument};
pub use element::{find_element, Content, Element};
pub use error::DomError;
pub use event::{Event, EventInit, EventTarget, Handler};
pub use render::{render_markup, RenderOptions};
