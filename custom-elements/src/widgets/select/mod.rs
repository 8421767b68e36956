//! Select widget - a dropdown with a mirrored native control.

mod events;
pub mod option;
mod render;
mod state;

pub use option::{parse_list, DisplayContent, SelectOption};
pub use state::SelectWidget;

/// Tag name of the select host element.
pub const TAG: &str = "custom-select";
