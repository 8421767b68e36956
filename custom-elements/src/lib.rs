pub mod runtime;
pub mod state;
pub mod wakeup;
pub mod widgets;

pub use runtime::Runtime;
pub use state::State;

pub mod prelude {
    pub use crate::runtime::{Command, Runtime};
    pub use crate::state::State;
    pub use crate::widgets::select::{DisplayContent, SelectOption, SelectWidget};

    pub use shadowdom::{CustomElement, Document, Element, Event, EventInit, ListenerHandle};
}
