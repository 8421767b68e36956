//! Example app built from custom elements: a login page whose language
//! picker switches the translation strings.

pub mod app;
pub mod config;
pub mod login_page;
pub mod paths;
pub mod translate;

pub use app::App;
pub use config::{AppConfig, ConfigError};
pub use translate::{DirLoader, Loader, MemoryLoader, TranslateError, Translator};
