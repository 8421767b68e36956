//! Application configuration.

use std::path::PathBuf;
use std::str::FromStr;

use simplelog::LevelFilter;
use thiserror::Error;

use crate::paths;

const ENV_LANG_DIR: &str = "CUSTOM_APP_LANG_DIR";
const ENV_LANG: &str = "CUSTOM_APP_LANG";
const ENV_LOG_LEVEL: &str = "CUSTOM_APP_LOG_LEVEL";
const ENV_LOG_FILE: &str = "CUSTOM_APP_LOG_FILE";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid log level '{0}' (expected off, error, warn, info, debug or trace)")]
    InvalidLogLevel(String),
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Settings for one run of the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding `<lang>.json` translation files.
    pub lang_dir: PathBuf,
    /// Language loaded before the first render.
    pub default_lang: String,
    pub log_level: LevelFilter,
    /// Log destination. `None` disables logging.
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            lang_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/lang")),
            default_lang: "en".into(),
            log_level: LevelFilter::Debug,
            log_file: paths::log_file(),
        }
    }
}

impl AppConfig {
    /// Defaults overridden by `CUSTOM_APP_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Defaults overridden by the given variables.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = Self::default();

        for (key, value) in vars {
            let value = value.into();
            match key.as_ref() {
                ENV_LANG_DIR => config.lang_dir = PathBuf::from(non_empty(ENV_LANG_DIR, value)?),
                ENV_LANG => config.default_lang = non_empty(ENV_LANG, value)?,
                ENV_LOG_LEVEL => {
                    config.log_level = LevelFilter::from_str(value.trim())
                        .map_err(|_| ConfigError::InvalidLogLevel(value))?;
                }
                ENV_LOG_FILE => {
                    config.log_file = (!value.is_empty()).then(|| PathBuf::from(value));
                }
                _ => {}
            }
        }

        Ok(config)
    }

    pub fn lang_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.lang_dir = dir.into();
        self
    }

    pub fn default_lang(mut self, lang: impl Into<String>) -> Self {
        self.default_lang = lang.into();
        self
    }

    pub fn log_level(mut self, level: LevelFilter) -> Self {
        self.log_level = level;
        self
    }

    /// Disable logging.
    pub fn without_log_file(mut self) -> Self {
        self.log_file = None;
        self
    }
}

fn non_empty(name: &'static str, value: String) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::Empty(name))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_vars() {
        let config = AppConfig::from_vars(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.default_lang, "en");
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert!(config.lang_dir.ends_with("assets/lang"));
    }

    #[test]
    fn test_vars_override_defaults() {
        let config = AppConfig::from_vars([
            ("CUSTOM_APP_LANG", "nl"),
            ("CUSTOM_APP_LANG_DIR", "/srv/lang"),
            ("CUSTOM_APP_LOG_LEVEL", "warn"),
            ("CUSTOM_APP_LOG_FILE", ""),
            ("UNRELATED", "ignored"),
        ])
        .unwrap();

        assert_eq!(config.default_lang, "nl");
        assert_eq!(config.lang_dir, PathBuf::from("/srv/lang"));
        assert_eq!(config.log_level, LevelFilter::Warn);
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn test_invalid_log_level() {
        assert_eq!(
            AppConfig::from_vars([("CUSTOM_APP_LOG_LEVEL", "loud")]),
            Err(ConfigError::InvalidLogLevel("loud".into()))
        );
    }

    #[test]
    fn test_empty_language() {
        assert_eq!(
            AppConfig::from_vars([("CUSTOM_APP_LANG", " ")]),
            Err(ConfigError::Empty("CUSTOM_APP_LANG"))
        );
    }

    #[test]
    fn test_builder() {
        let config = AppConfig::default()
            .default_lang("nl")
            .log_level(LevelFilter::Info)
            .without_log_file();
        assert_eq!(config.default_lang, "nl");
        assert_eq!(config.log_level, LevelFilter::Info);
        assert!(config.log_file.is_none());
    }
}
