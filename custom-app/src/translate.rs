//! Translation strings: loading per language and key lookup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, PoisonError, RwLock};

use async_trait::async_trait;
use regex::{Captures, Regex};
use serde_json::Value;
use thiserror::Error;

/// Translation strings of one language: a JSON object, possibly nested.
pub type Strings = Value;

static LANGUAGE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid language regex"));

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_.-]+)\s*\}\}").expect("valid placeholder regex"));

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("invalid language identifier '{0}'")]
    InvalidLanguage(String),
    #[error("unknown language '{0}'")]
    UnknownLanguage(String),
    #[error("failed to read strings for '{lang}': {source}")]
    Io {
        lang: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse strings for '{lang}': {source}")]
    Parse {
        lang: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("strings for '{0}' are not a JSON object")]
    NotAnObject(String),
}

/// Source of translation strings.
#[async_trait]
pub trait Loader: Send + Sync {
    async fn load(&self, lang: &str) -> Result<Strings, TranslateError>;
}

/// Loads `<dir>/<lang>.json`.
#[derive(Debug, Clone)]
pub struct DirLoader {
    dir: PathBuf,
}

impl DirLoader {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl Loader for DirLoader {
    async fn load(&self, lang: &str) -> Result<Strings, TranslateError> {
        let path = self.dir.join(format!("{lang}.json"));
        log::debug!("DirLoader::load lang={} path={}", lang, path.display());

        let text = tokio::fs::read_to_string(&path).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                TranslateError::UnknownLanguage(lang.to_string())
            } else {
                TranslateError::Io {
                    lang: lang.to_string(),
                    source,
                }
            }
        })?;

        serde_json::from_str(&text).map_err(|source| TranslateError::Parse {
            lang: lang.to_string(),
            source,
        })
    }
}

/// Strings held in memory, keyed by language.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    languages: HashMap<String, Strings>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, lang: impl Into<String>, strings: Strings) -> Self {
        self.languages.insert(lang.into(), strings);
        self
    }
}

#[async_trait]
impl Loader for MemoryLoader {
    async fn load(&self, lang: &str) -> Result<Strings, TranslateError> {
        self.languages
            .get(lang)
            .cloned()
            .ok_or_else(|| TranslateError::UnknownLanguage(lang.to_string()))
    }
}

#[derive(Debug)]
struct ActiveLanguage {
    lang: String,
    strings: Strings,
}

/// Holds the active language and resolves keys against it.
pub struct Translator {
    loader: Box<dyn Loader>,
    active: RwLock<Option<ActiveLanguage>>,
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("lang", &self.lang())
            .finish()
    }
}

impl Translator {
    pub fn new(loader: impl Loader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            active: RwLock::new(None),
        }
    }

    /// Load `lang` and make it active.
    ///
    /// On failure the previously active language stays in place.
    pub async fn use_lang(&self, lang: &str) -> Result<(), TranslateError> {
        if !LANGUAGE_ID.is_match(lang) {
            return Err(TranslateError::InvalidLanguage(lang.to_string()));
        }

        let strings = self.loader.load(lang).await?;
        if !strings.is_object() {
            return Err(TranslateError::NotAnObject(lang.to_string()));
        }

        *self.active.write().unwrap_or_else(PoisonError::into_inner) = Some(ActiveLanguage {
            lang: lang.to_string(),
            strings,
        });
        log::info!("Translator::use_lang active={}", lang);
        Ok(())
    }

    /// The active language, if one was loaded.
    pub fn lang(&self) -> Option<String> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|active| active.lang.clone())
    }

    /// Resolve a dotted key such as `login_page.sign_in`.
    ///
    /// Missing keys resolve to `[key]`.
    pub fn get(&self, key: &str) -> String {
        let active = self.active.read().unwrap_or_else(PoisonError::into_inner);
        active
            .as_ref()
            .and_then(|active| lookup(&active.strings, key))
            .unwrap_or_else(|| format!("[{key}]"))
    }

    /// Resolve a key and replace `{{ name }}` placeholders from `values`.
    ///
    /// Placeholders without a value are left as they are.
    pub fn get_with(&self, key: &str, values: &[(&str, &str)]) -> String {
        let text = self.get(key);
        PLACEHOLDER
            .replace_all(&text, |caps: &Captures| {
                let name = &caps[1];
                values
                    .iter()
                    .find(|(candidate, _)| *candidate == name)
                    .map(|(_, value)| (*value).to_string())
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

fn lookup(strings: &Strings, key: &str) -> Option<String> {
    let mut node = strings;
    for part in key.split('.') {
        node = node.get(part)?;
    }
    node.as_str().map(str::to_string)
}
