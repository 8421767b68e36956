//! Root custom element of the example app.

use std::sync::{Arc, Mutex, PoisonError};

use custom_elements::prelude::*;
use serde_json::json;

use crate::login_page::{LoginPage, LANGUAGE_CHANGED, LANGUAGE_HAS_CHANGED};
use crate::translate::{TranslateError, Translator};

pub const TAG: &str = "custom-app";

/// Loads strings, hosts the login page and reacts to language changes.
#[derive(Clone)]
pub struct App {
    translator: Arc<Translator>,
    lang_loaded: State<bool>,
    login: LoginPage,
    language_changed: Arc<Mutex<Option<ListenerHandle>>>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("lang_loaded", &self.lang_loaded.get())
            .field("login", &self.login)
            .finish()
    }
}

impl App {
    pub fn new(document: &Document, translator: Arc<Translator>) -> Self {
        let listener = listen_for_language(document, Arc::clone(&translator));
        Self {
            login: LoginPage::new(document, Arc::clone(&translator)),
            translator,
            lang_loaded: State::new(false),
            language_changed: Arc::new(Mutex::new(Some(listener))),
        }
    }

    /// Load the initial language, then allow the page to render.
    pub async fn load(&self, lang: &str) -> Result<(), TranslateError> {
        self.translator.use_lang(lang).await?;
        self.login.set_lang(lang);
        self.lang_loaded.set(true);
        log::info!("App::load lang={}", lang);
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.lang_loaded.get()
    }

    pub fn login(&self) -> &LoginPage {
        &self.login
    }

    fn listen(&self, document: &Document) {
        let mut slot = self
            .language_changed
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some(listen_for_language(document, Arc::clone(&self.translator)));
        }
    }

    /// Stop reacting to language changes.
    pub fn shutdown(&self) {
        let handle = self
            .language_changed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.release();
        }
    }
}

/// Subscribe to the select's change event. Each change loads the language
/// on a tokio task and announces it once the strings are active.
fn listen_for_language(document: &Document, translator: Arc<Translator>) -> ListenerHandle {
    let weak = document.downgrade();
    document.add_listener(LANGUAGE_CHANGED, move |event| {
        let Some(lang) = event.detail_str("value").map(str::to_string) else {
            log::debug!("App: {} without a value", LANGUAGE_CHANGED);
            return;
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::warn!("App: no tokio runtime to load language {}", lang);
            return;
        };

        let translator = Arc::clone(&translator);
        let document = weak.clone();
        runtime.spawn(async move {
            if let Err(e) = translator.use_lang(&lang).await {
                log::warn!("App: failed to switch to {}: {}", lang, e);
                return;
            }
            let Some(document) = document.upgrade() else {
                return;
            };
            let event = Event::new(
                LANGUAGE_HAS_CHANGED,
                EventInit::new().detail(json!({ "value": lang })),
            );
            if let Err(e) = document.dispatch(None, event) {
                log::warn!("App: failed to announce {}: {}", LANGUAGE_HAS_CHANGED, e);
            }
        });
    })
}

impl CustomElement for App {
    fn tag(&self) -> &str {
        TAG
    }

    fn id(&self) -> &str {
        "app"
    }

    fn render(&self) -> Element {
        if !self.lang_loaded.get() {
            return Element::fragment();
        }
        Element::host(Arc::new(self.login.clone()))
    }

    fn connected(&self, document: &Document) {
        self.listen(document);
    }

    fn disconnected(&self, _document: &Document) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use shadowdom::RenderOptions;

    use super::*;
    use crate::translate::MemoryLoader;

    fn translator() -> Arc<Translator> {
        Arc::new(Translator::new(
            MemoryLoader::new()
                .with(
                    "en",
                    json!({ "login_page": { "sign_in": "Sign in", "sign_in_intro": "Continue" } }),
                )
                .with(
                    "nl",
                    json!({ "login_page": { "sign_in": "Inloggen", "sign_in_intro": "Verder" } }),
                ),
        ))
    }

    async fn wait_for(mut condition: impl FnMut() -> bool) {
        for _ in 0..100 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached");
    }

    #[tokio::test]
    async fn test_renders_nothing_until_loaded() {
        let document = Document::new();
        let app = App::new(&document, translator());
        document.mount(Arc::new(app.clone()));

        assert!(!document.is_connected("login"));

        app.load("en").await.unwrap();
        document.update();

        assert!(app.is_loaded());
        assert!(document.is_connected("login"));
        let markup = document.markup(&RenderOptions::visible()).unwrap();
        assert!(markup.contains("Sign in"));
    }

    #[tokio::test]
    async fn test_load_unknown_language_fails() {
        let document = Document::new();
        let app = App::new(&document, translator());

        assert!(app.load("fr").await.is_err());
        assert!(!app.is_loaded());
    }

    #[tokio::test]
    async fn test_picking_a_language_switches_strings() {
        let document = Document::new();
        let app = App::new(&document, translator());
        app.load("en").await.unwrap();
        document.mount(Arc::new(app.clone()));

        document.click("language-select-summary").unwrap();
        document.update();
        document.click("language-select-option-1").unwrap();

        let login = app.login().clone();
        wait_for(|| login.lang() == "nl").await;

        document.update();
        let markup = document.markup(&RenderOptions::visible()).unwrap();
        assert!(markup.contains("Inloggen"));
        assert_eq!(app.login().select().selected().as_deref(), Some("nl"));
    }

    #[tokio::test]
    async fn test_failed_switch_keeps_language() {
        let document = Document::new();
        let app = App::new(&document, translator());
        app.load("en").await.unwrap();
        document.mount(Arc::new(app.clone()));

        let announced = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&announced);
        let _probe = document.add_listener(LANGUAGE_HAS_CHANGED, move |_| {
            *counter.lock().unwrap() += 1;
        });

        app.login().select().commit("fr");
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(*announced.lock().unwrap(), 0);
        assert_eq!(app.login().lang(), "en");
    }

    #[tokio::test]
    async fn test_shutdown_releases_listener() {
        let document = Document::new();
        let app = App::new(&document, translator());
        assert_eq!(document.listener_count(LANGUAGE_CHANGED), 1);

        app.shutdown();

        assert_eq!(document.listener_count(LANGUAGE_CHANGED), 0);
    }

    #[tokio::test]
    async fn test_unmount_releases_listener() {
        let document = Document::new();
        let app = App::new(&document, translator());
        app.load("en").await.unwrap();
        document.mount(Arc::new(app.clone()));

        document.unmount();

        assert_eq!(document.listener_count(LANGUAGE_CHANGED), 0);
        assert_eq!(document.listener_count(LANGUAGE_HAS_CHANGED), 0);
    }

    #[tokio::test]
    async fn test_remount_listens_again() {
        let document = Document::new();
        let app = App::new(&document, translator());
        document.mount(Arc::new(app.clone()));
        document.unmount();

        document.mount(Arc::new(app.clone()));

        assert_eq!(document.listener_count(LANGUAGE_CHANGED), 1);
    }
}
