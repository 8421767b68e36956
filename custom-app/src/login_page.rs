//! Login page: translated heading and a language picker.

use std::sync::{Arc, Mutex, PoisonError};

use custom_elements::prelude::*;

use crate::translate::Translator;

pub const TAG: &str = "login-page";
pub const LANGUAGE_SELECT_ID: &str = "language-select";

/// Dispatched by the select when the user picks a language.
pub const LANGUAGE_CHANGED: &str = "language-changed";
/// Dispatched at the document once the new strings are active.
pub const LANGUAGE_HAS_CHANGED: &str = "language-has-changed";

/// Languages offered by the picker.
pub fn languages() -> Vec<SelectOption> {
    vec![
        SelectOption::new("en").text("English - British pound (£)"),
        SelectOption::new("nl").text("Nederlands - Euro (€)"),
    ]
}

#[derive(Clone)]
pub struct LoginPage {
    id: String,
    translator: Arc<Translator>,
    lang: State<String>,
    select: SelectWidget,
    language_listener: Arc<Mutex<Option<ListenerHandle>>>,
}

impl std::fmt::Debug for LoginPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginPage")
            .field("id", &self.id)
            .field("lang", &self.lang.get())
            .finish()
    }
}

impl LoginPage {
    pub fn new(document: &Document, translator: Arc<Translator>) -> Self {
        let lang = translator.lang().unwrap_or_else(|| "en".to_string());
        let select = SelectWidget::new(LANGUAGE_SELECT_ID, document)
            .with_list(languages())
            .with_selected(lang.clone())
            .with_event_name(LANGUAGE_CHANGED);

        let page = Self {
            id: "login".into(),
            translator,
            lang: State::new(lang),
            select,
            language_listener: Arc::new(Mutex::new(None)),
        };
        page.listen(document);
        page
    }

    pub fn lang(&self) -> String {
        self.lang.get()
    }

    pub fn select(&self) -> &SelectWidget {
        &self.select
    }

    fn listen(&self, document: &Document) {
        let mut slot = self
            .language_listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return;
        }

        let page = self.clone();
        *slot = Some(document.add_listener(LANGUAGE_HAS_CHANGED, move |event| {
            let Some(value) = event.detail_str("value") else {
                log::debug!("LoginPage: {} without a value", LANGUAGE_HAS_CHANGED);
                return;
            };
            page.set_lang(value);
        }));
    }

    /// Show `lang` as the current language.
    pub fn set_lang(&self, lang: &str) {
        log::debug!("LoginPage::set_lang {}", lang);
        self.lang.set(lang.to_string());
        self.select.set_selected(Some(lang.to_string()));
    }

    /// Label naming the active language, e.g. "Current language: English".
    fn current_language(&self) -> String {
        let lang = self.lang.get();
        let name = languages()
            .into_iter()
            .find(|option| option.value == lang)
            .map(|option| option.label())
            .unwrap_or(lang);
        self.translator
            .get_with("login_page.current_language", &[("language", &name)])
    }

    fn stop_listening(&self) {
        let handle = self
            .language_listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.release();
        }
    }
}

impl CustomElement for LoginPage {
    fn tag(&self) -> &str {
        TAG
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn render(&self) -> Element {
        Element::new("article")
            .child(
                Element::new("h1")
                    .class("large")
                    .child(Element::text(self.translator.get("login_page.sign_in"))),
            )
            .child(
                Element::new("p").child(Element::text(
                    self.translator.get("login_page.sign_in_intro"),
                )),
            )
            .child(
                Element::new("label")
                    .attr("for", LANGUAGE_SELECT_ID)
                    .child(Element::text(self.current_language())),
            )
            .child(Element::host(Arc::new(self.select.clone())))
    }

    fn connected(&self, document: &Document) {
        self.listen(document);
    }

    fn disconnected(&self, _document: &Document) {
        self.stop_listening();
    }
}
