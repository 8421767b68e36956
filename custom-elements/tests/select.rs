use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use custom_elements::prelude::*;
use custom_elements::widgets::select::parse_list;

type Fired = Arc<Mutex<Vec<String>>>;

/// Page hosting one select, which can be removed from the tree.
struct Page {
    select: SelectWidget,
    show_select: Arc<AtomicBool>,
}

impl CustomElement for Page {
    fn tag(&self) -> &str {
        "test-page"
    }

    fn id(&self) -> &str {
        "page"
    }

    fn render(&self) -> Element {
        let mut body = Element::div().id("body");
        if self.show_select.load(Ordering::SeqCst) {
            body = body.child(Element::host(Arc::new(self.select.clone())));
        }
        body
    }
}

struct Fixture {
    document: Document,
    select: SelectWidget,
    show_select: Arc<AtomicBool>,
    fired: Fired,
    _listener: ListenerHandle,
}

impl Fixture {
    fn mount(configure: impl FnOnce(SelectWidget) -> SelectWidget) -> Self {
        let document = Document::new();
        let select = configure(SelectWidget::new("lang", &document));
        let show_select = Arc::new(AtomicBool::new(true));

        let fired = Fired::default();
        let sink = Arc::clone(&fired);
        let listener = document.add_listener("language-changed", move |event| {
            let value = event.detail_str("value").unwrap_or("<none>").to_string();
            sink.lock().unwrap().push(value);
        });

        document.mount(Arc::new(Page {
            select: select.clone(),
            show_select: Arc::clone(&show_select),
        }));

        Self {
            document,
            select,
            show_select,
            fired,
            _listener: listener,
        }
    }

    fn summary_text(&self) -> String {
        self.document.update();
        self.document.find("lang-value").unwrap().text_content()
    }

    fn click(&self, id: &str) {
        self.document.update();
        self.document.click(id).unwrap();
    }

    fn fired(&self) -> Vec<String> {
        self.fired.lock().unwrap().clone()
    }
}

fn languages() -> Vec<SelectOption> {
    vec![
        SelectOption::new("en").text("English"),
        SelectOption::new("nl").text("Nederlands"),
    ]
}

// ============================================================================
// Summary row
// ============================================================================

#[test]
fn test_summary_shows_selected_option() {
    let fixture = Fixture::mount(|s| {
        s.with_list(languages())
            .with_selected("en")
            .with_placeholder("Choose")
    });

    assert_eq!(fixture.summary_text(), "English");
}

#[test]
fn test_summary_shows_placeholder_without_selection() {
    let fixture = Fixture::mount(|s| s.with_placeholder("Choose"));

    assert_eq!(fixture.summary_text(), "Choose");
    let value = fixture.document.find("lang-value").unwrap();
    assert!(value.child_elements()[0].has_class("placeholder"));
}

#[test]
fn test_summary_empty_for_unmatched_selection() {
    let fixture = Fixture::mount(|s| {
        s.with_list(languages())
            .with_selected("de")
            .with_placeholder("Choose")
    });

    assert_eq!(fixture.summary_text(), "");
}

#[test]
fn test_empty_option_text_shows_value() {
    let list = parse_list(r#"[{"value":"en","text":""}]"#).unwrap();
    let fixture = Fixture::mount(|s| s.with_list(list).with_selected("en"));

    assert_eq!(fixture.summary_text(), "en");
    fixture.document.update();
    let row = fixture.document.find("lang-option-0").unwrap();
    assert_eq!(row.text_content(), "en");
}

#[test]
fn test_summary_resolves_markup_then_text_then_value() {
    let flag = Element::new("b").child(Element::text("NL"));
    let list = vec![
        SelectOption::new("en").text("English"),
        SelectOption::new("nl").markup(flag).text("ignored"),
        SelectOption::new("de"),
    ];
    let fixture = Fixture::mount(|s| s.with_list(list.clone()));

    for option in &list {
        fixture.select.set_selected(Some(option.value.clone()));
        assert_eq!(fixture.summary_text(), option.show_content().text_content());
    }

    fixture.select.set_selected(Some("nl".into()));
    fixture.document.update();
    let value = fixture.document.find("lang-value").unwrap();
    assert_eq!(value.child_elements()[0].tag, "b");
}

// ============================================================================
// Open / close
// ============================================================================

#[test]
fn test_summary_click_toggles_once_per_click() {
    let fixture = Fixture::mount(|s| s.with_list(languages()));

    fixture.click("lang-summary");
    assert!(fixture.select.is_open());

    fixture.click("lang-summary");
    assert!(!fixture.select.is_open());

    fixture.click("lang-summary");
    assert!(fixture.select.is_open());
}

#[test]
fn test_click_on_summary_content_toggles() {
    let fixture = Fixture::mount(|s| s.with_list(languages()).with_placeholder("Choose"));

    // The wrapper is not clickable; the click is retargeted to the summary row.
    fixture.click("lang-value");

    assert!(fixture.select.is_open());
}

#[test]
fn test_dropdown_visibility_follows_open_state() {
    let fixture = Fixture::mount(|s| s.with_list(languages()));

    fixture.document.update();
    assert!(fixture.document.find("lang-list").unwrap().hidden);

    fixture.click("lang-summary");
    fixture.document.update();
    let list = fixture.document.find("lang-list").unwrap();
    assert!(!list.hidden);
    assert_eq!(list.child_elements().len(), 2);
}

#[test]
fn test_outside_click_closes_without_changing_selection() {
    let fixture = Fixture::mount(|s| s.with_list(languages()).with_selected("en"));

    fixture.click("lang-summary");
    assert!(fixture.select.is_open());

    fixture.document.click_outside();

    assert!(!fixture.select.is_open());
    assert_eq!(fixture.select.selected().as_deref(), Some("en"));
    assert!(fixture.fired().is_empty());
}

#[test]
fn test_click_elsewhere_in_document_closes() {
    let fixture = Fixture::mount(|s| s.with_list(languages()).with_open(true));

    fixture.click("body");

    assert!(!fixture.select.is_open());
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_language_scenario() {
    let fixture = Fixture::mount(|s| {
        s.with_list(languages())
            .with_selected("en")
            .with_placeholder("Choose")
            .with_event_name("language-changed")
    });
    assert_eq!(fixture.summary_text(), "English");

    fixture.click("lang-summary");
    fixture.click("lang-option-1");

    assert_eq!(fixture.select.selected().as_deref(), Some("nl"));
    assert!(!fixture.select.is_open());
    assert_eq!(fixture.fired(), vec!["nl"]);
    assert_eq!(fixture.summary_text(), "Nederlands");
}

#[test]
fn test_pick_without_event_name_is_silent() {
    let fixture = Fixture::mount(|s| s.with_list(languages()));

    fixture.click("lang-summary");
    fixture.click("lang-option-0");

    assert_eq!(fixture.select.selected().as_deref(), Some("en"));
    assert!(!fixture.select.is_open());
    assert!(fixture.fired().is_empty());
}

#[test]
fn test_empty_event_name_is_silent() {
    let fixture = Fixture::mount(|s| s.with_list(languages()));
    let dispatched = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&dispatched);
    let _any = fixture.document.add_listener("", move |_| {
        *counter.lock().unwrap() += 1;
    });

    fixture
        .document
        .set_attribute("lang", "event-name", Some(""))
        .unwrap();
    fixture.click("lang-summary");
    fixture.click("lang-option-1");

    assert_eq!(fixture.select.event_name(), None);
    assert_eq!(fixture.select.selected().as_deref(), Some("nl"));
    assert!(!fixture.select.is_open());
    assert_eq!(*dispatched.lock().unwrap(), 0);
}

#[test]
fn test_widget_clicks_do_not_reach_document() {
    let fixture = Fixture::mount(|s| s.with_list(languages()).with_event_name("language-changed"));
    let clicks = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&clicks);
    let _probe = fixture.document.add_listener("click", move |_| {
        *counter.lock().unwrap() += 1;
    });

    fixture.click("lang-summary");
    fixture.click("lang-option-1");

    assert_eq!(*clicks.lock().unwrap(), 0);
    assert_eq!(fixture.fired(), vec!["nl"]);
}

#[test]
fn test_selected_row_is_marked() {
    let fixture = Fixture::mount(|s| s.with_list(languages()).with_selected("nl"));

    fixture.document.update();
    let en = fixture.document.find("lang-option-0").unwrap();
    let nl = fixture.document.find("lang-option-1").unwrap();

    assert!(!en.has_class("option-item_selected"));
    assert!(nl.has_class("option-item_selected"));
    assert_eq!(nl.attr_value("data-value"), Some("nl"));
}

#[test]
fn test_pick_without_target_is_noop() {
    let fixture = Fixture::mount(|s| s.with_list(languages()).with_open(true));

    let mut event = Event::click();
    fixture.select.pick_item(&mut event);

    assert!(event.is_propagation_stopped());
    assert!(fixture.select.is_open());
    assert_eq!(fixture.select.selected(), None);
}

#[test]
fn test_commit_closes_even_without_event_name() {
    let fixture = Fixture::mount(|s| s.with_list(languages()).with_open(true));

    fixture.select.commit("nl");

    assert!(!fixture.select.is_open());
    assert_eq!(fixture.select.selected().as_deref(), Some("nl"));
}

#[test]
fn test_commit_reports_unknown_value() {
    let fixture = Fixture::mount(|s| s.with_list(languages()).with_event_name("language-changed"));

    fixture.select.commit("fr");

    assert_eq!(fixture.fired(), vec!["fr"]);
    assert_eq!(fixture.summary_text(), "");
}

// ============================================================================
// Native control
// ============================================================================

#[test]
fn test_native_control_mirrors_selection() {
    let fixture = Fixture::mount(|s| s.with_list(languages()).with_selected("nl"));

    fixture.document.update();
    let native = fixture.document.find("lang-native").unwrap();

    assert!(native.hidden);
    assert_eq!(native.attr_value("value"), Some("nl"));
    let options = native.child_elements();
    assert_eq!(options.len(), 2);
    assert_eq!(options[0].attr_value("selected"), None);
    assert_eq!(options[1].attr_value("selected"), Some(""));
    assert_eq!(options[1].text_content(), "Nederlands");
}

#[test]
fn test_native_change_commits() {
    let fixture = Fixture::mount(|s| {
        s.with_list(languages())
            .with_selected("en")
            .with_event_name("language-changed")
    });

    fixture.document.update();
    fixture.document.change("lang-native", "nl").unwrap();

    assert_eq!(fixture.select.selected().as_deref(), Some("nl"));
    assert_eq!(fixture.fired(), vec!["nl"]);
}

// ============================================================================
// Attributes
// ============================================================================

#[test]
fn test_attributes_configure_widget() {
    let fixture = Fixture::mount(|s| s);
    let document = &fixture.document;

    document
        .set_attribute("lang", "list", Some(r#"[{"value":"en","text":"English"}]"#))
        .unwrap();
    document.set_attribute("lang", "selected", Some("en")).unwrap();
    document.set_attribute("lang", "event-name", Some("language-changed")).unwrap();
    document.set_attribute("lang", "open", Some("")).unwrap();

    assert_eq!(fixture.select.list().len(), 1);
    assert_eq!(fixture.select.event_name().as_deref(), Some("language-changed"));
    assert!(fixture.select.is_open());
    assert_eq!(fixture.summary_text(), "English");

    document.set_attribute("lang", "open", None).unwrap();
    assert!(!fixture.select.is_open());
}

#[test]
fn test_invalid_list_attribute_is_ignored() {
    let fixture = Fixture::mount(|s| s.with_list(languages()));

    fixture
        .document
        .set_attribute("lang", "list", Some("not json"))
        .unwrap();

    assert_eq!(fixture.select.list().len(), 2);
}

// ============================================================================
// Teardown
// ============================================================================

#[test]
fn test_teardown_releases_dismiss_listener() {
    let fixture = Fixture::mount(|s| s.with_list(languages()));
    assert_eq!(fixture.document.listener_count("click"), 1);

    fixture.show_select.store(false, Ordering::SeqCst);
    fixture.document.update();

    assert_eq!(fixture.document.listener_count("click"), 0);
    assert!(!fixture.select.is_listening());

    fixture.select.set_open(true);
    fixture.document.click_outside();
    assert!(fixture.select.is_open());
}

#[test]
fn test_reconnect_acquires_listener_again() {
    let fixture = Fixture::mount(|s| s.with_list(languages()));

    fixture.show_select.store(false, Ordering::SeqCst);
    fixture.document.update();
    fixture.show_select.store(true, Ordering::SeqCst);
    fixture.document.update();

    assert_eq!(fixture.document.listener_count("click"), 1);
    assert!(fixture.select.is_listening());
}

#[test]
fn test_unmount_releases_listener() {
    let fixture = Fixture::mount(|s| s.with_list(languages()));

    fixture.document.unmount();

    assert_eq!(fixture.document.listener_count("click"), 0);
}

#[test]
fn test_dropped_widgets_do_not_leak_listeners() {
    let document = Document::new();
    for i in 0..3 {
        let widget = SelectWidget::new(format!("select-{i}"), &document);
        assert!(widget.is_listening());
    }

    assert_eq!(document.listener_count("click"), 0);
}
