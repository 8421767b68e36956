//! Options displayed by a select.

use serde::Deserialize;
use shadowdom::Element;

/// How an option is displayed.
///
/// Resolution order is markup, then text, then the option's raw value.
#[derive(Debug, Clone, Default)]
pub enum DisplayContent {
    /// Caller-supplied element tree.
    Markup(Element),
    /// Plain text.
    Text(String),
    /// Fall back to the option's value.
    #[default]
    None,
}

/// One selectable entry.
///
/// # Example
///
/// ```ignore
/// let options = vec![
///     SelectOption::new("en").text("English"),
///     SelectOption::new("nl").text("Nederlands"),
/// ];
/// ```
#[derive(Debug, Clone)]
pub struct SelectOption {
    /// Stable identifier, unique within a list.
    pub value: String,
    pub content: DisplayContent,
}

impl SelectOption {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            content: DisplayContent::None,
        }
    }

    /// Display plain text. Markup set earlier takes precedence and is kept.
    /// Empty text counts as no text, so the value is shown instead.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        if matches!(self.content, DisplayContent::Markup(_)) {
            return self;
        }
        let text = text.into();
        self.content = if text.is_empty() {
            DisplayContent::None
        } else {
            DisplayContent::Text(text)
        };
        self
    }

    /// Display an element tree.
    pub fn markup(mut self, markup: Element) -> Self {
        self.content = DisplayContent::Markup(markup);
        self
    }

    /// Resolve the element shown for this option.
    pub fn show_content(&self) -> Element {
        match &self.content {
            DisplayContent::Markup(markup) => markup.clone(),
            DisplayContent::Text(text) => Element::text(text),
            DisplayContent::None => Element::text(&self.value),
        }
    }

    /// Plain-text label, as shown by the native control.
    pub fn label(&self) -> String {
        match &self.content {
            DisplayContent::Markup(markup) => markup.text_content(),
            DisplayContent::Text(text) => text.clone(),
            DisplayContent::None => self.value.clone(),
        }
    }
}

impl<V, L> From<(V, L)> for SelectOption
where
    V: Into<String>,
    L: Into<String>,
{
    fn from((value, label): (V, L)) -> Self {
        Self::new(value).text(label)
    }
}

/// Attribute form of an option: `{ "value": "en", "text": "English" }`.
#[derive(Debug, Deserialize)]
struct OptionAttr {
    value: String,
    #[serde(default)]
    text: Option<String>,
}

/// Parse the JSON array accepted by the `list` attribute.
pub fn parse_list(json: &str) -> Result<Vec<SelectOption>, serde_json::Error> {
    let attrs: Vec<OptionAttr> = serde_json::from_str(json)?;
    Ok(attrs
        .into_iter()
        .map(|attr| match attr.text {
            Some(text) => SelectOption::new(attr.value).text(text),
            None => SelectOption::new(attr.value),
        })
        .collect())
}
