//! Select widget rendering.

use shadowdom::Element;

use super::state::{SelectInner, SelectWidget};

impl SelectWidget {
    /// Build the shadow tree: the interactive dropdown followed by the hidden
    /// native control.
    pub(super) fn build(&self) -> Element {
        let current = self.inner.get();

        log::debug!(
            "SelectWidget::build id={} open={} options_count={}",
            self.id,
            current.open,
            current.list.len()
        );

        Element::fragment()
            .child(self.build_dropdown(&current))
            .child(self.build_native(&current))
    }

    fn build_dropdown(&self, current: &SelectInner) -> Element {
        let arrow = if current.open { "▲" } else { "▼" };

        let toggle = self.clone();
        let summary = Element::div()
            .id(format!("{}-summary", self.id))
            .class("selected")
            .clickable(true)
            .on("click", move |event| toggle.toggle_open(event))
            .child(
                Element::div()
                    .id(format!("{}-value", self.id))
                    .class("placeholder-wrapper")
                    .child(summary_content(current)),
            )
            .child(Element::new("i").class("arrow-down").child(Element::text(arrow)));

        let selected = current.selected_value();
        let rows = current
            .list
            .iter()
            .enumerate()
            .map(|(index, option)| {
                let picker = self.clone();
                Element::div()
                    .id(format!("{}-option-{}", self.id, index))
                    .class("option-item")
                    .class_if(selected == Some(option.value.as_str()), "option-item_selected")
                    .data("value", &option.value)
                    .clickable(true)
                    .on("click", move |event| picker.pick_item(event))
                    .child(option.show_content())
            })
            .collect();

        Element::div()
            .class("select")
            .class_if(current.open, "open")
            .child(summary)
            .child(
                Element::div()
                    .id(format!("{}-list", self.id))
                    .class("option-list")
                    .hidden(!current.open)
                    .children(rows),
            )
    }

    fn build_native(&self, current: &SelectInner) -> Element {
        let selected = current.selected_value();
        let options = current
            .list
            .iter()
            .map(|option| {
                Element::new("option")
                    .attr("value", &option.value)
                    .attr_if(selected == Some(option.value.as_str()), "selected")
                    .child(Element::text(option.label()))
            })
            .collect();

        let changer = self.clone();
        let mut native = Element::new("select")
            .id(format!("{}-native", self.id))
            .hidden(true)
            .on("change", move |event| changer.native_control_changed(event))
            .children(options);
        if let Some(option) = current.selected_option() {
            native = native.attr("value", &option.value);
        }
        native
    }
}

/// What the summary row shows: the matched option, nothing for an unmatched
/// value, or the placeholder when no value is set.
fn summary_content(current: &SelectInner) -> Element {
    if current.selected_value().is_none() {
        let placeholder = current.placeholder.clone().unwrap_or_default();
        return Element::span()
            .class("placeholder")
            .child(Element::text(placeholder));
    }

    match current.selected_option() {
        Some(option) => option.show_content(),
        None => Element::text(""),
    }
}
