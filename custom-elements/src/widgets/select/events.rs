//! Select widget interaction handlers and selection commit.

use serde_json::json;
use shadowdom::{Event, EventInit};

use super::state::{SelectInner, SelectWidget};
use crate::state::State;

impl SelectWidget {
    /// Summary row clicked: flip the dropdown.
    ///
    /// Propagation is stopped so the document-level dismiss listener does
    /// not immediately close what was just opened.
    pub fn toggle_open(&self, event: &mut Event) {
        event.stop_propagation();
        let open = self.inner.update(|s| {
            s.open = !s.open;
            s.open
        });
        log::debug!("SelectWidget::toggle_open id={} open={}", self.id, open);
    }

    /// Dropdown row clicked: commit the row's `data-value` and close.
    ///
    /// A click without a target or without a carried value is ignored.
    pub fn pick_item(&self, event: &mut Event) {
        event.stop_propagation();

        let Some(value) = event
            .target()
            .and_then(|target| target.data("value"))
            .map(str::to_string)
        else {
            log::debug!("SelectWidget::pick_item id={} ignored click without value", self.id);
            return;
        };

        self.commit(&value);
    }

    /// Native control changed: commit its current value.
    pub fn native_control_changed(&self, event: &mut Event) {
        let Some(value) = event.target().and_then(|target| target.value.clone()) else {
            log::debug!("SelectWidget::native_control_changed id={} ignored change without value", self.id);
            return;
        };
        self.commit(&value);
    }

    /// Finalize a selection.
    ///
    /// Sets the selected value and closes the dropdown. When an event name is
    /// configured, dispatches a bubbling, composed event of that name from
    /// the host element with detail `{ "value": value }`.
    pub fn commit(&self, value: &str) {
        let event_name = self.inner.update(|s| {
            s.selected = Some(value.to_string());
            s.open = false;
            s.event_name.clone()
        });

        log::debug!(
            "SelectWidget::commit id={} value={} event={:?}",
            self.id,
            value,
            event_name
        );

        let Some(event_name) = event_name else {
            return;
        };
        let Some(document) = self.document.upgrade() else {
            log::debug!("SelectWidget::commit id={} document dropped", self.id);
            return;
        };

        let init = EventInit::new()
            .bubbles(true)
            .composed(true)
            .detail(json!({ "value": value }));
        if let Err(e) = document.dispatch(Some(&self.id), Event::new(event_name, init)) {
            // Not in the tree: nobody can observe the event.
            log::debug!("SelectWidget::commit id={} not dispatched: {}", self.id, e);
        }
    }

    /// Document-level click: close the dropdown.
    pub(super) fn dismiss(id: &str, inner: &State<SelectInner>, event: &mut Event) {
        event.stop_propagation();
        if inner.update_if(|s| std::mem::replace(&mut s.open, false)) {
            log::debug!("SelectWidget::dismiss id={} closed", id);
        }
    }
}
