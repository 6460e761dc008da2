//! Hidden native form control mirroring a widget's value.
//!
//! Checkable widgets keep an `<input>` in sync with their state so that an
//! enclosing form sees a real control. Each sync may dispatch a synthetic
//! `change` event on the input, governed by [`MirrorEvents`].

use std::cell::RefCell;

use crate::document::{DomEvent, EventType};
use crate::dom::node::{NodeData, NodeId};

use super::lifecycle::WidgetCore;

/// When the mirror dispatches `change`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MirrorEvents {
    /// Only when the mirrored value or checked flag actually changed.
    #[default]
    OnChange,
    /// On every sync, including the first.
    Always,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Mirrored {
    value: String,
    checked: Option<bool>,
}

/// The hidden `<input>` owned by a widget.
#[derive(Debug)]
pub struct FormMirror {
    input: NodeId,
    events: MirrorEvents,
    last: RefCell<Option<Mirrored>>,
}

impl FormMirror {
    /// Create the hidden input under the widget root.
    pub fn create(core: &WidgetCore, input_type: &str, name: Option<&str>, events: MirrorEvents) -> Self {
        let mut data = NodeData::new("input")
            .with_attr("type", input_type)
            .with_attr("aria-hidden", "true")
            .with_attr("tabindex", "-1")
            .with_attr("hidden", "");
        if let Some(name) = name {
            data = data.with_attr("name", name);
        }
        let input = core.create_child(core.root(), data);
        Self {
            input,
            events,
            last: RefCell::new(None),
        }
    }

    pub fn input(&self) -> NodeId {
        self.input
    }

    /// Push the current state into the input.
    pub fn sync(&self, core: &WidgetCore, value: &str, checked: Option<bool>, disabled: bool, required: bool) {
        core.set_attr(self.input, "value", value);
        if let Some(checked) = checked {
            core.toggle_attr(self.input, "checked", Some(checked));
        }
        core.toggle_attr(self.input, "disabled", Some(disabled));
        core.toggle_attr(self.input, "required", Some(required));

        let next = Mirrored {
            value: value.to_owned(),
            checked,
        };
        let previous = self.last.replace(Some(next.clone()));
        let fire = match self.events {
            MirrorEvents::Always => true,
            MirrorEvents::OnChange => previous.is_some_and(|prev| prev != next),
        };
        if fire && !core.is_destroyed() {
            core.doc().dispatch(&DomEvent::new(EventType::Change, self.input));
        }
    }
}
