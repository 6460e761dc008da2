//! Accordion widget: a stack of items, each with a trigger and a content
//! region.
//!
//! Markup under the root:
//!
//! ```text
//! [data-accordion-item data-value=..]
//!   [data-accordion-trigger]
//!   [data-accordion-content]
//! ```
//!
//! In [`AccordionMode::Single`] at most one item is open; in
//! [`AccordionMode::Multiple`] any number. Arrow keys (along the configured
//! orientation), Home and End move focus between enabled triggers without
//! opening anything.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::document::{Document, EventType};
use crate::dom::node::NodeId;
use crate::error::Result;
use crate::reactive::{ChangeCallback, Subscription, ValueCell};
use crate::widget::{navigate, Component, Detail, Orientation, WidgetCore};

use super::{bind, item_disabled, item_value, open_state};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// How many items may be open at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccordionMode {
    #[default]
    Single,
    Multiple,
}

/// Accordion configuration.
///
/// Values are item `data-value`s. In single mode only the first entry of a
/// supplied list is used.
#[derive(Clone)]
pub struct AccordionConfig {
    pub mode: AccordionMode,
    /// Controlled open items. When set, `default_value` is ignored.
    pub value: Option<Vec<String>>,
    pub default_value: Option<Vec<String>>,
    pub on_value_change: Option<ChangeCallback<Vec<String>>>,
    /// Single mode only: whether the open item can be closed again.
    pub collapsible: bool,
    pub disabled: bool,
    pub orientation: Orientation,
}

impl Default for AccordionConfig {
    fn default() -> Self {
        Self {
            mode: AccordionMode::Single,
            value: None,
            default_value: None,
            on_value_change: None,
            collapsible: true,
            disabled: false,
            orientation: Orientation::Vertical,
        }
    }
}

fn owned_values<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Vec<String> {
    values.into_iter().map(Into::into).collect()
}

impl AccordionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: AccordionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_value<S: Into<String>>(mut self, value: impl IntoIterator<Item = S>) -> Self {
        self.value = Some(owned_values(value));
        self
    }

    pub fn with_default_value<S: Into<String>>(mut self, value: impl IntoIterator<Item = S>) -> Self {
        self.default_value = Some(owned_values(value));
        self
    }

    pub fn on_value_change(mut self, f: impl Fn(&Vec<String>) + 'static) -> Self {
        self.on_value_change = Some(Rc::new(f));
        self
    }

    pub fn with_collapsible(mut self, collapsible: bool) -> Self {
        self.collapsible = collapsible;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }
}

// ---------------------------------------------------------------------------
// Accordion
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Item {
    value: String,
    node: NodeId,
    trigger: Option<NodeId>,
    content: Option<NodeId>,
    /// Marked disabled in the host markup.
    disabled: bool,
}

struct Inner {
    /// Render subscription on the state cell.
    subscription: RefCell<Option<Subscription>>,
    core: WidgetCore,
    value: ValueCell<Vec<String>>,
    mode: AccordionMode,
    collapsible: bool,
    disabled: Cell<bool>,
    orientation: Orientation,
    items: Vec<Item>,
}

impl Inner {
    fn initialize(self: &Rc<Self>) {
        let core = &self.core;
        let root = core.root();
        core.set_data(root, "orientation", self.orientation.as_str());
        if self.items.is_empty() {
            core.warn_missing("items");
        }

        for item in &self.items {
            let (Some(trigger), content) = (item.trigger, item.content) else {
                core.warn_missing("trigger");
                continue;
            };
            let trigger_id = core.ensure_id(trigger, "accordion-trigger");
            if let Some(content) = content {
                let content_id = core.ensure_id(content, "accordion-content");
                core.set_attr(trigger, "aria-controls", content_id);
                core.set_attr(content, "role", "region");
                core.set_attr(content, "aria-labelledby", trigger_id);
            }

            let value = item.value.clone();
            core.listen(
                trigger,
                EventType::Click,
                bind(self, move |inner, _| inner.user_toggle(&value)),
            );
            core.listen(
                trigger,
                EventType::KeyDown,
                bind(self, move |inner, event| {
                    let Some(key) = event.key() else { return };
                    let enabled = inner.enabled_triggers();
                    let Some(current) = enabled.iter().position(|&t| t == trigger) else {
                        return;
                    };
                    if let Some(next) =
                        navigate(key.code, current, enabled.len(), Some(inner.orientation), true)
                    {
                        event.prevent_default();
                        inner.core.doc().focus(enabled[next]);
                    }
                }),
            );
        }

        let weak = Rc::downgrade(self);
        let subscription = self.value.subscribe(move |new, old| {
            if let Some(inner) = weak.upgrade() {
                inner.render();
                inner.announce(new, old);
            }
        });
        *self.subscription.borrow_mut() = Some(subscription);

        self.render();
    }

    fn is_item_disabled(&self, item: &Item) -> bool {
        self.disabled.get() || item.disabled
    }

    fn enabled_triggers(&self) -> Vec<NodeId> {
        self.items
            .iter()
            .filter(|item| !self.is_item_disabled(item))
            .filter_map(|item| item.trigger)
            .collect()
    }

    fn render(&self) {
        let core = &self.core;
        let open_values = self.value.get();
        for item in &self.items {
            let open = open_values.contains(&item.value);
            let disabled = self.is_item_disabled(item);
            let state = open_state(open);
            core.set_data(item.node, "state", state);
            core.toggle_attr(item.node, "data-disabled", Some(disabled));

            if let Some(trigger) = item.trigger {
                core.set_attr(trigger, "aria-expanded", open.to_string());
                core.set_data(trigger, "state", state);
                // The open item of a non-collapsible single accordion can't close.
                let locked = open && self.mode == AccordionMode::Single && !self.collapsible;
                if disabled || locked {
                    core.set_attr(trigger, "aria-disabled", "true");
                } else {
                    core.remove_attr(trigger, "aria-disabled");
                }
                core.toggle_attr(trigger, "data-disabled", Some(disabled));
            }
            if let Some(content) = item.content {
                core.set_data(content, "state", state);
                core.toggle_attr(content, "hidden", Some(!open));
            }
        }
    }

    /// Emit `valueChange` plus `itemOpen`/`itemClose` for each transition.
    fn announce(&self, new: &[String], old: &[String]) {
        let detail = match self.mode {
            AccordionMode::Single => Detail::Value(new.first().cloned().unwrap_or_default()),
            AccordionMode::Multiple => Detail::Values(new.to_vec()),
        };
        self.core.emit("valueChange", detail);
        for value in old.iter().filter(|v| !new.contains(v)) {
            self.core.emit("itemClose", Detail::Value(value.clone()));
        }
        for value in new.iter().filter(|v| !old.contains(v)) {
            self.core.emit("itemOpen", Detail::Value(value.clone()));
        }
    }

    fn toggled(&self, value: &str) -> Option<Vec<String>> {
        let current = self.value.get();
        let is_open = current.iter().any(|v| v == value);
        match self.mode {
            AccordionMode::Single if is_open && !self.collapsible => None,
            AccordionMode::Single if is_open => Some(Vec::new()),
            AccordionMode::Single => Some(vec![value.to_owned()]),
            AccordionMode::Multiple if is_open => {
                Some(current.into_iter().filter(|v| v != value).collect())
            }
            AccordionMode::Multiple => {
                let mut next = current;
                next.push(value.to_owned());
                Some(next)
            }
        }
    }

    fn user_toggle(&self, value: &str) {
        let Some(item) = self.items.iter().find(|item| item.value == value) else {
            return;
        };
        if self.is_item_disabled(item) {
            return;
        }
        if let Some(next) = self.toggled(value) {
            self.value.request(next);
        }
    }

    fn normalize(&self, values: Vec<String>) -> Vec<String> {
        match self.mode {
            AccordionMode::Single => values.into_iter().take(1).collect(),
            AccordionMode::Multiple => values,
        }
    }
}

/// Vertically stacked set of collapsible sections.
pub struct Accordion {
    inner: Rc<Inner>,
}

impl Component for Accordion {
    const NAME: &'static str = "accordion";
    type Config = AccordionConfig;

    fn new(doc: &Document, root: NodeId, config: AccordionConfig) -> Result<Self> {
        let core = WidgetCore::new(doc, root, Self::NAME)?;
        let single = config.mode == AccordionMode::Single;
        let trim = |values: Option<Vec<String>>| {
            values.map(|v| if single { v.into_iter().take(1).collect() } else { v })
        };
        let value = ValueCell::from_props(
            "value",
            trim(config.value),
            trim(config.default_value),
            Some(Vec::new()),
            config.on_value_change,
        )?;

        let items = core
            .query_all("[data-accordion-item]")
            .into_iter()
            .enumerate()
            .map(|(index, node)| Item {
                value: item_value(doc, node, index),
                node,
                trigger: core.query_in(node, "[data-accordion-trigger]"),
                content: core.query_in(node, "[data-accordion-content]"),
                disabled: item_disabled(doc, node),
            })
            .collect();

        let inner = Rc::new(Inner {
            subscription: RefCell::new(None),
            core,
            value,
            mode: config.mode,
            collapsible: config.collapsible,
            disabled: Cell::new(config.disabled),
            orientation: config.orientation,
            items,
        });
        inner.initialize();
        inner.core.mark_live();
        Ok(Self { inner })
    }

    fn core(&self) -> &WidgetCore {
        &self.inner.core
    }

    fn cleanup(&self) {
        if let Some(subscription) = self.inner.subscription.borrow_mut().take() {
            subscription.unsubscribe();
        }
        self.inner.value.dispose();
    }
}

impl Accordion {
    /// Open item values, in the order they were opened.
    pub fn value(&self) -> Vec<String> {
        self.inner.value.get()
    }

    pub fn set_value<S: Into<String>>(&self, value: impl IntoIterator<Item = S>) {
        let value = self.inner.normalize(owned_values(value));
        self.inner.value.set(value);
    }

    /// Controlled-update path.
    pub fn sync_value<S: Into<String>>(&self, value: impl IntoIterator<Item = S>) {
        let value = self.inner.normalize(owned_values(value));
        self.inner.value.update_controlled(value);
    }

    pub fn is_item_open(&self, value: &str) -> bool {
        self.inner.value.with(|open| open.iter().any(|v| v == value))
    }

    pub fn open_item(&self, value: &str) {
        if !self.is_item_open(value) {
            if let Some(next) = self.inner.toggled(value) {
                self.inner.value.set(next);
            }
        }
    }

    pub fn close_item(&self, value: &str) {
        if self.is_item_open(value) {
            if let Some(next) = self.inner.toggled(value) {
                self.inner.value.set(next);
            }
        }
    }

    /// Toggle an item as if its trigger was clicked.
    pub fn toggle_item(&self, value: &str) {
        self.inner.user_toggle(value);
    }

    /// Item values in document order.
    pub fn items(&self) -> Vec<String> {
        self.inner.items.iter().map(|item| item.value.clone()).collect()
    }

    pub fn trigger(&self, value: &str) -> Option<NodeId> {
        self.inner
            .items
            .iter()
            .find(|item| item.value == value)
            .and_then(|item| item.trigger)
    }

    pub fn set_disabled(&self, disabled: bool) {
        if self.inner.disabled.replace(disabled) != disabled && !self.is_destroyed() {
            self.inner.render();
        }
    }
}
