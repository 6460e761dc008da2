//! Tabs widget: a tab list whose triggers select one of several panels.
//!
//! Markup under the root: an optional `[data-tabs-list]`, triggers
//! `[data-tabs-trigger data-value=..]` and panels
//! `[data-tabs-content data-value=..]`. Triggers use a roving tabindex.
//!
//! With [`ActivationMode::Automatic`] a trigger is selected as soon as it
//! receives focus; with [`ActivationMode::Manual`] arrows only move focus
//! and Enter/Space (or a click) selects.

use std::cell::RefCell;
use std::rc::Rc;

use crate::document::{Document, EventType};
use crate::dom::node::NodeId;
use crate::error::Result;
use crate::reactive::{ChangeCallback, Subscription, ValueCell};
use crate::widget::{navigate, Component, Detail, Orientation, WidgetCore};

use super::{bind, item_disabled, item_value};

/// When focusing a trigger selects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivationMode {
    /// Focus selects.
    #[default]
    Automatic,
    /// Focus moves; Enter, Space or click selects.
    Manual,
}

/// Tabs configuration.
#[derive(Clone)]
pub struct TabsConfig {
    /// Controlled selected value. When set, `default_value` is ignored.
    pub value: Option<String>,
    pub default_value: Option<String>,
    pub on_value_change: Option<ChangeCallback<String>>,
    pub orientation: Orientation,
    pub activation_mode: ActivationMode,
    /// Wrap arrow navigation at either end.
    pub looping: bool,
}

impl Default for TabsConfig {
    fn default() -> Self {
        Self {
            value: None,
            default_value: None,
            on_value_change: None,
            orientation: Orientation::Horizontal,
            activation_mode: ActivationMode::Automatic,
            looping: true,
        }
    }
}

impl TabsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn on_value_change(mut self, f: impl Fn(&String) + 'static) -> Self {
        self.on_value_change = Some(Rc::new(f));
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_activation_mode(mut self, mode: ActivationMode) -> Self {
        self.activation_mode = mode;
        self
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }
}

#[derive(Debug, Clone)]
struct Tab {
    value: String,
    trigger: NodeId,
    panel: Option<NodeId>,
    disabled: bool,
}

struct Inner {
    /// Render subscription on the state cell.
    subscription: RefCell<Option<Subscription>>,
    core: WidgetCore,
    value: ValueCell<String>,
    orientation: Orientation,
    activation_mode: ActivationMode,
    looping: bool,
    list: Option<NodeId>,
    tabs: Vec<Tab>,
}

impl Inner {
    fn initialize(self: &Rc<Self>) {
        let core = &self.core;
        core.set_data(core.root(), "orientation", self.orientation.as_str());
        match self.list {
            Some(list) => {
                core.set_attr(list, "role", "tablist");
                core.set_attr(list, "aria-orientation", self.orientation.as_str());
            }
            None => core.warn_missing("tab list"),
        }

        for tab in &self.tabs {
            let trigger = tab.trigger;
            let trigger_id = core.ensure_id(trigger, "tabs-trigger");
            core.set_attr(trigger, "role", "tab");
            if tab.disabled {
                core.set_attr(trigger, "aria-disabled", "true");
            }
            match tab.panel {
                Some(panel) => {
                    let panel_id = core.ensure_id(panel, "tabs-content");
                    core.set_attr(trigger, "aria-controls", panel_id);
                    core.set_attr(panel, "role", "tabpanel");
                    core.set_attr(panel, "aria-labelledby", trigger_id);
                    core.set_attr(panel, "tabindex", "0");
                }
                None => core.warn_missing("panel"),
            }

            let value = tab.value.clone();
            core.listen(
                trigger,
                EventType::Click,
                bind(self, move |inner, _| inner.select(&value)),
            );
            let value = tab.value.clone();
            core.listen(
                trigger,
                EventType::Focus,
                bind(self, move |inner, _| {
                    if inner.activation_mode == ActivationMode::Automatic {
                        inner.select(&value);
                    }
                }),
            );
            let value = tab.value.clone();
            core.listen(
                trigger,
                EventType::KeyDown,
                bind(self, move |inner, event| {
                    let Some(key) = event.key() else { return };
                    if key.code.is_activation() {
                        event.prevent_default();
                        inner.select(&value);
                        return;
                    }
                    let enabled: Vec<NodeId> = inner
                        .tabs
                        .iter()
                        .filter(|t| !t.disabled)
                        .map(|t| t.trigger)
                        .collect();
                    let Some(current) = enabled.iter().position(|&t| t == trigger) else {
                        return;
                    };
                    if let Some(next) = navigate(
                        key.code,
                        current,
                        enabled.len(),
                        Some(inner.orientation),
                        inner.looping,
                    ) {
                        event.prevent_default();
                        inner.core.doc().focus(enabled[next]);
                    }
                }),
            );
        }

        let weak = Rc::downgrade(self);
        let subscription = self.value.subscribe(move |new, _old| {
            if let Some(inner) = weak.upgrade() {
                inner.render();
                inner.core.emit("valueChange", Detail::Value(new.clone()));
            }
        });
        *self.subscription.borrow_mut() = Some(subscription);

        self.render();
    }

    fn render(&self) {
        let core = &self.core;
        let selected = self.value.get();
        let any_selected = self.tabs.iter().any(|t| t.value == selected);
        let first_enabled = self.tabs.iter().position(|t| !t.disabled);

        for (index, tab) in self.tabs.iter().enumerate() {
            let active = tab.value == selected;
            let state = if active { "active" } else { "inactive" };
            // Keep one tab stop even when the value matches no trigger.
            let tab_stop = active || (!any_selected && first_enabled == Some(index));
            core.set_attr(tab.trigger, "aria-selected", active.to_string());
            core.set_attr(tab.trigger, "tabindex", if tab_stop { "0" } else { "-1" });
            core.set_data(tab.trigger, "state", state);
            if let Some(panel) = tab.panel {
                core.set_data(panel, "state", state);
                core.toggle_attr(panel, "hidden", Some(!active));
            }
        }
    }

    fn select(&self, value: &str) {
        let Some(tab) = self.tabs.iter().find(|t| t.value == value) else {
            log::warn!("[tabs] no trigger with value `{value}`");
            return;
        };
        if !tab.disabled {
            self.value.request(value.to_owned());
        }
    }
}

/// Tabbed panels.
pub struct Tabs {
    inner: Rc<Inner>,
}

impl Component for Tabs {
    const NAME: &'static str = "tabs";
    type Config = TabsConfig;

    fn new(doc: &Document, root: NodeId, config: TabsConfig) -> Result<Self> {
        let core = WidgetCore::new(doc, root, Self::NAME)?;
        let panels: Vec<(String, NodeId)> = core
            .query_all("[data-tabs-content]")
            .into_iter()
            .enumerate()
            .map(|(index, node)| (item_value(doc, node, index), node))
            .collect();
        let tabs: Vec<Tab> = core
            .query_all("[data-tabs-trigger]")
            .into_iter()
            .enumerate()
            .map(|(index, trigger)| {
                let value = item_value(doc, trigger, index);
                let panel = panels.iter().find(|(v, _)| *v == value).map(|(_, node)| *node);
                Tab {
                    value,
                    trigger,
                    panel,
                    disabled: item_disabled(doc, trigger),
                }
            })
            .collect();

        if tabs.is_empty() {
            core.warn_missing("triggers");
        }
        let fallback = tabs.iter().find(|t| !t.disabled).map(|t| t.value.clone());
        let value = ValueCell::from_props(
            "value",
            config.value,
            config.default_value,
            fallback,
            config.on_value_change,
        )?;

        let inner = Rc::new(Inner {
            subscription: RefCell::new(None),
            list: core.query("[data-tabs-list]"),
            core,
            value,
            orientation: config.orientation,
            activation_mode: config.activation_mode,
            looping: config.looping,
            tabs,
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

impl Tabs {
    pub fn value(&self) -> String {
        self.inner.value.get()
    }

    pub fn set_value(&self, value: impl Into<String>) {
        self.inner.value.set(value.into());
    }

    /// Controlled-update path.
    pub fn sync_value(&self, value: impl Into<String>) {
        self.inner.value.update_controlled(value.into());
    }

    pub fn activation_mode(&self) -> ActivationMode {
        self.inner.activation_mode
    }

    pub fn trigger(&self, value: &str) -> Option<NodeId> {
        self.inner
            .tabs
            .iter()
            .find(|t| t.value == value)
            .map(|t| t.trigger)
    }

    pub fn panel(&self, value: &str) -> Option<NodeId> {
        self.inner
            .tabs
            .iter()
            .find(|t| t.value == value)
            .and_then(|t| t.panel)
    }
}
