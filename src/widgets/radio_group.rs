//! Radio group widget: exactly one selected item out of several.
//!
//! Markup under the root: items `[data-radio-group-item data-value=..]`,
//! each optionally containing a `[data-radio-group-indicator]`.
//!
//! Arrow keys move focus to the next enabled item *and* select it,
//! wrapping at either end. Space selects the focused item. A hidden input
//! carries the selected value for forms.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::document::{Document, EventType};
use crate::dom::node::NodeId;
use crate::error::Result;
use crate::event::input::Key;
use crate::reactive::{ChangeCallback, Subscription, ValueCell};
use crate::widget::{
    navigate, CheckedState, Component, Detail, FormMirror, MirrorEvents, Orientation, WidgetCore,
};

use super::{bind, item_disabled, item_value};

/// Radio group configuration.
#[derive(Clone)]
pub struct RadioGroupConfig {
    /// Controlled selection. When set, `default_value` is ignored.
    pub value: Option<Option<String>>,
    pub default_value: Option<String>,
    pub on_value_change: Option<ChangeCallback<Option<String>>>,
    /// `None` accepts arrows on both axes.
    pub orientation: Option<Orientation>,
    pub looping: bool,
    pub disabled: bool,
    pub required: bool,
    pub name: Option<String>,
    pub mirror_events: MirrorEvents,
}

impl Default for RadioGroupConfig {
    fn default() -> Self {
        Self {
            value: None,
            default_value: None,
            on_value_change: None,
            orientation: None,
            looping: true,
            disabled: false,
            required: false,
            name: None,
            mirror_events: MirrorEvents::default(),
        }
    }
}

impl RadioGroupConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controlled selection; `None` means nothing is selected.
    pub fn with_value(mut self, value: Option<impl Into<String>>) -> Self {
        self.value = Some(value.map(Into::into));
        self
    }

    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn on_value_change(mut self, f: impl Fn(&Option<String>) + 'static) -> Self {
        self.on_value_change = Some(Rc::new(f));
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_mirror_events(mut self, events: MirrorEvents) -> Self {
        self.mirror_events = events;
        self
    }
}

#[derive(Debug, Clone)]
struct Radio {
    value: String,
    node: NodeId,
    indicator: Option<NodeId>,
    disabled: bool,
}

struct Inner {
    /// Render subscription on the state cell.
    subscription: RefCell<Option<Subscription>>,
    core: WidgetCore,
    value: ValueCell<Option<String>>,
    orientation: Option<Orientation>,
    looping: bool,
    disabled: Cell<bool>,
    required: bool,
    items: Vec<Radio>,
    mirror: FormMirror,
}

impl Inner {
    fn initialize(self: &Rc<Self>) {
        let core = &self.core;
        let root = core.root();
        core.set_attr(root, "role", "radiogroup");
        if let Some(orientation) = self.orientation {
            core.set_attr(root, "aria-orientation", orientation.as_str());
        }
        if self.required {
            core.set_attr(root, "aria-required", "true");
        }
        if self.items.is_empty() {
            core.warn_missing("items");
        }

        for item in &self.items {
            let node = item.node;
            core.set_attr(node, "role", "radio");
            if core.doc().tag(node).as_deref() == Some("button") {
                core.set_attr(node, "type", "button");
            }

            let value = item.value.clone();
            core.listen(node, EventType::Click, bind(self, move |inner, _| inner.select(&value)));
            let value = item.value.clone();
            core.listen(
                node,
                EventType::KeyDown,
                bind(self, move |inner, event| {
                    let Some(key) = event.key() else { return };
                    if key.code == Key::SPACE {
                        event.prevent_default();
                        inner.select(&value);
                        return;
                    }
                    if key.code == Key::Enter {
                        // Enter submits forms, it never checks a radio.
                        event.prevent_default();
                        return;
                    }
                    let enabled: Vec<&Radio> = inner.enabled_items().collect();
                    let Some(current) = enabled.iter().position(|r| r.node == node) else {
                        return;
                    };
                    // Home/End are not part of the radio pattern.
                    if matches!(key.code, Key::Home | Key::End) {
                        return;
                    }
                    if let Some(next) =
                        navigate(key.code, current, enabled.len(), inner.orientation, inner.looping)
                    {
                        event.prevent_default();
                        let target = enabled[next];
                        inner.core.doc().focus(target.node);
                        inner.select(&target.value);
                    }
                }),
            );
        }

        let weak = Rc::downgrade(self);
        let subscription = self.value.subscribe(move |new, _old| {
            if let Some(inner) = weak.upgrade() {
                inner.render();
                inner
                    .core
                    .emit("valueChange", Detail::Value(new.clone().unwrap_or_default()));
            }
        });
        *self.subscription.borrow_mut() = Some(subscription);

        self.render();
    }

    fn is_item_disabled(&self, item: &Radio) -> bool {
        self.disabled.get() || item.disabled
    }

    fn enabled_items(&self) -> impl Iterator<Item = &Radio> + '_ {
        self.items.iter().filter(|item| !self.is_item_disabled(item))
    }

    fn render(&self) {
        let core = &self.core;
        let selected = self.value.get();
        let has_selected = self
            .enabled_items()
            .any(|item| Some(&item.value) == selected.as_ref());
        let first_enabled = self.enabled_items().next().map(|item| item.node);
        let group_disabled = self.disabled.get();

        core.toggle_attr(core.root(), "data-disabled", Some(group_disabled));
        for item in &self.items {
            let checked = Some(&item.value) == selected.as_ref();
            let disabled = self.is_item_disabled(item);
            let state = CheckedState::from(checked);
            let tab_stop = !disabled
                && (checked || (!has_selected && first_enabled == Some(item.node)));

            core.set_attr(item.node, "aria-checked", state.aria_value());
            core.set_data(item.node, "state", state.data_state());
            core.set_attr(item.node, "tabindex", if tab_stop { "0" } else { "-1" });
            core.toggle_attr(item.node, "data-disabled", Some(disabled));
            if let Some(indicator) = item.indicator {
                core.set_data(indicator, "state", state.data_state());
                core.toggle_attr(indicator, "hidden", Some(!checked));
            }
        }
        self.mirror.sync(
            core,
            selected.as_deref().unwrap_or(""),
            None,
            group_disabled,
            self.required,
        );
    }

    fn select(&self, value: &str) {
        let Some(item) = self.items.iter().find(|item| item.value == value) else {
            return;
        };
        if !self.is_item_disabled(item) {
            self.value.request(Some(value.to_owned()));
        }
    }
}

/// Group of mutually exclusive radio items.
pub struct RadioGroup {
    inner: Rc<Inner>,
}

impl Component for RadioGroup {
    const NAME: &'static str = "radio-group";
    type Config = RadioGroupConfig;

    fn new(doc: &Document, root: NodeId, config: RadioGroupConfig) -> Result<Self> {
        let core = WidgetCore::new(doc, root, Self::NAME)?;
        let value = ValueCell::from_props(
            "value",
            config.value,
            config.default_value.map(Some),
            Some(None),
            config.on_value_change,
        )?;
        let items = core
            .query_all("[data-radio-group-item]")
            .into_iter()
            .enumerate()
            .map(|(index, node)| Radio {
                value: item_value(doc, node, index),
                node,
                indicator: core.query_in(node, "[data-radio-group-indicator]"),
                disabled: item_disabled(doc, node),
            })
            .collect();
        let mirror = FormMirror::create(&core, "hidden", config.name.as_deref(), config.mirror_events);

        let inner = Rc::new(Inner {
            subscription: RefCell::new(None),
            core,
            value,
            orientation: config.orientation,
            looping: config.looping,
            disabled: Cell::new(config.disabled),
            required: config.required,
            items,
            mirror,
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

impl RadioGroup {
    pub fn value(&self) -> Option<String> {
        self.inner.value.get()
    }

    pub fn set_value(&self, value: Option<&str>) {
        self.inner.value.set(value.map(str::to_owned));
    }

    /// Controlled-update path.
    pub fn sync_value(&self, value: Option<&str>) {
        self.inner.value.update_controlled(value.map(str::to_owned));
    }

    pub fn item(&self, value: &str) -> Option<NodeId> {
        self.inner
            .items
            .iter()
            .find(|item| item.value == value)
            .map(|item| item.node)
    }

    pub fn set_disabled(&self, disabled: bool) {
        if self.inner.disabled.replace(disabled) != disabled && !self.is_destroyed() {
            self.inner.render();
        }
    }

    pub fn input(&self) -> NodeId {
        self.inner.mirror.input()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::builder::{el, Element};
    use pretty_assertions::assert_eq;

    fn radio(value: &str) -> Element {
        el("button")
            .attr("data-radio-group-item", "")
            .attr("data-value", value)
            .child(el("span").attr("data-radio-group-indicator", ""))
    }

    fn markup() -> (Document, NodeId) {
        Document::with_markup(el("div").id("rg").children([
            radio("red"),
            radio("green").attr("data-disabled", ""),
            radio("blue"),
        ]))
    }

    #[test]
    fn arrows_select_and_wrap() {
        let (doc, root) = markup();
        let group = RadioGroup::new(&doc, root, RadioGroupConfig::new().with_default_value("red")).unwrap();
        let red = group.item("red").unwrap();
        let blue = group.item("blue").unwrap();
        doc.focus(red);

        doc.key_down(red, Key::Down);
        assert_eq!(group.value().as_deref(), Some("blue"));
        assert_eq!(doc.active_element(), Some(blue));

        doc.key_down(blue, Key::Right);
        assert_eq!(group.value().as_deref(), Some("red"));
        assert_eq!(doc.attr(red, "tabindex").as_deref(), Some("0"));
        assert_eq!(doc.attr(blue, "tabindex").as_deref(), Some("-1"));
    }

    #[test]
    fn nothing_selected_keeps_first_tab_stop() {
        let (doc, root) = markup();
        let group = RadioGroup::new(&doc, root, RadioGroupConfig::new()).unwrap();
        assert_eq!(group.value(), None);
        assert_eq!(doc.attr(group.item("red").unwrap(), "tabindex").as_deref(), Some("0"));
        assert_eq!(doc.attr(group.item("blue").unwrap(), "tabindex").as_deref(), Some("-1"));
    }

    #[test]
    fn click_space_and_disabled_items() {
        let (doc, root) = markup();
        let group = RadioGroup::new(&doc, root, RadioGroupConfig::new().with_name("color")).unwrap();
        doc.click(group.item("green").unwrap());
        assert_eq!(group.value(), None);

        doc.key_down(group.item("blue").unwrap(), Key::SPACE);
        assert_eq!(group.value().as_deref(), Some("blue"));
        assert_eq!(doc.attr(group.input(), "value").as_deref(), Some("blue"));
        assert_eq!(doc.attr(group.input(), "name").as_deref(), Some("color"));

        let indicator = doc
            .query(group.item("blue").unwrap(), "[data-radio-group-indicator]")
            .unwrap()
            .unwrap();
        assert!(!doc.has_attr(indicator, "hidden"));
    }

    #[test]
    fn controlled_group_reports_requests() {
        let (doc, root) = markup();
        let requested = Rc::new(std::cell::RefCell::new(Vec::new()));
        let r = requested.clone();
        let group = RadioGroup::new(
            &doc,
            root,
            RadioGroupConfig::new()
                .with_value(Some("red"))
                .on_value_change(move |v| r.borrow_mut().push(v.clone())),
        )
        .unwrap();
        doc.click(group.item("blue").unwrap());
        assert_eq!(group.value().as_deref(), Some("red"));
        assert_eq!(*requested.borrow(), vec![Some("blue".to_owned())]);
        group.sync_value(Some("blue"));
        assert_eq!(group.value().as_deref(), Some("blue"));
    }

    #[test]
    fn destroy_leaves_no_listeners() {
        let (doc, root) = markup();
        let group = RadioGroup::new(&doc, root, RadioGroupConfig::new()).unwrap();
        group.destroy();
        assert_eq!(doc.listener_count(), 0);
    }
}
