//! Switch widget: an on/off toggle.
//!
//! Markup: the root is the control (`role="switch"`), optionally containing a
//! `[data-switch-thumb]`. Enter and Space both toggle.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::document::{Document, EventType};
use crate::dom::node::NodeId;
use crate::error::Result;
use crate::reactive::{ChangeCallback, Subscription, ValueCell};
use crate::widget::{CheckedState, Component, Detail, FormMirror, MirrorEvents, WidgetCore};

use super::bind;

/// Switch configuration.
#[derive(Clone)]
pub struct SwitchConfig {
    /// Controlled state. When set, `default_checked` is ignored.
    pub checked: Option<bool>,
    pub default_checked: Option<bool>,
    pub on_checked_change: Option<ChangeCallback<bool>>,
    pub disabled: bool,
    pub required: bool,
    pub name: Option<String>,
    pub value: String,
    pub mirror_events: MirrorEvents,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            checked: None,
            default_checked: None,
            on_checked_change: None,
            disabled: false,
            required: false,
            name: None,
            value: "on".to_owned(),
            mirror_events: MirrorEvents::default(),
        }
    }
}

impl SwitchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    pub fn with_default_checked(mut self, checked: bool) -> Self {
        self.default_checked = Some(checked);
        self
    }

    pub fn on_checked_change(mut self, f: impl Fn(&bool) + 'static) -> Self {
        self.on_checked_change = Some(Rc::new(f));
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

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_mirror_events(mut self, events: MirrorEvents) -> Self {
        self.mirror_events = events;
        self
    }
}

struct Inner {
    /// Render subscription on the state cell.
    subscription: RefCell<Option<Subscription>>,
    core: WidgetCore,
    checked: ValueCell<bool>,
    disabled: Cell<bool>,
    required: bool,
    value: String,
    thumb: Option<NodeId>,
    mirror: FormMirror,
}

impl Inner {
    fn initialize(self: &Rc<Self>) {
        let core = &self.core;
        let root = core.root();
        core.set_attr(root, "role", "switch");
        if core.doc().tag(root).as_deref() == Some("button") {
            core.set_attr(root, "type", "button");
        } else if !core.has_attr(root, "tabindex") {
            core.set_attr(root, "tabindex", "0");
        }
        if self.required {
            core.set_attr(root, "aria-required", "true");
        }

        core.listen(root, EventType::Click, bind(self, |inner, _| inner.user_toggle()));
        core.listen(
            root,
            EventType::KeyDown,
            bind(self, |inner, event| {
                if event.key().is_some_and(|k| k.code.is_activation()) {
                    event.prevent_default();
                    inner.user_toggle();
                }
            }),
        );

        let weak = Rc::downgrade(self);
        let subscription = self.checked.subscribe(move |new, _old| {
            if let Some(inner) = weak.upgrade() {
                inner.render();
                inner
                    .core
                    .emit("checkedChange", Detail::Checked(CheckedState::from(*new)));
            }
        });
        *self.subscription.borrow_mut() = Some(subscription);

        self.render();
    }

    fn render(&self) {
        let core = &self.core;
        let root = core.root();
        let state = CheckedState::from(self.checked.get());
        let disabled = self.disabled.get();

        core.set_attr(root, "aria-checked", state.aria_value());
        core.set_data(root, "state", state.data_state());
        core.toggle_attr(root, "data-disabled", Some(disabled));
        core.toggle_attr(root, "disabled", Some(disabled));
        if let Some(thumb) = self.thumb {
            core.set_data(thumb, "state", state.data_state());
        }
        self.mirror
            .sync(core, &self.value, Some(state.is_checked()), disabled, self.required);
    }

    fn user_toggle(&self) {
        if !self.disabled.get() {
            self.checked.request(!self.checked.get());
        }
    }
}

/// On/off switch.
pub struct Switch {
    inner: Rc<Inner>,
}

impl Component for Switch {
    const NAME: &'static str = "switch";
    type Config = SwitchConfig;

    fn new(doc: &Document, root: NodeId, config: SwitchConfig) -> Result<Self> {
        let core = WidgetCore::new(doc, root, Self::NAME)?;
        let checked = ValueCell::from_props(
            "checked",
            config.checked,
            config.default_checked,
            Some(false),
            config.on_checked_change,
        )?;
        let thumb = core.query("[data-switch-thumb]");
        let mirror = FormMirror::create(&core, "checkbox", config.name.as_deref(), config.mirror_events);

        let inner = Rc::new(Inner {
            subscription: RefCell::new(None),
            core,
            checked,
            disabled: Cell::new(config.disabled),
            required: config.required,
            value: config.value,
            thumb,
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
        self.inner.checked.dispose();
    }
}

impl Switch {
    pub fn is_checked(&self) -> bool {
        self.inner.checked.get()
    }

    pub fn set_checked(&self, checked: bool) {
        self.inner.checked.set(checked);
    }

    /// Toggle as if the user clicked.
    pub fn toggle(&self) {
        self.inner.user_toggle();
    }

    /// Controlled-update path.
    pub fn sync_checked(&self, checked: bool) {
        self.inner.checked.update_controlled(checked);
    }

    pub fn is_disabled(&self) -> bool {
        self.inner.disabled.get()
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
    use crate::dom::builder::el;
    use crate::event::input::Key;
    use std::cell::RefCell;

    fn markup() -> (Document, NodeId) {
        Document::with_markup(el("button").id("sw").child(el("span").attr("data-switch-thumb", "")))
    }

    #[test]
    fn controlled_click_only_reports() {
        let (doc, root) = markup();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let c = calls.clone();
        let switch = Switch::new(
            &doc,
            root,
            SwitchConfig::new()
                .with_checked(false)
                .on_checked_change(move |v| c.borrow_mut().push(*v)),
        )
        .unwrap();

        doc.click(root);
        assert!(!switch.is_checked());
        assert_eq!(*calls.borrow(), vec![true]);
        assert_eq!(doc.attr(root, "aria-checked").as_deref(), Some("false"));

        // The owner accepts the change.
        switch.sync_checked(true);
        assert!(switch.is_checked());
        assert_eq!(doc.attr(root, "data-state").as_deref(), Some("checked"));
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn controlled_setter_is_ignored() {
        let (doc, root) = markup();
        let switch = Switch::new(&doc, root, SwitchConfig::new().with_checked(true)).unwrap();
        switch.set_checked(false);
        assert!(switch.is_checked());
    }

    #[test]
    fn uncontrolled_keys_toggle() {
        let (doc, root) = markup();
        let switch = Switch::new(&doc, root, SwitchConfig::new()).unwrap();
        let thumb = doc.query(root, "[data-switch-thumb]").unwrap().unwrap();
        doc.key_down(root, Key::Enter);
        assert!(switch.is_checked());
        assert_eq!(doc.attr(thumb, "data-state").as_deref(), Some("checked"));
        doc.key_down(root, Key::SPACE);
        assert!(!switch.is_checked());
        assert_eq!(doc.attr(root, "role").as_deref(), Some("switch"));
    }

    #[test]
    fn destroy_leaves_no_listeners() {
        let (doc, root) = markup();
        let switch = Switch::new(&doc, root, SwitchConfig::new()).unwrap();
        switch.destroy();
        assert_eq!(doc.listener_count(), 0);
        doc.click(root);
        assert!(!switch.is_checked());
    }

    #[test]
    fn destroy_releases_the_render_subscription() {
        let (doc, root) = markup();
        let switch = Switch::new(&doc, root, SwitchConfig::new()).unwrap();
        assert_eq!(switch.inner.checked.subscriber_count(), 1);
        assert!(switch.inner.subscription.borrow().is_some());
        switch.destroy();
        assert_eq!(switch.inner.checked.subscriber_count(), 0);
        assert!(switch.inner.subscription.borrow().is_none());
    }
}
