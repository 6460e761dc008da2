//! Checkbox widget: tri-state toggle with optional indicator.
//!
//! Markup: the root element is the control itself (usually a `<button>`),
//! with an optional `[data-checkbox-indicator]` descendant. A hidden
//! `<input type="checkbox">` mirrors the state for forms.
//!
//! Space toggles. Enter is suppressed, as for native checkboxes. A user
//! toggle from `Indeterminate` always lands on `Checked`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::document::{Document, EventType};
use crate::dom::node::NodeId;
use crate::error::Result;
use crate::event::input::Key;
use crate::reactive::{ChangeCallback, Subscription, ValueCell};
use crate::widget::{CheckedState, Component, Detail, FormMirror, MirrorEvents, WidgetCore};

use super::bind;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Checkbox configuration.
#[derive(Clone)]
pub struct CheckboxConfig {
    /// Controlled state. When set, `default_checked` is ignored.
    pub checked: Option<CheckedState>,
    pub default_checked: Option<CheckedState>,
    pub on_checked_change: Option<ChangeCallback<CheckedState>>,
    pub disabled: bool,
    pub required: bool,
    /// Form field name of the hidden input.
    pub name: Option<String>,
    /// Submitted value when checked. Defaults to `"on"`.
    pub value: String,
    pub mirror_events: MirrorEvents,
}

impl Default for CheckboxConfig {
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

impl CheckboxConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_checked(mut self, checked: impl Into<CheckedState>) -> Self {
        self.checked = Some(checked.into());
        self
    }

    pub fn with_default_checked(mut self, checked: impl Into<CheckedState>) -> Self {
        self.default_checked = Some(checked.into());
        self
    }

    pub fn on_checked_change(mut self, f: impl Fn(&CheckedState) + 'static) -> Self {
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

// ---------------------------------------------------------------------------
// Checkbox
// ---------------------------------------------------------------------------

struct Inner {
    /// Render subscription on the state cell.
    subscription: RefCell<Option<Subscription>>,
    core: WidgetCore,
    checked: ValueCell<CheckedState>,
    disabled: Cell<bool>,
    required: bool,
    value: String,
    indicator: Option<NodeId>,
    mirror: FormMirror,
}

impl Inner {
    fn initialize(self: &Rc<Self>) {
        let core = &self.core;
        let root = core.root();
        core.set_attr(root, "role", "checkbox");
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
            bind(self, |inner, event| match event.key().map(|k| k.code) {
                Some(Key::Enter) => event.prevent_default(),
                Some(Key::SPACE) => {
                    event.prevent_default();
                    inner.user_toggle();
                }
                _ => {}
            }),
        );

        let weak = Rc::downgrade(self);
        let subscription = self.checked.subscribe(move |new, _old| {
            if let Some(inner) = weak.upgrade() {
                inner.render();
                inner.core.emit("checkedChange", Detail::Checked(*new));
            }
        });
        *self.subscription.borrow_mut() = Some(subscription);

        self.render();
    }

    fn render(&self) {
        let core = &self.core;
        let root = core.root();
        let state = self.checked.get();
        let disabled = self.disabled.get();

        core.set_attr(root, "aria-checked", state.aria_value());
        core.set_data(root, "state", state.data_state());
        core.toggle_attr(root, "data-disabled", Some(disabled));
        core.toggle_attr(root, "disabled", Some(disabled));
        if let Some(indicator) = self.indicator {
            core.set_data(indicator, "state", state.data_state());
            core.toggle_attr(indicator, "hidden", Some(state == CheckedState::Unchecked));
        }
        self.mirror
            .sync(core, &self.value, Some(state.is_checked()), disabled, self.required);
    }

    fn user_toggle(&self) {
        if self.disabled.get() {
            return;
        }
        self.checked.request(self.checked.get().toggled());
    }
}

/// Tri-state checkbox.
///
/// # Examples
///
/// ```ignore
/// let checkbox = Checkbox::create(&doc, "#terms", CheckboxConfig::new().with_name("terms"))?;
/// checkbox.set_indeterminate(true);
/// ```
pub struct Checkbox {
    inner: Rc<Inner>,
}

impl Component for Checkbox {
    const NAME: &'static str = "checkbox";
    type Config = CheckboxConfig;

    fn new(doc: &Document, root: NodeId, config: CheckboxConfig) -> Result<Self> {
        let core = WidgetCore::new(doc, root, Self::NAME)?;
        let checked = ValueCell::from_props(
            "checked",
            config.checked,
            config.default_checked,
            Some(CheckedState::Unchecked),
            config.on_checked_change,
        )?;
        let indicator = core.query("[data-checkbox-indicator]");
        let mirror = FormMirror::create(&core, "checkbox", config.name.as_deref(), config.mirror_events);

        let inner = Rc::new(Inner {
            subscription: RefCell::new(None),
            core,
            checked,
            disabled: Cell::new(config.disabled),
            required: config.required,
            value: config.value,
            indicator,
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

impl Checkbox {
    pub fn checked(&self) -> CheckedState {
        self.inner.checked.get()
    }

    /// Programmatic write. Ignored (with a warning) when controlled.
    pub fn set_checked(&self, checked: impl Into<CheckedState>) {
        self.inner.checked.set(checked.into());
    }

    /// Enter or leave the indeterminate state. Leaving it unchecks.
    pub fn set_indeterminate(&self, indeterminate: bool) {
        if indeterminate {
            self.inner.checked.set(CheckedState::Indeterminate);
        } else if self.checked() == CheckedState::Indeterminate {
            self.inner.checked.set(CheckedState::Unchecked);
        }
    }

    /// Toggle as if the user clicked.
    pub fn toggle(&self) {
        self.inner.user_toggle();
    }

    /// Controlled-update path.
    pub fn sync_checked(&self, checked: impl Into<CheckedState>) {
        self.inner.checked.update_controlled(checked.into());
    }

    pub fn is_disabled(&self) -> bool {
        self.inner.disabled.get()
    }

    pub fn set_disabled(&self, disabled: bool) {
        if self.inner.disabled.replace(disabled) != disabled && !self.is_destroyed() {
            self.inner.render();
        }
    }

    /// The hidden form input.
    pub fn input(&self) -> NodeId {
        self.inner.mirror.input()
    }
}
