//! Collapsible widget: a trigger that shows and hides one content region.
//!
//! Markup: `[data-collapsible-trigger]` and `[data-collapsible-content]`
//! under the root. Either may be missing; the widget then skips the
//! behaviour that depends on it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::document::{Document, EventType};
use crate::dom::node::NodeId;
use crate::error::Result;
use crate::reactive::{ChangeCallback, Subscription, ValueCell};
use crate::widget::{Component, Detail, WidgetCore};

use super::{bind, open_state};

/// Collapsible configuration.
#[derive(Clone, Default)]
pub struct CollapsibleConfig {
    /// Controlled open state. When set, `default_open` is ignored.
    pub open: Option<bool>,
    pub default_open: Option<bool>,
    pub on_open_change: Option<ChangeCallback<bool>>,
    pub disabled: bool,
}

impl CollapsibleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_open(mut self, open: bool) -> Self {
        self.open = Some(open);
        self
    }

    pub fn with_default_open(mut self, open: bool) -> Self {
        self.default_open = Some(open);
        self
    }

    pub fn on_open_change(mut self, f: impl Fn(&bool) + 'static) -> Self {
        self.on_open_change = Some(Rc::new(f));
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct Parts {
    trigger: Option<NodeId>,
    content: Option<NodeId>,
}

struct Inner {
    /// Render subscription on the state cell.
    subscription: RefCell<Option<Subscription>>,
    core: WidgetCore,
    open: ValueCell<bool>,
    disabled: Cell<bool>,
    parts: Parts,
}

impl Inner {
    fn initialize(self: &Rc<Self>) {
        let core = &self.core;
        let Parts { trigger, content } = self.parts;

        if let (Some(trigger), Some(content)) = (trigger, content) {
            let content_id = core.ensure_id(content, "collapsible-content");
            core.set_attr(trigger, "aria-controls", content_id);
        }
        match trigger {
            Some(trigger) => {
                core.listen(trigger, EventType::Click, bind(self, |inner, _| inner.user_toggle()));
            }
            None => core.warn_missing("trigger"),
        }
        if content.is_none() {
            core.warn_missing("content");
        }

        let weak = Rc::downgrade(self);
        let subscription = self.open.subscribe(move |open, _old| {
            if let Some(inner) = weak.upgrade() {
                inner.render();
                inner.core.emit("openChange", Detail::Open(*open));
            }
        });
        *self.subscription.borrow_mut() = Some(subscription);

        self.render();
    }

    fn render(&self) {
        let core = &self.core;
        let open = self.open.get();
        let disabled = self.disabled.get();
        let state = open_state(open);

        core.set_data(core.root(), "state", state);
        core.toggle_attr(core.root(), "data-disabled", Some(disabled));
        if let Some(trigger) = self.parts.trigger {
            core.set_attr(trigger, "aria-expanded", open.to_string());
            core.set_data(trigger, "state", state);
            core.toggle_attr(trigger, "disabled", Some(disabled));
        }
        if let Some(content) = self.parts.content {
            core.set_data(content, "state", state);
            core.toggle_attr(content, "hidden", Some(!open));
        }
    }

    fn user_toggle(&self) {
        if !self.disabled.get() {
            self.open.request(!self.open.get());
        }
    }
}

/// Show/hide region driven by a trigger.
pub struct Collapsible {
    inner: Rc<Inner>,
}

impl Component for Collapsible {
    const NAME: &'static str = "collapsible";
    type Config = CollapsibleConfig;

    fn new(doc: &Document, root: NodeId, config: CollapsibleConfig) -> Result<Self> {
        let core = WidgetCore::new(doc, root, Self::NAME)?;
        let open = ValueCell::from_props(
            "open",
            config.open,
            config.default_open,
            Some(false),
            config.on_open_change,
        )?;
        let parts = Parts {
            trigger: core.query("[data-collapsible-trigger]"),
            content: core.query("[data-collapsible-content]"),
        };
        let inner = Rc::new(Inner {
            subscription: RefCell::new(None),
            core,
            open,
            disabled: Cell::new(config.disabled),
            parts,
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
        self.inner.open.dispose();
    }
}

impl Collapsible {
    pub fn is_open(&self) -> bool {
        self.inner.open.get()
    }

    pub fn open(&self) {
        self.inner.open.set(true);
    }

    pub fn close(&self) {
        self.inner.open.set(false);
    }

    pub fn toggle(&self) {
        self.inner.open.set(!self.is_open());
    }

    /// Controlled-update path.
    pub fn sync_open(&self, open: bool) {
        self.inner.open.update_controlled(open);
    }

    pub fn set_disabled(&self, disabled: bool) {
        if self.inner.disabled.replace(disabled) != disabled && !self.is_destroyed() {
            self.inner.render();
        }
    }

    pub fn trigger(&self) -> Option<NodeId> {
        self.inner.parts.trigger
    }

    pub fn content(&self) -> Option<NodeId> {
        self.inner.parts.content
    }
}
