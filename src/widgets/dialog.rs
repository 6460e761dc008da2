//! Dialog widget: modal (or non-modal) content shown over the page.
//!
//! Markup under the root: `[data-dialog-trigger]`, `[data-dialog-overlay]`,
//! `[data-dialog-content]` containing `[data-dialog-title]`,
//! `[data-dialog-description]` and any number of `[data-dialog-close]`
//! buttons. Everything except the content is optional; without content the
//! root itself is used.
//!
//! While a modal dialog is open it holds a document scroll lock. Opening
//! moves focus into the content and closing returns it to whatever had
//! focus before.

use std::cell::RefCell;
use std::rc::Rc;

use crate::document::{Document, EventType, ScrollLockGuard};
use crate::dom::node::NodeId;
use crate::error::Result;
use crate::event::input::Key;
use crate::reactive::{ChangeCallback, Subscription, ValueCell};
use crate::widget::{Component, Detail, WidgetCore};

use super::{bind, open_state};

/// Dialog configuration.
#[derive(Clone)]
pub struct DialogConfig {
    /// Controlled open state. When set, `default_open` is ignored.
    pub open: Option<bool>,
    pub default_open: Option<bool>,
    pub on_open_change: Option<ChangeCallback<bool>>,
    /// Lock page scroll and mark the content `aria-modal`.
    pub modal: bool,
    pub close_on_escape: bool,
    /// Close when a click lands inside the root but outside the content.
    pub close_on_outside_click: bool,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            open: None,
            default_open: None,
            on_open_change: None,
            modal: true,
            close_on_escape: true,
            close_on_outside_click: true,
        }
    }
}

impl DialogConfig {
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

    pub fn with_modal(mut self, modal: bool) -> Self {
        self.modal = modal;
        self
    }

    pub fn with_close_on_escape(mut self, close: bool) -> Self {
        self.close_on_escape = close;
        self
    }

    pub fn with_close_on_outside_click(mut self, close: bool) -> Self {
        self.close_on_outside_click = close;
        self
    }
}

#[derive(Debug, Clone)]
struct Parts {
    trigger: Option<NodeId>,
    overlay: Option<NodeId>,
    content: NodeId,
    title: Option<NodeId>,
    description: Option<NodeId>,
    close_buttons: Vec<NodeId>,
}

struct Inner {
    /// Render subscription on the state cell.
    subscription: RefCell<Option<Subscription>>,
    core: WidgetCore,
    open: ValueCell<bool>,
    modal: bool,
    close_on_escape: bool,
    close_on_outside_click: bool,
    parts: Parts,
    scroll_lock: RefCell<Option<ScrollLockGuard>>,
    /// Element focused before the dialog opened.
    return_focus: RefCell<Option<NodeId>>,
}

impl Inner {
    fn initialize(self: &Rc<Self>) {
        let core = &self.core;
        let parts = &self.parts;
        let content = parts.content;

        let content_id = core.ensure_id(content, "dialog-content");
        core.set_attr(content, "role", "dialog");
        if self.modal {
            core.set_attr(content, "aria-modal", "true");
        }
        if !core.has_attr(content, "tabindex") {
            core.set_attr(content, "tabindex", "-1");
        }
        if let Some(title) = parts.title {
            let id = core.ensure_id(title, "dialog-title");
            core.set_attr(content, "aria-labelledby", id);
        }
        if let Some(description) = parts.description {
            let id = core.ensure_id(description, "dialog-description");
            core.set_attr(content, "aria-describedby", id);
        }

        if let Some(trigger) = parts.trigger {
            core.set_attr(trigger, "aria-haspopup", "dialog");
            core.set_attr(trigger, "aria-controls", content_id);
            core.listen(
                trigger,
                EventType::Click,
                bind(self, |inner, _| inner.open.request(!inner.open.get())),
            );
        }
        for &close in &parts.close_buttons {
            core.listen(close, EventType::Click, bind(self, |inner, _| inner.open.request(false)));
        }
        if let Some(overlay) = parts.overlay {
            core.listen(
                overlay,
                EventType::Click,
                bind(self, |inner, _| {
                    if inner.close_on_outside_click {
                        inner.open.request(false);
                    }
                }),
            );
        }
        core.listen(
            core.root(),
            EventType::Click,
            bind(self, |inner, event| inner.outside_click(event.target())),
        );
        core.listen(
            content,
            EventType::KeyDown,
            bind(self, |inner, event| {
                let escape = event.key().is_some_and(|k| k.code == Key::Escape);
                if escape && inner.close_on_escape && inner.open.get() {
                    event.prevent_default();
                    event.stop_propagation();
                    inner.open.request(false);
                }
            }),
        );

        let weak = Rc::downgrade(self);
        let subscription = self.open.subscribe(move |open, _old| {
            if let Some(inner) = weak.upgrade() {
                inner.apply(*open);
                inner.core.emit("openChange", Detail::Open(*open));
            }
        });
        *self.subscription.borrow_mut() = Some(subscription);

        self.render();
        if self.open.get() {
            self.apply(true);
        }
    }

    fn outside_click(&self, target: NodeId) {
        if !self.close_on_outside_click || !self.open.get() {
            return;
        }
        let doc = self.core.doc();
        let content = self.parts.content;
        if content == self.core.root() {
            return;
        }
        let inside = |node: NodeId| target == node || doc.is_descendant(target, node);
        let on_trigger = self.parts.trigger.is_some_and(inside);
        let on_overlay = self.parts.overlay.is_some_and(inside);
        // Overlay clicks are handled by the overlay listener.
        if !inside(content) && !on_trigger && !on_overlay {
            self.open.request(false);
        }
    }

    fn render(&self) {
        let core = &self.core;
        let open = self.open.get();
        let state = open_state(open);
        core.set_data(core.root(), "state", state);
        if let Some(trigger) = self.parts.trigger {
            core.set_attr(trigger, "aria-expanded", open.to_string());
            core.set_data(trigger, "state", state);
        }
        if let Some(overlay) = self.parts.overlay {
            core.set_data(overlay, "state", state);
            core.toggle_attr(overlay, "hidden", Some(!open));
        }
        let content = self.parts.content;
        core.set_data(content, "state", state);
        if content != core.root() {
            core.toggle_attr(content, "hidden", Some(!open));
        }
    }

    /// Render plus the open/close side effects: scroll lock and focus.
    fn apply(&self, open: bool) {
        self.render();
        let doc = self.core.doc();
        if open {
            if self.modal && self.scroll_lock.borrow().is_none() {
                *self.scroll_lock.borrow_mut() = Some(doc.acquire_scroll_lock());
            }
            *self.return_focus.borrow_mut() = doc.active_element();
            let first = self
                .core
                .query_all_in(self.parts.content, "*")
                .into_iter()
                .find(|&node| {
                    doc.with_node(node, |data| data.is_focusable() && !data.is_hidden())
                        .unwrap_or(false)
                });
            doc.focus(first.unwrap_or(self.parts.content));
        } else {
            self.release_lock();
            let target = self.return_focus.borrow_mut().take().or(self.parts.trigger);
            match target {
                Some(node) if doc.contains(node) => {
                    doc.focus(node);
                }
                _ => doc.blur(),
            }
        }
    }

    fn release_lock(&self) {
        if let Some(guard) = self.scroll_lock.borrow_mut().take() {
            guard.release();
        }
    }
}

/// Dialog window.
pub struct Dialog {
    inner: Rc<Inner>,
}

impl Component for Dialog {
    const NAME: &'static str = "dialog";
    type Config = DialogConfig;

    fn new(doc: &Document, root: NodeId, config: DialogConfig) -> Result<Self> {
        let core = WidgetCore::new(doc, root, Self::NAME)?;
        let open = ValueCell::from_props(
            "open",
            config.open,
            config.default_open,
            Some(false),
            config.on_open_change,
        )?;
        let content = core.query("[data-dialog-content]").unwrap_or_else(|| {
            core.warn_missing("content");
            root
        });
        let parts = Parts {
            trigger: core.query("[data-dialog-trigger]"),
            overlay: core.query("[data-dialog-overlay]"),
            content,
            title: core.query_in(content, "[data-dialog-title]"),
            description: core.query_in(content, "[data-dialog-description]"),
            close_buttons: core.query_all("[data-dialog-close]"),
        };

        let inner = Rc::new(Inner {
            subscription: RefCell::new(None),
            core,
            open,
            modal: config.modal,
            close_on_escape: config.close_on_escape,
            close_on_outside_click: config.close_on_outside_click,
            parts,
            scroll_lock: RefCell::new(None),
            return_focus: RefCell::new(None),
        });
        inner.initialize();
        inner.core.mark_live();
        Ok(Self { inner })
    }

    fn core(&self) -> &WidgetCore {
        &self.inner.core
    }

    fn cleanup(&self) {
        self.inner.release_lock();
        self.inner.return_focus.borrow_mut().take();
        if let Some(subscription) = self.inner.subscription.borrow_mut().take() {
            subscription.unsubscribe();
        }
        self.inner.open.dispose();
    }
}

impl Dialog {
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

    pub fn content(&self) -> NodeId {
        self.inner.parts.content
    }

    pub fn trigger(&self) -> Option<NodeId> {
        self.inner.parts.trigger
    }
}
