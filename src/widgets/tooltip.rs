//! Tooltip widget: hover or focus a trigger to reveal a description.
//!
//! Markup: `[data-tooltip-trigger]` and `[data-tooltip-content]` under the
//! root. Hover opens after `open_delay` and closes after `close_delay`;
//! keyboard focus opens immediately. Delays run on the document clock.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::document::{Document, EventType, TimerId};
use crate::dom::node::NodeId;
use crate::error::Result;
use crate::event::input::Key;
use crate::reactive::{ChangeCallback, Subscription, ValueCell};
use crate::widget::{Component, Detail, WidgetCore};

use super::{bind, open_state};

/// Default hover delay before the tooltip shows.
pub const DEFAULT_OPEN_DELAY: Duration = Duration::from_millis(700);

/// Tooltip configuration.
#[derive(Clone)]
pub struct TooltipConfig {
    /// Controlled open state. When set, `default_open` is ignored.
    pub open: Option<bool>,
    pub default_open: Option<bool>,
    pub on_open_change: Option<ChangeCallback<bool>>,
    pub open_delay: Duration,
    /// Zero closes as soon as the pointer leaves the trigger, so the
    /// pointer cannot travel into the content first. Use a non-zero delay
    /// for tooltips with interactive content; entering the content then
    /// cancels the pending close.
    pub close_delay: Duration,
    pub disabled: bool,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            open: None,
            default_open: None,
            on_open_change: None,
            open_delay: DEFAULT_OPEN_DELAY,
            close_delay: Duration::ZERO,
            disabled: false,
        }
    }
}

impl TooltipConfig {
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

    pub fn with_open_delay(mut self, delay: Duration) -> Self {
        self.open_delay = delay;
        self
    }

    pub fn with_close_delay(mut self, delay: Duration) -> Self {
        self.close_delay = delay;
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
    open_delay: Duration,
    close_delay: Duration,
    disabled: Cell<bool>,
    parts: Parts,
    pending: RefCell<Option<TimerId>>,
}

impl Inner {
    fn initialize(self: &Rc<Self>) {
        let core = &self.core;
        let Parts { trigger, content } = self.parts;

        if let Some(content) = content {
            core.ensure_id(content, "tooltip-content");
            core.set_attr(content, "role", "tooltip");
            core.listen(content, EventType::PointerEnter, bind(self, |inner, _| inner.cancel_pending()));
            core.listen(
                content,
                EventType::PointerLeave,
                bind(self, |inner, _| inner.schedule(false, inner.close_delay)),
            );
        } else {
            core.warn_missing("content");
        }

        match trigger {
            Some(trigger) => {
                core.listen(
                    trigger,
                    EventType::PointerEnter,
                    bind(self, |inner, _| inner.schedule(true, inner.open_delay)),
                );
                core.listen(
                    trigger,
                    EventType::PointerLeave,
                    bind(self, |inner, _| inner.schedule(false, inner.close_delay)),
                );
                core.listen(trigger, EventType::Focus, bind(self, |inner, _| inner.schedule(true, Duration::ZERO)));
                core.listen(trigger, EventType::Blur, bind(self, |inner, _| inner.schedule(false, Duration::ZERO)));
                core.listen(
                    trigger,
                    EventType::KeyDown,
                    bind(self, |inner, event| {
                        if event.key().is_some_and(|k| k.code == Key::Escape) && inner.open.get() {
                            event.prevent_default();
                            inner.schedule(false, Duration::ZERO);
                        }
                    }),
                );
            }
            None => core.warn_missing("trigger"),
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
        let state = open_state(open);
        core.set_data(core.root(), "state", state);
        core.toggle_attr(core.root(), "data-disabled", Some(self.disabled.get()));
        let content_id = self.parts.content.and_then(|content| {
            core.set_data(content, "state", state);
            core.toggle_attr(content, "hidden", Some(!open));
            core.get_attr(content, "id")
        });
        if let Some(trigger) = self.parts.trigger {
            core.set_data(trigger, "state", state);
            match content_id {
                Some(id) if open => core.set_attr(trigger, "aria-describedby", id),
                _ => core.remove_attr(trigger, "aria-describedby"),
            }
        }
    }

    fn cancel_pending(&self) {
        if let Some(id) = self.pending.borrow_mut().take() {
            self.core.doc().clear_timeout(id);
        }
    }

    /// Request `open` after `delay`, replacing any pending request.
    fn schedule(self: &Rc<Self>, open: bool, delay: Duration) {
        self.cancel_pending();
        if open && self.disabled.get() {
            return;
        }
        if delay.is_zero() {
            self.open.request(open);
            return;
        }
        let weak = Rc::downgrade(self);
        let id = self.core.doc().set_timeout(delay, move || {
            if let Some(inner) = weak.upgrade() {
                inner.pending.borrow_mut().take();
                if !inner.core.is_destroyed() {
                    inner.open.request(open);
                }
            }
        });
        *self.pending.borrow_mut() = Some(id);
    }
}

/// Hover/focus tooltip.
pub struct Tooltip {
    inner: Rc<Inner>,
}

impl Component for Tooltip {
    const NAME: &'static str = "tooltip";
    type Config = TooltipConfig;

    fn new(doc: &Document, root: NodeId, config: TooltipConfig) -> Result<Self> {
        let core = WidgetCore::new(doc, root, Self::NAME)?;
        let open = ValueCell::from_props(
            "open",
            config.open,
            config.default_open,
            Some(false),
            config.on_open_change,
        )?;
        let parts = Parts {
            trigger: core.query("[data-tooltip-trigger]"),
            content: core.query("[data-tooltip-content]"),
        };
        let inner = Rc::new(Inner {
            subscription: RefCell::new(None),
            core,
            open,
            open_delay: config.open_delay,
            close_delay: config.close_delay,
            disabled: Cell::new(config.disabled),
            parts,
            pending: RefCell::new(None),
        });
        inner.initialize();
        inner.core.mark_live();
        Ok(Self { inner })
    }

    fn core(&self) -> &WidgetCore {
        &self.inner.core
    }

    fn cleanup(&self) {
        self.inner.cancel_pending();
        if let Some(subscription) = self.inner.subscription.borrow_mut().take() {
            subscription.unsubscribe();
        }
        self.inner.open.dispose();
    }
}

impl Tooltip {
    pub fn is_open(&self) -> bool {
        self.inner.open.get()
    }

    /// Show immediately, cancelling any pending delay.
    pub fn open(&self) {
        self.inner.cancel_pending();
        self.inner.open.set(true);
    }

    /// Hide immediately, cancelling any pending delay.
    pub fn close(&self) {
        self.inner.cancel_pending();
        self.inner.open.set(false);
    }

    /// Controlled-update path.
    pub fn sync_open(&self, open: bool) {
        self.inner.open.update_controlled(open);
    }

    pub fn set_disabled(&self, disabled: bool) {
        if self.inner.disabled.replace(disabled) == disabled || self.is_destroyed() {
            return;
        }
        if disabled {
            self.inner.cancel_pending();
        }
        self.inner.render();
    }

    pub fn trigger(&self) -> Option<NodeId> {
        self.inner.parts.trigger
    }

    pub fn content(&self) -> Option<NodeId> {
        self.inner.parts.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::builder::el;

    fn markup() -> (Document, NodeId) {
        Document::with_markup(
            el("div")
                .child(el("button").attr("data-tooltip-trigger", "").text("?"))
                .child(el("div").attr("data-tooltip-content", "").text("Help")),
        )
    }

    fn tooltip(config: TooltipConfig) -> (Document, Tooltip, NodeId, NodeId) {
        let (doc, root) = markup();
        let tooltip = Tooltip::new(&doc, root, config).unwrap();
        let trigger = tooltip.trigger().unwrap();
        let content = tooltip.content().unwrap();
        (doc, tooltip, trigger, content)
    }

    #[test]
    fn hover_opens_after_delay() {
        let (doc, tooltip, trigger, content) = tooltip(TooltipConfig::new());
        assert_eq!(doc.attr(content, "role").as_deref(), Some("tooltip"));
        doc.pointer_enter(trigger);
        doc.advance(Duration::from_millis(699));
        assert!(!tooltip.is_open());
        doc.advance(Duration::from_millis(1));
        assert!(tooltip.is_open());
        assert_eq!(doc.attr(trigger, "aria-describedby"), doc.attr(content, "id"));
        assert!(!doc.has_attr(content, "hidden"));

        doc.pointer_leave(trigger);
        assert!(!tooltip.is_open());
        assert!(!doc.has_attr(trigger, "aria-describedby"));
    }

    #[test]
    fn leaving_before_delay_cancels() {
        let (doc, tooltip, trigger, _) = tooltip(TooltipConfig::new());
        doc.pointer_enter(trigger);
        doc.advance(Duration::from_millis(300));
        doc.pointer_leave(trigger);
        doc.advance(Duration::from_secs(2));
        assert!(!tooltip.is_open());
        assert_eq!(doc.pending_timers(), 0);
    }

    #[test]
    fn moving_into_content_keeps_it_open() {
        let config = TooltipConfig::new()
            .with_open_delay(Duration::ZERO)
            .with_close_delay(Duration::from_millis(100));
        let (doc, tooltip, trigger, content) = tooltip(config);
        doc.pointer_enter(trigger);
        assert!(tooltip.is_open());
        doc.pointer_leave(trigger);
        doc.pointer_enter(content);
        doc.advance(Duration::from_millis(500));
        assert!(tooltip.is_open());
        doc.pointer_leave(content);
        doc.advance(Duration::from_millis(100));
        assert!(!tooltip.is_open());
    }

    #[test]
    fn zero_close_delay_closes_before_content_is_reached() {
        let (doc, tooltip, trigger, content) =
            tooltip(TooltipConfig::new().with_open_delay(Duration::ZERO));
        doc.pointer_enter(trigger);
        doc.pointer_leave(trigger);
        assert!(!tooltip.is_open());
        doc.pointer_enter(content);
        assert!(!tooltip.is_open());
        assert_eq!(doc.pending_timers(), 0);
    }

    #[test]
    fn focus_and_escape() {
        let (doc, tooltip, trigger, _) = tooltip(TooltipConfig::new());
        doc.focus(trigger);
        assert!(tooltip.is_open());
        doc.key_down(trigger, Key::Escape);
        assert!(!tooltip.is_open());
        tooltip.open();
        doc.blur();
        assert!(!tooltip.is_open());
    }

    #[test]
    fn disabled_never_opens_on_hover() {
        let (doc, tooltip, trigger, _) = tooltip(TooltipConfig::new().with_disabled(true));
        doc.pointer_enter(trigger);
        doc.advance(Duration::from_secs(1));
        assert!(!tooltip.is_open());
    }

    #[test]
    fn destroy_clears_pending_timer() {
        let (doc, tooltip, trigger, _) = tooltip(TooltipConfig::new());
        doc.pointer_enter(trigger);
        assert_eq!(doc.pending_timers(), 1);
        tooltip.destroy();
        assert_eq!(doc.pending_timers(), 0);
        assert_eq!(doc.listener_count(), 0);
    }
}
