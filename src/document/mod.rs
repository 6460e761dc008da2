//! The host document: element tree plus the services widgets expect from a
//! browser-like environment.
//!
//! A [`Document`] is a cheap, clonable handle. It owns
//!
//! - the [`Dom`] arena (with a `<body>` root),
//! - native event listeners keyed by `(node, event type)` and bubbling dispatch,
//! - focus tracking,
//! - a virtual-clock timer queue,
//! - the reference-counted body scroll lock,
//! - a counter for generating unique element ids.
//!
//! No method holds an internal borrow while user code runs, so listeners and
//! timer callbacks are free to call back into the document.

pub mod events;
pub mod scroll_lock;
pub mod timer;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::time::Duration;

use crate::dom::builder::Element;
use crate::dom::node::{NodeData, NodeId};
use crate::dom::selector::{SelectorError, SelectorList};
use crate::dom::tree::Dom;
use crate::error::{Error, Result};
use crate::event::hub::panic_message;
use crate::event::input::KeyEvent;
use crate::event::registry::Registry;

pub use events::{DomEvent, EventType};
pub use scroll_lock::ScrollLockGuard;
pub use timer::TimerId;

use scroll_lock::ScrollLockState;
use timer::TimerQueue;

/// Shared native event handler. Identity (`Rc::ptr_eq`) decides removal.
pub type NativeHandler = Rc<dyn Fn(&DomEvent)>;

/// Wrap a closure as a [`NativeHandler`].
pub fn handler(f: impl Fn(&DomEvent) + 'static) -> NativeHandler {
    Rc::new(f)
}

/// Where a widget should attach: a selector resolved against the whole
/// document, or a node the caller already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    Selector(&'a str),
    Node(NodeId),
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(selector: &'a str) -> Self {
        Target::Selector(selector)
    }
}

impl<'a> From<&'a String> for Target<'a> {
    fn from(selector: &'a String) -> Self {
        Target::Selector(selector)
    }
}

impl From<NodeId> for Target<'_> {
    fn from(node: NodeId) -> Self {
        Target::Node(node)
    }
}

struct DocumentInner {
    dom: RefCell<Dom>,
    body: NodeId,
    listeners: RefCell<Registry<(NodeId, EventType), dyn Fn(&DomEvent)>>,
    active: Cell<Option<NodeId>>,
    timers: RefCell<TimerQueue>,
    scroll_lock: ScrollLockState,
    next_uid: Cell<u64>,
}

/// Handle to a document. Clones share the same tree and services.
#[derive(Clone)]
pub struct Document {
    inner: Rc<DocumentInner>,
}

impl Document {
    /// Create a document containing an empty `<body>`.
    pub fn new() -> Self {
        let mut dom = Dom::new();
        let body = dom.insert(NodeData::new("body"));
        Self {
            inner: Rc::new(DocumentInner {
                dom: RefCell::new(dom),
                body,
                listeners: RefCell::new(Registry::new()),
                active: Cell::new(None),
                timers: RefCell::new(TimerQueue::new()),
                scroll_lock: ScrollLockState::default(),
                next_uid: Cell::new(0),
            }),
        }
    }

    /// Build a document whose body contains `markup`.
    pub fn with_markup(markup: Element) -> (Self, NodeId) {
        let doc = Self::new();
        let node = doc.mount(doc.body(), markup);
        (doc, node)
    }

    pub fn body(&self) -> NodeId {
        self.inner.body
    }

    /// Whether two handles point at the same document.
    pub fn ptr_eq(&self, other: &Document) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // ── Tree access ──────────────────────────────────────────────────

    /// Run `f` with shared access to the tree.
    pub fn read<R>(&self, f: impl FnOnce(&Dom) -> R) -> R {
        f(&self.inner.dom.borrow())
    }

    /// Run `f` with exclusive access to the tree.
    ///
    /// Removing nodes through this bypasses listener cleanup; prefer
    /// [`Document::remove`].
    pub fn write<R>(&self, f: impl FnOnce(&mut Dom) -> R) -> R {
        f(&mut self.inner.dom.borrow_mut())
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.read(|dom| dom.contains(node))
    }

    /// Insert `markup` as the last child of `parent`.
    pub fn mount(&self, parent: NodeId, markup: Element) -> NodeId {
        self.write(|dom| markup.mount(dom, parent))
    }

    /// Insert a single element as the last child of `parent`.
    pub fn append(&self, parent: NodeId, data: NodeData) -> NodeId {
        self.write(|dom| dom.insert_child(parent, data))
    }

    /// Remove `node` and its subtree, dropping their native listeners.
    /// Returns `false` when the node was already gone.
    pub fn remove(&self, node: NodeId) -> bool {
        let removed = self.write(|dom| dom.remove(node));
        if removed.is_empty() {
            return false;
        }
        self.inner
            .listeners
            .borrow_mut()
            .retain_keys(|(owner, _)| !removed.contains(owner));
        if self.inner.active.get().is_some_and(|a| removed.contains(&a)) {
            self.inner.active.set(None);
        }
        log::trace!("[dom] removed {} node(s)", removed.len());
        true
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.read(|dom| dom.parent(node))
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.read(|dom| dom.children(node).to_vec())
    }

    pub fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        self.read(|dom| dom.is_descendant(node, ancestor))
    }

    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.read(|dom| dom.get(node).map(|data| data.tag.clone()))
    }

    pub fn text(&self, node: NodeId) -> Option<String> {
        self.read(|dom| dom.get(node).and_then(|data| data.text.clone()))
    }

    pub fn set_text(&self, node: NodeId, text: impl Into<String>) {
        let text = text.into();
        self.write(|dom| {
            if let Some(data) = dom.get_mut(node) {
                data.text = Some(text);
            }
        });
    }

    // ── Attributes ───────────────────────────────────────────────────

    pub fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.read(|dom| dom.get(node).and_then(|data| data.attr(name).map(str::to_owned)))
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.read(|dom| dom.get(node).is_some_and(|data| data.has_attr(name)))
    }

    /// Set an attribute. Returns `true` when the stored value changed.
    pub fn set_attr(&self, node: NodeId, name: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        self.write(|dom| {
            dom.get_mut(node)
                .is_some_and(|data| data.set_attr(name, value))
        })
    }

    pub fn remove_attr(&self, node: NodeId, name: &str) -> bool {
        self.write(|dom| dom.get_mut(node).is_some_and(|data| data.remove_attr(name)))
    }

    /// Inspect a node's data without cloning it.
    pub fn with_node<R>(&self, node: NodeId, f: impl FnOnce(&NodeData) -> R) -> Option<R> {
        self.read(|dom| dom.get(node).map(f))
    }

    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.with_node(node, NodeData::is_disabled).unwrap_or(false)
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// First descendant of `scope` matching `selector`.
    pub fn query(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        let selector = SelectorList::parse(selector)?;
        Ok(self.read(|dom| dom.select(scope, &selector)))
    }

    /// All descendants of `scope` matching `selector`, in document order.
    pub fn query_all(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let selector = SelectorList::parse(selector)?;
        Ok(self.read(|dom| dom.select_all(scope, &selector)))
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.read(|dom| dom.query_by_id(id))
    }

    /// Resolve a factory target to a live node.
    pub fn resolve(&self, target: Target<'_>) -> Result<NodeId> {
        match target {
            Target::Node(node) if self.contains(node) => Ok(node),
            Target::Node(node) => Err(Error::DetachedNode(node)),
            Target::Selector(selector) => {
                let body = self.body();
                let selector_list = SelectorList::parse(selector)?;
                self.read(|dom| {
                    if selector_list.matches(dom, body) {
                        Some(body)
                    } else {
                        dom.select(body, &selector_list)
                    }
                })
                .ok_or_else(|| Error::NotFound(selector.to_owned()))
            }
        }
    }

    /// Serialize `node` and its subtree as HTML.
    pub fn outer_html(&self, node: NodeId) -> String {
        self.read(|dom| dom.outer_html(node))
    }

    // ── Native events ────────────────────────────────────────────────

    /// Register a native listener. Returns `false` if this exact handler was
    /// already registered for the pair.
    pub fn add_event_listener(
        &self,
        node: NodeId,
        event_type: impl Into<EventType>,
        handler: NativeHandler,
    ) -> bool {
        self.inner
            .listeners
            .borrow_mut()
            .insert((node, event_type.into()), handler)
    }

    pub fn remove_event_listener(
        &self,
        node: NodeId,
        event_type: impl Into<EventType>,
        handler: &NativeHandler,
    ) -> bool {
        self.inner
            .listeners
            .borrow_mut()
            .remove(&(node, event_type.into()), handler)
    }

    /// Total number of native listeners across every node.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Listeners attached to `node` for `event_type`.
    pub fn listener_count_on(&self, node: NodeId, event_type: impl Into<EventType>) -> usize {
        self.inner
            .listeners
            .borrow()
            .count(&(node, event_type.into()))
    }

    /// Deliver `event` to its target, then (for bubbling types) each ancestor.
    ///
    /// Returns `false` if a listener called [`DomEvent::prevent_default`].
    pub fn dispatch(&self, event: &DomEvent) -> bool {
        let target = event.target();
        let path = self.read(|dom| {
            if !dom.contains(target) {
                return Vec::new();
            }
            let mut path = vec![target];
            if event.event_type().bubbles() {
                path.extend(dom.ancestors(target));
            }
            path
        });
        log::trace!("[dom] dispatch `{}` along {} node(s)", event.event_type(), path.len());

        for node in path {
            event.set_current_target(node);
            let key = (node, event.event_type().clone());
            let handlers = self.inner.listeners.borrow().snapshot(&key);
            for h in handlers {
                // Removed by an earlier handler in this same dispatch.
                if !self.inner.listeners.borrow().contains(&key, &h) {
                    continue;
                }
                if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| h(event))) {
                    log::error!(
                        "[dom] `{}` handler panicked: {}",
                        event.event_type(),
                        panic_message(payload.as_ref())
                    );
                }
            }
            if event.is_propagation_stopped() {
                break;
            }
        }
        !event.is_default_prevented()
    }

    /// Simulate a pointer click. Disabled elements swallow the click.
    pub fn click(&self, node: NodeId) -> bool {
        if !self.contains(node) || self.is_disabled(node) {
            return false;
        }
        self.dispatch(&DomEvent::new(EventType::Click, node))
    }

    /// Dispatch a `keydown` at `node`.
    pub fn key_down(&self, node: NodeId, key: impl Into<KeyEvent>) -> bool {
        self.dispatch(&DomEvent::key_down(node, key))
    }

    pub fn pointer_enter(&self, node: NodeId) -> bool {
        self.dispatch(&DomEvent::new(EventType::PointerEnter, node))
    }

    pub fn pointer_leave(&self, node: NodeId) -> bool {
        self.dispatch(&DomEvent::new(EventType::PointerLeave, node))
    }

    // ── Focus ────────────────────────────────────────────────────────

    /// Currently focused element, if any.
    pub fn active_element(&self) -> Option<NodeId> {
        self.inner.active.get()
    }

    /// Move focus to `node`. Fires `blur` on the previous element and `focus`
    /// on the new one. Returns `false` if the node cannot take focus.
    pub fn focus(&self, node: NodeId) -> bool {
        let focusable = self
            .with_node(node, |data| {
                !data.is_disabled() && (data.has_attr("tabindex") || data.is_focusable())
            })
            .unwrap_or(false);
        if !focusable {
            log::debug!("[focus] refusing focus on {node:?}");
            return false;
        }
        let previous = self.inner.active.get();
        if previous == Some(node) {
            return true;
        }
        self.inner.active.set(Some(node));
        if let Some(previous) = previous {
            self.dispatch(&DomEvent::new(EventType::Blur, previous));
        }
        self.dispatch(&DomEvent::new(EventType::Focus, node));
        true
    }

    /// Clear focus, firing `blur` on the element that had it.
    pub fn blur(&self) {
        if let Some(previous) = self.inner.active.take() {
            self.dispatch(&DomEvent::new(EventType::Blur, previous));
        }
    }

    // ── Timers ───────────────────────────────────────────────────────

    /// Run `callback` once `delay` of virtual time has elapsed.
    pub fn set_timeout(&self, delay: Duration, callback: impl FnOnce() + 'static) -> TimerId {
        self.inner
            .timers
            .borrow_mut()
            .schedule(delay, Box::new(callback))
    }

    /// Cancel a pending timer. Returns `false` if it already fired.
    pub fn clear_timeout(&self, id: TimerId) -> bool {
        self.inner.timers.borrow_mut().cancel(id)
    }

    /// Move the virtual clock forward, firing every timer that comes due in
    /// deadline order. Timers scheduled by callbacks fire too if they fall
    /// inside the window.
    pub fn advance(&self, by: Duration) {
        let until = self.now() + by;
        loop {
            let due = self.inner.timers.borrow_mut().pop_due(until);
            match due {
                Some(callback) => callback(),
                None => break,
            }
        }
        self.inner.timers.borrow_mut().set_now(until);
    }

    /// Elapsed virtual time.
    pub fn now(&self) -> Duration {
        self.inner.timers.borrow().now()
    }

    pub fn pending_timers(&self) -> usize {
        self.inner.timers.borrow().pending()
    }

    // ── Scroll lock ──────────────────────────────────────────────────

    pub fn acquire_scroll_lock(&self) -> ScrollLockGuard {
        ScrollLockGuard::acquire(self)
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.inner.scroll_lock.count() > 0
    }

    pub fn scroll_lock_count(&self) -> usize {
        self.inner.scroll_lock.count()
    }

    // ── Ids ──────────────────────────────────────────────────────────

    /// Generate an element id not used anywhere in the document.
    pub fn unique_id(&self, prefix: &str) -> String {
        loop {
            let n = self.inner.next_uid.get() + 1;
            self.inner.next_uid.set(n);
            let candidate = format!("{prefix}-{n}");
            if self.get_element_by_id(&candidate).is_none() {
                return candidate;
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.inner.dom.borrow().len())
            .field("listeners", &self.inner.listeners.borrow().len())
            .field("active", &self.inner.active.get())
            .field("timers", &*self.inner.timers.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::builder::el;
    use crate::event::input::Key;

    fn fixture() -> (Document, NodeId, NodeId, NodeId) {
        let doc = Document::new();
        let outer = doc.mount(
            doc.body(),
            el("div")
                .id("outer")
                .child(el("button").class("inner").text("go")),
        );
        let inner = doc.children(outer)[0];
        let body = doc.body();
        (doc, body, outer, inner)
    }

    fn recorder(log: &Rc<RefCell<Vec<String>>>, label: &str) -> NativeHandler {
        let log = log.clone();
        let label = label.to_owned();
        handler(move |ev: &DomEvent| {
            log.borrow_mut()
                .push(format!("{label}:{}", ev.event_type()));
        })
    }

    #[test]
    fn click_bubbles_target_first() {
        let (doc, body, outer, inner) = fixture();
        let log = Rc::new(RefCell::new(Vec::new()));
        doc.add_event_listener(body, EventType::Click, recorder(&log, "body"));
        doc.add_event_listener(outer, EventType::Click, recorder(&log, "outer"));
        doc.add_event_listener(inner, EventType::Click, recorder(&log, "inner"));

        assert!(doc.click(inner));
        assert_eq!(
            *log.borrow(),
            vec!["inner:click", "outer:click", "body:click"]
        );
    }

    #[test]
    fn stop_propagation_and_prevent_default() {
        let (doc, body, outer, inner) = fixture();
        let log = Rc::new(RefCell::new(Vec::new()));
        doc.add_event_listener(
            outer,
            EventType::KeyDown,
            handler(|ev: &DomEvent| {
                ev.prevent_default();
                ev.stop_propagation();
            }),
        );
        doc.add_event_listener(body, EventType::KeyDown, recorder(&log, "body"));

        assert!(!doc.key_down(inner, Key::Enter));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn focus_does_not_bubble_and_blurs_previous() {
        let (doc, _body, outer, inner) = fixture();
        let log = Rc::new(RefCell::new(Vec::new()));
        doc.add_event_listener(outer, EventType::Focus, recorder(&log, "outer"));
        doc.add_event_listener(inner, EventType::Focus, recorder(&log, "inner"));
        doc.add_event_listener(inner, EventType::Blur, recorder(&log, "inner"));

        assert!(doc.focus(inner));
        assert_eq!(doc.active_element(), Some(inner));
        // A plain div without tabindex can't take focus.
        assert!(!doc.focus(outer));
        doc.set_attr(outer, "tabindex", "-1");
        assert!(doc.focus(outer));
        assert_eq!(*log.borrow(), vec!["inner:focus", "inner:blur", "outer:focus"]);
    }

    #[test]
    fn disabled_elements_swallow_clicks() {
        let (doc, _body, _outer, inner) = fixture();
        let log = Rc::new(RefCell::new(Vec::new()));
        doc.add_event_listener(inner, EventType::Click, recorder(&log, "inner"));
        doc.set_attr(inner, "disabled", "");
        assert!(!doc.click(inner));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn remove_drops_listeners_and_focus() {
        let (doc, _body, outer, inner) = fixture();
        let log = Rc::new(RefCell::new(Vec::new()));
        doc.add_event_listener(inner, EventType::Click, recorder(&log, "inner"));
        doc.add_event_listener(outer, EventType::Click, recorder(&log, "outer"));
        doc.focus(inner);
        assert_eq!(doc.listener_count(), 2);

        assert!(doc.remove(outer));
        assert_eq!(doc.listener_count(), 0);
        assert_eq!(doc.active_element(), None);
        assert!(!doc.remove(outer));
    }

    #[test]
    fn handler_panic_is_isolated() {
        let (doc, _body, _outer, inner) = fixture();
        let log = Rc::new(RefCell::new(Vec::new()));
        doc.add_event_listener(inner, EventType::Click, handler(|_| panic!("boom")));
        doc.add_event_listener(inner, EventType::Click, recorder(&log, "after"));
        doc.click(inner);
        assert_eq!(*log.borrow(), vec!["after:click"]);
    }

    #[test]
    fn resolve_targets() {
        let (doc, body, outer, _inner) = fixture();
        assert_eq!(doc.resolve("#outer".into()).ok(), Some(outer));
        assert_eq!(doc.resolve("body".into()).ok(), Some(body));
        assert!(matches!(
            doc.resolve("#missing".into()),
            Err(Error::NotFound(s)) if s == "#missing"
        ));
        assert!(matches!(
            doc.resolve("[".into()),
            Err(Error::InvalidSelector(_))
        ));
        doc.remove(outer);
        assert!(matches!(
            doc.resolve(Target::Node(outer)),
            Err(Error::DetachedNode(_))
        ));
    }

    #[test]
    fn timers_fire_on_advance() {
        let doc = Document::new();
        let fired = Rc::new(Cell::new(0));
        let f = fired.clone();
        let d = doc.clone();
        doc.set_timeout(Duration::from_millis(100), move || {
            f.set(f.get() + 1);
            // Chained zero-delay timer lands inside the same window.
            let f = f.clone();
            d.set_timeout(Duration::ZERO, move || f.set(f.get() + 10));
        });
        let cancelled = doc.set_timeout(Duration::from_millis(50), || panic!("cancelled"));
        assert!(doc.clear_timeout(cancelled));

        doc.advance(Duration::from_millis(99));
        assert_eq!(fired.get(), 0);
        doc.advance(Duration::from_millis(1));
        assert_eq!(fired.get(), 11);
        assert_eq!(doc.now(), Duration::from_millis(100));
        assert_eq!(doc.pending_timers(), 0);
    }

    #[test]
    fn unique_ids_skip_existing() {
        let doc = Document::new();
        doc.mount(doc.body(), el("div").id("tabs-1"));
        assert_eq!(doc.unique_id("tabs"), "tabs-2");
        assert_eq!(doc.unique_id("tabs"), "tabs-3");
    }
}
