//! Widget lifecycle base: `Constructing → Live → Destroyed`.
//!
//! [`WidgetCore`] binds a root node in a [`Document`] and gives concrete
//! widgets the helpers they share: tracked native listeners, attribute
//! helpers, scoped queries, owned child elements, and the semantic
//! [`EventHub`]. Everything registered through it is released by
//! [`WidgetCore::teardown`].

use std::cell::{Cell, RefCell};
use std::fmt;

use crate::document::{handler, Document, DomEvent, EventType, NativeHandler};
use crate::dom::node::{NodeData, NodeId};
use crate::error::{Error, Result};
use crate::event::hub::{EventHub, Listener};

use super::detail::Detail;

// ---------------------------------------------------------------------------
// LifecycleState
// ---------------------------------------------------------------------------

/// Where a widget is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Inside the constructor; initialize has not finished.
    Constructing,
    /// Responding to DOM events and state changes.
    Live,
    /// Torn down. Nothing may be mutated or registered any more.
    Destroyed,
}

// ---------------------------------------------------------------------------
// WidgetCore
// ---------------------------------------------------------------------------

struct TrackedListener {
    node: NodeId,
    event_type: EventType,
    handler: NativeHandler,
}

/// Shared state and helpers every widget is built on.
pub struct WidgetCore {
    name: &'static str,
    doc: Document,
    root: NodeId,
    state: Cell<LifecycleState>,
    tearing_down: Cell<bool>,
    hub: EventHub<Detail>,
    listeners: RefCell<Vec<TrackedListener>>,
    owned: RefCell<Vec<NodeId>>,
}

impl WidgetCore {
    /// Bind to `root`. Fails if the node is not part of `doc`.
    pub fn new(doc: &Document, root: NodeId, name: &'static str) -> Result<Self> {
        if !doc.contains(root) {
            return Err(Error::DetachedNode(root));
        }
        log::trace!("[{name}] constructing on {root:?}");
        Ok(Self {
            name,
            doc: doc.clone(),
            root,
            state: Cell::new(LifecycleState::Constructing),
            tearing_down: Cell::new(false),
            hub: EventHub::new(),
            listeners: RefCell::new(Vec::new()),
            owned: RefCell::new(Vec::new()),
        })
    }

    /// Finish construction. Called once initialize has succeeded.
    pub fn mark_live(&self) {
        if self.state.get() == LifecycleState::Constructing {
            self.state.set(LifecycleState::Live);
            log::debug!("[{}] live", self.name);
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn state(&self) -> LifecycleState {
        self.state.get()
    }

    pub fn is_live(&self) -> bool {
        self.state.get() == LifecycleState::Live
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.get() == LifecycleState::Destroyed
    }

    fn guard(&self, what: &str) -> bool {
        if self.is_destroyed() {
            log::debug!("[{}] {what} after destroy ignored", self.name);
            return false;
        }
        true
    }

    // ── Native listeners ─────────────────────────────────────────────

    /// Register a native listener that is removed on teardown.
    pub fn add_listener(&self, node: NodeId, event_type: impl Into<EventType>, handler: NativeHandler) -> bool {
        if !self.guard("add_listener") {
            return false;
        }
        let event_type = event_type.into();
        if !self
            .doc
            .add_event_listener(node, event_type.clone(), handler.clone())
        {
            return false;
        }
        self.listeners.borrow_mut().push(TrackedListener {
            node,
            event_type,
            handler,
        });
        true
    }

    /// Closure form of [`add_listener`](Self::add_listener). Returns the
    /// handler so it can be removed individually.
    pub fn listen(
        &self,
        node: NodeId,
        event_type: impl Into<EventType>,
        f: impl Fn(&DomEvent) + 'static,
    ) -> NativeHandler {
        let h = handler(f);
        self.add_listener(node, event_type, h.clone());
        h
    }

    pub fn remove_listener(&self, node: NodeId, event_type: impl Into<EventType>, handler: &NativeHandler) -> bool {
        let event_type = event_type.into();
        self.listeners.borrow_mut().retain(|t| {
            !(t.node == node && t.event_type == event_type && std::rc::Rc::ptr_eq(&t.handler, handler))
        });
        self.doc.remove_event_listener(node, event_type, handler)
    }

    /// Native listeners currently tracked for teardown.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    // ── Attributes ───────────────────────────────────────────────────

    pub fn set_attr(&self, node: NodeId, name: &str, value: impl Into<String>) {
        if self.guard("set_attr") {
            self.doc.set_attr(node, name, value);
        }
    }

    pub fn get_attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.doc.attr(node, name)
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.doc.has_attr(node, name)
    }

    pub fn remove_attr(&self, node: NodeId, name: &str) {
        if self.guard("remove_attr") {
            self.doc.remove_attr(node, name);
        }
    }

    /// Present-or-absent boolean attribute. `force` pins the outcome;
    /// returns whether the attribute is present afterwards.
    pub fn toggle_attr(&self, node: NodeId, name: &str, force: Option<bool>) -> bool {
        let present = force.unwrap_or_else(|| !self.has_attr(node, name));
        if present {
            self.set_attr(node, name, "");
        } else {
            self.remove_attr(node, name);
        }
        self.has_attr(node, name)
    }

    pub fn set_data(&self, node: NodeId, key: &str, value: impl Into<String>) {
        self.set_attr(node, &format!("data-{key}"), value);
    }

    pub fn get_data(&self, node: NodeId, key: &str) -> Option<String> {
        self.get_attr(node, &format!("data-{key}"))
    }

    pub fn has_data(&self, node: NodeId, key: &str) -> bool {
        self.has_attr(node, &format!("data-{key}"))
    }

    pub fn remove_data(&self, node: NodeId, key: &str) {
        self.remove_attr(node, &format!("data-{key}"));
    }

    // ── Semantic events ──────────────────────────────────────────────

    /// Publish a semantic event. Returns how many listeners ran.
    pub fn emit(&self, name: &str, detail: Detail) -> usize {
        if !self.guard("emit") {
            return 0;
        }
        log::trace!("[{}] emit `{name}`: {detail:?}", self.name);
        self.hub.emit(name, detail)
    }

    pub fn on(&self, name: &str, listener: Listener<Detail>) {
        if self.guard("on") {
            self.hub.on(name, listener);
        }
    }

    pub fn once(&self, name: &str, listener: Listener<Detail>) {
        if self.guard("once") {
            self.hub.once(name, listener);
        }
    }

    pub fn off(&self, name: &str, listener: &Listener<Detail>) {
        self.hub.off(name, listener);
    }

    pub fn hub(&self) -> &EventHub<Detail> {
        &self.hub
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// First descendant of the root matching `selector`.
    pub fn query(&self, selector: &str) -> Option<NodeId> {
        self.query_in(self.root, selector)
    }

    /// Every descendant of the root matching `selector`.
    pub fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.query_all_in(self.root, selector)
    }

    /// First descendant of `scope` (which should lie inside the root).
    pub fn query_in(&self, scope: NodeId, selector: &str) -> Option<NodeId> {
        self.doc.query(scope, selector).unwrap_or_else(|err| {
            log::warn!("[{}] bad selector `{selector}`: {err}", self.name);
            None
        })
    }

    pub fn query_all_in(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        self.doc.query_all(scope, selector).unwrap_or_else(|err| {
            log::warn!("[{}] bad selector `{selector}`: {err}", self.name);
            Vec::new()
        })
    }

    // ── Owned nodes ──────────────────────────────────────────────────

    /// Create an element under `parent` that the widget owns. It is removed
    /// on teardown.
    pub fn create_child(&self, parent: NodeId, data: NodeData) -> NodeId {
        let node = self.doc.append(parent, data);
        self.owned.borrow_mut().push(node);
        node
    }

    /// The node's id, generating and assigning one if it has none.
    pub fn ensure_id(&self, node: NodeId, prefix: &str) -> String {
        match self.get_attr(node, "id").filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => {
                let id = self.doc.unique_id(prefix);
                self.set_attr(node, "id", id.clone());
                id
            }
        }
    }

    /// Log a missing optional part.
    pub fn warn_missing(&self, part: &str) {
        log::warn!("[{}] no {part} found; related behaviour is disabled", self.name);
    }

    // ── Teardown ─────────────────────────────────────────────────────

    /// First half of destroy: remove every tracked listener.
    ///
    /// Returns `false` when the widget is already destroyed (or being
    /// destroyed), in which case the caller must not run its cleanup.
    pub fn begin_teardown(&self) -> bool {
        if self.is_destroyed() || self.tearing_down.replace(true) {
            return false;
        }
        let tracked = std::mem::take(&mut *self.listeners.borrow_mut());
        let count = tracked.len();
        for t in tracked {
            self.doc.remove_event_listener(t.node, t.event_type, &t.handler);
        }
        log::trace!("[{}] removed {count} native listener(s)", self.name);
        true
    }

    /// Second half of destroy: drop owned nodes, clear the hub, mark destroyed.
    pub fn finish_teardown(&self) {
        let owned = std::mem::take(&mut *self.owned.borrow_mut());
        for node in owned {
            self.doc.remove(node);
        }
        self.hub.clear(None);
        self.state.set(LifecycleState::Destroyed);
        log::debug!("[{}] destroyed", self.name);
    }

    /// Full teardown with no widget-specific cleanup in between.
    pub fn teardown(&self) {
        if self.begin_teardown() {
            self.finish_teardown();
        }
    }
}

impl fmt::Debug for WidgetCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetCore")
            .field("name", &self.name)
            .field("root", &self.root)
            .field("state", &self.state.get())
            .field("listeners", &self.listeners.borrow().len())
            .field("owned", &self.owned.borrow().len())
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::builder::el;
    use crate::event::hub::listener;
    use std::rc::Rc;

    fn setup() -> (Document, NodeId, WidgetCore) {
        let (doc, root) = Document::with_markup(
            el("div")
                .id("w")
                .child(el("button").attr("data-part", "trigger"))
                .child(el("div").attr("data-part", "content")),
        );
        let core = WidgetCore::new(&doc, root, "test").unwrap();
        (doc, root, core)
    }

    #[test]
    fn starts_constructing_then_live() {
        let (_doc, _root, core) = setup();
        assert_eq!(core.state(), LifecycleState::Constructing);
        core.mark_live();
        assert_eq!(core.state(), LifecycleState::Live);
    }

    #[test]
    fn rejects_detached_root() {
        let (doc, root, _core) = setup();
        doc.remove(root);
        assert!(matches!(
            WidgetCore::new(&doc, root, "test"),
            Err(Error::DetachedNode(_))
        ));
    }

    #[test]
    fn scoped_queries_stay_inside_root() {
        let (doc, _root, core) = setup();
        doc.mount(doc.body(), el("button").attr("data-part", "trigger"));
        assert_eq!(core.query_all("[data-part=trigger]").len(), 1);
        assert!(core.query("[data-part=content]").is_some());
        assert!(core.query("[").is_none());
    }

    #[test]
    fn attribute_helpers() {
        let (_doc, root, core) = setup();
        core.set_data(root, "state", "open");
        assert_eq!(core.get_data(root, "state").as_deref(), Some("open"));
        assert!(core.toggle_attr(root, "data-disabled", None));
        assert!(!core.toggle_attr(root, "data-disabled", None));
        assert!(core.toggle_attr(root, "hidden", Some(true)));
        core.remove_data(root, "state");
        assert!(!core.has_data(root, "state"));
    }

    #[test]
    fn ensure_id_keeps_existing() {
        let (_doc, root, core) = setup();
        assert_eq!(core.ensure_id(root, "x"), "w");
        let trigger = core.query("button").unwrap();
        let generated = core.ensure_id(trigger, "test-trigger");
        assert_eq!(generated, "test-trigger-1");
        assert_eq!(core.ensure_id(trigger, "test-trigger"), generated);
    }

    #[test]
    fn teardown_releases_everything() {
        let (doc, root, core) = setup();
        let trigger = core.query("button").unwrap();
        let clicks = Rc::new(std::cell::Cell::new(0));
        let c = clicks.clone();
        core.listen(trigger, EventType::Click, move |_| c.set(c.get() + 1));
        let owned = core.create_child(root, NodeData::new("input"));
        core.on("valueChange", listener(|_| {}));
        core.mark_live();

        doc.click(trigger);
        assert_eq!(clicks.get(), 1);

        core.teardown();
        assert!(core.is_destroyed());
        assert_eq!(doc.listener_count(), 0);
        assert!(!doc.contains(owned));
        assert!(core.hub().is_empty());

        doc.click(trigger);
        assert_eq!(clicks.get(), 1);

        // No mutation or registration after destroy.
        core.set_attr(root, "data-late", "1");
        assert!(!doc.has_attr(root, "data-late"));
        assert_eq!(core.emit("valueChange", Detail::Open(true)), 0);
        assert!(!core.add_listener(trigger, EventType::Click, handler(|_| {})));
        core.teardown();
    }

    #[test]
    fn remove_listener_untracks() {
        let (doc, _root, core) = setup();
        let trigger = core.query("button").unwrap();
        let h = core.listen(trigger, EventType::Click, |_| {});
        assert_eq!(core.listener_count(), 1);
        assert!(core.remove_listener(trigger, EventType::Click, &h));
        assert_eq!(core.listener_count(), 0);
        assert_eq!(doc.listener_count(), 0);
    }
}
