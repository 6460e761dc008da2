//! Semantic event hub: per-widget publish/subscribe keyed by event name.
//!
//! Dispatch is synchronous and depth-first. Each listener invocation runs
//! under `catch_unwind`, so one panicking listener is logged and the rest
//! still receive the event.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use super::registry::Registry;

/// Event object handed to semantic listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomEvent<D> {
    /// Event name, e.g. `"valueChange"`.
    pub event_type: String,
    /// Event payload.
    pub detail: D,
}

/// Shared listener handle. Identity (`Rc::ptr_eq`) decides duplicates and removal.
pub type Listener<D> = Rc<dyn Fn(&CustomEvent<D>)>;

/// Wrap a closure as a [`Listener`].
pub fn listener<D: 'static>(f: impl Fn(&CustomEvent<D>) + 'static) -> Listener<D> {
    Rc::new(f)
}

/// Publish/subscribe registry for one widget instance.
pub struct EventHub<D: 'static> {
    listeners: RefCell<Registry<String, dyn Fn(&CustomEvent<D>)>>,
    /// Listeners registered through [`EventHub::once`].
    once: RefCell<Registry<String, dyn Fn(&CustomEvent<D>)>>,
}

impl<D: 'static> EventHub<D> {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(Registry::new()),
            once: RefCell::new(Registry::new()),
        }
    }

    /// Register `listener` for `event`. Registering the same listener twice
    /// is a no-op.
    pub fn on(&self, event: &str, listener: Listener<D>) {
        self.listeners.borrow_mut().insert(event.to_owned(), listener);
    }

    /// Register `listener` for a single delivery of `event`.
    ///
    /// The listener is unregistered before it runs, so a re-entrant emit of
    /// the same event from inside its body does not reach it again.
    ///
    /// A listener already registered for `event` (through `on` or `once`)
    /// keeps its existing registration; it does not become one-shot.
    pub fn once(&self, event: &str, listener: Listener<D>) {
        let inserted = self
            .listeners
            .borrow_mut()
            .insert(event.to_owned(), listener.clone());
        if inserted {
            self.once.borrow_mut().insert(event.to_owned(), listener);
        } else {
            log::debug!("[hub] once({event}) ignored: listener already registered");
        }
    }

    /// Unregister `listener` from `event`. Unknown listeners are ignored.
    pub fn off(&self, event: &str, listener: &Listener<D>) {
        self.listeners.borrow_mut().remove(event, listener);
        self.once.borrow_mut().remove(event, listener);
    }

    /// Deliver `detail` to every listener currently registered for `event`.
    ///
    /// Listeners removed by an earlier listener during the same dispatch are
    /// skipped. Returns the number of listeners that ran to completion.
    pub fn emit(&self, event: &str, detail: D) -> usize {
        let snapshot = self.listeners.borrow().snapshot(event);
        if snapshot.is_empty() {
            return 0;
        }

        let payload = CustomEvent {
            event_type: event.to_owned(),
            detail,
        };
        let mut delivered = 0;
        for listener in snapshot {
            if !self.listeners.borrow().contains(event, &listener) {
                continue;
            }
            if self.once.borrow_mut().remove(event, &listener) {
                self.listeners.borrow_mut().remove(event, &listener);
            }
            match panic::catch_unwind(AssertUnwindSafe(|| listener(&payload))) {
                Ok(()) => delivered += 1,
                Err(cause) => {
                    log::error!(
                        "[event] listener for `{}` panicked: {}",
                        event,
                        panic_message(cause.as_ref())
                    );
                }
            }
        }
        delivered
    }

    /// Remove every listener for `event`, or for all events when `None`.
    pub fn clear(&self, event: Option<&str>) {
        match event {
            Some(name) => {
                self.listeners.borrow_mut().clear_key(name);
                self.once.borrow_mut().clear_key(name);
            }
            None => {
                self.listeners.borrow_mut().clear();
                self.once.borrow_mut().clear();
            }
        }
    }

    /// Number of listeners registered for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.borrow().count(event)
    }

    /// Whether no listener is registered for any event.
    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }
}

impl<D: 'static> Default for EventHub<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: 'static> fmt::Debug for EventHub<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("listeners", &*self.listeners.borrow())
            .finish()
    }
}

pub(crate) fn panic_message(cause: &(dyn Any + Send)) -> &str {
    if let Some(message) = cause.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = cause.downcast_ref::<String>() {
        message.as_str()
    } else {
        "<non-string panic payload>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug, Clone, PartialEq)]
    struct Payload {
        a: i32,
    }

    fn counter() -> (Rc<Cell<u32>>, Listener<Payload>) {
        let count = Rc::new(Cell::new(0));
        let inner = count.clone();
        (count, listener(move |_| inner.set(inner.get() + 1)))
    }

    #[test]
    fn on_emit_delivers_detail() {
        let hub = EventHub::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        hub.on(
            "x",
            listener(move |e: &CustomEvent<Payload>| {
                sink.borrow_mut().push((e.event_type.clone(), e.detail.a))
            }),
        );
        assert_eq!(hub.emit("x", Payload { a: 1 }), 1);
        assert_eq!(*seen.borrow(), vec![("x".to_string(), 1)]);
    }

    #[test]
    fn off_stops_delivery() {
        let hub = EventHub::new();
        let (count, fun) = counter();
        hub.on("x", fun.clone());
        hub.off("x", &fun);
        hub.emit("x", Payload { a: 0 });
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn off_unknown_is_noop() {
        let hub: EventHub<Payload> = EventHub::new();
        let (_, fun) = counter();
        hub.off("x", &fun);
        assert!(hub.is_empty());
    }

    #[test]
    fn duplicate_registration_fires_once() {
        let hub = EventHub::new();
        let (count, fun) = counter();
        hub.on("x", fun.clone());
        hub.on("x", fun.clone());
        hub.emit("x", Payload { a: 0 });
        assert_eq!(count.get(), 1);
        assert_eq!(hub.listener_count("x"), 1);
    }

    #[test]
    fn once_fires_a_single_time() {
        let hub = EventHub::new();
        let (count, fun) = counter();
        hub.once("x", fun);
        hub.emit("x", Payload { a: 1 });
        hub.emit("x", Payload { a: 2 });
        assert_eq!(count.get(), 1);
        assert_eq!(hub.listener_count("x"), 0);
    }

    #[test]
    fn once_keeps_an_existing_registration() {
        let hub = EventHub::new();
        let (count, fun) = counter();
        hub.on("x", fun.clone());
        hub.once("x", fun);
        hub.emit("x", Payload { a: 1 });
        hub.emit("x", Payload { a: 2 });
        assert_eq!(count.get(), 2);
        assert_eq!(hub.listener_count("x"), 1);
    }

    #[test]
    fn once_is_removed_before_reentrant_emit() {
        let hub = Rc::new(EventHub::new());
        let count = Rc::new(Cell::new(0));
        let (inner_hub, inner_count) = (Rc::downgrade(&hub), count.clone());
        hub.once(
            "x",
            listener(move |_: &CustomEvent<Payload>| {
                inner_count.set(inner_count.get() + 1);
                if let Some(hub) = inner_hub.upgrade() {
                    hub.emit("x", Payload { a: 9 });
                }
            }),
        );
        hub.emit("x", Payload { a: 1 });
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn panicking_listener_is_isolated() {
        let hub = EventHub::new();
        let (count, fun) = counter();
        hub.on("x", listener(|_: &CustomEvent<Payload>| panic!("boom")));
        hub.on("x", fun);
        assert_eq!(hub.emit("x", Payload { a: 0 }), 1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn listener_removed_mid_dispatch_is_skipped() {
        let hub = Rc::new(EventHub::new());
        let (count, second) = counter();
        let weak = Rc::downgrade(&hub);
        let target = second.clone();
        hub.on(
            "x",
            listener(move |_: &CustomEvent<Payload>| {
                if let Some(hub) = weak.upgrade() {
                    hub.off("x", &target);
                }
            }),
        );
        hub.on("x", second);
        hub.emit("x", Payload { a: 0 });
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn clear_by_name_and_all() {
        let hub = EventHub::new();
        let (_, a) = counter();
        let (_, b) = counter();
        hub.on("x", a);
        hub.once("y", b);
        hub.clear(Some("x"));
        assert_eq!(hub.listener_count("x"), 0);
        assert_eq!(hub.listener_count("y"), 1);
        hub.clear(None);
        assert!(hub.is_empty());
    }

    #[test]
    fn emit_without_listeners() {
        let hub: EventHub<Payload> = EventHub::new();
        assert_eq!(hub.emit("nobody", Payload { a: 0 }), 0);
    }
}
