//! ValueCell<T>: one piece of widget state with controlled/uncontrolled
//! semantics.
//!
//! An *uncontrolled* cell owns its value and accepts writes. A *controlled*
//! cell mirrors a value owned by the embedding application: direct writes are
//! refused, user interaction is reported through the change callback, and the
//! application feeds the authoritative value back with
//! [`ValueCell::update_controlled`].
//!
//! Handles are cheap `Rc` clones so widget event handlers can capture them.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::{Error, Result};

/// External change callback, invoked with the requested/new value.
pub type ChangeCallback<T> = Rc<dyn Fn(&T)>;

/// Wrap a closure as a [`ChangeCallback`].
pub fn callback<T: 'static>(f: impl Fn(&T) + 'static) -> ChangeCallback<T> {
    Rc::new(f)
}

type Subscriber<T> = Rc<dyn Fn(&T, &T)>;

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

struct CellState<T> {
    value: RefCell<T>,
    controlled: bool,
    on_change: RefCell<Option<ChangeCallback<T>>>,
    /// `(id, listener)` in registration order.
    subscribers: RefCell<Vec<(u64, Subscriber<T>)>>,
    next_id: Cell<u64>,
    disposed: Cell<bool>,
    /// Bumped on every commit; a notification pass stops once it moves.
    generation: Cell<u64>,
}

// ---------------------------------------------------------------------------
// ValueCell
// ---------------------------------------------------------------------------

/// Observable value with controlled/uncontrolled duality.
pub struct ValueCell<T: 'static> {
    state: Rc<CellState<T>>,
}

impl<T: 'static> Clone for ValueCell<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T: Clone + PartialEq + 'static> ValueCell<T> {
    pub fn new(initial: T, controlled: bool, on_change: Option<ChangeCallback<T>>) -> Self {
        Self {
            state: Rc::new(CellState {
                value: RefCell::new(initial),
                controlled,
                on_change: RefCell::new(on_change),
                subscribers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                disposed: Cell::new(false),
                generation: Cell::new(0),
            }),
        }
    }

    /// Uncontrolled cell with no callback.
    pub fn uncontrolled(initial: T) -> Self {
        Self::new(initial, false, None)
    }

    /// Resolve a cell from widget props.
    ///
    /// `value` present makes the cell controlled (and `default` is ignored).
    /// Otherwise the cell is uncontrolled, seeded from `default`, then
    /// `fallback`. With none of the three the prop named `field` is
    /// reported as missing.
    pub fn from_props(
        field: &'static str,
        value: Option<T>,
        default: Option<T>,
        fallback: Option<T>,
        on_change: Option<ChangeCallback<T>>,
    ) -> Result<Self> {
        if let Some(value) = value {
            if default.is_some() {
                log::debug!("[cell] `{field}` is controlled; ignoring its default");
            }
            return Ok(Self::new(value, true, on_change));
        }
        default
            .or(fallback)
            .map(|initial| Self::new(initial, false, on_change))
            .ok_or(Error::MissingValue { field })
    }

    /// Clone of the current value.
    pub fn get(&self) -> T {
        self.state.value.borrow().clone()
    }

    /// Borrow the current value without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.state.value.borrow())
    }

    pub fn is_controlled(&self) -> bool {
        self.state.controlled
    }

    pub fn is_disposed(&self) -> bool {
        self.state.disposed.get()
    }

    /// Write a new value.
    ///
    /// Controlled cells refuse with a warning. Uncontrolled cells store the
    /// value, call the change callback, then notify subscribers, but only
    /// when the value actually differs.
    pub fn set(&self, new: T) {
        if self.is_disposed() {
            return;
        }
        if self.state.controlled {
            log::warn!("[cell] set() on a controlled value is ignored; update it through the owner");
            return;
        }
        if self.with(|current| *current == new) {
            return;
        }
        self.commit(new, true);
    }

    /// User-interaction write.
    ///
    /// Uncontrolled: same as [`set`](Self::set). Controlled: asks the owner
    /// for `new` through the change callback and leaves the stored value
    /// alone.
    pub fn request(&self, new: T) {
        if self.is_disposed() {
            return;
        }
        if !self.state.controlled {
            self.set(new);
            return;
        }
        if self.with(|current| *current == new) {
            return;
        }
        if let Some(cb) = self.change_callback() {
            cb(&new);
        }
    }

    /// Feed a new authoritative value into a controlled cell.
    pub fn update_controlled(&self, new: T) {
        if self.is_disposed() {
            return;
        }
        if !self.state.controlled {
            log::warn!("[cell] update_controlled() on an uncontrolled value is ignored");
            return;
        }
        if self.with(|current| *current == new) {
            return;
        }
        self.commit(new, false);
    }

    /// Register a listener called with `(new, old)` after every committed change.
    pub fn subscribe(&self, listener: impl Fn(&T, &T) + 'static) -> Subscription {
        let id = self.state.next_id.get();
        self.state.next_id.set(id + 1);
        self.state
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(listener)));
        let weak: Weak<CellState<T>> = Rc::downgrade(&self.state);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(state) = weak.upgrade() {
                    state.subscribers.borrow_mut().retain(|(sid, _)| *sid != id);
                }
            })),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.subscribers.borrow().len()
    }

    /// Drop every subscriber and the change callback. Later writes are ignored.
    pub fn dispose(&self) {
        self.state.disposed.set(true);
        self.state.subscribers.borrow_mut().clear();
        self.state.on_change.borrow_mut().take();
    }

    fn change_callback(&self) -> Option<ChangeCallback<T>> {
        self.state.on_change.borrow().clone()
    }

    /// Store `new` and notify.
    ///
    /// A write made from inside a callback or subscriber commits and
    /// notifies on its own; the outer pass then stops, so the last pair
    /// every subscriber saw always matches [`get`](Self::get).
    fn commit(&self, new: T, invoke_callback: bool) {
        let old = self.state.value.replace(new.clone());
        let generation = self.state.generation.get().wrapping_add(1);
        self.state.generation.set(generation);
        if invoke_callback {
            if let Some(cb) = self.change_callback() {
                cb(&new);
            }
        }
        let snapshot: Vec<(u64, Subscriber<T>)> = self.state.subscribers.borrow().clone();
        for (id, listener) in snapshot {
            if self.state.generation.get() != generation {
                log::debug!("[cell] notification superseded by a nested write");
                return;
            }
            let live = self
                .state
                .subscribers
                .borrow()
                .iter()
                .any(|(sid, _)| *sid == id);
            if live {
                listener(&new, &old);
            }
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for ValueCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueCell")
            .field("value", &*self.state.value.borrow())
            .field("controlled", &self.state.controlled)
            .field("subscribers", &self.state.subscribers.borrow().len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// Handle returned by [`ValueCell::subscribe`].
///
/// Dropping it does **not** unsubscribe; call [`Subscription::unsubscribe`].
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
