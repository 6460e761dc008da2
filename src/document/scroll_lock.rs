//! Reference-counted body scroll lock.
//!
//! Every modal that needs the page behind it frozen holds a
//! [`ScrollLockGuard`]. The body is locked while at least one guard is alive;
//! the last release restores whatever inline style the body had before.

use std::cell::{Cell, RefCell};

use super::Document;

const LOCK_ATTR: &str = "data-scroll-locked";
const LOCK_STYLE: &str = "overflow: hidden";

#[derive(Debug, Default)]
pub(crate) struct ScrollLockState {
    count: Cell<usize>,
    /// Body `style` before the first lock; `None` when it had none.
    saved_style: RefCell<Option<String>>,
}

impl ScrollLockState {
    pub(crate) fn count(&self) -> usize {
        self.count.get()
    }
}

/// Holds one reference on the document scroll lock. Dropping it releases.
#[derive(Debug)]
#[must_use = "the scroll lock is released as soon as the guard is dropped"]
pub struct ScrollLockGuard {
    doc: Document,
    released: bool,
}

impl ScrollLockGuard {
    pub(crate) fn acquire(doc: &Document) -> Self {
        let state = &doc.inner.scroll_lock;
        let count = state.count.get() + 1;
        state.count.set(count);
        if count == 1 {
            let body = doc.body();
            *state.saved_style.borrow_mut() = doc.attr(body, "style");
            doc.set_attr(body, LOCK_ATTR, "");
            doc.set_attr(body, "style", LOCK_STYLE);
            log::debug!("[scroll-lock] body locked");
        }
        Self {
            doc: doc.clone(),
            released: false,
        }
    }

    /// Release explicitly. Equivalent to dropping the guard.
    pub fn release(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let state = &self.doc.inner.scroll_lock;
        let count = state.count.get().saturating_sub(1);
        state.count.set(count);
        if count == 0 {
            let body = self.doc.body();
            self.doc.remove_attr(body, LOCK_ATTR);
            match state.saved_style.borrow_mut().take() {
                Some(style) => {
                    self.doc.set_attr(body, "style", style);
                }
                None => {
                    self.doc.remove_attr(body, "style");
                }
            }
            log::debug!("[scroll-lock] body unlocked");
        }
    }
}

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        self.release_once();
    }
}
