//! Pilot: programmatic interaction with a headless document.
//!
//! The `Pilot` wraps a [`Document`] and provides methods to simulate user
//! input (clicks, key presses, hover, focus), advance the virtual clock, and
//! inspect the resulting markup.

use std::time::Duration;

use crate::document::{Document, Target};
use crate::dom::builder::Element;
use crate::dom::node::NodeId;
use crate::event::input::{Key, KeyEvent, Modifiers};

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless user for tests.
///
/// Targets are selectors resolved against the whole document or node ids.
/// A target that does not resolve is logged and the action reports `false`.
///
/// # Examples
///
/// ```ignore
/// use gilt_kit::testing::Pilot;
/// use gilt_kit::widgets::{Switch, SwitchConfig};
/// use gilt_kit::widget::Component;
/// use gilt_kit::dom::el;
///
/// let (pilot, root) = Pilot::with_markup(el("button").id("wifi"));
/// let switch = Switch::new(pilot.doc(), root, SwitchConfig::new()).unwrap();
/// pilot.click("#wifi");
/// assert!(switch.is_checked());
/// ```
#[derive(Clone, Default)]
pub struct Pilot {
    doc: Document,
}

impl Pilot {
    /// Pilot over an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pilot over a document with `markup` mounted under the body.
    pub fn with_markup(markup: Element) -> (Self, NodeId) {
        let (doc, root) = Document::with_markup(markup);
        (Self { doc }, root)
    }

    /// Pilot over an existing document.
    pub fn from_document(doc: &Document) -> Self {
        Self { doc: doc.clone() }
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    fn resolve<'a>(&self, target: impl Into<Target<'a>>) -> Option<NodeId> {
        match self.doc.resolve(target.into()) {
            Ok(node) => Some(node),
            Err(err) => {
                log::warn!("[pilot] {err}");
                None
            }
        }
    }

    // ── Pointer ──────────────────────────────────────────────────────

    /// Click `target`. Returns `false` if it did not resolve, was disabled,
    /// or a handler prevented the default action.
    pub fn click<'a>(&self, target: impl Into<Target<'a>>) -> bool {
        self.resolve(target).is_some_and(|node| self.doc.click(node))
    }

    /// Pointer moves onto `target`.
    pub fn hover<'a>(&self, target: impl Into<Target<'a>>) -> bool {
        self.resolve(target).is_some_and(|node| self.doc.pointer_enter(node))
    }

    /// Pointer leaves `target`.
    pub fn unhover<'a>(&self, target: impl Into<Target<'a>>) -> bool {
        self.resolve(target).is_some_and(|node| self.doc.pointer_leave(node))
    }

    // ── Keyboard ─────────────────────────────────────────────────────

    /// Press `key` on the focused element, or the body when nothing has focus.
    pub fn press_key(&self, key: Key) -> bool {
        self.press_key_with(key, Modifiers::NONE)
    }

    /// Press `key` with `modifiers` on the focused element.
    pub fn press_key_with(&self, key: Key, modifiers: Modifiers) -> bool {
        let node = self.doc.active_element().unwrap_or_else(|| self.doc.body());
        self.doc.key_down(node, KeyEvent::new(key, modifiers))
    }

    /// Press `key` on `target` regardless of focus.
    pub fn press_key_on<'a>(&self, target: impl Into<Target<'a>>, key: impl Into<KeyEvent>) -> bool {
        self.resolve(target).is_some_and(|node| self.doc.key_down(node, key))
    }

    /// Press each key in order on the focused element.
    pub fn press_keys(&self, keys: &[Key]) {
        for &key in keys {
            self.press_key(key);
        }
    }

    // ── Focus ────────────────────────────────────────────────────────

    pub fn focus<'a>(&self, target: impl Into<Target<'a>>) -> bool {
        self.resolve(target).is_some_and(|node| self.doc.focus(node))
    }

    pub fn blur(&self) {
        self.doc.blur();
    }

    /// The focused element.
    pub fn focused(&self) -> Option<NodeId> {
        self.doc.active_element()
    }

    // ── Time ─────────────────────────────────────────────────────────

    /// Advance the document clock, firing due timers.
    pub fn advance(&self, by: Duration) {
        self.doc.advance(by);
    }

    /// Advance the document clock by `ms` milliseconds.
    pub fn wait_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    // ── Query ────────────────────────────────────────────────────────

    /// First element matching `selector` anywhere in the document.
    pub fn query(&self, selector: &str) -> Option<NodeId> {
        self.resolve(selector)
    }

    /// Attribute value on `target`.
    pub fn attr<'a>(&self, target: impl Into<Target<'a>>, name: &str) -> Option<String> {
        self.resolve(target).and_then(|node| self.doc.attr(node, name))
    }

    pub fn has_attr<'a>(&self, target: impl Into<Target<'a>>, name: &str) -> bool {
        self.resolve(target).is_some_and(|node| self.doc.has_attr(node, name))
    }

    /// Compact HTML of `target`, or an empty string when it does not resolve.
    pub fn html<'a>(&self, target: impl Into<Target<'a>>) -> String {
        self.resolve(target)
            .map(|node| self.doc.outer_html(node))
            .unwrap_or_default()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
