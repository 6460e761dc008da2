//! Keyboard input types, decoupled from any particular host.
//!
//! Widgets match on [`Key`]. A terminal host can feed crossterm events in
//! through the `From` impls; [`Key::name`] yields the DOM `KeyboardEvent.key`
//! spelling for logging and interop.

use std::borrow::Cow;
use std::ops::{BitAnd, BitOr};

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
    /// A key with no mapping.
    Unidentified,
}

impl Key {
    /// The space bar.
    pub const SPACE: Key = Key::Char(' ');

    /// DOM `KeyboardEvent.key` name (`"ArrowDown"`, `" "`, `"a"`, ...).
    pub fn name(self) -> Cow<'static, str> {
        match self {
            Key::Char(c) => Cow::Owned(c.to_string()),
            Key::Enter => "Enter".into(),
            Key::Escape => "Escape".into(),
            Key::Tab | Key::BackTab => "Tab".into(),
            Key::Backspace => "Backspace".into(),
            Key::Delete => "Delete".into(),
            Key::Left => "ArrowLeft".into(),
            Key::Right => "ArrowRight".into(),
            Key::Up => "ArrowUp".into(),
            Key::Down => "ArrowDown".into(),
            Key::Home => "Home".into(),
            Key::End => "End".into(),
            Key::PageUp => "PageUp".into(),
            Key::PageDown => "PageDown".into(),
            Key::F(n) => Cow::Owned(format!("F{n}")),
            Key::Unidentified => "Unidentified".into(),
        }
    }

    /// Enter or Space: the keys that activate a button.
    pub fn is_activation(self) -> bool {
        matches!(self, Key::Enter | Key::SPACE)
    }
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    /// Check whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check whether no modifier bits are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitAnd for Modifiers {
    type Output = Modifiers;
    fn bitand(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

/// A keyboard event with key and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event.
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }
}

impl From<Key> for KeyEvent {
    fn from(code: Key) -> Self {
        Self::new(code, Modifiers::NONE)
    }
}

// ---------------------------------------------------------------------------
// From<crossterm> conversions
// ---------------------------------------------------------------------------

/// Convert crossterm key modifiers to our `Modifiers`.
fn convert_modifiers(m: crossterm::event::KeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if m.contains(crossterm::event::KeyModifiers::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(crossterm::event::KeyModifiers::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(crossterm::event::KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    out
}

impl From<crossterm::event::KeyCode> for Key {
    fn from(code: crossterm::event::KeyCode) -> Self {
        use crossterm::event::KeyCode;

        match code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::F(n) => Key::F(n),
            _ => Key::Unidentified,
        }
    }
}

impl From<crossterm::event::KeyEvent> for KeyEvent {
    fn from(ct: crossterm::event::KeyEvent) -> Self {
        KeyEvent {
            code: Key::from(ct.code),
            modifiers: convert_modifiers(ct.modifiers),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ── Modifiers ────────────────────────────────────────────────────

    #[test]
    fn modifiers_none_is_empty() {
        assert!(Modifiers::NONE.is_empty());
    }

    #[test]
    fn modifiers_combined() {
        let mods = Modifiers::CTRL | Modifiers::ALT;
        assert!(mods.contains(Modifiers::CTRL));
        assert!(mods.contains(Modifiers::ALT));
        assert!(!mods.contains(Modifiers::SHIFT));
        assert_eq!(mods & Modifiers::CTRL, Modifiers::CTRL);
    }

    // ── Key names ────────────────────────────────────────────────────

    #[test]
    fn dom_key_names() {
        assert_eq!(Key::Down.name(), "ArrowDown");
        assert_eq!(Key::Left.name(), "ArrowLeft");
        assert_eq!(Key::SPACE.name(), " ");
        assert_eq!(Key::Char('a').name(), "a");
        assert_eq!(Key::F(5).name(), "F5");
        assert_eq!(Key::BackTab.name(), "Tab");
    }

    #[test]
    fn activation_keys() {
        assert!(Key::Enter.is_activation());
        assert!(Key::SPACE.is_activation());
        assert!(!Key::Escape.is_activation());
        assert!(!Key::Char('x').is_activation());
    }

    #[test]
    fn key_into_event() {
        let ke: KeyEvent = Key::Home.into();
        assert_eq!(ke, KeyEvent::new(Key::Home, Modifiers::NONE));
    }

    // ── From<crossterm> ──────────────────────────────────────────────

    #[test]
    fn from_crossterm_char() {
        let ct = crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char(' '),
            crossterm::event::KeyModifiers::NONE,
        );
        let ke = KeyEvent::from(ct);
        assert_eq!(ke.code, Key::SPACE);
        assert!(ke.modifiers.is_empty());
    }

    #[test]
    fn from_crossterm_arrows_and_escape() {
        use crossterm::event::KeyCode;
        assert_eq!(Key::from(KeyCode::Down), Key::Down);
        assert_eq!(Key::from(KeyCode::Up), Key::Up);
        assert_eq!(Key::from(KeyCode::Esc), Key::Escape);
        assert_eq!(Key::from(KeyCode::Insert), Key::Unidentified);
    }

    #[test]
    fn from_crossterm_modifiers() {
        let ct = crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('A'),
            crossterm::event::KeyModifiers::SHIFT | crossterm::event::KeyModifiers::ALT,
        );
        let ke = KeyEvent::from(ct);
        assert!(ke.modifiers.contains(Modifiers::SHIFT));
        assert!(ke.modifiers.contains(Modifiers::ALT));
        assert!(!ke.modifiers.contains(Modifiers::CTRL));
    }
}
