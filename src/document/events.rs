//! Native (platform-level) events dispatched through the document.

use std::cell::Cell;
use std::fmt;

use crate::dom::node::NodeId;
use crate::event::input::KeyEvent;

/// Native event names understood by the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    KeyDown,
    Focus,
    Blur,
    PointerEnter,
    PointerLeave,
    Change,
    /// Any other event name.
    Other(String),
}

impl EventType {
    /// DOM spelling of the event name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Click => "click",
            Self::KeyDown => "keydown",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::PointerEnter => "pointerenter",
            Self::PointerLeave => "pointerleave",
            Self::Change => "change",
            Self::Other(name) => name,
        }
    }

    /// Whether the event walks up the ancestor chain after the target.
    pub fn bubbles(&self) -> bool {
        !matches!(
            self,
            Self::Focus | Self::Blur | Self::PointerEnter | Self::PointerLeave
        )
    }
}

impl From<&str> for EventType {
    fn from(name: &str) -> Self {
        match name {
            "click" => Self::Click,
            "keydown" => Self::KeyDown,
            "focus" => Self::Focus,
            "blur" => Self::Blur,
            "pointerenter" => Self::PointerEnter,
            "pointerleave" => Self::PointerLeave,
            "change" => Self::Change,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event travelling from its target up through the bubble path.
#[derive(Debug)]
pub struct DomEvent {
    event_type: EventType,
    target: NodeId,
    current_target: Cell<NodeId>,
    key: Option<KeyEvent>,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

impl DomEvent {
    /// Create an event of the given type aimed at `target`.
    pub fn new(event_type: impl Into<EventType>, target: NodeId) -> Self {
        Self {
            event_type: event_type.into(),
            target,
            current_target: Cell::new(target),
            key: None,
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
        }
    }

    /// Create a `keydown` event.
    pub fn key_down(target: NodeId, key: impl Into<KeyEvent>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::new(EventType::KeyDown, target)
        }
    }

    pub fn event_type(&self) -> &EventType {
        &self.event_type
    }

    /// The node the event was dispatched at.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// The node whose listeners are currently running.
    pub fn current_target(&self) -> NodeId {
        self.current_target.get()
    }

    pub(crate) fn set_current_target(&self, node: NodeId) {
        self.current_target.set(node);
    }

    /// Key payload for `keydown` events.
    pub fn key(&self) -> Option<KeyEvent> {
        self.key
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    /// Stop the event from reaching further ancestors. Listeners on the
    /// current node still run.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::input::Key;
    use slotmap::SlotMap;

    #[test]
    fn names_round_trip() {
        for name in ["click", "keydown", "focus", "blur", "pointerenter", "change"] {
            assert_eq!(EventType::from(name).as_str(), name);
        }
        assert_eq!(
            EventType::from("animationend"),
            EventType::Other("animationend".into())
        );
    }

    #[test]
    fn bubbling_rules() {
        assert!(EventType::Click.bubbles());
        assert!(EventType::KeyDown.bubbles());
        assert!(!EventType::Focus.bubbles());
        assert!(!EventType::PointerLeave.bubbles());
    }

    #[test]
    fn key_down_carries_key() {
        let mut sm: SlotMap<NodeId, ()> = SlotMap::with_key();
        let node = sm.insert(());
        let event = DomEvent::key_down(node, Key::Enter);
        assert_eq!(event.event_type(), &EventType::KeyDown);
        assert_eq!(event.key().map(|k| k.code), Some(Key::Enter));
        assert!(!event.is_default_prevented());
        event.prevent_default();
        assert!(event.is_default_prevented());
    }
}
