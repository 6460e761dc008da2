//! Event system: keyed registries, the semantic event hub, keyboard input.

pub mod hub;
pub mod input;
pub mod registry;

pub use hub::{listener, CustomEvent, EventHub, Listener};
pub use input::{Key, KeyEvent, Modifiers};
pub use registry::Registry;
