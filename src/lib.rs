//! # gilt-kit
//!
//! Headless, accessible UI widgets over a retained document tree.
//!
//! gilt-kit attaches behaviour to existing markup: ARIA roles and states,
//! keyboard interaction, focus handling, and change notification. It owns
//! no styling and no rendering. Every widget follows the same lifecycle
//! (construct, live, destroyed) and keeps its state in controlled or
//! uncontrolled value cells.
//!
//! ## Core Systems
//!
//! - **[`dom`]**: Slotmap-backed DOM arena with tree operations and selector matching
//! - **[`document`]**: Shared document: native events, focus, timers, scroll lock
//! - **[`event`]**: Listener registries, the semantic event hub, keyboard input
//! - **[`reactive`]**: Controlled/uncontrolled value cells
//! - **[`widget`]**: Lifecycle core, `Component` trait, shared widget plumbing
//! - **[`widgets`]**: Accordion, Checkbox, Collapsible, Dialog, RadioGroup, Switch, Tabs, Tooltip
//! - **[`testing`]**: Headless pilot and snapshot helpers

pub mod error;

// Core systems
pub mod document;
pub mod dom;

// Events and reactivity
pub mod event;
pub mod reactive;

// Widget system
pub mod widget;
pub mod widgets;

// Testing
pub mod testing;

pub use document::{Document, DomEvent, EventType, Target};
pub use error::{Error, Result};
pub use event::{listener, CustomEvent, Key, KeyEvent, Modifiers};
pub use reactive::ValueCell;
pub use widget::{CheckedState, Component, Detail, LifecycleState};
