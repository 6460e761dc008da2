//! Reactive state for widgets.
//!
//! - [`ValueCell`]: observable value with controlled/uncontrolled semantics.
//! - [`Subscription`]: handle for detaching a cell listener.

pub mod cell;

pub use cell::{callback, ChangeCallback, Subscription, ValueCell};
