//! Headless testing framework: Pilot, snapshot helpers.
//!
//! Use the [`Pilot`] to drive widgets through a [`Document`](crate::document::Document)
//! the way a user would. Use [`render_to_string`] and related helpers to
//! capture markup as indented text for snapshot-style assertions.

pub mod pilot;
pub mod snapshot;

pub use pilot::Pilot;
pub use snapshot::{render_attrs, render_to_string, states};
