//! Widget system: lifecycle base, component trait, shared helpers.

pub mod detail;
pub mod form;
pub mod lifecycle;
pub mod roving;
pub mod traits;

pub use detail::{CheckedState, Detail};
pub use form::{FormMirror, MirrorEvents};
pub use lifecycle::{LifecycleState, WidgetCore};
pub use roving::{navigate, Orientation};
pub use traits::Component;
