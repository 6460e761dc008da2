//! The `Component` trait: uniform construction, events and teardown.
//!
//! Every widget is built against a root node that already exists in a
//! [`Document`], with a typed configuration record. `create` resolves a
//! selector or node first; `destroy` runs the shared teardown around the
//! widget's own `cleanup` hook.

use crate::document::{Document, Target};
use crate::dom::node::NodeId;
use crate::error::Result;
use crate::event::hub::Listener;

use super::detail::Detail;
use super::lifecycle::{LifecycleState, WidgetCore};

// ---------------------------------------------------------------------------
// Component trait
// ---------------------------------------------------------------------------

/// Implemented by every widget.
pub trait Component: Sized {
    /// Widget name used in log messages and generated ids.
    const NAME: &'static str;

    /// Typed configuration record.
    type Config: Default;

    /// Bind to `root` and run initialize. Errors leave no widget behind.
    fn new(doc: &Document, root: NodeId, config: Self::Config) -> Result<Self>;

    /// The shared lifecycle base.
    fn core(&self) -> &WidgetCore;

    /// Widget-specific teardown, run after native listeners are removed and
    /// before the widget is marked destroyed.
    fn cleanup(&self) {}

    /// Resolve `target` in `doc`, then construct.
    fn create<'a>(doc: &Document, target: impl Into<Target<'a>>, config: Self::Config) -> Result<Self> {
        let root = doc.resolve(target.into())?;
        Self::new(doc, root, config)
    }

    /// Tear the widget down. Calling it again is a no-op.
    fn destroy(&self) {
        let core = self.core();
        if core.begin_teardown() {
            self.cleanup();
            core.finish_teardown();
        }
    }

    fn root(&self) -> NodeId {
        self.core().root()
    }

    fn state(&self) -> LifecycleState {
        self.core().state()
    }

    fn is_destroyed(&self) -> bool {
        self.core().is_destroyed()
    }

    /// Subscribe to a semantic event (`"valueChange"`, `"openChange"`, ...).
    fn on(&self, event: &str, listener: Listener<Detail>) {
        self.core().on(event, listener);
    }

    fn once(&self, event: &str, listener: Listener<Detail>) {
        self.core().once(event, listener);
    }

    fn off(&self, event: &str, listener: &Listener<Detail>) {
        self.core().off(event, listener);
    }
}
