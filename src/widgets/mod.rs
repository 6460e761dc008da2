//! Built-in widgets: Accordion, Checkbox, Collapsible, Dialog, RadioGroup,
//! Switch, Tabs, Tooltip.

pub mod accordion;
pub mod checkbox;
pub mod collapsible;
pub mod dialog;
pub mod radio_group;
pub mod switch;
pub mod tabs;
pub mod tooltip;

pub use accordion::{Accordion, AccordionConfig, AccordionMode};
pub use checkbox::{Checkbox, CheckboxConfig};
pub use collapsible::{Collapsible, CollapsibleConfig};
pub use dialog::{Dialog, DialogConfig};
pub use radio_group::{RadioGroup, RadioGroupConfig};
pub use switch::{Switch, SwitchConfig};
pub use tabs::{ActivationMode, Tabs, TabsConfig};
pub use tooltip::{Tooltip, TooltipConfig};

use std::rc::Rc;

use crate::document::{Document, DomEvent};
use crate::dom::node::NodeId;

/// Native handler that forwards to the widget state while it is alive.
///
/// Handlers hold a `Weak` so the document's listener table never keeps a
/// widget alive.
pub(crate) fn bind<T: 'static>(
    inner: &Rc<T>,
    f: impl Fn(&Rc<T>, &DomEvent) + 'static,
) -> impl Fn(&DomEvent) + 'static {
    let weak = Rc::downgrade(inner);
    move |event: &DomEvent| {
        if let Some(inner) = weak.upgrade() {
            f(&inner, event);
        }
    }
}

/// `data-state` value for open/closed parts.
pub(crate) fn open_state(open: bool) -> &'static str {
    if open {
        "open"
    } else {
        "closed"
    }
}

/// Item-level disabled marker (`disabled` or `data-disabled`).
pub(crate) fn item_disabled(doc: &Document, node: NodeId) -> bool {
    doc.is_disabled(node)
}

/// Item value from `data-value`, or its position when absent.
pub(crate) fn item_value(doc: &Document, node: NodeId, index: usize) -> String {
    doc.attr(node, "data-value").unwrap_or_else(|| {
        log::warn!("[widgets] item without data-value; using its index {index}");
        index.to_string()
    })
}
