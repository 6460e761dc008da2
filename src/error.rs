//! Crate error type.
//!
//! Only construction can fail. Once a widget is live, problems are logged
//! through the `log` facade and the offending operation is skipped.

use crate::dom::node::NodeId;
use crate::dom::selector::SelectorError;

/// Errors raised while resolving a root node or constructing a widget.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A selector-based factory found no matching element.
    #[error("no element matches selector `{0}`")]
    NotFound(String),
    /// The given node id does not belong to the document (or was removed).
    #[error("node {0:?} is not part of the document")]
    DetachedNode(NodeId),
    /// Neither a controlled value nor a default was supplied and the widget
    /// has no fallback of its own.
    #[error("`{field}` needs either a controlled value or a default")]
    MissingValue { field: &'static str },
    /// The selector string could not be parsed.
    #[error(transparent)]
    InvalidSelector(#[from] SelectorError),
    /// Host markup is unusable for the widget.
    #[error("{widget}: {message}")]
    Markup {
        widget: &'static str,
        message: String,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
