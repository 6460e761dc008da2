//! DOM arena: slotmap-backed element tree with selector queries.

pub mod builder;
pub mod node;
pub mod query;
pub mod selector;
pub mod serialize;
pub mod tokenizer;
pub mod tree;

pub use builder::{el, Element};
pub use node::{NodeData, NodeId};
pub use selector::{SelectorError, SelectorList};
pub use tree::Dom;
