//! Declarative element builder for mounting host markup.
//!
//! ```ignore
//! use gilt_kit::dom::el;
//!
//! let markup = el("div")
//!     .attr("data-collapsible", "")
//!     .child(el("button").attr("data-collapsible-trigger", "").text("More"))
//!     .child(el("div").attr("data-collapsible-content", ""));
//! let root = doc.mount(doc.body(), markup);
//! ```

use super::node::{NodeData, NodeId};
use super::tree::Dom;

/// An element description plus its children, not yet part of any DOM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    data: NodeData,
    children: Vec<Element>,
}

/// Start building an element with the given tag.
pub fn el(tag: &str) -> Element {
    Element {
        data: NodeData::new(tag),
        children: Vec::new(),
    }
}

impl Element {
    /// Set an attribute.
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.data.set_attr(name, value);
        self
    }

    /// Set the `id` attribute.
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Add a class.
    pub fn class(mut self, class: &str) -> Self {
        self.data.add_class(class);
        self
    }

    /// Set text content.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.data.text = Some(text.into());
        self
    }

    /// Append a child element.
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Append several child elements.
    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    /// Insert the element tree under `parent`, returning the new element's id.
    pub(crate) fn mount(self, dom: &mut Dom, parent: NodeId) -> NodeId {
        let id = dom.insert_child(parent, self.data);
        for child in self.children {
            child.mount(dom, id);
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_builds_subtree() {
        let mut dom = Dom::new();
        let body = dom.insert(NodeData::new("body"));
        let root = el("ul")
            .id("list")
            .children(["a", "b"].map(|v| el("li").attr("data-value", v).text(v)))
            .mount(&mut dom, body);

        assert_eq!(dom.parent(root), Some(body));
        let items = dom.children(root);
        assert_eq!(items.len(), 2);
        assert_eq!(dom.get(items[1]).unwrap().attr("data-value"), Some("b"));
        assert_eq!(dom.get(items[1]).unwrap().text.as_deref(), Some("b"));
    }

    #[test]
    fn class_dedups() {
        let element = el("div").class("a").class("a");
        assert_eq!(element.data.attr("class"), Some("a"));
    }
}
