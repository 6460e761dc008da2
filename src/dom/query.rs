//! DOM queries: scoped selector matching, by id, generic predicate matching.
//!
//! Scoped queries only ever look at descendants of the scope node, in
//! document order. The scope node itself is never returned.

use super::node::{NodeData, NodeId};
use super::selector::SelectorList;
use super::tree::Dom;

impl Dom {
    /// First descendant of `scope` matching `selector`.
    pub fn select(&self, scope: NodeId, selector: &SelectorList) -> Option<NodeId> {
        self.descendants(scope)
            .find(|&node| selector.matches(self, node))
    }

    /// All descendants of `scope` matching `selector`, in document order.
    pub fn select_all(&self, scope: NodeId, selector: &SelectorList) -> Vec<NodeId> {
        self.descendants(scope)
            .filter(|&node| selector.matches(self, node))
            .collect()
    }

    /// Find the first node (anywhere in the arena) whose `id` attribute matches.
    pub fn query_by_id(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, data)| data.id() == Some(id))
            .map(|(node_id, _)| node_id)
    }

    /// Descendants of `scope` matching an arbitrary predicate, in document order.
    pub fn query_all(&self, scope: NodeId, predicate: impl Fn(&NodeData) -> bool) -> Vec<NodeId> {
        self.descendants(scope)
            .filter(|&node| self.get(node).is_some_and(&predicate))
            .collect()
    }

    fn descendants(&self, scope: NodeId) -> impl Iterator<Item = NodeId> {
        self.walk_depth_first(scope).into_iter().skip(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a test tree for queries:
    /// ```text
    ///   body
    ///    ├─ div#first[data-tabs]
    ///    │   ├─ button[data-tabs-trigger=a]
    ///    │   └─ button[data-tabs-trigger=b][disabled]
    ///    └─ div#second[data-tabs]
    ///        └─ button[data-tabs-trigger=c]
    /// ```
    fn build_query_tree() -> (Dom, NodeId, NodeId, NodeId) {
        let mut dom = Dom::new();
        let body = dom.insert(NodeData::new("body"));
        let first = dom.insert_child(
            body,
            NodeData::new("div").with_id("first").with_attr("data-tabs", ""),
        );
        dom.insert_child(first, NodeData::new("button").with_attr("data-tabs-trigger", "a"));
        dom.insert_child(
            first,
            NodeData::new("button")
                .with_attr("data-tabs-trigger", "b")
                .with_attr("disabled", ""),
        );
        let second = dom.insert_child(
            body,
            NodeData::new("div").with_id("second").with_attr("data-tabs", ""),
        );
        dom.insert_child(second, NodeData::new("button").with_attr("data-tabs-trigger", "c"));
        (dom, body, first, second)
    }

    fn sel(input: &str) -> SelectorList {
        SelectorList::parse(input).unwrap()
    }

    fn trigger_values(dom: &Dom, nodes: &[NodeId]) -> Vec<String> {
        nodes
            .iter()
            .filter_map(|&n| dom.get(n)?.attr("data-tabs-trigger").map(str::to_owned))
            .collect()
    }

    #[test]
    fn select_all_is_scoped() {
        let (dom, _body, first, second) = build_query_tree();
        let in_first = dom.select_all(first, &sel("[data-tabs-trigger]"));
        assert_eq!(trigger_values(&dom, &in_first), vec!["a", "b"]);
        let in_second = dom.select_all(second, &sel("[data-tabs-trigger]"));
        assert_eq!(trigger_values(&dom, &in_second), vec!["c"]);
    }

    #[test]
    fn select_excludes_scope() {
        let (dom, _body, first, _second) = build_query_tree();
        assert!(dom.select(first, &sel("[data-tabs]")).is_none());
    }

    #[test]
    fn select_from_body_finds_first_in_document_order() {
        let (dom, body, first, _second) = build_query_tree();
        assert_eq!(dom.select(body, &sel("[data-tabs]")), Some(first));
    }

    #[test]
    fn query_by_id() {
        let (dom, _body, _first, second) = build_query_tree();
        assert_eq!(dom.query_by_id("second"), Some(second));
        assert!(dom.query_by_id("nonexistent").is_none());
    }

    #[test]
    fn query_all_predicate() {
        let (dom, body, ..) = build_query_tree();
        let disabled = dom.query_all(body, NodeData::is_disabled);
        assert_eq!(trigger_values(&dom, &disabled), vec!["b"]);
    }

    #[test]
    fn query_on_empty_scope() {
        let mut dom = Dom::new();
        let body = dom.insert(NodeData::new("body"));
        assert!(dom.select(body, &sel("*")).is_none());
        assert!(dom.query_all(body, |_| true).is_empty());
    }
}
