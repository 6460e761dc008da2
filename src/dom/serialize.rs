//! Markup serialization for debugging and snapshot tests.

use std::fmt::Write;

use super::node::NodeId;
use super::tree::Dom;

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &["input", "br", "hr", "img", "meta", "link"];

impl Dom {
    /// Serialize `node` and its subtree as compact HTML.
    ///
    /// Attributes keep insertion order; text precedes child elements.
    /// Returns an empty string for a stale id.
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(&mut out, node);
        out
    }

    fn write_node(&self, out: &mut String, node: NodeId) {
        let Some(data) = self.get(node) else {
            return;
        };
        let _ = write!(out, "<{}", data.tag);
        for (name, value) in data.attributes() {
            let _ = write!(out, " {}=\"{}\"", name, escape(value, true));
        }
        out.push('>');
        if VOID_ELEMENTS.contains(&data.tag.as_str()) {
            return;
        }
        if let Some(text) = &data.text {
            out.push_str(&escape(text, false));
        }
        for &child in self.children(node) {
            self.write_node(out, child);
        }
        let _ = write!(out, "</{}>", data.tag);
    }
}

fn escape(input: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::NodeData;

    #[test]
    fn serializes_nested_markup() {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("div").with_attr("data-state", "open"));
        dom.insert_child(root, NodeData::new("span").with_text("a < b"));
        dom.insert_child(root, NodeData::new("input").with_attr("type", "checkbox"));
        assert_eq!(
            dom.outer_html(root),
            r#"<div data-state="open"><span>a &lt; b</span><input type="checkbox"></div>"#
        );
    }

    #[test]
    fn escapes_attribute_quotes() {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("p").with_attr("title", "say \"hi\" & go"));
        assert_eq!(
            dom.outer_html(root),
            r#"<p title="say &quot;hi&quot; &amp; go"></p>"#
        );
    }

    #[test]
    fn stale_node_is_empty() {
        let mut dom = Dom::new();
        let id = dom.insert(NodeData::new("div"));
        dom.remove(id);
        assert_eq!(dom.outer_html(id), "");
    }
}
