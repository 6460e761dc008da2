//! Snapshot rendering helpers.
//!
//! Functions for converting document subtrees into indented plain text
//! suitable for `insta` snapshots and line-by-line assertions.

use std::fmt::Write;

use crate::document::Document;
use crate::dom::node::NodeId;
use crate::dom::tree::Dom;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Render `node` and its subtree as indented markup, one element per line.
///
/// Each level indents by two spaces. Text content follows the opening tag on
/// the same line. Closing tags are omitted. The final line has no trailing
/// newline; a stale id renders as an empty string.
///
/// # Examples
///
/// ```ignore
/// use gilt_kit::testing::render_to_string;
///
/// let out = render_to_string(&doc, root);
/// insta::assert_snapshot!(out, @r#"
/// <div data-state="closed">
///   <button aria-expanded="false">More
/// "#);
/// ```
pub fn render_to_string(doc: &Document, node: NodeId) -> String {
    doc.read(|dom| {
        let mut lines = Vec::new();
        write_lines(dom, node, 0, None, &mut lines);
        lines.join("\n")
    })
}

/// Like [`render_to_string`], but only the listed attributes are shown.
///
/// Useful when ids or other generated values would make a snapshot unstable.
pub fn render_attrs(doc: &Document, node: NodeId, attrs: &[&str]) -> String {
    doc.read(|dom| {
        let mut lines = Vec::new();
        write_lines(dom, node, 0, Some(attrs), &mut lines);
        lines.join("\n")
    })
}

/// The `data-state` of every element under `node` (inclusive) that has one,
/// as `tag=state` pairs in document order.
pub fn states(doc: &Document, node: NodeId) -> Vec<String> {
    doc.read(|dom| {
        dom.walk_depth_first(node)
            .into_iter()
            .filter_map(|id| {
                let data = dom.get(id)?;
                Some(format!("{}={}", data.tag, data.attr("data-state")?))
            })
            .collect()
    })
}

fn write_lines(
    dom: &Dom,
    node: NodeId,
    depth: usize,
    filter: Option<&[&str]>,
    lines: &mut Vec<String>,
) {
    let Some(data) = dom.get(node) else {
        return;
    };
    let mut line = format!("{:indent$}<{}", "", data.tag, indent = depth * 2);
    for (name, value) in data.attributes() {
        if filter.is_some_and(|keep| !keep.contains(&name)) {
            continue;
        }
        let _ = write!(line, " {name}=\"{value}\"");
    }
    line.push('>');
    if let Some(text) = &data.text {
        line.push_str(text);
    }
    lines.push(line);
    for &child in dom.children(node) {
        write_lines(dom, child, depth + 1, filter, lines);
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::builder::el;
    use pretty_assertions::assert_eq;

    fn doc() -> (Document, NodeId) {
        Document::with_markup(
            el("div")
                .attr("data-state", "open")
                .child(el("button").id("t").attr("data-state", "open").text("Go"))
                .child(el("p").child(el("span").text("deep"))),
        )
    }

    #[test]
    fn renders_indented_tree() {
        let (doc, root) = doc();
        insta::assert_snapshot!(render_to_string(&doc, root), @r#"
        <div data-state="open">
          <button id="t" data-state="open">Go
          <p>
            <span>deep
        "#);
    }

    #[test]
    fn filters_attributes() {
        let (doc, root) = doc();
        assert_eq!(
            render_attrs(&doc, root, &["data-state"]),
            "<div data-state=\"open\">\n  <button data-state=\"open\">Go\n  <p>\n    <span>deep"
        );
    }

    #[test]
    fn collects_states() {
        let (doc, root) = doc();
        assert_eq!(states(&doc, root), vec!["div=open", "button=open"]);
    }

    #[test]
    fn stale_node_renders_empty() {
        let (doc, root) = doc();
        doc.remove(root);
        assert_eq!(render_to_string(&doc, root), "");
    }
}
