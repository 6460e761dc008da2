//! Node types: NodeId, NodeData.

use slotmap::new_key_type;

new_key_type! {
    /// Unique identifier for a DOM node. Copy, lightweight (u64).
    pub struct NodeId;
}

/// Tags that receive keyboard focus without an explicit `tabindex`.
const NATIVELY_FOCUSABLE: &[&str] = &["button", "input", "select", "textarea", "a"];

/// Data associated with a single element.
///
/// Attributes keep their insertion order so serialized markup is stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Lowercase tag name (e.g. "div", "button").
    pub tag: String,
    attributes: Vec<(String, String)>,
    /// Text content rendered before any child elements.
    pub text: Option<String>,
}

impl NodeData {
    /// Create a new element with the given tag and no attributes.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: Vec::new(),
            text: None,
        }
    }

    /// Set an attribute (builder).
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name: String = name.into();
        self.set_attr(&name, value);
        self
    }

    /// Set the `id` attribute (builder).
    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.with_attr("id", id)
    }

    /// Add a single class (builder).
    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    /// Add multiple classes (builder).
    pub fn with_classes<'a>(mut self, classes: impl IntoIterator<Item = &'a str>) -> Self {
        for class in classes {
            self.add_class(class);
        }
        self
    }

    /// Set text content (builder).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Value of an attribute, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether the attribute is present (any value, including empty).
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.iter().any(|(key, _)| key == name)
    }

    /// Set an attribute, replacing the value in place if it already exists.
    ///
    /// Returns `true` if the stored value changed.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) if *existing == value => false,
            Some((_, existing)) => {
                *existing = value;
                true
            }
            None => {
                self.attributes.push((name.to_owned(), value));
                true
            }
        }
    }

    /// Remove an attribute. Returns `true` if it was present.
    pub fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|(key, _)| key != name);
        self.attributes.len() != before
    }

    /// All attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// The `id` attribute, if set and non-empty.
    pub fn id(&self) -> Option<&str> {
        self.attr("id").filter(|id| !id.is_empty())
    }

    /// Classes from the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_ascii_whitespace()
    }

    /// Check whether this node has a given class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Add a class. No-op if already present.
    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let joined = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
            _ => class.to_owned(),
        };
        self.set_attr("class", joined);
    }

    /// Remove a class. No-op if not present.
    pub fn remove_class(&mut self, class: &str) {
        if !self.has_class(class) {
            return;
        }
        let kept: Vec<&str> = self.classes().filter(|c| *c != class).collect();
        let joined = kept.join(" ");
        self.set_attr("class", joined);
    }

    /// Toggle a class: add if absent, remove if present.
    pub fn toggle_class(&mut self, class: &str) {
        if self.has_class(class) {
            self.remove_class(class);
        } else {
            self.add_class(class);
        }
    }

    /// Whether the element is disabled (`disabled` or `data-disabled`).
    pub fn is_disabled(&self) -> bool {
        self.has_attr("disabled") || self.has_attr("data-disabled")
    }

    /// Whether the element is hidden via the `hidden` attribute.
    pub fn is_hidden(&self) -> bool {
        self.has_attr("hidden")
    }

    /// Whether the element can take keyboard focus.
    ///
    /// Natively focusable tags qualify unless disabled; any element with a
    /// non-negative `tabindex` qualifies too.
    pub fn is_focusable(&self) -> bool {
        if self.is_disabled() {
            return false;
        }
        match self.attr("tabindex").map(str::parse::<i32>) {
            Some(Ok(index)) => index >= 0,
            _ => NATIVELY_FOCUSABLE.contains(&self.tag.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defaults() {
        let data = NodeData::new("BUTTON");
        assert_eq!(data.tag, "button");
        assert!(data.id().is_none());
        assert_eq!(data.classes().count(), 0);
        assert!(data.text.is_none());
    }

    #[test]
    fn builder_with_id() {
        let data = NodeData::new("h2").with_id("title");
        assert_eq!(data.id(), Some("title"));
    }

    #[test]
    fn empty_id_is_none() {
        let data = NodeData::new("div").with_id("");
        assert!(data.id().is_none());
    }

    #[test]
    fn builder_with_class_dedup() {
        let data = NodeData::new("div").with_class("primary").with_class("primary");
        assert_eq!(data.attr("class"), Some("primary"));
    }

    #[test]
    fn builder_with_classes() {
        let data = NodeData::new("div").with_classes(["a", "b", "c"]);
        assert_eq!(data.classes().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn set_attr_reports_change() {
        let mut data = NodeData::new("div");
        assert!(data.set_attr("data-state", "open"));
        assert!(!data.set_attr("data-state", "open"));
        assert!(data.set_attr("data-state", "closed"));
        assert_eq!(data.attr("data-state"), Some("closed"));
    }

    #[test]
    fn set_attr_keeps_position() {
        let mut data = NodeData::new("div").with_attr("a", "1").with_attr("b", "2");
        data.set_attr("a", "3");
        let names: Vec<&str> = data.attributes().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn remove_attr() {
        let mut data = NodeData::new("div").with_attr("hidden", "");
        assert!(data.remove_attr("hidden"));
        assert!(!data.remove_attr("hidden"));
        assert!(!data.has_attr("hidden"));
    }

    #[test]
    fn remove_class() {
        let mut data = NodeData::new("div").with_class("a").with_class("b");
        data.remove_class("a");
        assert!(!data.has_class("a"));
        assert!(data.has_class("b"));
        data.remove_class("nonexistent");
        assert_eq!(data.attr("class"), Some("b"));
    }

    #[test]
    fn toggle_class() {
        let mut data = NodeData::new("div");
        data.toggle_class("active");
        assert!(data.has_class("active"));
        data.toggle_class("active");
        assert!(!data.has_class("active"));
    }

    #[test]
    fn focusable_rules() {
        assert!(NodeData::new("button").is_focusable());
        assert!(!NodeData::new("button").with_attr("disabled", "").is_focusable());
        assert!(!NodeData::new("div").is_focusable());
        assert!(NodeData::new("div").with_attr("tabindex", "0").is_focusable());
        assert!(!NodeData::new("button").with_attr("tabindex", "-1").is_focusable());
    }

    #[test]
    fn node_id_is_copy() {
        fn assert_copy<T: Copy>() {}
        assert_copy::<NodeId>();
    }
}
