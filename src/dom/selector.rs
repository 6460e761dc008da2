//! Selector AST, recursive descent parser, and matching.
//!
//! Supports the subset widgets need to locate their parts: type, `*`,
//! `#id`, `.class`, `[attr]`, `[attr=value]`, compound selectors, the
//! descendant and child combinators, and comma-separated lists.

use super::node::{NodeData, NodeId};
use super::tokenizer::{tokenize, Spanned, Token};
use super::tree::Dom;

/// Errors from selector parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unrecognized character at byte {0}")]
    InvalidCharacter(usize),
    #[error("unexpected token at byte {position}: {message}")]
    UnexpectedToken { position: usize, message: String },
    #[error("unexpected end of selector: {0}")]
    UnexpectedEof(String),
}

/// A single simple selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorComponent {
    /// Type selector: matches the tag name.
    Type(String),
    /// Universal selector: `*`.
    Universal,
    /// Class selector: `.classname`.
    Class(String),
    /// ID selector: `#id`.
    Id(String),
    /// Attribute presence `[name]` or equality `[name=value]`.
    Attribute { name: String, value: Option<String> },
}

impl SelectorComponent {
    fn matches(&self, data: &NodeData) -> bool {
        match self {
            Self::Type(tag) => data.tag.eq_ignore_ascii_case(tag),
            Self::Universal => true,
            Self::Class(class) => data.has_class(class),
            Self::Id(id) => data.id() == Some(id.as_str()),
            Self::Attribute { name, value: None } => data.has_attr(name),
            Self::Attribute {
                name,
                value: Some(expected),
            } => data.attr(name) == Some(expected.as_str()),
        }
    }
}

/// A combinator between compound selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Descendant combinator (whitespace): `A B`.
    Descendant,
    /// Child combinator: `A > B`.
    Child,
}

/// A sequence of simple selectors without combinators, e.g. `button.primary[data-open]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompoundSelector {
    pub components: Vec<SelectorComponent>,
}

impl CompoundSelector {
    fn matches(&self, data: &NodeData) -> bool {
        self.components.iter().all(|c| c.matches(data))
    }
}

/// One element in a selector chain: either a compound selector or a combinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorPart {
    Compound(CompoundSelector),
    Combinator(Combinator),
}

/// A complex selector: compound selectors joined by combinators.
///
/// `parts` always starts and ends with a [`SelectorPart::Compound`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    pub parts: Vec<SelectorPart>,
}

impl Selector {
    /// Whether `node` matches this selector, checked right to left.
    pub fn matches(&self, dom: &Dom, node: NodeId) -> bool {
        match self.parts.len() {
            0 => false,
            n => self.matches_at(dom, node, n - 1),
        }
    }

    fn matches_at(&self, dom: &Dom, node: NodeId, index: usize) -> bool {
        let Some(SelectorPart::Compound(compound)) = self.parts.get(index) else {
            return false;
        };
        let Some(data) = dom.get(node) else {
            return false;
        };
        if !compound.matches(data) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match self.parts.get(index - 1) {
            Some(SelectorPart::Combinator(Combinator::Child)) => dom
                .parent(node)
                .is_some_and(|parent| self.matches_at(dom, parent, index - 2)),
            Some(SelectorPart::Combinator(Combinator::Descendant)) => dom
                .ancestors(node)
                .into_iter()
                .any(|ancestor| self.matches_at(dom, ancestor, index - 2)),
            _ => false,
        }
    }
}

/// A comma-separated selector list. Matches if any member matches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectorList {
    pub selectors: Vec<Selector>,
}

impl SelectorList {
    /// Parse a selector list.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let tokens = tokenize(input).map_err(SelectorError::InvalidCharacter)?;
        if tokens.is_empty() {
            return Err(SelectorError::Empty);
        }
        let mut parser = Parser { tokens, cursor: 0 };
        parser.parse_list()
    }

    /// Whether `node` matches any selector of the list.
    pub fn matches(&self, dom: &Dom, node: NodeId) -> bool {
        self.selectors.iter().any(|s| s.matches(dom, node))
    }
}

impl std::str::FromStr for SelectorList {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Recursive descent parser state.
struct Parser {
    tokens: Vec<Spanned>,
    cursor: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.cursor)
    }

    fn advance(&mut self) -> Option<Spanned> {
        let tok = self.tokens.get(self.cursor).cloned();
        if tok.is_some() {
            self.cursor += 1;
        }
        tok
    }

    /// Whether the next token starts exactly where the previous one ended.
    fn is_adjacent(&self) -> bool {
        match (self.cursor.checked_sub(1), self.peek()) {
            (Some(prev), Some(next)) => self.tokens[prev].end == next.start,
            _ => false,
        }
    }

    fn unexpected(tok: &Spanned, message: &str) -> SelectorError {
        SelectorError::UnexpectedToken {
            position: tok.start,
            message: format!("{message}, got {:?} '{}'", tok.token, tok.text),
        }
    }

    fn expect_name(&mut self, what: &str) -> Result<String, SelectorError> {
        match self.advance() {
            Some(tok) if matches!(tok.token, Token::Ident | Token::Number) => Ok(tok.text),
            Some(tok) => Err(Self::unexpected(&tok, &format!("expected {what}"))),
            None => Err(SelectorError::UnexpectedEof(format!("expected {what}"))),
        }
    }

    fn parse_list(&mut self) -> Result<SelectorList, SelectorError> {
        let mut selectors = vec![self.parse_selector()?];
        while let Some(tok) = self.peek() {
            if tok.token != Token::Comma {
                let tok = tok.clone();
                return Err(Self::unexpected(&tok, "expected ','"));
            }
            self.advance();
            selectors.push(self.parse_selector()?);
        }
        Ok(SelectorList { selectors })
    }

    fn parse_selector(&mut self) -> Result<Selector, SelectorError> {
        let mut parts = vec![SelectorPart::Compound(self.parse_compound()?)];
        loop {
            let Some(tok) = self.peek() else {
                break;
            };
            match tok.token {
                Token::Comma => break,
                Token::GreaterThan => {
                    self.advance();
                    parts.push(SelectorPart::Combinator(Combinator::Child));
                    parts.push(SelectorPart::Compound(self.parse_compound()?));
                }
                _ if !self.is_adjacent() => {
                    parts.push(SelectorPart::Combinator(Combinator::Descendant));
                    parts.push(SelectorPart::Compound(self.parse_compound()?));
                }
                _ => {
                    let tok = tok.clone();
                    return Err(Self::unexpected(&tok, "expected combinator"));
                }
            }
        }
        Ok(Selector { parts })
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut components = Vec::new();
        loop {
            let Some(tok) = self.peek() else {
                break;
            };
            if !components.is_empty() && !self.is_adjacent() {
                break;
            }
            match tok.token {
                Token::Ident if components.is_empty() => {
                    let name = tok.text.to_ascii_lowercase();
                    self.advance();
                    components.push(SelectorComponent::Type(name));
                }
                Token::Star if components.is_empty() => {
                    self.advance();
                    components.push(SelectorComponent::Universal);
                }
                Token::Hash => {
                    self.advance();
                    components.push(SelectorComponent::Id(self.expect_name("id")?));
                }
                Token::Dot => {
                    self.advance();
                    components.push(SelectorComponent::Class(self.expect_name("class name")?));
                }
                Token::BracketOpen => {
                    self.advance();
                    components.push(self.parse_attribute()?);
                }
                _ => break,
            }
        }

        if components.is_empty() {
            return Err(match self.peek() {
                Some(tok) => Self::unexpected(tok, "expected selector"),
                None => SelectorError::UnexpectedEof("expected selector".into()),
            });
        }
        Ok(CompoundSelector { components })
    }

    /// Parse the inside of `[...]`; the opening bracket is already consumed.
    fn parse_attribute(&mut self) -> Result<SelectorComponent, SelectorError> {
        let name = self.expect_name("attribute name")?;
        let value = match self.peek().map(|t| &t.token) {
            Some(Token::Equals) => {
                self.advance();
                match self.advance() {
                    Some(tok) => match tok.token {
                        Token::StringLiteral | Token::StringLiteralSingle => {
                            Some(tok.text[1..tok.text.len() - 1].to_owned())
                        }
                        Token::Ident | Token::Number => Some(tok.text),
                        _ => return Err(Self::unexpected(&tok, "expected attribute value")),
                    },
                    None => {
                        return Err(SelectorError::UnexpectedEof(
                            "expected attribute value".into(),
                        ))
                    }
                }
            }
            _ => None,
        };
        match self.advance() {
            Some(tok) if tok.token == Token::BracketClose => {
                Ok(SelectorComponent::Attribute { name, value })
            }
            Some(tok) => Err(Self::unexpected(&tok, "expected ']'")),
            None => Err(SelectorError::UnexpectedEof("expected ']'".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> SelectorList {
        SelectorList::parse(input).unwrap()
    }

    fn compound(sel: &Selector, index: usize) -> &[SelectorComponent] {
        match &sel.parts[index] {
            SelectorPart::Compound(c) => &c.components,
            other => panic!("expected compound, got {other:?}"),
        }
    }

    #[test]
    fn parse_attribute_presence() {
        let list = parse("[data-accordion-item]");
        assert_eq!(
            compound(&list.selectors[0], 0),
            &[SelectorComponent::Attribute {
                name: "data-accordion-item".into(),
                value: None
            }]
        );
    }

    #[test]
    fn parse_attribute_values() {
        let list = parse(r#"[data-value="one"][data-x=two][data-i='3'][data-n=4]"#);
        let values: Vec<Option<String>> = compound(&list.selectors[0], 0)
            .iter()
            .map(|c| match c {
                SelectorComponent::Attribute { value, .. } => value.clone(),
                _ => None,
            })
            .collect();
        assert_eq!(
            values,
            vec![
                Some("one".to_string()),
                Some("two".to_string()),
                Some("3".to_string()),
                Some("4".to_string())
            ]
        );
    }

    #[test]
    fn parse_compound() {
        let list = parse("BUTTON.primary#save");
        assert_eq!(
            compound(&list.selectors[0], 0),
            &[
                SelectorComponent::Type("button".into()),
                SelectorComponent::Class("primary".into()),
                SelectorComponent::Id("save".into()),
            ]
        );
    }

    #[test]
    fn parse_combinators() {
        let list = parse("div > [data-a] span");
        let parts = &list.selectors[0].parts;
        assert_eq!(parts.len(), 5);
        assert_eq!(parts[1], SelectorPart::Combinator(Combinator::Child));
        assert_eq!(parts[3], SelectorPart::Combinator(Combinator::Descendant));
    }

    #[test]
    fn parse_list() {
        let list = parse("#a, .b ,c");
        assert_eq!(list.selectors.len(), 3);
    }

    #[test]
    fn parse_errors() {
        assert_eq!(SelectorList::parse(""), Err(SelectorError::Empty));
        assert_eq!(SelectorList::parse("   "), Err(SelectorError::Empty));
        assert!(matches!(
            SelectorList::parse("[data-a"),
            Err(SelectorError::UnexpectedEof(_))
        ));
        assert!(matches!(
            SelectorList::parse("div,"),
            Err(SelectorError::UnexpectedEof(_))
        ));
        assert!(matches!(
            SelectorList::parse("div >"),
            Err(SelectorError::UnexpectedEof(_))
        ));
        assert!(matches!(
            SelectorList::parse("#"),
            Err(SelectorError::UnexpectedEof(_))
        ));
        assert_eq!(
            SelectorList::parse("a ~ b"),
            Err(SelectorError::InvalidCharacter(2))
        );
    }

    #[test]
    fn from_str_delegates() {
        let list: SelectorList = "[data-x]".parse().unwrap();
        assert_eq!(list.selectors.len(), 1);
    }

    /// ```text
    /// body
    ///  └─ div[data-root]
    ///      ├─ button.trigger[data-value=one]
    ///      └─ section
    ///          └─ button.trigger[data-value=two]
    /// ```
    fn build() -> (Dom, NodeId, NodeId, NodeId, NodeId) {
        let mut dom = Dom::new();
        let body = dom.insert(NodeData::new("body"));
        let root = dom.insert_child(body, NodeData::new("div").with_attr("data-root", ""));
        let one = dom.insert_child(
            root,
            NodeData::new("button")
                .with_class("trigger")
                .with_attr("data-value", "one"),
        );
        let section = dom.insert_child(root, NodeData::new("section"));
        let two = dom.insert_child(
            section,
            NodeData::new("button")
                .with_class("trigger")
                .with_attr("data-value", "two"),
        );
        (dom, root, one, section, two)
    }

    #[test]
    fn matches_descendant_and_child() {
        let (dom, _root, one, _section, two) = build();
        let child = parse("[data-root] > button");
        assert!(child.matches(&dom, one));
        assert!(!child.matches(&dom, two));

        let descendant = parse("[data-root] button");
        assert!(descendant.matches(&dom, one));
        assert!(descendant.matches(&dom, two));
    }

    #[test]
    fn matches_attribute_value() {
        let (dom, _root, one, _section, two) = build();
        let sel = parse("[data-value=two]");
        assert!(!sel.matches(&dom, one));
        assert!(sel.matches(&dom, two));
    }

    #[test]
    fn matches_backtracks_through_ancestors() {
        let (dom, _root, _one, _section, two) = build();
        assert!(parse("div section > .trigger").matches(&dom, two));
        assert!(!parse("section div .trigger").matches(&dom, two));
    }

    #[test]
    fn matches_list() {
        let (dom, root, one, ..) = build();
        let sel = parse("section, [data-root]");
        assert!(sel.matches(&dom, root));
        assert!(!sel.matches(&dom, one));
    }
}
