//! In-memory document and matcher for testing.
//!
//! Provides [`MockDocument`] and [`TagMatcher`] so the engine can be
//! exercised without an HTML parser or a selector engine.

use std::sync::LazyLock;

use regex::Regex;

use crate::document::{Document, Matcher, NodeKind};

static COMPOUND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\*|[A-Za-z][\w-]*)?((?:[.#][\w-]+|\[[\w-]+\])*)$").unwrap()
});

static QUALIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.#])([\w-]+)|\[([\w-]+)\]").unwrap());

/// Handle to a node of a [`MockDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MockNodeId(usize);

#[derive(Debug)]
struct MockNode {
    kind: NodeKind,
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Mock document for testing.
///
/// Starts as `<html><body></body></html>`; use the builder methods to add
/// nodes.
///
/// # Example
///
/// ```ignore
/// let mut doc = MockDocument::new();
/// let p = doc.add_element(doc.body_node(), "p", &[("class", "lead")]);
/// doc.add_text(p, "Hello");
/// ```
#[derive(Debug)]
pub struct MockDocument {
    nodes: Vec<MockNode>,
}

impl Default for MockDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDocument {
    const HTML: usize = 0;
    const BODY: usize = 1;

    /// Create `<html><body></body></html>`.
    #[must_use]
    pub fn new() -> Self {
        let mut doc = Self { nodes: Vec::new() };
        doc.push(None, NodeKind::Element, "html", &[], "");
        doc.push(Some(Self::HTML), NodeKind::Element, "body", &[], "");
        doc
    }

    /// The `<body>` element.
    #[must_use]
    pub fn body_node(&self) -> MockNodeId {
        MockNodeId(Self::BODY)
    }

    /// Insert a `<head>` element before `<body>`.
    pub fn add_head(&mut self) -> MockNodeId {
        let id = self.push(Some(Self::HTML), NodeKind::Element, "head", &[], "");
        let html = &mut self.nodes[Self::HTML].children;
        html.retain(|&child| child != id);
        html.insert(0, id);
        MockNodeId(id)
    }

    /// Append an element to `parent`.
    pub fn add_element(
        &mut self,
        parent: MockNodeId,
        tag: &str,
        attrs: &[(&str, &str)],
    ) -> MockNodeId {
        MockNodeId(self.push(Some(parent.0), NodeKind::Element, tag, attrs, ""))
    }

    /// Append a text node to `parent`.
    pub fn add_text(&mut self, parent: MockNodeId, text: &str) -> MockNodeId {
        MockNodeId(self.push(Some(parent.0), NodeKind::Text, "", &[], text))
    }

    /// Append a comment node to `parent`.
    pub fn add_comment(&mut self, parent: MockNodeId, text: &str) -> MockNodeId {
        MockNodeId(self.push(Some(parent.0), NodeKind::Other, "", &[], text))
    }

    fn push(
        &mut self,
        parent: Option<usize>,
        kind: NodeKind,
        tag: &str,
        attrs: &[(&str, &str)],
        text: &str,
    ) -> usize {
        let id = self.nodes.len();
        self.nodes.push(MockNode {
            kind,
            tag: tag.to_owned(),
            attrs: attrs
                .iter()
                .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
                .collect(),
            text: text.to_owned(),
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(id);
        }
        id
    }

    fn node(&self, id: MockNodeId) -> &MockNode {
        &self.nodes[id.0]
    }
}

impl Document for MockDocument {
    type NodeId = MockNodeId;

    fn document_element(&self) -> MockNodeId {
        MockNodeId(Self::HTML)
    }

    fn body(&self) -> Option<MockNodeId> {
        Some(MockNodeId(Self::BODY))
    }

    fn kind(&self, node: MockNodeId) -> NodeKind {
        self.node(node).kind
    }

    fn tag_name(&self, node: MockNodeId) -> Option<&str> {
        let node = self.node(node);
        (node.kind == NodeKind::Element).then_some(node.tag.as_str())
    }

    fn attributes(&self, node: MockNodeId) -> Vec<(&str, &str)> {
        self.node(node)
            .attrs
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect()
    }

    fn text(&self, node: MockNodeId) -> Option<&str> {
        let node = self.node(node);
        (node.kind == NodeKind::Text).then_some(node.text.as_str())
    }

    fn children(&self, node: MockNodeId) -> Vec<MockNodeId> {
        self.node(node).children.iter().copied().map(MockNodeId).collect()
    }

    fn parent(&self, node: MockNodeId) -> Option<MockNodeId> {
        self.node(node).parent.map(MockNodeId)
    }
}

/// One compound of a selector: `tag.class#id[attr]`.
#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    classes: Vec<String>,
    ids: Vec<String>,
    attrs: Vec<String>,
}

impl Compound {
    fn parse(text: &str) -> Result<Self, String> {
        if text.is_empty() {
            return Err("empty compound selector".to_owned());
        }
        let caps = COMPOUND_RE
            .captures(text)
            .ok_or_else(|| format!("unsupported selector syntax {text:?}"))?;
        let mut compound = Self {
            tag: caps
                .get(1)
                .map(|m| m.as_str())
                .filter(|tag| *tag != "*")
                .map(str::to_ascii_lowercase),
            ..Self::default()
        };
        let qualifiers = caps.get(2).map_or("", |m| m.as_str());
        for q in QUALIFIER_RE.captures_iter(qualifiers) {
            match (q.get(1).map(|m| m.as_str()), q.get(2), q.get(3)) {
                (Some("."), Some(name), _) => compound.classes.push(name.as_str().to_owned()),
                (Some(_), Some(name), _) => compound.ids.push(name.as_str().to_owned()),
                (_, _, Some(attr)) => compound.attrs.push(attr.as_str().to_owned()),
                _ => {}
            }
        }
        Ok(compound)
    }

    fn matches(&self, doc: &MockDocument, node: MockNodeId) -> bool {
        let Some(tag) = doc.tag_name(node) else {
            return false;
        };
        if self.tag.as_deref().is_some_and(|t| !t.eq_ignore_ascii_case(tag)) {
            return false;
        }
        let attrs = doc.dataset(node);
        let classes: Vec<&str> = attrs
            .get("class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default();
        self.classes.iter().all(|c| classes.contains(&c.as_str()))
            && self
                .ids
                .iter()
                .all(|id| attrs.get("id").is_some_and(|v| v == id))
            && self.attrs.iter().all(|a| attrs.contains_key(a))
    }
}

/// Parse a selector list into alternatives of descendant-combined compounds.
fn parse_selector(selector: &str) -> Result<Vec<Vec<Compound>>, String> {
    selector
        .split(',')
        .map(|alternative| {
            let compounds = alternative
                .split_whitespace()
                .map(Compound::parse)
                .collect::<Result<Vec<_>, _>>()?;
            if compounds.is_empty() {
                return Err(format!("empty selector in {selector:?}"));
            }
            Ok(compounds)
        })
        .collect()
}

/// Minimal selector matcher for tests.
///
/// Supports type selectors, `*`, `.class`, `#id`, `[attr]`, the descendant
/// combinator and comma-separated lists. Anything else is rejected by
/// [`Matcher::check_selector`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TagMatcher;

impl Matcher<MockDocument> for TagMatcher {
    fn matches(&self, document: &MockDocument, node: MockNodeId, selector: &str) -> bool {
        let Ok(alternatives) = parse_selector(selector) else {
            return false;
        };
        alternatives.iter().any(|compounds| {
            let Some((last, ancestors)) = compounds.split_last() else {
                return false;
            };
            if !last.matches(document, node) {
                return false;
            }
            let mut current = document.parent_element(node);
            for compound in ancestors.iter().rev() {
                loop {
                    let Some(id) = current else { return false };
                    current = document.parent_element(id);
                    if compound.matches(document, id) {
                        break;
                    }
                }
            }
            true
        })
    }

    fn check_selector(&self, selector: &str) -> Result<(), String> {
        parse_selector(selector).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (MockDocument, MockNodeId, MockNodeId) {
        let mut doc = MockDocument::new();
        let nav = doc.add_element(doc.body_node(), "nav", &[("id", "top")]);
        let a = doc.add_element(nav, "a", &[("class", "ext link"), ("href", "/")]);
        (doc, nav, a)
    }

    #[test]
    fn test_tree_shape() {
        let (doc, nav, a) = sample();
        assert_eq!(doc.children(doc.body_node()), vec![nav]);
        assert_eq!(doc.parent(a), Some(nav));
        assert_eq!(doc.tag_name(a), Some("a"));
        assert_eq!(doc.parent_element(nav), Some(doc.body_node()));
    }

    #[test]
    fn test_type_and_class_selectors() {
        let (doc, _, a) = sample();
        assert!(TagMatcher.matches(&doc, a, "a"));
        assert!(TagMatcher.matches(&doc, a, "a.ext"));
        assert!(TagMatcher.matches(&doc, a, ".link.ext"));
        assert!(TagMatcher.matches(&doc, a, "[href]"));
        assert!(!TagMatcher.matches(&doc, a, "a.missing"));
        assert!(!TagMatcher.matches(&doc, a, "p"));
    }

    #[test]
    fn test_descendant_and_list_selectors() {
        let (doc, nav, a) = sample();
        assert!(TagMatcher.matches(&doc, a, "nav a"));
        assert!(TagMatcher.matches(&doc, a, "body #top a"));
        assert!(!TagMatcher.matches(&doc, a, "footer a"));
        assert!(TagMatcher.matches(&doc, nav, "p, nav"));
        assert!(TagMatcher.matches(&doc, nav, "*"));
    }

    #[test]
    fn test_text_nodes_never_match() {
        let mut doc = MockDocument::new();
        let text = doc.add_text(doc.body_node(), "x");
        assert!(!TagMatcher.matches(&doc, text, "*"));
    }

    #[test]
    fn test_check_selector() {
        assert!(TagMatcher.check_selector("ul li, ol > li").is_err());
        assert!(TagMatcher.check_selector("a:hover").is_err());
        assert!(TagMatcher.check_selector("a,").is_err());
        assert!(TagMatcher.check_selector("ul li.item, p").is_ok());
    }
}
