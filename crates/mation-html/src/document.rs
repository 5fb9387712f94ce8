//! [`Document`] implementation over a `scraper` parse tree.

use ego_tree::NodeId;
use mation_core::{Document, NodeKind};
use scraper::{Html, Node};

const BODY_TAG: &str = "body";

/// Parsed HTML document.
///
/// Parsing follows the HTML5 algorithm, so the tree always has a document
/// element and, for full documents, a `<body>`.
pub struct HtmlDocument {
    html: Html,
    body: Option<NodeId>,
}

impl HtmlDocument {
    /// Parse a full HTML document.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let html = Html::parse_document(source);
        let body = html
            .root_element()
            .child_elements()
            .find(|child| child.value().name() == BODY_TAG)
            .map(|body| body.id());
        Self { html, body }
    }

    /// Underlying `scraper` document.
    #[must_use]
    pub fn html(&self) -> &Html {
        &self.html
    }

    fn value(&self, node: NodeId) -> Option<&Node> {
        self.html.tree.get(node).map(|node| node.value())
    }
}

impl std::fmt::Debug for HtmlDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlDocument")
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl Document for HtmlDocument {
    type NodeId = NodeId;

    fn document_element(&self) -> NodeId {
        self.html.root_element().id()
    }

    fn body(&self) -> Option<NodeId> {
        self.body
    }

    fn kind(&self, node: NodeId) -> NodeKind {
        match self.value(node) {
            Some(Node::Element(_)) => NodeKind::Element,
            Some(Node::Text(_)) => NodeKind::Text,
            _ => NodeKind::Other,
        }
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.value(node)?.as_element().map(|element| element.name())
    }

    fn attributes(&self, node: NodeId) -> Vec<(&str, &str)> {
        self.value(node)
            .and_then(Node::as_element)
            .map(|element| element.attrs().collect())
            .unwrap_or_default()
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        self.value(node)?.as_text().map(|text| &**text)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.html
            .tree
            .get(node)
            .map(|node| node.children().map(|child| child.id()).collect())
            .unwrap_or_default()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.html.tree.get(node)?.parent().map(|parent| parent.id())
    }
}
