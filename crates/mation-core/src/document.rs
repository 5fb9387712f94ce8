//! Tree and selector abstractions consumed by the engine.
//!
//! The engine never parses HTML and never interprets selectors. A parsed tree
//! is exposed through [`Document`], and selector tests are delegated to a
//! [`Matcher`]. This keeps the engine testable with an in-memory tree and a
//! trivial matcher.

use std::collections::HashMap;
use std::fmt::Debug;

/// Kind of a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Element node (`<p>`, `<a href="...">`).
    Element,
    /// Text node.
    Text,
    /// Anything else: comments, doctypes, processing instructions.
    Other,
}

/// Read-only view of a parsed document tree.
///
/// Nodes are addressed by a cheap copyable handle so that the engine can
/// snapshot child lists before descending.
pub trait Document {
    /// Handle to a node of this document.
    type NodeId: Copy + Eq + Debug;

    /// The document element (`<html>`).
    fn document_element(&self) -> Self::NodeId;

    /// The `<body>` element, if the document has one.
    fn body(&self) -> Option<Self::NodeId>;

    /// Kind of the given node.
    fn kind(&self, node: Self::NodeId) -> NodeKind;

    /// Tag name of an element node, `None` for other kinds.
    fn tag_name(&self, node: Self::NodeId) -> Option<&str>;

    /// Attributes of an element node in source order.
    fn attributes(&self, node: Self::NodeId) -> Vec<(&str, &str)>;

    /// Raw text of a text node, `None` for other kinds.
    fn text(&self, node: Self::NodeId) -> Option<&str>;

    /// Ordered child list.
    fn children(&self, node: Self::NodeId) -> Vec<Self::NodeId>;

    /// Parent node, `None` for the root.
    fn parent(&self, node: Self::NodeId) -> Option<Self::NodeId>;

    /// Nearest ancestor that is an element.
    fn parent_element(&self, node: Self::NodeId) -> Option<Self::NodeId> {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if self.kind(id) == NodeKind::Element {
                return Some(id);
            }
            current = self.parent(id);
        }
        None
    }

    /// Attribute map of an element; duplicate names keep the last value.
    fn dataset(&self, node: Self::NodeId) -> HashMap<String, String> {
        self.attributes(node)
            .into_iter()
            .map(|(name, value)| (name.to_owned(), value.to_owned()))
            .collect()
    }
}

/// Selector test against a single node.
pub trait Matcher<D: Document + ?Sized> {
    /// Whether `node` matches `selector`.
    fn matches(&self, document: &D, node: D::NodeId, selector: &str) -> bool;

    /// Check that `selector` is usable by this matcher.
    ///
    /// Called at registration time so that malformed selectors are reported
    /// before any conversion runs. The default accepts everything.
    fn check_selector(&self, selector: &str) -> Result<(), String> {
        let _ = selector;
        Ok(())
    }
}
