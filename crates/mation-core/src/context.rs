//! Per-element conversion context handed to formatters.

use std::cell::OnceCell;
use std::collections::HashMap;

use crate::document::Document;
use crate::error::ConvertError;

/// Reduction of a subtree, implemented by an in-flight conversion.
pub(crate) trait Reduce<D: Document> {
    /// Concatenated reduction of `node`'s children at `depth`.
    fn reduce_children(&self, node: D::NodeId, depth: usize) -> Result<String, ConvertError>;
}

/// Read the cached children reduction of `node`, computing it on first use.
pub(crate) fn children_text<'c, D: Document>(
    cell: &'c OnceCell<String>,
    reducer: &dyn Reduce<D>,
    node: D::NodeId,
    depth: usize,
) -> Result<&'c str, ConvertError> {
    if let Some(text) = cell.get() {
        return Ok(text);
    }
    let text = reducer.reduce_children(node, depth)?;
    Ok(cell.get_or_init(|| text))
}

/// Where a context's `content` comes from.
pub(crate) enum Content<'a> {
    /// Output of the previous rule in the chain.
    Accumulated(&'a str),
    /// Children reduction, computed on first read and shared by the chain.
    Children(&'a OnceCell<String>),
}

/// Context for one element visit, passed to a [`Formatter`](crate::Formatter).
///
/// The context is only valid for the duration of the formatter call.
pub struct ConversionContext<'a, D: Document> {
    document: &'a D,
    node: D::NodeId,
    dataset: &'a HashMap<String, String>,
    depth: usize,
    content: Content<'a>,
    reducer: &'a dyn Reduce<D>,
}

impl<'a, D: Document> ConversionContext<'a, D> {
    pub(crate) fn new(
        document: &'a D,
        node: D::NodeId,
        dataset: &'a HashMap<String, String>,
        depth: usize,
        content: Content<'a>,
        reducer: &'a dyn Reduce<D>,
    ) -> Self {
        Self {
            document,
            node,
            dataset,
            depth,
            content,
            reducer,
        }
    }

    /// Document being converted.
    #[must_use]
    pub fn document(&self) -> &'a D {
        self.document
    }

    /// Element being converted.
    #[must_use]
    pub fn node(&self) -> D::NodeId {
        self.node
    }

    /// Tag name of the element.
    #[must_use]
    pub fn tag_name(&self) -> &'a str {
        self.document.tag_name(self.node).unwrap_or_default()
    }

    /// Element attributes by name.
    #[must_use]
    pub fn dataset(&self) -> &'a HashMap<String, String> {
        self.dataset
    }

    /// Single attribute value.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.dataset.get(name).map(String::as_str)
    }

    /// Number of elements from the conversion root down to this element
    /// (the root's direct children are at depth 1).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Current content of the element.
    ///
    /// This is the previous rule's output when one exists in the chain,
    /// otherwise the reduction of the element's children. The reduction is
    /// computed on first read only.
    pub fn content(&self) -> Result<&str, ConvertError> {
        match &self.content {
            Content::Accumulated(text) => Ok(*text),
            Content::Children(cell) => children_text(cell, self.reducer, self.node, self.depth),
        }
    }

    /// Reduce the children of `node`, or of this element when `None`.
    ///
    /// Unlike [`content`](Self::content) this always runs a fresh reduction
    /// and ignores any accumulated rule output.
    pub fn convert(&self, node: Option<D::NodeId>) -> Result<String, ConvertError> {
        self.reducer
            .reduce_children(node.unwrap_or(self.node), self.depth)
    }
}
