use serde::{Deserialize, Serialize};

use crate::domain::{
    node::{Node, Toctree, Traverse},
    Docname,
};

/// A parsed document tree.
///
/// Documents handed out by a [`DocumentStore`](crate::storage::DocumentStore)
/// are owned copies, so tagging or splicing one never affects the stored
/// original.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// The docname this tree was produced from.
    ///
    /// Synthesized trees have no docname until they are tagged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docname: Option<Docname>,

    /// Top-level nodes.
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Document {
    /// Creates an untagged document with the given content.
    #[must_use]
    pub const fn new(children: Vec<Node>) -> Self {
        Self {
            docname: None,
            children,
        }
    }

    /// Records which docname this tree belongs to.
    pub fn tag(&mut self, docname: Docname) {
        self.docname = Some(docname);
    }

    /// Builder-style variant of [`Self::tag`].
    #[must_use]
    pub fn tagged(mut self, docname: Docname) -> Self {
        self.tag(docname);
        self
    }

    /// Iterates over every node in document order.
    pub fn traverse(&self) -> Traverse<'_> {
        Traverse::new(&self.children)
    }

    /// Iterates over the navigation nodes in document order.
    pub fn toctrees(&self) -> impl Iterator<Item = &Toctree> {
        self.traverse().filter_map(|node| match node {
            Node::Toctree(toctree) => Some(toctree),
            _ => None,
        })
    }

    /// The number of unresolved cross-references left in the tree.
    #[must_use]
    pub fn pending_xrefs(&self) -> usize {
        self.traverse()
            .filter(|node| matches!(node, Node::PendingXref(_)))
            .count()
    }

    /// The docnames of every spliced-in document, in document order.
    pub fn included_docnames(&self) -> impl Iterator<Item = &Docname> {
        self.traverse().filter_map(|node| match node {
            Node::Included(document) => document.docname.as_ref(),
            _ => None,
        })
    }

    /// The concatenated text of the whole tree.
    #[must_use]
    pub fn astext(&self) -> String {
        self.children.iter().map(Node::astext).collect()
    }
}
