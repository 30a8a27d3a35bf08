//! Nodes of a parsed document tree.
//!
//! Trees are plain owned values. Passes that change the shape of a tree
//! rebuild the affected child lists with [`splice`] rather than mutating
//! nodes through shared references.

use serde::{Deserialize, Serialize};

use crate::domain::{Docname, Document};

/// A single node in a document tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// A titled section.
    Section(Section),
    /// A block of inline content.
    Paragraph {
        /// Inline children.
        #[serde(default)]
        children: Vec<Node>,
    },
    /// Plain text.
    Text {
        /// The text itself.
        text: String,
    },
    /// Emphasised text.
    Emphasis {
        /// The text itself.
        text: String,
    },
    /// A navigation node listing documents to include at this point.
    Toctree(Toctree),
    /// A cross-reference that has not been resolved yet.
    PendingXref(PendingXref),
    /// A resolved cross-reference.
    Reference(Reference),
    /// The content of another document spliced into this tree.
    ///
    /// The wrapped document always carries its docname.
    Included(Document),
}

/// A titled section of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// The section heading.
    pub title: String,

    /// The document this section originally belonged to.
    ///
    /// Sources leave this empty; it is filled in when the section's document
    /// is spliced into another tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docname: Option<Docname>,

    /// Content of the section.
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Section {
    /// Creates an untagged section.
    #[must_use]
    pub fn new(title: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            title: title.into(),
            docname: None,
            children,
        }
    }
}

/// A navigation ("toctree") node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toctree {
    /// The documents to include, in order.
    #[serde(default)]
    pub entries: Vec<Docname>,

    /// Maximum depth shown in a rendered table of contents.
    ///
    /// Zero or absent means unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxdepth: Option<u32>,

    /// Optional caption displayed above the table of contents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl Toctree {
    /// Creates a toctree listing the given entries.
    #[must_use]
    pub fn new(entries: Vec<Docname>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }
}

/// A reference whose target is not known to be reachable yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingXref {
    /// The document containing the target.
    pub refdocname: Docname,

    /// Display name of the referenced section.
    pub refsectname: String,

    /// Label of the target within its document.
    #[serde(default)]
    pub reftarget: String,
}

/// A resolved link to a location inside the merged document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Location of the target.
    pub refuri: String,

    /// Link text.
    pub text: String,
}

impl Node {
    /// Plain text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Emphasised text node.
    #[must_use]
    pub fn emphasis(text: impl Into<String>) -> Self {
        Self::Emphasis { text: text.into() }
    }

    /// Paragraph node.
    #[must_use]
    pub const fn paragraph(children: Vec<Self>) -> Self {
        Self::Paragraph { children }
    }

    /// The child list of container nodes.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Section(section) => &section.children,
            Self::Paragraph { children } => children,
            Self::Included(document) => &document.children,
            Self::Text { .. }
            | Self::Emphasis { .. }
            | Self::Toctree(_)
            | Self::PendingXref(_)
            | Self::Reference(_) => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<Self>> {
        match self {
            Self::Section(section) => Some(&mut section.children),
            Self::Paragraph { children } => Some(children),
            Self::Included(document) => Some(&mut document.children),
            Self::Text { .. }
            | Self::Emphasis { .. }
            | Self::Toctree(_)
            | Self::PendingXref(_)
            | Self::Reference(_) => None,
        }
    }

    /// The concatenated text of this node and its descendants.
    #[must_use]
    pub fn astext(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) {
        match self {
            Self::Text { text } | Self::Emphasis { text } => out.push_str(text),
            Self::Reference(reference) => out.push_str(&reference.text),
            Self::Section(section) => {
                out.push_str(&section.title);
                for child in &section.children {
                    child.write_text(out);
                }
            }
            Self::Paragraph { .. } | Self::Included(_) => {
                for child in self.children() {
                    child.write_text(out);
                }
            }
            Self::Toctree(_) | Self::PendingXref(_) => {}
        }
    }
}

/// What a [`splice`] callback wants done with a node.
#[derive(Debug)]
pub enum Splice {
    /// Keep the node and continue into its children.
    Descend(Node),
    /// Replace the node with these nodes. The replacement is not visited.
    Replace(Vec<Node>),
}

/// Rebuilds a list of nodes, letting `f` replace any node with zero or more
/// nodes.
///
/// Nodes are visited in document order. Replacement nodes are taken as they
/// are; children of kept nodes are spliced recursively.
pub fn splice<F>(nodes: Vec<Node>, f: &mut F) -> Vec<Node>
where
    F: FnMut(Node) -> Splice,
{
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match f(node) {
            Splice::Replace(replacement) => out.extend(replacement),
            Splice::Descend(mut node) => {
                if let Some(children) = node.children_mut() {
                    let taken = std::mem::take(children);
                    *children = splice(taken, f);
                }
                out.push(node);
            }
        }
    }
    out
}

/// Depth-first, pre-order iterator over a list of nodes and their
/// descendants.
#[derive(Debug)]
pub struct Traverse<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Traverse<'a> {
    pub(crate) fn new(nodes: &'a [Node]) -> Self {
        Self {
            stack: vec![nodes.iter()],
        }
    }
}

impl<'a> Iterator for Traverse<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            if let Some(node) = top.next() {
                let children = node.children();
                if !children.is_empty() {
                    self.stack.push(children.iter());
                }
                return Some(node);
            }
            self.stack.pop();
        }
    }
}
