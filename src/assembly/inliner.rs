//! Recursive toctree inlining.
//!
//! Every navigation node in a tree is replaced by the content of the
//! documents it lists, each wrapped in a [`Node::Included`] carrying its
//! docname. A document already in the visited set is skipped silently, which
//! makes cycles and shared sub-sections safe: the first occurrence wins.

use std::collections::BTreeSet;

use crate::{
    assembly::{Diagnostics, Warning},
    domain::{
        node::{splice, Splice},
        Docname, Document, Node, Toctree,
    },
    storage::DocumentStore,
};

/// Replaces every toctree in `tree` with the documents it lists, recursively.
///
/// `visited` must already contain `docname` and any other document that must
/// not be inlined. Every document that gets inlined is added to it; a listed
/// docname is added even when it turns out to be missing, so a missing
/// document listed twice is only reported once.
///
/// Missing documents are reported as [`Warning::UnknownDocname`] and
/// skipped.
pub fn inline_all_toctrees<S>(
    store: &S,
    visited: &mut BTreeSet<Docname>,
    docname: &Docname,
    tree: Document,
    diagnostics: &mut Diagnostics,
) -> Document
where
    S: DocumentStore + ?Sized,
{
    Inliner {
        store,
        visited,
        diagnostics,
    }
    .inline(tree, docname)
}

struct Inliner<'a, S: ?Sized> {
    store: &'a S,
    visited: &'a mut BTreeSet<Docname>,
    diagnostics: &'a mut Diagnostics,
}

impl<S> Inliner<'_, S>
where
    S: DocumentStore + ?Sized,
{
    fn inline(&mut self, tree: Document, current: &Docname) -> Document {
        let Document { docname, children } = tree;
        let children = splice(children, &mut |node| match node {
            Node::Toctree(toctree) => Splice::Replace(self.expand(&toctree, current)),
            other => Splice::Descend(other),
        });
        Document { docname, children }
    }

    fn expand(&mut self, toctree: &Toctree, current: &Docname) -> Vec<Node> {
        let mut included = Vec::with_capacity(toctree.entries.len());

        for entry in &toctree.entries {
            if !self.visited.insert(entry.clone()) {
                tracing::trace!("{entry} already included, skipping");
                continue;
            }

            let fetched = if self.store.has(entry) {
                self.store.fetch(entry).ok()
            } else {
                None
            };
            let Some(document) = fetched else {
                self.diagnostics.warn(Warning::UnknownDocname {
                    docname: entry.clone(),
                    referenced_from: Some(current.clone()),
                });
                continue;
            };

            self.diagnostics.progress(entry);
            let mut subtree = self.inline(document, entry);
            tag_sections(&mut subtree.children, entry);
            subtree.tag(entry.clone());
            included.push(Node::Included(subtree));
        }

        included
    }
}

/// Tags every section that does not know its document yet.
///
/// Sections of nested inclusions were tagged when they were inlined, so they
/// keep their own docname.
fn tag_sections(nodes: &mut [Node], docname: &Docname) {
    for node in nodes {
        if let Node::Section(section) = node {
            section.docname.get_or_insert_with(|| docname.clone());
        }
        if let Some(children) = node.children_mut() {
            tag_sections(children, docname);
        }
    }
}
