//! Resolution of cross-references within a merged tree.

use std::collections::BTreeSet;

use crate::{
    assembly::Diagnostics,
    domain::{
        node::{splice, Splice},
        Docname, Document, Node, PendingXref, Reference,
    },
};

/// The scope a merged tree is resolved in.
#[derive(Debug, Clone, Copy)]
pub struct ResolveScope<'a> {
    /// The root document of the output unit.
    pub docname: &'a Docname,
    /// Every document that ended up in the merged tree, root included.
    pub included: &'a BTreeSet<Docname>,
}

impl ResolveScope<'_> {
    /// Whether references to `docname` can be linked inside this scope.
    #[must_use]
    pub fn contains(&self, docname: &Docname) -> bool {
        self.included.contains(docname)
    }
}

/// Resolves cross-references of a merged tree.
///
/// Implementations turn references whose target lies inside the scope into
/// links and leave every other [`Node::PendingXref`] in place. An unresolved
/// reference is not an error; the remaining ones are rewritten into text
/// afterwards.
pub trait ReferenceResolver {
    /// Resolves references in `tree` in place.
    fn resolve(&self, tree: &mut Document, scope: &ResolveScope<'_>, diagnostics: &mut Diagnostics);
}

/// Links every pending reference whose target document is part of the
/// merged tree.
///
/// Targets are addressed as `%<docname>` or `%<docname>#<label>`, which is
/// unique once all documents share a single output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeResolver;

impl ReferenceResolver for ScopeResolver {
    fn resolve(&self, tree: &mut Document, scope: &ResolveScope<'_>, _: &mut Diagnostics) {
        let mut resolved = 0usize;
        let children = std::mem::take(&mut tree.children);
        tree.children = splice(children, &mut |node| match node {
            Node::PendingXref(xref) if scope.contains(&xref.refdocname) => {
                resolved += 1;
                Splice::Replace(vec![Node::Reference(link(xref))])
            }
            other => Splice::Descend(other),
        });
        tracing::debug!(
            scope = %scope.docname,
            "resolved {resolved} references, {} left pending",
            tree.pending_xrefs()
        );
    }
}

/// The in-document address of a target.
#[must_use]
pub fn target_uri(docname: &Docname, label: &str) -> String {
    if label.is_empty() {
        format!("%{docname}")
    } else {
        format!("%{docname}#{label}")
    }
}

fn link(xref: PendingXref) -> Reference {
    Reference {
        refuri: target_uri(&xref.refdocname, &xref.reftarget),
        text: xref.refsectname,
    }
}
