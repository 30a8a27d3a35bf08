//! Assembly of one output unit into a single merged tree.

use std::collections::BTreeSet;

use tracing::instrument;

use crate::{
    assembly::{
        inliner::inline_all_toctrees, rewriter::rewrite_pending_xrefs, Diagnostics,
        ReferenceResolver, ResolveScope, Warning,
    },
    domain::{Docname, Document, Node, Section, TitleIndex},
    storage::{DocumentStore, NotFoundError},
};

/// Title of the placeholder section created in toctree-only mode.
///
/// Renderers are expected to replace it with the configured title.
pub const PLACEHOLDER_TITLE: &str = "<Set title in bindery.toml>";

/// The result of assembling one output unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembled {
    /// The merged tree, tagged with the root docname.
    pub document: Document,
    /// Every document merged into the tree, root and appendices included.
    pub included: BTreeSet<Docname>,
}

/// Merges a root document, everything its toctrees reach and a list of
/// appendices into one tree, then resolves its references.
#[derive(Debug)]
pub struct Assembler<'a, S: ?Sized, R: ?Sized> {
    store: &'a S,
    resolver: &'a R,
    titles: &'a TitleIndex,
}

impl<'a, S, R> Assembler<'a, S, R>
where
    S: DocumentStore + ?Sized,
    R: ReferenceResolver + ?Sized,
{
    /// Creates an assembler reading from `store`.
    ///
    /// `titles` names the output units that references leaving the merged
    /// tree are attributed to.
    pub const fn new(store: &'a S, resolver: &'a R, titles: &'a TitleIndex) -> Self {
        Self {
            store,
            resolver,
            titles,
        }
    }

    /// Assembles the tree for `root`.
    ///
    /// Appendices are attached flat at the end, in order, and are never
    /// inlined from a toctree. Unknown appendices are reported and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] if the root document does not exist.
    #[instrument(level = "debug", skip(self, diagnostics))]
    pub fn assemble(
        &self,
        root: &Docname,
        toctree_only: bool,
        appendices: &[Docname],
        diagnostics: &mut Diagnostics,
    ) -> Result<Assembled, NotFoundError> {
        let mut visited: BTreeSet<Docname> = std::iter::once(root.clone())
            .chain(appendices.iter().cloned())
            .collect();

        diagnostics.progress(root);
        let mut tree = self.store.fetch(root)?;
        tree.tag(root.clone());
        if toctree_only {
            tree = toctree_skeleton(&tree);
        }

        let mut merged = inline_all_toctrees(self.store, &mut visited, root, tree, diagnostics);
        merged.tag(root.clone());

        for appendix in appendices {
            if !self.store.has(appendix) {
                diagnostics.warn(Warning::UnknownDocname {
                    docname: appendix.clone(),
                    referenced_from: None,
                });
                continue;
            }
            let document = self.store.fetch(appendix)?.tagged(appendix.clone());
            merged.children.push(Node::Included(document));
        }

        let included: BTreeSet<Docname> = std::iter::once(root.clone())
            .chain(merged.included_docnames().cloned())
            .collect();

        tracing::debug!("resolving references");
        let scope = ResolveScope {
            docname: root,
            included: &included,
        };
        self.resolver.resolve(&mut merged, &scope, diagnostics);
        let document = rewrite_pending_xrefs(merged, self.titles);

        Ok(Assembled { document, included })
    }
}

/// A fresh tree holding only the toctrees of `tree`, in document order,
/// inside a single placeholder section.
#[must_use]
pub fn toctree_skeleton(tree: &Document) -> Document {
    let toctrees = tree.toctrees().cloned().map(Node::Toctree).collect();
    Document::new(vec![Node::Section(Section::new(
        PLACEHOLDER_TITLE,
        toctrees,
    ))])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assembly::ScopeResolver,
        domain::{PendingXref, Reference, Toctree},
        storage::MemoryStore,
    };

    fn docname(s: &str) -> Docname {
        Docname::try_from(s).unwrap()
    }

    fn toctree(entries: &[&str]) -> Node {
        Node::Toctree(Toctree::new(entries.iter().map(|e| docname(e)).collect()))
    }

    fn store(documents: Vec<(&str, Vec<Node>)>) -> MemoryStore {
        documents
            .into_iter()
            .map(|(name, children)| (docname(name), Document::new(children)))
            .collect()
    }

    fn assemble(
        store: &MemoryStore,
        root: &str,
        toctree_only: bool,
        appendices: &[&str],
        diagnostics: &mut Diagnostics,
    ) -> Assembled {
        let titles = TitleIndex::default();
        let appendices: Vec<_> = appendices.iter().map(|a| docname(a)).collect();
        Assembler::new(store, &ScopeResolver, &titles)
            .assemble(&docname(root), toctree_only, &appendices, diagnostics)
            .unwrap()
    }

    fn included_docname(node: &Node) -> Option<&str> {
        match node {
            Node::Included(document) => document.docname.as_ref().map(Docname::as_str),
            _ => None,
        }
    }

    #[test]
    fn merged_tree_is_tagged_with_root() {
        let store = store(vec![("index", vec![Node::text("hello")])]);

        let assembled = assemble(&store, "index", false, &[], &mut Diagnostics::new());

        assert_eq!(assembled.document.docname, Some(docname("index")));
        assert_eq!(assembled.included, BTreeSet::from([docname("index")]));
    }

    #[test]
    fn appendices_come_last_in_order() {
        let store = store(vec![
            (
                "r",
                vec![
                    Node::Section(Section::new("R", vec![toctree(&["c"])])),
                    Node::text("tail"),
                ],
            ),
            ("c", vec![Node::text("child")]),
            ("x", vec![Node::text("X")]),
            ("y", vec![Node::text("Y")]),
        ]);

        let assembled = assemble(&store, "r", false, &["x", "y"], &mut Diagnostics::new());

        let top: Vec<_> = assembled
            .document
            .children
            .iter()
            .map(included_docname)
            .collect();
        assert_eq!(top, vec![None, None, Some("x"), Some("y")]);
    }

    #[test]
    fn appendix_listed_in_a_toctree_is_only_appended() {
        let store = store(vec![
            ("r", vec![toctree(&["x", "c"])]),
            ("c", vec![Node::text("C")]),
            ("x", vec![Node::text("X")]),
        ]);

        let assembled = assemble(&store, "r", false, &["x"], &mut Diagnostics::new());

        let included: Vec<_> = assembled
            .document
            .included_docnames()
            .map(Docname::as_str)
            .collect();
        assert_eq!(included, vec!["c", "x"]);
        assert_eq!(assembled.document.astext(), "CX");
    }

    #[test]
    fn unknown_appendix_is_skipped_with_one_warning() {
        let store = store(vec![("r", vec![Node::text("R")]), ("x", vec![Node::text("X")])]);
        let mut diagnostics = Diagnostics::new();

        let assembled = assemble(&store, "r", false, &["nope", "x"], &mut diagnostics);

        assert_eq!(assembled.document.astext(), "RX");
        assert_eq!(
            diagnostics.warnings(),
            &[Warning::UnknownDocname {
                docname: docname("nope"),
                referenced_from: None,
            }]
        );
        assert!(!assembled.included.contains(&docname("nope")));
    }

    #[test]
    fn toctree_only_keeps_nothing_but_navigation() {
        let store = store(vec![
            (
                "r",
                vec![
                    Node::text("front matter"),
                    Node::Section(Section::new(
                        "Index",
                        vec![Node::text("blurb"), toctree(&["c"])],
                    )),
                ],
            ),
            ("c", vec![Node::text("content")]),
        ]);

        let assembled = assemble(&store, "r", true, &[], &mut Diagnostics::new());

        let [Node::Section(section)] = assembled.document.children.as_slice() else {
            panic!("expected a single section");
        };
        assert_eq!(section.title, PLACEHOLDER_TITLE);
        assert_eq!(section.children.len(), 1);
        assert_eq!(included_docname(&section.children[0]), Some("c"));
        assert_eq!(assembled.document.astext(), format!("{PLACEHOLDER_TITLE}content"));
    }

    #[test]
    fn toctree_skeleton_collects_nested_toctrees() {
        let tree = Document::new(vec![
            toctree(&["a"]),
            Node::text("dropped"),
            Node::Section(Section::new("S", vec![toctree(&["b"])])),
        ]);

        let skeleton = toctree_skeleton(&tree);

        let [Node::Section(section)] = skeleton.children.as_slice() else {
            panic!("expected a single section");
        };
        assert_eq!(section.children, vec![toctree(&["a"]), toctree(&["b"])]);
    }

    #[test]
    fn references_are_linked_or_rewritten() {
        let xref = |target: &str, text: &str| {
            Node::PendingXref(PendingXref {
                refdocname: docname(target),
                refsectname: text.to_string(),
                reftarget: "label".to_string(),
            })
        };
        let store = store(vec![
            (
                "index",
                vec![
                    Node::paragraph(vec![xref("c", "Child"), xref("guide/install", "Installing")]),
                    toctree(&["c"]),
                ],
            ),
            ("c", vec![Node::text("child")]),
        ]);
        let mut titles = TitleIndex::default();
        titles.push("guide", "User Guide");

        let assembled = Assembler::new(&store, &ScopeResolver, &titles)
            .assemble(&docname("index"), false, &[], &mut Diagnostics::new())
            .unwrap();

        assert_eq!(assembled.document.pending_xrefs(), 0);
        let Node::Paragraph { children } = &assembled.document.children[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(
            children[0],
            Node::Reference(Reference {
                refuri: "%c#label".to_string(),
                text: "Child".to_string(),
            })
        );
        assert_eq!(
            assembled.document.children[0].astext(),
            "ChildInstalling (in User Guide)"
        );
    }

    #[test]
    fn unknown_root_is_an_error() {
        let store = MemoryStore::new();
        let titles = TitleIndex::default();

        let error = Assembler::new(&store, &ScopeResolver, &titles)
            .assemble(&docname("index"), false, &[], &mut Diagnostics::new())
            .unwrap_err();

        assert_eq!(error, NotFoundError(docname("index")));
    }

    #[test]
    fn assembling_twice_from_one_store_gives_identical_trees() {
        let store = store(vec![
            ("a", vec![toctree(&["b"])]),
            ("b", vec![Node::Section(Section::new("B", Vec::new()))]),
        ]);

        let first = assemble(&store, "a", false, &[], &mut Diagnostics::new());
        let second = assemble(&store, "a", false, &[], &mut Diagnostics::new());

        assert_eq!(first, second);
    }
}
