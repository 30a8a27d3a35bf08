//! Fallback text for references that leave the merged tree.
//!
//! A reference whose target was not merged into this output unit lives in a
//! different artifact, which cannot be linked to. It is replaced by the
//! target's section name, followed by the title of the output unit that owns
//! it when the [`TitleIndex`] knows one: *Installing* (in *User Guide*).

use crate::domain::{
    node::{splice, Splice},
    Document, Node, PendingXref, TitleIndex,
};

/// Replaces every remaining [`Node::PendingXref`] in `tree` with plain
/// content.
#[must_use]
pub fn rewrite_pending_xrefs(tree: Document, titles: &TitleIndex) -> Document {
    let Document { docname, children } = tree;
    let children = splice(children, &mut |node| match node {
        Node::PendingXref(xref) => Splice::Replace(fallback(xref, titles)),
        other => Splice::Descend(other),
    });
    Document { docname, children }
}

/// The nodes standing in for one unreachable reference.
#[must_use]
pub fn fallback(xref: PendingXref, titles: &TitleIndex) -> Vec<Node> {
    let group = titles.lookup(xref.refdocname.as_str()).map(str::to_owned);
    tracing::debug!(
        refdocname = %xref.refdocname,
        group = group.as_deref().unwrap_or("<none>"),
        "reference leaves the merged tree"
    );

    let mut nodes = vec![Node::emphasis(xref.refsectname)];
    if let Some(title) = group {
        nodes.push(Node::text(" (in "));
        nodes.push(Node::emphasis(title));
        nodes.push(Node::text(")"));
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Docname, Section};

    fn pending(target: &str, text: &str) -> Node {
        Node::PendingXref(PendingXref {
            refdocname: Docname::try_from(target).unwrap(),
            refsectname: text.to_string(),
            reftarget: String::new(),
        })
    }

    fn guide_titles() -> TitleIndex {
        let mut titles = TitleIndex::default();
        titles.push("guide", "User Guide");
        titles
    }

    #[test]
    fn names_the_owning_group() {
        let tree = Document::new(vec![Node::paragraph(vec![
            Node::text("See "),
            pending("guide/install", "Installing"),
            Node::text("."),
        ])]);

        let tree = rewrite_pending_xrefs(tree, &guide_titles());

        assert_eq!(tree.astext(), "See Installing (in User Guide).");
        assert_eq!(tree.pending_xrefs(), 0);
        let Node::Paragraph { children } = &tree.children[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(children[1], Node::emphasis("Installing"));
        assert_eq!(children[3], Node::emphasis("User Guide"));
    }

    #[test]
    fn without_matching_group_only_the_section_name_remains() {
        let tree = Document::new(vec![pending("api/index", "Installing")]);

        let tree = rewrite_pending_xrefs(tree, &guide_titles());

        assert_eq!(tree.children, vec![Node::emphasis("Installing")]);
    }

    #[test]
    fn rewrites_references_at_any_depth() {
        let tree = Document::new(vec![Node::Section(Section::new(
            "Top",
            vec![Node::Included(Document::new(vec![Node::paragraph(vec![
                pending("guide/a", "A"),
                pending("other", "B"),
            ])]))],
        ))]);

        let tree = rewrite_pending_xrefs(tree, &guide_titles());

        assert_eq!(tree.pending_xrefs(), 0);
        assert_eq!(tree.astext(), "TopA (in User Guide)B");
    }

    #[test]
    fn first_matching_group_wins() {
        let mut titles = TitleIndex::default();
        titles.push("guide/", "User Guide");
        titles.push("guide/advanced/", "Advanced");

        let nodes = fallback(
            PendingXref {
                refdocname: Docname::try_from("guide/advanced/tuning").unwrap(),
                refsectname: "Tuning".to_string(),
                reftarget: String::new(),
            },
            &titles,
        );

        let text: String = nodes.iter().map(Node::astext).collect();
        assert_eq!(text, "Tuning (in User Guide)");
    }
}
