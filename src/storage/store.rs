//! Read-only access to parsed documents.

use std::collections::BTreeMap;

use crate::domain::{Docname, Document};

/// Error returned when a docname is not known to a store.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("document {0} not found")]
pub struct NotFoundError(pub Docname);

/// A source of parsed documents, keyed by docname.
///
/// Stores are read-only during assembly. [`fetch`](Self::fetch) hands out an
/// owned copy, which callers are free to tag and splice.
pub trait DocumentStore {
    /// Whether a document with this docname exists.
    fn has(&self, docname: &Docname) -> bool;

    /// Returns a copy of the document.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] if the docname is unknown.
    fn fetch(&self, docname: &Docname) -> Result<Document, NotFoundError>;

    /// Every known docname, in sorted order.
    fn docnames(&self) -> Box<dyn Iterator<Item = &Docname> + '_>;
}

/// A [`DocumentStore`] holding its documents in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    documents: BTreeMap<Docname, Document>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a document.
    pub fn insert(&mut self, docname: Docname, document: Document) {
        self.documents.insert(docname, document);
    }

    /// Number of documents held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the store holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl FromIterator<(Docname, Document)> for MemoryStore {
    fn from_iter<T: IntoIterator<Item = (Docname, Document)>>(iter: T) -> Self {
        Self {
            documents: iter.into_iter().collect(),
        }
    }
}

impl DocumentStore for MemoryStore {
    fn has(&self, docname: &Docname) -> bool {
        self.documents.contains_key(docname)
    }

    fn fetch(&self, docname: &Docname) -> Result<Document, NotFoundError> {
        self.documents
            .get(docname)
            .cloned()
            .ok_or_else(|| NotFoundError(docname.clone()))
    }

    fn docnames(&self) -> Box<dyn Iterator<Item = &Docname> + '_> {
        Box::new(self.documents.keys())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Node;

    fn docname(s: &str) -> Docname {
        Docname::try_from(s).unwrap()
    }

    #[test]
    fn fetch_returns_independent_copies() {
        let mut store = MemoryStore::new();
        store.insert(docname("a"), Document::new(vec![Node::text("a")]));

        let mut copy = store.fetch(&docname("a")).unwrap();
        copy.tag(docname("a"));
        copy.children.clear();

        let original = store.fetch(&docname("a")).unwrap();
        assert!(original.docname.is_none());
        assert_eq!(original.children.len(), 1);
    }

    #[test]
    fn fetch_unknown_docname_fails() {
        let store = MemoryStore::new();

        assert!(!store.has(&docname("missing")));
        assert_eq!(
            store.fetch(&docname("missing")).unwrap_err(),
            NotFoundError(docname("missing"))
        );
    }

    #[test]
    fn docnames_are_sorted() {
        let store: MemoryStore = ["b", "a/c", "a"]
            .into_iter()
            .map(|name| (docname(name), Document::default()))
            .collect();

        let names: Vec<_> = store.docnames().map(Docname::as_str).collect();
        assert_eq!(names, vec!["a", "a/c", "b"]);
        assert_eq!(store.len(), 3);
    }
}
