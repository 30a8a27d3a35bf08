use crate::{
    domain::{Docname, Document},
    storage::{DocumentStore, NotFoundError},
};

/// The caption of the first captioned toctree in the root document.
///
/// Labels the top-level table of contents separately from the document
/// title. `None` when no toctree carries a caption.
///
/// # Errors
///
/// Returns [`NotFoundError`] if the root document does not exist.
pub fn contents_name<S>(store: &S, root: &Docname) -> Result<Option<String>, NotFoundError>
where
    S: DocumentStore + ?Sized,
{
    Ok(first_caption(&store.fetch(root)?))
}

/// The caption of the first captioned toctree, in document order.
#[must_use]
pub fn first_caption(document: &Document) -> Option<String> {
    document
        .toctrees()
        .find_map(|toctree| toctree.caption.clone())
}

/// The table of contents depth taken from the first toctree.
///
/// Only the first toctree counts; `None` when it has no positive `maxdepth`
/// or the document has no toctree at all.
#[must_use]
pub fn tocdepth(document: &Document) -> Option<u32> {
    document
        .toctrees()
        .next()
        .and_then(|toctree| toctree.maxdepth)
        .filter(|depth| *depth > 0)
}
