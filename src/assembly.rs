//! Assembly of output units.
//!
//! An output unit starts from a root document. Its toctrees are inlined
//! recursively, appendices are attached at the end, references are resolved
//! within the merged scope, and references leaving the scope are rewritten
//! into descriptive text.

mod assembler;
pub use assembler::{toctree_skeleton, Assembled, Assembler, PLACEHOLDER_TITLE};

mod builder;
pub use builder::{Builder, DocumentData, MergedTree, Metadata};

/// Contents name and table of contents depth of a root document.
pub mod contents;
pub use contents::contents_name;

mod diagnostics;
pub use diagnostics::{Diagnostics, Warning};

mod inliner;
pub use inliner::inline_all_toctrees;

pub mod render;
pub use render::{write_artifact, JsonRenderer, OutlineRenderer, Renderer, WriteError};

mod resolver;
pub use resolver::{target_uri, ReferenceResolver, ResolveScope, ScopeResolver};

mod rewriter;
pub use rewriter::{fallback, rewrite_pending_xrefs};
