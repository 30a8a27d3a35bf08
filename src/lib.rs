//! Composite document assembly
//!
//! A project's documents form a navigation hierarchy of toctrees. This crate
//! merges the hierarchy below a root document into one tree, so that it can
//! be rendered as a single artifact, and rewrites the references that cannot
//! be linked inside that artifact.

pub mod assembly;
pub use assembly::{Assembler, Builder, Diagnostics, MergedTree, Warning};

pub mod domain;
pub use domain::{Config, Docname, Document, Node, OutputUnit, TitleIndex};

/// Document stores, in memory and on disk.
pub mod storage;
pub use storage::{Directory, DocumentStore, MemoryStore};
