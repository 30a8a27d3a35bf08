//! Domain models for document assembly.
//!
//! This module contains the core domain types including docnames, document
//! trees, output units and configuration.

mod config;
pub use config::{make_filename, Config, Sectioning, CONFIG_FILE};

/// Validated document identifiers.
pub mod docname;
pub use docname::{Docname, InvalidDocnameError};

mod document;
pub use document::Document;

/// Document tree nodes and tree rebuilding helpers.
pub mod node;
pub use node::{Node, PendingXref, Reference, Section, Toctree};

mod output_unit;
pub use output_unit::{OutputUnit, HOWTO_DOCCLASS};

mod title_index;
pub use title_index::TitleIndex;
