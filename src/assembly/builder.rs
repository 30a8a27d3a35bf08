//! Turns the configured output units into merged trees.
//!
//! The [`Builder`] validates the output units against the document store,
//! builds the [`TitleIndex`] once, and assembles each unit in declared order.
//! Units are independent: each one gets a fresh visited set, and a failure
//! in one does not stop the others.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::instrument;

use crate::{
    assembly::{
        contents::{contents_name, tocdepth},
        Assembler, Diagnostics, ReferenceResolver, ScopeResolver, Warning,
    },
    domain::{Config, Docname, Document, OutputUnit, Sectioning, TitleIndex},
    storage::{DocumentStore, NotFoundError},
};

/// Everything a renderer needs to know about a merged tree besides its
/// content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    /// The root document of the output unit.
    pub docname: Docname,
    /// File name of the artifact.
    pub target: String,
    /// Title of the artifact.
    pub title: String,
    /// Author of the artifact.
    pub author: String,
    /// Document class of the artifact.
    pub docclass: String,
    /// Depth of the rendered table of contents; `None` means unlimited.
    pub tocdepth: Option<u32>,
    /// Label of the top-level table of contents.
    pub contentsname: Option<String>,
    /// Sectioning level of top-level sections.
    pub toplevel_sectioning: Option<Sectioning>,
}

/// The assembled, fully resolved tree of one output unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedTree {
    /// Metadata for the renderer.
    pub metadata: Metadata,
    /// Every document merged into the tree.
    pub included: BTreeSet<Docname>,
    /// The merged document.
    pub document: Document,
}

/// The validated output units and the title index derived from them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentData {
    /// Output units whose root document exists, in declared order.
    pub units: Vec<OutputUnit>,
    /// One entry per unit in `units`, in the same order.
    pub titles: TitleIndex,
}

/// Builds merged trees for every configured output unit.
#[derive(Debug)]
pub struct Builder<'a, S: ?Sized, R = ScopeResolver> {
    store: &'a S,
    config: &'a Config,
    resolver: R,
}

impl<'a, S> Builder<'a, S>
where
    S: DocumentStore + ?Sized,
{
    /// Creates a builder using the default [`ScopeResolver`].
    pub const fn new(store: &'a S, config: &'a Config) -> Self {
        Self {
            store,
            config,
            resolver: ScopeResolver,
        }
    }
}

impl<'a, S, R> Builder<'a, S, R>
where
    S: DocumentStore + ?Sized,
    R: ReferenceResolver,
{
    /// Replaces the reference resolver.
    pub fn with_resolver<T: ReferenceResolver>(self, resolver: T) -> Builder<'a, S, T> {
        Builder {
            store: self.store,
            config: self.config,
            resolver,
        }
    }

    /// Validates the configured output units and builds the title index.
    ///
    /// Units whose root document is unknown are dropped with a
    /// [`Warning::UnknownRootDocname`] and get no title index entry. An empty
    /// unit list is reported as [`Warning::NoOutputUnitsConfigured`].
    pub fn init_document_data(&self, diagnostics: &mut Diagnostics) -> DocumentData {
        let declared = self.config.output_units();
        if declared.is_empty() {
            diagnostics.warn(Warning::NoOutputUnitsConfigured);
            return DocumentData::default();
        }

        let mut units = Vec::with_capacity(declared.len());
        for unit in declared {
            if self.store.has(&unit.docname) {
                units.push(unit);
            } else {
                diagnostics.warn(Warning::UnknownRootDocname(unit.docname));
            }
        }

        let titles = TitleIndex::from_units(&units);
        DocumentData { units, titles }
    }

    /// The configured top-level sectioning, if it is valid.
    ///
    /// An unrecognised value is reported as
    /// [`Warning::InvalidToplevelSectioning`] and ignored.
    pub fn check_options(&self, diagnostics: &mut Diagnostics) -> Option<Sectioning> {
        let value = self.config.toplevel_sectioning.as_deref()?;
        value.parse().map_or_else(
            |invalid| {
                diagnostics.warn(Warning::InvalidToplevelSectioning(invalid));
                None
            },
            Some,
        )
    }

    /// Assembles a single output unit.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] if the unit's root document does not exist.
    #[instrument(level = "debug", skip_all, fields(unit = %unit.target))]
    pub fn build_unit(
        &self,
        unit: &OutputUnit,
        titles: &TitleIndex,
        toplevel_sectioning: Option<Sectioning>,
        diagnostics: &mut Diagnostics,
    ) -> Result<MergedTree, NotFoundError> {
        tracing::info!("processing {}", unit.target);

        let root = self.store.fetch(&unit.docname)?;
        let appendices: &[Docname] = if unit.takes_appendices() {
            &self.config.appendices
        } else {
            &[]
        };

        let assembled = Assembler::new(self.store, &self.resolver, titles).assemble(
            &unit.docname,
            unit.toctree_only,
            appendices,
            diagnostics,
        )?;

        let metadata = Metadata {
            docname: unit.docname.clone(),
            target: unit.target.clone(),
            title: unit.title.clone(),
            author: unit.author.clone(),
            docclass: unit.docclass.clone(),
            tocdepth: tocdepth(&root),
            contentsname: contents_name(self.store, &unit.docname)?,
            toplevel_sectioning,
        };

        tracing::info!(
            "assembled {} from {} documents",
            unit.target,
            assembled.included.len()
        );
        Ok(MergedTree {
            metadata,
            included: assembled.included,
            document: assembled.document,
        })
    }

    /// Assembles every valid output unit, in declared order.
    ///
    /// Each unit is paired with its result, so one failing unit does not
    /// prevent the others from being built.
    pub fn build_all(
        &self,
        diagnostics: &mut Diagnostics,
    ) -> Vec<(OutputUnit, Result<MergedTree, NotFoundError>)> {
        let toplevel_sectioning = self.check_options(diagnostics);
        let DocumentData { units, titles } = self.init_document_data(diagnostics);

        units
            .into_iter()
            .map(|unit| {
                let result = self.build_unit(&unit, &titles, toplevel_sectioning, diagnostics);
                (unit, result)
            })
            .collect()
    }
}
