use crate::domain::Docname;

/// A recoverable problem found while preparing or assembling output units.
///
/// None of these abort a build. The offending entry is skipped and the
/// warning is recorded in [`Diagnostics`].
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Warning {
    /// A toctree entry or appendix names a document that does not exist.
    #[error("{} references unknown document {docname}", origin(.referenced_from.as_ref()))]
    UnknownDocname {
        /// The missing document.
        docname: Docname,
        /// The document whose toctree listed it, or `None` for an appendix.
        referenced_from: Option<Docname>,
    },

    /// An output unit's root document does not exist; the unit is dropped.
    #[error("output unit references unknown root document {0}")]
    UnknownRootDocname(Docname),

    /// The configuration declares an empty list of output units.
    #[error("no output units configured; no documents will be written")]
    NoOutputUnitsConfigured,

    /// The configured top-level sectioning is not recognised and is ignored.
    #[error("invalid toplevel_sectioning, ignored: {0}")]
    InvalidToplevelSectioning(String),
}

fn origin(referenced_from: Option<&Docname>) -> String {
    referenced_from.map_or_else(
        || "appendix list".to_string(),
        |docname| format!("toctree in {docname}"),
    )
}

/// Collects warnings and reports progress for one build.
///
/// Everything recorded here is also forwarded to `tracing`.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{warning}");
        self.warnings.push(warning);
    }

    /// Reports that a document is being merged into the current tree.
    #[allow(clippy::unused_self)]
    pub fn progress(&self, docname: &Docname) {
        tracing::info!(%docname, "inlining");
    }

    /// The warnings recorded so far, in order.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Removes and returns the recorded warnings.
    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }
}
