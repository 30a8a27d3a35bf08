//! A filesystem backed store of documents
//!
//! The [`Directory`] loads every parsed document stored under a project root
//! and serves them through the filesystem agnostic [`MemoryStore`].
//!
//! Documents are YAML files holding an already-parsed [`Document`] tree. The
//! docname of a file is its path relative to the source directory, without
//! the extension, using `/` as separator.

use std::{
    ffi::OsStr,
    fmt, fs,
    path::{Path, PathBuf},
};

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use walkdir::WalkDir;

use crate::{
    domain::{Config, Docname, Document, CONFIG_FILE},
    storage::{DocumentStore, MemoryStore, NotFoundError},
};

/// File extensions recognised as parsed documents.
const DOCUMENT_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// State of a [`Directory`] whose documents have been read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
    store: MemoryStore,
    config: Config,
}

/// State of a [`Directory`] that has not been read yet.
#[derive(Debug, PartialEq, Eq)]
pub struct Unloaded;

/// A filesystem backed store of documents.
#[derive(Debug)]
pub struct Directory<S> {
    /// The project root, containing the configuration file.
    root: PathBuf,
    state: S,
}

impl<S> Directory<S> {
    /// The project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Directory<Unloaded> {
    /// Opens a project at the given path.
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self {
            root,
            state: Unloaded,
        }
    }

    /// Load the configuration and every document from disk.
    ///
    /// A missing configuration file means the default configuration is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be
    /// loaded, or if any document file cannot be read or parsed.
    pub fn load_all(self) -> Result<Directory<Loaded>, DirectoryLoadError> {
        let config = load_config(&self.root)?;
        let source_dir = self.root.join(&config.source_dir);
        let paths = collect_document_paths(&source_dir);

        let (documents, failures): (Vec<_>, Vec<_>) = paths
            .par_iter()
            .map(|path| try_load_document(path, &source_dir))
            .partition(Result::is_ok);

        let failures: Vec<_> = failures.into_iter().filter_map(Result::err).collect();
        if !failures.is_empty() {
            return Err(DirectoryLoadError::InvalidDocuments(failures));
        }

        let store: MemoryStore = documents.into_iter().filter_map(Result::ok).collect();
        tracing::debug!(
            "Loaded {} documents from {}",
            store.len(),
            source_dir.display()
        );

        Ok(Directory {
            root: self.root,
            state: Loaded { store, config },
        })
    }
}

impl Directory<Loaded> {
    /// The project configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.state.config
    }

    /// The loaded documents.
    #[must_use]
    pub const fn store(&self) -> &MemoryStore {
        &self.state.store
    }
}

impl DocumentStore for Directory<Loaded> {
    fn has(&self, docname: &Docname) -> bool {
        self.state.store.has(docname)
    }

    fn fetch(&self, docname: &Docname) -> Result<Document, NotFoundError> {
        self.state.store.fetch(docname)
    }

    fn docnames(&self) -> Box<dyn Iterator<Item = &Docname> + '_> {
        self.state.store.docnames()
    }
}

/// A document file that could not be loaded.
#[derive(Debug)]
pub struct InvalidDocument {
    /// Path of the offending file.
    pub path: PathBuf,
    /// Why it could not be loaded.
    pub reason: String,
}

/// Errors that can occur when loading a project directory.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryLoadError {
    /// The configuration file exists but is not valid.
    Config(String),
    /// One or more document files could not be loaded.
    InvalidDocuments(Vec<InvalidDocument>),
}

impl fmt::Display for DirectoryLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(reason) => write!(f, "{reason}"),
            Self::InvalidDocuments(documents) => {
                write!(f, "Invalid documents: ")?;
                for (i, document) in documents.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} ({})", document.path.display(), document.reason)?;
                }
                Ok(())
            }
        }
    }
}

fn load_config(root: &Path) -> Result<Config, DirectoryLoadError> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        tracing::debug!("No config file at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    Config::load(&path).map_err(DirectoryLoadError::Config)
}

fn collect_document_paths(source_dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(source_dir)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()))
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(OsStr::to_str)
                .is_some_and(|ext| DOCUMENT_EXTENSIONS.contains(&ext))
        })
        .map(walkdir::DirEntry::into_path)
        .collect()
}

fn is_hidden(name: &OsStr) -> bool {
    name.to_str().is_some_and(|name| name.starts_with('.'))
}

fn try_load_document(
    path: &Path,
    source_dir: &Path,
) -> Result<(Docname, Document), InvalidDocument> {
    let invalid = |reason: String| InvalidDocument {
        path: path.to_path_buf(),
        reason,
    };

    let docname = docname_from_path(path, source_dir).map_err(invalid)?;
    let content = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    let mut document: Document =
        serde_yaml::from_str(&content).map_err(|e| invalid(e.to_string()))?;

    // Files never carry their own docname; it is derived from the path.
    document.docname = None;

    tracing::trace!("Loaded {docname} from {}", path.display());
    Ok((docname, document))
}

/// Derives the docname of a document file from its path.
///
/// # Errors
///
/// Returns an error if the path is outside `source_dir` or its components
/// do not form a valid docname.
pub fn docname_from_path(path: &Path, source_dir: &Path) -> Result<Docname, String> {
    let relative = path
        .strip_prefix(source_dir)
        .map_err(|_| format!("not inside {}", source_dir.display()))?
        .with_extension("");

    let segments = relative
        .components()
        .map(|component| {
            component
                .as_os_str()
                .to_str()
                .ok_or_else(|| "path is not valid UTF-8".to_string())
        })
        .collect::<Result<Vec<_>, _>>()?;

    Docname::new(segments.join("/")).map_err(|e| e.to_string())
}
