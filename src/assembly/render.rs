//! Handing merged trees to a renderer.
//!
//! Typesetting is not done here. [`JsonRenderer`] serializes the merged tree
//! and its metadata for a downstream typesetter, and [`OutlineRenderer`]
//! prints the structure of a tree for humans.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Component, Path, PathBuf},
};

use crate::{assembly::MergedTree, domain::Node};

/// Produces an artifact from a merged tree.
pub trait Renderer {
    /// Writes the artifact for `tree` to `out`.
    ///
    /// # Errors
    ///
    /// Returns any error raised while writing.
    fn render(&self, tree: &MergedTree, out: &mut dyn Write) -> io::Result<()>;
}

/// Serializes the merged tree and its metadata as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer {
    /// Indent the output.
    pub pretty: bool,
}

impl Renderer for JsonRenderer {
    fn render(&self, tree: &MergedTree, out: &mut dyn Write) -> io::Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *out, tree)?;
        } else {
            serde_json::to_writer(&mut *out, tree)?;
        }
        writeln!(out)
    }
}

/// Prints the included documents and section titles of a merged tree as an
/// indented outline.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineRenderer;

impl Renderer for OutlineRenderer {
    fn render(&self, tree: &MergedTree, out: &mut dyn Write) -> io::Result<()> {
        writeln!(
            out,
            "{} ({})",
            tree.metadata.title, tree.metadata.docname
        )?;
        write_outline(&tree.document.children, 1, out)
    }
}

fn write_outline(nodes: &[Node], depth: usize, out: &mut dyn Write) -> io::Result<()> {
    let indent = "  ".repeat(depth);
    for node in nodes {
        match node {
            Node::Included(document) => {
                if let Some(docname) = &document.docname {
                    writeln!(out, "{indent}[{docname}]")?;
                }
                write_outline(&document.children, depth + 1, out)?;
            }
            Node::Section(section) => {
                writeln!(out, "{indent}{}", section.title)?;
                write_outline(&section.children, depth + 1, out)?;
            }
            _ => {}
        }
    }
    Ok(())
}

/// Errors that can occur when writing an artifact.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// The target would be written outside the output directory.
    #[error("target {0} must be a relative path inside the output directory")]
    InvalidTarget(String),

    /// The artifact could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// The file being written.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
}

/// Renders `tree` into `<outdir>/<target>`, creating directories as needed.
///
/// # Errors
///
/// Returns an error if the target escapes `outdir` or the file cannot be
/// written.
pub fn write_artifact(
    renderer: &dyn Renderer,
    tree: &MergedTree,
    outdir: &Path,
) -> Result<PathBuf, WriteError> {
    let target = Path::new(&tree.metadata.target);
    let escapes = target.as_os_str().is_empty()
        || target
            .components()
            .any(|component| !matches!(component, Component::Normal(_)));
    if escapes {
        return Err(WriteError::InvalidTarget(tree.metadata.target.clone()));
    }

    let path = outdir.join(target);
    let io_error = |source| WriteError::Io {
        path: path.clone(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let file = File::create(&path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    renderer.render(tree, &mut writer).map_err(io_error)?;
    writer.flush().map_err(io_error)?;

    tracing::debug!("wrote {}", path.display());
    Ok(path)
}
