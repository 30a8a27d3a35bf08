use std::path::{Path, PathBuf};

use bindery::{
    assembly::{write_artifact, JsonRenderer},
    Builder, Diagnostics,
};
use clap::Parser;
use tracing::instrument;

use super::{load_project, report_warnings, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Assemble every output unit and write one artifact per unit")]
pub struct Build {
    /// Output directory, relative to the project root
    #[arg(short, long, default_value = "_build")]
    out: PathBuf,

    /// Write compact JSON instead of indented JSON
    #[arg(long)]
    compact: bool,
}

impl Default for Build {
    fn default() -> Self {
        Self {
            out: PathBuf::from("_build"),
            compact: false,
        }
    }
}

impl Build {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let directory = load_project(root)?;
        let outdir = root.join(&self.out);
        let renderer = JsonRenderer {
            pretty: !self.compact,
        };

        let mut diagnostics = Diagnostics::new();
        let built = Builder::new(&directory, directory.config()).build_all(&mut diagnostics);

        let mut failed = 0_usize;
        for (unit, result) in &built {
            let written = result
                .as_ref()
                .map_err(ToString::to_string)
                .and_then(|tree| {
                    write_artifact(&renderer, tree, &outdir).map_err(|e| e.to_string())
                });

            match written {
                Ok(path) => println!(
                    "{} {} -> {}",
                    "built".success(),
                    unit.docname.as_str().docname(),
                    path.display()
                ),
                Err(reason) => {
                    failed += 1;
                    eprintln!(
                        "{} {}: {reason}",
                        "failed".warning(),
                        unit.docname.as_str().docname()
                    );
                }
            }
        }

        report_warnings(&diagnostics);

        if failed > 0 {
            anyhow::bail!("{failed} of {} output units failed", built.len());
        }
        Ok(())
    }
}
