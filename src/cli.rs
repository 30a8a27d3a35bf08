use std::path::{Path, PathBuf};

mod build;
mod outline;
mod terminal;
mod units;

use bindery::{Config, Diagnostics, Directory};
use build::Build;
use clap::ArgAction;
use outline::Outline;
use tracing::instrument;
use units::Units;

use crate::cli::terminal::Colorize;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the project root, containing bindery.toml
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Build(Build::default()))
            .run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Assemble every output unit and write the artifacts (default)
    Build(Build),

    /// Create a bindery.toml and a starter root document
    Init,

    /// List the configured output units
    Units(Units),

    /// Print the outline of the merged tree for one root document
    Outline(Outline),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Build(command) => command.run(&root)?,
            Self::Init => Init::run(&root)?,
            Self::Units(command) => command.run(&root)?,
            Self::Outline(command) => command.run(&root)?,
        }
        Ok(())
    }
}

struct Init;

impl Init {
    #[instrument]
    fn run(root: &Path) -> anyhow::Result<()> {
        use std::fs;

        let config_path = root.join(bindery::domain::CONFIG_FILE);
        if config_path.exists() {
            anyhow::bail!(
                "Project already initialized (found existing {})",
                config_path.display()
            );
        }

        fs::create_dir_all(root)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", root.display()))?;

        Config::default()
            .save(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create bindery.toml: {e}"))?;

        let index_path = root.join("index.yaml");
        if !index_path.exists() {
            fs::write(
                &index_path,
                "children:\n  - type: section\n    title: Welcome\n    children:\n      - type: \
                 toctree\n        caption: Contents\n        entries: []\n",
            )
            .map_err(|e| anyhow::anyhow!("Failed to create index.yaml: {e}"))?;
        }

        println!("Initialized project in {}", root.display());
        println!("  Created: bindery.toml");
        println!("  Created: index.yaml");
        println!();
        println!("Next steps:");
        println!("  add documents and list them in the toctree of index.yaml, then run 'bind build'");

        Ok(())
    }
}

/// Loads the project and reports how many documents were found.
fn load_project(root: &Path) -> anyhow::Result<Directory<bindery::storage::Loaded>> {
    let directory = Directory::new(root.to_path_buf()).load_all()?;
    tracing::info!(
        "loaded {} documents from {}",
        directory.store().len(),
        root.display()
    );
    Ok(directory)
}

/// Prints a one-line summary of the warnings collected during a command.
fn report_warnings(diagnostics: &Diagnostics) {
    let count = diagnostics.warnings().len();
    if count > 0 {
        let noun = if count == 1 { "warning" } else { "warnings" };
        eprintln!("{}", format!("{count} {noun}").warning());
    }
}
