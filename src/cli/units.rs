use std::path::Path;

use anyhow::Context;
use bindery::{DocumentStore, OutputUnit};
use clap::Parser;
use regex::Regex;
use serde::Serialize;
use tracing::instrument;

use super::{load_project, terminal::Colorize};

#[derive(Debug, Parser, Default)]
#[command(about = "List the configured output units")]
pub struct Units {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Only list units whose root docname or target matches this regular
    /// expression
    #[arg(long, value_name = "REGEX")]
    filter: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Serialize)]
struct UnitRow<'a> {
    #[serde(flatten)]
    unit: &'a OutputUnit,
    found: bool,
    appendices: bool,
}

impl Units {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let directory = load_project(root)?;
        let units = directory.config().output_units();
        let filter = self
            .filter
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).with_context(|| format!("invalid regex: {pattern}"))
            })
            .transpose()?;

        let rows: Vec<_> = units
            .iter()
            .filter(|unit| filter.as_ref().is_none_or(|regex| unit_matches(regex, unit)))
            .map(|unit| UnitRow {
                unit,
                found: directory.has(&unit.docname),
                appendices: unit.takes_appendices(),
            })
            .collect();

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
            OutputFormat::Table => Self::output_table(&rows),
        }
        Ok(())
    }

    fn output_table(rows: &[UnitRow<'_>]) {
        if rows.is_empty() {
            println!("No output units configured.");
            return;
        }

        println!(
            "{:<24} {:<24} {:<10} Title",
            "Docname", "Target", "Class"
        );
        println!("{}", "─".repeat(72).dim());
        for row in rows {
            let docname = format!("{:<24}", row.unit.docname.as_str());
            let docname = if row.found {
                docname.docname()
            } else {
                docname.warning()
            };
            println!(
                "{docname} {:<24} {:<10} {}",
                row.unit.target, row.unit.docclass, row.unit.title
            );
        }

        let missing = rows.iter().filter(|row| !row.found).count();
        if missing > 0 {
            println!();
            println!(
                "{}",
                format!("{missing} root documents not found; those units will be skipped")
                    .warning()
            );
        }
    }
}

fn unit_matches(regex: &Regex, unit: &OutputUnit) -> bool {
    regex.is_match(unit.docname.as_str()) || regex.is_match(&unit.target)
}
