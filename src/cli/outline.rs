use std::{
    io::{self, Write},
    path::Path,
};

use bindery::{
    assembly::{OutlineRenderer, Renderer},
    Builder, Diagnostics, Docname, OutputUnit,
};
use clap::Parser;
use tracing::instrument;

use super::{load_project, report_warnings};

#[derive(Debug, Parser)]
#[command(about = "Print the documents and sections merged below a root document")]
pub struct Outline {
    /// The root document
    docname: Docname,

    /// Keep only the toctrees of the root document
    #[arg(long)]
    toctree_only: bool,
}

impl Outline {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let directory = load_project(root)?;
        let config = directory.config();
        let builder = Builder::new(&directory, config);

        let mut diagnostics = Diagnostics::new();
        let toplevel_sectioning = builder.check_options(&mut diagnostics);
        let data = builder.init_document_data(&mut diagnostics);

        let unit = self.unit(&data.units, &config.project);
        let tree = builder.build_unit(&unit, &data.titles, toplevel_sectioning, &mut diagnostics)?;

        let mut stdout = io::stdout().lock();
        OutlineRenderer.render(&tree, &mut stdout)?;
        stdout.flush()?;

        report_warnings(&diagnostics);
        Ok(())
    }

    /// The configured unit rooted at the requested document, or an ad-hoc
    /// one titled after the project.
    fn unit(&self, units: &[OutputUnit], project: &str) -> OutputUnit {
        let mut unit = units
            .iter()
            .find(|unit| unit.docname == self.docname)
            .cloned()
            .unwrap_or_else(|| OutputUnit {
                docname: self.docname.clone(),
                target: format!("{}.json", self.docname.as_str().replace('/', "-")),
                title: project.to_string(),
                author: String::new(),
                docclass: "manual".to_string(),
                toctree_only: false,
            });
        unit.toctree_only |= self.toctree_only;
        unit
    }
}
