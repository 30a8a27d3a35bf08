use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::domain::{output_unit::default_docclass, Docname, OutputUnit};

/// Name of the configuration file at the project root.
pub const CONFIG_FILE: &str = "bindery.toml";

/// Configuration for assembling a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Versions", into = "Versions")]
pub struct Config {
    /// Name of the project.
    ///
    /// Used as the title and target name of the default output unit.
    pub project: String,

    /// The document at the top of the navigation hierarchy.
    pub root_doc: Docname,

    /// The declared output units, in order.
    ///
    /// `None` means the project did not declare any, and a single unit is
    /// derived from `project` and `root_doc`. An empty list is kept as is and
    /// produces no output.
    documents: Option<Vec<OutputUnit>>,

    /// Documents appended to the end of every output unit, except those with
    /// the `howto` document class.
    pub appendices: Vec<Docname>,

    /// The sectioning level top-level sections are rendered at.
    ///
    /// Stored unparsed; see [`Sectioning`].
    pub toplevel_sectioning: Option<String>,

    /// Directory containing the parsed documents, relative to the project
    /// root.
    pub source_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: default_project(),
            root_doc: default_root_doc(),
            documents: None,
            appendices: Vec::new(),
            toplevel_sectioning: None,
            source_dir: default_source_dir(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// The output units to build, in declared order.
    ///
    /// When none were declared, a single unit is derived from the project
    /// name and root document.
    #[must_use]
    pub fn output_units(&self) -> Vec<OutputUnit> {
        self.documents.clone().unwrap_or_else(|| {
            vec![OutputUnit {
                docname: self.root_doc.clone(),
                target: format!("{}.json", make_filename(&self.project)),
                title: self.project.clone(),
                author: String::new(),
                docclass: default_docclass(),
                toctree_only: false,
            }]
        })
    }

    /// Replaces the declared output units.
    pub fn set_output_units(&mut self, units: Vec<OutputUnit>) {
        self.documents = Some(units);
    }
}

/// Reduces a project name to a string safe to use as a file stem.
///
/// Everything except ASCII letters, digits, `_` and `-` is dropped.
#[must_use]
pub fn make_filename(name: &str) -> String {
    let filename: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    if filename.is_empty() {
        "bindery".to_string()
    } else {
        filename
    }
}

/// The sectioning level used for top-level sections of the merged tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sectioning {
    /// Top-level sections become parts.
    Part,
    /// Top-level sections become chapters.
    Chapter,
    /// Top-level sections stay sections.
    Section,
}

impl FromStr for Sectioning {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "part" => Ok(Self::Part),
            "chapter" => Ok(Self::Chapter),
            "section" => Ok(Self::Section),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for Sectioning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Part => "part",
            Self::Chapter => "chapter",
            Self::Section => "section",
        };
        f.write_str(s)
    }
}

fn default_project() -> String {
    "Project".to_string()
}

fn default_root_doc() -> Docname {
    Docname::try_from("index").unwrap_or_else(|_| unreachable!("'index' is a valid docname"))
}

fn default_source_dir() -> PathBuf {
    PathBuf::from(".")
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_project")]
        project: String,

        #[serde(default = "default_root_doc")]
        root_doc: Docname,

        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        appendices: Vec<Docname>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        toplevel_sectioning: Option<String>,

        #[serde(default = "default_source_dir")]
        source_dir: PathBuf,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        documents: Option<Vec<OutputUnit>>,
    },
}

impl TryFrom<Versions> for Config {
    type Error = String;

    fn try_from(versions: Versions) -> Result<Self, Self::Error> {
        match versions {
            Versions::V1 {
                project,
                root_doc,
                documents,
                appendices,
                toplevel_sectioning,
                source_dir,
            } => {
                if source_dir.is_absolute() {
                    return Err(format!(
                        "source_dir must be relative to the project root, got {}",
                        source_dir.display()
                    ));
                }
                Ok(Self {
                    project,
                    root_doc,
                    documents,
                    appendices,
                    toplevel_sectioning,
                    source_dir,
                })
            }
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            project: config.project,
            root_doc: config.root_doc,
            documents: config.documents,
            appendices: config.appendices,
            toplevel_sectioning: config.toplevel_sectioning,
            source_dir: config.source_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use test_case::test_case;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"_version = "1"
project = "Widgets"
appendices = ["appendix/glossary"]
toplevel_sectioning = "chapter"
source_dir = "docs"

[[documents]]
docname = "guide/index"
target = "guide.json"
title = "User Guide"
author = "The Widgets Team"
toctree_only = true

[[documents]]
docname = "howto/index"
target = "howto.json"
title = "How To"
docclass = "howto"
"#,
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.project, "Widgets");
        assert_eq!(config.appendices.len(), 1);
        assert_eq!(config.toplevel_sectioning.as_deref(), Some("chapter"));
        assert_eq!(config.source_dir, PathBuf::from("docs"));

        let units = config.output_units();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].docname.as_str(), "guide/index");
        assert!(units[0].toctree_only);
        assert_eq!(units[1].docclass, "howto");
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nappendices = [\"../escape\"]\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn absolute_source_dir_is_rejected() {
        let error = toml::from_str::<Config>("_version = \"1\"\nsource_dir = \"/etc\"\n")
            .unwrap_err();
        assert!(error.to_string().contains("source_dir"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn default_output_unit_is_derived_from_project() {
        let config = Config {
            project: "My Project!".to_string(),
            ..Config::default()
        };

        let units = config.output_units();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].docname.as_str(), "index");
        assert_eq!(units[0].target, "MyProject.json");
        assert_eq!(units[0].title, "My Project!");
        assert_eq!(units[0].docclass, "manual");
    }

    #[test]
    fn explicitly_empty_documents_are_kept() {
        let config: Config = toml::from_str("_version = \"1\"\ndocuments = []\n").unwrap();
        assert!(config.output_units().is_empty());
    }

    #[test]
    fn save_round_trips_through_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILE);

        let mut config = Config::default();
        config.appendices.push(Docname::try_from("appendix").unwrap());
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test_case("My Docs", "MyDocs"; "spaces removed")]
    #[test_case("my_project-2", "my_project-2"; "allowed punctuation kept")]
    #[test_case("!!!", "bindery"; "nothing left")]
    fn make_filename_strips_unsafe_characters(input: &str, expected: &str) {
        assert_eq!(make_filename(input), expected);
    }

    #[test_case("part", Ok(Sectioning::Part))]
    #[test_case("chapter", Ok(Sectioning::Chapter))]
    #[test_case("section", Ok(Sectioning::Section))]
    #[test_case("volume", Err("volume".to_string()))]
    fn parses_sectioning(input: &str, expected: Result<Sectioning, String>) {
        assert_eq!(input.parse::<Sectioning>(), expected);
    }
}
