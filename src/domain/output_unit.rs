use serde::{Deserialize, Serialize};

use crate::domain::Docname;

/// Document class whose output units never receive appendices.
pub const HOWTO_DOCCLASS: &str = "howto";

/// One merge-and-render job: a root document and the artifact built from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputUnit {
    /// The document the merged tree starts from.
    pub docname: Docname,

    /// File name of the produced artifact, relative to the output directory.
    pub target: String,

    /// Title of the artifact.
    pub title: String,

    /// Author of the artifact.
    #[serde(default)]
    pub author: String,

    /// Document class passed through to the renderer (e.g. `manual`).
    #[serde(default = "default_docclass")]
    pub docclass: String,

    /// Only keep the navigation nodes of the root document.
    ///
    /// Used when the root is a pure index page and the real content starts in
    /// its children.
    #[serde(default)]
    pub toctree_only: bool,
}

impl OutputUnit {
    /// Whether configured appendices should be attached to this unit.
    #[must_use]
    pub fn takes_appendices(&self) -> bool {
        self.docclass != HOWTO_DOCCLASS
    }
}

pub(crate) fn default_docclass() -> String {
    "manual".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_have_defaults() {
        let unit: OutputUnit = toml::from_str(
            r#"
docname = "index"
target = "book.json"
title = "The Book"
"#,
        )
        .unwrap();

        assert_eq!(unit.author, "");
        assert_eq!(unit.docclass, "manual");
        assert!(!unit.toctree_only);
        assert!(unit.takes_appendices());
    }

    #[test]
    fn howto_units_take_no_appendices() {
        let unit: OutputUnit = toml::from_str(
            r#"
docname = "howto/index"
target = "howto.json"
title = "How To"
docclass = "howto"
"#,
        )
        .unwrap();

        assert!(!unit.takes_appendices());
    }
}
