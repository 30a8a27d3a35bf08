use crate::domain::OutputUnit;

/// An ordered table mapping docname prefixes to the title of the output unit
/// they belong to.
///
/// Used to describe references whose target lives in another artifact. The
/// first entry whose prefix matches wins, so entries keep the declared order
/// of the output units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleIndex {
    entries: Vec<(String, String)>,
}

impl TitleIndex {
    /// Appends an entry. Later entries only match when no earlier one does.
    pub fn push(&mut self, prefix: impl Into<String>, title: impl Into<String>) {
        self.entries.push((prefix.into(), title.into()));
    }

    /// Builds the index from output units, in order.
    pub fn from_units<'a>(units: impl IntoIterator<Item = &'a OutputUnit>) -> Self {
        let mut index = Self::default();
        for unit in units {
            index.push(unit.docname.group_prefix(), unit.title.clone());
        }
        index
    }

    /// The title of the first group whose prefix starts `docname`.
    #[must_use]
    pub fn lookup(&self, docname: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(prefix, _)| docname.starts_with(prefix.as_str()))
            .map(|(_, title)| title.as_str())
    }

    /// The entries, in match order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(prefix, title)| (prefix.as_str(), title.as_str()))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
