use std::{fmt, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};

/// Separator between the path segments of a docname.
pub const SEP: char = '/';

/// The unique identifier of one source document.
///
/// A docname is a path-like string relative to the source root, without a
/// file extension. Segments are separated by `/`.
///
/// Examples: `index`, `guide/install`, `reference/api/index`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Docname(NonEmptyString);

impl Docname {
    /// Creates a new `Docname` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidDocnameError`] if the string is empty, starts or ends
    /// with a separator, or contains an empty, `.` or `..` segment.
    pub fn new(s: String) -> Result<Self, InvalidDocnameError> {
        let valid = s
            .split(SEP)
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..");
        if !valid {
            return Err(InvalidDocnameError(s));
        }

        NonEmptyString::new(s)
            .map(Self)
            .map_err(InvalidDocnameError)
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The path segments of this docname.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.as_str().split(SEP)
    }

    /// The prefix this docname contributes to a title index.
    ///
    /// A docname naming the `index` document of a directory stands for the
    /// whole directory, so the trailing `index` is dropped and the separator
    /// kept (`guide/index` becomes `guide/`). Any other docname is used as is.
    #[must_use]
    pub fn group_prefix(&self) -> &str {
        let s = self.as_str();
        s.strip_suffix("index")
            .filter(|rest| rest.ends_with(SEP))
            .unwrap_or(s)
    }
}

impl TryFrom<String> for Docname {
    type Error = InvalidDocnameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Docname {
    type Error = InvalidDocnameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl From<Docname> for String {
    fn from(docname: Docname) -> Self {
        docname.0.as_str().to_owned()
    }
}

impl AsRef<str> for Docname {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for Docname {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl fmt::Display for Docname {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Docname {
    type Err = InvalidDocnameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

/// Error returned when a string is not a valid docname.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid docname '{0}': must be a non-empty '/'-separated path without empty, '.' or '..' segments")]
pub struct InvalidDocnameError(String);
