//! Dotted key paths.
//!
//! A `KeyPath` addresses a location in the document, e.g. `settings.wordpress.siteUrl`.
//! Paths are validated once on parse; every segment is non-empty.

use crate::{Error, Result};
use std::fmt;

/// A parsed, non-empty sequence of path segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Parses a dotted key string.
    ///
    /// Fails with `Error::MalformedPath` if the string is empty or any segment is empty
    /// (`"a..b"`, `".a"`, `"a."`).
    pub fn parse(key: &str) -> Result<Self> {
        if key.is_empty() {
            return Err(Error::MalformedPath(key.to_string()));
        }
        let segments: Vec<String> = key.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(Error::MalformedPath(key.to_string()));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Splits the path into its parent segments and the final key.
    pub fn split_last(&self) -> (&[String], &str) {
        // Parsing guarantees at least one segment.
        let Some((last, parents)) = self.segments.split_last() else {
            return (&[], "");
        };
        (parents, last.as_str())
    }

    /// Renders the first `len` segments back into dotted form, for error messages.
    pub(crate) fn prefix(&self, len: usize) -> String {
        self.segments[..len.min(self.segments.len())].join(".")
    }

    pub(crate) fn len(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl std::str::FromStr for KeyPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        KeyPath::parse(s)
    }
}
