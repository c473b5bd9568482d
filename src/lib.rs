//!
//! PressDB: the local settings and state store behind a WordPress desktop content manager.
//! This library provides a single persisted document with dotted-path access.
//!
//! ## Core Concepts
//!
//! * **Document (`data::Mapping`)**: The single persisted tree of settings and state. Values are
//!   scalars, nested mappings, or ordered sequences (`data::NestedValue`).
//! * **Paths (`path::KeyPath`)**: Dotted strings such as `settings.wordpress.siteUrl` that address
//!   a location in the document.
//! * **Backends (`backend::Backend`)**: The pluggable persistence medium holding the serialized
//!   document, e.g. a JSON file.
//! * **DocumentStore (`store::DocumentStore`)**: The explicit store instance. Every operation
//!   reloads the document from the backend, and every mutating operation persists it again.
//! * **Settings (`settings::WordPressSettings`)**: A typed view over the WordPress connection
//!   settings kept in the document.

pub mod backend;
pub mod config;
pub mod constants;
pub mod data;
pub mod path;
pub mod settings;
pub mod store;

/// Re-export the `DocumentStore` struct for easier access.
pub use store::DocumentStore;

/// Result type used throughout the PressDB library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the PressDB library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A path walk or terminal write met a value whose shape conflicts with the operation,
    /// e.g. pushing onto a string or traversing through a number.
    #[error("Type mismatch at '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The persistence medium could not be read or written, or holds unparsable content.
    #[error("Medium unavailable: {0}")]
    MediumUnavailable(#[from] std::io::Error),

    /// The path string is empty or contains an empty segment.
    #[error("Malformed path: '{0}'")]
    MalformedPath(String),

    /// A write would nest the document deeper than it can be read back.
    #[error("Too deep at '{path}': nesting of {depth} exceeds the limit of {limit}")]
    TooDeep {
        path: String,
        depth: usize,
        limit: usize,
    },

    /// Stored connection settings are missing a required field.
    #[error("Incomplete settings: {0}")]
    IncompleteSettings(String),
}

impl Error {
    pub(crate) fn type_mismatch(
        path: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Error::TypeMismatch {
            path: path.into(),
            expected,
            found,
        }
    }

    /// Returns true if this is a `TypeMismatch` error.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Error::TypeMismatch { .. })
    }
}
