//! Constants used throughout the PressDB library.
//!
//! This module provides central definitions for the reserved document paths
//! used by the convenience operations of the store.

/// Top-level key holding the saved keyword list.
pub const KEYWORDS: &str = "keywords";

/// Path of the WordPress connection settings.
pub const WORDPRESS_SETTINGS: &str = "settings.wordpress";

/// Maximum container nesting of the document, root mapping included.
///
/// serde_json refuses to parse input nested 128 levels or deeper, so writes that would
/// exceed this are rejected before anything is persisted.
pub const MAX_DEPTH: usize = 100;

/// File name of the document inside the data directory.
pub const DEFAULT_FILE_NAME: &str = "db.json";

/// Environment variable that overrides the document location.
pub const PATH_ENV_VAR: &str = "PRESSDB_PATH";
