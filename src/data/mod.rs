//!
//! Defines the typed document tree.
//!
//! This module provides `NestedValue`, a tagged union of scalars, sequences and
//! mappings, and `Mapping`, the string-keyed node that forms the document root.
//! Both serialize to and from plain JSON.

mod types;
pub use types::{Mapping, NestedValue};
