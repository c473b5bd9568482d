//! The document store.
//!
//! `DocumentStore` owns the session against one persistence medium and exposes dotted-path
//! reads and writes plus the keyword list helpers used by the content UI.

use crate::backend::{Backend, FileBackend};
use crate::config::StoreConfig;
use crate::constants::{KEYWORDS, MAX_DEPTH};
use crate::data::{Mapping, NestedValue};
use crate::path::KeyPath;
use crate::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Dotted-path access to a single persisted document.
///
/// Every operation reads the whole document from the backend before doing anything else,
/// and every mutating operation writes the whole document back before returning. The store
/// keeps no lock between those two points: if two mutating operations overlap, the one that
/// persists last wins and the other's change is lost. Callers that need ordering between
/// related writes must await one before starting the next.
///
/// Cloning is cheap and yields a handle to the same session.
#[derive(Clone)]
pub struct DocumentStore {
    backend: Arc<dyn Backend>,
}

impl DocumentStore {
    /// Starts a store session on `backend`.
    ///
    /// If the medium holds no content yet, an empty document is written so that the medium
    /// exists for the rest of the session. From then on, a medium that turns up empty is an
    /// error rather than a fresh document.
    pub async fn open(backend: Arc<dyn Backend>) -> Result<Self> {
        let medium = backend.describe();
        if backend.read().await?.is_none() {
            backend.write(&Mapping::new()).await?;
            tracing::info!(%medium, "initialized empty document");
        }
        tracing::info!(%medium, "opened document store");
        Ok(Self { backend })
    }

    /// Starts a store session on the JSON file named by `config`.
    pub async fn open_file(config: &StoreConfig) -> Result<Self> {
        Self::open(Arc::new(FileBackend::new(config.path()))).await
    }

    /// Returns the backend this store reads from and writes to.
    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    /// Reads the value at `key`.
    ///
    /// Missing segments, and segments that would have to pass through a scalar, resolve to
    /// `None` rather than an error. A decimal segment indexes into a sequence, so
    /// `keywords.0` is the first keyword.
    pub async fn get(&self, key: &str) -> Result<Option<NestedValue>> {
        let path = KeyPath::parse(key)?;
        let document = self.reload().await?;
        Ok(resolve(&document, &path).cloned())
    }

    /// Assigns `value` at `key`, creating empty mappings for missing intermediate segments.
    ///
    /// Returns the stored value. Fails with `TypeMismatch` if an intermediate segment holds
    /// anything other than a mapping, and with `TooDeep` if the result would nest deeper than
    /// [`MAX_DEPTH`]; nothing is persisted in either case.
    pub async fn set(&self, key: &str, value: impl Into<NestedValue>) -> Result<NestedValue> {
        let path = KeyPath::parse(key)?;
        let value = value.into();
        // Root plus one mapping per parent segment, then the value itself.
        check_depth(&path, path.len() + value.depth())?;
        let mut document = self.reload().await?;

        let (_, last) = path.split_last();
        container_mut(&mut document, &path)
            .inspect_err(|e| tracing::warn!(%path, error = %e, "rejected set"))?
            .set(last, value.clone());

        self.persist(&document).await?;
        Ok(value)
    }

    /// Appends `value` to the sequence at `key`, creating it if absent.
    ///
    /// Intermediate segments are handled as in [`set`](Self::set). Returns the whole sequence
    /// after the append. Fails with `TypeMismatch` without persisting if the final segment
    /// holds a value that is not a sequence. Depth is limited as for `set`, counting the
    /// sequence as one more level.
    pub async fn push(&self, key: &str, value: impl Into<NestedValue>) -> Result<Vec<NestedValue>> {
        let path = KeyPath::parse(key)?;
        let value = value.into();
        check_depth(&path, path.len() + 1 + value.depth())?;
        let mut document = self.reload().await?;

        let items = append(&mut document, &path, value)
            .inspect_err(|e| tracing::warn!(%path, error = %e, "rejected push"))?;

        self.persist(&document).await?;
        Ok(items)
    }

    /// Reads the value at `key` and deserializes it into `T`.
    ///
    /// A value whose shape does not fit `T` is a `TypeMismatch`.
    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(value) = self.get(key).await? else {
            return Ok(None);
        };
        let found = value.kind();
        serde_json::from_value(value.into())
            .map(Some)
            .map_err(|_| Error::type_mismatch(key, std::any::type_name::<T>(), found))
    }

    /// Serializes `value` and assigns it at `key` with the same rules as [`set`](Self::set).
    pub async fn set_as<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value).map_err(|_| {
            Error::type_mismatch(key, "JSON-compatible value", std::any::type_name::<T>())
        })?;
        self.set(key, NestedValue::from(value)).await?;
        Ok(())
    }

    /// Reloads and returns the whole document.
    pub async fn snapshot(&self) -> Result<Mapping> {
        self.reload().await
    }

    /// Returns the saved keywords, or an empty list if none were ever saved.
    pub async fn list_keywords(&self) -> Result<Vec<String>> {
        let document = self.reload().await?;
        keyword_list(&document)
    }

    /// Appends every keyword not already saved, keeping the existing order.
    ///
    /// Comparison is exact and case-sensitive. Duplicates within `keywords` are added once,
    /// at the position of their first occurrence. Returns the full updated list.
    pub async fn add_keywords<I, S>(&self, keywords: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut document = self.reload().await?;
        let mut saved = keyword_list(&document)?;

        for keyword in keywords {
            let keyword = keyword.into();
            if !saved.contains(&keyword) {
                saved.push(keyword);
            }
        }

        document.set(KEYWORDS, keyword_values(&saved));
        self.persist(&document).await?;
        Ok(saved)
    }

    /// Removes every saved entry equal to `keyword` and returns the remaining list.
    ///
    /// Removing a keyword that is not saved is not an error.
    pub async fn remove_keyword(&self, keyword: &str) -> Result<Vec<String>> {
        let mut document = self.reload().await?;
        let mut saved = keyword_list(&document)?;

        if document.contains_key(KEYWORDS) {
            saved.retain(|k| k != keyword);
            document.set(KEYWORDS, keyword_values(&saved));
        }

        self.persist(&document).await?;
        Ok(saved)
    }

    async fn reload(&self) -> Result<Mapping> {
        match self.backend.read().await? {
            Some(document) => {
                tracing::debug!(medium = %self.backend.describe(), keys = document.len(), "reloaded document");
                Ok(document)
            }
            None => {
                let medium = self.backend.describe();
                tracing::warn!(%medium, "document vanished from medium");
                Err(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("document at {medium} is no longer present"),
                )
                .into())
            }
        }
    }

    async fn persist(&self, document: &Mapping) -> Result<()> {
        self.backend.write(document).await?;
        tracing::debug!(medium = %self.backend.describe(), keys = document.len(), "persisted document");
        Ok(())
    }
}

/// Follows `path` through mappings and sequences without creating anything.
fn resolve<'a>(document: &'a Mapping, path: &KeyPath) -> Option<&'a NestedValue> {
    let (first, rest) = path.segments().split_first()?;
    let mut current = document.get(first)?;
    for segment in rest {
        current = match current {
            NestedValue::Map(map) => map.get(segment)?,
            NestedValue::Array(items) => items.get(sequence_index(segment)?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Reads a segment as a sequence index only in canonical decimal form: `0`, `1`, `12`,
/// but not `01`, `+1` or `-1`.
fn sequence_index(segment: &str) -> Option<usize> {
    let canonical = segment == "0"
        || (!segment.starts_with('0') && segment.bytes().all(|b| b.is_ascii_digit()));
    if !canonical {
        return None;
    }
    segment.parse().ok()
}

fn check_depth(path: &KeyPath, depth: usize) -> Result<()> {
    if depth > MAX_DEPTH {
        tracing::warn!(%path, depth, "rejected write nesting past the depth limit");
        return Err(Error::TooDeep {
            path: path.to_string(),
            depth,
            limit: MAX_DEPTH,
        });
    }
    Ok(())
}

/// Walks all but the last segment of `path`, inserting empty mappings where segments are
/// missing, and returns the mapping that owns the last segment.
///
/// Only the caller's freshly reloaded copy is touched, so a mismatch part way down leaves
/// the persisted document as it was.
fn container_mut<'a>(document: &'a mut Mapping, path: &KeyPath) -> Result<&'a mut Mapping> {
    let (parents, _) = path.split_last();
    let mut current = document;
    for (depth, segment) in parents.iter().enumerate() {
        let slot = current
            .as_btreemap_mut()
            .entry(segment.clone())
            .or_insert_with(|| NestedValue::Map(Mapping::new()));
        current = match slot {
            NestedValue::Map(map) => map,
            other => {
                return Err(Error::type_mismatch(
                    path.prefix(depth + 1),
                    "mapping",
                    other.kind(),
                ));
            }
        };
    }
    Ok(current)
}

fn append(document: &mut Mapping, path: &KeyPath, value: NestedValue) -> Result<Vec<NestedValue>> {
    let (_, last) = path.split_last();
    let slot = container_mut(document, path)?
        .as_btreemap_mut()
        .entry(last.to_string())
        .or_insert_with(|| NestedValue::Array(Vec::new()));
    match slot {
        NestedValue::Array(items) => {
            items.push(value);
            Ok(items.clone())
        }
        other => Err(Error::type_mismatch(path.to_string(), "array", other.kind())),
    }
}

fn keyword_list(document: &Mapping) -> Result<Vec<String>> {
    match document.get(KEYWORDS) {
        None => Ok(Vec::new()),
        Some(NestedValue::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    Error::type_mismatch(format!("{KEYWORDS}.{index}"), "string", item.kind())
                })
            })
            .collect(),
        Some(other) => Err(Error::type_mismatch(KEYWORDS, "array", other.kind())),
    }
}

fn keyword_values(keywords: &[String]) -> Vec<NestedValue> {
    keywords.iter().map(|k| NestedValue::from(k.as_str())).collect()
}
