use crate::Result;
use crate::backend::{Backend, parse_document, serialize_document};
use crate::data::Mapping;
use async_trait::async_trait;
use std::sync::RwLock;

/// A simple in-memory backend holding the serialized document text.
///
/// This backend is suitable for testing, development, or embedding where the
/// document does not need to outlive the process. Content is kept as JSON text
/// so that reads and writes go through the same serialization as a file would.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    content: RwLock<Option<String>>,
}

impl InMemoryBackend {
    /// Creates a new, empty `InMemoryBackend`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that already holds `document`.
    pub fn with_document(document: &Mapping) -> Result<Self> {
        Ok(Self {
            content: RwLock::new(Some(serialize_document(document)?)),
        })
    }

    /// Creates a backend holding raw text, which need not be valid JSON.
    pub fn with_raw(text: impl Into<String>) -> Self {
        Self {
            content: RwLock::new(Some(text.into())),
        }
    }

    /// Returns the raw persisted text, if any.
    pub fn raw(&self) -> Option<String> {
        self.lock_read().clone()
    }

    /// Replaces the raw persisted text.
    pub fn set_raw(&self, text: impl Into<String>) {
        *self.lock_write() = Some(text.into());
    }

    /// Drops all persisted content, as if the medium had vanished.
    pub fn clear(&self) {
        *self.lock_write() = None;
    }

    // A poisoned lock only means a writer panicked mid-assignment of an `Option<String>`,
    // which cannot leave it half-written.
    fn lock_read(&self) -> std::sync::RwLockReadGuard<'_, Option<String>> {
        self.content.read().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_write(&self) -> std::sync::RwLockWriteGuard<'_, Option<String>> {
        self.content.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn read(&self) -> Result<Option<Mapping>> {
        match self.lock_read().as_deref() {
            Some(text) => parse_document(text),
            None => Ok(None),
        }
    }

    async fn write(&self, document: &Mapping) -> Result<()> {
        let text = serialize_document(document)?;
        *self.lock_write() = Some(text);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
