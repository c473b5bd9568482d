use crate::Result;
use crate::data::Mapping;
use async_trait::async_trait;

mod file;
mod in_memory;

pub use file::FileBackend;
pub use in_memory::InMemoryBackend;

/// Backend trait abstracting the persistence medium of the document.
///
/// A backend stores exactly one serialized document. It is read in full at the start
/// of every store operation and replaced in full at the end of every mutating one.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Read and parse the whole persisted document.
    ///
    /// Returns `Ok(None)` if the medium holds no prior content. Content that cannot be
    /// parsed is an error, never an empty document.
    async fn read(&self) -> Result<Option<Mapping>>;

    /// Replace the persisted content with a full serialization of `document`.
    async fn write(&self, document: &Mapping) -> Result<()>;

    /// Short description of where the document lives, used in log output.
    fn describe(&self) -> String;
}

/// Parses persisted text into a document.
///
/// Blank text counts as no content. Anything else must be a JSON object.
pub(crate) fn parse_document(text: &str) -> Result<Option<Mapping>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(text).map(Some).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Failed to deserialize: {e}"),
        )
        .into()
    })
}

/// Serializes a document for persisting.
pub(crate) fn serialize_document(document: &Mapping) -> Result<String> {
    serde_json::to_string_pretty(document).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Failed to serialize: {e}"),
        )
        .into()
    })
}
