use crate::Result;
use crate::backend::{Backend, parse_document, serialize_document};
use crate::data::Mapping;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// A backend persisting the document as a single pretty-printed JSON file.
///
/// A missing or blank file reads as no content. Writes go to a uniquely named
/// sibling file which is then renamed over the target, so the file on disk is always
/// either the previous or the new document, never a truncated mix.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Creates a backend for the file at `path`. Nothing is touched until the first read.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the document file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.path
            .with_file_name(format!(".{name}.{}.tmp", uuid::Uuid::new_v4()))
    }
}

#[async_trait]
impl Backend for FileBackend {
    async fn read(&self) -> Result<Option<Mapping>> {
        let text = match fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %self.path.display(), bytes = text.len(), "read document file");
        parse_document(&text)
    }

    async fn write(&self, document: &Mapping) -> Result<()> {
        let text = serialize_document(document)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let temp = self.temp_path();
        if let Err(e) = fs::write(&temp, text.as_bytes()).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp, &self.path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e.into());
        }

        tracing::debug!(path = %self.path.display(), bytes = text.len(), "wrote document file");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
