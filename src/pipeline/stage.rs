//! Input staging: read the selected file into memory.
//!
//! A selection is a [`FileSource`] handle, not bytes. The read happens when a
//! cycle needs it, so re-running with new parameters re-reads the file (and
//! picks up changes on disk). This read is the only point at which a
//! conversion cycle suspends.

use crate::error::HalftoneError;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// A selected file: a display name plus a way to read its full contents.
pub trait FileSource: Send + Sync {
    /// Display name shown next to the file selector.
    fn name(&self) -> &str;

    /// Read the complete, unmodified file contents.
    fn read(&self) -> BoxFuture<'static, Result<Vec<u8>, HalftoneError>>;
}

/// A file on the local file system, read with `tokio::fs`.
#[derive(Debug, Clone)]
pub struct PathSource {
    path: PathBuf,
    name: String,
}

impl PathSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FileSource for PathSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&self) -> BoxFuture<'static, Result<Vec<u8>, HalftoneError>> {
        let path = self.path.clone();
        async move {
            tokio::fs::read(&path)
                .await
                .map_err(|e| HalftoneError::from_read(path, e))
        }
        .boxed()
    }
}

/// Bytes already in memory (drag-and-drop, clipboard, tests).
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    bytes: Arc<[u8]>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl FileSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&self) -> BoxFuture<'static, Result<Vec<u8>, HalftoneError>> {
        let bytes = self.bytes.to_vec();
        futures::future::ready(Ok(bytes)).boxed()
    }
}

/// The staged contents of one selected file.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceImage {
    /// Image format guessed from the magic bytes, if recognised.
    pub fn format(&self) -> Option<image::ImageFormat> {
        image::guess_format(&self.bytes).ok()
    }
}

/// Read a selected file into a [`SourceImage`].
pub async fn stage(source: &dyn FileSource) -> Result<SourceImage, HalftoneError> {
    let name = source.name().to_string();
    let bytes = source.read().await?;
    let image = SourceImage { name, bytes };
    debug!(
        "Staged '{}': {} bytes ({:?})",
        image.name,
        image.bytes.len(),
        image.format()
    );
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn stages_memory_source() {
        let src = MemorySource::new("a.bin", vec![1u8, 2, 3]);
        let img = stage(&src).await.unwrap();
        assert_eq!(img.name, "a.bin");
        assert_eq!(img.bytes, vec![1, 2, 3]);
        assert!(img.format().is_none());
    }

    #[tokio::test]
    async fn stages_file_from_disk() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"\x89PNG\r\n\x1a\nrest").unwrap();
        let src = PathSource::new(tmp.path());
        let img = stage(&src).await.unwrap();
        assert_eq!(img.bytes.len(), 12);
        assert_eq!(img.format(), Some(image::ImageFormat::Png));
    }

    #[tokio::test]
    async fn missing_file_is_file_not_found() {
        let src = PathSource::new("/definitely/not/here.png");
        assert_eq!(src.name(), "here.png");
        let err = stage(&src).await.unwrap_err();
        assert!(matches!(err, HalftoneError::FileNotFound { .. }));
    }
}
