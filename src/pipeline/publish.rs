//! Publication: engine document → preview markup + self-contained download.
//!
//! The download link carries the whole drawing in a `data:` URI, so saving
//! it never needs a network round-trip. The engine returns a bare `<svg>`
//! element; a standalone file needs the XML declaration in front of it.

use crate::error::HalftoneError;
use crate::output::{DownloadArtifact, Publication, VectorDocument};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;
use tracing::{debug, info, warn};

/// Declaration prepended to every downloadable document.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#;

/// Scheme and media type of the download link.
pub const DATA_URI_PREFIX: &str = "data:application/octet-stream;base64,";

/// Download name used when the source name has no usable stem.
pub const FALLBACK_FILE_NAME: &str = "halftone.svg";

/// The standalone document: declaration + engine output.
pub fn standalone_document(doc: &VectorDocument) -> String {
    let mut out = String::with_capacity(XML_DECLARATION.len() + doc.as_str().len());
    out.push_str(XML_DECLARATION);
    out.push_str(doc.as_str());
    out
}

/// Encode the standalone document as a base64 `data:` URI.
pub fn download_href(doc: &VectorDocument) -> String {
    let encoded = STANDARD.encode(standalone_document(doc));
    debug!("Encoded drawing → {} bytes base64", encoded.len());
    format!("{DATA_URI_PREFIX}{encoded}")
}

/// `portrait.png` → `portrait.svg`.
pub fn download_file_name(source_name: &str) -> String {
    Path::new(source_name)
        .file_stem()
        .map(|s| s.to_string_lossy())
        .filter(|s| !s.is_empty())
        .map(|s| format!("{s}.svg"))
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string())
}

/// Build both artifacts for a successful document.
pub fn publish(doc: &VectorDocument, source_name: &str) -> Publication {
    Publication {
        preview: doc.as_str().to_string(),
        download: DownloadArtifact {
            href: download_href(doc),
            file_name: download_file_name(source_name),
        },
    }
}

/// Write the standalone document to `path`.
///
/// Uses atomic write (temp file + rename) so a reader never sees a partial
/// drawing. Parent directories are created as needed.
pub async fn write_standalone(
    doc: &VectorDocument,
    path: impl AsRef<Path>,
) -> Result<(), HalftoneError> {
    let path = path.as_ref();
    let failed = |source| HalftoneError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(failed)?;
    }

    let tmp_path = path.with_extension("svg.tmp");
    tokio::fs::write(&tmp_path, standalone_document(doc))
        .await
        .map_err(failed)?;
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        if let Err(cleanup) = tokio::fs::remove_file(&tmp_path).await {
            warn!("Could not remove {}: {}", tmp_path.display(), cleanup);
        }
        return Err(failed(e));
    }

    info!("Wrote {}", path.display());
    Ok(())
}

/// Recover the standalone document from a download href.
///
/// `None` if the href is not one of ours or does not decode to UTF-8.
pub fn decode_href(href: &str) -> Option<String> {
    let encoded = href.strip_prefix(DATA_URI_PREFIX)?;
    let bytes = STANDARD.decode(encoded).ok()?;
    String::from_utf8(bytes).ok()
}
