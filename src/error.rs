//! Error types for the svg-halftone library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`HalftoneError`]: **Fatal** for the operation that returned it: bad
//!   parameters handed to a builder, an unreadable file, an output that cannot
//!   be written. Returned as `Err(HalftoneError)`.
//!
//! * [`EngineFailure`]: **Non-fatal**: the rendering engine produced no
//!   usable document. The orchestrator never propagates it; it becomes the
//!   failure placeholder in the preview and the previous download stays as
//!   it was.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the svg-halftone library.
#[derive(Debug, Error)]
pub enum HalftoneError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The selected file does not exist.
    #[error("Image file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Reading the selected file failed part-way.
    #[error("Failed to read '{name}': {source}")]
    ReadFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },

    // ── Parameter errors ──────────────────────────────────────────────────
    /// Width or spacing is not a finite number greater than zero.
    #[error("Invalid {field}: {value} (must be a finite number greater than zero)")]
    InvalidParameters { field: &'static str, value: f64 },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output drawing.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HalftoneError {
    /// Classify an I/O error raised while reading `path`.
    pub fn from_read(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            std::io::ErrorKind::NotFound => HalftoneError::FileNotFound { path },
            std::io::ErrorKind::PermissionDenied => HalftoneError::PermissionDenied { path },
            _ => HalftoneError::ReadFailed {
                name: path.display().to_string(),
                source: err,
            },
        }
    }
}

/// The rendering engine returned nothing usable.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum EngineFailure {
    /// The engine returned no document, or an empty one.
    #[error("engine returned no output")]
    NoOutput,

    /// The engine refused the input (undecodable image, bad settings).
    #[error("engine rejected the input: {detail}")]
    Rejected { detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn invalid_parameters_display() {
        let e = HalftoneError::InvalidParameters {
            field: "spacing",
            value: -2.0,
        };
        let msg = e.to_string();
        assert!(msg.contains("spacing"), "got: {msg}");
        assert!(msg.contains("-2"), "got: {msg}");
    }

    #[test]
    fn read_errors_are_classified() {
        let e = HalftoneError::from_read("a.png", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(e, HalftoneError::FileNotFound { .. }));

        let e = HalftoneError::from_read("a.png", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(e, HalftoneError::PermissionDenied { .. }));

        let e = HalftoneError::from_read("a.png", io::Error::from(io::ErrorKind::UnexpectedEof));
        assert!(e.to_string().contains("a.png"));
    }

    #[test]
    fn engine_failure_display() {
        let e = EngineFailure::Rejected {
            detail: "not a PNG".into(),
        };
        assert!(e.to_string().contains("not a PNG"));
        assert_eq!(EngineFailure::NoOutput.to_string(), "engine returned no output");
    }
}
