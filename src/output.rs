//! Output types: what the orchestrator publishes and how each cycle ended.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-empty SVG document body, without XML declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorDocument(String);

impl VectorDocument {
    /// `None` for an empty document.
    pub fn new(markup: impl Into<String>) -> Option<Self> {
        let markup = markup.into();
        if markup.is_empty() {
            None
        } else {
            Some(Self(markup))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for VectorDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The single, orchestrator-owned UI state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "document", rename_all = "snake_case")]
pub enum UiState {
    /// Nothing has been converted yet.
    #[default]
    Idle,
    /// A conversion cycle is outstanding.
    Busy,
    /// The last publishing cycle produced this document.
    Published(VectorDocument),
    /// The last publishing cycle produced nothing.
    Failed,
}

impl UiState {
    pub fn document(&self) -> Option<&VectorDocument> {
        match self {
            UiState::Published(doc) => Some(doc),
            _ => None,
        }
    }
}

/// A self-contained download link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadArtifact {
    /// `data:application/octet-stream;base64,…` URI embedding the full
    /// declaration-prefixed document.
    pub href: String,
    /// Suggested file name for the download.
    pub file_name: String,
}

/// The two artifacts produced from one successful document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    /// Markup for the preview region (the document verbatim).
    pub preview: String,
    pub download: DownloadArtifact,
}

/// Everything the presentation layer shows, as data.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Presentation {
    pub state: UiState,
    /// Display name of the selected file.
    pub file_name: Option<String>,
    /// Busy indicator visibility.
    pub busy: bool,
    /// Inner content of the preview region.
    pub preview: Option<String>,
    /// Target of the download link. Left stale by failed cycles.
    pub download: Option<DownloadArtifact>,
}

/// Why a trigger did not start a conversion cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// No file has been selected yet.
    NoFile,
    /// A numeric field is non-numeric, zero, negative or not finite.
    InvalidParameter { field: String, input: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoFile => f.write_str("no file selected"),
            SkipReason::InvalidParameter { field, input } => {
                write!(f, "invalid {field}: {input:?}")
            }
        }
    }
}

/// How one trigger's conversion cycle ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum CycleOutcome {
    /// Validation stopped the cycle; nothing changed.
    Skipped(SkipReason),
    /// The engine's document was published.
    Published { sequence: u64 },
    /// The failure placeholder was published.
    Failed { sequence: u64, reason: String },
    /// A newer cycle was dispatched first; this one published nothing.
    Superseded { sequence: u64 },
}

impl CycleOutcome {
    pub fn sequence(&self) -> Option<u64> {
        match self {
            CycleOutcome::Skipped(_) => None,
            CycleOutcome::Published { sequence }
            | CycleOutcome::Failed { sequence, .. }
            | CycleOutcome::Superseded { sequence } => Some(*sequence),
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, CycleOutcome::Published { .. })
    }
}
