//! # svg-halftone
//!
//! Turn a raster image into a halftone drawing (SVG) and keep a live
//! preview and a downloadable copy in sync with the user's controls.
//!
//! ## Why this crate?
//!
//! The halftone engine itself is a pure function of bytes and parameters.
//! Everything around it is where the bugs live: text inputs that are not
//! numbers, a file read that finishes after the user already changed the
//! spacing twice, a failed render that must not clobber the last good
//! download. This crate owns that lifecycle so a front end only has to
//! forward events and render a [`Presentation`].
//!
//! ## Pipeline Overview
//!
//! ```text
//! Trigger (file / width / spacing / shape / grid / checkbox)
//!  │
//!  ├─ 1. Validate  parse numeric text, skip silently when unusable
//!  ├─ 2. Busy      sequence number allocated, spinner shown
//!  ├─ 3. Stage     read the selected file (the one await point)
//!  ├─ 4. Engine    bytes + parameters → SVG (halftone-engine)
//!  └─ 5. Publish   preview markup + base64 data: URI download
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use svg_halftone::{Orchestrator, OrchestratorConfig, PathSource, Trigger};
//! use halftone_engine::HalftoneEngine;
//!
//! #[tokio::main]
//! async fn main() {
//!     let orchestrator = Orchestrator::new(HalftoneEngine::default(), OrchestratorConfig::default());
//!     let outcome = orchestrator.handle(Trigger::file(PathSource::new("portrait.jpg"))).await;
//!     println!("{outcome:?}");
//!     if let Some(preview) = orchestrator.presentation().preview {
//!         println!("{preview}");
//!     }
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `halftone` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! svg-halftone = { version = "0.4", default-features = false }
//! ```
//!
//! ## Out-of-order completions
//!
//! | Policy | Who publishes | Use when |
//! |--------|---------------|----------|
//! | [`PublishPolicy::LatestTrigger`] | only the most recent cycle | Default |
//! | [`PublishPolicy::LastToComplete`] | whichever finishes last | Reproducing legacy behaviour |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod engine;
pub mod error;
pub mod observer;
pub mod orchestrator;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ConversionParameters, ConversionParametersBuilder, FormControls, OrchestratorConfig,
    OrchestratorConfigBuilder, PublishPolicy, DEFAULT_FAILURE_PLACEHOLDER,
};
pub use engine::{engine_fn, EngineRequest, HalftoneRenderer, RenderEngine};
pub use error::{EngineFailure, HalftoneError};
pub use observer::{ConversionObserver, NoopObserver, ObserverHandle};
pub use orchestrator::{Orchestrator, Trigger};
pub use output::{
    CycleOutcome, DownloadArtifact, Presentation, Publication, SkipReason, UiState,
    VectorDocument,
};
pub use pipeline::stage::{FileSource, MemorySource, PathSource, SourceImage};
