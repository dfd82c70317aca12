//! Configuration types for halftone conversion.
//!
//! Three layers, from outermost to innermost:
//!
//! * [`OrchestratorConfig`]: how the orchestrator behaves across cycles
//!   (publish ordering, failure placeholder, initial control values).
//! * [`FormControls`]: the raw control state as the user left it. Width and
//!   spacing stay text so a half-typed value is representable.
//! * [`ConversionParameters`]: a validated parameter set, the only thing
//!   that ever reaches the engine.

use crate::error::HalftoneError;
use serde::{Deserialize, Serialize};

/// Preview content shown when a cycle produces no document.
pub const DEFAULT_FAILURE_PLACEHOLDER: &str =
    "<p>Something went wrong when generating the SVG. Sorry!</p>";

// ── Conversion parameters ────────────────────────────────────────────────

/// A validated parameter set for one engine invocation.
///
/// Built via [`ConversionParameters::builder()`]; `output_width` and
/// `spacing` are always finite and strictly positive.
///
/// # Example
/// ```rust
/// use svg_halftone::ConversionParameters;
///
/// let params = ConversionParameters::builder()
///     .output_width(120.0)
///     .spacing(2.5)
///     .shape("hex")
///     .grid("hex")
///     .build()
///     .unwrap();
/// assert!(!params.invert());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionParameters {
    output_width: f64,
    spacing: f64,
    shape: String,
    grid: String,
    invert: bool,
    cut_paths: bool,
}

impl ConversionParameters {
    pub fn builder() -> ConversionParametersBuilder {
        ConversionParametersBuilder::default()
    }

    /// Physical output width, in millimetres.
    pub fn output_width(&self) -> f64 {
        self.output_width
    }

    /// Grid spacing, in millimetres.
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    pub fn shape(&self) -> &str {
        &self.shape
    }

    pub fn grid(&self) -> &str {
        &self.grid
    }

    /// The engine's invert flag (not the UI checkbox).
    pub fn invert(&self) -> bool {
        self.invert
    }

    pub fn cut_paths(&self) -> bool {
        self.cut_paths
    }
}

/// Builder for [`ConversionParameters`].
#[derive(Debug, Clone)]
pub struct ConversionParametersBuilder {
    output_width: f64,
    spacing: f64,
    shape: String,
    grid: String,
    invert: bool,
    cut_paths: bool,
}

impl Default for ConversionParametersBuilder {
    fn default() -> Self {
        Self {
            output_width: 100.0,
            spacing: 2.0,
            shape: "circle".into(),
            grid: "rect".into(),
            invert: false,
            cut_paths: false,
        }
    }
}

impl ConversionParametersBuilder {
    pub fn output_width(mut self, mm: f64) -> Self {
        self.output_width = mm;
        self
    }

    pub fn spacing(mut self, mm: f64) -> Self {
        self.spacing = mm;
        self
    }

    pub fn shape(mut self, shape: impl Into<String>) -> Self {
        self.shape = shape.into();
        self
    }

    pub fn grid(mut self, grid: impl Into<String>) -> Self {
        self.grid = grid.into();
        self
    }

    pub fn invert(mut self, v: bool) -> Self {
        self.invert = v;
        self
    }

    pub fn cut_paths(mut self, v: bool) -> Self {
        self.cut_paths = v;
        self
    }

    /// Build the parameter set, validating width and spacing.
    pub fn build(self) -> Result<ConversionParameters, HalftoneError> {
        for (field, value) in [("output width", self.output_width), ("spacing", self.spacing)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(HalftoneError::InvalidParameters { field, value });
            }
        }
        Ok(ConversionParameters {
            output_width: self.output_width,
            spacing: self.spacing,
            shape: self.shape,
            grid: self.grid,
            invert: self.invert,
            cut_paths: self.cut_paths,
        })
    }
}

// ── Form controls ────────────────────────────────────────────────────────

/// The raw state of every input control.
///
/// `light_background` is the checkbox as the user sees it ("keep a light
/// background"); the engine's invert flag is its negation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormControls {
    pub output_width: String,
    pub spacing: String,
    pub shape: String,
    pub grid: String,
    pub light_background: bool,
    pub cut_paths: bool,
}

impl Default for FormControls {
    fn default() -> Self {
        Self {
            output_width: "100".into(),
            spacing: "2".into(),
            shape: "circle".into(),
            grid: "rect".into(),
            light_background: false,
            cut_paths: false,
        }
    }
}

// ── Orchestrator configuration ───────────────────────────────────────────

/// Which completing cycle is allowed to publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PublishPolicy {
    /// Only the most recently dispatched cycle publishes; earlier cycles that
    /// finish later are discarded as superseded. (default)
    #[default]
    LatestTrigger,
    /// Every cycle publishes when it completes, so a slow earlier cycle can
    /// overwrite a newer result.
    LastToComplete,
}

/// Configuration for an [`crate::Orchestrator`].
///
/// # Example
/// ```rust
/// use svg_halftone::{OrchestratorConfig, PublishPolicy};
///
/// let config = OrchestratorConfig::builder()
///     .publish_policy(PublishPolicy::LastToComplete)
///     .failure_placeholder("<p>No drawing</p>")
///     .build()
///     .unwrap();
/// assert_eq!(config.publish_policy, PublishPolicy::LastToComplete);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorConfig {
    /// Default: [`PublishPolicy::LatestTrigger`].
    pub publish_policy: PublishPolicy,

    /// Preview content published when a cycle fails.
    /// Default: [`DEFAULT_FAILURE_PLACEHOLDER`].
    pub failure_placeholder: String,

    /// Control values in effect before the first trigger.
    pub controls: FormControls,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            publish_policy: PublishPolicy::default(),
            failure_placeholder: DEFAULT_FAILURE_PLACEHOLDER.to_string(),
            controls: FormControls::default(),
        }
    }
}

impl OrchestratorConfig {
    pub fn builder() -> OrchestratorConfigBuilder {
        OrchestratorConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`OrchestratorConfig`].
#[derive(Debug)]
pub struct OrchestratorConfigBuilder {
    config: OrchestratorConfig,
}

impl OrchestratorConfigBuilder {
    pub fn publish_policy(mut self, policy: PublishPolicy) -> Self {
        self.config.publish_policy = policy;
        self
    }

    pub fn failure_placeholder(mut self, markup: impl Into<String>) -> Self {
        self.config.failure_placeholder = markup.into();
        self
    }

    pub fn controls(mut self, controls: FormControls) -> Self {
        self.config.controls = controls;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<OrchestratorConfig, HalftoneError> {
        if self.config.failure_placeholder.trim().is_empty() {
            return Err(HalftoneError::InvalidConfig(
                "failure placeholder must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
