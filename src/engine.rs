//! The rendering-engine boundary.
//!
//! The orchestrator hands an [`EngineRequest`] to a [`RenderEngine`] and gets
//! back either a [`VectorDocument`] or an [`EngineFailure`]. Nothing else about
//! the engine is visible, which lets tests substitute a deterministic stub.
//!
//! Two adapters are provided:
//!
//! * [`HalftoneEngine`] from the `halftone-engine` crate implements the trait
//!   directly.
//! * [`engine_fn`] wraps a closure returning `Option<String>`, for engines
//!   that signal failure by returning nothing (`None` and `""` both fail).

use crate::config::ConversionParameters;
use crate::error::EngineFailure;
use crate::output::VectorDocument;
use halftone_engine::{resolve_kinds, HalftoneEngine, RenderSettings};
use std::fmt;
use std::sync::Arc;

/// One engine invocation.
#[derive(Clone, Copy)]
pub struct EngineRequest<'a> {
    /// Complete, unmodified contents of the source image file.
    pub bytes: &'a [u8],
    pub output_width: f64,
    pub spacing: f64,
    pub shape: &'a str,
    pub grid: &'a str,
    pub invert: bool,
    pub cut_paths: bool,
}

impl<'a> EngineRequest<'a> {
    pub fn new(bytes: &'a [u8], params: &'a ConversionParameters) -> Self {
        Self {
            bytes,
            output_width: params.output_width(),
            spacing: params.spacing(),
            shape: params.shape(),
            grid: params.grid(),
            invert: params.invert(),
            cut_paths: params.cut_paths(),
        }
    }
}

impl fmt::Debug for EngineRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineRequest")
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .field("output_width", &self.output_width)
            .field("spacing", &self.spacing)
            .field("shape", &self.shape)
            .field("grid", &self.grid)
            .field("invert", &self.invert)
            .field("cut_paths", &self.cut_paths)
            .finish()
    }
}

/// Raster → vector conversion, treated as a black box.
///
/// Called synchronously from inside a conversion cycle. Implementations must
/// be `Send + Sync`; the orchestrator shares one engine between cycles.
pub trait RenderEngine: Send + Sync {
    fn convert(&self, request: &EngineRequest<'_>) -> Result<VectorDocument, EngineFailure>;
}

impl<E: RenderEngine + ?Sized> RenderEngine for Arc<E> {
    fn convert(&self, request: &EngineRequest<'_>) -> Result<VectorDocument, EngineFailure> {
        (**self).convert(request)
    }
}

impl<E: RenderEngine + ?Sized> RenderEngine for Box<E> {
    fn convert(&self, request: &EngineRequest<'_>) -> Result<VectorDocument, EngineFailure> {
        (**self).convert(request)
    }
}

/// Adapter for closures with falsy-result semantics.
pub struct FnEngine<F>(F);

/// Wrap `f` as a [`RenderEngine`]: `None` or an empty string is a failure.
///
/// # Example
/// ```rust
/// use svg_halftone::engine::{engine_fn, EngineRequest, RenderEngine};
/// use svg_halftone::ConversionParameters;
///
/// let engine = engine_fn(|req: &EngineRequest<'_>| {
///     (!req.bytes.is_empty()).then(|| "<svg/>".to_string())
/// });
/// let params = ConversionParameters::builder().build().unwrap();
/// assert!(engine.convert(&EngineRequest::new(b"x", &params)).is_ok());
/// assert!(engine.convert(&EngineRequest::new(b"", &params)).is_err());
/// ```
pub fn engine_fn<F>(f: F) -> FnEngine<F>
where
    F: Fn(&EngineRequest<'_>) -> Option<String> + Send + Sync,
{
    FnEngine(f)
}

impl<F> RenderEngine for FnEngine<F>
where
    F: Fn(&EngineRequest<'_>) -> Option<String> + Send + Sync,
{
    fn convert(&self, request: &EngineRequest<'_>) -> Result<VectorDocument, EngineFailure> {
        (self.0)(request)
            .and_then(VectorDocument::new)
            .ok_or(EngineFailure::NoOutput)
    }
}

/// Built-in halftone renderer with extra settings the request does not carry.
#[derive(Debug, Clone, Default)]
pub struct HalftoneRenderer {
    engine: HalftoneEngine,
    contrast: Option<f32>,
    single_sample: bool,
}

impl HalftoneRenderer {
    pub fn new(engine: HalftoneEngine) -> Self {
        Self {
            engine,
            ..Default::default()
        }
    }

    pub fn contrast(mut self, contrast: Option<f32>) -> Self {
        self.contrast = contrast;
        self
    }

    /// Sample one pixel per dot instead of averaging five.
    pub fn single_sample(mut self, v: bool) -> Self {
        self.single_sample = v;
        self
    }
}

impl RenderEngine for HalftoneRenderer {
    fn convert(&self, request: &EngineRequest<'_>) -> Result<VectorDocument, EngineFailure> {
        let (shape, grid) = resolve_kinds(request.shape, request.grid);
        let settings = RenderSettings::builder(request.output_width, request.spacing)
            .shape(shape)
            .grid(grid)
            .invert(request.invert)
            .cut_paths(request.cut_paths)
            .contrast(self.contrast)
            .multi_sample(!self.single_sample)
            .build()
            .map_err(|e| EngineFailure::Rejected {
                detail: e.to_string(),
            })?;

        let svg = self
            .engine
            .render(request.bytes, &settings)
            .map_err(|e| EngineFailure::Rejected {
                detail: e.to_string(),
            })?;

        VectorDocument::new(svg.to_string()).ok_or(EngineFailure::NoOutput)
    }
}

impl RenderEngine for HalftoneEngine {
    fn convert(&self, request: &EngineRequest<'_>) -> Result<VectorDocument, EngineFailure> {
        HalftoneRenderer::new(self.clone()).convert(request)
    }
}
