//! # halftone-engine
//!
//! Render a raster image (PNG or JPEG bytes) as a halftone SVG drawing:
//! a grid of dots whose size follows the image's luminosity, ready to be
//! printed, plotted or laser-cut.
//!
//! ## How it works
//!
//! 1. Decode the bytes with [`image::load_from_memory`].
//! 2. Optionally invert the colours and adjust contrast.
//! 3. Lay a grid of sample points over an output of `output_width` mm
//!    (height follows the image aspect ratio).
//! 4. Sample the effective luminosity (`luma × alpha`) around each point and
//!    turn it into a dot radius of at most `0.45 × spacing`.
//! 5. Emit one `<circle>` / `<polygon>` per dot inside a themed `<svg>`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use halftone_engine::{Grid, HalftoneEngine, RenderSettings, Shape};
//!
//! let bytes = std::fs::read("portrait.png").unwrap();
//! let settings = RenderSettings::builder(120.0, 2.5)
//!     .shape(Shape::Hex)
//!     .grid(Grid::Hex)
//!     .invert(true)
//!     .build()
//!     .unwrap();
//! let svg = HalftoneEngine::default().render(&bytes, &settings).unwrap();
//! println!("{svg}");
//! ```
//!
//! The returned document has no XML declaration; callers writing a
//! standalone `.svg` file prepend one.

use image::{DynamicImage, GenericImageView};
use thiserror::Error;
use tracing::debug;

mod grid;
mod options;
mod poisson;
mod sampling;
mod svg;

pub use image;
pub use options::{resolve_kinds, Grid, RenderSettings, RenderSettingsBuilder, Shape};
pub use svg::Element;

// ── Constants ───────────────────────────────────────────────────────────────

/// Largest dot radius as a fraction of the grid spacing.
pub const MAX_RADIUS_RATIO: f64 = 0.45;

/// Dots smaller than this (in output millimetres) are not emitted.
pub const MIN_RADIUS: f64 = 0.08;

/// Most grid cells a single render may lay out.
pub const MAX_DOTS: usize = 2_000_000;

// ── Error type ──────────────────────────────────────────────────────────────

/// Errors returned by [`HalftoneEngine::render`].
#[derive(Error, Debug)]
pub enum EngineError {
    /// The input bytes are not an image this build can decode.
    #[error("Could not decode input image: {0}")]
    Decode(#[from] image::ImageError),

    /// Width or spacing is not a finite positive number.
    #[error("Invalid render settings: {0}")]
    InvalidSettings(String),

    /// The decoded image has a zero-sized dimension.
    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// Output size and spacing ask for more dots than one render allows.
    /// `count` is `None` when it does not even fit in `usize`.
    #[error(
        "Too many dots: {} grid cells exceed the limit of {limit}",
        .count.map_or_else(|| "an overflowing number of".to_string(), |n| n.to_string())
    )]
    TooManyDots { count: Option<usize>, limit: usize },
}

// ── Engine ──────────────────────────────────────────────────────────────────

/// The halftone renderer.
///
/// Stateless apart from the optional Poisson seed; one instance can be shared
/// between threads and reused for any number of renders.
#[derive(Debug, Clone, Default)]
pub struct HalftoneEngine {
    seed: Option<u64>,
}

impl HalftoneEngine {
    /// An engine whose Poisson-disk grids are reproducible.
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Decode `bytes` and render them with `settings`.
    pub fn render(&self, bytes: &[u8], settings: &RenderSettings) -> Result<Element, EngineError> {
        settings.validate()?;
        let img = image::load_from_memory(bytes)?;
        debug!(
            "Decoded {}x{} image ({} bytes)",
            img.width(),
            img.height(),
            bytes.len()
        );
        self.render_image(img, settings)
    }

    /// Render an already decoded image.
    pub fn render_image(
        &self,
        mut img: DynamicImage,
        settings: &RenderSettings,
    ) -> Result<Element, EngineError> {
        settings.validate()?;
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(EngineError::EmptyImage { width, height });
        }

        if settings.invert {
            img.invert();
        }
        if let Some(contrast) = settings.contrast {
            img = img.adjust_contrast(contrast);
        }

        let output_width = settings.output_width;
        let output_height = output_width * height as f64 / width as f64;
        let resolution_ratio = output_width / width as f64;
        let spacing = settings.spacing;
        let max_radius = spacing * MAX_RADIUS_RATIO;

        let count = grid::cell_count(settings.grid, output_width, output_height, spacing);
        if !count.is_some_and(|n| n <= MAX_DOTS) {
            return Err(EngineError::TooManyDots {
                count,
                limit: MAX_DOTS,
            });
        }

        let points = match settings.grid {
            Grid::Rect => grid::rect(output_width, output_height, spacing),
            Grid::Hex => grid::hex(output_width, output_height, spacing),
            Grid::Diamond => grid::diamond(output_width, output_height, spacing),
            Grid::Poisson => poisson::sample(output_width, output_height, spacing, self.seed),
        };

        let mut dots = Vec::with_capacity(points.len());
        for (x, y) in points {
            let value = if settings.multi_sample {
                sampling::around_point(&img, resolution_ratio, (x, y), max_radius)
            } else {
                sampling::at_point(&img, resolution_ratio, (x, y))
            };

            let radius = value * max_radius;
            if radius < MIN_RADIUS {
                continue;
            }

            dots.push(match settings.shape {
                Shape::Circle => svg::circle(x, y, radius),
                Shape::Hex => svg::hex(x, y, radius),
                Shape::Diamond => svg::diamond(x, y, radius),
            });
        }
        debug!("Placed {} dots on a {:?} grid", dots.len(), settings.grid);

        let body = if settings.cut_paths {
            svg::cut_paths(dots)
        } else if settings.invert {
            svg::black_on_white(dots)
        } else {
            svg::white_on_black(dots)
        };

        Ok(svg::document(output_width, output_height, body))
    }
}

/// Falsy-style entry point: every failure collapses into `None`.
///
/// `shape` and `grid` are matched by name with [`resolve_kinds`], so unknown
/// names never fail the render.
pub fn run(
    bytes: &[u8],
    output_width: f64,
    spacing: f64,
    shape: &str,
    grid: &str,
    invert: bool,
    cut_paths: bool,
) -> Option<String> {
    let (shape, grid) = resolve_kinds(shape, grid);
    let settings = RenderSettings::builder(output_width, spacing)
        .shape(shape)
        .grid(grid)
        .invert(invert)
        .cut_paths(cut_paths)
        .build()
        .ok()?;
    HalftoneEngine::default()
        .render(bytes, &settings)
        .ok()
        .map(|doc| doc.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png(img: RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .expect("encode png");
        buf
    }

    fn white(w: u32, h: u32) -> Vec<u8> {
        png(RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255])))
    }

    #[test]
    fn run_returns_none_for_garbage() {
        assert!(run(b"not an image", 100.0, 2.0, "circle", "rect", false, false).is_none());
    }

    #[test]
    fn run_returns_none_for_zero_spacing() {
        assert!(run(&white(4, 4), 100.0, 0.0, "circle", "rect", false, false).is_none());
    }

    #[test]
    fn output_height_follows_aspect_ratio() {
        let svg = run(&white(20, 10), 100.0, 10.0, "circle", "rect", false, false).unwrap();
        assert!(svg.starts_with("<svg"), "got: {svg}");
        assert!(svg.contains(r#"width="100mm""#));
        assert!(svg.contains(r#"height="50mm""#));
        assert!(svg.contains(r#"viewBox="0 0 100 50""#));
        assert!(svg.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
    }

    #[test]
    fn white_image_gives_full_dots_on_black() {
        let svg = run(&white(10, 10), 10.0, 5.0, "circle", "rect", false, false).unwrap();
        assert!(svg.contains(r#"fill="black""#));
        assert_eq!(svg.matches("<circle").count(), 4);
        // 5.0 * 0.45
        assert!(svg.contains(r#"r="2.250""#), "got: {svg}");
    }

    #[test]
    fn invert_turns_white_into_nothing() {
        let svg = run(&white(10, 10), 10.0, 5.0, "circle", "rect", true, false).unwrap();
        assert!(svg.contains(r#"<rect width="100%" height="100%" fill="white"/>"#));
        assert_eq!(svg.matches("<circle").count(), 0);
    }

    #[test]
    fn transparent_pixels_are_dropped() {
        let bytes = png(RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 0])));
        let svg = run(&bytes, 10.0, 5.0, "circle", "rect", false, false).unwrap();
        assert_eq!(svg.matches("<circle").count(), 0);
    }

    #[test]
    fn cut_paths_use_hairline_stroke() {
        let svg = run(&white(10, 10), 10.0, 5.0, "hex", "hex", false, true).unwrap();
        assert!(svg.contains(r#"stroke-width="0.002mm""#));
        assert!(svg.contains(r#"fill="none""#));
        assert!(!svg.contains("<rect"));
        assert!(svg.contains("<polygon"));
    }

    #[test]
    fn seeded_poisson_is_reproducible() {
        let bytes = white(16, 16);
        let settings = RenderSettings::builder(40.0, 3.0)
            .grid(Grid::Poisson)
            .build()
            .unwrap();
        let a = HalftoneEngine::seeded(7).render(&bytes, &settings).unwrap();
        let b = HalftoneEngine::seeded(7).render(&bytes, &settings).unwrap();
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn huge_output_is_rejected_instead_of_laid_out() {
        let bytes = white(4, 4);
        for grid in [Grid::Rect, Grid::Hex, Grid::Diamond, Grid::Poisson] {
            let settings = RenderSettings::builder(1.0e6, 10.0).grid(grid).build().unwrap();
            let err = HalftoneEngine::default().render(&bytes, &settings).unwrap_err();
            assert!(
                matches!(err, EngineError::TooManyDots { count: Some(_), limit: MAX_DOTS }),
                "{grid:?}: {err}"
            );
        }
        assert!(run(&bytes, 1.0e6, 10.0, "circle", "rect", false, false).is_none());
    }

    #[test]
    fn overflowing_cell_count_is_reported() {
        let settings = RenderSettings::builder(1.0e300, 1.0e-3).build().unwrap();
        let err = HalftoneEngine::default().render(&white(4, 4), &settings).unwrap_err();
        assert!(matches!(err, EngineError::TooManyDots { count: None, .. }));
        assert!(err.to_string().contains("overflowing"));
    }

    #[test]
    fn render_rejects_negative_width() {
        let err = RenderSettings::builder(-1.0, 2.0).build().unwrap_err();
        assert!(matches!(err, EngineError::InvalidSettings(_)));
    }
}
