use crate::EngineError;
use std::fmt;
use std::str::FromStr;

/// Outline of a single halftone dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shape {
    #[default]
    Circle,
    Hex,
    Diamond,
}

impl Shape {
    pub fn name(self) -> &'static str {
        match self {
            Shape::Circle => "circle",
            Shape::Hex => "hex",
            Shape::Diamond => "diamond",
        }
    }
}

impl FromStr for Shape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "circle" => Ok(Shape::Circle),
            "hex" => Ok(Shape::Hex),
            "diamond" => Ok(Shape::Diamond),
            _ => Err(format!("no shape named '{s}'")),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The grid each shape tiles best on.
impl From<Shape> for Grid {
    fn from(shape: Shape) -> Self {
        match shape {
            Shape::Circle => Grid::Rect,
            Shape::Hex => Grid::Hex,
            Shape::Diamond => Grid::Diamond,
        }
    }
}

/// Layout of the sample points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Grid {
    #[default]
    Rect,
    Hex,
    Diamond,
    /// Blue-noise layout with a minimum distance of one spacing.
    Poisson,
}

impl Grid {
    pub fn name(self) -> &'static str {
        match self {
            Grid::Rect => "rect",
            Grid::Hex => "hex",
            Grid::Diamond => "diamond",
            Grid::Poisson => "poisson",
        }
    }
}

impl FromStr for Grid {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rect" => Ok(Grid::Rect),
            "hex" => Ok(Grid::Hex),
            "diamond" => Ok(Grid::Diamond),
            "poisson" => Ok(Grid::Poisson),
            _ => Err(format!("no grid named '{s}'")),
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Grid> for Shape {
    fn from(grid: Grid) -> Self {
        match grid {
            Grid::Rect | Grid::Poisson => Shape::Circle,
            Grid::Hex => Shape::Hex,
            Grid::Diamond => Shape::Diamond,
        }
    }
}

/// Turn free-form shape and grid names into a matching pair.
///
/// A name that does not parse takes its partner's natural counterpart; when
/// neither parses the result is `(Circle, Rect)`.
pub fn resolve_kinds(shape: &str, grid: &str) -> (Shape, Grid) {
    match (shape.parse::<Shape>().ok(), grid.parse::<Grid>().ok()) {
        (Some(shape), Some(grid)) => (shape, grid),
        (Some(shape), None) => (shape, Grid::from(shape)),
        (None, Some(grid)) => (Shape::from(grid), grid),
        (None, None) => (Shape::Circle, Grid::Rect),
    }
}

/// Everything a single render needs apart from the image itself.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    /// Output width in millimetres.
    pub output_width: f64,
    /// Distance between neighbouring sample points, in millimetres.
    pub spacing: f64,
    pub shape: Shape,
    pub grid: Grid,
    /// Invert colours before sampling and draw black dots on white.
    pub invert: bool,
    /// Emit hairline outlines for a laser cutter instead of filled dots.
    pub cut_paths: bool,
    /// Optional contrast adjustment, as accepted by
    /// [`image::DynamicImage::adjust_contrast`].
    pub contrast: Option<f32>,
    /// Average five samples around each point instead of one. Default: true.
    pub multi_sample: bool,
}

impl RenderSettings {
    pub fn builder(output_width: f64, spacing: f64) -> RenderSettingsBuilder {
        RenderSettingsBuilder {
            settings: RenderSettings {
                output_width,
                spacing,
                shape: Shape::default(),
                grid: Grid::default(),
                invert: false,
                cut_paths: false,
                contrast: None,
                multi_sample: true,
            },
        }
    }

    pub(crate) fn validate(&self) -> Result<(), EngineError> {
        if !(self.output_width.is_finite() && self.output_width > 0.0) {
            return Err(EngineError::InvalidSettings(format!(
                "output width must be a positive number, got {}",
                self.output_width
            )));
        }
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(EngineError::InvalidSettings(format!(
                "spacing must be a positive number, got {}",
                self.spacing
            )));
        }
        Ok(())
    }
}

/// Builder for [`RenderSettings`].
#[derive(Debug)]
pub struct RenderSettingsBuilder {
    settings: RenderSettings,
}

impl RenderSettingsBuilder {
    pub fn shape(mut self, shape: Shape) -> Self {
        self.settings.shape = shape;
        self
    }

    pub fn grid(mut self, grid: Grid) -> Self {
        self.settings.grid = grid;
        self
    }

    pub fn invert(mut self, v: bool) -> Self {
        self.settings.invert = v;
        self
    }

    pub fn cut_paths(mut self, v: bool) -> Self {
        self.settings.cut_paths = v;
        self
    }

    pub fn contrast(mut self, contrast: Option<f32>) -> Self {
        self.settings.contrast = contrast;
        self
    }

    pub fn multi_sample(mut self, v: bool) -> Self {
        self.settings.multi_sample = v;
        self
    }

    pub fn build(self) -> Result<RenderSettings, EngineError> {
        self.settings.validate()?;
        Ok(self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for shape in [Shape::Circle, Shape::Hex, Shape::Diamond] {
            assert_eq!(shape.name().parse::<Shape>(), Ok(shape));
        }
        for grid in [Grid::Rect, Grid::Hex, Grid::Diamond, Grid::Poisson] {
            assert_eq!(grid.to_string().parse::<Grid>(), Ok(grid));
        }
    }

    #[test]
    fn unknown_names_fall_back_in_pairs() {
        assert_eq!(resolve_kinds("hex", "poisson"), (Shape::Hex, Grid::Poisson));
        assert_eq!(resolve_kinds("diamond", "square"), (Shape::Diamond, Grid::Diamond));
        assert_eq!(resolve_kinds("dot", "poisson"), (Shape::Circle, Grid::Poisson));
        assert_eq!(resolve_kinds("dot", "hex"), (Shape::Hex, Grid::Hex));
        assert_eq!(resolve_kinds("dot", "square"), (Shape::Circle, Grid::Rect));
    }

    #[test]
    fn builder_defaults() {
        let s = RenderSettings::builder(100.0, 2.0).build().unwrap();
        assert_eq!(s.shape, Shape::Circle);
        assert_eq!(s.grid, Grid::Rect);
        assert!(s.multi_sample);
        assert!(s.contrast.is_none());
    }

    #[test]
    fn builder_rejects_non_finite_spacing() {
        assert!(RenderSettings::builder(100.0, f64::NAN).build().is_err());
        assert!(RenderSettings::builder(100.0, f64::INFINITY).build().is_err());
        assert!(RenderSettings::builder(0.0, 2.0).build().is_err());
    }
}
