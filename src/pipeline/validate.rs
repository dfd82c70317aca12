//! Validation: turn the raw [`FormControls`] into [`ConversionParameters`].
//!
//! Numeric fields are read the way a browser's `parseFloat` reads them: skip
//! leading whitespace, take the longest numeric prefix, ignore the rest.
//! `"12.5mm"` is 12.5, `"abc"` is NaN. Anything that is not a finite number
//! greater than zero stops the cycle before the file is even read.

use crate::config::{ConversionParameters, FormControls};
use crate::output::SkipReason;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static RE_NUMERIC_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").unwrap()
});

/// Parse the leading numeric prefix of `input`; NaN when there is none.
pub fn parse_number(input: &str) -> f64 {
    RE_NUMERIC_PREFIX
        .find(input.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Validate the controls into a parameter set for the engine.
///
/// The engine's invert flag is the negation of the light-background
/// checkbox. Shape and grid names pass through verbatim.
pub fn validate(controls: &FormControls) -> Result<ConversionParameters, SkipReason> {
    let output_width = positive(&controls.output_width, "output width")?;
    let spacing = positive(&controls.spacing, "spacing")?;

    ConversionParameters::builder()
        .output_width(output_width)
        .spacing(spacing)
        .shape(controls.shape.as_str())
        .grid(controls.grid.as_str())
        .invert(!controls.light_background)
        .cut_paths(controls.cut_paths)
        .build()
        .map_err(|e| {
            debug!("Parameter builder refused controls: {}", e);
            SkipReason::InvalidParameter {
                field: "parameters".into(),
                input: e.to_string(),
            }
        })
}

fn positive(input: &str, field: &str) -> Result<f64, SkipReason> {
    let value = parse_number(input);
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        debug!("Rejecting {} {:?} (parsed as {})", field, input, value);
        Err(SkipReason::InvalidParameter {
            field: field.to_string(),
            input: input.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_number_prefix_semantics() {
        assert_eq!(parse_number("100"), 100.0);
        assert_eq!(parse_number("  2.5"), 2.5);
        assert_eq!(parse_number("12mm"), 12.0);
        assert_eq!(parse_number(".5"), 0.5);
        assert_eq!(parse_number("3."), 3.0);
        assert_eq!(parse_number("1e2x"), 100.0);
        assert_eq!(parse_number("1e"), 1.0);
        assert_eq!(parse_number("-4"), -4.0);
        assert_eq!(parse_number("Infinity"), f64::INFINITY);
        assert!(parse_number("abc").is_nan());
        assert!(parse_number("").is_nan());
        assert!(parse_number("x12").is_nan());
    }

    #[test]
    fn invert_is_negated_checkbox() {
        let mut controls = FormControls {
            light_background: true,
            ..Default::default()
        };
        assert!(!validate(&controls).unwrap().invert());

        controls.light_background = false;
        assert!(validate(&controls).unwrap().invert());
    }

    #[test]
    fn rejects_zero_negative_and_garbage() {
        for bad in ["0", "0.0", "-0", "-3", "abc", "", "Infinity", "NaN"] {
            let controls = FormControls {
                output_width: bad.into(),
                ..Default::default()
            };
            assert!(
                matches!(
                    validate(&controls),
                    Err(SkipReason::InvalidParameter { ref field, .. }) if field == "output width"
                ),
                "width {bad:?} should be rejected"
            );

            let controls = FormControls {
                spacing: bad.into(),
                ..Default::default()
            };
            assert!(validate(&controls).is_err(), "spacing {bad:?} should be rejected");
        }
    }

    #[test]
    fn names_and_cut_paths_pass_through() {
        let controls = FormControls {
            shape: "dot".into(),
            grid: "square".into(),
            cut_paths: true,
            ..Default::default()
        };
        let p = validate(&controls).unwrap();
        assert_eq!(p.shape(), "dot");
        assert_eq!(p.grid(), "square");
        assert!(p.cut_paths());
    }
}
