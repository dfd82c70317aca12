use crate::grid::Point;
use image::{DynamicImage, GenericImageView, Pixel};

/// Effective luminosity (`luma × alpha`, 0.0–1.0) of the pixel under an
/// output-space point.
pub fn at_point(img: &DynamicImage, resolution_ratio: f64, point: Point) -> f64 {
    let (x, y) = to_pixel(img, resolution_ratio, point);
    let [luma, alpha] = img.get_pixel(x, y).to_luma_alpha().0;
    (luma as f64 / 255.0) * (alpha as f64 / 255.0)
}

/// Mean of [`at_point`] over the point itself and four neighbours `radius`
/// away along the axes.
pub fn around_point(img: &DynamicImage, resolution_ratio: f64, (x, y): Point, radius: f64) -> f64 {
    let probes = [
        (x, y),
        (x + radius, y),
        (x - radius, y),
        (x, y + radius),
        (x, y - radius),
    ];
    probes
        .iter()
        .map(|p| at_point(img, resolution_ratio, *p))
        .sum::<f64>()
        / probes.len() as f64
}

fn to_pixel(img: &DynamicImage, resolution_ratio: f64, (x, y): Point) -> (u32, u32) {
    (
        clamp(x / resolution_ratio, img.width() - 1),
        clamp(y / resolution_ratio, img.height() - 1),
    )
}

fn clamp(n: f64, limit: u32) -> u32 {
    if n <= 0.0 {
        0
    } else if n >= limit as f64 {
        limit
    } else {
        n as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn gradient() -> DynamicImage {
        // left half black, right half white
        DynamicImage::ImageLuma8(GrayImage::from_fn(10, 2, |x, _| {
            Luma([if x < 5 { 0 } else { 255 }])
        }))
    }

    #[test]
    fn samples_map_output_space_to_pixels() {
        let img = gradient();
        // 20mm wide output → 2mm per pixel
        assert_eq!(at_point(&img, 2.0, (1.0, 1.0)), 0.0);
        assert_eq!(at_point(&img, 2.0, (19.0, 1.0)), 1.0);
    }

    #[test]
    fn out_of_bounds_points_are_clamped() {
        let img = gradient();
        assert_eq!(at_point(&img, 1.0, (-50.0, -3.0)), 0.0);
        assert_eq!(at_point(&img, 1.0, (500.0, 300.0)), 1.0);
    }

    #[test]
    fn multi_sample_averages_an_edge() {
        let img = gradient();
        // centre on the first white pixel: left probe falls on black
        let v = around_point(&img, 1.0, (5.0, 0.0), 1.0);
        assert!((v - 0.8).abs() < 1e-9, "got {v}");
    }
}
