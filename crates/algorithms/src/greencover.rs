//! Green-cover classification
//!
//! Classifies every pixel of an aerial/satellite image as vegetation or
//! idle land using an adaptive threshold derived from the image's own mean
//! green intensity, and reports the resulting coverage percentages.

use crate::maybe_rayon::*;
use verdis_core::pixel::Rgba;
use verdis_core::raster::{Raster, RgbaRaster};
use verdis_core::{Error, Result};

/// Luma coefficient applied to the green channel (ITU-R BT.601).
///
/// Used as a crude single-channel luminance proxy; red and blue are
/// intentionally ignored since vegetation is green-channel dominant.
pub const GREEN_LUMA_WEIGHT: f64 = 0.587;

/// Divisor applied to the mean green intensity to obtain the threshold.
///
/// Lowers the cutoff below the raw mean, biasing classification toward
/// vegetation. Fixed tuning constant; not derived from image statistics.
pub const THRESHOLD_DIVISOR: f64 = 1.5;

/// Parameters for green-cover classification
#[derive(Debug, Clone)]
pub struct GreenCoverParams {
    /// Weight applied to the green channel before thresholding
    /// (default: [`GREEN_LUMA_WEIGHT`])
    pub luma_weight: f64,
    /// Divisor applied to the mean green value (default:
    /// [`THRESHOLD_DIVISOR`])
    pub threshold_divisor: f64,
}

impl Default for GreenCoverParams {
    fn default() -> Self {
        Self {
            luma_weight: GREEN_LUMA_WEIGHT,
            threshold_divisor: THRESHOLD_DIVISOR,
        }
    }
}

/// Result of a green-cover classification
#[derive(Debug, Clone)]
pub struct GreenCover {
    /// Binary mask: vegetation pixels are [`Rgba::BLACK`], idle land is
    /// [`Rgba::WHITE`]; alpha is always 255
    pub mask: RgbaRaster,
    /// Share of pixels classified as vegetation, in percent, rounded to
    /// two decimals
    pub vegetation_percent: f64,
    /// `100 - vegetation_percent`, rounded to two decimals
    pub idle_percent: f64,
    /// Number of pixels classified as vegetation
    pub vegetation_pixels: usize,
    /// Mean green intensity measured in pass 1 (unrounded)
    pub mean_green: f64,
    /// Effective classification threshold, `mean_green / threshold_divisor`
    pub threshold: f64,
}

/// Mean green-channel intensity over all pixels.
///
/// The green sum fits a `u64` for any raster addressable in memory, so the
/// reduction is exact before the final division.
pub fn mean_green(image: &RgbaRaster) -> Result<f64> {
    let (rows, cols) = image.shape();
    if image.is_empty() {
        return Err(Error::InvalidImage {
            rows,
            cols,
            pixels: 0,
        });
    }

    let sum: u64 = (0..rows)
        .into_par_iter()
        .map(|row| {
            let mut row_sum = 0u64;
            for col in 0..cols {
                let pixel = unsafe { image.get_unchecked(row, col) };
                row_sum += pixel.g as u64;
            }
            row_sum
        })
        .sum();

    Ok(sum as f64 / image.len() as f64)
}

/// Classify an image into vegetation / idle land.
///
/// Two passes over the input:
/// 1. compute `mean_green` over all pixels;
/// 2. for each pixel, `gray = green * luma_weight`; the pixel is vegetation
///    when `gray < mean_green / threshold_divisor`.
///
/// The input is never mutated; the mask is a freshly allocated raster of
/// identical shape. Both passes run row-parallel when the `parallel`
/// feature is enabled, which changes nothing about the result since pass 1
/// is a commutative sum and pass 2 is per-pixel.
///
/// # Arguments
/// * `image` - Decoded RGBA imagery (input alpha is ignored)
/// * `params` - Weighting and threshold constants
pub fn green_cover(image: &RgbaRaster, params: GreenCoverParams) -> Result<GreenCover> {
    validate_params(&params)?;

    let mean = mean_green(image)?;
    let threshold = mean / params.threshold_divisor;

    let (rows, cols) = image.shape();
    let luma_weight = params.luma_weight;

    let per_row: Vec<(Vec<Rgba>, usize)> = (0..rows)
        .into_par_iter()
        .map(|row| {
            let mut mask_row = Vec::with_capacity(cols);
            let mut vegetation = 0usize;
            for col in 0..cols {
                let pixel = unsafe { image.get_unchecked(row, col) };
                let gray = pixel.g as f64 * luma_weight;
                if gray < threshold {
                    mask_row.push(Rgba::BLACK);
                    vegetation += 1;
                } else {
                    mask_row.push(Rgba::WHITE);
                }
            }
            (mask_row, vegetation)
        })
        .collect();

    let mut mask_data = Vec::with_capacity(rows * cols);
    let mut vegetation_pixels = 0usize;
    for (mask_row, count) in per_row {
        mask_data.extend_from_slice(&mask_row);
        vegetation_pixels += count;
    }

    let cells = (rows * cols) as f64;
    let vegetation_percent = round2(vegetation_pixels as f64 / cells * 100.0);
    let idle_percent = round2(100.0 - vegetation_percent);

    Ok(GreenCover {
        mask: Raster::from_vec(mask_data, rows, cols)?,
        vegetation_percent,
        idle_percent,
        vegetation_pixels,
        mean_green: mean,
        threshold,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_params(params: &GreenCoverParams) -> Result<()> {
    if !params.threshold_divisor.is_finite() || params.threshold_divisor <= 0.0 {
        return Err(Error::InvalidParameter {
            name: "threshold_divisor",
            value: params.threshold_divisor.to_string(),
            reason: "must be finite and positive".to_string(),
        });
    }
    if !params.luma_weight.is_finite() || params.luma_weight <= 0.0 {
        return Err(Error::InvalidParameter {
            name: "luma_weight",
            value: params.luma_weight.to_string(),
            reason: "must be finite and positive".to_string(),
        });
    }
    Ok(())
}

/// Round to two decimal places
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn solid(rows: usize, cols: usize, pixel: Rgba) -> RgbaRaster {
        Raster::filled(rows, cols, pixel)
    }

    /// Deterministic pseudo-random imagery (LCG over channel values)
    fn noisy(rows: usize, cols: usize, seed: u64) -> RgbaRaster {
        let mut state = seed;
        let mut next = move || {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (state >> 33) as u8
        };
        let data: Vec<Rgba> = (0..rows * cols)
            .map(|_| Rgba::new(next(), next(), next(), next()))
            .collect();
        Raster::from_vec(data, rows, cols).unwrap()
    }

    #[test]
    fn test_uniform_green_is_all_vegetation() {
        // mean = 200, threshold = 133.33, gray = 117.4 < threshold
        let image = solid(10, 10, Rgba::opaque(0, 200, 0));
        let result = green_cover(&image, GreenCoverParams::default()).unwrap();

        assert_eq!(result.vegetation_percent, 100.00);
        assert_eq!(result.idle_percent, 0.00);
        assert_eq!(result.vegetation_pixels, 100);
        assert_abs_diff_eq!(result.mean_green, 200.0);
        assert_abs_diff_eq!(result.threshold, 200.0 / 1.5, epsilon = 1e-12);
        assert!(result.mask.data().iter().all(|&p| p == Rgba::BLACK));
    }

    #[test]
    fn test_all_zero_image_is_all_idle() {
        // mean = 0, threshold = 0, gray = 0 is not < 0
        let image = solid(4, 4, Rgba::new(0, 0, 0, 255));
        let result = green_cover(&image, GreenCoverParams::default()).unwrap();

        assert_eq!(result.vegetation_percent, 0.00);
        assert_eq!(result.idle_percent, 100.00);
        assert_eq!(result.vegetation_pixels, 0);
        assert!(result.mask.data().iter().all(|&p| p == Rgba::WHITE));
    }

    #[test]
    fn test_mixed_image_counts_and_rounding() {
        // One bright pixel among eight dark ones: mean = 255/9 = 28.33,
        // threshold = 18.89; bright gray = 149.7 -> idle, dark gray = 0 ->
        // vegetation. 8/9 = 88.888... rounds to 88.89.
        let mut data = vec![Rgba::new(0, 0, 0, 255); 9];
        data[4] = Rgba::opaque(0, 255, 0);
        let image = Raster::from_vec(data, 3, 3).unwrap();

        let result = green_cover(&image, GreenCoverParams::default()).unwrap();

        assert_eq!(result.vegetation_pixels, 8);
        assert_eq!(result.vegetation_percent, 88.89);
        assert_eq!(result.idle_percent, 11.11);
        assert_eq!(result.mask.get(1, 1).unwrap(), Rgba::WHITE);
        assert_eq!(result.mask.get(0, 0).unwrap(), Rgba::BLACK);
    }

    #[test]
    fn test_half_and_half() {
        // Two pixels at g=200, two at g=0: mean = 100, threshold = 66.67;
        // bright gray = 117.4 -> idle, dark -> vegetation.
        let data = vec![
            Rgba::opaque(0, 200, 0),
            Rgba::opaque(0, 200, 0),
            Rgba::opaque(0, 0, 0),
            Rgba::opaque(0, 0, 0),
        ];
        let image = Raster::from_vec(data, 2, 2).unwrap();

        let result = green_cover(&image, GreenCoverParams::default()).unwrap();
        assert_eq!(result.vegetation_percent, 50.00);
        assert_eq!(result.idle_percent, 50.00);
    }

    #[test]
    fn test_complement_law() {
        for seed in [1u64, 42, 4096] {
            let image = noisy(17, 23, seed);
            let result = green_cover(&image, GreenCoverParams::default()).unwrap();
            assert_abs_diff_eq!(
                result.vegetation_percent + result.idle_percent,
                100.00,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_determinism() {
        let image = noisy(32, 32, 7);
        let a = green_cover(&image, GreenCoverParams::default()).unwrap();
        let b = green_cover(&image, GreenCoverParams::default()).unwrap();

        assert_eq!(a.mask, b.mask);
        assert_eq!(a.vegetation_percent, b.vegetation_percent);
        assert_eq!(a.idle_percent, b.idle_percent);
        assert_eq!(a.vegetation_pixels, b.vegetation_pixels);
    }

    #[test]
    fn test_mask_is_strictly_binary() {
        let image = noisy(19, 13, 99);
        let result = green_cover(&image, GreenCoverParams::default()).unwrap();

        assert_eq!(result.mask.shape(), image.shape());
        for &pixel in result.mask.data().iter() {
            assert!(pixel.is_binary(), "non-binary mask pixel: {:?}", pixel);
            assert_eq!(pixel.a, 255);
        }
    }

    #[test]
    fn test_input_alpha_is_ignored() {
        let image = solid(5, 5, Rgba::new(0, 200, 0, 0));
        let result = green_cover(&image, GreenCoverParams::default()).unwrap();
        assert!(result.mask.data().iter().all(|&p| p.a == 255));
    }

    #[test]
    fn test_percentage_bounds() {
        for seed in [3u64, 1234, 987654] {
            let image = noisy(11, 29, seed);
            let result = green_cover(&image, GreenCoverParams::default()).unwrap();

            assert!(result.vegetation_pixels <= image.len());
            assert!((0.00..=100.00).contains(&result.vegetation_percent));
            assert!((0.00..=100.00).contains(&result.idle_percent));
        }
    }

    #[test]
    fn test_custom_divisor_flips_uniform_image() {
        // With divisor 2.0 the threshold drops to 100 and gray = 117.4 is no
        // longer below it, so the same image classifies as all idle.
        let image = solid(6, 6, Rgba::opaque(0, 200, 0));
        let params = GreenCoverParams {
            threshold_divisor: 2.0,
            ..Default::default()
        };

        let result = green_cover(&image, params).unwrap();
        assert_eq!(result.vegetation_percent, 0.00);
        assert!(result.mask.data().iter().all(|&p| p == Rgba::WHITE));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let image = solid(2, 2, Rgba::WHITE);

        let zero_divisor = GreenCoverParams {
            threshold_divisor: 0.0,
            ..Default::default()
        };
        assert!(green_cover(&image, zero_divisor).is_err());

        let nan_weight = GreenCoverParams {
            luma_weight: f64::NAN,
            ..Default::default()
        };
        assert!(green_cover(&image, nan_weight).is_err());
    }

    #[test]
    fn test_empty_image_rejected() {
        let image: RgbaRaster = Raster::filled(0, 10, Rgba::BLACK);
        assert!(matches!(
            green_cover(&image, GreenCoverParams::default()),
            Err(Error::InvalidImage { .. })
        ));
        assert!(mean_green(&image).is_err());
    }

    #[test]
    fn test_mean_green() {
        let data = vec![
            Rgba::opaque(10, 0, 30),
            Rgba::opaque(10, 100, 30),
            Rgba::opaque(10, 200, 30),
            Rgba::opaque(10, 100, 30),
        ];
        let image = Raster::from_vec(data, 2, 2).unwrap();
        assert_abs_diff_eq!(mean_green(&image).unwrap(), 100.0);
    }
}
