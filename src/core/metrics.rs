// src/core/metrics.rs
//
// Distortion metrics for the image sweep: MSE/PSNR over all channels and a
// windowed SSIM. The SSIM parameters are pinned here rather than inherited
// from any library default: sliding 8x8 uniform window, C1 = (0.01*255)^2,
// C2 = (0.03*255)^2, computed per channel and averaged.

use image::RgbImage;
use thiserror::Error;

const PEAK: f64 = 255.0;
const SSIM_WINDOW: usize = 8;
const SSIM_C1: f64 = (0.01 * PEAK) * (0.01 * PEAK);
const SSIM_C2: f64 = (0.03 * PEAK) * (0.03 * PEAK);

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Image dimensions differ: {0}x{1} vs {2}x{3}")]
    DimensionMismatch(u32, u32, u32, u32),

    #[error("Images are smaller than the {SSIM_WINDOW}x{SSIM_WINDOW} SSIM window")]
    TooSmall,
}

/// PSNR and SSIM for one variant against the reference.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct ImageMetrics {
    /// Peak signal-to-noise ratio in dB. Infinite for identical inputs.
    pub psnr_db: f64,
    pub ssim: f64,
}

/// Compute both metrics. The two images must have equal dimensions.
pub fn evaluate(original: &RgbImage, variant: &RgbImage) -> Result<ImageMetrics, MetricsError> {
    check_dimensions(original, variant)?;
    Ok(ImageMetrics {
        psnr_db: psnr(original, variant)?,
        ssim: ssim(original, variant)?,
    })
}

/// Mean squared per-pixel error across all channels.
pub fn mse(original: &RgbImage, variant: &RgbImage) -> Result<f64, MetricsError> {
    check_dimensions(original, variant)?;
    let sum: f64 = original
        .as_raw()
        .iter()
        .zip(variant.as_raw().iter())
        .map(|(&a, &b)| {
            let d = a as f64 - b as f64;
            d * d
        })
        .sum();
    Ok(sum / original.as_raw().len() as f64)
}

/// 10*log10(255^2 / MSE). Identical inputs have zero error and yield
/// f64::INFINITY by convention; callers must not assume finiteness.
pub fn psnr(original: &RgbImage, variant: &RgbImage) -> Result<f64, MetricsError> {
    let mse = mse(original, variant)?;
    if mse == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(10.0 * (PEAK * PEAK / mse).log10())
}

/// Mean structural similarity over all 8x8 window positions, per channel,
/// averaged across the three channels. Result lies in [-1, 1].
pub fn ssim(original: &RgbImage, variant: &RgbImage) -> Result<f64, MetricsError> {
    check_dimensions(original, variant)?;
    let (w, h) = original.dimensions();
    if (w as usize) < SSIM_WINDOW || (h as usize) < SSIM_WINDOW {
        return Err(MetricsError::TooSmall);
    }

    let mut channel_sum = 0.0;
    for channel in 0..3 {
        channel_sum += ssim_channel(original, variant, channel);
    }
    Ok(channel_sum / 3.0)
}

fn ssim_channel(original: &RgbImage, variant: &RgbImage, channel: usize) -> f64 {
    let (w, h) = original.dimensions();
    let (w, h) = (w as usize, h as usize);
    let n = (SSIM_WINDOW * SSIM_WINDOW) as f64;

    let mut total = 0.0;
    let mut windows = 0usize;

    for y0 in 0..=(h - SSIM_WINDOW) {
        for x0 in 0..=(w - SSIM_WINDOW) {
            let mut sum_a = 0.0;
            let mut sum_b = 0.0;
            let mut sum_aa = 0.0;
            let mut sum_bb = 0.0;
            let mut sum_ab = 0.0;

            for y in y0..y0 + SSIM_WINDOW {
                for x in x0..x0 + SSIM_WINDOW {
                    let a = original.get_pixel(x as u32, y as u32)[channel] as f64;
                    let b = variant.get_pixel(x as u32, y as u32)[channel] as f64;
                    sum_a += a;
                    sum_b += b;
                    sum_aa += a * a;
                    sum_bb += b * b;
                    sum_ab += a * b;
                }
            }

            let mu_a = sum_a / n;
            let mu_b = sum_b / n;
            let var_a = (sum_aa - sum_a * mu_a) / (n - 1.0);
            let var_b = (sum_bb - sum_b * mu_b) / (n - 1.0);
            let cov = (sum_ab - sum_a * mu_b) / (n - 1.0);

            let numerator = (2.0 * mu_a * mu_b + SSIM_C1) * (2.0 * cov + SSIM_C2);
            let denominator = (mu_a * mu_a + mu_b * mu_b + SSIM_C1) * (var_a + var_b + SSIM_C2);

            total += numerator / denominator;
            windows += 1;
        }
    }

    total / windows as f64
}

fn check_dimensions(original: &RgbImage, variant: &RgbImage) -> Result<(), MetricsError> {
    if original.dimensions() != variant.dimensions() {
        let (ow, oh) = original.dimensions();
        let (vw, vh) = variant.dimensions();
        return Err(MetricsError::DimensionMismatch(ow, oh, vw, vh));
    }
    Ok(())
}

/// Report pairs of quality levels where the lower quality produced the
/// *larger* file. Size should grow with quality; inversions are flagged,
/// never treated as errors (pathological inputs can legitimately produce
/// them).
pub fn size_inversions(records: &[(u8, u64)]) -> Vec<(u8, u8)> {
    let mut sorted: Vec<_> = records.to_vec();
    sorted.sort_by_key(|&(q, _)| q);

    let mut inversions = Vec::new();
    for pair in sorted.windows(2) {
        let (q_lo, size_lo) = pair[0];
        let (q_hi, size_hi) = pair[1];
        if size_lo > size_hi {
            log::warn!(
                "File size inversion: q={} produced {} bytes, q={} produced {}",
                q_lo, size_lo, q_hi, size_hi
            );
            inversions.push((q_lo, q_hi));
        }
    }
    inversions
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient_image(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| {
            Rgb([
                (x * 255 / w.max(1)) as u8,
                (y * 255 / h.max(1)) as u8,
                ((x + y) % 256) as u8,
            ])
        })
    }

    #[test]
    fn test_psnr_identical_is_infinite() {
        let img = gradient_image(32, 32);
        let psnr = psnr(&img, &img).unwrap();
        assert!(psnr.is_infinite() && psnr > 0.0);
    }

    #[test]
    fn test_ssim_identical_is_one() {
        let img = gradient_image(32, 32);
        let s = ssim(&img, &img).unwrap();
        assert!((s - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ssim_in_range_for_unrelated_images() {
        let a = gradient_image(32, 32);
        let b = RgbImage::from_fn(32, 32, |x, y| {
            Rgb([((x * 7 + y * 13) % 256) as u8, 0, 255])
        });
        let s = ssim(&a, &b).unwrap();
        assert!((-1.0..=1.0).contains(&s));
        assert!(s < 0.999);
    }

    #[test]
    fn test_psnr_decreases_with_more_noise() {
        let original = gradient_image(32, 32);
        let perturb = |amount: i16| {
            RgbImage::from_fn(32, 32, |x, y| {
                let p = original.get_pixel(x, y);
                Rgb([
                    (p[0] as i16 + amount).clamp(0, 255) as u8,
                    p[1],
                    p[2],
                ])
            })
        };
        let slight = perturb(2);
        let heavy = perturb(40);
        let psnr_slight = psnr(&original, &slight).unwrap();
        let psnr_heavy = psnr(&original, &heavy).unwrap();
        assert!(psnr_slight > psnr_heavy);
        assert!(ssim(&original, &slight).unwrap() > ssim(&original, &heavy).unwrap());
    }

    #[test]
    fn test_dimension_mismatch_is_error() {
        let a = gradient_image(32, 32);
        let b = gradient_image(16, 32);
        assert!(matches!(
            psnr(&a, &b),
            Err(MetricsError::DimensionMismatch(..))
        ));
    }

    #[test]
    fn test_size_inversions_flagged_not_asserted() {
        // q=30 larger than q=50: one inversion, reported in quality order.
        let records = vec![(95u8, 500u64), (50, 120), (30, 150), (10, 40)];
        assert_eq!(size_inversions(&records), vec![(30, 50)]);

        let clean = vec![(95u8, 500u64), (50, 200), (10, 50)];
        assert!(size_inversions(&clean).is_empty());
    }
}
