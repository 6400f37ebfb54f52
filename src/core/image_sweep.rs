// src/core/image_sweep.rs
//
// Pipeline A: JPEG quality sweep. Loads the reference once, re-encodes the
// full image at each quality level, measures PSNR/SSIM against the decoded
// variant, and renders the crop comparisons plus the quality-vs-PSNR curve.
// A failing quality level is recorded and the sweep moves on; only a failing
// reference load aborts.

use std::path::PathBuf;

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use log::{info, warn};

use crate::config::ImageSweepConfig;
use crate::core::metrics::{self, ImageMetrics};
use crate::core::visualization::{render_comparison, render_psnr_curve};

/// Everything measured for one successfully processed quality level.
#[derive(Debug, Clone, serde::Serialize)]
pub struct QualityRecord {
    pub quality: u8,
    pub encoded_path: PathBuf,
    pub figure_path: PathBuf,
    pub file_size_kb: f64,
    /// Original encoded size over variant size.
    pub ratio: f64,
    pub metrics: ImageMetrics,
}

/// Per-quality outcome; the sweep continues past individual failures.
#[derive(Debug)]
pub struct QualityOutcome {
    pub quality: u8,
    pub result: Result<QualityRecord>,
}

#[derive(Debug)]
pub struct ImageSweepReport {
    pub input: PathBuf,
    pub width: u32,
    pub height: u32,
    pub original_size_kb: f64,
    pub crop_reference_path: PathBuf,
    pub outcomes: Vec<QualityOutcome>,
    pub curve_path: Option<PathBuf>,
    /// Quality pairs (lower, higher) where the lower quality produced the
    /// larger file. Flagged, never fatal.
    pub size_inversions: Vec<(u8, u8)>,
}

impl ImageSweepReport {
    pub fn records(&self) -> impl Iterator<Item = &QualityRecord> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }
}

/// Run the full quality sweep.
pub fn run_image_sweep(config: &ImageSweepConfig) -> Result<ImageSweepReport> {
    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("Failed to create output directory: {}", config.output_dir.display())
    })?;

    let original_size = std::fs::metadata(&config.input)
        .with_context(|| format!("Failed to stat input image: {}", config.input.display()))?
        .len();
    let original_size_kb = original_size as f64 / 1024.0;

    let original = image::open(&config.input)
        .with_context(|| format!("Failed to decode input image: {}", config.input.display()))?
        .to_rgb8();
    let (width, height) = original.dimensions();

    info!(
        "Loaded {} ({}x{}, {:.1} KB)",
        config.input.display(),
        width,
        height,
        original_size_kb
    );

    let original_crop = config.crop.apply(&original);
    let crop_reference_path = config.output_dir.join("crop_reference.png");
    original_crop
        .save(&crop_reference_path)
        .with_context(|| format!("Failed to save {}", crop_reference_path.display()))?;

    let stem = config
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");

    let mut outcomes = Vec::with_capacity(config.qualities.len());
    for &quality in &config.qualities {
        let result = sweep_quality(config, &original, &original_crop, stem, quality, original_size_kb);
        if let Err(ref e) = result {
            warn!("Quality {} failed: {:#}", quality, e);
        }
        outcomes.push(QualityOutcome { quality, result });
    }

    let sizes: Vec<(u8, u64)> = outcomes
        .iter()
        .filter_map(|o| {
            o.result
                .as_ref()
                .ok()
                .map(|r| (o.quality, (r.file_size_kb * 1024.0) as u64))
        })
        .collect();
    let size_inversions = metrics::size_inversions(&sizes);

    let psnr_points: Vec<(u8, f64)> = outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().ok().map(|r| (o.quality, r.metrics.psnr_db)))
        .collect();

    let curve_path = if psnr_points.iter().any(|(_, p)| p.is_finite()) {
        let path = config.output_dir.join("jpeg_psnr_curve.png");
        render_psnr_curve(&psnr_points, &path)?;
        Some(path)
    } else {
        warn!("No finite PSNR values, skipping curve");
        None
    };

    Ok(ImageSweepReport {
        input: config.input.clone(),
        width,
        height,
        original_size_kb,
        crop_reference_path,
        outcomes,
        curve_path,
        size_inversions,
    })
}

fn sweep_quality(
    config: &ImageSweepConfig,
    original: &RgbImage,
    original_crop: &RgbImage,
    stem: &str,
    quality: u8,
    original_size_kb: f64,
) -> Result<QualityRecord> {
    let encoded_path = config.output_dir.join(format!("{}_q{}.jpg", stem, quality));

    // Encode to memory first; writing the finished buffer in one call keeps
    // the on-disk file complete before it is stated and decoded below.
    let mut encoded = Vec::new();
    JpegEncoder::new_with_quality(&mut encoded, quality)
        .encode_image(original)
        .with_context(|| format!("JPEG encode at quality {} failed", quality))?;
    std::fs::write(&encoded_path, &encoded)
        .with_context(|| format!("Failed to write {}", encoded_path.display()))?;

    let file_size_kb = encoded.len() as f64 / 1024.0;

    // Re-encoding changes pixel values, never the grid, so the metric
    // evaluator's equal-dimension requirement holds by construction.
    let decoded = image::open(&encoded_path)
        .with_context(|| format!("Failed to decode variant {}", encoded_path.display()))?
        .to_rgb8();

    let metrics = metrics::evaluate(original, &decoded)?;

    let figure_path = config.output_dir.join(format!("artifact_zoom_q{}.png", quality));
    let variant_crop = config.crop.apply(&decoded);
    render_comparison(original_crop, &variant_crop, &figure_path)?;

    info!(
        "q={}: {:.1} KB, PSNR {:.2} dB, SSIM {:.3}",
        quality, file_size_kb, metrics.psnr_db, metrics.ssim
    );

    Ok(QualityRecord {
        quality,
        encoded_path,
        figure_path,
        file_size_kb,
        ratio: original_size_kb / file_size_kb,
        metrics,
    })
}
