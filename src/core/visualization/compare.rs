// src/core/visualization/compare.rs
//
// Side-by-side artifact comparison panels: reference crop on the left,
// re-encoded crop on the right, separated by a white gutter.

use anyhow::Result;
use image::{imageops, Rgb, RgbImage};
use std::path::Path;

const GUTTER_PX: u32 = 8;

/// Compose the two crops into one figure and write it to `output_path`.
/// Both crops come from the same `CropBox`, so their dimensions match.
pub fn render_comparison(
    original_crop: &RgbImage,
    variant_crop: &RgbImage,
    output_path: &Path,
) -> Result<()> {
    let w = original_crop.width().max(variant_crop.width());
    let h = original_crop.height().max(variant_crop.height());

    let mut canvas = RgbImage::from_pixel(w * 2 + GUTTER_PX, h, Rgb([255, 255, 255]));
    imageops::replace(&mut canvas, original_crop, 0, 0);
    imageops::replace(&mut canvas, variant_crop, (w + GUTTER_PX) as i64, 0);

    canvas.save(output_path)?;
    Ok(())
}
