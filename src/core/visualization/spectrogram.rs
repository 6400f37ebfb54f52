// src/core/visualization/spectrogram.rs
//
// Time-frequency heat map rendering. Power goes to dB as 10*log10(p + 1e-8);
// the 1e-8 floor keeps silent bins off -inf and must not change, the rendered
// figures are only comparable to the reference set with this exact floor.

use anyhow::Result;
use image::{ImageBuffer, Rgb};
use std::path::Path;

use crate::core::dsp::Spectrogram;

const DB_FLOOR: f32 = 1e-8;

/// Output image geometry.
#[derive(Debug, Clone)]
pub struct SpectrogramImageConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for SpectrogramImageConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 400,
        }
    }
}

/// Render the power matrix as a heat map PNG, low frequencies at the bottom.
/// Colors are normalized to the dB range actually present in this signal.
pub fn render_spectrogram(
    spec: &Spectrogram,
    config: &SpectrogramImageConfig,
    output_path: &Path,
) -> Result<()> {
    let num_frames = spec.num_frames();
    let num_bins = spec.num_bins();
    if num_frames == 0 || num_bins == 0 {
        anyhow::bail!("Empty spectrogram");
    }

    let db: Vec<Vec<f32>> = spec
        .power
        .iter()
        .map(|frame| frame.iter().map(|&p| 10.0 * (p + DB_FLOOR).log10()).collect())
        .collect();

    let mut min_db = f32::MAX;
    let mut max_db = f32::MIN;
    for frame in &db {
        for &v in frame {
            min_db = min_db.min(v);
            max_db = max_db.max(v);
        }
    }
    let range = (max_db - min_db).max(1e-3);

    let mut img: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::new(config.width, config.height);

    let x_scale = num_frames as f32 / config.width as f32;
    let y_scale = num_bins as f32 / config.height as f32;

    for y in 0..config.height {
        for x in 0..config.width {
            let frame_idx = ((x as f32 * x_scale) as usize).min(num_frames - 1);
            // Flip Y for display (low frequencies at bottom)
            let bin_idx =
                (((config.height - 1 - y) as f32 * y_scale) as usize).min(num_bins - 1);

            let normalized = (db[frame_idx][bin_idx] - min_db) / range;
            img.put_pixel(x, y, db_to_color(normalized));
        }
    }

    img.save(output_path)?;
    Ok(())
}

fn db_to_color(value: f32) -> Rgb<u8> {
    // Viridis-like colormap
    let v = value.clamp(0.0, 1.0);

    let r = (68.0 + v * (235.0 - 68.0)) as u8;
    let g = (1.0 + v * (237.0 - 1.0)) as u8;
    let b = (84.0 + v * (32.0 - 84.0 + (1.0 - v) * 150.0)) as u8;

    Rgb([r, g, b])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dsp::power_spectrogram;
    use std::f32::consts::PI;

    #[test]
    fn test_render_writes_png_with_requested_size() {
        let samples: Vec<f32> = (0..4410)
            .map(|i| (2.0 * PI * 1000.0 * i as f32 / 44100.0).sin())
            .collect();
        let spec = power_spectrogram(&samples, 44100).unwrap();

        let dir = std::env::temp_dir().join(format!("codecsweep-vis-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("spec.png");

        let config = SpectrogramImageConfig {
            width: 120,
            height: 80,
        };
        render_spectrogram(&spec, &config, &path).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!(img.width(), 120);
        assert_eq!(img.height(), 80);

        std::fs::remove_dir_all(&dir).ok();
    }
}
