// src/core/crop.rs
//
// Fixed crop windows: a pixel rectangle for images, a time window for audio.
// The same window is applied to the reference and to every variant so the
// rendered comparisons stay aligned.

use image::{imageops, RgbImage};
use serde::Serialize;

/// Rectangular pixel region, (left, top) inclusive, (right, bottom) exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropBox {
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Extract the region as a new image. The box is clamped to the image
    /// bounds, so a window that hangs off the edge yields a smaller crop
    /// rather than a panic.
    pub fn apply(&self, img: &RgbImage) -> RgbImage {
        let left = self.left.min(img.width());
        let top = self.top.min(img.height());
        let w = self.width().min(img.width() - left);
        let h = self.height().min(img.height() - top);
        imageops::crop_imm(img, left, top, w, h).to_image()
    }
}

/// Half-open time interval [start, end) in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeWindow {
    pub start_secs: f64,
    pub end_secs: f64,
}

impl TimeWindow {
    pub fn new(start_secs: f64, end_secs: f64) -> Self {
        Self { start_secs, end_secs }
    }

    /// Convert to sample indices by truncation. Truncation (not rounding)
    /// matches the reference figures this tool reproduces.
    pub fn sample_range(&self, sample_rate: u32) -> (usize, usize) {
        let start = (sample_rate as f64 * self.start_secs) as usize;
        let end = (sample_rate as f64 * self.end_secs) as usize;
        (start, end.max(start))
    }

    /// Slice the window out of a mono waveform, clamping to the available
    /// length. Returns an empty slice when the window lies past the end.
    pub fn apply<'a>(&self, samples: &'a [f32], sample_rate: u32) -> &'a [f32] {
        let (start, end) = self.sample_range(sample_rate);
        let start = start.min(samples.len());
        let end = end.min(samples.len());
        &samples[start..end]
    }

    pub fn len_samples(&self, sample_rate: u32) -> usize {
        let (start, end) = self.sample_range(sample_rate);
        end - start
    }
}
