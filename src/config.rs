//! Sweep configuration.
//!
//! The defaults reproduce the constants of the original report figures:
//! `kodim20.png` with a crop over the metal textures, `original.wav` with a
//! 100 ms window at 20 s, qualities 95/75/50/30/10 and bitrates 128/64/32/16.

use std::path::PathBuf;

use crate::core::crop::{CropBox, TimeWindow};

/// Pipeline A: JPEG quality sweep over one reference image.
#[derive(Debug, Clone)]
pub struct ImageSweepConfig {
    /// Reference image path.
    pub input: PathBuf,
    /// Directory for encoded variants, figures and the PSNR curve.
    pub output_dir: PathBuf,
    /// Region rendered in the side-by-side comparison figures.
    pub crop: CropBox,
    /// JPEG quality levels, reported in this order.
    pub qualities: Vec<u8>,
}

impl Default for ImageSweepConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("kodim20.png"),
            output_dir: PathBuf::from("."),
            crop: CropBox::new(200, 150, 350, 300),
            qualities: vec![95, 75, 50, 30, 10],
        }
    }
}

/// Pipeline B: MP3 bitrate sweep over one reference waveform.
#[derive(Debug, Clone)]
pub struct AudioSweepConfig {
    /// Reference audio path (WAV expected, any symphonia format accepted).
    pub input: PathBuf,
    /// Directory for encoded variants and spectrogram images.
    pub output_dir: PathBuf,
    /// Time window rendered in every spectrogram.
    pub window: TimeWindow,
    /// Target bitrates in kbps, reported in this order.
    pub bitrates_kbps: Vec<u32>,
}

impl Default for AudioSweepConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("original.wav"),
            output_dir: PathBuf::from("mp3_spectrograms"),
            window: TimeWindow::new(20.0, 20.1),
            bitrates_kbps: vec![128, 64, 32, 16],
        }
    }
}

/// Hand-entered listening test results: (bitrate kbps, mean opinion score).
pub const BITRATE_MOS: [(u32, f64); 4] = [(16, 2.2), (32, 2.7), (64, 3.5), (128, 4.0)];
