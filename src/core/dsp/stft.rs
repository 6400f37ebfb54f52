//! Short-time Fourier transform with the fixed parameters the spectrogram
//! figures use: 256-sample Hann window, 128-sample hop (50% overlap).

use anyhow::{bail, Result};

use super::fft::FftProcessor;
use super::windows::WindowType;

pub const STFT_WINDOW_LEN: usize = 256;
pub const STFT_HOP: usize = 128;

/// Time-frequency power matrix, frames-major.
#[derive(Debug, Clone)]
pub struct Spectrogram {
    /// power[frame][bin], bin 0 = DC.
    pub power: Vec<Vec<f32>>,
    pub sample_rate: u32,
    pub window_len: usize,
    pub hop: usize,
}

impl Spectrogram {
    pub fn num_frames(&self) -> usize {
        self.power.len()
    }

    pub fn num_bins(&self) -> usize {
        self.power.first().map(|f| f.len()).unwrap_or(0)
    }
}

/// Compute the STFT power matrix of a mono signal with the fixed 256/128
/// windowing. Fails when the signal is shorter than one window.
pub fn power_spectrogram(samples: &[f32], sample_rate: u32) -> Result<Spectrogram> {
    if samples.len() < STFT_WINDOW_LEN {
        bail!(
            "Signal too short for spectrogram: {} samples, need at least {}",
            samples.len(),
            STFT_WINDOW_LEN
        );
    }

    let num_frames = (samples.len() - STFT_WINDOW_LEN) / STFT_HOP + 1;
    let mut proc = FftProcessor::new(STFT_WINDOW_LEN, WindowType::Hann);

    let power: Vec<Vec<f32>> = (0..num_frames)
        .map(|frame| {
            let start = frame * STFT_HOP;
            proc.power_spectrum(&samples[start..start + STFT_WINDOW_LEN])
        })
        .collect();

    Ok(Spectrogram {
        power,
        sample_rate,
        window_len: STFT_WINDOW_LEN,
        hop: STFT_HOP,
    })
}
