//! FFT processing with windowing

use num_complex::Complex;
use rustfft::FftPlanner;

use super::windows::{create_window, WindowType};

/// FFT computation with windowing
pub struct FftProcessor {
    planner: FftPlanner<f32>,
    window: Vec<f32>,
    fft_size: usize,
}

impl FftProcessor {
    pub fn new(fft_size: usize, window_type: WindowType) -> Self {
        let window = create_window(fft_size, window_type);
        Self {
            planner: FftPlanner::new(),
            window,
            fft_size,
        }
    }

    /// Compute power spectrum (|X|^2) over the first fft_size/2 bins.
    /// Short input is zero-padded.
    pub fn power_spectrum(&mut self, samples: &[f32]) -> Vec<f32> {
        let fft = self.planner.plan_fft_forward(self.fft_size);

        let mut buffer: Vec<Complex<f32>> = samples
            .iter()
            .take(self.fft_size)
            .enumerate()
            .map(|(i, &s)| Complex::new(s * self.window[i], 0.0))
            .collect();

        buffer.resize(self.fft_size, Complex::new(0.0, 0.0));

        fft.process(&mut buffer);

        buffer[..self.fft_size / 2]
            .iter()
            .map(|c| c.re * c.re + c.im * c.im)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_power_spectrum_peak_at_tone_frequency() {
        let fft_size = 256;
        let sample_rate = 8192.0;
        // Bin 32 exactly: 32 * 8192 / 256 = 1024 Hz
        let freq = 1024.0;
        let samples: Vec<f32> = (0..fft_size)
            .map(|i| (2.0 * PI * freq * i as f32 / sample_rate).sin())
            .collect();

        let mut proc = FftProcessor::new(fft_size, WindowType::Hann);
        let power = proc.power_spectrum(&samples);

        let peak_bin = power
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak_bin, 32);
    }

    #[test]
    fn test_power_spectrum_length_and_padding() {
        let mut proc = FftProcessor::new(256, WindowType::Hann);
        let power = proc.power_spectrum(&[0.5; 100]);
        assert_eq!(power.len(), 128);
    }
}
