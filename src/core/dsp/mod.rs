//! DSP utilities for the spectrogram pipeline

pub mod fft;
pub mod stft;
pub mod windows;

pub use fft::FftProcessor;
pub use stft::{power_spectrogram, Spectrogram};
pub use windows::{create_window, WindowType};
