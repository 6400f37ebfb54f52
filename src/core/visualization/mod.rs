//! Figure rendering: spectrogram heat maps, comparison panels, line charts

pub mod charts;
pub mod compare;
pub mod spectrogram;

pub use charts::{render_mos_curve, render_psnr_curve};
pub use compare::render_comparison;
pub use spectrogram::{render_spectrogram, SpectrogramImageConfig};
