//! Sweep pipelines and the DSP/metric utilities behind them

pub mod audio_sweep;
pub mod crop;
pub mod decoder;
pub mod dsp;
pub mod encoder;
pub mod image_sweep;
pub mod metrics;
pub mod visualization;

pub use audio_sweep::{run_audio_sweep, AudioSweepReport, BitrateRecord};
pub use decoder::{decode_audio, AudioData};
pub use encoder::Mp3Encoder;
pub use image_sweep::{run_image_sweep, ImageSweepReport, QualityRecord};
pub use metrics::ImageMetrics;
