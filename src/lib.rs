//! CodecSweep - evaluate lossy compression of a reference image and waveform
//!
//! Three one-shot pipelines behind one binary:
//!
//! - **Image**: re-encode a reference image as JPEG at several quality
//!   levels, measure PSNR/SSIM per variant, render crop-comparison figures
//!   and a quality-vs-PSNR curve.
//! - **Audio**: re-encode a reference waveform as MP3 at several bitrates,
//!   decode each variant back, and render the spectrogram of a fixed time
//!   window for every variant and the original.
//! - **MOS**: render the bitrate-vs-MOS chart from the hand-entered
//!   listening test table.
//!
//! ## Module Structure
//!
//! - `core` - sweep pipelines, codecs, metrics, DSP and figure rendering
//! - `cli` - console and JSON report formatting
//! - `config` - sweep parameters (the defaults reproduce the report figures)

// Sweep pipelines and supporting algorithms
pub mod core;

// Report formatting
pub mod cli;

// Sweep configuration
pub mod config;

// Re-export commonly used types at crate root for convenience
pub use config::{AudioSweepConfig, ImageSweepConfig, BITRATE_MOS};
pub use core::{
    run_audio_sweep, run_image_sweep, AudioSweepReport, BitrateRecord, ImageMetrics,
    ImageSweepReport, QualityRecord,
};
