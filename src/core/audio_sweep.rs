// src/core/audio_sweep.rs
//
// Pipeline B: MP3 bitrate sweep. Decodes the reference waveform, renders the
// spectrogram of the fixed time window, then re-encodes the full input at
// each bitrate, decodes the variant back, downmixes, applies the same window
// and renders its spectrogram. Variants that fail to encode or decode are
// recorded and the sweep continues.
//
// Sub-32 kbps variants are encoded at the MPEG-2 half rate (MP3 carries no
// lower bitrate at 44.1 kHz) and resampled back to the reference rate before
// windowing, so every rendered window covers the same sample indices.

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::config::AudioSweepConfig;
use crate::core::decoder::{decode_audio, AudioData};
use crate::core::dsp::power_spectrogram;
use crate::core::encoder::{pinned_sample_rate, Mp3Encoder};
use crate::core::visualization::{render_spectrogram, SpectrogramImageConfig};

/// Everything produced for one successfully processed bitrate.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BitrateRecord {
    pub bitrate_kbps: u32,
    pub mp3_path: PathBuf,
    pub spectrogram_path: PathBuf,
    pub file_size_kb: f64,
    /// Samples in the cropped window after downmixing.
    pub window_len: usize,
}

/// Per-bitrate outcome; the sweep continues past individual failures.
#[derive(Debug)]
pub struct BitrateOutcome {
    pub bitrate_kbps: u32,
    pub result: Result<BitrateRecord>,
}

#[derive(Debug)]
pub struct AudioSweepReport {
    pub input: PathBuf,
    pub sample_rate: u32,
    pub channels: usize,
    pub duration_secs: f64,
    pub original_spectrogram_path: PathBuf,
    /// Samples in the reference's cropped window.
    pub window_len: usize,
    pub outcomes: Vec<BitrateOutcome>,
}

impl AudioSweepReport {
    pub fn records(&self) -> impl Iterator<Item = &BitrateRecord> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// All files the sweep wrote, in report order.
    pub fn generated_files(&self) -> Vec<&PathBuf> {
        let mut files = vec![&self.original_spectrogram_path];
        for r in self.records() {
            files.push(&r.mp3_path);
            files.push(&r.spectrogram_path);
        }
        files
    }
}

/// Run the full bitrate sweep.
pub fn run_audio_sweep(config: &AudioSweepConfig) -> Result<AudioSweepReport> {
    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("Failed to create output directory: {}", config.output_dir.display())
    })?;

    let reference = decode_audio(&config.input)
        .with_context(|| format!("Failed to load reference audio: {}", config.input.display()))?;

    info!(
        "Loaded {} ({} Hz, {} ch, {:.2} s)",
        config.input.display(),
        reference.sample_rate,
        reference.channels,
        reference.duration_secs
    );

    let image_config = SpectrogramImageConfig::default();

    let reference_mono = reference.downmix_mono();
    let reference_window = config.window.apply(&reference_mono, reference.sample_rate);
    let window_len = reference_window.len();

    let original_spectrogram_path = config.output_dir.join("spec_original.png");
    let spec = power_spectrogram(reference_window, reference.sample_rate)
        .context("Reference window too short for spectrogram")?;
    render_spectrogram(&spec, &image_config, &original_spectrogram_path)?;

    let encoder = Mp3Encoder::new().context("MP3 encoding requires FFmpeg")?;

    let mut outcomes = Vec::with_capacity(config.bitrates_kbps.len());
    for &bitrate in &config.bitrates_kbps {
        let result = sweep_bitrate(config, &encoder, &reference, &image_config, bitrate);
        if let Err(ref e) = result {
            warn!("Bitrate {} kbps failed: {:#}", bitrate, e);
        }
        outcomes.push(BitrateOutcome {
            bitrate_kbps: bitrate,
            result,
        });
    }

    Ok(AudioSweepReport {
        input: config.input.clone(),
        sample_rate: reference.sample_rate,
        channels: reference.channels,
        duration_secs: reference.duration_secs,
        original_spectrogram_path,
        window_len,
        outcomes,
    })
}

fn sweep_bitrate(
    config: &AudioSweepConfig,
    encoder: &Mp3Encoder,
    reference: &AudioData,
    image_config: &SpectrogramImageConfig,
    bitrate_kbps: u32,
) -> Result<BitrateRecord> {
    let mp3_path = config.output_dir.join(format!("audio_{}kbps.mp3", bitrate_kbps));

    let encode_rate = pinned_sample_rate(reference.sample_rate, bitrate_kbps);
    encoder
        .encode(
            &config.input,
            &mp3_path,
            bitrate_kbps,
            encode_rate,
            reference.channels,
        )
        .with_context(|| format!("Failed to encode at {} kbps", bitrate_kbps))?;

    let file_size_kb = std::fs::metadata(&mp3_path)?.len() as f64 / 1024.0;

    let variant = decode_variant(encoder, &mp3_path, reference.sample_rate)
        .with_context(|| format!("Failed to decode {} kbps variant", bitrate_kbps))?;

    let mono = variant.downmix_mono();
    let window = config.window.apply(&mono, reference.sample_rate);

    let spectrogram_path = config.output_dir.join(format!("spec_{}.png", bitrate_kbps));
    let spec = power_spectrogram(window, reference.sample_rate)
        .with_context(|| format!("Window too short at {} kbps", bitrate_kbps))?;
    render_spectrogram(&spec, image_config, &spectrogram_path)?;

    info!(
        "{} kbps: {:.1} KB, window {} samples",
        bitrate_kbps,
        file_size_kb,
        window.len()
    );

    Ok(BitrateRecord {
        bitrate_kbps,
        mp3_path,
        spectrogram_path,
        file_size_kb,
        window_len: window.len(),
    })
}

/// Decode a variant, bringing half-rate encodes back to the reference rate
/// through an intermediate WAV so the window indices line up.
fn decode_variant(
    encoder: &Mp3Encoder,
    mp3_path: &std::path::Path,
    reference_rate: u32,
) -> Result<AudioData> {
    let decoded = decode_audio(mp3_path)?;
    if decoded.sample_rate == reference_rate {
        return Ok(decoded);
    }

    let wav_path = mp3_path.with_extension("resampled.wav");
    encoder.resample_to_wav(mp3_path, &wav_path, reference_rate)?;
    let resampled = decode_audio(&wav_path);
    std::fs::remove_file(&wav_path).ok();
    resampled
}
