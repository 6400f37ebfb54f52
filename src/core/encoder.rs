// src/core/encoder.rs
//
// MP3 variant generation via FFmpeg. Sample rate and channel count are pinned
// on the command line instead of inherited from LAME's defaults, which switch
// to lower rates (and may force mono) below 32 kbps. MP3 cannot carry less
// than 32 kbps at the MPEG-1 rates (32/44.1/48 kHz) at all, so those bitrates
// are pinned to the half rate and the decoded variant is resampled back to
// the reference grid before windowing.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound(#[source] which::Error),

    #[error("Failed to execute FFmpeg")]
    Spawn(#[source] std::io::Error),

    #[error("FFmpeg exited with {status}: {stderr}")]
    Ffmpeg {
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("Path is not valid UTF-8: {0}")]
    InvalidPath(PathBuf),
}

/// The sample rate an MP3 variant is encoded at: the source rate whenever the
/// bitrate is representable there, otherwise the MPEG-2 half rate (which
/// carries 8-160 kbps).
pub fn pinned_sample_rate(source_rate: u32, bitrate_kbps: u32) -> u32 {
    let mpeg1_rate = matches!(source_rate, 32000 | 44100 | 48000);
    if mpeg1_rate && bitrate_kbps < 32 {
        source_rate / 2
    } else {
        source_rate
    }
}

/// MP3 encode / resample steps, both shelling out to FFmpeg.
pub struct Mp3Encoder {
    ffmpeg_path: PathBuf,
}

impl Mp3Encoder {
    /// Locate FFmpeg in PATH.
    pub fn new() -> Result<Self, EncodeError> {
        let ffmpeg_path = which::which("ffmpeg").map_err(EncodeError::FfmpegNotFound)?;
        Ok(Self { ffmpeg_path })
    }

    /// True when FFmpeg is available, used by tests to skip cleanly.
    pub fn available() -> bool {
        which::which("ffmpeg").is_ok()
    }

    /// Encode `input` to MP3 at `bitrate_kbps` with pinned sample rate and
    /// channel count. Overwrites `output` if it exists.
    pub fn encode(
        &self,
        input: &Path,
        output: &Path,
        bitrate_kbps: u32,
        sample_rate: u32,
        channels: usize,
    ) -> Result<(), EncodeError> {
        let bitrate = format!("{}k", bitrate_kbps);
        let rate = sample_rate.to_string();
        let ch = channels.to_string();

        self.run(&[
            "-i", path_str(input)?,
            "-codec:a", "libmp3lame",
            "-b:a", &bitrate,
            "-ar", &rate,
            "-ac", &ch,
            "-y",
            path_str(output)?,
        ])
    }

    /// Resample `input` to a PCM WAV at `sample_rate`. Used to bring a
    /// half-rate variant back onto the reference sample grid.
    pub fn resample_to_wav(
        &self,
        input: &Path,
        output: &Path,
        sample_rate: u32,
    ) -> Result<(), EncodeError> {
        let rate = sample_rate.to_string();

        self.run(&[
            "-i", path_str(input)?,
            "-ar", &rate,
            "-y",
            path_str(output)?,
        ])
    }

    fn run(&self, args: &[&str]) -> Result<(), EncodeError> {
        let result = Command::new(&self.ffmpeg_path)
            .args(args)
            .output()
            .map_err(EncodeError::Spawn)?;

        if !result.status.success() {
            return Err(EncodeError::Ffmpeg {
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
            });
        }

        Ok(())
    }
}

fn path_str(path: &Path) -> Result<&str, EncodeError> {
    path.to_str()
        .ok_or_else(|| EncodeError::InvalidPath(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinned_sample_rate() {
        assert_eq!(pinned_sample_rate(44100, 128), 44100);
        assert_eq!(pinned_sample_rate(44100, 32), 44100);
        assert_eq!(pinned_sample_rate(44100, 16), 22050);
        assert_eq!(pinned_sample_rate(48000, 16), 24000);
        // Already an MPEG-2 rate, 16 kbps is fine there.
        assert_eq!(pinned_sample_rate(22050, 16), 22050);
    }

    fn write_sine_wav(path: &Path, sample_rate: u32, secs: f32) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        let total = (sample_rate as f32 * secs) as u32;
        for i in 0..total {
            let t = i as f32 / sample_rate as f32;
            let v =
                (0.4 * (2.0 * std::f32::consts::PI * 1000.0 * t).sin() * i16::MAX as f32) as i16;
            writer.write_sample(v).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_encode_roundtrip() {
        if !Mp3Encoder::available() {
            eprintln!("ffmpeg not found, skipping encoder test");
            return;
        }

        let dir = std::env::temp_dir().join(format!("codecsweep-enc-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let wav = dir.join("tone.wav");
        let mp3 = dir.join("tone_64kbps.mp3");

        write_sine_wav(&wav, 44100, 1.0);

        let encoder = Mp3Encoder::new().unwrap();
        encoder.encode(&wav, &mp3, 64, 44100, 1).unwrap();

        assert!(mp3.exists());
        assert!(std::fs::metadata(&mp3).unwrap().len() > 0);

        let decoded = crate::core::decoder::decode_audio(&mp3).unwrap();
        assert_eq!(decoded.sample_rate, 44100);
        // MP3 pads to whole frames; the decoded stream must still cover the
        // original duration.
        assert!(decoded.frames() >= 44100);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_resample_back_to_reference_rate() {
        if !Mp3Encoder::available() {
            eprintln!("ffmpeg not found, skipping resample test");
            return;
        }

        let dir = std::env::temp_dir().join(format!("codecsweep-enc-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let wav = dir.join("tone.wav");
        let mp3 = dir.join("tone_16kbps.mp3");
        let back = dir.join("tone_16kbps_44100Hz.wav");

        write_sine_wav(&wav, 44100, 1.0);

        let encoder = Mp3Encoder::new().unwrap();
        let enc_rate = pinned_sample_rate(44100, 16);
        encoder.encode(&wav, &mp3, 16, enc_rate, 1).unwrap();

        let half = crate::core::decoder::decode_audio(&mp3).unwrap();
        assert_eq!(half.sample_rate, 22050);

        encoder.resample_to_wav(&mp3, &back, 44100).unwrap();
        let full = crate::core::decoder::decode_audio(&back).unwrap();
        assert_eq!(full.sample_rate, 44100);
        assert!(full.frames() >= 44100);

        std::fs::remove_dir_all(&dir).ok();
    }
}
