// tests/sweep_integration.rs
//
// End-to-end sweeps over synthetic inputs. The audio scenario needs FFmpeg
// and skips cleanly when it is not installed.

use std::path::{Path, PathBuf};

use codecsweep::config::{AudioSweepConfig, ImageSweepConfig, BITRATE_MOS};
use codecsweep::core::crop::{CropBox, TimeWindow};
use codecsweep::core::encoder::Mp3Encoder;
use codecsweep::core::visualization::render_mos_curve;
use codecsweep::core::{run_audio_sweep, run_image_sweep};
use image::{Rgb, RgbImage};

fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("codecsweep-{}-{}", tag, uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Deterministic textured image so JPEG has detail to discard.
fn textured_image(w: u32, h: u32) -> RgbImage {
    let mut state = 0x9E3779B97F4A7C15u64;
    let mut noise = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 56) as u8
    };
    RgbImage::from_fn(w, h, |x, y| {
        Rgb([
            ((x * 2 + y * 3) % 256) as u8 ^ (noise() & 0x7f),
            ((x + y) % 256) as u8 ^ (noise() & 0x3f),
            ((x / 2 + y / 3) % 256) as u8,
        ])
    })
}

fn write_mono_chirp(path: &Path, sample_rate: u32, secs: f32) {
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
        let freq = 300.0 + 8000.0 * t / secs;
        let v = (0.4 * (2.0 * std::f32::consts::PI * freq * t).sin() * i16::MAX as f32) as i16;
        writer.write_sample(v).unwrap();
    }
    writer.finalize().unwrap();
}

#[test]
fn image_sweep_512x512_two_qualities() {
    let dir = temp_dir("it-img");
    let input = dir.join("reference.png");
    textured_image(512, 512).save(&input).unwrap();

    let config = ImageSweepConfig {
        input,
        output_dir: dir.clone(),
        crop: CropBox::new(200, 150, 350, 300),
        qualities: vec![95, 10],
    };

    let report = run_image_sweep(&config).unwrap();

    // Exactly 2 encoded files, 2 comparison figures, 1 curve.
    let records: Vec<_> = report.records().collect();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.encoded_path.exists()));
    assert!(records.iter().all(|r| r.figure_path.exists()));
    assert!(report.curve_path.as_ref().unwrap().exists());
    assert!(report.crop_reference_path.exists());

    let q95 = records.iter().find(|r| r.quality == 95).unwrap();
    let q10 = records.iter().find(|r| r.quality == 10).unwrap();
    assert!(
        q10.file_size_kb < q95.file_size_kb,
        "q=10 must be strictly smaller than q=95"
    );
    assert!(q10.metrics.psnr_db <= q95.metrics.psnr_db);
    for r in &records {
        assert!((-1.0..=1.0).contains(&r.metrics.ssim));
    }
    assert!(q95.metrics.ssim > 0.5, "high quality should be close to 1");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn image_sweep_handles_crop_past_image_edge() {
    // A crop box hanging off the image edge is clamped, not fatal.
    let dir = temp_dir("it-img2");
    let input = dir.join("reference.png");
    textured_image(64, 64).save(&input).unwrap();

    let config = ImageSweepConfig {
        input,
        output_dir: dir.clone(),
        crop: CropBox::new(48, 48, 96, 96),
        qualities: vec![75, 50],
    };

    let report = run_image_sweep(&config).unwrap();
    assert_eq!(report.outcomes.len(), 2);
    assert!(report.outcomes.iter().all(|o| o.result.is_ok()));

    let crop_ref = image::open(&report.crop_reference_path).unwrap();
    assert_eq!(crop_ref.width(), 16);
    assert_eq!(crop_ref.height(), 16);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn audio_sweep_window_lengths_match_across_variants() {
    if !Mp3Encoder::available() {
        eprintln!("ffmpeg not found, skipping audio integration test");
        return;
    }

    let dir = temp_dir("it-aud");
    let input = dir.join("original.wav");
    write_mono_chirp(&input, 44100, 1.0);

    let config = AudioSweepConfig {
        input,
        output_dir: dir.join("mp3_spectrograms"),
        window: TimeWindow::new(0.5, 0.6),
        bitrates_kbps: vec![128, 16],
    };

    let report = run_audio_sweep(&config).unwrap();

    let expected = (44100.0f64 * 0.1) as usize;
    assert!((report.window_len as i64 - expected as i64).abs() <= 1);

    let records: Vec<_> = report.records().collect();
    assert_eq!(records.len(), 2);
    for r in &records {
        assert!(r.mp3_path.exists());
        assert!(r.spectrogram_path.exists());
        assert!(
            (r.window_len as i64 - report.window_len as i64).abs() <= 1,
            "{} kbps window length {} diverges from reference {}",
            r.bitrate_kbps,
            r.window_len,
            report.window_len
        );
    }

    // One spectrogram per variant plus the original.
    assert_eq!(report.generated_files().len(), 1 + 2 * records.len());
    assert!(report.original_spectrogram_path.exists());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn mos_chart_renders_from_lookup_table() {
    let dir = temp_dir("it-mos");
    let path = dir.join("mp3_mos_curve.png");

    render_mos_curve(&BITRATE_MOS, &path).unwrap();

    let img = image::open(&path).unwrap();
    assert!(img.width() > 0 && img.height() > 0);

    std::fs::remove_dir_all(&dir).ok();
}
