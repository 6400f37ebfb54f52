//! Output formatting for sweep results

use chrono::{DateTime, Utc};
use colorful::Colorful;
use serde::Serialize;
use std::path::Path;

use crate::core::audio_sweep::AudioSweepReport;
use crate::core::image_sweep::{ImageSweepReport, QualityRecord};

/// Format the image sweep as the console table.
pub fn format_image_report(report: &ImageSweepReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Loaded image: {}\nResolution: {}x{}\nOriginal size: {:.1} KB\n\n",
        report.input.display(),
        report.width,
        report.height,
        report.original_size_kb
    ));

    output.push_str(&format!("{}\n", "JPEG Compression Results:".bold()));
    output.push_str("Quality | File Size (KB) | Ratio | PSNR | SSIM\n");

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(r) => output.push_str(&format!(
                "{:>7} | {:>14.1} | {:>4.2}:1 | {} | {:.3}\n",
                r.quality,
                r.file_size_kb,
                r.ratio,
                format_psnr(r.metrics.psnr_db),
                r.metrics.ssim
            )),
            Err(e) => output.push_str(&format!(
                "{:>7} | {}\n",
                outcome.quality,
                format!("failed: {:#}", e).red()
            )),
        }
    }

    if !report.size_inversions.is_empty() {
        output.push('\n');
        for (lo, hi) in &report.size_inversions {
            output.push_str(&format!(
                "{}\n",
                format!("warning: q={} produced a larger file than q={}", lo, hi).yellow()
            ));
        }
    }

    output.push_str("\nGenerated files:\n");
    output.push_str(&format!("- {}\n", report.crop_reference_path.display()));
    for r in report.records() {
        output.push_str(&format!("- {}\n", r.figure_path.display()));
    }
    if let Some(curve) = &report.curve_path {
        output.push_str(&format!("- {}\n", curve.display()));
    }

    output
}

fn format_psnr(psnr_db: f64) -> String {
    if psnr_db.is_finite() {
        format!("{:>5.2} dB", psnr_db)
    } else {
        "  inf dB".to_string()
    }
}

/// Format the audio sweep as the console listing of generated files.
pub fn format_audio_report(report: &AudioSweepReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Loaded audio: {} ({} Hz, {} ch, {:.2} s)\n",
        report.input.display(),
        report.sample_rate,
        report.channels,
        report.duration_secs
    ));
    output.push_str(&format!("Window: {} samples\n\n", report.window_len));

    output.push_str(&format!("{}\n", "Generated files:".bold()));
    for file in report.generated_files() {
        output.push_str(&format!("- {}\n", file.display()));
    }

    let failures: Vec<_> = report
        .outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().err().map(|e| (o.bitrate_kbps, e)))
        .collect();
    if !failures.is_empty() {
        output.push_str(&format!("\n{}\n", "Failed:".red()));
        for (bitrate, e) in failures {
            output.push_str(&format!("- {} kbps: {:#}\n", bitrate, e));
        }
    }

    output
}

#[derive(Serialize)]
struct ImageReportJson<'a> {
    generated_at: DateTime<Utc>,
    input: &'a Path,
    width: u32,
    height: u32,
    original_size_kb: f64,
    results: Vec<QualityOutcomeJson<'a>>,
    size_inversions: &'a [(u8, u8)],
}

#[derive(Serialize)]
struct QualityOutcomeJson<'a> {
    quality: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    record: Option<&'a QualityRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Serialize the image sweep report as pretty JSON.
pub fn image_report_json(report: &ImageSweepReport) -> serde_json::Result<String> {
    let results = report
        .outcomes
        .iter()
        .map(|o| match &o.result {
            Ok(r) => QualityOutcomeJson {
                quality: o.quality,
                record: Some(r),
                error: None,
            },
            Err(e) => QualityOutcomeJson {
                quality: o.quality,
                record: None,
                error: Some(format!("{:#}", e)),
            },
        })
        .collect();

    serde_json::to_string_pretty(&ImageReportJson {
        generated_at: Utc::now(),
        input: &report.input,
        width: report.width,
        height: report.height,
        original_size_kb: report.original_size_kb,
        results,
        size_inversions: &report.size_inversions,
    })
}
