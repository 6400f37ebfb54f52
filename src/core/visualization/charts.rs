// src/core/visualization/charts.rs
//
// Line charts: JPEG quality vs PSNR, and MP3 bitrate vs MOS.

use anyhow::{bail, Result};
use plotters::prelude::*;
use std::path::Path;

const CHART_SIZE: (u32, u32) = (700, 500);

/// Render the quality-vs-PSNR curve. Non-finite PSNR values (identical
/// reconstruction) are skipped rather than plotted.
pub fn render_psnr_curve(points: &[(u8, f64)], output_path: &Path) -> Result<()> {
    let finite: Vec<(f64, f64)> = points
        .iter()
        .filter(|(_, psnr)| psnr.is_finite())
        .map(|&(q, psnr)| (q as f64, psnr))
        .collect();
    if finite.is_empty() {
        bail!("No finite PSNR values to plot");
    }

    let x_min = finite.iter().map(|p| p.0).fold(f64::MAX, f64::min);
    let x_max = finite.iter().map(|p| p.0).fold(f64::MIN, f64::max);
    let y_min = finite.iter().map(|p| p.1).fold(f64::MAX, f64::min);
    let y_max = finite.iter().map(|p| p.1).fold(f64::MIN, f64::max);
    let y_pad = ((y_max - y_min) * 0.1).max(1.0);

    let root = BitMapBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("JPEG Quality vs PSNR", ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(46)
        .y_label_area_size(68)
        .build_cartesian_2d((x_min - 2.0)..(x_max + 2.0), (y_min - y_pad)..(y_max + y_pad))?;

    chart
        .configure_mesh()
        .x_desc("JPEG Quality")
        .y_desc("PSNR (dB)")
        .draw()?;

    let mut line = finite.clone();
    line.sort_by(|a, b| a.0.total_cmp(&b.0));

    chart.draw_series(LineSeries::new(line.clone(), BLUE.stroke_width(2)))?;
    chart.draw_series(
        line.iter()
            .map(|&(x, y)| Circle::new((x, y), 4, BLUE.filled())),
    )?;

    root.present()?;
    Ok(())
}

/// Render the bitrate-vs-MOS curve from the hand-entered listening results.
/// The 1.5..4.5 MOS axis matches the reference figure.
pub fn render_mos_curve(points: &[(u32, f64)], output_path: &Path) -> Result<()> {
    if points.is_empty() {
        bail!("No MOS values to plot");
    }

    let mut line: Vec<(f64, f64)> = points.iter().map(|&(br, mos)| (br as f64, mos)).collect();
    line.sort_by(|a, b| a.0.total_cmp(&b.0));

    let x_min = line.first().map(|p| p.0).unwrap_or(0.0);
    let x_max = line.last().map(|p| p.0).unwrap_or(1.0);

    let root = BitMapBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("MP3 Bitrate vs MOS", ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(46)
        .y_label_area_size(68)
        .build_cartesian_2d((x_min - 4.0)..(x_max + 4.0), 1.5f64..4.5f64)?;

    chart
        .configure_mesh()
        .x_desc("Bitrate (kbps)")
        .y_desc("Mean Opinion Score (MOS)")
        .draw()?;

    chart.draw_series(LineSeries::new(line.clone(), BLUE.stroke_width(2)))?;
    chart.draw_series(
        line.iter()
            .map(|&(x, y)| Circle::new((x, y), 4, BLUE.filled())),
    )?;

    root.present()?;
    Ok(())
}
