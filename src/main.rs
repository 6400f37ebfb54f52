// src/main.rs
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colorful::Colorful;
use std::path::PathBuf;

use codecsweep::cli::output;
use codecsweep::config::{AudioSweepConfig, ImageSweepConfig, BITRATE_MOS};
use codecsweep::core::crop::{CropBox, TimeWindow};
use codecsweep::core::visualization::render_mos_curve;
use codecsweep::core::{run_audio_sweep, run_image_sweep};

#[derive(Parser, Debug)]
#[command(name = "codecsweep")]
#[command(about = "Evaluate lossy compression: JPEG quality and MP3 bitrate sweeps")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// JPEG quality sweep with PSNR/SSIM metrics and comparison figures
    Image {
        /// Reference image
        #[arg(short, long, default_value = "kodim20.png")]
        input: PathBuf,

        /// Output directory for variants and figures
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// JPEG quality levels
        #[arg(short, long, value_delimiter = ',', default_value = "95,75,50,30,10")]
        qualities: Vec<u8>,

        /// Comparison crop as left,top,right,bottom
        #[arg(long, value_delimiter = ',', default_value = "200,150,350,300")]
        crop: Vec<u32>,

        /// Emit the report as JSON instead of the table
        #[arg(long)]
        json: bool,
    },

    /// MP3 bitrate sweep with per-variant spectrograms
    Audio {
        /// Reference audio file
        #[arg(short, long, default_value = "original.wav")]
        input: PathBuf,

        /// Output directory for variants and spectrograms
        #[arg(short, long, default_value = "mp3_spectrograms")]
        output: PathBuf,

        /// Target bitrates in kbps
        #[arg(short, long, value_delimiter = ',', default_value = "128,64,32,16")]
        bitrates: Vec<u32>,

        /// Spectrogram window start, seconds
        #[arg(long, default_value_t = 20.0)]
        window_start: f64,

        /// Spectrogram window end, seconds
        #[arg(long, default_value_t = 20.1)]
        window_end: f64,
    },

    /// Render the bitrate-vs-MOS chart from the listening test table
    Mos {
        /// Output chart path
        #[arg(short, long, default_value = "mp3_mos_curve.png")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default()
            .default_filter_or(if args.verbose { "debug" } else { "warn" }),
    )
    .init();

    match args.command {
        Command::Image {
            input,
            output,
            qualities,
            crop,
            json,
        } => {
            if crop.len() != 4 {
                bail!("--crop expects exactly 4 values: left,top,right,bottom");
            }
            if qualities.is_empty() {
                bail!("At least one quality level is required");
            }

            let config = ImageSweepConfig {
                input,
                output_dir: output,
                crop: CropBox::new(crop[0], crop[1], crop[2], crop[3]),
                qualities,
            };
            let report = run_image_sweep(&config)?;

            if json {
                println!("{}", output::image_report_json(&report)?);
            } else {
                print!("{}", output::format_image_report(&report));
            }

            if report.outcomes.iter().any(|o| o.result.is_err()) {
                std::process::exit(1);
            }
        }

        Command::Audio {
            input,
            output,
            bitrates,
            window_start,
            window_end,
        } => {
            if bitrates.is_empty() {
                bail!("At least one bitrate is required");
            }
            if window_end <= window_start {
                bail!("Window end must be after window start");
            }

            let config = AudioSweepConfig {
                input,
                output_dir: output,
                window: TimeWindow::new(window_start, window_end),
                bitrates_kbps: bitrates,
            };
            let report = run_audio_sweep(&config)?;
            print!("{}", output::format_audio_report(&report));

            if report.outcomes.iter().any(|o| o.result.is_err()) {
                std::process::exit(1);
            }
        }

        Command::Mos { output } => {
            render_mos_curve(&BITRATE_MOS, &output)?;
            println!("{} {}", "Wrote".green(), output.display());
        }
    }

    Ok(())
}
