//! Verdis CLI - green-cover analysis for aerial imagery

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use verdis_algorithms::greencover::{
    green_cover, mean_green, GreenCoverParams, GREEN_LUMA_WEIGHT, THRESHOLD_DIVISOR,
};
use verdis_algorithms::pathfinding::{optimal_path, overlay_path, PathParams};
use verdis_core::io::{read_image, write_png};
use verdis_core::{Rgba, RgbaRaster};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "verdis")]
#[command(author, version, about = "Green-cover analysis for aerial imagery", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about an image file
    Info {
        /// Input image file
        input: PathBuf,
    },
    /// Classify vegetation cover and write the binary mask
    Analyze {
        /// Input image file
        input: PathBuf,
        /// Output mask file (PNG)
        output: PathBuf,
        /// Divisor applied to the mean green value
        #[arg(long, default_value_t = THRESHOLD_DIVISOR)]
        divisor: f64,
        /// Weight applied to the green channel
        #[arg(long, default_value_t = GREEN_LUMA_WEIGHT)]
        luma_weight: f64,
    },
    /// Extract a least-cost route over the classified mask
    Path {
        /// Input image file
        input: PathBuf,
        /// Output overlay file (PNG)
        output: PathBuf,
        /// Route origin as "row,col"
        #[arg(long)]
        start: String,
        /// Route destination as "row,col"
        #[arg(long)]
        target: String,
        /// Divisor applied to the mean green value
        #[arg(long, default_value_t = THRESHOLD_DIVISOR)]
        divisor: f64,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_input(path: &PathBuf) -> Result<RgbaRaster> {
    let pb = spinner("Reading image...");
    let image = read_image(path).context("Failed to read image")?;
    pb.finish_and_clear();
    info!("Input: {} x {}", image.cols(), image.rows());
    Ok(image)
}

fn write_output(raster: &RgbaRaster, path: &PathBuf) -> Result<()> {
    let pb = spinner("Writing output...");
    write_png(raster, path).context("Failed to write output")?;
    pb.finish_and_clear();
    Ok(())
}

fn done(name: &str, path: &PathBuf, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

fn parse_cell(s: &str) -> Result<(usize, usize)> {
    let parts: Vec<&str> = s.trim().split(',').collect();
    if parts.len() != 2 {
        anyhow::bail!("Cell must be 'row,col', got: {}", s);
    }
    let row: usize = parts[0].trim().parse().context("Invalid row")?;
    let col: usize = parts[1].trim().parse().context("Invalid col")?;
    Ok((row, col))
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { input } => {
            let image = read_input(&input)?;
            let mean = mean_green(&image).context("Failed to analyze image")?;

            println!("File: {}", input.display());
            println!(
                "Dimensions: {} x {} ({} pixels)",
                image.cols(),
                image.rows(),
                image.len()
            );
            println!("Mean green: {:.4}", mean);
            println!(
                "Default threshold: {:.4} (mean / {})",
                mean / THRESHOLD_DIVISOR,
                THRESHOLD_DIVISOR
            );
        }

        // ── Analyze ──────────────────────────────────────────────────
        Commands::Analyze {
            input,
            output,
            divisor,
            luma_weight,
        } => {
            let image = read_input(&input)?;
            let start = Instant::now();
            let result = green_cover(
                &image,
                GreenCoverParams {
                    luma_weight,
                    threshold_divisor: divisor,
                },
            )
            .context("Failed to classify image")?;
            let elapsed = start.elapsed();

            write_output(&result.mask, &output)?;
            println!("Green cover: {:.2}%", result.vegetation_percent);
            println!("Idle land:   {:.2}%", result.idle_percent);
            info!(
                "mean green {:.4}, threshold {:.4}, {} vegetation pixels",
                result.mean_green, result.threshold, result.vegetation_pixels
            );
            done("Mask", &output, elapsed);
        }

        // ── Path ─────────────────────────────────────────────────────
        Commands::Path {
            input,
            output,
            start,
            target,
            divisor,
        } => {
            let origin = parse_cell(&start)?;
            let destination = parse_cell(&target)?;

            let image = read_input(&input)?;
            let began = Instant::now();
            let result = green_cover(
                &image,
                GreenCoverParams {
                    threshold_divisor: divisor,
                    ..Default::default()
                },
            )
            .context("Failed to classify image")?;
            let route = optimal_path(&result.mask, PathParams::new(origin, destination))
                .context("Failed to extract route")?;
            let overlay = overlay_path(&image, &route, Rgba::opaque(255, 0, 0))
                .context("Failed to render route")?;
            let elapsed = began.elapsed();

            write_output(&overlay, &output)?;
            println!("Route: {} cells", route.len());
            done("Overlay", &output, elapsed);
        }
    }

    Ok(())
}
