use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context};
use clap::Parser;
use log::{error, info};
use rayon::prelude::*;

use color_by_number_lib::config::Config;
use color_by_number_lib::image_io::{get_image_files_in_dir, load_bitmap, load_image};
use color_by_number_lib::pipeline::process_image;

/// Command-line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about = "Color-by-number region labeling")]
struct Args {
    /// Path to input file or directory
    #[clap(short, long)]
    input: Option<String>,

    /// Path to output directory
    #[clap(short, long)]
    output: Option<String>,

    /// Path to configuration file (defaults are used when it does not exist)
    #[clap(short, long, default_value = "config.toml")]
    config: String,

    /// Precomputed contour bitmap (single input file only; overwrites config)
    #[clap(short, long)]
    bitmap: Option<String>,

    /// Enable debug mode (save intermediate images and log more info)
    #[clap(short, long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    // Load configuration
    let mut config = if PathBuf::from(&args.config).exists() {
        Config::from_file(&args.config)
            .with_context(|| format!("loading configuration from {}", args.config))?
    } else {
        info!("No configuration at {}, using defaults", args.config);
        Config::default()
    };

    // Override config with command-line arguments
    if let Some(input) = args.input.clone() {
        config.input_path = input;
    }
    if let Some(output) = args.output.clone() {
        config.output_base_dir = output;
    }
    if let Some(bitmap) = args.bitmap.clone() {
        config.contour_bitmap_path = Some(bitmap);
    }

    config.validate()?;
    config.prepare_paths(args.debug)?;

    let start_time = Instant::now();
    let input_path = PathBuf::from(&config.input_path);

    if input_path.is_file() {
        info!("Processing single file: {}", input_path.display());
        let input_image = load_image(&input_path)?;
        let bitmap = match &config.contour_bitmap_path {
            Some(path) => Some(
                load_bitmap(path).with_context(|| format!("loading contour bitmap {}", path))?,
            ),
            None => None,
        };
        let summary = process_image(input_image, bitmap, &config, args.debug)?;
        info!(
            "{}: {} regions, {} colors",
            summary.filename, summary.region_count, summary.color_count
        );
    } else if input_path.is_dir() {
        if config.contour_bitmap_path.is_some() {
            bail!("a contour bitmap can only be supplied for a single input file");
        }

        info!("Processing directory: {}", input_path.display());
        let image_files = get_image_files_in_dir(&input_path)?;
        info!("Found {} image files", image_files.len());

        let run = |path: &PathBuf| {
            info!("Processing: {}", path.display());
            let result = load_image(path).and_then(|image| process_image(image, None, &config, args.debug));
            match &result {
                Ok(summary) => info!(
                    "{}: {} regions, {} colors",
                    summary.filename, summary.region_count, summary.color_count
                ),
                Err(e) => error!("Error processing {}: {}", path.display(), e),
            }
            result
        };

        let failures = if config.use_parallel {
            image_files.par_iter().map(run).filter(|r| r.is_err()).count()
        } else {
            image_files.iter().map(run).filter(|r| r.is_err()).count()
        };

        if failures > 0 {
            bail!("{} of {} images failed", failures, image_files.len());
        }
    } else {
        bail!("input path {} does not exist", input_path.display());
    }

    info!("Processing completed in {:.2} seconds", start_time.elapsed().as_secs_f64());

    Ok(())
}
