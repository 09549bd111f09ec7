use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context};
use clap::Parser;
use rayon::prelude::*;

use heyn_grain_size_lib::config::{Config, CropConfig};
use heyn_grain_size_lib::errors::GrainSizeError;
use heyn_grain_size_lib::image_io::{get_image_files_in_dir, load_image, output_names};
use heyn_grain_size_lib::output::{append_summary_csv, ResultLog};
use heyn_grain_size_lib::pipeline::{process_image, ProcessedImage};

/// Command-line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about = "Heyn line-intercept grain size measurement")]
struct Args {
    /// Path to input image or directory
    #[clap(short, long)]
    input: Option<String>,

    /// Path to output directory
    #[clap(short, long)]
    output: Option<String>,

    /// Path to configuration file
    #[clap(short, long, default_value = "config.toml")]
    config: String,

    /// Cut random WIDTH x HEIGHT sub-images and measure those instead
    #[clap(long, num_args = 2, value_names = ["WIDTH", "HEIGHT"])]
    crop: Option<Vec<u32>>,

    /// Number of random sub-images per input (with --crop)
    #[clap(short = 'n', long, default_value_t = 1)]
    crop_count: usize,

    /// Number of test lines per image (overwrites config)
    #[clap(short, long)]
    lines: Option<usize>,

    /// Seed for reproducible lines and crops (overwrites config)
    #[clap(short, long)]
    seed: Option<u64>,

    /// Do not write annotated images
    #[clap(long)]
    no_annotate: bool,

    /// Also write the full measurement as JSON
    #[clap(long)]
    json: bool,

    /// Enable debug logging
    #[clap(short, long)]
    debug: bool,
}

/// Overwrite config values with the ones given on the command line
fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(input) = args.input.clone() {
        config.input_path = input;
    }
    if let Some(output) = args.output.clone() {
        config.output_base_dir = output;
    }
    if let Some(crop) = &args.crop {
        config.crop = Some(CropConfig {
            width: crop[0],
            height: crop[1],
            count: args.crop_count,
        });
    }
    if let Some(lines) = args.lines {
        config.analysis.num_lines = lines;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.no_annotate {
        config.annotate = false;
    }
    if args.json {
        config.write_json = true;
    }
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = if PathBuf::from(&args.config).is_file() {
        Config::from_file(&args.config)?
    } else {
        log::warn!("Config file {} not found, using defaults", args.config);
        Config::default()
    };

    apply_overrides(&mut config, args);
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let config = load_config(&args)?;
    let start_time = Instant::now();

    let result_log = ResultLog::create(&config.output_base_dir)?;

    let input_path = PathBuf::from(&config.input_path);
    let (files, root) = if input_path.is_file() {
        let root = input_path.parent().map(PathBuf::from).unwrap_or_default();
        (vec![input_path.clone()], root)
    } else if input_path.is_dir() {
        (get_image_files_in_dir(&input_path, &config.image_extensions)?, input_path.clone())
    } else {
        return Err(GrainSizeError::InvalidPath(input_path).into());
    };
    let names = output_names(&root, &files)?;

    let mut header = vec![
        "-- INPUT DATA --".to_string(),
        format!("input      : {}", input_path.display()),
        format!("images     : {}", files.len()),
        format!("lines/image: {}", config.analysis.num_lines),
        format!("cutoff     : {}", config.analysis.cutoff),
        format!("L const    : {}", config.analysis.l_const),
    ];
    if let Some(crop) = &config.crop {
        header.push(format!("crop       : {} x {} ({} per image)", crop.width, crop.height, crop.count));
    }
    result_log.write_block(&header)?;

    let run = |(index, (path, name)): (usize, (&PathBuf, &String))| -> (PathBuf, heyn_grain_size_lib::Result<ProcessedImage>) {
        let result = load_image(path).and_then(|mut input| {
            input.filename = name.clone();
            process_image(input, index, &config, &result_log)
        });
        (path.clone(), result)
    };

    let outcomes: Vec<_> = if config.use_parallel {
        files.par_iter().zip(names.par_iter()).enumerate().map(run).collect()
    } else {
        files.iter().zip(names.iter()).enumerate().map(run).collect()
    };

    let mut failures = 0;
    for (path, outcome) in outcomes {
        match outcome {
            Ok(processed) => {
                for named in processed.measured {
                    append_summary_csv(&config.output_base_dir, &named.name, &named.measurement)?;
                }
                failures += processed.failed.len();
            }
            Err(e) => {
                log::error!("Failed to measure {}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    log::info!(
        "Processing completed in {:.2} seconds, results in {}",
        start_time.elapsed().as_secs_f64(),
        result_log.path().display()
    );

    if failures > 0 {
        bail!("{} images or crops could not be measured", failures);
    }

    Ok(())
}
