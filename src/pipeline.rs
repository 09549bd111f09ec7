// src/pipeline.rs - Per-image driver: crop, measure, annotate, report

use std::path::PathBuf;

use image::RgbaImage;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::annotate::annotate_measurements;
use crate::config::Config;
use crate::crop::{annotate_crop_regions, crop_random, CropRegion};
use crate::errors::{GrainSizeError, Result};
use crate::image_io::{save_image, InputImage};
use crate::measurement::{measure_image, ImageMeasurement};
use crate::output::{format_measurement_report, write_lines_csv, write_measurement_json, ResultLog};

/// Measurement of one analyzed image (a source image or one of its crops)
#[derive(Debug, Clone)]
pub struct NamedMeasurement {
    pub name: String,
    pub measurement: ImageMeasurement,
}

/// Everything measured from one input image
///
/// A crop that cannot be measured lands in `failed` without affecting the
/// other crops of the same image.
#[derive(Debug, Default)]
pub struct ProcessedImage {
    pub measured: Vec<NamedMeasurement>,
    pub failed: Vec<(String, GrainSizeError)>,
}

/// Random source for the `index`-th input image
///
/// With a configured seed every image gets its own reproducible stream.
pub fn image_rng(seed: Option<u64>, index: usize) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
        None => StdRng::from_entropy(),
    }
}

/// Crop the input if configured and return the images to measure
fn prepare_targets(
    image: RgbaImage,
    filename: &str,
    config: &Config,
    rng: &mut StdRng,
    result_log: &ResultLog,
) -> Result<Vec<(String, RgbaImage)>> {
    let crop = match config.crop {
        Some(crop) => crop,
        None => return Ok(vec![(filename.to_string(), image)]),
    };

    let output_dir = PathBuf::from(&config.output_base_dir);
    let crops = crop_random(&image, crop.width, crop.height, crop.count, rng)?;

    let mut report = vec![String::new(), format!("-- Crop {} randomly --", filename)];
    let mut regions: Vec<CropRegion> = Vec::with_capacity(crops.len());
    let mut targets = Vec::with_capacity(crops.len());

    for (region, cropped) in crops {
        let name = format!("{}_{:03}", filename, region.index);
        let crop_path = output_dir.join(format!("{}.png", name));
        save_image(&cropped, &crop_path)?;

        report.push(format!(
            "No.{:03} crop({:4}  {:4}  {:4}  {:4}) -> {}",
            region.index,
            region.left,
            region.upper,
            region.right(),
            region.lower(),
            crop_path.display()
        ));
        regions.push(region);
        targets.push((name, cropped));
    }
    result_log.write_block(&report)?;

    if config.annotate {
        let overview = annotate_crop_regions(&image, &regions, config.line_color_rgb);
        save_image(&overview, output_dir.join(format!("{}_crops.png", filename)))?;
    }

    Ok(targets)
}

/// Write the report, CSV, JSON and overlay of one measured target
fn write_outputs(
    name: &str,
    target: &RgbaImage,
    measurement: &ImageMeasurement,
    config: &Config,
    result_log: &ResultLog,
) -> Result<()> {
    let output_dir = PathBuf::from(&config.output_base_dir);

    let mut report = vec![String::new(), "-- Measure Grain Size --".to_string()];
    report.extend(format_measurement_report(name, measurement));
    result_log.write_block(&report)?;

    write_lines_csv(measurement, &output_dir, name)?;

    if config.write_json {
        write_measurement_json(measurement, &output_dir, name)?;
    }

    if config.annotate {
        let annotated = annotate_measurements(
            target,
            measurement,
            config.line_color_rgb,
            config.group_marker_color_rgb,
        );
        save_image(&annotated, output_dir.join(format!("{}_annotated.png", name)))?;
    }

    Ok(())
}

/// Process a single input image
///
/// `index` is the position of the image in the batch and selects its random
/// stream when a seed is configured. Measurement failures are collected per
/// target in the returned [`ProcessedImage`]; I/O errors abort the image.
pub fn process_image(
    input_image: InputImage,
    index: usize,
    config: &Config,
    result_log: &ResultLog,
) -> Result<ProcessedImage> {
    let InputImage { image, path, filename } = input_image;
    let (width, height) = image.dimensions();
    log::debug!("Processing {} ({}x{})", path.display(), width, height);

    let mut rng = image_rng(config.seed, index);
    let targets = prepare_targets(image, &filename, config, &mut rng, result_log)?;

    let mut processed = ProcessedImage::default();
    for (name, target) in targets {
        match measure_image(&target, &config.analysis, &mut rng) {
            Ok(measurement) => {
                write_outputs(&name, &target, &measurement, config, result_log)?;
                processed.measured.push(NamedMeasurement { name, measurement });
            }
            Err(e) => {
                log::warn!("Could not measure {}: {}", name, e);
                result_log.write_block(&[
                    String::new(),
                    "-- Measure Grain Size --".to_string(),
                    format!(" {}: not measured ({})", name, e),
                ])?;
                processed.failed.push((name, e));
            }
        }
    }

    Ok(processed)
}
