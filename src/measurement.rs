// src/measurement.rs - Heyn intercept measurement of one image

use image::{GrayImage, RgbaImage};
use rand::Rng;
use serde::Serialize;

use crate::boundary::{boundary_mask, line_boundary_hits};
use crate::clustering::{group_intercepts, InterceptGroup};
use crate::config::InterceptParams;
use crate::errors::{GrainSizeError, Result};
use crate::line_generator::{generate_line, ClippedLine};

/// Result of one test line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineMeasurement {
    pub index: usize,
    pub line: ClippedLine,
    pub group_count: usize,
    /// Grain diameter estimate in pixels
    pub diameter: f64,
    pub groups: Vec<InterceptGroup>,
}

/// All accepted lines of one image and their mean diameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageMeasurement {
    pub width: u32,
    pub height: u32,
    pub lines: Vec<LineMeasurement>,
    pub mean_diameter: f64,
    /// Lines sampled, including rejected ones
    pub attempts: usize,
}

/// Heyn diameter `l_const * length / group_count`
///
/// A line without intercepts has no defined diameter and is reported as
/// `DegenerateLine` so the caller draws another one.
pub fn calculate_diameter(length: f64, group_count: usize, l_const: f64) -> Result<f64> {
    if group_count == 0 {
        return Err(GrainSizeError::DegenerateLine(
            "line crosses no grain boundary".to_string(),
        ));
    }
    Ok(l_const * length / group_count as f64)
}

/// Arithmetic mean of the line diameters, `None` for no lines
pub fn mean_diameter(lines: &[LineMeasurement]) -> Option<f64> {
    if lines.is_empty() {
        return None;
    }
    let sum: f64 = lines.iter().map(|m| m.diameter).sum();
    Some(sum / lines.len() as f64)
}

/// Measure one clipped line against a precomputed boundary mask
pub fn measure_line(
    boundary: &GrayImage,
    line: ClippedLine,
    index: usize,
    params: &InterceptParams,
) -> Result<LineMeasurement> {
    let hits = line_boundary_hits(boundary, &line);
    let groups = group_intercepts(&hits, params.cutoff);
    let group_count = groups.len();
    let diameter = calculate_diameter(line.length, group_count, params.l_const)?;

    log::debug!(
        "Line {}: {:?} -> {:?}, {} boundary pixels in {} intercepts",
        index, line.start, line.end, hits.len(), group_count
    );

    Ok(LineMeasurement {
        index,
        line,
        group_count,
        diameter,
        groups,
    })
}

/// Measure `params.num_lines` random lines on `image` and average them
///
/// Lines that are too short, too flat to clip, or cross no boundary are
/// redrawn. At most `params.max_line_attempts` lines are sampled in total.
///
/// # Errors
/// * `EmptyImage` for an image with zero width or height
/// * `RetryLimitExceeded` when the attempt budget runs out first
/// * `Config` for invalid parameters
pub fn measure_image<R: Rng + ?Sized>(
    image: &RgbaImage,
    params: &InterceptParams,
    rng: &mut R,
) -> Result<ImageMeasurement> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(GrainSizeError::EmptyImage { width, height });
    }
    params.validate()?;

    let boundary = boundary_mask(image, params.boundary_color_rgb, params.boundary_match);

    let mut lines = Vec::with_capacity(params.num_lines);
    let mut attempts = 0;

    while lines.len() < params.num_lines {
        if attempts >= params.max_line_attempts {
            log::warn!(
                "Stopping after {} line attempts: {} of {} lines crossed a boundary",
                attempts, lines.len(), params.num_lines
            );
            return Err(GrainSizeError::RetryLimitExceeded {
                attempts,
                accepted: lines.len(),
                requested: params.num_lines,
            });
        }
        attempts += 1;

        let measured = generate_line(width, height, params.slope_epsilon, rng)
            .and_then(|line| measure_line(&boundary, line, lines.len(), params));

        match measured {
            Ok(measurement) => {
                log::debug!("Accepted line {}: D = {:.3} px", measurement.index, measurement.diameter);
                lines.push(measurement);
            }
            Err(e) if e.is_recoverable() => {
                log::debug!("Redrawing line {}: {}", lines.len(), e);
            }
            Err(e) => return Err(e),
        }
    }

    let mean_diameter = mean_diameter(&lines)
        .ok_or_else(|| GrainSizeError::Config("num_lines must be > 0".to_string()))?;

    Ok(ImageMeasurement {
        width,
        height,
        lines,
        mean_diameter,
        attempts,
    })
}
