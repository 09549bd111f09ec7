// src/line_generator.rs - Random test lines clipped to the image rectangle

use rand::Rng;
use serde::Serialize;
use std::f64::consts::FRAC_PI_2;

use crate::errors::{GrainSizeError, Result};
use crate::path_algorithms::calculate_straight_path_length;

/// A straight line `y = slope * x + intercept` clipped to the image border
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClippedLine {
    pub slope: f64,
    pub intercept: f64,
    /// Endpoint on the left, top or bottom edge
    pub start: (u32, u32),
    /// Endpoint on the right, top or bottom edge
    pub end: (u32, u32),
    pub length: f64,
}

/// Which image edge a clipped endpoint lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Top,
    Side,
    Bottom,
}

fn classify(y_at_edge: f64, height: f64) -> Edge {
    if y_at_edge < 0.0 {
        Edge::Top
    } else if y_at_edge <= height {
        Edge::Side
    } else {
        Edge::Bottom
    }
}

/// x where the line crosses the horizontal `y = target_y`
fn crossing_x(target_y: f64, slope: f64, intercept: f64, slope_epsilon: f64) -> Result<f64> {
    if slope.abs() < slope_epsilon {
        return Err(GrainSizeError::NearZeroSlope(slope));
    }
    Ok((target_y - intercept) / slope)
}

/// Truncate a clipped coordinate to a pixel index within `[0, limit]`
#[inline]
fn to_pixel(value: f64, limit: f64) -> u32 {
    value.clamp(0.0, limit) as u32
}

/// Clip the line through `anchor` with slope `slope` to a `width` x `height` image
///
/// The start point is where the line leaves the image on the `x = 0` side,
/// the end point where it leaves on the `x = width` side. Either may land on
/// the top (`y = 0`) or bottom (`y = height`) edge instead. Endpoints are
/// truncated to integer pixel coordinates before the length check, so the
/// accepted length is the length of the segment that gets rasterized.
///
/// # Errors
/// * `EmptyImage` when either dimension is zero
/// * `NearZeroSlope` when a top/bottom crossing would divide by a vanishing slope
/// * `DegenerateLine` when the clipped length squared does not exceed both
///   `width²` and `height²`
pub fn clip_line(
    width: u32,
    height: u32,
    slope: f64,
    anchor: (u32, u32),
    slope_epsilon: f64,
) -> Result<ClippedLine> {
    if width == 0 || height == 0 {
        return Err(GrainSizeError::EmptyImage { width, height });
    }
    if !slope.is_finite() {
        return Err(GrainSizeError::DegenerateLine(format!("non-finite slope {}", slope)));
    }

    let w = width as f64;
    let h = height as f64;
    let intercept = anchor.1 as f64 - slope * anchor.0 as f64;

    let start = match classify(intercept, h) {
        Edge::Top => (crossing_x(0.0, slope, intercept, slope_epsilon)?, 0.0),
        Edge::Side => (0.0, intercept),
        Edge::Bottom => (crossing_x(h, slope, intercept, slope_epsilon)?, h),
    };

    let y_at_width = slope * w + intercept;
    let end = match classify(y_at_width, h) {
        Edge::Top => (crossing_x(0.0, slope, intercept, slope_epsilon)?, 0.0),
        Edge::Side => (w, y_at_width),
        Edge::Bottom => (crossing_x(h, slope, intercept, slope_epsilon)?, h),
    };

    let start = (to_pixel(start.0, w), to_pixel(start.1, h));
    let end = (to_pixel(end.0, w), to_pixel(end.1, h));

    let length = calculate_straight_path_length(start, end);
    let length_sq = length * length;
    if length_sq <= w * w || length_sq <= h * h {
        return Err(GrainSizeError::DegenerateLine(format!(
            "clipped segment {:?} -> {:?} is too short ({:.2} px)",
            start, end, length
        )));
    }

    Ok(ClippedLine {
        slope,
        intercept,
        start,
        end,
        length,
    })
}

/// Sample one random line and clip it to the image
///
/// The slope is `tan(u)` with `u` uniform in `(-pi/2, pi/2)`, the anchor is a
/// uniformly chosen pixel. Rejections are reported as errors; see
/// [`generate_valid_line`] for the resampling loop.
pub fn generate_line<R: Rng + ?Sized>(
    width: u32,
    height: u32,
    slope_epsilon: f64,
    rng: &mut R,
) -> Result<ClippedLine> {
    if width == 0 || height == 0 {
        return Err(GrainSizeError::EmptyImage { width, height });
    }

    let slope = rng.gen_range(-FRAC_PI_2..FRAC_PI_2).tan();
    let anchor = (rng.gen_range(0..width), rng.gen_range(0..height));

    clip_line(width, height, slope, anchor, slope_epsilon)
}

/// Sample lines until one is accepted, giving up after `max_attempts`
pub fn generate_valid_line<R: Rng + ?Sized>(
    width: u32,
    height: u32,
    slope_epsilon: f64,
    max_attempts: usize,
    rng: &mut R,
) -> Result<ClippedLine> {
    for attempt in 1..=max_attempts {
        match generate_line(width, height, slope_epsilon, rng) {
            Ok(line) => return Ok(line),
            Err(e) if e.is_recoverable() => {
                log::debug!("Line attempt {} rejected: {}", attempt, e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(GrainSizeError::RetryLimitExceeded {
        attempts: max_attempts,
        accepted: 0,
        requested: 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPS: f64 = 1e-9;

    #[test]
    fn diagonal_through_center_spans_corners() {
        let line = clip_line(10, 10, 1.0, (5, 5), EPS).unwrap();
        assert_eq!(line.start, (0, 0));
        assert_eq!(line.end, (10, 10));
        assert_approx_eq!(line.length, 200f64.sqrt(), 1e-12);
    }

    #[test]
    fn anti_diagonal_runs_bottom_left_to_top_right() {
        let line = clip_line(10, 10, -1.0, (5, 5), EPS).unwrap();
        assert_eq!(line.start, (0, 10));
        assert_eq!(line.end, (10, 0));
    }

    #[test]
    fn steep_line_enters_top_and_leaves_bottom() {
        // y = 2x - 2 crosses y = 0 at x = 1 and y = 10 at x = 6
        let line = clip_line(10, 10, 2.0, (2, 2), EPS).unwrap();
        assert_eq!(line.start, (1, 0));
        assert_eq!(line.end, (6, 10));
        assert_approx_eq!(line.length, 125f64.sqrt(), 1e-12);
    }

    #[test]
    fn steep_falling_line_enters_bottom_and_leaves_top() {
        // y = -2x + 18 crosses y = 10 at x = 4 and y = 0 at x = 9
        let line = clip_line(10, 10, -2.0, (8, 2), EPS).unwrap();
        assert_eq!(line.start, (4, 10));
        assert_eq!(line.end, (9, 0));
    }

    #[test]
    fn bottom_edge_end_lies_on_the_line() {
        let (width, height) = (30u32, 40u32);
        let slope = 1.7;
        let line = clip_line(width, height, slope, (12, 20), EPS).unwrap();
        assert_eq!(line.end.1, height);
        let exact_x = (height as f64 - line.intercept) / slope;
        assert_eq!(line.end.0, exact_x as u32);
        assert_approx_eq!(slope * exact_x + line.intercept, height as f64, 1e-9);
    }

    #[test]
    fn horizontal_line_is_never_long_enough() {
        let err = clip_line(20, 10, 0.0, (3, 4), EPS).unwrap_err();
        assert!(matches!(err, GrainSizeError::DegenerateLine(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn vanishing_slope_in_division_branch_is_rejected() {
        // anchor on the top row with a tiny positive slope puts the intercept below zero
        let err = clip_line(10, 10, 1e-12, (5, 0), EPS).unwrap_err();
        assert!(matches!(err, GrainSizeError::NearZeroSlope(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn empty_image_is_fatal() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = generate_line(0, 10, EPS, &mut rng).unwrap_err();
        assert!(matches!(err, GrainSizeError::EmptyImage { width: 0, height: 10 }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn generated_lines_respect_bounds_and_length() {
        let mut rng = StdRng::seed_from_u64(2024);
        for &(width, height) in &[(10u32, 10u32), (64, 32), (17, 91), (300, 200)] {
            for _ in 0..200 {
                let line = generate_valid_line(width, height, EPS, 10_000, &mut rng).unwrap();
                for &(x, y) in &[line.start, line.end] {
                    assert!(x <= width && y <= height, "{:?} outside {}x{}", (x, y), width, height);
                }
                let length_sq = line.length * line.length;
                assert!(length_sq > (width as f64).powi(2));
                assert!(length_sq > (height as f64).powi(2));
            }
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let la = generate_valid_line(50, 40, EPS, 1000, &mut a).unwrap();
            let lb = generate_valid_line(50, 40, EPS, 1000, &mut b).unwrap();
            assert_eq!(la, lb);
        }
    }

    #[test]
    fn zero_attempt_budget_gives_up() {
        let mut rng = StdRng::seed_from_u64(3);
        let err = generate_valid_line(10, 10, EPS, 0, &mut rng).unwrap_err();
        assert!(matches!(err, GrainSizeError::RetryLimitExceeded { attempts: 0, .. }));
    }
}
