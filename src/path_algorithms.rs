// src/path_algorithms.rs - Line rasterization and pixel distances

use image::{GrayImage, Luma};
use bresenham::Bresenham;

use crate::line_generator::ClippedLine;

/// Mask value for pixels covered by a rasterized line
pub const LINE_MASK_VALUE: u8 = 255;

/// Trace a straight line path between two points using Bresenham's algorithm
///
/// Both endpoints are included. Points may lie one past the last pixel
/// row/column when an endpoint sits on the right or bottom image border.
///
/// # Arguments
/// * `start` - Starting point coordinates
/// * `end` - Ending point coordinates
///
/// # Returns
/// Vector of pixel coordinates along the straight line
pub fn trace_straight_line(
    start: (u32, u32),
    end: (u32, u32),
) -> Vec<(u32, u32)> {
    let (start_x, start_y) = (start.0 as isize, start.1 as isize);
    let (end_x, end_y) = (end.0 as isize, end.1 as isize);

    // Bresenham stops one short of the end point
    let mut points: Vec<(u32, u32)> = Bresenham::new((start_x, start_y), (end_x, end_y))
        .map(|(x, y)| (x as u32, y as u32))
        .collect();
    points.push(end);

    points
}

/// Rasterize a clipped line into a blank `width` x `height` mask
///
/// Covered pixels get [`LINE_MASK_VALUE`]; points on the far border that fall
/// outside the pixel grid are dropped.
pub fn rasterize_line_mask(line: &ClippedLine, width: u32, height: u32) -> GrayImage {
    let mut mask = GrayImage::new(width, height);

    for (x, y) in trace_straight_line(line.start, line.end) {
        if x < width && y < height {
            mask.put_pixel(x, y, Luma([LINE_MASK_VALUE]));
        }
    }

    mask
}

/// Calculate the Euclidean distance between two points
///
/// # Arguments
/// * `point1` - First point coordinates
/// * `point2` - Second point coordinates
///
/// # Returns
/// Euclidean distance as f64
pub fn calculate_straight_path_length(
    point1: (u32, u32),
    point2: (u32, u32),
) -> f64 {
    let dx = point1.0 as f64 - point2.0 as f64;
    let dy = point1.1 as f64 - point2.1 as f64;

    (dx * dx + dy * dy).sqrt()
}
