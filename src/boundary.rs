// src/boundary.rs - Boundary pixels hit by a rasterized test line

use image::{GrayImage, Luma, RgbaImage};

use crate::config::BoundaryMatch;
use crate::image_utils::is_boundary_pixel;
use crate::line_generator::ClippedLine;
use crate::path_algorithms::rasterize_line_mask;

/// Mask value for grain boundary pixels
pub const BOUNDARY_MASK_VALUE: u8 = 255;

/// Build a mask of the grain boundary pixels of `image`
///
/// Computed once per image and shared read-only by every line.
pub fn boundary_mask(image: &RgbaImage, color: [u8; 3], mode: BoundaryMatch) -> GrayImage {
    let (width, height) = image.dimensions();

    GrayImage::from_fn(width, height, |x, y| {
        if is_boundary_pixel(image.get_pixel(x, y), color, mode) {
            Luma([BOUNDARY_MASK_VALUE])
        } else {
            Luma([0])
        }
    })
}

/// Combine a boundary mask and a line mask into hit coordinates
///
/// A pixel is a hit when it is set in both masks. Hits are returned in
/// row-major scan order (rows top to bottom, columns left to right within a
/// row); intercept grouping depends on this order.
pub fn collect_hits(boundary: &GrayImage, line_mask: &GrayImage) -> Vec<(u32, u32)> {
    debug_assert_eq!(boundary.dimensions(), line_mask.dimensions());
    let (width, height) = boundary.dimensions();

    let mut hits = Vec::new();
    for y in 0..height {
        for x in 0..width {
            if line_mask.get_pixel(x, y)[0] > 0 && boundary.get_pixel(x, y)[0] > 0 {
                hits.push((x, y));
            }
        }
    }

    hits
}

/// Boundary pixels lying on the rasterized `line`, in scan order
pub fn line_boundary_hits(boundary: &GrayImage, line: &ClippedLine) -> Vec<(u32, u32)> {
    let (width, height) = boundary.dimensions();
    let line_mask = rasterize_line_mask(line, width, height);
    collect_hits(boundary, &line_mask)
}
