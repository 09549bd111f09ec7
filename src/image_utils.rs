use image::{Rgba, RgbaImage};

use crate::config::BoundaryMatch;

/// Check if a pixel has the specified RGB color (ignoring alpha)
#[inline]
pub fn has_rgb_color(pixel: &Rgba<u8>, color: [u8; 3]) -> bool {
    pixel[0] == color[0] && pixel[1] == color[1] && pixel[2] == color[2]
}

/// Check if painting `color` additively over the pixel leaves exactly `color`
///
/// Every channel of the saturating sum must equal the corresponding channel
/// of `color`, i.e. the pixel contributes nothing to channels where `color`
/// is not already saturated.
#[inline]
pub fn overlay_matches(pixel: &Rgba<u8>, color: [u8; 3]) -> bool {
    (0..3).all(|c| color[c].saturating_add(pixel[c]) == color[c])
}

/// Check if a pixel marks a grain boundary
#[inline]
pub fn is_boundary_pixel(pixel: &Rgba<u8>, color: [u8; 3], mode: BoundaryMatch) -> bool {
    match mode {
        BoundaryMatch::Exact => has_rgb_color(pixel, color),
        BoundaryMatch::Overlay => overlay_matches(pixel, color),
    }
}

/// Convert an RGB triple to an opaque RGBA pixel
#[inline]
pub fn opaque(color: [u8; 3]) -> Rgba<u8> {
    Rgba([color[0], color[1], color[2], 255])
}

/// Create an opaque image filled with one color
pub fn filled_image(width: u32, height: u32, color: [u8; 3]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, opaque(color))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 3] = [255, 0, 0];

    #[test]
    fn exact_match_ignores_alpha() {
        assert!(is_boundary_pixel(&Rgba([255, 0, 0, 0]), RED, BoundaryMatch::Exact));
        assert!(!is_boundary_pixel(&Rgba([254, 0, 0, 255]), RED, BoundaryMatch::Exact));
        assert!(!is_boundary_pixel(&Rgba([0, 0, 0, 255]), RED, BoundaryMatch::Exact));
    }

    #[test]
    fn overlay_match_accepts_any_red_channel() {
        assert!(is_boundary_pixel(&Rgba([0, 0, 0, 255]), RED, BoundaryMatch::Overlay));
        assert!(is_boundary_pixel(&Rgba([120, 0, 0, 255]), RED, BoundaryMatch::Overlay));
        assert!(!is_boundary_pixel(&Rgba([0, 1, 0, 255]), RED, BoundaryMatch::Overlay));
        assert!(!is_boundary_pixel(&Rgba([255, 255, 255, 255]), RED, BoundaryMatch::Overlay));
    }

    #[test]
    fn filled_image_is_uniform() {
        let img = filled_image(3, 2, [1, 2, 3]);
        assert_eq!(img.dimensions(), (3, 2));
        assert!(img.pixels().all(|p| *p == Rgba([1, 2, 3, 255])));
    }
}
