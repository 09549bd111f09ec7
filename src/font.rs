// src/font.rs - 5x7 bitmap glyphs for labels burned into overlay images

use image::{Rgba, RgbaImage};

/// Horizontal advance per character, glyph width plus one pixel of spacing
pub const GLYPH_ADVANCE: i32 = 6;
pub const GLYPH_HEIGHT: i32 = 7;

/// Rows of a 5x7 glyph, most significant bit is the leftmost column
fn glyph(c: char) -> Option<[u8; 7]> {
    let rows = match c {
        ' ' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x60, 0x60],
        '0' => [0x70, 0x88, 0x98, 0xA8, 0xC8, 0x88, 0x70],
        '1' => [0x20, 0x60, 0x20, 0x20, 0x20, 0x20, 0x70],
        '2' => [0x70, 0x88, 0x08, 0x10, 0x20, 0x40, 0xF8],
        '3' => [0xF8, 0x10, 0x20, 0x10, 0x08, 0x88, 0x70],
        '4' => [0x10, 0x30, 0x50, 0x90, 0xF8, 0x10, 0x10],
        '5' => [0xF8, 0x80, 0xF0, 0x08, 0x08, 0x88, 0x70],
        '6' => [0x30, 0x40, 0x80, 0xF0, 0x88, 0x88, 0x70],
        '7' => [0xF8, 0x08, 0x10, 0x20, 0x40, 0x40, 0x40],
        '8' => [0x70, 0x88, 0x88, 0x70, 0x88, 0x88, 0x70],
        '9' => [0x70, 0x88, 0x88, 0x78, 0x08, 0x10, 0x60],
        'N' => [0x88, 0x88, 0xC8, 0xA8, 0x98, 0x88, 0x88],
        'o' => [0x00, 0x00, 0x70, 0x88, 0x88, 0x88, 0x70],
        _ => return None,
    };
    Some(rows)
}

/// Draw `text` with its upper-left corner at `(x, y)`
///
/// Pixels outside the image are skipped. Characters without a glyph advance
/// the cursor but draw nothing.
pub fn draw_label(image: &mut RgbaImage, text: &str, x: i32, y: i32, color: Rgba<u8>) {
    let (width, height) = (image.width() as i32, image.height() as i32);
    let mut cursor_x = x;

    for c in text.chars() {
        if let Some(rows) = glyph(c) {
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..5 {
                    if bits & (0b1000_0000 >> col) == 0 {
                        continue;
                    }
                    let px = cursor_x + col;
                    let py = y + row as i32;
                    if (0..width).contains(&px) && (0..height).contains(&py) {
                        image.put_pixel(px as u32, py as u32, color);
                    }
                }
            }
        }
        cursor_x += GLYPH_ADVANCE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_utils::{filled_image, opaque};

    const RED: [u8; 3] = [255, 0, 0];

    fn red_pixels(img: &RgbaImage) -> Vec<(u32, u32)> {
        img.enumerate_pixels()
            .filter(|(_, _, p)| **p == opaque(RED))
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    #[test]
    fn one_draws_its_stem_and_base() {
        let mut img = filled_image(10, 10, [255, 255, 255]);
        draw_label(&mut img, "1", 1, 1, opaque(RED));

        // stem in glyph column 2, base spans columns 1..=3 of the last row
        for row in 0..7 {
            assert_eq!(img.get_pixel(3, 1 + row), &opaque(RED));
        }
        assert_eq!(img.get_pixel(2, 7), &opaque(RED));
        assert_eq!(img.get_pixel(4, 7), &opaque(RED));
        assert_eq!(img.get_pixel(1, 1), &opaque([255, 255, 255]));
    }

    #[test]
    fn characters_advance_by_six_pixels() {
        let mut img = filled_image(20, 8, [255, 255, 255]);
        draw_label(&mut img, "11", 0, 0, opaque(RED));
        let pixels = red_pixels(&img);
        assert!(pixels.contains(&(2, 0)));
        assert!(pixels.contains(&(2 + GLYPH_ADVANCE as u32, 0)));
        assert_eq!(pixels.len(), 2 * 10);
    }

    #[test]
    fn label_is_clipped_at_the_border() {
        let mut img = filled_image(4, 4, [255, 255, 255]);
        draw_label(&mut img, "No.007", -3, 2, opaque(RED));
        draw_label(&mut img, "8", 100, 100, opaque(RED));
        assert!(!red_pixels(&img).is_empty());
        assert_eq!(img.dimensions(), (4, 4));
    }

    #[test]
    fn unknown_characters_draw_nothing() {
        let mut img = filled_image(12, 8, [255, 255, 255]);
        draw_label(&mut img, "?#", 0, 0, opaque(RED));
        assert!(red_pixels(&img).is_empty());
    }
}
