// src/annotate.rs - Overlay of measured lines and intercepts

use image::RgbaImage;
use imageproc::drawing::{draw_hollow_ellipse_mut, draw_line_segment_mut};

use crate::font::draw_label;
use crate::image_utils::opaque;
use crate::measurement::ImageMeasurement;

/// Fraction of the way from start to end where a line's number is drawn
const LABEL_POSITION: f32 = 0.3;

/// Draw every measured line and circle each intercept group on a copy of `image`
///
/// Group ellipses enclose the group's bounding box with one pixel of margin.
/// Each line is labelled with its index at 30% of its length.
pub fn annotate_measurements(
    image: &RgbaImage,
    measurement: &ImageMeasurement,
    line_color: [u8; 3],
    marker_color: [u8; 3],
) -> RgbaImage {
    let mut annotated = image.clone();
    let line_pixel = opaque(line_color);
    let marker_pixel = opaque(marker_color);

    for line in &measurement.lines {
        let start = (line.line.start.0 as f32, line.line.start.1 as f32);
        let end = (line.line.end.0 as f32, line.line.end.1 as f32);
        draw_line_segment_mut(&mut annotated, start, end, line_pixel);

        let label_x = start.0 + LABEL_POSITION * (end.0 - start.0);
        let label_y = start.1 + LABEL_POSITION * (end.1 - start.1);
        draw_label(
            &mut annotated,
            &line.index.to_string(),
            label_x as i32,
            label_y as i32,
            line_pixel,
        );

        for group in &line.groups {
            if let Some(((min_x, min_y), (max_x, max_y))) = group.bounding_box() {
                let center = (
                    ((min_x + max_x) / 2) as i32,
                    ((min_y + max_y) / 2) as i32,
                );
                let radius_x = ((max_x - min_x) / 2) as i32 + 1;
                let radius_y = ((max_y - min_y) / 2) as i32 + 1;
                draw_hollow_ellipse_mut(&mut annotated, center, radius_x, radius_y, marker_pixel);
            }
        }
    }

    annotated
}
