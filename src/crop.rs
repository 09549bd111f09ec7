// src/crop.rs - Random sub-images cut from a large micrograph

use image::{imageops, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use rand::Rng;
use serde::Serialize;

use crate::errors::{GrainSizeError, Result};
use crate::font::draw_label;
use crate::image_utils::opaque;

/// Placement of one random crop within the source image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropRegion {
    pub index: usize,
    pub left: u32,
    pub upper: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    pub fn right(&self) -> u32 {
        self.left + self.width
    }

    pub fn lower(&self) -> u32 {
        self.upper + self.height
    }
}

/// Cut `count` randomly placed `width` x `height` sub-images out of `image`
///
/// Upper-left corners are uniform over every position that keeps the crop
/// inside the image. Regions may overlap.
pub fn crop_random<R: Rng + ?Sized>(
    image: &RgbaImage,
    width: u32,
    height: u32,
    count: usize,
    rng: &mut R,
) -> Result<Vec<(CropRegion, RgbaImage)>> {
    let (image_width, image_height) = image.dimensions();

    if width == 0 || height == 0 {
        return Err(GrainSizeError::InvalidCrop(format!(
            "crop size {}x{} must be non-zero",
            width, height
        )));
    }
    if width > image_width || height > image_height {
        return Err(GrainSizeError::InvalidCrop(format!(
            "crop size {}x{} exceeds image size {}x{}",
            width, height, image_width, image_height
        )));
    }

    let crops = (0..count)
        .map(|index| {
            let region = CropRegion {
                index,
                left: rng.gen_range(0..=image_width - width),
                upper: rng.gen_range(0..=image_height - height),
                width,
                height,
            };
            let cropped =
                imageops::crop_imm(image, region.left, region.upper, width, height).to_image();
            (region, cropped)
        })
        .collect();

    Ok(crops)
}

/// Outline every crop region on a copy of the source image
///
/// Each outline carries the crop number (`No.000`, `No.001`, ...) in its
/// upper-left corner.
pub fn annotate_crop_regions(image: &RgbaImage, regions: &[CropRegion], color: [u8; 3]) -> RgbaImage {
    let mut annotated = image.clone();
    let pixel = opaque(color);

    for region in regions {
        let (left, upper) = (region.left as i32, region.upper as i32);
        let rect = Rect::at(left, upper).of_size(region.width, region.height);
        draw_hollow_rect_mut(&mut annotated, rect, pixel);
        draw_label(&mut annotated, &format!("No.{:03}", region.index), left, upper, pixel);
    }

    annotated
}
