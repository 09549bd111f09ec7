use assert_approx_eq::assert_approx_eq;
use image::{Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::SeedableRng;

use heyn_grain_size_lib::{
    calculate_diameter, clip_line, generate_valid_line, group_intercepts, measure_image,
    GrainSizeError, InterceptParams,
};

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Square grid of boundary lines every `cell` pixels
fn grain_grid(size: u32, cell: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        if x % cell == 0 || y % cell == 0 {
            RED
        } else {
            WHITE
        }
    })
}

#[test]
fn three_boundary_pixels_form_two_intercepts() {
    let groups = group_intercepts(&[(2, 2), (2, 3), (7, 8)], 3.828);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].pixels, vec![(2, 2), (2, 3)]);
    assert_eq!(groups[1].pixels, vec![(7, 8)]);
}

#[test]
fn corner_to_corner_line_with_two_intercepts() {
    let line = clip_line(10, 10, 1.0, (0, 0), 1e-9).unwrap();
    assert_eq!((line.start, line.end), ((0, 0), (10, 10)));
    assert_approx_eq!(line.length, 14.1421, 1e-4);

    let d = calculate_diameter(line.length, 2, 1.13).unwrap();
    assert_approx_eq!(d, 7.99, 0.005);
}

#[test]
fn accepted_lines_are_long_and_inside_the_image() {
    let mut rng = StdRng::seed_from_u64(314);
    let (width, height) = (120u32, 80u32);
    for _ in 0..500 {
        let line = generate_valid_line(width, height, 1e-9, 10_000, &mut rng).unwrap();
        assert!(line.start.0 <= width && line.start.1 <= height);
        assert!(line.end.0 <= width && line.end.1 <= height);
        let length_sq = line.length * line.length;
        assert!(length_sq > (width * width) as f64);
        assert!(length_sq > (height * height) as f64);
    }
}

#[test]
fn grid_diameter_tracks_cell_size() {
    // boundaries every 10 px: mean intercept length along a random line is
    // on the order of the cell size
    let img = grain_grid(200, 10);
    let params = InterceptParams { num_lines: 20, ..InterceptParams::default() };
    let mut rng = StdRng::seed_from_u64(17);

    let result = measure_image(&img, &params, &mut rng).unwrap();
    assert_eq!(result.lines.len(), 20);
    assert!(
        result.mean_diameter > 3.0 && result.mean_diameter < 30.0,
        "unexpected mean diameter {}",
        result.mean_diameter
    );
}

#[test]
fn finer_grid_gives_smaller_grains() {
    let params = InterceptParams { num_lines: 20, ..InterceptParams::default() };

    let coarse = measure_image(&grain_grid(200, 25), &params, &mut StdRng::seed_from_u64(1)).unwrap();
    let fine = measure_image(&grain_grid(200, 8), &params, &mut StdRng::seed_from_u64(1)).unwrap();

    assert!(fine.mean_diameter < coarse.mean_diameter);
}

#[test]
fn blank_image_hits_the_retry_limit() {
    let img = RgbaImage::from_pixel(30, 30, WHITE);
    let params = InterceptParams { max_line_attempts: 40, ..InterceptParams::default() };
    let mut rng = StdRng::seed_from_u64(2);

    match measure_image(&img, &params, &mut rng) {
        Err(GrainSizeError::RetryLimitExceeded { attempts, accepted, .. }) => {
            assert_eq!(attempts, 40);
            assert_eq!(accepted, 0);
        }
        other => panic!("expected RetryLimitExceeded, got {:?}", other),
    }
}
