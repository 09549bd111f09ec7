// src/lib.rs - Library interface for Heyn line-intercept grain size measurement

pub mod annotate;
pub mod boundary;
pub mod clustering;
pub mod config;
pub mod crop;
pub mod errors;
pub mod font;
pub mod image_io;
pub mod image_utils;
pub mod line_generator;
pub mod measurement;
pub mod output;
pub mod path_algorithms;
pub mod pipeline;

// Re-export commonly used types and functions
pub use errors::{GrainSizeError, Result};
pub use config::{BoundaryMatch, Config, CropConfig, InterceptParams};
pub use pipeline::{process_image, NamedMeasurement, ProcessedImage};
pub use image_io::{InputImage, load_image, output_names, save_image};

// Core measurement
pub use line_generator::{clip_line, generate_line, generate_valid_line, ClippedLine};
pub use boundary::{boundary_mask, collect_hits, line_boundary_hits};
pub use clustering::{group_intercepts, InterceptGroup};
pub use measurement::{
    calculate_diameter,
    mean_diameter,
    measure_image,
    measure_line,
    ImageMeasurement,
    LineMeasurement,
};

// Collaborators
pub use annotate::annotate_measurements;
pub use crop::{annotate_crop_regions, crop_random, CropRegion};
