// src/config.rs - Tool configuration and the intercept measurement parameters

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{GrainSizeError, Result};

/// Heyn's empirical factor converting mean intercept length to mean grain diameter
pub const HEYN_CONSTANT: f64 = 1.13;

/// Grouping distance: diagonal neighbour distance of two pixels plus a small margin
pub const DEFAULT_CUTOFF: f64 = 2.0 * std::f64::consts::SQRT_2 + 0.001;

pub const DEFAULT_NUM_LINES: usize = 6;

/// Sentinel RGB marking grain boundary pixels
pub const BOUNDARY_SENTINEL_RGB: [u8; 3] = [255, 0, 0];

/// How a source pixel is recognised as a grain boundary pixel
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryMatch {
    /// Pixel RGB equals the boundary color exactly
    #[default]
    Exact,
    /// Saturating sum of boundary color and pixel RGB equals the boundary color
    Overlay,
}

/// Parameters of the line-intercept measurement
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct InterceptParams {
    #[serde(default = "default_num_lines")]
    pub num_lines: usize,

    #[serde(default = "default_cutoff")]
    pub cutoff: f64,

    #[serde(default = "default_l_const")]
    pub l_const: f64,

    #[serde(default = "default_boundary_color")]
    pub boundary_color_rgb: [u8; 3],

    #[serde(default)]
    pub boundary_match: BoundaryMatch,

    /// Upper bound on sampled lines per image, accepted or not
    #[serde(default = "default_max_line_attempts")]
    pub max_line_attempts: usize,

    #[serde(default = "default_slope_epsilon")]
    pub slope_epsilon: f64,
}

/// Size and number of random sub-images cut from each input
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct CropConfig {
    pub width: u32,
    pub height: u32,
    pub count: usize,
}

/// Configuration for the grain size tool
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub input_path: String,
    pub output_base_dir: String,

    #[serde(default = "default_parallel")]
    pub use_parallel: bool,

    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default = "default_annotate")]
    pub annotate: bool,

    #[serde(default)]
    pub write_json: bool,

    #[serde(default = "default_boundary_color")]
    pub line_color_rgb: [u8; 3],

    #[serde(default = "default_group_marker_color")]
    pub group_marker_color_rgb: [u8; 3],

    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,

    #[serde(default)]
    pub crop: Option<CropConfig>,

    #[serde(default)]
    pub analysis: InterceptParams,
}

fn default_num_lines() -> usize {
    DEFAULT_NUM_LINES
}

fn default_cutoff() -> f64 {
    DEFAULT_CUTOFF
}

fn default_l_const() -> f64 {
    HEYN_CONSTANT
}

fn default_boundary_color() -> [u8; 3] {
    BOUNDARY_SENTINEL_RGB
}

fn default_max_line_attempts() -> usize {
    1000
}

fn default_slope_epsilon() -> f64 {
    1e-9
}

fn default_parallel() -> bool {
    true
}

fn default_annotate() -> bool {
    true
}

fn default_group_marker_color() -> [u8; 3] {
    [0, 0, 255]
}

fn default_image_extensions() -> Vec<String> {
    vec!["png".to_string(), "tif".to_string(), "tiff".to_string()]
}

impl Default for InterceptParams {
    fn default() -> Self {
        Self {
            num_lines: DEFAULT_NUM_LINES,
            cutoff: DEFAULT_CUTOFF,
            l_const: HEYN_CONSTANT,
            boundary_color_rgb: BOUNDARY_SENTINEL_RGB,
            boundary_match: BoundaryMatch::Exact,
            max_line_attempts: default_max_line_attempts(),
            slope_epsilon: default_slope_epsilon(),
        }
    }
}

impl InterceptParams {
    /// Validate measurement parameters
    pub fn validate(&self) -> Result<()> {
        if self.num_lines == 0 {
            return Err(GrainSizeError::Config("num_lines must be > 0".to_string()));
        }

        if !self.cutoff.is_finite() || self.cutoff <= 0.0 {
            return Err(GrainSizeError::Config(
                "cutoff must be a finite value > 0.0".to_string(),
            ));
        }

        if !self.l_const.is_finite() || self.l_const <= 0.0 {
            return Err(GrainSizeError::Config(
                "l_const must be a finite value > 0.0".to_string(),
            ));
        }

        if !self.slope_epsilon.is_finite() || self.slope_epsilon <= 0.0 {
            return Err(GrainSizeError::Config(
                "slope_epsilon must be a finite value > 0.0".to_string(),
            ));
        }

        if self.max_line_attempts < self.num_lines {
            return Err(GrainSizeError::Config(format!(
                "max_line_attempts ({}) must be >= num_lines ({})",
                self.max_line_attempts, self.num_lines
            )));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: "./input".to_string(),
            output_base_dir: "./output".to_string(),
            use_parallel: true,
            seed: None,
            annotate: true,
            write_json: false,
            line_color_rgb: BOUNDARY_SENTINEL_RGB,
            group_marker_color_rgb: default_group_marker_color(),
            image_extensions: default_image_extensions(),
            crop: None,
            analysis: InterceptParams::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            GrainSizeError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|source| GrainSizeError::ConfigLoad {
            source,
            path: path.to_path_buf(),
        })
    }

    /// Validate configuration and create the output directory
    pub fn validate(&self) -> Result<()> {
        let input_path = PathBuf::from(&self.input_path);
        if !input_path.exists() {
            return Err(GrainSizeError::InvalidPath(input_path));
        }

        self.analysis.validate()?;

        if let Some(crop) = &self.crop {
            if crop.width == 0 || crop.height == 0 {
                return Err(GrainSizeError::Config(
                    "crop width and height must be > 0".to_string(),
                ));
            }
            if crop.count == 0 {
                return Err(GrainSizeError::Config("crop count must be > 0".to_string()));
            }
        }

        if self.image_extensions.is_empty() {
            return Err(GrainSizeError::Config(
                "image_extensions must name at least one extension".to_string(),
            ));
        }

        fs::create_dir_all(&self.output_base_dir)?;

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            GrainSizeError::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content)?;

        Ok(())
    }
}
