use thiserror::Error;
use std::io;
use std::path::PathBuf;

/// Custom error types for the grain size analyzer
#[derive(Error, Debug)]
pub enum GrainSizeError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration from {path}: {source}")]
    ConfigLoad {
        source: toml::de::Error,
        path: PathBuf,
    },

    #[error("Degenerate line: {0}")]
    DegenerateLine(String),

    #[error("Slope {0:e} is too close to zero for edge clipping")]
    NearZeroSlope(f64),

    #[error("Image has no measurable area ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("Gave up after {attempts} line attempts with {accepted} of {requested} lines accepted")]
    RetryLimitExceeded {
        attempts: usize,
        accepted: usize,
        requested: usize,
    },

    #[error("Invalid crop: {0}")]
    InvalidCrop(String),

    #[error("CSV output error: {0}")]
    CsvOutput(#[from] csv::Error),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input path: {0}")]
    InvalidPath(PathBuf),
}

impl GrainSizeError {
    /// True for errors that are handled by drawing a new line.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GrainSizeError::DegenerateLine(_) | GrainSizeError::NearZeroSlope(_)
        )
    }
}

/// Type alias for Result with our custom error type
pub type Result<T> = std::result::Result<T, GrainSizeError>;
