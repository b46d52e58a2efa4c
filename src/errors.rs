use thiserror::Error;
use std::io;
use std::path::PathBuf;

/// Custom error types for the color-by-number pipeline
#[derive(Error, Debug)]
pub enum ColorByNumberError {
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

    #[error("Bitmap is {bitmap:?} but color image is {image:?} (width, height)")]
    InvalidDimensions {
        bitmap: (u32, u32),
        image: (u32, u32),
    },

    #[error("Unsupported channel layout: {0} channels (expected 1, 3 or 4)")]
    UnsupportedChannelLayout(u8),

    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    InvalidBuffer {
        expected: usize,
        actual: usize,
    },

    #[error("Region pixel {index} lies outside the {pixel_count}-pixel color image")]
    PixelOutOfBounds {
        index: usize,
        pixel_count: usize,
    },

    #[error("CSV output error: {0}")]
    CsvOutput(#[from] csv::Error),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input path: {0}")]
    InvalidPath(PathBuf),
}

/// Type alias for Result with our custom error type
pub type Result<T> = std::result::Result<T, ColorByNumberError>;
