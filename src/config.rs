// src/config.rs - TOML-backed configuration for the color-by-number pipeline

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use crate::errors::{ColorByNumberError, Result};
use crate::segmentation::{FloodFillParams, ScanOrder};

/// Configuration for the color-by-number pipeline
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_input_path")]
    pub input_path: String,

    #[serde(default = "default_output_base_dir")]
    pub output_base_dir: String,

    /// Precomputed contour bitmap; when absent the bitmap is derived from the color image
    #[serde(default)]
    pub contour_bitmap_path: Option<String>,

    // Flood fill parameters
    #[serde(default = "default_flood_fill_target_color")]
    pub flood_fill_target_color: u8,

    #[serde(default = "default_flood_fill_replacement_color")]
    pub flood_fill_replacement_color: u8,

    #[serde(default = "default_flood_fill_tolerance")]
    pub flood_fill_tolerance: u8,

    #[serde(default = "default_min_region_pixel_count")]
    pub min_region_pixel_count: usize,

    #[serde(default)]
    pub scan_order: ScanOrder,

    // Color merge and label parameters
    #[serde(default = "default_similar_color_threshold")]
    pub similar_color_threshold: f64,

    #[serde(default = "default_label_scale")]
    pub label_scale: f64,

    // Contour preprocessing parameters
    #[serde(default = "default_gaussian_sigma")]
    pub gaussian_sigma: f32,

    #[serde(default = "default_dilation_radius")]
    pub dilation_radius: u8,

    // Printable outline parameters
    #[serde(default = "default_outline_sharpen_sigma")]
    pub outline_sharpen_sigma: f32,

    #[serde(default = "default_outline_threshold")]
    pub outline_threshold: u8,

    #[serde(default = "default_parallel")]
    pub use_parallel: bool,
}

fn default_input_path() -> String {
    "./input".to_string()
}

fn default_output_base_dir() -> String {
    "./output".to_string()
}

fn default_flood_fill_target_color() -> u8 {
    255
}

fn default_flood_fill_replacement_color() -> u8 {
    124
}

fn default_flood_fill_tolerance() -> u8 {
    250
}

fn default_min_region_pixel_count() -> usize {
    60
}

fn default_similar_color_threshold() -> f64 {
    20.0
}

fn default_label_scale() -> f64 {
    0.3
}

fn default_gaussian_sigma() -> f32 {
    1.0
}

fn default_dilation_radius() -> u8 {
    2 // 5x5 square kernel
}

fn default_outline_sharpen_sigma() -> f32 {
    1.0
}

fn default_outline_threshold() -> u8 {
    20
}

fn default_parallel() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: default_input_path(),
            output_base_dir: default_output_base_dir(),
            contour_bitmap_path: None,
            flood_fill_target_color: default_flood_fill_target_color(),
            flood_fill_replacement_color: default_flood_fill_replacement_color(),
            flood_fill_tolerance: default_flood_fill_tolerance(),
            min_region_pixel_count: default_min_region_pixel_count(),
            scan_order: ScanOrder::default(),
            similar_color_threshold: default_similar_color_threshold(),
            label_scale: default_label_scale(),
            gaussian_sigma: default_gaussian_sigma(),
            dilation_radius: default_dilation_radius(),
            outline_sharpen_sigma: default_outline_sharpen_sigma(),
            outline_threshold: default_outline_threshold(),
            use_parallel: default_parallel(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ColorByNumberError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|source| ColorByNumberError::ConfigLoad {
            source,
            path: path.to_path_buf(),
        })
    }

    /// Flood fill parameters derived from this configuration
    pub fn flood_fill_params(&self) -> FloodFillParams {
        FloodFillParams {
            target_color: self.flood_fill_target_color,
            replacement_color: self.flood_fill_replacement_color,
            tolerance: self.flood_fill_tolerance,
            min_region_pixel_count: self.min_region_pixel_count,
            scan_order: self.scan_order,
        }
    }

    /// Validate the numeric pipeline parameters
    pub fn validate(&self) -> Result<()> {
        if self.flood_fill_replacement_color == self.flood_fill_target_color {
            return Err(ColorByNumberError::Config(
                "flood_fill_replacement_color must differ from flood_fill_target_color".to_string(),
            ));
        }

        if self.min_region_pixel_count == 0 {
            return Err(ColorByNumberError::Config(
                "min_region_pixel_count must be > 0".to_string(),
            ));
        }

        if !self.similar_color_threshold.is_finite() || self.similar_color_threshold < 0.0 {
            return Err(ColorByNumberError::Config(
                "similar_color_threshold must be a finite value >= 0.0".to_string(),
            ));
        }

        if !self.label_scale.is_finite() || self.label_scale <= 0.0 {
            return Err(ColorByNumberError::Config(
                "label_scale must be a finite value > 0.0".to_string(),
            ));
        }

        if !self.gaussian_sigma.is_finite() || self.gaussian_sigma <= 0.0 {
            return Err(ColorByNumberError::Config(
                "gaussian_sigma must be a finite value > 0.0".to_string(),
            ));
        }

        if !self.outline_sharpen_sigma.is_finite() || self.outline_sharpen_sigma <= 0.0 {
            return Err(ColorByNumberError::Config(
                "outline_sharpen_sigma must be a finite value > 0.0".to_string(),
            ));
        }

        Ok(())
    }

    /// Check the input path and create the output directory tree
    pub fn prepare_paths(&self, debug: bool) -> Result<()> {
        let input_path = PathBuf::from(&self.input_path);
        if !input_path.exists() {
            return Err(ColorByNumberError::InvalidPath(input_path));
        }

        let base_dir = PathBuf::from(&self.output_base_dir);
        let mut dirs = vec![
            base_dir.join("regions"),
            base_dir.join("colors"),
            base_dir.join("outline"),
        ];
        if debug {
            dirs.push(base_dir.join("debug"));
        }

        for dir in dirs {
            fs::create_dir_all(&dir).map_err(|e| {
                ColorByNumberError::Io(io::Error::new(
                    ErrorKind::Other,
                    format!("Failed to create output directory '{}': {}", dir.display(), e),
                ))
            })?;
        }

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            ColorByNumberError::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content)?;

        Ok(())
    }
}
