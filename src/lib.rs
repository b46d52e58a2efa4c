// src/lib.rs - Library interface for color-by-number region labeling

pub mod color_merge;
pub mod color_sampling;
pub mod config;
pub mod contour;
pub mod errors;
pub mod image_io;
pub mod image_utils;
pub mod label_placement;
pub mod numbering;
pub mod output;
pub mod pipeline;
pub mod raster;
pub mod segmentation;

// Re-export commonly used types and functions
pub use errors::{ColorByNumberError, Result};
pub use config::Config;
pub use pipeline::{label_regions, process_image, ImageSummary, LabeledRegions};
pub use image_io::{InputImage, load_bitmap, load_image, save_image};
pub use raster::{Bitmap, ColorImage};

// Region pipeline stages
pub use segmentation::{
    flood_fill,
    segment_regions,
    FloodFillParams,
    Region,
    RegionArena,
    RegionId,
    ScanOrder,
    Segmentation,
};
pub use color_sampling::{sample_region_color, Color, RegionColorEntry, RegionSample};
pub use color_merge::merge_similar_colors;
pub use label_placement::{label_side, place_label, LabelBox, OccupancyGrid};
pub use numbering::ColorNumberMap;
pub use contour::{contour_outline, contour_region_bitmap, edge_strength};
