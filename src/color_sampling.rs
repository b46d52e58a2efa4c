// src/color_sampling.rs - Representative color of each region

use log::{debug, warn};
use serde::{Serialize, Serializer};

use crate::errors::{ColorByNumberError, Result};
use crate::label_placement::{place_label, LabelBox};
use crate::raster::ColorImage;
use crate::segmentation::Region;

/// Color read from a 1, 3 or 4 channel image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Gray(u8),
    Rgb([u8; 3]),
    Rgba([u8; 4]),
}

impl Color {
    /// Build a color from the channel bytes of one pixel
    pub fn from_channels(channels: &[u8]) -> Result<Self> {
        match *channels {
            [g] => Ok(Color::Gray(g)),
            [r, g, b] => Ok(Color::Rgb([r, g, b])),
            [r, g, b, a] => Ok(Color::Rgba([r, g, b, a])),
            _ => Err(ColorByNumberError::UnsupportedChannelLayout(channels.len() as u8)),
        }
    }

    pub fn components(&self) -> &[u8] {
        match self {
            Color::Gray(g) => std::slice::from_ref(g),
            Color::Rgb(c) => c,
            Color::Rgba(c) => c,
        }
    }

    /// Euclidean distance over the color channels; alpha is ignored
    pub fn distance(&self, other: &Color) -> f64 {
        self.components()
            .iter()
            .zip(other.components())
            .take(3)
            .map(|(&a, &b)| {
                let d = a as f64 - b as f64;
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }

    /// Canonical key text, e.g. `[10,10,10]`
    pub fn key(&self) -> String {
        let parts: Vec<String> = self.components().iter().map(|c| c.to_string()).collect();
        format!("[{}]", parts.join(","))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.components())
    }
}

/// Anchor pixel and sampled color of one region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegionColorEntry {
    pub anchor_index: usize,
    pub color: Color,
}

/// Everything the sampler learns about one region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionSample {
    pub entry: RegionColorEntry,
    /// `None` when no label box fits and the fill-order middle pixel was used
    pub label: Option<LabelBox>,
}

/// Pick an anchor pixel for `region` and read its color from `image`.
///
/// The anchor is the top-left of the first label box that fits inside the
/// region. Without one, the pixel in the middle of the fill order is used.
pub fn sample_region_color(region: &Region, image: &ColorImage, label_scale: f64) -> Result<RegionSample> {
    if !matches!(image.channels(), 1 | 3 | 4) {
        return Err(ColorByNumberError::UnsupportedChannelLayout(image.channels()));
    }

    let label = place_label(region, image.width(), label_scale);
    let anchor_index = match label {
        Some(label_box) => label_box.anchor_index(image.width()),
        None => {
            let middle = region.pixels().get(region.len() / 2).copied().unwrap_or(0);
            warn!(
                "No label box fits region of {} pixels, falling back to pixel {}",
                region.len(),
                middle
            );
            middle
        }
    };

    let channels = image
        .pixel(anchor_index)
        .ok_or(ColorByNumberError::PixelOutOfBounds {
            index: anchor_index,
            pixel_count: image.pixel_count(),
        })?;
    let color = Color::from_channels(channels)?;
    debug!("Sampled {} at pixel {}", color.key(), anchor_index);

    Ok(RegionSample {
        entry: RegionColorEntry { anchor_index, color },
        label,
    })
}
