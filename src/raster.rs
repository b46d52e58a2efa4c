// src/raster.rs - Raw single-channel and color pixel containers

use image::{DynamicImage, GrayImage};

use crate::errors::{ColorByNumberError, Result};

/// Single-channel 8-bit raster addressed by row-major flat index (`y * width + x`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Bitmap {
    /// Wrap a raw buffer, checking that it holds exactly `width * height` bytes
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(ColorByNumberError::InvalidBuffer {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    /// Bitmap with every pixel set to `value`
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat index of an in-bounds coordinate
    #[inline]
    pub fn index_of(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Coordinate of a flat index
    #[inline]
    pub fn coords_of(&self, index: usize) -> (u32, u32) {
        let width = self.width as usize;
        ((index % width) as u32, (index / width) as u32)
    }

    #[inline]
    pub fn get(&self, index: usize) -> u8 {
        self.data[index]
    }

    #[inline]
    pub fn set(&mut self, index: usize, value: u8) {
        self.data[index] = value;
    }

    /// Set every pixel of a `width` x `height` rectangle, clipped to the bitmap
    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, value: u8) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        for py in y..y_end {
            for px in x..x_end {
                let index = self.index_of(px, py);
                self.data[index] = value;
            }
        }
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_gray_image(self) -> GrayImage {
        // Buffer length is checked on construction
        GrayImage::from_raw(self.width, self.height, self.data)
            .unwrap_or_else(|| GrayImage::new(0, 0))
    }
}

impl From<GrayImage> for Bitmap {
    fn from(image: GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: image.into_raw(),
        }
    }
}

/// Interleaved 8-bit color raster; channel `c` of pixel `i` lives at `i * channels + c`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorImage {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl ColorImage {
    /// Wrap a raw interleaved buffer. The channel count is not restricted here;
    /// unsupported layouts are rejected when a color is sampled.
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(ColorByNumberError::InvalidBuffer {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Convert a decoded image, keeping gray, RGB and RGBA layouts as they are
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        let (width, height, channels, data) = match image {
            DynamicImage::ImageLuma8(img) => (img.width(), img.height(), 1, img.as_raw().clone()),
            DynamicImage::ImageLumaA8(img) => (img.width(), img.height(), 2, img.as_raw().clone()),
            DynamicImage::ImageRgb8(img) => (img.width(), img.height(), 3, img.as_raw().clone()),
            DynamicImage::ImageRgba8(img) => (img.width(), img.height(), 4, img.as_raw().clone()),
            other => {
                let rgba = other.to_rgba8();
                (rgba.width(), rgba.height(), 4, rgba.into_raw())
            }
        };
        Self {
            width,
            height,
            channels,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// All channel bytes of one pixel, `None` past the end of the buffer
    #[inline]
    pub fn pixel(&self, index: usize) -> Option<&[u8]> {
        let channels = self.channels as usize;
        let start = index.checked_mul(channels)?;
        self.data.get(start..start.checked_add(channels)?)
    }

    /// Number of pixels (`width * height`)
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn bitmap_rejects_short_buffer() {
        let err = Bitmap::new(4, 4, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            ColorByNumberError::InvalidBuffer { expected: 16, actual: 15 }
        ));
    }

    #[test]
    fn bitmap_index_round_trip() {
        let bitmap = Bitmap::filled(7, 3, 0);
        let index = bitmap.index_of(5, 2);
        assert_eq!(index, 19);
        assert_eq!(bitmap.coords_of(index), (5, 2));
    }

    #[test]
    fn fill_rect_is_clipped() {
        let mut bitmap = Bitmap::filled(4, 4, 0);
        bitmap.fill_rect(2, 2, 10, 10, 9);
        assert_eq!(bitmap.as_raw().iter().filter(|&&v| v == 9).count(), 4);
        assert_eq!(bitmap.get(bitmap.index_of(3, 3)), 9);
        assert_eq!(bitmap.get(bitmap.index_of(1, 1)), 0);
    }

    #[test]
    fn color_image_keeps_rgb_layout() {
        let mut rgb = RgbImage::new(2, 1);
        rgb.put_pixel(1, 0, Rgb([1, 2, 3]));
        let image = ColorImage::from_dynamic(&DynamicImage::ImageRgb8(rgb));
        assert_eq!(image.channels(), 3);
        assert_eq!(image.pixel(1), Some(&[1, 2, 3][..]));
    }

    #[test]
    fn pixel_past_the_end_is_none() {
        let image = ColorImage::new(2, 2, 3, vec![7; 12]).unwrap();
        assert_eq!(image.pixel(3), Some(&[7, 7, 7][..]));
        assert_eq!(image.pixel(4), None);
        assert_eq!(image.pixel(usize::MAX), None);
    }

    #[test]
    fn gray_alpha_is_kept_as_two_channels() {
        let image = ColorImage::from_dynamic(&DynamicImage::new_luma_a8(3, 3));
        assert_eq!(image.channels(), 2);
    }
}
