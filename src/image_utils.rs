// src/image_utils.rs - Debug overlay drawing for placed label boxes

use image::{Rgb, RgbImage};

use crate::label_placement::LabelBox;
use crate::raster::Bitmap;

/// Color used to outline label boxes in debug images
pub const LABEL_OUTLINE_RGB: [u8; 3] = [255, 0, 255];

/// Create a debug image from a bitmap with every label box outlined in color
pub fn create_label_debug_image(
    bitmap: &Bitmap,
    labels: &[Option<LabelBox>],
    color: [u8; 3],
) -> RgbImage {
    let (width, height) = bitmap.dimensions();
    let mut debug_image = RgbImage::from_fn(width, height, |x, y| {
        let v = bitmap.get(bitmap.index_of(x, y));
        Rgb([v, v, v])
    });

    for label in labels.iter().flatten() {
        for y in label.y..label.y + label.height {
            for x in label.x..label.x + label.width {
                let on_edge = x == label.x
                    || y == label.y
                    || x + 1 == label.x + label.width
                    || y + 1 == label.y + label.height;
                if on_edge && x < width && y < height {
                    debug_image.put_pixel(x, y, Rgb(color));
                }
            }
        }
    }

    debug_image
}
