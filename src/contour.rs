// src/contour.rs - Derive the contour-region bitmap and printable outline from a color image

use image::{DynamicImage, GrayImage, Luma};
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::{grayscale_dilate, Mask};
use log::debug;

use crate::raster::Bitmap;

/// Edge strength of a color image: `dilate(blur(gray)) - blur(gray)`, saturating.
///
/// Zero on flat areas, large across color boundaries. `dilation_radius` 2 is a
/// 5x5 square kernel.
pub fn edge_strength(image: &DynamicImage, sigma: f32, dilation_radius: u8) -> GrayImage {
    let gray = gaussian_blur_f32(&image.to_luma8(), sigma);
    let dilated = grayscale_dilate(&gray, &Mask::square(dilation_radius));

    let mut edges = GrayImage::new(gray.width(), gray.height());
    for (x, y, pixel) in edges.enumerate_pixels_mut() {
        let diff = dilated.get_pixel(x, y)[0].saturating_sub(gray.get_pixel(x, y)[0]);
        *pixel = Luma([diff]);
    }
    edges
}

/// Region bitmap from precomputed edge strength: flat interiors 255, edges darker
pub fn region_bitmap_from_edges(edges: &GrayImage) -> Bitmap {
    let mut contour = edges.clone();
    image::imageops::invert(&mut contour);
    Bitmap::from(contour)
}

/// Flat interiors come out near 255, edges darker.
///
/// Steps: grayscale, Gaussian blur, `dilate(gray) - gray` (saturating), invert.
pub fn contour_region_bitmap(image: &DynamicImage, sigma: f32, dilation_radius: u8) -> Bitmap {
    let bitmap = region_bitmap_from_edges(&edge_strength(image, sigma, dilation_radius));
    debug!(
        "Contour bitmap {}x{} (sigma {:.1}, dilation radius {})",
        bitmap.width(),
        bitmap.height(),
        sigma,
        dilation_radius
    );
    bitmap
}

/// Printable outline: dark contour lines on white.
///
/// The edge strength is sharpened with an unsharp mask
/// (`edges + 2 * (edges - blur(edges))`). Pixels whose dilated sharpened value
/// stays below `threshold` are cleared, then the result is inverted.
pub fn contour_outline(edges: &GrayImage, sharpen_sigma: f32, dilation_radius: u8, threshold: u8) -> Bitmap {
    let blurred = gaussian_blur_f32(edges, sharpen_sigma);

    let mut sharpened = GrayImage::new(edges.width(), edges.height());
    for (x, y, pixel) in sharpened.enumerate_pixels_mut() {
        let edge = edges.get_pixel(x, y)[0];
        let detail = edge.saturating_sub(blurred.get_pixel(x, y)[0]);
        *pixel = Luma([edge.saturating_add(detail.saturating_mul(2))]);
    }

    let dilated = grayscale_dilate(&sharpened, &Mask::square(dilation_radius));
    for (x, y, pixel) in sharpened.enumerate_pixels_mut() {
        if dilated.get_pixel(x, y)[0] < threshold {
            *pixel = Luma([0]);
        }
    }
    image::imageops::invert(&mut sharpened);

    debug!(
        "Contour outline {}x{} (sharpen sigma {:.1}, threshold {})",
        sharpened.width(),
        sharpened.height(),
        sharpen_sigma,
        threshold
    );

    Bitmap::from(sharpened)
}
