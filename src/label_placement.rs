// src/label_placement.rs - Search for a label rectangle fully inside a region

use serde::Serialize;
use std::f64::consts::PI;

use crate::segmentation::Region;

/// Top-left anchored rectangle in image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabelBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl LabelBox {
    /// Flat index of the top-left pixel
    #[inline]
    pub fn anchor_index(&self, image_width: u32) -> usize {
        self.y as usize * image_width as usize + self.x as usize
    }

    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && y >= self.y && x - self.x < self.width && y - self.y < self.height
    }
}

/// Side length of the label footprint for a region of `area` pixels.
///
/// Approximates a label inscribed in a circle of the same area:
/// `floor(scale * sqrt(area / pi))`.
pub fn label_side(area: usize, scale: f64) -> u32 {
    (scale * (area as f64 / PI).sqrt()).floor() as u32
}

/// Dense occupancy of one region over its bounding box, with a summed-area table
/// for constant-time rectangle checks. Built on demand and dropped after placement.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    origin_x: u32,
    origin_y: u32,
    width: u32,
    height: u32,
    /// (width + 1) x (height + 1) prefix sums, first row and column zero
    sums: Vec<usize>,
}

impl OccupancyGrid {
    pub fn from_region(region: &Region, image_width: u32) -> Self {
        let image_width = image_width.max(1) as usize;
        let coords = |index: usize| ((index % image_width) as u32, (index / image_width) as u32);

        let Some(&first) = region.pixels().first() else {
            return Self {
                origin_x: 0,
                origin_y: 0,
                width: 0,
                height: 0,
                sums: vec![0],
            };
        };

        let (fx, fy) = coords(first);
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (fx, fy, fx, fy);
        for &index in region.pixels() {
            let (x, y) = coords(index);
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        let width = max_x - min_x + 1;
        let height = max_y - min_y + 1;
        let stride = width as usize;
        let mut cells = vec![0usize; stride * height as usize];
        for &index in region.pixels() {
            let (x, y) = coords(index);
            cells[(y - min_y) as usize * stride + (x - min_x) as usize] = 1;
        }

        let sum_stride = stride + 1;
        let mut sums = vec![0usize; sum_stride * (height as usize + 1)];
        for y in 0..height as usize {
            let mut row_sum = 0;
            for x in 0..stride {
                row_sum += cells[y * stride + x];
                sums[(y + 1) * sum_stride + x + 1] = sums[y * sum_stride + x + 1] + row_sum;
            }
        }

        Self {
            origin_x: min_x,
            origin_y: min_y,
            width,
            height,
            sums,
        }
    }

    /// Bounding box of the region as (x, y, width, height)
    pub fn bounds(&self) -> (u32, u32, u32, u32) {
        (self.origin_x, self.origin_y, self.width, self.height)
    }

    /// Number of occupied cells in a rectangle given in grid-local coordinates
    #[inline]
    fn local_sum(&self, x: u32, y: u32, width: u32, height: u32) -> usize {
        let stride = self.width as usize + 1;
        let (x0, y0) = (x as usize, y as usize);
        let (x1, y1) = (x0 + width as usize, y0 + height as usize);
        self.sums[y1 * stride + x1] + self.sums[y0 * stride + x0]
            - self.sums[y0 * stride + x1]
            - self.sums[y1 * stride + x0]
    }

    /// Whether the image pixel (x, y) belongs to the region
    pub fn is_occupied(&self, x: u32, y: u32) -> bool {
        self.is_block_occupied(x, y, 1, 1)
    }

    /// Whether every pixel of the rectangle (image coordinates) belongs to the region
    pub fn is_block_occupied(&self, x: u32, y: u32, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 || x < self.origin_x || y < self.origin_y {
            return false;
        }
        let (lx, ly) = (x - self.origin_x, y - self.origin_y);
        if lx as u64 + width as u64 > self.width as u64 || ly as u64 + height as u64 > self.height as u64 {
            return false;
        }
        self.local_sum(lx, ly, width, height) == width as usize * height as usize
    }

    /// First top-left position in row-major image order where a label of `side`
    /// fits. Bounds are inclusive, so the returned box is `(side + 1)` square.
    pub fn find_label_box(&self, side: u32) -> Option<LabelBox> {
        let extent = side.checked_add(1)?;
        if extent > self.width || extent > self.height {
            return None;
        }

        for y in 0..=(self.height - extent) {
            for x in 0..=(self.width - extent) {
                if self.local_sum(x, y, extent, extent) == extent as usize * extent as usize {
                    return Some(LabelBox {
                        x: self.origin_x + x,
                        y: self.origin_y + y,
                        width: extent,
                        height: extent,
                    });
                }
            }
        }

        None
    }
}

/// Find the label box for a region, sized from its area
pub fn place_label(region: &Region, image_width: u32, scale: f64) -> Option<LabelBox> {
    let side = label_side(region.len(), scale);
    OccupancyGrid::from_region(region, image_width).find_label_box(side)
}
