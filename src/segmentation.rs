// src/segmentation.rs - Flood-fill extraction of flat regions from a contour bitmap

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::raster::Bitmap;

/// Order in which seed coordinates are visited
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanOrder {
    /// y outer, x inner
    #[default]
    RowMajor,
    /// x outer, y inner
    ColumnMajor,
}

/// Parameters of one segmentation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloodFillParams {
    /// Value of unfilled region pixels
    pub target_color: u8,
    /// Value written for visited pixels in the marked bitmap
    pub replacement_color: u8,
    /// Maximum absolute difference from `target_color` that still matches
    pub tolerance: u8,
    pub min_region_pixel_count: usize,
    pub scan_order: ScanOrder,
}

impl Default for FloodFillParams {
    fn default() -> Self {
        Self {
            target_color: 255,
            replacement_color: 124,
            tolerance: 0,
            min_region_pixel_count: 60,
            scan_order: ScanOrder::RowMajor,
        }
    }
}

/// Handle of a region inside a [`RegionArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub usize);

/// Flat pixel indices of one flood-fill expansion, in discovery order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pixels: Vec<usize>,
}

impl Region {
    pub fn new(pixels: Vec<usize>) -> Self {
        Self { pixels }
    }

    #[inline]
    pub fn pixels(&self) -> &[usize] {
        &self.pixels
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// Retained regions of one image, addressed by [`RegionId`]
#[derive(Debug, Clone, Default)]
pub struct RegionArena {
    width: u32,
    height: u32,
    regions: Vec<Region>,
}

impl RegionArena {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            regions: Vec::new(),
        }
    }

    pub fn push(&mut self, region: Region) -> RegionId {
        self.regions.push(region);
        RegionId(self.regions.len() - 1)
    }

    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RegionId, &Region)> {
        self.regions.iter().enumerate().map(|(i, r)| (RegionId(i), r))
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Dimensions of the image the regions were extracted from
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn into_regions(self) -> Vec<Region> {
        self.regions
    }
}

/// Result of a full segmentation scan
#[derive(Debug, Clone)]
pub struct Segmentation {
    pub regions: RegionArena,
    /// Copy of the input with every visited pixel set to the replacement value
    pub marked: Bitmap,
    pub discarded_regions: usize,
    pub discarded_pixels: usize,
}

/// Tracks which pixels have been claimed by any expansion
struct FillState<'a> {
    bitmap: &'a Bitmap,
    visited: Vec<bool>,
    stack: Vec<(u32, u32)>,
    target_color: u8,
    tolerance: u8,
}

impl<'a> FillState<'a> {
    fn new(bitmap: &'a Bitmap, params: &FloodFillParams) -> Self {
        Self {
            bitmap,
            visited: vec![false; bitmap.len()],
            stack: Vec::new(),
            target_color: params.target_color,
            tolerance: params.tolerance,
        }
    }

    #[inline]
    fn matches(&self, index: usize) -> bool {
        !self.visited[index] && self.bitmap.get(index).abs_diff(self.target_color) <= self.tolerance
    }

    /// Claim (x, y) if it is in bounds and matches, recording it in `region`
    #[inline]
    fn claim(&mut self, x: i64, y: i64, region: &mut Vec<usize>) {
        let (width, height) = self.bitmap.dimensions();
        if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        let index = self.bitmap.index_of(x, y);
        if !self.matches(index) {
            return;
        }
        self.visited[index] = true;
        region.push(index);
        self.stack.push((x, y));
    }

    /// Iterative 4-connected fill from one seed. Returns the claimed pixels in discovery order.
    fn fill_from(&mut self, seed_x: u32, seed_y: u32) -> Vec<usize> {
        let mut region = Vec::new();
        self.claim(seed_x as i64, seed_y as i64, &mut region);

        while let Some((x, y)) = self.stack.pop() {
            let (x, y) = (x as i64, y as i64);
            self.claim(x + 1, y, &mut region);
            self.claim(x - 1, y, &mut region);
            self.claim(x, y + 1, &mut region);
            self.claim(x, y - 1, &mut region);
        }

        region
    }
}

/// Flood fill a single seed on a fresh visited mask.
///
/// Useful for inspecting one region in isolation; [`segment_regions`] shares one
/// mask across all seeds so that each pixel is claimed at most once.
pub fn flood_fill(bitmap: &Bitmap, seed_x: u32, seed_y: u32, params: &FloodFillParams) -> Vec<usize> {
    let mut state = FillState::new(bitmap, params);
    state.fill_from(seed_x, seed_y)
}

/// Extract every maximal 4-connected region of target-colored pixels.
///
/// Seeds are visited over `[0, width) x [0, height)` in `params.scan_order`.
/// Regions smaller than `params.min_region_pixel_count` are dropped, but their
/// pixels stay claimed and never join a later region. The input bitmap is not
/// modified.
pub fn segment_regions(bitmap: &Bitmap, params: &FloodFillParams) -> Segmentation {
    let (width, height) = bitmap.dimensions();
    let mut state = FillState::new(bitmap, params);
    let mut arena = RegionArena::new(width, height);
    let mut discarded_regions = 0;
    let mut discarded_pixels = 0;

    let seeds: Box<dyn Iterator<Item = (u32, u32)>> = match params.scan_order {
        ScanOrder::RowMajor => Box::new((0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))),
        ScanOrder::ColumnMajor => Box::new((0..width).flat_map(move |x| (0..height).map(move |y| (x, y)))),
    };

    for (x, y) in seeds {
        if !state.matches(bitmap.index_of(x, y)) {
            continue;
        }

        let pixels = state.fill_from(x, y);
        if pixels.len() >= params.min_region_pixel_count {
            let count = pixels.len();
            let id = arena.push(Region::new(pixels));
            debug!("Region {} seeded at ({}, {}): {} pixels", id.0, x, y, count);
        } else {
            discarded_regions += 1;
            discarded_pixels += pixels.len();
        }
    }

    let mut marked = bitmap.clone();
    for (index, &visited) in state.visited.iter().enumerate() {
        if visited {
            marked.set(index, params.replacement_color);
        }
    }

    info!(
        "Segmentation: {} regions retained, {} discarded ({} pixels) on {}x{} bitmap",
        arena.len(),
        discarded_regions,
        discarded_pixels,
        width,
        height
    );

    Segmentation {
        regions: arena,
        marked,
        discarded_regions,
        discarded_pixels,
    }
}
