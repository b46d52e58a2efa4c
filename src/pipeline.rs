// src/pipeline.rs - Segmentation, sampling, merge and numbering for one image

use std::path::PathBuf;

use log::{debug, info};
use rayon::prelude::*;

use crate::color_merge::merge_similar_colors;
use crate::color_sampling::{sample_region_color, RegionColorEntry, RegionSample};
use crate::config::Config;
use crate::contour::{contour_outline, edge_strength, region_bitmap_from_edges};
use crate::errors::{ColorByNumberError, Result};
use crate::image_io::{save_bitmap, save_image, InputImage};
use crate::image_utils::{create_label_debug_image, LABEL_OUTLINE_RGB};
use crate::label_placement::LabelBox;
use crate::numbering::ColorNumberMap;
use crate::output::{write_color_numbers_json, write_outline_png, write_regions_csv};
use crate::raster::{Bitmap, ColorImage};
use crate::segmentation::{segment_regions, RegionArena, RegionId};

/// Outputs of the region pipeline, all indexed by region in segmentation order
#[derive(Debug, Clone)]
pub struct LabeledRegions {
    pub regions: RegionArena,
    /// Anchor and merged color per region
    pub entries: Vec<RegionColorEntry>,
    /// Label box per region, `None` where the fallback anchor was used
    pub labels: Vec<Option<LabelBox>>,
    pub numbers: ColorNumberMap,
    /// Bitmap with every visited pixel replaced
    pub marked: Bitmap,
}

impl LabeledRegions {
    /// Number printed inside the given region
    pub fn number_of(&self, id: RegionId) -> Option<u32> {
        self.entries
            .get(id.0)
            .and_then(|entry| self.numbers.number_of(&entry.color))
    }
}

/// Summary of one processed image file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSummary {
    pub filename: String,
    pub region_count: usize,
    pub color_count: usize,
    pub outline_path: PathBuf,
}

/// Run the full region pipeline on an in-memory bitmap and color image
pub fn label_regions(bitmap: &Bitmap, image: &ColorImage, config: &Config) -> Result<LabeledRegions> {
    if bitmap.dimensions() != image.dimensions() {
        return Err(ColorByNumberError::InvalidDimensions {
            bitmap: bitmap.dimensions(),
            image: image.dimensions(),
        });
    }
    config.validate()?;

    // Step 1: Flood fill segmentation (sequential by nature)
    let segmentation = segment_regions(bitmap, &config.flood_fill_params());
    let regions = segmentation.regions;

    // Step 2: Sample each region; independent per region once segmentation is final
    let samples: Vec<RegionSample> = if config.use_parallel {
        regions
            .regions()
            .par_iter()
            .map(|region| sample_region_color(region, image, config.label_scale))
            .collect::<Result<Vec<_>>>()?
    } else {
        regions
            .regions()
            .iter()
            .map(|region| sample_region_color(region, image, config.label_scale))
            .collect::<Result<Vec<_>>>()?
    };

    let fallback_count = samples.iter().filter(|s| s.label.is_none()).count();
    let (mut entries, labels): (Vec<RegionColorEntry>, Vec<Option<LabelBox>>) =
        samples.into_iter().map(|s| (s.entry, s.label)).unzip();

    // Step 3: Forward pairwise merge of similar colors
    merge_similar_colors(&mut entries, config.similar_color_threshold);

    // Step 4: Number distinct merged colors
    let numbers = ColorNumberMap::from_colors(entries.iter().map(|e| &e.color));

    info!(
        "Labeled {} regions with {} colors ({} fallback anchors)",
        regions.len(),
        numbers.len(),
        fallback_count
    );

    Ok(LabeledRegions {
        regions,
        entries,
        labels,
        numbers,
        marked: segmentation.marked,
    })
}

/// Process a single image file and write its region table, color map and outline
pub fn process_image(
    input_image: InputImage,
    contour_bitmap: Option<Bitmap>,
    config: &Config,
    debug: bool,
) -> Result<ImageSummary> {
    config.validate()?;

    let InputImage { image, path, filename } = input_image;
    debug!("Processing {} from {}", filename, path.display());

    // Step 1: Edge strength feeds both the derived bitmap and the printable outline
    let edges = edge_strength(&image, config.gaussian_sigma, config.dilation_radius);
    let bitmap = match contour_bitmap {
        Some(bitmap) => bitmap,
        None => region_bitmap_from_edges(&edges),
    };
    let outline = contour_outline(
        &edges,
        config.outline_sharpen_sigma,
        config.dilation_radius,
        config.outline_threshold,
    );

    // Step 2: Region pipeline
    let color_image = ColorImage::from_dynamic(&image);
    let labeled = label_regions(&bitmap, &color_image, config)?;

    // Step 3: Outputs
    write_regions_csv(&labeled, color_image.width(), &config.output_base_dir, &filename)?;
    write_color_numbers_json(&labeled.numbers, &config.output_base_dir, &filename)?;
    let outline_path = write_outline_png(&outline, &config.output_base_dir, &filename)?;

    if debug {
        let debug_dir = PathBuf::from(&config.output_base_dir).join("debug");
        std::fs::create_dir_all(&debug_dir)?;

        save_bitmap(&bitmap, debug_dir.join(format!("{}_contour.png", filename)))?;
        let overlay = create_label_debug_image(&labeled.marked, &labeled.labels, LABEL_OUTLINE_RGB);
        save_image(&overlay, debug_dir.join(format!("{}_labels.png", filename)))?;
    }

    Ok(ImageSummary {
        filename,
        region_count: labeled.regions.len(),
        color_count: labeled.numbers.len(),
        outline_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_sampling::Color;
    use image::{DynamicImage, Rgb, RgbImage};

    fn config() -> Config {
        Config {
            flood_fill_tolerance: 0,
            similar_color_threshold: 5.0,
            use_parallel: false,
            ..Config::default()
        }
    }

    /// Bitmap with white rectangles on black, and an RGB image painting each
    /// rectangle with its color
    fn scene(width: u32, height: u32, rects: &[((u32, u32, u32, u32), [u8; 3])]) -> (Bitmap, ColorImage) {
        let mut bitmap = Bitmap::filled(width, height, 0);
        let mut data = vec![0u8; (width * height * 3) as usize];
        for &((x, y, w, h), color) in rects {
            bitmap.fill_rect(x, y, w, h, 255);
            for py in y..y + h {
                for px in x..x + w {
                    let i = ((py * width + px) * 3) as usize;
                    data[i..i + 3].copy_from_slice(&color);
                }
            }
        }
        (bitmap, ColorImage::new(width, height, 3, data).unwrap())
    }

    #[test]
    fn similar_regions_share_a_number() {
        let (bitmap, image) = scene(
            30,
            12,
            &[((0, 0, 10, 10), [10, 10, 10]), ((12, 0, 10, 10), [12, 11, 9])],
        );
        let labeled = label_regions(&bitmap, &image, &config()).unwrap();
        assert_eq!(labeled.regions.len(), 2);
        assert_eq!(labeled.entries[1].color, Color::Rgb([10, 10, 10]));
        assert_eq!(labeled.numbers.len(), 1);
        assert_eq!(labeled.number_of(RegionId(0)), Some(1));
        assert_eq!(labeled.number_of(RegionId(1)), Some(1));
    }

    #[test]
    fn distinct_regions_numbered_in_scan_order() {
        let (bitmap, image) = scene(
            40,
            30,
            &[
                ((0, 0, 10, 10), [200, 0, 0]),
                ((20, 0, 10, 10), [0, 200, 0]),
                ((0, 15, 10, 10), [200, 0, 0]),
            ],
        );
        let labeled = label_regions(&bitmap, &image, &config()).unwrap();
        assert_eq!(labeled.regions.len(), 3);
        assert_eq!(labeled.number_of(RegionId(0)), Some(1));
        assert_eq!(labeled.number_of(RegionId(1)), Some(2));
        assert_eq!(labeled.number_of(RegionId(2)), Some(1));
        assert!(labeled.labels.iter().all(|l| l.is_some()));
    }

    #[test]
    fn mismatched_dimensions_are_rejected() {
        let bitmap = Bitmap::filled(10, 10, 255);
        let image = ColorImage::new(10, 9, 3, vec![0; 270]).unwrap();
        let err = label_regions(&bitmap, &image, &config()).unwrap_err();
        assert!(matches!(err, ColorByNumberError::InvalidDimensions { .. }));
    }

    #[test]
    fn unsupported_channels_fail_the_call() {
        let bitmap = Bitmap::filled(10, 10, 255);
        let image = ColorImage::new(10, 10, 2, vec![0; 200]).unwrap();
        let err = label_regions(&bitmap, &image, &config()).unwrap_err();
        assert!(matches!(err, ColorByNumberError::UnsupportedChannelLayout(2)));
    }

    #[test]
    fn no_regions_is_an_empty_result() {
        let (bitmap, image) = scene(20, 20, &[((0, 0, 5, 5), [1, 2, 3])]);
        let labeled = label_regions(&bitmap, &image, &config()).unwrap();
        assert!(labeled.regions.is_empty());
        assert!(labeled.entries.is_empty());
        assert!(labeled.numbers.is_empty());
    }

    #[test]
    fn parallel_matches_sequential() {
        let (bitmap, image) = scene(
            60,
            40,
            &[
                ((0, 0, 12, 12), [40, 40, 40]),
                ((20, 0, 15, 9), [43, 42, 40]),
                ((40, 0, 9, 30), [0, 0, 250]),
                ((0, 20, 30, 15), [40, 40, 40]),
            ],
        );
        let sequential = label_regions(&bitmap, &image, &config()).unwrap();
        let parallel = label_regions(
            &bitmap,
            &image,
            &Config {
                use_parallel: true,
                ..config()
            },
        )
        .unwrap();
        assert_eq!(sequential.entries, parallel.entries);
        assert_eq!(sequential.labels, parallel.labels);
        assert_eq!(sequential.numbers, parallel.numbers);
    }

    fn input_image(filename: &str) -> InputImage {
        // Black left half, white right half
        let rgb = RgbImage::from_fn(40, 20, |x, _| {
            if x < 20 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        InputImage {
            image: DynamicImage::ImageRgb8(rgb),
            path: PathBuf::from(format!("{}.png", filename)),
            filename: filename.to_string(),
        }
    }

    fn temp_output(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("cbn_pipeline_{}_{}", name, std::process::id()))
    }

    #[test]
    fn invalid_config_fails_before_any_work() {
        let dir = temp_output("invalid");
        let config = Config {
            gaussian_sigma: 0.0,
            output_base_dir: dir.to_string_lossy().into_owned(),
            ..config()
        };
        let err = process_image(input_image("halves"), None, &config, false).unwrap_err();
        assert!(matches!(err, ColorByNumberError::Config(_)));
        assert!(!dir.exists());
    }

    #[test]
    fn process_image_writes_tables_and_outline() {
        let dir = temp_output("outputs");
        let config = Config {
            output_base_dir: dir.to_string_lossy().into_owned(),
            ..config()
        };
        let summary = process_image(input_image("halves"), None, &config, false).unwrap();
        let regions_exist = dir.join("regions").join("halves.csv").exists();
        let colors_exist = dir.join("colors").join("halves.json").exists();
        let outline = image::open(&summary.outline_path).unwrap().to_luma8();
        let _ = std::fs::remove_dir_all(&dir);

        assert!(regions_exist);
        assert!(colors_exist);
        assert_eq!(summary.outline_path, dir.join("outline").join("halves.png"));
        assert_eq!(summary.region_count, 2);
        assert_eq!(summary.color_count, 2);
        assert_eq!(outline.dimensions(), (40, 20));
        assert!(outline.get_pixel(19, 10)[0] < 200);
        assert_eq!(outline.get_pixel(2, 10)[0], 255);
    }
}
