use std::collections::HashSet;

use color_by_number_lib::{
    label_regions, merge_similar_colors, place_label, segment_regions, Bitmap, Color, ColorImage,
    ColorNumberMap, Config, FloodFillParams, LabelBox, OccupancyGrid, RegionColorEntry,
};

fn rgb_image(width: u32, height: u32, paint: impl Fn(u32, u32) -> [u8; 3]) -> ColorImage {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&paint(x, y));
        }
    }
    ColorImage::new(width, height, 3, data).unwrap()
}

/// Grid of flat cells separated by one-pixel black contour lines
fn contour_grid(width: u32, height: u32, cell: u32) -> Bitmap {
    let mut bitmap = Bitmap::filled(width, height, 255);
    for y in 0..height {
        for x in 0..width {
            if x % cell == 0 || y % cell == 0 {
                bitmap.set(bitmap.index_of(x, y), 0);
            }
        }
    }
    bitmap
}

#[test]
fn all_white_ten_by_ten() {
    let bitmap = Bitmap::filled(10, 10, 255);
    let seg = segment_regions(
        &bitmap,
        &FloodFillParams {
            tolerance: 0,
            ..FloodFillParams::default()
        },
    );
    assert_eq!(seg.regions.len(), 1);
    let region = &seg.regions.regions()[0];
    assert_eq!(region.len(), 100);
    assert_eq!(
        place_label(region, 10, 0.3),
        Some(LabelBox {
            x: 0,
            y: 0,
            width: 2,
            height: 2
        })
    );
}

#[test]
fn grid_partition_and_minimum_size() {
    // 10-pixel cells give 9x9 = 81 pixel interiors
    let bitmap = contour_grid(41, 41, 10);
    let image = rgb_image(41, 41, |x, y| [(x / 10 * 60) as u8, (y / 10 * 60) as u8, 0]);
    let config = Config {
        flood_fill_tolerance: 0,
        similar_color_threshold: 10.0,
        ..Config::default()
    };
    let labeled = label_regions(&bitmap, &image, &config).unwrap();

    assert_eq!(labeled.regions.len(), 16);
    let mut seen = HashSet::new();
    for region in labeled.regions.regions() {
        assert!(region.len() >= config.min_region_pixel_count);
        for &index in region.pixels() {
            assert!(seen.insert(index));
        }
    }

    // Every cell has a distinct color, so numbers are 1..=16 in region order
    assert_eq!(labeled.numbers.len(), 16);
    for (id, _) in labeled.regions.iter() {
        assert_eq!(labeled.number_of(id), Some(id.0 as u32 + 1));
    }
}

#[test]
fn label_boxes_stay_inside_their_regions() {
    let bitmap = contour_grid(64, 48, 16);
    let image = rgb_image(64, 48, |_, _| [30, 60, 90]);
    let config = Config {
        flood_fill_tolerance: 0,
        ..Config::default()
    };
    let labeled = label_regions(&bitmap, &image, &config).unwrap();
    assert!(!labeled.regions.is_empty());

    for (id, region) in labeled.regions.iter() {
        let label = labeled.labels[id.0].expect("square cells always fit a label");
        let grid = OccupancyGrid::from_region(region, 64);
        assert!(grid.is_block_occupied(label.x, label.y, label.width, label.height));
        assert_eq!(labeled.entries[id.0].anchor_index, label.anchor_index(64));
    }

    // One flat color means one number
    assert_eq!(labeled.numbers.len(), 1);
}

#[test]
fn merge_then_number_example() {
    let mut entries = vec![
        RegionColorEntry {
            anchor_index: 0,
            color: Color::Rgb([10, 10, 10]),
        },
        RegionColorEntry {
            anchor_index: 50,
            color: Color::Rgb([12, 11, 9]),
        },
    ];
    merge_similar_colors(&mut entries, 5.0);
    assert_eq!(entries[0].color, entries[1].color);

    let numbers = ColorNumberMap::from_colors(entries.iter().map(|e| &e.color));
    assert_eq!(numbers.len(), 1);
    assert_eq!(numbers.number_of(&Color::Rgb([10, 10, 10])), Some(1));
}

#[test]
fn runs_are_deterministic() {
    let bitmap = contour_grid(50, 50, 12);
    let image = rgb_image(50, 50, |x, y| [(x * 5) as u8, (y * 5) as u8, ((x + y) * 2) as u8]);
    let config = Config {
        flood_fill_tolerance: 0,
        similar_color_threshold: 40.0,
        ..Config::default()
    };
    let first = label_regions(&bitmap, &image, &config).unwrap();
    let second = label_regions(&bitmap, &image, &config).unwrap();
    assert_eq!(first.entries, second.entries);
    assert_eq!(first.numbers, second.numbers);

    let mut numbers: Vec<u32> = first.numbers.iter().map(|(_, n)| n).collect();
    numbers.sort_unstable();
    assert_eq!(numbers, (1..=first.numbers.len() as u32).collect::<Vec<_>>());
}
