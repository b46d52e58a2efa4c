use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use csv::Writer;
use serde::Serialize;

use crate::color_sampling::Color;
use crate::errors::Result;
use crate::image_io::save_bitmap;
use crate::numbering::ColorNumberMap;
use crate::pipeline::LabeledRegions;
use crate::raster::Bitmap;

/// One entry of the color-number JSON file
#[derive(Debug, Serialize)]
struct ColorNumberRecord<'a> {
    number: u32,
    key: String,
    color: &'a Color,
}

fn output_path(output_dir: &Path, subdir: &str, filename: &str, extension: &str) -> Result<PathBuf> {
    let path = output_dir.join(subdir).join(format!("{}.{}", filename, extension));

    // Create directory if it doesn't exist
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    Ok(path)
}

/// Write one row per region: size, anchor, label box, merged color and number
pub fn write_regions_csv<P: AsRef<Path>>(
    labeled: &LabeledRegions,
    image_width: u32,
    output_dir: P,
    filename: &str,
) -> Result<PathBuf> {
    let output_path = output_path(output_dir.as_ref(), "regions", filename, "csv")?;
    let mut writer = Writer::from_path(&output_path)?;

    writer.write_record([
        "Region_Index",
        "Pixel_Count",
        "Anchor_X",
        "Anchor_Y",
        "Label_X",
        "Label_Y",
        "Label_Width",
        "Label_Height",
        "Color",
        "Number",
    ])?;

    let width = image_width.max(1) as usize;
    for (id, region) in labeled.regions.iter() {
        let entry = &labeled.entries[id.0];
        let label = labeled.labels[id.0];
        let optional = |value: Option<u32>| value.map(|v| v.to_string()).unwrap_or_default();

        writer.write_record(&[
            id.0.to_string(),
            region.len().to_string(),
            (entry.anchor_index % width).to_string(),
            (entry.anchor_index / width).to_string(),
            optional(label.map(|l| l.x)),
            optional(label.map(|l| l.y)),
            optional(label.map(|l| l.width)),
            optional(label.map(|l| l.height)),
            entry.color.key(),
            optional(labeled.number_of(id)),
        ])?;
    }

    writer.flush()?;

    Ok(output_path)
}

/// Write the color-number map as a JSON array in number order
pub fn write_color_numbers_json<P: AsRef<Path>>(
    numbers: &ColorNumberMap,
    output_dir: P,
    filename: &str,
) -> Result<PathBuf> {
    let output_path = output_path(output_dir.as_ref(), "colors", filename, "json")?;

    let records: Vec<ColorNumberRecord> = numbers
        .iter()
        .map(|(color, number)| ColorNumberRecord {
            number,
            key: color.key(),
            color,
        })
        .collect();

    let writer = BufWriter::new(File::create(&output_path)?);
    serde_json::to_writer_pretty(writer, &records)?;

    Ok(output_path)
}

/// Write the printable outline as a grayscale PNG
pub fn write_outline_png<P: AsRef<Path>>(outline: &Bitmap, output_dir: P, filename: &str) -> Result<PathBuf> {
    let output_path = output_path(output_dir.as_ref(), "outline", filename, "png")?;
    save_bitmap(outline, &output_path)?;
    Ok(output_path)
}
