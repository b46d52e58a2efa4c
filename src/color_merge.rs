// src/color_merge.rs - Unify regions whose sampled colors are indistinguishable

use log::info;

use crate::color_sampling::RegionColorEntry;

/// Merge similar colors in place with a single forward pairwise sweep.
///
/// For every pair `i < j` (in index order) whose current colors are within
/// `threshold`, entry `j` takes entry `i`'s current color. Distances are measured
/// on already rewritten colors, so this is not a transitive closure: a chain
/// a~b~c can leave a and c apart depending on order. Returns the number of
/// rewrites that changed a color.
pub fn merge_similar_colors(entries: &mut [RegionColorEntry], threshold: f64) -> usize {
    let mut changed = 0;

    for i in 0..entries.len() {
        for j in (i + 1)..entries.len() {
            let source = entries[i].color;
            if source.distance(&entries[j].color) <= threshold {
                if entries[j].color != source {
                    changed += 1;
                }
                entries[j].color = source;
            }
        }
    }

    info!("Color merge: {} of {} entries rewritten (threshold {:.1})", changed, entries.len(), threshold);
    changed
}
