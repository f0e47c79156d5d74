//! Recoloring an image with its cluster representatives.

use rayon::prelude::*;

use crate::{cluster::Clusters, color_index::ColorIndex, image::Image, Color};

/// Replaces every pixel with the representative color of the cluster its color belongs to.
///
/// Colors missing from `index` are passed through unchanged; that only happens if the index
/// was built from a different image.
pub fn remap_pixels(
    image: &Image<Color>,
    index: &ColorIndex,
    clusters: &Clusters,
    representatives: &[Color],
) -> Image<Color> {
    let mut pixels = vec![[0; 3]; image.pixels.len()];
    let row_len = image.width.max(1);

    pixels
        .par_chunks_mut(row_len)
        .zip(image.pixels.par_chunks(row_len))
        .for_each(|(dst, src)| {
            for (out, &color) in dst.iter_mut().zip(src) {
                *out = match index.id_of(color) {
                    Some(id) => representatives[clusters.root_of(id) as usize],
                    None => color,
                };
            }
        });

    Image {
        width: image.width,
        height: image.height,
        pixels,
    }
}
