//! Color quantization by cutting a minimum spanning tree.
//!
//! The distinct colors of an image form the vertices of a complete graph weighted by Euclidean
//! RGB distance. Removing the `k - 1` heaviest edges of that graph's minimum spanning tree
//! splits the colors into `k` clusters, each of which is then painted with its mean color.
//!
//! ```
//! use mstquant::{Image, Quantizer};
//!
//! let image = Image::new(2, 2, vec![[0, 0, 0], [0, 0, 0], [255, 255, 255], [10, 10, 10]])?;
//! let result = Quantizer::new(2).quantize(&image)?;
//! assert_eq!(result.distinct_count(), 3);
//! assert_eq!(result.image().pixels, vec![[5, 5, 5], [5, 5, 5], [255, 255, 255], [5, 5, 5]]);
//! # Ok::<(), mstquant::Error>(())
//! ```

pub mod cluster;
pub mod color_index;
pub mod error;
pub mod image;
pub mod mst;
pub mod palette;
pub mod quantize;
pub mod remap;
pub mod smooth;
pub mod union_find;

/// An `[R, G, B]` color.
pub type Color = [u8; 3];

/// Index of a distinct color, in order of first appearance in the image.
pub type ColorId = u32;

pub use crate::{
    cluster::{cut_clusters, Clusters},
    color_index::{extract_distinct_colors, ColorIndex},
    error::Error,
    image::Image,
    mst::{build_mst, MstEdge, SpanningTree},
    palette::aggregate_representatives,
    quantize::{Quantization, Quantizer},
    remap::remap_pixels,
    smooth::gaussian_blur,
};
