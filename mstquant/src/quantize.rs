//! The full color reduction pipeline.

use std::time::Instant;

use tracing::{debug, debug_span, info};

use crate::{
    cluster::{cut_clusters, Clusters},
    color_index::extract_distinct_colors,
    error::Error,
    image::Image,
    mst::build_mst,
    palette::{aggregate_representatives, palette},
    remap::remap_pixels,
    Color,
};

/// Runs `f` inside a span named after the stage and logs how long it took.
fn stage<T>(name: &'static str, f: impl FnOnce() -> T) -> T {
    let _span = debug_span!("stage", stage = name).entered();
    let start = Instant::now();
    let result = f();
    debug!(elapsed = ?start.elapsed(), "{name} done");
    result
}

/// Reduces images to a fixed number of colors.
///
/// Every call to [`Quantizer::quantize`] builds its own working tables, so a single quantizer
/// may be shared between threads.
#[derive(Debug, Clone, Copy)]
pub struct Quantizer {
    colors: usize,
    max_distinct_colors: Option<usize>,
}

impl Quantizer {
    /// Creates a quantizer producing at most `colors` colors. The count is validated against
    /// each image's distinct color count when quantizing.
    pub fn new(colors: usize) -> Self {
        Self {
            colors,
            max_distinct_colors: None,
        }
    }

    /// Refuses images with more than `limit` distinct colors. Building the spanning tree takes
    /// time quadratic in the distinct color count, so this bounds the cost of a single call.
    pub fn with_max_distinct_colors(self, limit: usize) -> Self {
        Self {
            max_distinct_colors: Some(limit),
            ..self
        }
    }

    pub fn quantize(&self, image: &Image<Color>) -> Result<Quantization, Error> {
        let start = Instant::now();

        let (colors, index) = stage("extract distinct colors", || extract_distinct_colors(image));
        if let Some(limit) = self.max_distinct_colors {
            if colors.len() > limit {
                return Err(Error::TooManyColors {
                    distinct: colors.len(),
                    limit,
                });
            }
        }
        let tree = stage("build spanning tree", || build_mst(&colors));
        let clusters = stage("cut clusters", || cut_clusters(&tree, self.colors))?;
        let representatives = stage("aggregate representatives", || {
            aggregate_representatives(&colors, &clusters)
        });
        let output = stage("remap pixels", || {
            remap_pixels(image, &index, &clusters, &representatives)
        });

        let quantization = Quantization {
            distinct_count: colors.len(),
            mst_weight: tree.total_weight,
            palette: palette(&clusters, &representatives),
            clusters,
            image: output,
        };
        info!(
            distinct = quantization.distinct_count,
            colors = quantization.palette.len(),
            mst_weight = quantization.rounded_mst_weight(),
            elapsed = ?start.elapsed(),
            "quantized image"
        );
        Ok(quantization)
    }
}

/// The result of quantizing an image.
#[derive(Debug, Clone)]
pub struct Quantization {
    distinct_count: usize,
    mst_weight: f64,
    palette: Vec<Color>,
    clusters: Clusters,
    image: Image<Color>,
}

impl Quantization {
    /// The number of distinct colors in the source image.
    pub fn distinct_count(&self) -> usize {
        self.distinct_count
    }

    /// Total weight of the spanning tree over the source image's colors.
    pub fn mst_weight(&self) -> f64 {
        self.mst_weight
    }

    /// [`Self::mst_weight`] rounded to two decimal places, for display.
    pub fn rounded_mst_weight(&self) -> f64 {
        (self.mst_weight * 100.0).round() / 100.0
    }

    /// Representative colors, one per cluster.
    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    pub fn clusters(&self) -> &Clusters {
        &self.clusters
    }

    pub fn image(&self) -> &Image<Color> {
        &self.image
    }
}
