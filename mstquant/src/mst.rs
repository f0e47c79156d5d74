//! Minimum spanning tree over the distinct colors of an image.
//!
//! The graph is complete (every color is connected to every other color), so this uses the
//! dense variant of Prim's algorithm: no priority queue, just a linear scan of the frontier on
//! every step. That is Θ(D²) time and Θ(D) extra space for D colors.

use rayon::prelude::*;
use tracing::trace;

use crate::{Color, ColorId};

/// Frontier updates are split into chunks of at least this many colors. Below that the
/// overhead of spreading the work across threads isn't worth it.
const PARALLEL_MIN_LEN: usize = 4096;

/// The cheapest edge that connected a color to the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MstEdge {
    /// The tree vertex this color was attached to. The root is its own parent.
    pub parent: ColorId,
    pub weight: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SpanningTree {
    /// One edge per color, indexed by color id. Exactly one of them (the root's) has weight 0
    /// and points at itself.
    pub edges: Vec<MstEdge>,
    pub total_weight: f64,
}

impl SpanningTree {
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Iterates over `(child, edge)` pairs, skipping the root's self-edge.
    pub fn tree_edges(&self) -> impl Iterator<Item = (ColorId, &MstEdge)> {
        self.edges
            .iter()
            .enumerate()
            .map(|(child, edge)| (child as ColorId, edge))
            .filter(|(child, edge)| *child != edge.parent)
    }
}

/// Euclidean distance between two colors in RGB space.
pub fn distance(a: Color, b: Color) -> f64 {
    let dr = a[0] as f64 - b[0] as f64;
    let dg = a[1] as f64 - b[1] as f64;
    let db = a[2] as f64 - b[2] as f64;
    (dr * dr + dg * dg + db * db).sqrt()
}

fn lighter((weight_a, id_a): (f64, usize), (weight_b, id_b): (f64, usize)) -> (f64, usize) {
    // Ties go to the lower id so the result doesn't depend on how rayon splits the work.
    if weight_b < weight_a || (weight_b == weight_a && id_b < id_a) {
        (weight_b, id_b)
    } else {
        (weight_a, id_a)
    }
}

/// Builds the minimum spanning tree of `colors`, rooted at color 0.
pub fn build_mst(colors: &[Color]) -> SpanningTree {
    if colors.is_empty() {
        return SpanningTree::default();
    }

    let mut edges: Vec<_> = (0..colors.len())
        .map(|id| MstEdge {
            parent: id as ColorId,
            weight: f64::INFINITY,
        })
        .collect();
    let mut visited = vec![false; colors.len()];
    edges[0].weight = 0.0;
    visited[0] = true;

    let mut vertex = 0;
    for _ in 1..colors.len() {
        let from = colors[vertex];
        let parent = vertex as ColorId;
        let (weight, next) = edges
            .par_iter_mut()
            .zip(visited.par_iter())
            .zip(colors.par_iter())
            .enumerate()
            .with_min_len(PARALLEL_MIN_LEN)
            .filter(|(_, ((_, &seen), _))| !seen)
            .map(|(id, ((edge, _), &color))| {
                let weight = distance(from, color);
                if weight < edge.weight {
                    edge.weight = weight;
                    edge.parent = parent;
                }
                (edge.weight, id)
            })
            .reduce(|| (f64::INFINITY, usize::MAX), lighter);
        trace!(next, weight, "absorbing color into tree");
        vertex = next;
        visited[vertex] = true;
    }

    let total_weight = edges.iter().map(|edge| edge.weight).sum();
    SpanningTree {
        edges,
        total_weight,
    }
}
