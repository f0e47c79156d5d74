//! Splitting the spanning tree into a fixed number of clusters.

use tracing::debug;

use crate::{error::Error, mst::SpanningTree, union_find::DisjointSet, ColorId};

/// The partition of color ids into clusters. Every id maps straight to its cluster's root id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clusters {
    roots: Vec<ColorId>,
    count: usize,
}

impl Clusters {
    /// The root of the cluster containing `id`.
    pub fn root_of(&self, id: ColorId) -> ColorId {
        self.roots[id as usize]
    }

    /// Root ids indexed by color id.
    pub fn roots(&self) -> &[ColorId] {
        &self.roots
    }

    /// The number of clusters.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Cluster root ids, in increasing order.
    pub fn root_ids(&self) -> impl Iterator<Item = ColorId> + '_ {
        self.roots
            .iter()
            .enumerate()
            .filter(|&(id, &root)| id as ColorId == root)
            .map(|(_, &root)| root)
    }
}

/// Cuts the `k - 1` heaviest edges out of the spanning tree, leaving exactly `k` clusters.
///
/// Edges are merged lightest first until `k` components remain. Equal weights are ordered by
/// child id, so when several edges of the same weight straddle the cut, the ones attached to
/// later-seen colors are the ones left out.
///
/// An empty tree yields no clusters regardless of `k`.
pub fn cut_clusters(tree: &SpanningTree, k: usize) -> Result<Clusters, Error> {
    let distinct = tree.len();
    if distinct == 0 {
        return Ok(Clusters {
            roots: vec![],
            count: 0,
        });
    }
    if k == 0 || k > distinct {
        return Err(Error::InvalidClusterCount {
            requested: k,
            distinct,
        });
    }

    let mut order: Vec<_> = tree.tree_edges().collect();
    order.sort_by(|(child_a, a), (child_b, b)| {
        a.weight.total_cmp(&b.weight).then(child_a.cmp(child_b))
    });

    let mut set = DisjointSet::new(distinct);
    for (child, edge) in order {
        if set.component_count() == k {
            break;
        }
        set.union(child, edge.parent);
    }
    let count = set.component_count();
    debug!(clusters = count, distinct, "cut spanning tree");

    Ok(Clusters {
        roots: set.into_roots(),
        count,
    })
}
