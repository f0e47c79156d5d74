//! Representative colors of clusters.

use crate::{cluster::Clusters, Color};

/// Averages the colors of every cluster.
///
/// The result is indexed by color id; only entries at cluster roots are meaningful (the rest
/// are left black). Channels are rounded to the nearest integer, with halves rounded away from
/// zero, so the mean of `(0, 0, 0)` and `(1, 1, 1)` is `(1, 1, 1)`.
pub fn aggregate_representatives(colors: &[Color], clusters: &Clusters) -> Vec<Color> {
    let mut sums = vec![[0u64; 3]; colors.len()];
    let mut counts = vec![0u64; colors.len()];
    for (&color, &root) in colors.iter().zip(clusters.roots()) {
        let sum = &mut sums[root as usize];
        sum[0] += color[0] as u64;
        sum[1] += color[1] as u64;
        sum[2] += color[2] as u64;
        counts[root as usize] += 1;
    }

    sums.iter()
        .zip(&counts)
        .map(|(&sum, &count)| match count {
            0 => [0, 0, 0],
            count => sum.map(|x| (x as f64 / count as f64).round() as u8),
        })
        .collect()
}

/// Collects the representative color of every cluster, ordered by cluster root.
pub fn palette(clusters: &Clusters, representatives: &[Color]) -> Vec<Color> {
    clusters
        .root_ids()
        .map(|root| representatives[root as usize])
        .collect()
}

/// Formats a color as an uppercase `RRGGBB` hex string.
pub fn to_hex(color: Color) -> String {
    format!("{:02X}{:02X}{:02X}", color[0], color[1], color[2])
}
