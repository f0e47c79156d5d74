use std::collections::HashSet;

use mstquant::{
    aggregate_representatives, build_mst, cut_clusters, extract_distinct_colors, remap_pixels,
    Color, Image, Quantizer,
};
use nanorand::{Rng, WyRand};

/// A noisy image with a handful of loosely grouped colors, so that clusters are non-trivial.
fn noisy_image(width: usize, height: usize, seed: u64) -> Image<Color> {
    let mut rng = WyRand::new_seed(seed);
    let centers: Vec<Color> = (0..6)
        .map(|_| [rng.generate(), rng.generate(), rng.generate()])
        .collect();
    let pixels = (0..width * height)
        .map(|_| {
            let center = centers[rng.generate_range(0..centers.len())];
            center.map(|x| x.saturating_add(rng.generate_range(0u8..12)))
        })
        .collect();
    Image::new(width, height, pixels).unwrap()
}

fn distinct(pixels: &[Color]) -> HashSet<Color> {
    pixels.iter().copied().collect()
}

#[test]
fn quantizing_is_deterministic() {
    let image = noisy_image(32, 24, 2137);
    let quantizer = Quantizer::new(5);
    let first = quantizer.quantize(&image).unwrap();
    let second = quantizer.quantize(&image).unwrap();
    assert_eq!(first.image(), second.image());
    assert_eq!(first.palette(), second.palette());
    assert_eq!(first.mst_weight(), second.mst_weight());
}

#[test]
fn output_has_exactly_k_colors() {
    let image = noisy_image(40, 40, 1);
    let d = distinct(&image.pixels).len();
    for k in [1, 2, 3, 7, 16, d] {
        let result = Quantizer::new(k).quantize(&image).unwrap();
        assert_eq!(result.palette().len(), k);
        assert!(distinct(&result.image().pixels).len() <= k);
    }
}

#[test]
fn well_separated_clusters_keep_distinct_colors() {
    // Four far-apart groups; every representative lands inside its own group.
    let mut pixels = vec![];
    for base in [[0u8, 0, 0], [200, 0, 0], [0, 200, 0], [0, 0, 200]] {
        for offset in 0..5u8 {
            pixels.push(base.map(|x| x + offset));
        }
    }
    let image = Image::new(pixels.len(), 1, pixels).unwrap();
    let result = Quantizer::new(4).quantize(&image).unwrap();
    let colors = distinct(&result.image().pixels);
    assert_eq!(colors.len(), 4);
    assert!(colors.contains(&[2, 2, 2]));
    assert!(colors.contains(&[202, 2, 2]));
    assert!(colors.contains(&[2, 202, 2]));
    assert!(colors.contains(&[2, 2, 202]));
}

#[test]
fn all_colors_survive_when_k_equals_distinct() {
    let image = noisy_image(20, 20, 99);
    let d = distinct(&image.pixels).len();
    let result = Quantizer::new(d).quantize(&image).unwrap();
    assert_eq!(result.image(), &image);
}

#[test]
fn mst_weight_is_zero_only_for_trivial_inputs() {
    let single = Image::new(3, 3, vec![[42, 42, 42]; 9]).unwrap();
    assert_eq!(Quantizer::new(1).quantize(&single).unwrap().mst_weight(), 0.0);

    let empty = Image::new(0, 0, vec![]).unwrap();
    assert_eq!(Quantizer::new(1).quantize(&empty).unwrap().mst_weight(), 0.0);

    let image = noisy_image(8, 8, 5);
    assert!(Quantizer::new(1).quantize(&image).unwrap().mst_weight() > 0.0);
}

#[test]
fn clusters_partition_the_colors() {
    let image = noisy_image(30, 30, 7);
    let (colors, _) = extract_distinct_colors(&image);
    let tree = build_mst(&colors);
    for k in [1, 4, 10] {
        let clusters = cut_clusters(&tree, k).unwrap();
        let roots: HashSet<_> = clusters.roots().iter().copied().collect();
        assert_eq!(roots.len(), k);
        assert_eq!(clusters.count(), k);
        for &root in &roots {
            assert_eq!(clusters.root_of(root), root);
        }
    }
}

#[test]
fn cut_removes_the_heaviest_tree_edges() {
    let image = noisy_image(25, 25, 11);
    let (colors, _) = extract_distinct_colors(&image);
    let tree = build_mst(&colors);
    let k = 6;
    let clusters = cut_clusters(&tree, k).unwrap();

    let mut weights: Vec<f64> = tree.tree_edges().map(|(_, edge)| edge.weight).collect();
    weights.sort_by(|a, b| b.total_cmp(a));
    let mut cut: Vec<f64> = tree
        .tree_edges()
        .filter(|&(child, edge)| clusters.root_of(child) != clusters.root_of(edge.parent))
        .map(|(_, edge)| edge.weight)
        .collect();
    cut.sort_by(|a, b| b.total_cmp(a));
    assert_eq!(cut, weights[..k - 1].to_vec());
}

#[test]
fn worked_example_step_by_step() {
    let image = Image::new(
        2,
        2,
        vec![[0, 0, 0], [0, 0, 0], [255, 255, 255], [10, 10, 10]],
    )
    .unwrap();

    let (colors, index) = extract_distinct_colors(&image);
    assert_eq!(colors, vec![[0, 0, 0], [255, 255, 255], [10, 10, 10]]);

    let tree = build_mst(&colors);
    assert_eq!(tree.edges[2].parent, 0);
    assert_eq!(tree.edges[1].parent, 2);

    let clusters = cut_clusters(&tree, 2).unwrap();
    assert_eq!(clusters.root_of(0), clusters.root_of(2));
    assert_ne!(clusters.root_of(0), clusters.root_of(1));

    let representatives = aggregate_representatives(&colors, &clusters);
    assert_eq!(representatives[clusters.root_of(0) as usize], [5, 5, 5]);
    assert_eq!(representatives[clusters.root_of(1) as usize], [255, 255, 255]);

    let output = remap_pixels(&image, &index, &clusters, &representatives);
    assert_eq!(
        output.pixels,
        vec![[5, 5, 5], [5, 5, 5], [255, 255, 255], [5, 5, 5]]
    );
}

#[test]
fn empty_image_is_not_an_error() {
    let image = Image::new(0, 0, vec![]).unwrap();
    let result = Quantizer::new(3).quantize(&image).unwrap();
    assert_eq!(result.distinct_count(), 0);
    assert!(result.image().is_empty());
    assert!(result.palette().is_empty());
}
