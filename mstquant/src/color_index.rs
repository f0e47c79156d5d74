//! Deduplication of the colors present in an image.

use tracing::debug;

use crate::{image::Image, Color, ColorId};

const CUBE_SIZE: usize = 1 << 24;

fn pack(color: Color) -> usize {
    (color[0] as usize) << 16 | (color[1] as usize) << 8 | color[2] as usize
}

/// Direct-address table over the whole 256×256×256 RGB cube, mapping each color to its id.
///
/// Slots store `id + 1` so that a zeroed table means "no colors seen". The table is allocated
/// zeroed, which lets the allocator hand out untouched pages lazily.
pub struct ColorIndex {
    slots: Vec<u32>,
    len: usize,
}

impl ColorIndex {
    pub fn new() -> Self {
        Self {
            slots: vec![0; CUBE_SIZE],
            len: 0,
        }
    }

    /// Returns the id of `color`, assigning the next sequential id if it hasn't been seen yet.
    /// The boolean is `true` when the color is new.
    pub fn insert(&mut self, color: Color) -> (ColorId, bool) {
        let slot = &mut self.slots[pack(color)];
        if *slot == 0 {
            self.len += 1;
            *slot = self.len as u32;
            (*slot - 1, true)
        } else {
            (*slot - 1, false)
        }
    }

    pub fn id_of(&self, color: Color) -> Option<ColorId> {
        self.slots[pack(color)].checked_sub(1)
    }

    pub fn contains(&self, color: Color) -> bool {
        self.slots[pack(color)] != 0
    }

    /// The number of distinct colors indexed so far.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for ColorIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Scans the image row by row and returns its distinct colors in order of first appearance,
/// together with the index mapping each of them back to its position in that list.
pub fn extract_distinct_colors(image: &Image<Color>) -> (Vec<Color>, ColorIndex) {
    let mut index = ColorIndex::new();
    let mut colors = vec![];
    for &color in &image.pixels {
        if let (_, true) = index.insert(color) {
            colors.push(color);
        }
    }
    debug!(
        distinct = colors.len(),
        pixels = image.pixels.len(),
        "extracted distinct colors"
    );
    (colors, index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_ids_in_first_seen_order() {
        let image = Image::new(
            3,
            2,
            vec![
                [5, 5, 5],
                [0, 0, 0],
                [5, 5, 5],
                [255, 0, 255],
                [0, 0, 0],
                [1, 2, 3],
            ],
        )
        .unwrap();
        let (colors, index) = extract_distinct_colors(&image);
        assert_eq!(colors, vec![[5, 5, 5], [0, 0, 0], [255, 0, 255], [1, 2, 3]]);
        assert_eq!(index.len(), 4);
        for (id, &color) in colors.iter().enumerate() {
            assert_eq!(index.id_of(color), Some(id as ColorId));
        }
        assert_eq!(index.id_of([9, 9, 9]), None);
        assert!(!index.contains([9, 9, 9]));
    }

    #[test]
    fn insert_is_idempotent() {
        let mut index = ColorIndex::new();
        assert_eq!(index.insert([255, 255, 255]), (0, true));
        assert_eq!(index.insert([0, 0, 0]), (1, true));
        assert_eq!(index.insert([255, 255, 255]), (0, false));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn channels_do_not_alias() {
        let mut index = ColorIndex::new();
        index.insert([1, 0, 0]);
        assert!(!index.contains([0, 1, 0]));
        assert!(!index.contains([0, 0, 1]));
    }

    #[test]
    fn empty_image_has_no_colors() {
        let image = Image::new(0, 0, vec![]).unwrap();
        let (colors, index) = extract_distinct_colors(&image);
        assert!(colors.is_empty());
        assert!(index.is_empty());
    }
}
