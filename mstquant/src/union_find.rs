//! Disjoint-set forest over color ids.

use crate::ColorId;

/// Union-find with path compression. There is no union by rank; cluster membership doesn't
/// depend on tree shape, and compression alone keeps lookups cheap.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<ColorId>,
    components: usize,
}

impl DisjointSet {
    /// Creates `len` singleton sets.
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len as ColorId).collect(),
            components: len,
        }
    }

    /// Returns the root of the set containing `id`, pointing every node on the way directly at it.
    pub fn find(&mut self, id: ColorId) -> ColorId {
        let mut root = id;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }

        let mut node = id;
        while node != root {
            let next = self.parent[node as usize];
            self.parent[node as usize] = root;
            node = next;
        }

        root
    }

    /// Merges the sets of `child` and `parent`, attaching the former's root under the latter's.
    /// Returns `false` if they already were in the same set.
    pub fn union(&mut self, child: ColorId, parent: ColorId) -> bool {
        let child = self.find(child);
        let parent = self.find(parent);
        if child == parent {
            return false;
        }
        self.parent[child as usize] = parent;
        self.components -= 1;
        true
    }

    /// The number of disjoint sets currently in the forest.
    pub fn component_count(&self) -> usize {
        self.components
    }

    /// Resolves every id to its root, consuming the forest.
    pub fn into_roots(mut self) -> Vec<ColorId> {
        for id in 0..self.parent.len() as ColorId {
            self.find(id);
        }
        self.parent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_as_singletons() {
        let mut set = DisjointSet::new(4);
        assert_eq!(set.component_count(), 4);
        for id in 0..4 {
            assert_eq!(set.find(id), id);
        }
    }

    #[test]
    fn union_attaches_child_under_parent() {
        let mut set = DisjointSet::new(3);
        assert!(set.union(2, 0));
        assert_eq!(set.find(2), 0);
        assert!(!set.union(0, 2));
        assert_eq!(set.component_count(), 2);
    }

    #[test]
    fn self_union_is_a_no_op() {
        let mut set = DisjointSet::new(2);
        assert!(!set.union(1, 1));
        assert_eq!(set.component_count(), 2);
    }

    #[test]
    fn long_chains_are_flattened() {
        let len = 100_000;
        let mut set = DisjointSet::new(len);
        for id in 1..len as ColorId {
            set.union(id - 1, id);
        }
        assert_eq!(set.component_count(), 1);
        let root = (len - 1) as ColorId;
        assert_eq!(set.find(0), root);

        let roots = set.into_roots();
        assert!(roots.iter().all(|&r| r == root));
    }
}
