//! `AdjacencyIndex`: tracks which regions are 4-adjacent to which, kept in
//! sync as the decomposer merges regions.

use std::collections::{BTreeSet, HashMap};

use dpt_core::{ConnectedRegion, RegionId, RegionStore};

/// Symmetric adjacency graph over live regions, addressed by [`RegionId`].
#[derive(Debug, Default)]
pub struct AdjacencyIndex {
    neighbours: HashMap<RegionId, BTreeSet<RegionId>>,
}

impl AdjacencyIndex {
    /// An index with no edges.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the adjacency graph for every region currently in `store`, by
    /// pairwise-testing `ConnectedRegion::is_adjacent`.
    ///
    /// This is the one place adjacency is computed from scratch; every
    /// subsequent change flows through [`AdjacencyIndex::on_merge`].
    pub fn build(store: &RegionStore, ids: &[RegionId]) -> Self {
        let mut index = Self::new();
        for &id in ids {
            index.neighbours.entry(id).or_default();
        }
        for (i, &a) in ids.iter().enumerate() {
            let region_a = store.get(a).expect("id from this store's own labelling");
            for &b in &ids[i + 1..] {
                let region_b = store.get(b).expect("id from this store's own labelling");
                if regions_adjacent(region_a, region_b) {
                    index.neighbours.get_mut(&a).unwrap().insert(b);
                    index.neighbours.get_mut(&b).unwrap().insert(a);
                }
            }
        }
        index
    }

    /// The set of regions 4-adjacent to `id`.
    pub fn neighbours(&self, id: RegionId) -> &BTreeSet<RegionId> {
        static EMPTY: BTreeSet<RegionId> = BTreeSet::new();
        self.neighbours.get(&id).unwrap_or(&EMPTY)
    }

    /// Updates the graph after `b` has been merged into `a` in the region
    /// store. `a` inherits `b`'s neighbours (minus itself and `b`); every
    /// neighbour of `b` has its reference to `b` rewritten to `a`; `b`'s own
    /// entry is dropped.
    pub fn on_merge(&mut self, a: RegionId, b: RegionId) {
        let b_neighbours = self.neighbours.remove(&b).unwrap_or_default();
        let entry_a = self.neighbours.entry(a).or_default();
        for &n in &b_neighbours {
            if n != a {
                entry_a.insert(n);
            }
        }
        entry_a.remove(&b);

        for &n in &b_neighbours {
            if n == a {
                continue;
            }
            if let Some(set) = self.neighbours.get_mut(&n) {
                set.remove(&b);
                set.insert(a);
            }
        }
    }
}

fn regions_adjacent(a: &ConnectedRegion, b: &ConnectedRegion) -> bool {
    a.is_adjacent(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpt_core::RegionStore;

    #[test]
    fn build_is_symmetric() {
        let mut store = RegionStore::new();
        let a = store.create((1, 2), 1, 0, vec![vec![(0, 1)]]).unwrap();
        let b = store.create((1, 2), 2, 0, vec![vec![(1, 2)]]).unwrap();
        let index = AdjacencyIndex::build(&store, &[a, b]);
        assert!(index.neighbours(a).contains(&b));
        assert!(index.neighbours(b).contains(&a));
    }

    #[test]
    fn on_merge_rewrites_neighbour_references() {
        let mut store = RegionStore::new();
        // a - b - c in a row, a and c not adjacent to each other.
        let a = store.create((1, 3), 1, 0, vec![vec![(0, 1)]]).unwrap();
        let b = store.create((1, 3), 2, 0, vec![vec![(1, 2)]]).unwrap();
        let c = store.create((1, 3), 3, 0, vec![vec![(2, 3)]]).unwrap();
        let mut index = AdjacencyIndex::build(&store, &[a, b, c]);

        store.merge(a, b).unwrap();
        index.on_merge(a, b);

        assert!(index.neighbours(a).contains(&c));
        assert!(index.neighbours(c).contains(&a));
        assert!(!index.neighbours(a).contains(&b));
        assert!(index.neighbours(c).get(&b).is_none());
    }
}
