//! Disjoint-set grouping of mention ids.

use indexmap::IndexMap;

/// Union-find keyed by mention id. Groups come out in first-insertion order.
#[derive(Debug, Default, Clone)]
pub struct MentionSets {
    slots: IndexMap<u32, usize>,
    parent: Vec<usize>,
}

impl MentionSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the sets from a list of linked pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let mut sets = Self::new();
        for (a, b) in pairs {
            sets.union(a, b);
        }
        sets
    }

    fn slot(&mut self, id: u32) -> usize {
        if let Some(&slot) = self.slots.get(&id) {
            return slot;
        }
        let slot = self.parent.len();
        self.parent.push(slot);
        self.slots.insert(id, slot);
        slot
    }

    fn root(&mut self, mut slot: usize) -> usize {
        while self.parent[slot] != slot {
            self.parent[slot] = self.parent[self.parent[slot]];
            slot = self.parent[slot];
        }
        slot
    }

    pub fn union(&mut self, a: u32, b: u32) {
        let sa = self.slot(a);
        let sb = self.slot(b);
        let ra = self.root(sa);
        let rb = self.root(sb);
        if ra != rb {
            // Keep the older root so representatives follow insertion order.
            let (keep, merge) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[merge] = keep;
        }
    }

    /// Representative of `id`, or `None` when it was never linked.
    pub fn find(&mut self, id: u32) -> Option<usize> {
        let slot = *self.slots.get(&id)?;
        Some(self.root(slot))
    }

    /// All groups, each listing member ids in insertion order.
    pub fn groups(&mut self) -> Vec<Vec<u32>> {
        let ids: Vec<(u32, usize)> = self.slots.iter().map(|(&id, &slot)| (id, slot)).collect();
        let mut grouped: IndexMap<usize, Vec<u32>> = IndexMap::new();
        for (id, slot) in ids {
            let root = self.root(slot);
            grouped.entry(root).or_default().push(id);
        }
        grouped.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chains_merge_transitively() {
        let mut sets = MentionSets::from_pairs([(1, 2), (2, 3), (4, 5), (6, 7), (5, 9)]);
        assert_eq!(sets.groups(), vec![vec![1, 2, 3], vec![4, 5, 9], vec![6, 7]]);
    }

    #[test]
    fn late_bridge_joins_existing_groups() {
        let mut sets = MentionSets::from_pairs([(1, 2), (3, 4), (2, 3)]);
        assert_eq!(sets.groups(), vec![vec![1, 2, 3, 4]]);
        assert_eq!(sets.find(4), sets.find(1));
        assert_eq!(sets.find(8), None);
    }
}
