//! Union-find used to label weakly connected components.
//!
//! Union by rank with path halving. Ties between equal ranks are broken
//! towards the lower slot so labelling is deterministic.

pub(super) struct UnionFind {
    parents: Vec<usize>,
    ranks: Vec<u8>,
}

impl UnionFind {
    pub(super) fn new(slot_count: usize) -> Self {
        Self {
            parents: (0..slot_count).collect(),
            ranks: vec![0; slot_count],
        }
    }

    pub(super) fn union(&mut self, left: usize, right: usize) -> bool {
        let left_root = self.find(left);
        let right_root = self.find(right);
        if left_root == right_root {
            return false;
        }

        let left_rank = self.ranks[left_root];
        let right_rank = self.ranks[right_root];
        let (parent, child) = choose_parent_child(left_root, right_root, left_rank, right_rank);
        self.parents[child] = parent;
        if left_rank == right_rank {
            self.ranks[parent] = self.ranks[parent].saturating_add(1);
        }
        true
    }

    pub(super) fn find(&mut self, node: usize) -> usize {
        let mut current = node;
        loop {
            let parent = self.parents[current];
            if parent == current {
                return current;
            }
            let grandparent = self.parents[parent];
            self.parents[current] = grandparent;
            current = grandparent;
        }
    }
}

fn choose_parent_child(
    left_root: usize,
    right_root: usize,
    left_rank: u8,
    right_rank: u8,
) -> (usize, usize) {
    if left_rank > right_rank {
        return (left_root, right_root);
    }
    if right_rank > left_rank {
        return (right_root, left_root);
    }
    if left_root <= right_root {
        (left_root, right_root)
    } else {
        (right_root, left_root)
    }
}
