/// Array-backed segment tree over row slots.
///
/// Each leaf stores the maximum end time of the items already placed in that
/// row; internal nodes store the minimum over their subtree. Slots that have
/// not been opened yet hold `+inf` so they are never reported as free.
///
/// Node `1` is the root, node `i` has children `2i` and `2i + 1`, and leaf
/// `slot` lives at `capacity + slot`.
#[derive(Debug, Clone)]
pub(crate) struct RowSlotTree {
    nodes: Vec<f64>,
    capacity: usize,
    len: usize,
}

impl RowSlotTree {
    pub(crate) fn with_capacity(rows: usize) -> Self {
        let capacity = rows.max(1).next_power_of_two();
        Self {
            nodes: vec![f64::INFINITY; capacity * 2],
            capacity,
            len: 0,
        }
    }

    /// Number of opened rows.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Returns the lowest-indexed opened row whose max end is `<= time`.
    pub(crate) fn leftmost_free(&self, time: f64) -> Option<usize> {
        if self.len == 0 || self.nodes[1] > time {
            return None;
        }
        let mut node = 1;
        while node < self.capacity {
            let left = node * 2;
            node = if self.nodes[left] <= time {
                left
            } else {
                left + 1
            };
        }
        Some(node - self.capacity)
    }

    /// Opens a new row with the given max end and returns its index.
    pub(crate) fn open(&mut self, end: f64) -> usize {
        if self.len == self.capacity {
            self.grow();
        }
        let slot = self.len;
        self.len += 1;
        self.set(slot, end);
        slot
    }

    /// Overwrites the max end of an opened row.
    pub(crate) fn set(&mut self, slot: usize, end: f64) {
        debug_assert!(slot < self.len, "row slot {slot} is not open");
        let mut node = self.capacity + slot;
        self.nodes[node] = end;
        while node > 1 {
            node /= 2;
            self.nodes[node] = self.nodes[node * 2].min(self.nodes[node * 2 + 1]);
        }
    }

    fn grow(&mut self) {
        let capacity = self.capacity * 2;
        let mut nodes = vec![f64::INFINITY; capacity * 2];
        nodes[capacity..capacity + self.capacity]
            .copy_from_slice(&self.nodes[self.capacity..self.capacity * 2]);
        for node in (1..capacity).rev() {
            nodes[node] = nodes[node * 2].min(nodes[node * 2 + 1]);
        }
        self.nodes = nodes;
        self.capacity = capacity;
    }
}

#[cfg(test)]
mod tests {
    use super::RowSlotTree;

    #[test]
    fn empty_tree_has_no_free_row() {
        let tree = RowSlotTree::with_capacity(4);
        assert_eq!(tree.leftmost_free(f64::MAX), None);
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn leftmost_free_prefers_lowest_index() {
        let mut tree = RowSlotTree::with_capacity(1);
        assert_eq!(tree.open(10.0), 0);
        assert_eq!(tree.open(5.0), 1);
        assert_eq!(tree.open(3.0), 2);

        assert_eq!(tree.leftmost_free(4.0), Some(2));
        assert_eq!(tree.leftmost_free(5.0), Some(1));
        assert_eq!(tree.leftmost_free(10.0), Some(0));
        assert_eq!(tree.leftmost_free(2.0), None);
    }

    #[test]
    fn set_updates_subtree_minimum() {
        let mut tree = RowSlotTree::with_capacity(2);
        tree.open(1.0);
        tree.open(2.0);
        tree.set(0, 50.0);
        assert_eq!(tree.leftmost_free(2.0), Some(1));
        tree.set(1, 60.0);
        assert_eq!(tree.leftmost_free(2.0), None);
        assert_eq!(tree.leftmost_free(55.0), Some(0));
    }

    #[test]
    fn growth_preserves_existing_rows() {
        let mut tree = RowSlotTree::with_capacity(1);
        for end in [8.0, 7.0, 6.0, 5.0, 4.0] {
            tree.open(end);
        }
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.leftmost_free(4.5), Some(4));
        assert_eq!(tree.leftmost_free(6.0), Some(2));
        assert_eq!(tree.leftmost_free(100.0), Some(0));
    }
}
