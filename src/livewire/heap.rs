//! Indexed binary min-heap keyed by grid node.
//!
//! A dense `slots` table maps each node to its position in the heap, giving
//! O(1) membership tests and O(log n) insert, decrease-key, and extract-min.
//! Ties pop in unspecified but deterministic order.

const ABSENT: u32 = u32::MAX;

#[derive(Debug, Clone, Default)]
pub struct IndexedMinHeap {
    nodes: Vec<u32>,
    priorities: Vec<f64>,
    slots: Vec<u32>,
}

impl IndexedMinHeap {
    /// Create a heap able to hold nodes `0..capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut heap = Self::default();
        heap.reset(capacity);
        heap
    }

    /// Empty the heap and resize the slot table for `capacity` nodes.
    pub fn reset(&mut self, capacity: usize) {
        self.nodes.clear();
        self.priorities.clear();
        self.slots.clear();
        self.slots.resize(capacity, ABSENT);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn contains(&self, node: usize) -> bool {
        self.slots.get(node).is_some_and(|&s| s != ABSENT)
    }

    /// Current priority of a queued node.
    pub fn priority(&self, node: usize) -> Option<f64> {
        match self.slots.get(node) {
            Some(&s) if s != ABSENT => Some(self.priorities[s as usize]),
            _ => None,
        }
    }

    /// Insert `node`, or lower its priority if already queued.
    ///
    /// Returns false when the node is queued with a priority that is already
    /// less than or equal to `priority`.
    pub fn push_or_decrease(&mut self, node: usize, priority: f64) -> bool {
        let slot = self.slots[node];
        if slot == ABSENT {
            let pos = self.nodes.len();
            self.nodes.push(node as u32);
            self.priorities.push(priority);
            self.slots[node] = pos as u32;
            self.sift_up(pos);
            true
        } else if priority < self.priorities[slot as usize] {
            self.priorities[slot as usize] = priority;
            self.sift_up(slot as usize);
            true
        } else {
            false
        }
    }

    /// Remove and return the node with the smallest priority.
    pub fn pop(&mut self) -> Option<(usize, f64)> {
        let last = self.nodes.len().checked_sub(1)?;
        self.swap(0, last);
        let node = self.nodes.pop()?;
        let priority = self.priorities.pop()?;
        self.slots[node as usize] = ABSENT;
        if !self.nodes.is_empty() {
            self.sift_down(0);
        }
        Some((node as usize, priority))
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.nodes.swap(a, b);
        self.priorities.swap(a, b);
        self.slots[self.nodes[a] as usize] = a as u32;
        self.slots[self.nodes[b] as usize] = b as u32;
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) >> 1;
            if self.priorities[i] < self.priorities[parent] {
                self.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.nodes.len();
        loop {
            let mut smallest = i;
            let left = 2 * i + 1;
            let right = left + 1;

            if left < n && self.priorities[left] < self.priorities[smallest] {
                smallest = left;
            }
            if right < n && self.priorities[right] < self.priorities[smallest] {
                smallest = right;
            }

            if smallest == i {
                break;
            }
            self.swap(i, smallest);
            i = smallest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pops_in_priority_order() {
        let mut heap = IndexedMinHeap::with_capacity(8);
        for (node, p) in [(3, 5.0), (1, 2.0), (7, 9.0), (0, 1.0), (5, 3.0)] {
            assert!(heap.push_or_decrease(node, p));
        }
        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|(n, _)| n)).collect();
        assert_eq!(order, vec![0, 1, 5, 3, 7]);
        assert!(heap.is_empty());
    }

    #[test]
    fn test_decrease_key_moves_node_forward() {
        let mut heap = IndexedMinHeap::with_capacity(4);
        heap.push_or_decrease(0, 10.0);
        heap.push_or_decrease(1, 5.0);
        heap.push_or_decrease(2, 7.0);

        assert!(heap.push_or_decrease(0, 1.0));
        assert_eq!(heap.len(), 3);
        assert_eq!(heap.priority(0), Some(1.0));
        assert_eq!(heap.pop(), Some((0, 1.0)));
    }

    #[test]
    fn test_increase_is_ignored() {
        let mut heap = IndexedMinHeap::with_capacity(2);
        heap.push_or_decrease(1, 3.0);
        assert!(!heap.push_or_decrease(1, 4.0));
        assert_eq!(heap.priority(1), Some(3.0));
    }

    #[test]
    fn test_membership_tracks_pops() {
        let mut heap = IndexedMinHeap::with_capacity(3);
        heap.push_or_decrease(2, 1.0);
        assert!(heap.contains(2));
        assert!(!heap.contains(1));
        heap.pop();
        assert!(!heap.contains(2));
        assert!(!heap.contains(99));
    }

    proptest! {
        #[test]
        fn prop_pop_sequence_is_sorted(
            ops in prop::collection::vec((0..64usize, 0.0..1000.0f64), 1..200)
        ) {
            let mut heap = IndexedMinHeap::with_capacity(64);
            let mut best = vec![f64::INFINITY; 64];
            for (node, p) in ops {
                heap.push_or_decrease(node, p);
                best[node] = best[node].min(p);
            }

            let mut last = f64::NEG_INFINITY;
            while let Some((node, p)) = heap.pop() {
                prop_assert!(p >= last);
                prop_assert_eq!(p, best[node]);
                last = p;
            }
        }
    }
}
