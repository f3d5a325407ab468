//! Single-source shortest paths over the implicit 4-connected pixel graph.
//!
//! The engine owns its distance/parent buffers and rebuilds the tree in place
//! on every run; callers that need an older tree must [`ShortestPathEngine::snapshot`]
//! it first.
//!
//! Directional weights: a move right from `u` costs `right[u]`, a move left
//! costs `right[u - 1]`, a move down costs `down[u]`, a move up costs
//! `down[u - width]`. Each grid edge is stored once, on its left or upper
//! endpoint.

use std::sync::Arc;

use crate::error::{LivewireError, Result};
use crate::livewire::energy::EnergyField;
use crate::livewire::geometry::GridPoint;
use crate::livewire::heap::IndexedMinHeap;

/// Parent marker for the anchor and for pixels never reached.
pub const NO_PARENT: u32 = u32::MAX;

/// Distances and predecessors from one anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPathTree {
    width: usize,
    height: usize,
    anchor: GridPoint,
    target: Option<GridPoint>,
    complete: bool,
    dist: Vec<f64>,
    parent: Vec<u32>,
}

impl ShortestPathTree {
    fn unset(width: usize, height: usize, anchor: GridPoint) -> Self {
        let len = width * height;
        Self {
            width,
            height,
            anchor,
            target: None,
            complete: false,
            dist: vec![f64::INFINITY; len],
            parent: vec![NO_PARENT; len],
        }
    }

    fn reset(&mut self, anchor: GridPoint, target: Option<GridPoint>) {
        self.anchor = anchor;
        self.target = target;
        self.complete = false;
        self.dist.fill(f64::INFINITY);
        self.parent.fill(NO_PARENT);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn anchor(&self) -> GridPoint {
        self.anchor
    }

    /// Early-exit target the tree was computed for, if any.
    pub fn target(&self) -> Option<GridPoint> {
        self.target
    }

    /// True when the search drained the queue rather than stopping at a target.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Raw distance plane; unreached entries are `f64::INFINITY`.
    pub fn distances(&self) -> &[f64] {
        &self.dist
    }

    /// Raw parent plane; the anchor and unreached entries hold [`NO_PARENT`].
    pub fn parents(&self) -> &[u32] {
        &self.parent
    }

    /// Distance to `p`, or `None` when out of bounds or not reached.
    pub fn distance_to(&self, p: GridPoint) -> Option<f64> {
        if !p.in_bounds(self.width, self.height) {
            return None;
        }
        let d = self.dist[p.index(self.width)];
        d.is_finite().then_some(d)
    }

    pub fn is_reachable(&self, p: GridPoint) -> bool {
        self.distance_to(p).is_some()
    }

    #[inline]
    pub fn parent_of(&self, index: usize) -> Option<usize> {
        match self.parent.get(index) {
            Some(&p) if p != NO_PARENT => Some(p as usize),
            _ => None,
        }
    }
}

/// Dijkstra runner bound to one energy field.
#[derive(Debug)]
pub struct ShortestPathEngine {
    field: Arc<EnergyField>,
    tree: Option<ShortestPathTree>,
    heap: IndexedMinHeap,
}

impl ShortestPathEngine {
    pub fn new(field: Arc<EnergyField>) -> Result<Self> {
        let pixels = field.len();
        if pixels >= NO_PARENT as usize {
            return Err(LivewireError::GridTooLarge { pixels });
        }
        Ok(Self {
            field,
            tree: None,
            heap: IndexedMinHeap::default(),
        })
    }

    pub fn field(&self) -> &Arc<EnergyField> {
        &self.field
    }

    /// Tree from the most recent successful run.
    pub fn tree(&self) -> Option<&ShortestPathTree> {
        self.tree.as_ref()
    }

    /// Copy of the current tree, preserved across the next run.
    pub fn snapshot(&self) -> Option<ShortestPathTree> {
        self.tree.clone()
    }

    /// Drop the current tree. Buffers are reallocated on the next run.
    pub fn clear(&mut self) {
        self.tree = None;
    }

    /// Run Dijkstra from `anchor`, stopping as soon as `target` is settled.
    ///
    /// Both points must lie inside the grid; on error the previous tree is
    /// left untouched.
    pub fn compute(&mut self, anchor: GridPoint, target: Option<GridPoint>) -> Result<&ShortestPathTree> {
        let width = self.field.width();
        let height = self.field.height();
        anchor.check_bounds(width, height)?;
        if let Some(t) = target {
            t.check_bounds(width, height)?;
        }

        let _span = tracing::info_span!("dijkstra", x = anchor.x, y = anchor.y).entered();

        let n = self.field.len();
        let right = self.field.right_weights();
        let down = self.field.down_weights();

        let mut tree = match self.tree.take() {
            Some(mut t) => {
                t.reset(anchor, target);
                t
            }
            None => {
                let mut t = ShortestPathTree::unset(width, height, anchor);
                t.target = target;
                t
            }
        };
        let heap = &mut self.heap;
        heap.reset(n);

        let source = anchor.index(width);
        let goal = target.map(|t| t.index(width));
        tree.dist[source] = 0.0;
        heap.push_or_decrease(source, 0.0);

        let mut settled = 0usize;
        let mut stopped_early = false;

        while let Some((u, priority)) = heap.pop() {
            let du = tree.dist[u];
            if priority > du {
                continue;
            }
            settled += 1;

            if goal == Some(u) {
                stopped_early = true;
                break;
            }

            let x = u % width;
            if x > 0 {
                let v = u - 1;
                relax(&mut tree, heap, u, v, du + right[v]);
            }
            if x + 1 < width {
                relax(&mut tree, heap, u, u + 1, du + right[u]);
            }
            if u >= width {
                let v = u - width;
                relax(&mut tree, heap, u, v, du + down[v]);
            }
            if u + width < n {
                relax(&mut tree, heap, u, u + width, du + down[u]);
            }
        }

        tree.complete = !stopped_early;
        tracing::debug!(settled, complete = tree.complete, "shortest path tree ready");

        Ok(self.tree.insert(tree))
    }
}

#[inline]
fn relax(tree: &mut ShortestPathTree, heap: &mut IndexedMinHeap, u: usize, v: usize, candidate: f64) {
    if candidate < tree.dist[v] {
        tree.dist[v] = candidate;
        tree.parent[v] = u as u32;
        heap.push_or_decrease(v, candidate);
    }
}
