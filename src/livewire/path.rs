//! Path reconstruction and multi-anchor stitching.

use crate::error::Result;
use crate::livewire::dijkstra::{ShortestPathEngine, ShortestPathTree};
use crate::livewire::energy::EnergyField;
use crate::livewire::geometry::{append_segment, GridPoint, Path};

/// Walk the parent chain from `target` back to the tree's anchor.
///
/// Returns the pixels ordered anchor -> target, or an empty path when the
/// target lies outside the grid or was never reached.
pub fn reconstruct(tree: &ShortestPathTree, target: GridPoint) -> Path {
    if !tree.is_reachable(target) {
        return Vec::new();
    }

    let width = tree.width();
    let mut path = Vec::new();
    let mut current = Some(target.index(width));
    while let Some(i) = current {
        path.push(GridPoint::from_index(i, width));
        current = tree.parent_of(i);
    }
    path.reverse();
    path
}

/// Sum of edge weights along a path, or `None` if two consecutive points
/// are not 4-adjacent.
pub fn path_cost(field: &EnergyField, path: &[GridPoint]) -> Option<f64> {
    let width = field.width();
    path.windows(2).try_fold(0.0, |acc, w| {
        field
            .edge_weight(w[0].index(width), w[1].index(width))
            .map(|weight| acc + weight)
    })
}

/// Stitch the minimum-cost segments between consecutive anchors.
///
/// Each segment is searched with the next anchor as early-exit target. The
/// joint point shared by adjacent segments appears once. Segments that come
/// back empty are skipped.
pub fn connect_anchors(engine: &mut ShortestPathEngine, anchors: &[GridPoint]) -> Result<Path> {
    let mut full = Vec::new();
    if anchors.len() < 2 {
        return Ok(full);
    }

    for pair in anchors.windows(2) {
        let tree = engine.compute(pair[0], Some(pair[1]))?;
        let segment = reconstruct(tree, pair[1]);
        if segment.is_empty() {
            tracing::debug!(x = pair[1].x, y = pair[1].y, "skipping unreachable segment");
            continue;
        }
        append_segment(&mut full, &segment);
    }

    Ok(full)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LivewireConfig;
    use crate::livewire::energy::build_energy_field;
    use crate::livewire::geometry::is_connected;
    use ndarray::Array3;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn flat_engine(width: usize, height: usize) -> ShortestPathEngine {
        let mut img = Array3::<u8>::zeros((height, width, 1));
        img.fill(90);
        let field = build_energy_field(img.view(), &LivewireConfig::default());
        ShortestPathEngine::new(Arc::new(field)).unwrap()
    }

    fn engine_for(width: usize, height: usize, right: Vec<f64>, down: Vec<f64>) -> ShortestPathEngine {
        let field = EnergyField::from_weights(width, height, right, down).unwrap();
        ShortestPathEngine::new(Arc::new(field)).unwrap()
    }

    #[test]
    fn test_flat_staircase_has_manhattan_length() {
        let mut engine = flat_engine(3, 3);
        let tree = engine.compute(GridPoint::new(0, 0), None).unwrap();
        let path = reconstruct(tree, GridPoint::new(2, 2));

        assert_eq!(path.len(), 5);
        assert_eq!(path[0], GridPoint::new(0, 0));
        assert_eq!(path[4], GridPoint::new(2, 2));
        assert!(is_connected(&path));
        assert!(path.windows(2).all(|w| w[1].x >= w[0].x && w[1].y >= w[0].y));
    }

    #[test]
    fn test_anchor_reconstructs_to_itself() {
        let mut engine = flat_engine(4, 4);
        let tree = engine.compute(GridPoint::new(2, 1), None).unwrap();
        assert_eq!(reconstruct(tree, GridPoint::new(2, 1)), vec![GridPoint::new(2, 1)]);
    }

    #[test]
    fn test_out_of_bounds_and_unreached_are_empty() {
        let mut engine = flat_engine(4, 4);
        let tree = engine.compute(GridPoint::new(0, 0), None).unwrap();
        assert!(reconstruct(tree, GridPoint::new(4, 0)).is_empty());

        let tree = engine
            .compute(GridPoint::new(0, 0), Some(GridPoint::new(1, 0)))
            .unwrap();
        assert!(reconstruct(tree, GridPoint::new(3, 3)).is_empty());
    }

    #[test]
    fn test_path_cost_rejects_gaps() {
        let field = EnergyField::from_weights(3, 1, vec![1.0, 2.0, 9.0], vec![9.0; 3]).unwrap();
        let ok = [GridPoint::new(0, 0), GridPoint::new(1, 0), GridPoint::new(2, 0)];
        assert_eq!(path_cost(&field, &ok), Some(3.0));
        let gap = [GridPoint::new(0, 0), GridPoint::new(2, 0)];
        assert_eq!(path_cost(&field, &gap), None);
    }

    #[test]
    fn test_connect_three_anchors_drops_joint() {
        let mut engine = flat_engine(6, 6);
        let a = GridPoint::new(0, 0);
        let b = GridPoint::new(3, 1);
        let c = GridPoint::new(5, 5);

        let ab = reconstruct(engine.compute(a, None).unwrap(), b);
        let bc = reconstruct(engine.compute(b, None).unwrap(), c);
        let full = connect_anchors(&mut engine, &[a, b, c]).unwrap();

        assert_eq!(full.len(), ab.len() + bc.len() - 1);
        assert!(is_connected(&full));
        assert!(full.windows(2).all(|w| w[0] != w[1]));
        assert_eq!(full.first(), Some(&a));
        assert_eq!(full.last(), Some(&c));
        assert!(full.contains(&b));
    }

    #[test]
    fn test_connect_needs_two_anchors() {
        let mut engine = flat_engine(3, 3);
        assert!(connect_anchors(&mut engine, &[]).unwrap().is_empty());
        assert!(connect_anchors(&mut engine, &[GridPoint::new(1, 1)]).unwrap().is_empty());
        assert!(connect_anchors(&mut engine, &[GridPoint::new(0, 0), GridPoint::new(9, 9)]).is_err());
    }

    fn small_field() -> impl Strategy<Value = (usize, usize, Vec<f64>, Vec<f64>, usize, usize)> {
        (1..7usize, 1..7usize).prop_flat_map(|(w, h)| {
            let n = w * h;
            (
                Just(w),
                Just(h),
                prop::collection::vec(0.01..100.0f64, n),
                prop::collection::vec(0.01..100.0f64, n),
                0..n,
                0..n,
            )
        })
    }

    proptest! {
        #[test]
        fn prop_path_is_simple_and_costs_dist((w, h, right, down, a, t) in small_field()) {
            let mut engine = engine_for(w, h, right, down);
            let field = Arc::clone(engine.field());
            let anchor = GridPoint::from_index(a, w);
            let target = GridPoint::from_index(t, w);
            let tree = engine.compute(anchor, None).unwrap();
            let path = reconstruct(tree, target);

            prop_assert_eq!(path.first(), Some(&anchor));
            prop_assert_eq!(path.last(), Some(&target));
            prop_assert!(is_connected(&path));
            let unique: HashSet<_> = path.iter().collect();
            prop_assert_eq!(unique.len(), path.len());
            prop_assert_eq!(path_cost(&field, &path), tree.distance_to(target));
        }

        #[test]
        fn prop_early_exit_reconstructs_same_path((w, h, right, down, a, t) in small_field()) {
            let mut engine = engine_for(w, h, right, down);
            let anchor = GridPoint::from_index(a, w);
            let target = GridPoint::from_index(t, w);

            let full = reconstruct(engine.compute(anchor, None).unwrap(), target);
            let early = reconstruct(engine.compute(anchor, Some(target)).unwrap(), target);
            prop_assert_eq!(full, early);
        }
    }
}
