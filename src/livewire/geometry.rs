//! Grid coordinates and flat index arithmetic.
//!
//! Pixels are addressed by a flat index `i = y * width + x`; the four
//! neighbours of `i` are `i - 1`, `i + 1`, `i - width`, and `i + width`.

use crate::error::{LivewireError, Result};

/// Integer pixel coordinate in image-grid space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPoint {
    pub x: usize,
    pub y: usize,
}

/// Ordered pixel sequence, anchor first.
pub type Path = Vec<GridPoint>;

impl GridPoint {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn from_index(index: usize, width: usize) -> Self {
        Self {
            x: index % width,
            y: index / width,
        }
    }

    #[inline]
    pub fn index(&self, width: usize) -> usize {
        self.y * width + self.x
    }

    #[inline]
    pub fn in_bounds(&self, width: usize, height: usize) -> bool {
        self.x < width && self.y < height
    }

    /// Bounds check that reports the offending point.
    pub fn check_bounds(&self, width: usize, height: usize) -> Result<()> {
        if self.in_bounds(width, height) {
            Ok(())
        } else {
            Err(LivewireError::OutOfBounds {
                x: self.x,
                y: self.y,
                width,
                height,
            })
        }
    }

    /// True when `other` differs by exactly one step horizontally or vertically.
    #[inline]
    pub fn is_adjacent(&self, other: &GridPoint) -> bool {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) == 1
    }

    pub fn manhattan(&self, other: &GridPoint) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl From<(usize, usize)> for GridPoint {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

impl From<GridPoint> for (usize, usize) {
    fn from(p: GridPoint) -> Self {
        (p.x, p.y)
    }
}

/// Check that every consecutive pair of a path is 4-adjacent.
pub fn is_connected(path: &[GridPoint]) -> bool {
    path.windows(2).all(|w| w[0].is_adjacent(&w[1]))
}

/// Append `segment` to `path`, dropping the segment's first point when it
/// repeats the current tail.
pub fn append_segment(path: &mut Path, segment: &[GridPoint]) {
    let skip = match (path.last(), segment.first()) {
        (Some(tail), Some(head)) if tail == head => 1,
        _ => 0,
    };
    path.extend_from_slice(&segment[skip.min(segment.len())..]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip_on_wide_grid() {
        let p = GridPoint::new(7, 3);
        let i = p.index(10);
        assert_eq!(i, 37);
        assert_eq!(GridPoint::from_index(i, 10), p);
    }

    #[test]
    fn test_adjacency_excludes_diagonals() {
        let p = GridPoint::new(2, 2);
        assert!(p.is_adjacent(&GridPoint::new(3, 2)));
        assert!(p.is_adjacent(&GridPoint::new(2, 1)));
        assert!(!p.is_adjacent(&GridPoint::new(3, 3)));
        assert!(!p.is_adjacent(&p));
    }

    #[test]
    fn test_check_bounds_reports_point() {
        let err = GridPoint::new(5, 5).check_bounds(3, 3).unwrap_err();
        assert_eq!(
            err,
            LivewireError::OutOfBounds {
                x: 5,
                y: 5,
                width: 3,
                height: 3
            }
        );
    }

    #[test]
    fn test_append_segment_drops_joint() {
        let mut path = vec![GridPoint::new(0, 0), GridPoint::new(1, 0)];
        append_segment(&mut path, &[GridPoint::new(1, 0), GridPoint::new(1, 1)]);
        assert_eq!(path.len(), 3);
        assert!(is_connected(&path));

        let mut empty = Vec::new();
        append_segment(&mut empty, &[GridPoint::new(4, 4)]);
        assert_eq!(empty, vec![GridPoint::new(4, 4)]);
    }
}
