//! Rasterize a closed selection outline into a pixel mask.
//!
//! Uses the even-odd rule on pixel coordinates. Outline pixels are always
//! selected, so thin or degenerate outlines still produce a usable mask.

use crate::livewire::geometry::GridPoint;

/// Selection mask with metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionMask {
    /// Row-major mask (255 = selected, 0 = not selected)
    pub mask: Vec<u8>,
    /// Bounds of selected region
    pub bounds: Option<(usize, usize, usize, usize)>, // (x, y, width, height)
    /// Number of selected pixels
    pub pixel_count: usize,
}

/// Fill `polygon` on a `width x height` grid.
///
/// The polygon may be open or closed; the closing edge is implied.
pub fn polygon_mask(polygon: &[GridPoint], width: usize, height: usize) -> SelectionMask {
    let mut mask = vec![0u8; width * height];

    if polygon.len() >= 3 {
        let mut crossings: Vec<f64> = Vec::new();
        for y in 0..height {
            let fy = y as f64;
            crossings.clear();

            for (i, a) in polygon.iter().enumerate() {
                let b = &polygon[(i + 1) % polygon.len()];
                let (ax, ay) = (a.x as f64, a.y as f64);
                let (bx, by) = (b.x as f64, b.y as f64);
                if (ay > fy) != (by > fy) {
                    crossings.push(ax + (fy - ay) * (bx - ax) / (by - ay));
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));

            let row = &mut mask[y * width..(y + 1) * width];
            for span in crossings.chunks_exact(2) {
                let start = span[0].ceil().max(0.0) as usize;
                let end = (span[1].ceil().max(0.0) as usize).min(width);
                for px in row.iter_mut().take(end).skip(start) {
                    *px = 255;
                }
            }
        }
    }

    for p in polygon {
        if p.in_bounds(width, height) {
            mask[p.index(width)] = 255;
        }
    }

    let mut pixel_count = 0;
    let mut min_x = width;
    let mut min_y = height;
    let mut max_x = 0;
    let mut max_y = 0;
    for (i, _) in mask.iter().enumerate().filter(|&(_, &v)| v > 0) {
        let (x, y) = (i % width, i / width);
        pixel_count += 1;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    let bounds = if pixel_count > 0 {
        Some((min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    } else {
        None
    };

    SelectionMask {
        mask,
        bounds,
        pixel_count,
    }
}
