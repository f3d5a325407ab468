//! Energy graph construction.
//!
//! Derives the two edge-weight planes of the 4-connected pixel graph from
//! luminance gradients. Each pixel stores the cost of its right edge and its
//! down edge; left and up moves reuse the neighbour's entry, so every grid
//! edge has exactly one stored weight.
//!
//! ## Supported Formats
//!
//! Accepts images with 1, 3, or 4 channels, shape (height, width, channels):
//! - **Grayscale**: used directly
//! - **RGB / RGBA**: luminance from RGB, alpha ignored
//!
//! A zero-channel array has no samples and yields a flat field.
//!
//! Both u8 (0-255) and f32 (0.0-1.0) inputs are supported. f32 samples are
//! rescaled to the 0-255 range so both depths yield the same weights.

use ndarray::ArrayView3;
use rayon::prelude::*;

use crate::config::LivewireConfig;
use crate::error::{LivewireError, Result};

/// Edge weights for every pixel of a `width x height` grid.
///
/// Read-only after construction; share it with `Arc` across engines.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyField {
    width: usize,
    height: usize,
    right: Vec<f64>,
    down: Vec<f64>,
}

impl EnergyField {
    /// Wrap precomputed weight planes.
    ///
    /// Every weight must be non-negative (infinity is allowed); the search
    /// does not terminate on negative edges.
    pub fn from_weights(width: usize, height: usize, right: Vec<f64>, down: Vec<f64>) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .ok_or(LivewireError::GridTooLarge { pixels: usize::MAX })?;
        for plane in [&right, &down] {
            if plane.len() != expected {
                return Err(LivewireError::SizeMismatch {
                    expected,
                    actual: plane.len(),
                });
            }
            if let Some(index) = plane.iter().position(|w| w.is_nan() || *w < 0.0) {
                return Err(LivewireError::InvalidWeight { index });
            }
        }
        Ok(Self {
            width,
            height,
            right,
            down,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels (graph nodes).
    pub fn len(&self) -> usize {
        self.right.len()
    }

    pub fn is_empty(&self) -> bool {
        self.right.is_empty()
    }

    pub fn right_weights(&self) -> &[f64] {
        &self.right
    }

    pub fn down_weights(&self) -> &[f64] {
        &self.down
    }

    #[inline]
    pub fn right_weight(&self, index: usize) -> f64 {
        self.right[index]
    }

    #[inline]
    pub fn down_weight(&self, index: usize) -> f64 {
        self.down[index]
    }

    /// Weight of the grid edge between flat indices `a` and `b`, whichever
    /// direction it is walked. `None` when the pixels are not 4-adjacent.
    pub fn edge_weight(&self, a: usize, b: usize) -> Option<f64> {
        let n = self.len();
        if a >= n || b >= n {
            return None;
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        if hi == lo + 1 && lo % self.width != self.width - 1 {
            Some(self.right[lo])
        } else if hi == lo + self.width {
            Some(self.down[lo])
        } else {
            None
        }
    }
}

/// Build the energy field from a u8 image.
pub fn build_energy_field(input: ArrayView3<u8>, config: &LivewireConfig) -> EnergyField {
    let (height, width, _) = input.dim();
    let lum = luminance_plane(input, config);
    build_from_luminance(width, height, &lum, config)
}

/// Build the energy field from an f32 image (values 0.0-1.0).
pub fn build_energy_field_f32(input: ArrayView3<f32>, config: &LivewireConfig) -> EnergyField {
    let (height, width, _) = input.dim();
    let lum = luminance_plane_f32(input, config);
    build_from_luminance(width, height, &lum, config)
}

/// Row-major luminance of a u8 image on the 0-255 scale.
pub fn luminance_plane(input: ArrayView3<u8>, config: &LivewireConfig) -> Vec<f64> {
    let (height, width, channels) = input.dim();
    let [lr, lg, lb] = config.luma;
    let mut lum = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let v = match channels {
                0 => 0.0,
                1 | 2 => input[[y, x, 0]] as f64,
                _ => lr * input[[y, x, 0]] as f64 + lg * input[[y, x, 1]] as f64 + lb * input[[y, x, 2]] as f64,
            };
            lum.push(v);
        }
    }
    lum
}

/// Row-major luminance of an f32 image, rescaled to 0-255.
pub fn luminance_plane_f32(input: ArrayView3<f32>, config: &LivewireConfig) -> Vec<f64> {
    let (height, width, channels) = input.dim();
    let [lr, lg, lb] = config.luma;
    let mut lum = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let v = match channels {
                0 => 0.0,
                1 | 2 => input[[y, x, 0]] as f64,
                _ => lr * input[[y, x, 0]] as f64 + lg * input[[y, x, 1]] as f64 + lb * input[[y, x, 2]] as f64,
            };
            lum.push(v * 255.0);
        }
    }
    lum
}

/// Derive edge weights from a luminance plane.
///
/// Forward differences give the gradient `(gx, gy)`. With
/// `rotate_gradient` set (the default) the energy is that gradient rotated a
/// quarter turn, `Ex = |gy|` and `Ey = |gx|`, so travel along an edge is
/// cheap and travel across it is not. Otherwise `Ex = |gx|` and `Ey = |gy|`.
pub fn build_from_luminance(
    width: usize,
    height: usize,
    lum: &[f64],
    config: &LivewireConfig,
) -> EnergyField {
    let _span = tracing::info_span!("energy_field", width, height).entered();

    let len = width * height;
    let border = config.border_weight();
    let mut right = vec![border; len];
    let mut down = vec![border; len];
    if len == 0 {
        return EnergyField {
            width,
            height,
            right,
            down,
        };
    }

    let fill_row = |(y, (right_row, down_row)): (usize, (&mut [f64], &mut [f64]))| {
        let row = y * width;
        for x in 0..width {
            let i = row + x;
            let l = lum[i];
            let gx = if x + 1 < width { l - lum[i + 1] } else { 0.0 };
            let gy = if y + 1 < height { l - lum[i + width] } else { 0.0 };
            let (ex, ey) = if config.rotate_gradient {
                (gy.abs(), gx.abs())
            } else {
                (gx.abs(), gy.abs())
            };

            if x + 1 < width {
                right_row[x] = config.weight_for(ex);
            }
            if y + 1 < height {
                down_row[x] = config.weight_for(ey);
            }
        }
    };

    if config.parallel {
        right
            .par_chunks_mut(width)
            .zip(down.par_chunks_mut(width))
            .enumerate()
            .for_each(fill_row);
    } else {
        right
            .chunks_mut(width)
            .zip(down.chunks_mut(width))
            .enumerate()
            .for_each(fill_row);
    }

    tracing::debug!(pixels = len, "energy field built");

    EnergyField {
        width,
        height,
        right,
        down,
    }
}
