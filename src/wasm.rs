//! WebAssembly exports for the livewire selection tool.
//!
//! These are exposed to JavaScript via wasm-bindgen.
//!
//! ## Point Format
//!
//! Paths cross the boundary as flat `Uint32Array`s of interleaved
//! coordinates: `[x0, y0, x1, y1, ...]`.

use ndarray::ArrayView3;
use wasm_bindgen::prelude::*;

use crate::config::LivewireConfig;
use crate::error::LivewireError;
use crate::livewire::geometry::GridPoint;
use crate::livewire::session::SelectionSession;

fn to_js(err: LivewireError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn flatten(points: &[GridPoint]) -> Vec<u32> {
    points
        .iter()
        .flat_map(|p| [p.x as u32, p.y as u32])
        .collect()
}

/// View a flat RGBA buffer as (height, width, 4).
///
/// A size whose byte count overflows `usize` is reported as a mismatch with
/// `expected = usize::MAX`.
fn rgba_view(data: &[u8], width: usize, height: usize) -> Result<ArrayView3<'_, u8>, LivewireError> {
    let mismatch = |expected| LivewireError::SizeMismatch {
        expected,
        actual: data.len(),
    };
    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| mismatch(usize::MAX))?;
    if expected != data.len() {
        return Err(mismatch(expected));
    }
    ArrayView3::from_shape((height, width, 4), data).map_err(|_| mismatch(expected))
}

/// Livewire session bound to one RGBA canvas.
#[wasm_bindgen]
pub struct WasmLivewire {
    inner: SelectionSession,
}

#[wasm_bindgen]
impl WasmLivewire {
    /// Build the energy graph for an RGBA image.
    ///
    /// # Arguments
    /// * `data` - Flat array of RGBA bytes (length = width * height * 4)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    #[wasm_bindgen(constructor)]
    pub fn new(data: &[u8], width: usize, height: usize) -> Result<WasmLivewire, JsValue> {
        let input = rgba_view(data, width, height).map_err(to_js)?;

        // No rayon thread pool in the browser.
        let config = LivewireConfig::builder().parallel(false).build();
        let mut inner = SelectionSession::new(config);
        inner.load_image(input).map_err(to_js)?;
        Ok(WasmLivewire { inner })
    }

    pub fn width(&self) -> usize {
        self.inner.dimensions().map_or(0, |(w, _)| w)
    }

    pub fn height(&self) -> usize {
        self.inner.dimensions().map_or(0, |(_, h)| h)
    }

    /// Current session state name.
    pub fn state(&self) -> String {
        self.inner.state().name().to_string()
    }

    pub fn commit_anchor(&mut self, x: usize, y: usize) -> Result<(), JsValue> {
        self.inner.commit_anchor(GridPoint::new(x, y)).map_err(to_js)
    }

    /// Update the live path; returns it flattened.
    pub fn move_cursor(&mut self, x: usize, y: usize) -> Result<Vec<u32>, JsValue> {
        let live = self.inner.move_cursor(GridPoint::new(x, y)).map_err(to_js)?;
        Ok(flatten(live))
    }

    pub fn confirmed_path(&self) -> Vec<u32> {
        flatten(self.inner.confirmed_path())
    }

    /// Confirmed plus live path, for drawing marching ants.
    pub fn outline(&self) -> Vec<u32> {
        flatten(&self.inner.outline())
    }

    /// Close the selection; returns the polygon with the first point repeated.
    pub fn finalize(&mut self) -> Result<Vec<u32>, JsValue> {
        let closed = self.inner.finalize_selection().map_err(to_js)?;
        Ok(flatten(closed.polygon()))
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Row-major mask of the closed selection (255 = selected).
    pub fn selection_mask(&self) -> Result<Vec<u8>, JsValue> {
        let (width, height) = self
            .inner
            .dimensions()
            .ok_or_else(|| to_js(LivewireError::NoImage))?;
        let closed = self.inner.closed_selection().ok_or_else(|| {
            to_js(LivewireError::InvalidState {
                operation: "selection_mask",
                state: self.inner.state().name(),
            })
        })?;
        Ok(closed.to_mask(width, height).mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_view_checks_length() {
        let data = vec![0u8; 2 * 3 * 4];
        let view = rgba_view(&data, 3, 2).unwrap();
        assert_eq!(view.dim(), (2, 3, 4));

        assert_eq!(
            rgba_view(&data, 3, 3).unwrap_err(),
            LivewireError::SizeMismatch { expected: 36, actual: 24 }
        );
    }

    #[test]
    fn test_rgba_view_rejects_overflowing_size() {
        let data = vec![0u8; 16];
        assert_eq!(
            rgba_view(&data, usize::MAX / 2, 3).unwrap_err(),
            LivewireError::SizeMismatch { expected: usize::MAX, actual: 16 }
        );
    }
}
