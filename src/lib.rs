//! MagniSnap Rust Extensions
//!
//! Livewire boundary tracing implemented in Rust
//! with Python bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! The energy graph accepts multiple channel configurations:
//! - **Grayscale**: (height, width, 1) - single channel
//! - **RGB**: (height, width, 3) - 3 color channels
//! - **RGBA**: (height, width, 4) - alpha is ignored
//!
//! Both bit depths are supported:
//! - `u8`: 8-bit per channel (0-255)
//! - `f32`: Float per channel (0.0-1.0)
//!
//! ## Coordinates
//! Points are integer `(x, y)` pixel positions, `x` along the width. The
//! caller maps viewport coordinates onto the grid before calling in.

pub mod config;
pub mod error;
pub mod livewire;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::LivewireConfig;
pub use error::{LivewireError, Result};
pub use livewire::{
    ClosedSelection, EnergyField, GridPoint, Path, SelectionMask, SelectionSession,
    SessionState, ShortestPathEngine, ShortestPathTree,
};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyReadonlyArray3};
    use pyo3::exceptions::{PyIndexError, PyRuntimeError, PyValueError};
    use pyo3::prelude::*;

    use crate::config::LivewireConfig;
    use crate::error::LivewireError;
    use crate::livewire::energy::{build_energy_field, build_energy_field_f32};
    use crate::livewire::geometry::GridPoint;
    use crate::livewire::session::SelectionSession;

    impl From<LivewireError> for PyErr {
        fn from(err: LivewireError) -> PyErr {
            let msg = err.to_string();
            match err {
                LivewireError::OutOfBounds { .. } => PyIndexError::new_err(msg),
                LivewireError::EmptySelection { .. }
                | LivewireError::SizeMismatch { .. }
                | LivewireError::InvalidWeight { .. }
                | LivewireError::GridTooLarge { .. } => PyValueError::new_err(msg),
                LivewireError::InvalidState { .. } | LivewireError::NoImage => {
                    PyRuntimeError::new_err(msg)
                }
            }
        }
    }

    fn to_tuples(points: &[GridPoint]) -> Vec<(usize, usize)> {
        points.iter().map(|p| (p.x, p.y)).collect()
    }

    fn build_config(
        flat_cost: f64,
        border_cost: f64,
        energy_scale: f64,
        rotate_gradient: bool,
        parallel: bool,
    ) -> LivewireConfig {
        LivewireConfig::builder()
            .flat_cost(flat_cost)
            .border_cost(border_cost)
            .energy_scale(energy_scale)
            .rotate_gradient(rotate_gradient)
            .parallel(parallel)
            .build()
    }

    // ========================================================================
    // Energy Graph
    // ========================================================================

    /// Compute the livewire edge weights of an image.
    ///
    /// Accepts u8 or f32 images of shape (height, width, channels).
    ///
    /// Returns:
    ///     (right, down) float64 arrays of shape (height, width). `right[y, x]`
    ///     is the cost of the edge to (x+1, y), `down[y, x]` to (x, y+1).
    #[pyfunction]
    #[pyo3(signature = (image, flat_cost = 1e9, border_cost = 1e9, energy_scale = 1.0, rotate_gradient = true))]
    pub fn energy_weights<'py>(
        py: Python<'py>,
        image: &Bound<'py, PyAny>,
        flat_cost: f64,
        border_cost: f64,
        energy_scale: f64,
        rotate_gradient: bool,
    ) -> PyResult<(Bound<'py, PyArray2<f64>>, Bound<'py, PyArray2<f64>>)> {
        let config = build_config(flat_cost, border_cost, energy_scale, rotate_gradient, true);
        let field = if let Ok(img) = image.extract::<PyReadonlyArray3<'py, u8>>() {
            build_energy_field(img.as_array(), &config)
        } else {
            let img = image.extract::<PyReadonlyArray3<'py, f32>>()?;
            build_energy_field_f32(img.as_array(), &config)
        };

        let shape = (field.height(), field.width());
        let right = ndarray::Array2::from_shape_vec(shape, field.right_weights().to_vec())
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        let down = ndarray::Array2::from_shape_vec(shape, field.down_weights().to_vec())
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok((right.into_pyarray(py), down.into_pyarray(py)))
    }

    // ========================================================================
    // Selection Session
    // ========================================================================

    /// Interactive livewire selection over one image.
    ///
    /// Example:
    ///     session = LivewireSession()
    ///     session.load_image(image)
    ///     session.commit_anchor(10, 12)
    ///     live = session.move_cursor(40, 30)
    ///     session.commit_anchor(40, 30)
    ///     polygon = session.finalize()
    #[pyclass(unsendable)]
    pub struct LivewireSession {
        inner: SelectionSession,
    }

    #[pymethods]
    impl LivewireSession {
        /// Create a session with optional weight configuration.
        ///
        /// Args:
        ///     flat_cost: Weight of edges without gradient (default: 1e9)
        ///     border_cost: Weight of edges leaving the image (default: 1e9)
        ///     energy_scale: Numerator of the reciprocal weight (default: 1.0)
        ///     rotate_gradient: Weight edges so paths follow intensity edges (default: true)
        ///     parallel: Build the energy graph with rayon (default: true)
        ///
        /// Negative costs and scales are clamped to zero.
        #[new]
        #[pyo3(signature = (
            flat_cost = 1e9,
            border_cost = 1e9,
            energy_scale = 1.0,
            rotate_gradient = true,
            parallel = true
        ))]
        fn new(
            flat_cost: f64,
            border_cost: f64,
            energy_scale: f64,
            rotate_gradient: bool,
            parallel: bool,
        ) -> Self {
            let config = build_config(flat_cost, border_cost, energy_scale, rotate_gradient, parallel);
            Self {
                inner: SelectionSession::new(config),
            }
        }

        /// Load a u8 or f32 image of shape (height, width, channels).
        fn load_image<'py>(&mut self, image: &Bound<'py, PyAny>) -> PyResult<()> {
            if let Ok(img) = image.extract::<PyReadonlyArray3<'py, u8>>() {
                self.inner.load_image(img.as_array())?;
            } else {
                let img = image.extract::<PyReadonlyArray3<'py, f32>>()?;
                self.inner.load_image_f32(img.as_array())?;
            }
            Ok(())
        }

        fn commit_anchor(&mut self, x: usize, y: usize) -> PyResult<()> {
            Ok(self.inner.commit_anchor(GridPoint::new(x, y))?)
        }

        /// Update the live path and return it as a list of (x, y).
        fn move_cursor(&mut self, x: usize, y: usize) -> PyResult<Vec<(usize, usize)>> {
            let live = self.inner.move_cursor(GridPoint::new(x, y))?;
            Ok(to_tuples(live))
        }

        /// Close the outline and return the polygon, first point repeated last.
        fn finalize(&mut self) -> PyResult<Vec<(usize, usize)>> {
            let closed = self.inner.finalize_selection()?;
            Ok(to_tuples(closed.polygon()))
        }

        fn reset(&mut self) {
            self.inner.reset();
        }

        /// Mask of the closed selection as a (height, width) u8 array.
        fn selection_mask<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<u8>>> {
            let (width, height) = self.inner.dimensions().ok_or(LivewireError::NoImage)?;
            let closed = self.inner.closed_selection().ok_or(LivewireError::InvalidState {
                operation: "selection_mask",
                state: self.inner.state().name(),
            })?;
            let mask = closed.to_mask(width, height).mask;
            let arr = ndarray::Array2::from_shape_vec((height, width), mask)
                .map_err(|e| PyValueError::new_err(e.to_string()))?;
            Ok(arr.into_pyarray(py))
        }

        fn connected_path(&self) -> PyResult<Vec<(usize, usize)>> {
            Ok(to_tuples(&self.inner.connected_path()?))
        }

        #[getter]
        fn state(&self) -> &'static str {
            self.inner.state().name()
        }

        #[getter]
        fn anchors(&self) -> Vec<(usize, usize)> {
            to_tuples(self.inner.anchors())
        }

        #[getter]
        fn confirmed_path(&self) -> Vec<(usize, usize)> {
            to_tuples(self.inner.confirmed_path())
        }

        #[getter]
        fn live_path(&self) -> Vec<(usize, usize)> {
            to_tuples(self.inner.live_path())
        }

        /// Confirmed plus live path, for drawing.
        #[getter]
        fn outline(&self) -> Vec<(usize, usize)> {
            to_tuples(&self.inner.outline())
        }
    }

    #[pymodule]
    pub fn magnisnap_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(energy_weights, m)?)?;
        m.add_class::<LivewireSession>()?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::magnisnap_rust;
