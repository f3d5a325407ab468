//! Error types shared by the livewire engine and its bindings.

use thiserror::Error;

/// Errors surfaced by graph construction, path search, and the selection session.
///
/// An unreachable target is not an error: reconstruction returns an empty path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LivewireError {
    #[error("point ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    #[error("selection needs at least 3 points, got {points}")]
    EmptySelection { points: usize },
    #[error("{operation} is not allowed in state {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },
    #[error("no image loaded")]
    NoImage,
    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("edge weight at index {index} is negative or NaN")]
    InvalidWeight { index: usize },
    #[error("grid of {pixels} pixels exceeds the addressable node count")]
    GridTooLarge { pixels: usize },
}

pub type Result<T> = std::result::Result<T, LivewireError>;
