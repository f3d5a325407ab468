//! Livewire (intelligent scissors) boundary tracing.
//!
//! This module provides the pieces of an edge-snapping selection tool:
//! - **Energy field**: gradient-derived edge weights for the 4-connected pixel graph
//! - **Shortest paths**: single-source Dijkstra with an indexed min-heap
//! - **Stitching**: per-anchor segments joined into one continuous outline
//! - **Session**: the click / move / finalize state machine driving it all
//!
//! Used by the lasso tool in MagniSnap; the Python and WASM bindings wrap
//! [`SelectionSession`] directly.

pub mod dijkstra;
pub mod energy;
pub mod geometry;
pub mod heap;
pub mod mask;
pub mod path;
pub mod session;

pub use dijkstra::{ShortestPathEngine, ShortestPathTree, NO_PARENT};
pub use energy::{build_energy_field, build_energy_field_f32, EnergyField};
pub use geometry::{GridPoint, Path};
pub use mask::{polygon_mask, SelectionMask};
pub use path::{connect_anchors, path_cost, reconstruct};
pub use session::{ClosedSelection, SelectionSession, SessionState};
