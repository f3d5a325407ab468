//! Interactive livewire selection state machine.
//!
//! ```text
//! Idle --load--> GraphReady --commit--> Tracing --finalize--> Closed
//!                    ^                     |  ^                  |
//!                    +------- reset -------+  +- commit / move   |
//!                    +---------------- reset / load -------------+
//! ```
//!
//! Committing an anchor runs a full-grid Dijkstra; moving the cursor only
//! walks the existing tree, so it stays cheap enough for every pointer event.
//! Coordinates arrive in grid space, already clamped by the viewport layer.

use std::fmt;
use std::sync::Arc;

use ndarray::ArrayView3;

use crate::config::LivewireConfig;
use crate::error::{LivewireError, Result};
use crate::livewire::dijkstra::{ShortestPathEngine, ShortestPathTree};
use crate::livewire::energy::{build_energy_field, build_energy_field_f32, EnergyField};
use crate::livewire::geometry::{append_segment, GridPoint, Path};
use crate::livewire::mask::{polygon_mask, SelectionMask};
use crate::livewire::path::{connect_anchors, reconstruct};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No image loaded.
    Idle,
    /// Graph built, no anchor committed.
    GraphReady,
    /// At least one anchor committed; the live path follows the cursor.
    Tracing,
    /// Selection finalized; reset or load a new image to trace again.
    Closed,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::GraphReady => "graph_ready",
            Self::Tracing => "tracing",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Closed outline produced by [`SelectionSession::finalize_selection`].
///
/// The last point repeats the first.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedSelection {
    polygon: Path,
}

impl ClosedSelection {
    pub fn polygon(&self) -> &[GridPoint] {
        &self.polygon
    }

    pub fn into_polygon(self) -> Path {
        self.polygon
    }

    /// Even-odd fill of the polygon, ready for crop/export.
    pub fn to_mask(&self, width: usize, height: usize) -> SelectionMask {
        polygon_mask(&self.polygon, width, height)
    }
}

/// One user's livewire trace over one image.
#[derive(Debug)]
pub struct SelectionSession {
    config: LivewireConfig,
    engine: Option<ShortestPathEngine>,
    anchors: Vec<GridPoint>,
    confirmed: Path,
    live: Path,
    cursor: Option<GridPoint>,
    closed: Option<ClosedSelection>,
    state: SessionState,
}

impl Default for SelectionSession {
    fn default() -> Self {
        Self::new(LivewireConfig::default())
    }
}

impl SelectionSession {
    pub fn new(config: LivewireConfig) -> Self {
        Self {
            config,
            engine: None,
            anchors: Vec::new(),
            confirmed: Vec::new(),
            live: Vec::new(),
            cursor: None,
            closed: None,
            state: SessionState::Idle,
        }
    }

    pub fn config(&self) -> &LivewireConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Committed anchors in click order.
    pub fn anchors(&self) -> &[GridPoint] {
        &self.anchors
    }

    /// Locked-in outline, continuous across all committed segments.
    pub fn confirmed_path(&self) -> &[GridPoint] {
        &self.confirmed
    }

    /// Path from the last anchor to the cursor.
    pub fn live_path(&self) -> &[GridPoint] {
        &self.live
    }

    pub fn cursor(&self) -> Option<GridPoint> {
        self.cursor
    }

    pub fn active_tree(&self) -> Option<&ShortestPathTree> {
        self.engine.as_ref().and_then(|e| e.tree())
    }

    pub fn field(&self) -> Option<&Arc<EnergyField>> {
        self.engine.as_ref().map(|e| e.field())
    }

    /// `(width, height)` of the loaded image.
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.field().map(|f| (f.width(), f.height()))
    }

    pub fn closed_selection(&self) -> Option<&ClosedSelection> {
        self.closed.as_ref()
    }

    /// Build the energy graph for a new image and discard any trace.
    pub fn load_image(&mut self, image: ArrayView3<u8>) -> Result<()> {
        let field = build_energy_field(image, &self.config);
        self.load_field(field)
    }

    /// f32 variant of [`Self::load_image`].
    pub fn load_image_f32(&mut self, image: ArrayView3<f32>) -> Result<()> {
        let field = build_energy_field_f32(image, &self.config);
        self.load_field(field)
    }

    /// Install a prebuilt energy field.
    pub fn load_field(&mut self, field: EnergyField) -> Result<()> {
        let engine = ShortestPathEngine::new(Arc::new(field))?;
        tracing::debug!(width = engine.field().width(), height = engine.field().height(), "graph ready");
        self.engine = Some(engine);
        self.clear_trace();
        self.state = SessionState::GraphReady;
        Ok(())
    }

    /// Lock the path to `point` and start a new shortest-path tree there.
    ///
    /// The segment folded into the confirmed path is recomputed to `point`
    /// itself, so the outline stays continuous even without a preceding
    /// cursor move. Re-clicking the current anchor is a no-op. On error
    /// nothing is modified.
    pub fn commit_anchor(&mut self, point: GridPoint) -> Result<()> {
        self.require(&[SessionState::GraphReady, SessionState::Tracing], "commit_anchor")?;
        let engine = self.engine.as_mut().ok_or(LivewireError::NoImage)?;
        let field = engine.field();
        point.check_bounds(field.width(), field.height())?;
        if self.anchors.last() == Some(&point) {
            tracing::debug!(x = point.x, y = point.y, "anchor already committed");
            return Ok(());
        }

        let segment = engine
            .tree()
            .map(|tree| reconstruct(tree, point))
            .unwrap_or_default();
        engine.compute(point, None)?;

        append_segment(&mut self.confirmed, &segment);
        self.anchors.push(point);
        self.live.clear();
        self.cursor = Some(point);
        self.state = SessionState::Tracing;

        tracing::debug!(
            x = point.x,
            y = point.y,
            anchors = self.anchors.len(),
            confirmed = self.confirmed.len(),
            "anchor committed"
        );
        Ok(())
    }

    /// Recompute the live path to `point` from the current tree.
    ///
    /// Points outside the grid or not yet reached give an empty live path.
    pub fn move_cursor(&mut self, point: GridPoint) -> Result<&[GridPoint]> {
        self.require(&[SessionState::Tracing], "move_cursor")?;
        let tree = self.active_tree().ok_or(LivewireError::NoImage)?;
        let live = reconstruct(tree, point);
        let in_bounds = point.in_bounds(tree.width(), tree.height());

        self.live = live;
        self.cursor = in_bounds.then_some(point);
        Ok(&self.live)
    }

    /// Confirmed path with the live path folded in, for rendering.
    pub fn outline(&self) -> Path {
        let mut outline = self.confirmed.clone();
        append_segment(&mut outline, &self.live);
        outline
    }

    /// Close the outline and end the session.
    ///
    /// Needs at least three points after folding in the live path; otherwise
    /// fails with `EmptySelection` and the session stays in `Tracing`.
    pub fn finalize_selection(&mut self) -> Result<&ClosedSelection> {
        self.require(&[SessionState::Tracing], "finalize_selection")?;

        let outline = self.outline();
        if outline.len() < 3 {
            tracing::warn!(points = outline.len(), "selection too small to close");
            return Err(LivewireError::EmptySelection {
                points: outline.len(),
            });
        }

        let mut polygon = outline.clone();
        if polygon.first() != polygon.last() {
            polygon.push(polygon[0]);
        }

        self.confirmed = outline;
        self.live.clear();
        self.state = SessionState::Closed;
        tracing::debug!(points = polygon.len(), "selection closed");

        Ok(self.closed.insert(ClosedSelection { polygon }))
    }

    /// Forget anchors, paths, and the active tree; keep the loaded image.
    pub fn reset(&mut self) {
        self.clear_trace();
        self.state = if self.engine.is_some() {
            SessionState::GraphReady
        } else {
            SessionState::Idle
        };
    }

    /// Re-stitch the committed anchors in one batch.
    ///
    /// Runs on a separate engine over the same field, so the interactive tree
    /// is left untouched.
    pub fn connected_path(&self) -> Result<Path> {
        let field = self.field().ok_or(LivewireError::NoImage)?;
        let mut engine = ShortestPathEngine::new(Arc::clone(field))?;
        connect_anchors(&mut engine, &self.anchors)
    }

    fn clear_trace(&mut self) {
        self.anchors.clear();
        self.confirmed.clear();
        self.live.clear();
        self.cursor = None;
        self.closed = None;
        if let Some(engine) = self.engine.as_mut() {
            engine.clear();
        }
    }

    fn require(&self, allowed: &[SessionState], operation: &'static str) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(LivewireError::InvalidState {
                operation,
                state: self.state.name(),
            })
        }
    }
}
