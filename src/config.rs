//! Configuration for energy-to-weight mapping.
//!
//! The reciprocal-energy formula and the flat-region sentinel are numeric policy
//! choices rather than fixed contracts, so every constant is tunable here.
//!
//! # Example
//! ```
//! use magnisnap_rust::LivewireConfig;
//!
//! let config = LivewireConfig::builder()
//!     .flat_cost(1e6)
//!     .parallel(false)
//!     .build();
//! assert_eq!(config.flat_cost, 1e6);
//! ```

/// Luminance coefficients applied to RGB samples before differentiation.
pub const DEFAULT_LUMA: [f64; 3] = [0.21, 0.72, 0.07];

/// Cost assigned to edges with no gradient, and to edges leaving the grid.
pub const DEFAULT_SENTINEL_COST: f64 = 1e9;

/// Energy graph configuration.
///
/// Immutable once handed to a session; rebuild the field to apply changes.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LivewireConfig {
    /// Weight used where energy is at or below `min_energy` (default: 1e9).
    /// Finite so flat regions stay traversable, just expensive.
    pub flat_cost: f64,
    /// Weight stored on the right edge of the last column and the down edge
    /// of the last row (default: 1e9).
    pub border_cost: f64,
    /// Numerator of the reciprocal mapping `weight = energy_scale / E` (default: 1.0).
    pub energy_scale: f64,
    /// Energies at or below this value count as flat (default: 0.0).
    pub min_energy: f64,
    /// R, G, B luminance weights (default: 0.21, 0.72, 0.07).
    pub luma: [f64; 3],
    /// Weight the right edge by the vertical gradient and the down edge by
    /// the horizontal one, so paths run along intensity edges (default: true).
    /// When false each edge takes the gradient along its own axis.
    pub rotate_gradient: bool,
    /// Compute energy rows on the rayon pool (default: true).
    pub parallel: bool,
}

impl Default for LivewireConfig {
    fn default() -> Self {
        Self {
            flat_cost: DEFAULT_SENTINEL_COST,
            border_cost: DEFAULT_SENTINEL_COST,
            energy_scale: 1.0,
            min_energy: 0.0,
            luma: DEFAULT_LUMA,
            rotate_gradient: true,
            parallel: true,
        }
    }
}

impl LivewireConfig {
    /// Create a new builder for `LivewireConfig`.
    #[must_use]
    pub fn builder() -> LivewireConfigBuilder {
        LivewireConfigBuilder::default()
    }

    /// Map one energy component to an edge weight.
    ///
    /// Never negative: negative or NaN results are clamped to zero.
    #[inline]
    pub fn weight_for(&self, energy: f64) -> f64 {
        let weight = if energy > self.min_energy {
            self.energy_scale / energy
        } else {
            self.flat_cost
        };
        weight.max(0.0)
    }

    /// Weight stored on grid-border edges, clamped like [`Self::weight_for`].
    #[inline]
    pub fn border_weight(&self) -> f64 {
        self.border_cost.max(0.0)
    }
}

/// Builder for [`LivewireConfig`].
#[derive(Default)]
pub struct LivewireConfigBuilder {
    flat_cost: Option<f64>,
    border_cost: Option<f64>,
    energy_scale: Option<f64>,
    min_energy: Option<f64>,
    luma: Option<[f64; 3]>,
    rotate_gradient: Option<bool>,
    parallel: Option<bool>,
}

impl LivewireConfigBuilder {
    /// Set the cost of edges through zero-gradient regions.
    ///
    /// Negative or NaN costs are clamped to zero; this applies to every cost
    /// and the scale below.
    #[must_use]
    pub fn flat_cost(mut self, cost: f64) -> Self {
        self.flat_cost = Some(cost.max(0.0));
        self
    }

    /// Set the cost stored on grid-border edges.
    #[must_use]
    pub fn border_cost(mut self, cost: f64) -> Self {
        self.border_cost = Some(cost.max(0.0));
        self
    }

    /// Set both sentinel costs at once.
    #[must_use]
    pub fn sentinel_cost(self, cost: f64) -> Self {
        self.flat_cost(cost).border_cost(cost)
    }

    /// Set the reciprocal mapping numerator.
    #[must_use]
    pub fn energy_scale(mut self, scale: f64) -> Self {
        self.energy_scale = Some(scale.max(0.0));
        self
    }

    /// Set the flat-region energy threshold.
    #[must_use]
    pub fn min_energy(mut self, threshold: f64) -> Self {
        self.min_energy = Some(threshold);
        self
    }

    /// Set the luminance coefficients.
    #[must_use]
    pub fn luma(mut self, r: f64, g: f64, b: f64) -> Self {
        self.luma = Some([r, g, b]);
        self
    }

    /// Choose between rotated (edge-following) and axis-aligned gradients.
    #[must_use]
    pub fn rotate_gradient(mut self, enable: bool) -> Self {
        self.rotate_gradient = Some(enable);
        self
    }

    /// Enable or disable parallel energy construction.
    #[must_use]
    pub fn parallel(mut self, enable: bool) -> Self {
        self.parallel = Some(enable);
        self
    }

    /// Build the configuration, using defaults for unset fields.
    #[must_use]
    pub fn build(self) -> LivewireConfig {
        let d = LivewireConfig::default();
        LivewireConfig {
            flat_cost: self.flat_cost.unwrap_or(d.flat_cost),
            border_cost: self.border_cost.unwrap_or(d.border_cost),
            energy_scale: self.energy_scale.unwrap_or(d.energy_scale),
            min_energy: self.min_energy.unwrap_or(d.min_energy),
            luma: self.luma.unwrap_or(d.luma),
            rotate_gradient: self.rotate_gradient.unwrap_or(d.rotate_gradient),
            parallel: self.parallel.unwrap_or(d.parallel),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_match_default() {
        assert_eq!(LivewireConfig::builder().build(), LivewireConfig::default());
    }

    #[test]
    fn test_weight_for_reciprocal_and_flat() {
        let config = LivewireConfig::default();
        assert_eq!(config.weight_for(4.0), 0.25);
        assert_eq!(config.weight_for(0.0), DEFAULT_SENTINEL_COST);
    }

    #[test]
    fn test_tuned_mapping() {
        let config = LivewireConfig::builder()
            .energy_scale(10.0)
            .min_energy(2.0)
            .sentinel_cost(500.0)
            .build();
        assert_eq!(config.weight_for(5.0), 2.0);
        assert_eq!(config.weight_for(2.0), 500.0);
        assert_eq!(config.border_cost, 500.0);
    }

    #[test]
    fn test_negative_costs_are_clamped() {
        let config = LivewireConfig::builder()
            .energy_scale(-1.0)
            .flat_cost(-5.0)
            .border_cost(f64::NAN)
            .build();
        assert_eq!(config.energy_scale, 0.0);
        assert_eq!(config.flat_cost, 0.0);
        assert_eq!(config.border_cost, 0.0);
        assert_eq!(config.weight_for(3.0), 0.0);

        // Fields are public, so the mapping clamps too.
        let raw = LivewireConfig {
            energy_scale: -2.0,
            flat_cost: -1.0,
            border_cost: -1.0,
            ..LivewireConfig::default()
        };
        assert_eq!(raw.weight_for(4.0), 0.0);
        assert_eq!(raw.weight_for(0.0), 0.0);
        assert_eq!(raw.border_weight(), 0.0);
    }
}
