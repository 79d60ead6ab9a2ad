use serde::{Serialize, Deserialize};

use crate::{layers::dense::Layer, train::parameters::Parameters};

/// Weight-update discipline, fixed when a network is built.
///
/// - `Plain`            — `w -= η δ x` after every sample.
/// - `Momentum`         — one folded step `Δ = μ Δ_prev - η δ x`.
/// - `TwoPhaseMomentum` — `μ Δ_prev` is applied before the sample is fed
///   forward (`pre_step`), then `-η δ x` after backpropagation (`step`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateRule {
    #[default]
    Plain,
    Momentum,
    TwoPhaseMomentum,
}

impl UpdateRule {
    /// Runs before a sample's forward pass.  Only the two-phase discipline
    /// does anything here.
    pub fn pre_step(&self, layer: &mut Layer, params: &Parameters) {
        if let UpdateRule::TwoPhaseMomentum = self {
            layer.momentum_step(params.mu);
        }
    }

    /// Applies one sample's update to a layer whose deltas are ready.
    pub fn step(&self, layer: &mut Layer, params: &Parameters) {
        match self {
            UpdateRule::Plain            => layer.update_weights(params.eta()),
            UpdateRule::Momentum         => layer.update_weights_with_momentum(params.eta(), params.mu),
            UpdateRule::TwoPhaseMomentum => layer.correction_step(params.eta()),
        }
    }
}
