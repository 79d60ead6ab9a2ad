use crate::activation::activation::ActivationFunction;
use crate::loss::{cross_entropy::CrossEntropyLoss, mse::MseLoss};

/// Loss reported during training, determined by the output activation.
///
/// - `CrossEntropy` — Softmax output; its delta `output - target` is the
///   combined Softmax + cross-entropy gradient.
/// - `Mse`          — any other output activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossType {
    Mse,
    CrossEntropy,
}

impl LossType {
    pub fn for_output(activation: ActivationFunction) -> LossType {
        match activation {
            ActivationFunction::Softmax => LossType::CrossEntropy,
            _ => LossType::Mse,
        }
    }

    pub fn loss(&self, predicted: &[f64], expected: &[f64]) -> f64 {
        match self {
            LossType::Mse          => MseLoss::loss(predicted, expected),
            LossType::CrossEntropy => CrossEntropyLoss::loss(predicted, expected),
        }
    }
}
