use serde::{Serialize, Deserialize};

/// Logistic sigmoid `1 / (1 + e^-z)`.  Saturates to 0 or 1 for extreme inputs.
pub fn logistic(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

pub fn relu(z: f64) -> f64 {
    z.max(0.0)
}

/// Numerically stable softmax: every logit is shifted by the maximum before
/// exponentiation, so large logits cannot overflow.  Agrees with
/// [`softmax_unshifted`] wherever the latter stays finite.
pub fn softmax(z: &[f64]) -> Vec<f64> {
    let c = z.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = z.iter().map(|&zi| (zi - c).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Single-pass softmax without the max shift.  Only valid when the logits are
/// known to be small; layers always use [`softmax`].
pub fn softmax_unshifted(z: &[f64]) -> Vec<f64> {
    let sum: f64 = z.iter().map(|zi| zi.exp()).sum();
    z.iter().map(|zi| zi.exp() / sum).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    Sigmoid,
    /// Softmax is a vector-valued activation; it is applied jointly over the
    /// whole pre-activation vector in `Layer::feed_forward()`.
    Softmax,
    #[serde(rename = "relu")]
    ReLU,
}

impl ActivationFunction {
    /// Applies the activation to a full pre-activation vector.
    pub fn apply(&self, z: &[f64]) -> Vec<f64> {
        match self {
            ActivationFunction::Sigmoid => z.iter().map(|&x| logistic(x)).collect(),
            ActivationFunction::ReLU => z.iter().map(|&x| relu(x)).collect(),
            ActivationFunction::Softmax => softmax(z),
        }
    }

    /// Local derivative `f'(z)` expressed through the stored output `y` or
    /// pre-activation `z`, whichever the function needs.
    ///
    /// Softmax has no element-wise derivative.  At the output it pairs with a
    /// cross-entropy signal where the Jacobian cancels, and it is rejected as a
    /// hidden layer when a network is built, so this path must not be reached.
    pub fn derivative(&self, z: f64, y: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => y * (1.0 - y),
            ActivationFunction::ReLU => if z > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::Softmax => {
                panic!("ActivationFunction::Softmax has no element-wise derivative; \
                        softmax may only be used as the output layer.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logistic_known_values() {
        assert_eq!(logistic(0.0), 0.5);
        assert!((logistic(2.0) - 0.8807970779778823).abs() < 1e-12);
        assert_eq!(logistic(-1000.0), 0.0);
        assert_eq!(logistic(1000.0), 1.0);
    }

    #[test]
    fn relu_clamps_negatives() {
        assert_eq!(relu(-3.0), 0.0);
        assert_eq!(relu(2.5), 2.5);
    }

    #[test]
    fn softmax_shift_matches_unshifted_for_small_logits() {
        let z = [0.1, -0.4, 1.2];
        let a = softmax(&z);
        let b = softmax_unshifted(&z);
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-12);
        }
    }

    #[test]
    fn softmax_survives_large_logits() {
        let y = softmax(&[1000.0, 999.0, -1000.0]);
        assert!(y.iter().all(|v| v.is_finite()));
        assert!((y.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(softmax_unshifted(&[1000.0, 999.0]).iter().any(|v| v.is_nan()));
    }

    #[test]
    fn derivatives() {
        assert_eq!(ActivationFunction::Sigmoid.derivative(0.0, 0.5), 0.25);
        assert_eq!(ActivationFunction::ReLU.derivative(-0.1, 0.0), 0.0);
        assert_eq!(ActivationFunction::ReLU.derivative(0.3, 0.3), 1.0);
        assert_eq!(ActivationFunction::ReLU.derivative(0.0, 0.0), 0.0);
    }

    #[test]
    #[should_panic(expected = "no element-wise derivative")]
    fn softmax_derivative_panics() {
        ActivationFunction::Softmax.derivative(0.0, 0.5);
    }
}
