pub struct MseLoss;

impl MseLoss {
    /// Sum of squared differences: Σ (predicted - expected)²
    pub fn sum_squared(predicted: &[f64], expected: &[f64]) -> f64 {
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum()
    }

    /// Scalar MSE: mean((predicted - expected)²)
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        MseLoss::sum_squared(predicted, expected) / predicted.len() as f64
    }
}
