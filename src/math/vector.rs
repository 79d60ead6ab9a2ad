use rand::Rng;

/// Fixed-length sequence of reals used for layer inputs, outputs and deltas.
pub type Vector = Vec<f64>;

/// One-hot encoding: `1.0` at `label`, `0.0` elsewhere.
pub fn one_hot(label: usize, width: usize) -> Vector {
    let mut v = vec![0.0; width];
    v[label] = 1.0;
    v
}

/// Index of the maximum element.  Ties resolve to the lowest index; an empty
/// slice yields 0.
pub fn argmax(v: &[f64]) -> usize {
    let mut best = 0;
    for (i, &x) in v.iter().enumerate() {
        if x > v[best] {
            best = i;
        }
    }
    best
}

/// Uniform initialization in [-1, 1].
pub fn random_vector<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vector {
    (0..len).map(|_| rng.gen::<f64>() * 2.0 - 1.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_prefers_lowest_index_on_ties() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4, 0.0]), 1);
        assert_eq!(argmax(&[0.5, 0.5]), 0);
        assert_eq!(argmax(&[]), 0);
    }

    #[test]
    fn one_hot_marks_single_class() {
        assert_eq!(one_hot(2, 4), vec![0.0, 0.0, 1.0, 0.0]);
    }
}
