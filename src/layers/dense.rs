use rand::Rng;

use crate::{
    activation::activation::ActivationFunction,
    error::NetworkError,
    math::{matrix::Matrix, vector::{random_vector, Vector}},
};

/// Where a layer stands in its per-sample cycle.
///
/// `Idle -> feed_forward -> Forwarded -> (hidden) deltas -> DeltasReady -> update -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerPhase {
    Idle,
    Forwarded,
    DeltasReady,
}

/// Fully connected layer.  The variant (sigmoid hidden, ReLU hidden, softmax
/// output) is selected by `activator`.
#[derive(Debug, Clone)]
pub struct Layer{
    pub size: usize,
    pub input_size: usize,
    pub activator: ActivationFunction,
    weights: Matrix,           // size x input_size
    biases: Option<Vector>,
    // Previous increments, same shapes as weights/biases.
    weight_increments: Matrix,
    bias_increments: Option<Vector>,
    input: Vector,
    pre_neurons: Vector,       // z = Wx + b, needed by the ReLU derivative
    neurons: Vector,
    deltas: Vector,
    phase: LayerPhase,
}

impl Layer {
    /// Layer with weights and biases drawn uniformly from [-1, 1].
    pub fn new<R: Rng + ?Sized>(
        size: usize,
        input_size: usize,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> Layer {
        Layer::random(size, input_size, activation, true, rng)
    }

    pub fn random<R: Rng + ?Sized>(
        size: usize,
        input_size: usize,
        activation: ActivationFunction,
        bias: bool,
        rng: &mut R,
    ) -> Layer {
        let weights = Matrix::random(size, input_size, rng);
        let biases = if bias { Some(random_vector(size, rng)) } else { None };
        Layer::assemble(size, input_size, activation, weights, biases)
    }

    /// Layer with explicit row-major weights (`size` rows of `input_size`)
    /// and optional biases.
    pub fn from_parts(
        size: usize,
        input_size: usize,
        activation: ActivationFunction,
        weights: &[f64],
        biases: Option<&[f64]>,
    ) -> Result<Layer, NetworkError> {
        let weights = Matrix::from_flat(size, input_size, weights)?;
        let biases = match biases {
            Some(b) if b.len() != size => {
                return Err(NetworkError::ParameterLength { expected: size, actual: b.len() });
            }
            Some(b) => Some(b.to_vec()),
            None => None,
        };
        Ok(Layer::assemble(size, input_size, activation, weights, biases))
    }

    fn assemble(
        size: usize,
        input_size: usize,
        activator: ActivationFunction,
        weights: Matrix,
        biases: Option<Vector>,
    ) -> Layer {
        let bias_increments = biases.as_ref().map(|_| vec![0.0; size]);
        Layer {
            size,
            input_size,
            activator,
            weights,
            biases,
            weight_increments: Matrix::zeros(size, input_size),
            bias_increments,
            input: Vec::new(),
            pre_neurons: Vec::new(),
            neurons: Vec::new(),
            deltas: Vec::new(),
            phase: LayerPhase::Idle,
        }
    }

    /// Forward pass: stores the input, `z = Wx (+ b)` and the activated output.
    pub fn feed_forward(&mut self, input: &[f64]) -> Result<&[f64], NetworkError> {
        if input.len() != self.input_size {
            return Err(NetworkError::ShapeMismatch {
                layer: 0,
                expected: self.input_size,
                actual: input.len(),
            });
        }

        let mut z = self.weights.mul_vec(input);
        if let Some(biases) = &self.biases {
            for (zi, b) in z.iter_mut().zip(biases) {
                *zi += b;
            }
        }

        self.neurons = self.activator.apply(&z);
        self.pre_neurons = z;
        self.input.clear();
        self.input.extend_from_slice(input);
        self.phase = LayerPhase::Forwarded;
        Ok(&self.neurons)
    }

    /// Most recent output.  Empty before the first `feed_forward`.
    pub fn output(&self) -> &[f64] {
        &self.neurons
    }

    pub fn pre_activation(&self) -> &[f64] {
        &self.pre_neurons
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn biases(&self) -> Option<&[f64]> {
        self.biases.as_deref()
    }

    pub fn deltas(&self) -> &[f64] {
        &self.deltas
    }

    pub fn weight_increments(&self) -> &Matrix {
        &self.weight_increments
    }

    pub fn phase(&self) -> LayerPhase {
        self.phase
    }

    /// Output-layer deltas against a target vector.
    ///
    /// Softmax pairs with a cross-entropy signal, so the delta is exactly
    /// `output - target`.  Other activations multiply by their local derivative,
    /// e.g. `y(1 - y)(y - t)` for sigmoid.
    pub fn calculate_deltas(&mut self, target: &[f64]) {
        self.expect_phase(LayerPhase::Forwarded, "calculate_deltas");
        assert_eq!(target.len(), self.size, "target length must equal the layer output width");

        self.deltas = match self.activator {
            ActivationFunction::Softmax => self.neurons.iter()
                .zip(target)
                .map(|(y, t)| y - t)
                .collect(),
            activator => self.neurons.iter()
                .zip(&self.pre_neurons)
                .zip(target)
                .map(|((&y, &z), t)| activator.derivative(z, y) * (y - t))
                .collect(),
        };
        self.phase = LayerPhase::DeltasReady;
    }

    /// Hidden-layer deltas: `δ_i = f'(z_i) · Σ_j next_deltas[j] · next_weights[j][i]`.
    pub fn calculate_hidden_deltas(&mut self, next_deltas: &[f64], next_weights: &Matrix) {
        self.expect_phase(LayerPhase::Forwarded, "calculate_hidden_deltas");
        assert_eq!(next_weights.cols, self.size, "next layer weights do not match this layer's width");

        let upstream = next_weights.transpose_mul_vec(next_deltas);
        let activator = self.activator;
        self.deltas = upstream.iter()
            .zip(&self.pre_neurons)
            .zip(&self.neurons)
            .map(|((g, &z), &y)| activator.derivative(z, y) * g)
            .collect();
        self.phase = LayerPhase::DeltasReady;
    }

    /// Plain gradient step: `w_ij -= η δ_i x_j`, `b_i -= η δ_i`.
    pub fn update_weights(&mut self, eta: f64) {
        self.expect_phase(LayerPhase::DeltasReady, "update_weights");

        for i in 0..self.size {
            let step = eta * self.deltas[i];
            for (w, x) in self.weights.data[i].iter_mut().zip(&self.input) {
                *w -= step * x;
            }
            if let Some(biases) = self.biases.as_mut() {
                biases[i] -= step;
            }
        }
        self.phase = LayerPhase::Idle;
    }

    /// Single-step momentum: `Δ = μ Δ_prev - η δ_i x_j`, applied and retained.
    pub fn update_weights_with_momentum(&mut self, eta: f64, mu: f64) {
        self.expect_phase(LayerPhase::DeltasReady, "update_weights_with_momentum");

        for i in 0..self.size {
            let step = eta * self.deltas[i];
            let row = self.weights.data[i].iter_mut().zip(self.weight_increments.data[i].iter_mut());
            for ((w, inc), x) in row.zip(&self.input) {
                *inc = mu * *inc - step * x;
                *w += *inc;
            }
            if let (Some(biases), Some(incs)) = (self.biases.as_mut(), self.bias_increments.as_mut()) {
                incs[i] = mu * incs[i] - step;
                biases[i] += incs[i];
            }
        }
        self.phase = LayerPhase::Idle;
    }

    /// First half of the two-phase discipline: applies `μ Δ_prev` before the
    /// next sample is fed forward.  The stored increment is left untouched.
    pub fn momentum_step(&mut self, mu: f64) {
        self.expect_phase(LayerPhase::Idle, "momentum_step");

        for (row, incs) in self.weights.data.iter_mut().zip(&self.weight_increments.data) {
            for (w, inc) in row.iter_mut().zip(incs) {
                *w += mu * inc;
            }
        }
        if let (Some(biases), Some(incs)) = (self.biases.as_mut(), self.bias_increments.as_ref()) {
            for (b, inc) in biases.iter_mut().zip(incs) {
                *b += mu * inc;
            }
        }
    }

    /// Second half of the two-phase discipline: applies `-η δ_i x_j` and
    /// stores exactly that correction as the increment the next
    /// `momentum_step` scales.
    pub fn correction_step(&mut self, eta: f64) {
        self.expect_phase(LayerPhase::DeltasReady, "correction_step");

        for i in 0..self.size {
            let step = eta * self.deltas[i];
            let row = self.weights.data[i].iter_mut().zip(self.weight_increments.data[i].iter_mut());
            for ((w, inc), x) in row.zip(&self.input) {
                *inc = -step * x;
                *w += *inc;
            }
            if let (Some(biases), Some(incs)) = (self.biases.as_mut(), self.bias_increments.as_mut()) {
                incs[i] = -step;
                biases[i] += incs[i];
            }
        }
        self.phase = LayerPhase::Idle;
    }

    /// Drops the state of a forward pass that will not be backpropagated
    /// (evaluation), returning a `Forwarded` layer to `Idle`.
    pub fn discard_forward(&mut self) {
        if self.phase == LayerPhase::Forwarded {
            self.phase = LayerPhase::Idle;
        }
    }

    fn expect_phase(&self, expected: LayerPhase, op: &str) {
        assert!(
            self.phase == expected,
            "InvalidLayerOrder: {op} requires phase {expected:?}, layer is {:?}",
            self.phase
        );
    }
}
