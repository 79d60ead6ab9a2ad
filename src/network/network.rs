use tracing::debug;

use crate::{
    activation::activation::ActivationFunction,
    error::NetworkError,
    layers::dense::Layer,
    math::vector::{argmax, Vector},
    optim::sgd::UpdateRule,
    train::{
        epoch_stats::{EpochStats, TestReport},
        loop_fn::{evaluate, train_loop},
        parameters::Parameters,
        train_config::TrainConfig,
    },
};

/// A linear chain of layers: index 0 is nearest the input, the last layer
/// produces the class scores.
#[derive(Debug, Clone)]
pub struct Network {
    pub layers: Vec<Layer>,
    pub params: Parameters,
    rule: UpdateRule,
}

impl Network {
    /// Builds a network, checking that adjacent widths agree and that softmax
    /// appears only as the output layer.
    pub fn new(layers: Vec<Layer>, params: Parameters, rule: UpdateRule) -> Result<Network, NetworkError> {
        let last = layers.len().checked_sub(1).ok_or(NetworkError::EmptyNetwork)?;

        for (i, layer) in layers.iter().enumerate() {
            if i < last && layer.activator == ActivationFunction::Softmax {
                return Err(NetworkError::SoftmaxHiddenLayer { layer: i });
            }
            if i > 0 && layer.input_size != layers[i - 1].size {
                return Err(NetworkError::LayerChainMismatch {
                    layer: i,
                    expected: layers[i - 1].size,
                    actual: layer.input_size,
                });
            }
        }

        debug!(
            widths = ?layers.iter().map(|l| l.size).collect::<Vec<_>>(),
            input = layers[0].input_size,
            rule = ?rule,
            eta = params.eta(),
            mu = params.mu,
            "network built"
        );

        Ok(Network { layers, params, rule })
    }

    pub fn rule(&self) -> UpdateRule {
        self.rule
    }

    pub fn input_size(&self) -> usize {
        self.layers[0].input_size
    }

    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].size
    }

    pub fn output_activation(&self) -> ActivationFunction {
        self.layers[self.layers.len() - 1].activator
    }

    /// Forward pass; every layer keeps its input and activations for backprop.
    pub fn feed_forward(&mut self, pattern: &[f64]) -> Result<&[f64], NetworkError> {
        self.layers[0].feed_forward(pattern).map_err(|e| e.at_layer(0))?;
        for i in 1..self.layers.len() {
            let (done, rest) = self.layers.split_at_mut(i);
            rest[0].feed_forward(done[i - 1].output()).map_err(|e| e.at_layer(i))?;
        }
        Ok(self.output())
    }

    /// Output of the last forward pass.
    pub fn output(&self) -> &[f64] {
        self.layers[self.layers.len() - 1].output()
    }

    /// Drops the state of a forward pass that will not be backpropagated, as
    /// left behind by `test` or `predict`.
    pub fn discard_forward(&mut self) {
        for layer in self.layers.iter_mut() {
            layer.discard_forward();
        }
    }

    /// Momentum pre-step on every layer; a no-op unless the update rule is
    /// `TwoPhaseMomentum`.  Must run before the sample's `feed_forward`.
    pub fn momentum_step(&mut self) {
        let (rule, params) = (self.rule, &self.params);
        for layer in self.layers.iter_mut() {
            rule.pre_step(layer, params);
        }
    }

    /// Computes the output deltas from `target`, propagates hidden deltas from
    /// the second-to-last layer down to the first, then applies the update rule
    /// to every layer in forward order.
    pub fn backpropagate(&mut self, target: &[f64]) {
        self.calculate_deltas(target);

        let (rule, params) = (self.rule, &self.params);
        for layer in self.layers.iter_mut() {
            rule.step(layer, params);
        }
    }

    /// Delta computation only, without any weight update.
    pub fn calculate_deltas(&mut self, target: &[f64]) {
        let last = self.layers.len() - 1;
        self.layers[last].calculate_deltas(target);

        for i in (0..last).rev() {
            let (head, tail) = self.layers.split_at_mut(i + 1);
            head[i].calculate_hidden_deltas(tail[0].deltas(), tail[0].weights());
        }
    }

    /// Trains for `epochs` epochs.  See [`train_loop`].
    pub fn train(
        &mut self,
        patterns: &[Vector],
        labels: &[usize],
        epochs: usize,
    ) -> Result<Vec<EpochStats>, NetworkError> {
        train_loop(self, patterns, labels, &TrainConfig::new(epochs))
    }

    pub fn train_with(
        &mut self,
        patterns: &[Vector],
        labels: &[usize],
        config: &TrainConfig,
    ) -> Result<Vec<EpochStats>, NetworkError> {
        train_loop(self, patterns, labels, config)
    }

    /// Evaluates the network and reports its failure rate.  See [`evaluate`].
    pub fn test(&mut self, patterns: &[Vector], labels: &[usize]) -> Result<TestReport, NetworkError> {
        evaluate(self, patterns, labels)
    }

    /// Predicted class of a single pattern (lowest index on ties).
    pub fn predict(&mut self, pattern: &[f64]) -> Result<usize, NetworkError> {
        let class = argmax(self.feed_forward(pattern)?);
        self.discard_forward();
        Ok(class)
    }
}
