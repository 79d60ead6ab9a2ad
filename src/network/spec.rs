use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::NetworkError;
use crate::layers::dense::Layer;
use crate::network::network::Network;
use crate::optim::sgd::UpdateRule;
use crate::train::parameters::{EtaSchedule, Parameters, DEFAULT_ETA, DEFAULT_MU};

fn default_bias() -> bool {
    true
}

fn default_eta() -> f64 {
    DEFAULT_ETA
}

fn default_mu() -> f64 {
    DEFAULT_MU
}

/// Describes one layer in a network specification.
///
/// Fields:
/// - `size`       — number of neurons in this layer
/// - `input_size` — number of neurons feeding into this layer (i.e. the output
///                  size of the previous layer, or the raw input dimension for
///                  the first layer)
/// - `activation` — activation function applied after the linear transform
/// - `bias`       — whether the layer carries per-unit biases (default `true`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub input_size: usize,
    pub activation: ActivationFunction,
    #[serde(default = "default_bias")]
    pub bias: bool,
}

/// A serializable description of a network architecture plus the training
/// hyperparameters it should be built with.  Only the architecture is
/// stored; weights are drawn fresh in [-1, 1] on every `build`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
    #[serde(default)]
    pub update_rule: UpdateRule,
    #[serde(default = "default_eta")]
    pub eta: f64,
    #[serde(default = "default_mu")]
    pub mu: f64,
    #[serde(default)]
    pub schedule: EtaSchedule,
}

impl NetworkSpec {
    /// `input → hidden… → output` with the given hidden activation and a
    /// softmax output layer.
    pub fn classifier(
        input_size: usize,
        hidden: &[usize],
        classes: usize,
        hidden_activation: ActivationFunction,
    ) -> NetworkSpec {
        let mut layers = Vec::with_capacity(hidden.len() + 1);
        let mut prev = input_size;
        for &size in hidden {
            layers.push(LayerSpec { size, input_size: prev, activation: hidden_activation, bias: true });
            prev = size;
        }
        layers.push(LayerSpec {
            size: classes,
            input_size: prev,
            activation: ActivationFunction::Softmax,
            bias: true,
        });

        NetworkSpec {
            layers,
            update_rule: UpdateRule::Plain,
            eta: DEFAULT_ETA,
            mu: DEFAULT_MU,
            schedule: EtaSchedule::Constant,
        }
    }

    /// Instantiates the network with uniformly random weights from `rng`.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network, NetworkError> {
        let params = Parameters::new(self.eta, self.mu, self.schedule)?;
        let layers = self.layers.iter()
            .map(|l| Layer::random(l.size, l.input_size, l.activation, l.bias, &mut *rng))
            .collect();
        Network::new(layers, params, self.update_rule)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<(), NetworkError> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec, NetworkError> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
