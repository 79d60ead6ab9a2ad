pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod data;
pub mod error;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use math::vector::Vector;
pub use activation::activation::ActivationFunction;
pub use layers::dense::{Layer, LayerPhase};
pub use network::network::Network;
pub use network::spec::{LayerSpec, NetworkSpec};
pub use loss::{CrossEntropyLoss, MseLoss};
pub use optim::sgd::UpdateRule;
pub use train::{EpochStats, EtaSchedule, Parameters, TestReport, TrainConfig};
pub use data::idx::Dataset;
pub use error::{DataError, NetworkError};
