pub mod activation;

pub use activation::{logistic, relu, softmax, softmax_unshifted, ActivationFunction};
