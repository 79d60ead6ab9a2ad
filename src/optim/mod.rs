pub mod sgd;

pub use sgd::UpdateRule;
