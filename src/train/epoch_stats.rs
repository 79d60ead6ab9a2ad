use serde::{Serialize, Deserialize};

/// Per-epoch training statistics emitted by `train_loop`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, the training
/// loop sends one `EpochStats` value at the end of every completed epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Learning rate used throughout this epoch.
    pub eta: f64,
    /// Mean training loss over all samples, measured at each sample's forward
    /// pass (before its update).
    pub train_loss: f64,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}

/// Outcome of evaluating a network on a labelled dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestReport {
    /// Samples whose predicted class differs from the label.
    pub failures: usize,
    pub total: usize,
    /// `100 * failures / total`; defined as `0.0` for an empty dataset.
    pub failure_rate: f64,
    pub elapsed_ms: u64,
}
