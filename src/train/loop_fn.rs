use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::NetworkError;
use crate::loss::loss_type::LossType;
use crate::math::vector::{argmax, one_hot, Vector};
use crate::network::network::Network;
use crate::train::epoch_stats::{EpochStats, TestReport};
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Trains `network` online (one update per sample, dataset order) for
/// `config.epochs` epochs and returns the statistics of every epoch.
///
/// At the start of each epoch the learning rate is refreshed from the
/// network's `Parameters` schedule.  Every sample is encoded as a one-hot
/// target of the output width, fed forward and backpropagated; under the
/// two-phase momentum rule the momentum pre-step runs before the forward pass.
///
/// The whole dataset is validated before the first update, so an error never
/// leaves the network half-trained.  An empty dataset is a no-op: no epoch
/// runs and the learning rate is left untouched.
pub fn train_loop(
    network: &mut Network,
    patterns: &[Vector],
    labels: &[usize],
    config: &TrainConfig,
) -> Result<Vec<EpochStats>, NetworkError> {
    validate_dataset(network, patterns, labels)?;
    network.discard_forward();

    if patterns.is_empty() {
        warn!("train called with an empty dataset; nothing to do");
        return Ok(Vec::new());
    }

    let classes = network.output_size();
    let loss_type = LossType::for_output(network.output_activation());
    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 0..config.epochs {
        network.params.update_eta(epoch);
        let t_start = Instant::now();

        // ── One full pass over the training data ───────────────────────────
        let mut total_loss = 0.0;
        for (pattern, &label) in patterns.iter().zip(labels) {
            let target = one_hot(label, classes);

            network.momentum_step();
            let output = network.feed_forward(pattern)?;
            total_loss += loss_type.loss(output, &target);
            network.backpropagate(&target);
        }

        let stats = EpochStats {
            epoch: epoch + 1,
            total_epochs: config.epochs,
            eta: network.params.eta(),
            train_loss: total_loss / patterns.len() as f64,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };

        info!(
            epoch = stats.epoch,
            total = stats.total_epochs,
            eta = stats.eta,
            loss = stats.train_loss,
            elapsed_ms = stats.elapsed_ms,
            "epoch finished"
        );

        if let Some(ref tx) = config.progress_tx {
            if tx.send(stats.clone()).is_err() {
                debug!("progress receiver dropped; continuing without it");
            }
        }

        history.push(stats);
    }

    Ok(history)
}

/// Feeds every pattern forward and counts a failure whenever the position of
/// the maximum output (lowest index on ties) differs from the label.
///
/// An empty dataset reports `total = 0` and a failure rate of `0.0`.
pub fn evaluate(
    network: &mut Network,
    patterns: &[Vector],
    labels: &[usize],
) -> Result<TestReport, NetworkError> {
    validate_dataset(network, patterns, labels)?;

    let t_start = Instant::now();
    let mut failures = 0usize;
    for (pattern, &label) in patterns.iter().zip(labels) {
        let output = network.feed_forward(pattern)?;
        if argmax(output) != label {
            failures += 1;
        }
    }
    network.discard_forward();

    let total = patterns.len();
    let failure_rate = if total == 0 {
        warn!("test called with an empty dataset; reporting a 0% failure rate");
        0.0
    } else {
        100.0 * failures as f64 / total as f64
    };

    let report = TestReport {
        failures,
        total,
        failure_rate,
        elapsed_ms: t_start.elapsed().as_millis() as u64,
    };

    info!(
        failures = report.failures,
        total = report.total,
        failure_rate = report.failure_rate,
        elapsed_ms = report.elapsed_ms,
        "test finished"
    );

    Ok(report)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Checks pattern/label counts, pattern widths and label range up front.
fn validate_dataset(
    network: &Network,
    patterns: &[Vector],
    labels: &[usize],
) -> Result<(), NetworkError> {
    if patterns.len() != labels.len() {
        return Err(NetworkError::DatasetLengthMismatch {
            patterns: patterns.len(),
            labels: labels.len(),
        });
    }

    let input_size = network.input_size();
    if let Some(bad) = patterns.iter().find(|p| p.len() != input_size) {
        return Err(NetworkError::ShapeMismatch {
            layer: 0,
            expected: input_size,
            actual: bad.len(),
        });
    }

    let classes = network.output_size();
    if let Some((index, &label)) = labels.iter().enumerate().find(|&(_, &l)| l >= classes) {
        return Err(NetworkError::LabelOutOfRange { index, label, classes });
    }

    Ok(())
}
