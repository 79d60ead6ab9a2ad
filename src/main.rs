//! Trains a digit classifier on MNIST and reports its test failure rate.
//!
//! ```bash
//! cargo run --release -- --data-dir data/mnist --hidden 256 --epochs 10
//! cargo run --release -- --data-dir data/mnist --rule two-phase-momentum --decay
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use mnist_mlp::{data::load_mnist, ActivationFunction, EtaSchedule, NetworkSpec, UpdateRule};

const CLASSES: usize = 10;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum HiddenActivation {
    Sigmoid,
    Relu,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Rule {
    Plain,
    Momentum,
    TwoPhaseMomentum,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Train a multilayer perceptron on MNIST")]
struct Args {
    /// Directory holding the MNIST IDX files, plain or `.gz`
    #[arg(long, default_value = "data/mnist")]
    data_dir: PathBuf,

    /// JSON network spec; overrides the architecture and training flags below
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective network spec to this JSON file before training
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Hidden layer widths (repeatable)
    #[arg(long, default_values_t = vec![256])]
    hidden: Vec<usize>,

    /// Hidden layer activation
    #[arg(long, value_enum, default_value = "sigmoid")]
    activation: HiddenActivation,

    /// Number of epochs
    #[arg(long, default_value = "10")]
    epochs: usize,

    /// Learning rate
    #[arg(long, default_value = "0.1")]
    eta: f64,

    /// Momentum coefficient
    #[arg(long, default_value = "0.5")]
    mu: f64,

    /// Weight update discipline
    #[arg(long, value_enum, default_value = "plain")]
    rule: Rule,

    /// Decay the learning rate as eta / (1 + epoch / 2)
    #[arg(long)]
    decay: bool,

    /// Build layers without biases
    #[arg(long)]
    no_bias: bool,

    /// Seed for weight initialization
    #[arg(long)]
    seed: Option<u64>,

    /// Use only the first N training samples
    #[arg(long)]
    limit: Option<usize>,

    /// Log per-layer debug output
    #[arg(long, short)]
    verbose: bool,
}

impl Args {
    fn network_spec(&self) -> Result<NetworkSpec> {
        if let Some(path) = &self.config {
            let path = path.to_str().context("config path is not valid UTF-8")?;
            return NetworkSpec::load_json(path)
                .with_context(|| format!("failed to load network spec from {path}"));
        }

        let hidden_activation = match self.activation {
            HiddenActivation::Sigmoid => ActivationFunction::Sigmoid,
            HiddenActivation::Relu => ActivationFunction::ReLU,
        };
        let mut spec = NetworkSpec::classifier(28 * 28, &self.hidden, CLASSES, hidden_activation);
        for layer in &mut spec.layers {
            layer.bias = !self.no_bias;
        }
        spec.update_rule = match self.rule {
            Rule::Plain => UpdateRule::Plain,
            Rule::Momentum => UpdateRule::Momentum,
            Rule::TwoPhaseMomentum => UpdateRule::TwoPhaseMomentum,
        };
        spec.eta = self.eta;
        spec.mu = self.mu;
        spec.schedule = if self.decay { EtaSchedule::StepDecay } else { EtaSchedule::Constant };
        Ok(spec)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let (mut train, test) = load_mnist(&args.data_dir)
        .with_context(|| format!("failed to load MNIST from {}", args.data_dir.display()))?;
    if let Some(limit) = args.limit {
        train.truncate(limit);
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let spec = args.network_spec()?;
    if let Some(path) = &args.save_config {
        let path = path.to_str().context("save-config path is not valid UTF-8")?;
        spec.save_json(path).with_context(|| format!("failed to write network spec to {path}"))?;
    }
    let mut network = spec.build(&mut rng).context("invalid network spec")?;

    info!(samples = train.len(), epochs = args.epochs, rule = ?spec.update_rule, "training");
    network.train(&train.patterns, &train.labels, args.epochs)?;

    let report = network.test(&test.patterns, &test.labels)?;
    info!(
        "{} of {} test samples misclassified ({:.2}% failure rate)",
        report.failures, report.total, report.failure_rate
    );

    Ok(())
}
