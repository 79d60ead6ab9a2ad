pub mod parameters;
pub mod epoch_stats;
pub mod train_config;
pub mod loop_fn;

pub use parameters::{EtaSchedule, Parameters};
pub use epoch_stats::{EpochStats, TestReport};
pub use train_config::TrainConfig;
pub use loop_fn::{evaluate, train_loop};
