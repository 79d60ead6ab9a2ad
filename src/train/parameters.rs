use serde::{Serialize, Deserialize};

use crate::error::NetworkError;

pub const DEFAULT_ETA: f64 = 0.1;
pub const DEFAULT_MU: f64 = 0.5;

/// Learning-rate policy across epochs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EtaSchedule {
    #[default]
    Constant,
    /// `η(epoch) = η₀ / (1 + epoch / 2)` with integer division.
    StepDecay,
}

/// Training hyperparameters shared by every layer during an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    eta: f64,
    /// Momentum coefficient; ignored by the plain update rule.
    pub mu: f64,
    initial_eta: f64,
    pub schedule: EtaSchedule,
}

impl Parameters {
    pub fn new(eta: f64, mu: f64, schedule: EtaSchedule) -> Result<Parameters, NetworkError> {
        check_eta(eta)?;
        if !(mu.is_finite() && (0.0..1.0).contains(&mu)) {
            return Err(NetworkError::InvalidParameters(format!("mu must lie in [0, 1), got {mu}")));
        }
        Ok(Parameters { eta, mu, initial_eta: eta, schedule })
    }

    /// Constant learning rate, default momentum.
    pub fn with_eta(eta: f64) -> Result<Parameters, NetworkError> {
        Parameters::new(eta, DEFAULT_MU, EtaSchedule::Constant)
    }

    /// Learning rate in effect for the current epoch.
    pub fn eta(&self) -> f64 {
        self.eta
    }

    pub fn initial_eta(&self) -> f64 {
        self.initial_eta
    }

    /// Replaces the base learning rate.  The schedule starts from this value
    /// on the next epoch, so the change survives `update_eta`.
    pub fn set_eta(&mut self, eta: f64) -> Result<(), NetworkError> {
        check_eta(eta)?;
        self.eta = eta;
        self.initial_eta = eta;
        Ok(())
    }

    /// Sets `eta` for the given 0-based epoch according to the schedule.
    pub fn update_eta(&mut self, epoch: usize) {
        self.eta = match self.schedule {
            EtaSchedule::Constant  => self.initial_eta,
            EtaSchedule::StepDecay => self.initial_eta / (1 + epoch / 2) as f64,
        };
    }
}

fn check_eta(eta: f64) -> Result<(), NetworkError> {
    if eta.is_finite() && eta > 0.0 {
        Ok(())
    } else {
        Err(NetworkError::InvalidParameters(format!("eta must be positive, got {eta}")))
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            eta: DEFAULT_ETA,
            mu: DEFAULT_MU,
            initial_eta: DEFAULT_ETA,
            schedule: EtaSchedule::Constant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_decay_halves_in_integer_steps() {
        let mut p = Parameters::new(0.1, 0.5, EtaSchedule::StepDecay).unwrap();
        let expected = [0.1, 0.1, 0.05, 0.05, 0.1 / 3.0, 0.1 / 3.0, 0.025];
        for (epoch, want) in expected.iter().enumerate() {
            p.update_eta(epoch);
            assert!((p.eta() - want).abs() < 1e-15, "epoch {epoch}: {} != {want}", p.eta());
        }
        assert_eq!(p.initial_eta(), 0.1);
    }

    #[test]
    fn constant_schedule_keeps_eta() {
        let mut p = Parameters::with_eta(0.3).unwrap();
        p.update_eta(9);
        assert_eq!(p.eta(), 0.3);
    }

    #[test]
    fn set_eta_survives_the_schedule() {
        let mut p = Parameters::with_eta(0.1).unwrap();
        p.set_eta(0.02).unwrap();
        p.update_eta(0);
        assert_eq!(p.eta(), 0.02);

        p.schedule = EtaSchedule::StepDecay;
        p.update_eta(2);
        assert_eq!((p.eta(), p.initial_eta()), (0.01, 0.02));

        assert!(p.set_eta(-1.0).is_err());
        assert_eq!(p.initial_eta(), 0.02);
    }

    #[test]
    fn defaults() {
        let p = Parameters::default();
        assert_eq!((p.eta(), p.mu, p.schedule), (0.1, 0.5, EtaSchedule::Constant));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Parameters::new(0.0, 0.5, EtaSchedule::Constant).is_err());
        assert!(Parameters::new(0.1, 1.0, EtaSchedule::Constant).is_err());
        assert!(Parameters::new(f64::NAN, 0.5, EtaSchedule::Constant).is_err());
    }
}
