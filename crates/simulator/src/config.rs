//! Sweep configuration. Everything the engine needs is passed explicitly;
//! nothing is read from the environment.

use crate::classifier::LogisticConfig;
use crate::cross_validation::{CrossValidation, FoldPolicy};
use crate::error::{Error, Result};
use quantum::SpinChainParameters;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub n_qubits: usize,
    pub j: f64,
    pub delta: f64,
    pub j2: f64,
    pub hbar: f64,
    pub theta: f64,

    pub lambdas: Vec<f64>,
    pub taus: Vec<f64>,

    pub folds: usize,
    pub shuffle: bool,
    pub seed: u64,
    pub fold_policy: FoldPolicy,
    pub classifier: LogisticConfig,

    /// Maximum tasks in flight per batch.
    pub batch_limit: usize,
    /// Entries in each of the top/bottom lists.
    pub top_n: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        let chain = SpinChainParameters::default();
        Self {
            n_qubits: chain.n_qubits,
            j: chain.j,
            delta: chain.delta,
            j2: chain.j2,
            hbar: chain.hbar,
            theta: chain.theta,
            lambdas: linspace(0.0, 2.0, 5),
            taus: linspace(0.5, 10.0, 5),
            folds: 3,
            shuffle: true,
            seed: 0,
            fold_policy: FoldPolicy::All,
            classifier: LogisticConfig::default(),
            batch_limit: 4,
            top_n: 5,
        }
    }
}

impl SweepConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Chain constants with λ = τ = 0; the grid fills those in per cell.
    pub fn chain_parameters(&self) -> SpinChainParameters {
        SpinChainParameters {
            n_qubits: self.n_qubits,
            j: self.j,
            delta: self.delta,
            j2: self.j2,
            lambda: 0.0,
            tau: 0.0,
            hbar: self.hbar,
            theta: self.theta,
        }
    }

    pub fn cross_validation(&self) -> CrossValidation {
        CrossValidation {
            folds: self.folds,
            shuffle: self.shuffle,
            seed: self.seed,
            policy: self.fold_policy,
            classifier: self.classifier,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.chain_parameters().validate()?;

        if self.folds < 2 {
            return Err(Error::InvalidConfig(format!("folds must be >= 2, got {}", self.folds)));
        }
        if self.batch_limit == 0 {
            return Err(Error::InvalidConfig("batch_limit must be >= 1".into()));
        }
        if self.classifier.iterations == 0
            || !(self.classifier.learning_rate > 0.0)
            || !(self.classifier.c > 0.0)
        {
            return Err(Error::InvalidConfig(
                "classifier needs iterations > 0, learning_rate > 0 and c > 0".into(),
            ));
        }
        for (name, axis) in [("lambdas", &self.lambdas), ("taus", &self.taus)] {
            if axis.is_empty() {
                return Err(Error::InvalidConfig(format!("{} must not be empty", name)));
            }
            if axis.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{} must be finite and >= 0",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// `count` evenly spaced values from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            (0..count).map(|k| start + step * k as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        SweepConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: SweepConfig =
            serde_json::from_str(r#"{"n_qubits": 4, "taus": [1.0, 2.0], "fold_policy": "first_only"}"#)
                .unwrap();
        assert_eq!(cfg.n_qubits, 4);
        assert_eq!(cfg.taus, vec![1.0, 2.0]);
        assert_eq!(cfg.fold_policy, FoldPolicy::FirstOnly);
        assert_eq!(cfg.folds, 3);
        cfg.validate().unwrap();
    }

    #[test]
    fn rejects_bad_values() {
        let bad = [
            SweepConfig { n_qubits: 20, ..SweepConfig::default() },
            SweepConfig { folds: 1, ..SweepConfig::default() },
            SweepConfig { batch_limit: 0, ..SweepConfig::default() },
            SweepConfig { lambdas: vec![], ..SweepConfig::default() },
            SweepConfig { taus: vec![-1.0], ..SweepConfig::default() },
        ];
        for cfg in bad {
            assert!(cfg.validate().is_err(), "{:?}", cfg);
        }
    }

    #[test]
    fn linspace_endpoints() {
        assert_eq!(linspace(0.0, 1.0, 3), vec![0.0, 0.5, 1.0]);
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }
}
