use crate::error::{Error, Result};

pub const MIN_QUBITS: usize = 2;
/// Dense diagonalization of a 2^12 matrix is already minutes of work.
pub const MAX_QUBITS: usize = 12;

/// Physical and encoding constants of one reservoir instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpinChainParameters {
    pub n_qubits: usize,
    /// nearest-neighbor exchange J
    pub j: f64,
    /// ZZ anisotropy Δ (applies to both neighbor shells)
    pub delta: f64,
    /// next-nearest-neighbor exchange J₂
    pub j2: f64,
    /// Z field on the central site
    pub lambda: f64,
    pub tau: f64,
    pub hbar: f64,
    /// encoding angle per unit of input
    pub theta: f64,
}

impl Default for SpinChainParameters {
    fn default() -> Self {
        Self {
            n_qubits: 6,
            j: 1.0,
            delta: 0.5,
            j2: 0.0,
            lambda: 0.0,
            tau: 1.0,
            hbar: 1.0,
            theta: 0.5,
        }
    }
}

impl SpinChainParameters {
    pub fn with_field(self, lambda: f64) -> Self {
        Self { lambda, ..self }
    }

    pub fn with_time(self, tau: f64) -> Self {
        Self { tau, ..self }
    }

    pub fn dim(&self) -> usize {
        1 << self.n_qubits
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_QUBITS..=MAX_QUBITS).contains(&self.n_qubits) {
            return Err(Error::Dimension {
                qubits: self.n_qubits,
                min: MIN_QUBITS,
                max: MAX_QUBITS,
            });
        }

        let finite = [
            ("j", self.j),
            ("delta", self.delta),
            ("j2", self.j2),
            ("lambda", self.lambda),
            ("tau", self.tau),
            ("hbar", self.hbar),
            ("theta", self.theta),
        ];
        for (name, v) in finite {
            if !v.is_finite() {
                return Err(Error::InvalidParameter {
                    name,
                    reason: format!("must be finite, got {}", v),
                });
            }
        }

        if self.hbar <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "hbar",
                reason: format!("must be > 0, got {}", self.hbar),
            });
        }
        if self.tau < 0.0 {
            return Err(Error::InvalidParameter {
                name: "tau",
                reason: format!("must be >= 0, got {}", self.tau),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(SpinChainParameters::default().validate().is_ok());
    }

    #[test]
    fn qubit_bounds() {
        let p = SpinChainParameters::default();
        assert!(matches!(
            SpinChainParameters { n_qubits: 1, ..p }.validate(),
            Err(Error::Dimension { qubits: 1, .. })
        ));
        assert!(matches!(
            SpinChainParameters { n_qubits: MAX_QUBITS + 1, ..p }.validate(),
            Err(Error::Dimension { .. })
        ));
        assert!(SpinChainParameters { n_qubits: MAX_QUBITS, ..p }.validate().is_ok());
    }

    #[test]
    fn rejects_bad_time_and_hbar() {
        let p = SpinChainParameters::default();
        assert!(p.with_time(-0.1).validate().is_err());
        assert!(SpinChainParameters { hbar: 0.0, ..p }.validate().is_err());
        assert!(p.with_field(f64::NAN).validate().is_err());
    }
}
