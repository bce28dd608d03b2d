use crate::error::{Error, Result};
use crate::gates::{apply, ry};
use linalg::C64;

/// Bit of `site` in a basis index; site 0 is the most significant bit.
#[inline]
pub(crate) fn site_mask(n_qubits: usize, site: usize) -> usize {
    1 << (n_qubits - 1 - site)
}

/// Ry(π/4)|0⟩ = cos(π/8)|0⟩ + sin(π/8)|1⟩
pub fn default_qubit() -> [C64; 2] {
    apply(
        ry(std::f64::consts::FRAC_PI_4),
        [C64::new(1.0, 0.0), C64::new(0.0, 0.0)],
    )
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuantumState {
    amps: Vec<C64>,
    n_qubits: usize,
}

impl QuantumState {
    /// N-fold tensor product of one normalized qubit state.
    pub fn product(n_qubits: usize, qubit: [C64; 2]) -> Self {
        let norm = (qubit[0].norm_sqr() + qubit[1].norm_sqr()).sqrt();
        let q = [qubit[0] / norm, qubit[1] / norm];

        let dim = 1usize << n_qubits;
        let mut amps = vec![C64::new(1.0, 0.0); dim];
        for (idx, a) in amps.iter_mut().enumerate() {
            for site in 0..n_qubits {
                let bit = (idx & site_mask(n_qubits, site) != 0) as usize;
                *a *= q[bit];
            }
        }
        Self { amps, n_qubits }
    }

    pub fn initial(n_qubits: usize) -> Self {
        Self::product(n_qubits, default_qubit())
    }

    pub fn from_amplitudes(n_qubits: usize, amps: Vec<C64>) -> Result<Self> {
        let expected = 1usize << n_qubits;
        if amps.len() != expected {
            return Err(Error::ShapeMismatch {
                what: "state amplitudes",
                expected,
                found: amps.len(),
            });
        }
        Ok(Self { amps, n_qubits })
    }

    pub fn amplitudes(&self) -> &[C64] {
        &self.amps
    }

    pub(crate) fn amplitudes_mut(&mut self) -> &mut [C64] {
        &mut self.amps
    }

    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    pub fn dim(&self) -> usize {
        self.amps.len()
    }

    pub fn norm(&self) -> f64 {
        self.amps.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt()
    }
}
