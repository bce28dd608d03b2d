use crate::error::{Error, Result};
use crate::hamiltonian::Hamiltonian;
use crate::state::QuantumState;
use linalg::{eigh, matvec, unitarity_error, CMatrix, Eigh, C64};
use std::time::Instant;
use tracing::debug;

pub const HERMITIAN_TOLERANCE: f64 = 1e-10;
pub const UNITARY_TOLERANCE: f64 = 1e-8;

/// Diagonalizes H once and holds U = V diag(e^{-iEτ/ħ}) Vᵀ.
///
/// The eigenpairs stay cached, so [`PropagatorCache::retime`] only pays for
/// one d × d product, never for another diagonalization. Nothing is
/// recomputed unless a caller asks for it.
pub struct PropagatorCache {
    eig: Eigh,
    tau: f64,
    hbar: f64,
    u: CMatrix,
}

impl PropagatorCache {
    pub fn new(h: &Hamiltonian, tau: f64, hbar: f64) -> Result<Self> {
        check_time(tau, hbar)?;

        let deviation = h.hermitian_deviation();
        if deviation > HERMITIAN_TOLERANCE {
            return Err(Error::NonHermitianInput {
                deviation,
                tolerance: HERMITIAN_TOLERANCE,
            });
        }

        let start = Instant::now();
        let eig = eigh(h.matrix());
        debug!(
            dim = h.dim(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "diagonalized Hamiltonian"
        );

        let u = assemble(&eig, tau, hbar)?;
        Ok(Self { eig, tau, hbar, u })
    }

    /// Rebuild U for a new evolution time from the cached eigenpairs.
    pub fn retime(&mut self, tau: f64) -> Result<()> {
        check_time(tau, self.hbar)?;
        self.u = assemble(&self.eig, tau, self.hbar)?;
        self.tau = tau;
        Ok(())
    }

    pub fn propagator(&self) -> &CMatrix {
        &self.u
    }

    pub fn eigenvalues(&self) -> &[f64] {
        &self.eig.values
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    pub fn unitarity_error(&self) -> f64 {
        unitarity_error(self.u.as_ref())
    }

    pub fn evolve(&self, psi: &QuantumState) -> Result<QuantumState> {
        if psi.dim() != self.u.nrows() {
            return Err(Error::ShapeMismatch {
                what: "state dimension",
                expected: self.u.nrows(),
                found: psi.dim(),
            });
        }
        QuantumState::from_amplitudes(psi.n_qubits(), matvec(self.u.as_ref(), psi.amplitudes()))
    }
}

fn check_time(tau: f64, hbar: f64) -> Result<()> {
    if !tau.is_finite() || tau < 0.0 {
        return Err(Error::InvalidParameter {
            name: "tau",
            reason: format!("must be finite and >= 0, got {}", tau),
        });
    }
    if !hbar.is_finite() || hbar <= 0.0 {
        return Err(Error::InvalidParameter {
            name: "hbar",
            reason: format!("must be finite and > 0, got {}", hbar),
        });
    }
    Ok(())
}

fn assemble(eig: &Eigh, tau: f64, hbar: f64) -> Result<CMatrix> {
    let d = eig.values.len();
    let v = eig.vectors.as_ref();

    let phases: Vec<C64> = eig
        .values
        .iter()
        .map(|&e| C64::from_polar(1.0, -e * tau / hbar))
        .collect();

    // U = (V · diag(phases)) · Vᵀ
    let scaled = CMatrix::from_fn(d, d, |i, k| phases[k] * v.read(i, k));
    let vt = CMatrix::from_fn(d, d, |k, j| C64::new(v.read(j, k), 0.0));
    let u = scaled.as_ref() * vt.as_ref();

    let error = unitarity_error(u.as_ref());
    if error > UNITARY_TOLERANCE {
        return Err(Error::NonUnitary {
            error,
            tolerance: UNITARY_TOLERANCE,
        });
    }
    Ok(u)
}
