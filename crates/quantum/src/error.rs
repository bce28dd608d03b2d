use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("chain of {qubits} qubits is outside the supported range {min}..={max}")]
    Dimension { qubits: usize, min: usize, max: usize },

    #[error("Hamiltonian is not Hermitian: max |H_ij - H_ji| = {deviation:.3e} (tolerance {tolerance:.1e})")]
    NonHermitianInput { deviation: f64, tolerance: f64 },

    #[error("propagator is not unitary: max |U'U - I| = {error:.3e} (tolerance {tolerance:.1e})")]
    NonUnitary { error: f64, tolerance: f64 },

    #[error("shape mismatch in {what}: expected {expected}, found {found}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}
