//! Dense state-vector simulation of a perturbed Heisenberg chain used as a
//! fixed quantum reservoir.
//!
//! The Hilbert space has dimension 2^N, so every operator here is exponential
//! in the qubit count; [`params::MAX_QUBITS`] bounds it.

pub mod encoding;
pub mod error;
pub mod gates;
pub mod hamiltonian;
pub mod measurement;
pub mod params;
pub mod propagator;
pub mod reservoir;
pub mod state;

pub use encoding::{EncodingMap, ExplicitMap, Interleaved};
pub use error::{Error, Result};
pub use hamiltonian::Hamiltonian;
pub use params::SpinChainParameters;
pub use propagator::PropagatorCache;
pub use reservoir::{ObservableMatrix, QuantumReservoir, Sequence};
pub use state::QuantumState;

pub use linalg::{CMatrix, C64};
