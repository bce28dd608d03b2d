use crate::error::{Error, Result};
use crate::params::{SpinChainParameters, MAX_QUBITS, MIN_QUBITS};
use crate::state::site_mask;
use faer::Mat;

/// Dense real-symmetric Hamiltonian on 2^N basis states.
#[derive(Clone)]
pub struct Hamiltonian {
    n_qubits: usize,
    matrix: Mat<f64>,
}

/// Site carrying the λ field: ⌊(N+1)/2⌋, kept inside the chain.
pub fn central_site(n_qubits: usize) -> usize {
    ((n_qubits + 1) / 2).min(n_qubits.saturating_sub(1))
}

impl Hamiltonian {
    /// H = J Σ (XX + YY + Δ ZZ)_{i,i+1} + J₂ Σ (XX + YY + Δ ZZ)_{i,i+2} + λ Z_c
    pub fn build(p: &SpinChainParameters) -> Result<Self> {
        p.validate()?;
        let n = p.n_qubits;
        let dim = p.dim();
        let mut matrix = Mat::<f64>::zeros(dim, dim);

        for i in 0..n.saturating_sub(1) {
            add_exchange(&mut matrix, n, i, i + 1, p.j, p.delta);
        }
        for i in 0..n.saturating_sub(2) {
            add_exchange(&mut matrix, n, i, i + 2, p.j2, p.delta);
        }

        if p.lambda != 0.0 {
            let mask = site_mask(n, central_site(n));
            for idx in 0..dim {
                let z = if idx & mask == 0 { 1.0 } else { -1.0 };
                let cur = matrix.read(idx, idx);
                matrix.write(idx, idx, cur + p.lambda * z);
            }
        }

        Ok(Self { n_qubits: n, matrix })
    }

    /// Wrap an externally built matrix. Hermiticity is checked by
    /// [`crate::PropagatorCache::new`], not here.
    pub fn from_matrix(n_qubits: usize, matrix: Mat<f64>) -> Result<Self> {
        if !(MIN_QUBITS..=MAX_QUBITS).contains(&n_qubits) {
            return Err(Error::Dimension {
                qubits: n_qubits,
                min: MIN_QUBITS,
                max: MAX_QUBITS,
            });
        }
        let dim = 1usize << n_qubits;
        if matrix.nrows() != dim || matrix.ncols() != dim {
            return Err(Error::ShapeMismatch {
                what: "Hamiltonian matrix",
                expected: dim,
                found: matrix.nrows().max(matrix.ncols()),
            });
        }
        Ok(Self { n_qubits, matrix })
    }

    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn matrix(&self) -> &Mat<f64> {
        &self.matrix
    }

    pub fn hermitian_deviation(&self) -> f64 {
        linalg::symmetric_deviation(&self.matrix)
    }
}

/// coupling · (X_a X_b + Y_a Y_b + Δ Z_a Z_b) in the computational basis.
/// XX + YY maps |01> <-> |10> with amplitude 2 and annihilates |00>, |11>.
fn add_exchange(h: &mut Mat<f64>, n: usize, a: usize, b: usize, coupling: f64, delta: f64) {
    if coupling == 0.0 {
        return;
    }
    let ma = site_mask(n, a);
    let mb = site_mask(n, b);

    for idx in 0..h.nrows() {
        let aligned = (idx & ma == 0) == (idx & mb == 0);
        let zz = if aligned { 1.0 } else { -1.0 };
        let cur = h.read(idx, idx);
        h.write(idx, idx, cur + coupling * delta * zz);

        if !aligned {
            let flipped = idx ^ ma ^ mb;
            let cur = h.read(flipped, idx);
            h.write(flipped, idx, cur + 2.0 * coupling);
        }
    }
}
