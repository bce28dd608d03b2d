use crate::state::{site_mask, QuantumState};
use linalg::C64;

/// ⟨ψ|X_k|ψ⟩. X_k flips bit k, so this is Σ conj(ψ_i) ψ_{i ^ mask}.
pub fn expect_x(psi: &QuantumState, k: usize) -> f64 {
    let n = psi.n_qubits();
    assert!(k < n, "qubit {} out of range for {} qubits", k, n);
    let mask = site_mask(n, k);
    let amps = psi.amplitudes();

    let mut acc = C64::new(0.0, 0.0);
    for (idx, a) in amps.iter().enumerate() {
        acc += a.conj() * amps[idx ^ mask];
    }
    acc.re
}

/// |⟨X_k⟩|², clamped into [0, 1] against rounding.
pub fn x_probability(psi: &QuantumState, k: usize) -> f64 {
    let e = expect_x(psi, k);
    (e * e).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gates::{embed, pauli_x};

    #[test]
    fn matches_dense_operator() {
        let n = 3;
        let psi = QuantumState::product(n, [C64::new(0.8, 0.1), C64::new(0.3, -0.5)]);
        for k in 0..n {
            let xk = embed(pauli_x(), k, n);
            let x_psi = linalg::matvec(xk.as_ref(), psi.amplitudes());
            let dense: C64 = psi
                .amplitudes()
                .iter()
                .zip(&x_psi)
                .map(|(a, b)| a.conj() * b)
                .sum();
            assert!((dense.re - expect_x(&psi, k)).abs() < 1e-12, "k = {}", k);
            assert!(dense.im.abs() < 1e-12);
        }
    }

    #[test]
    fn plus_state_has_unit_probability() {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let psi = QuantumState::product(2, [C64::new(s, 0.0), C64::new(s, 0.0)]);
        assert!((x_probability(&psi, 0) - 1.0).abs() < 1e-12);
        assert!((x_probability(&psi, 1) - 1.0).abs() < 1e-12);
    }
}
