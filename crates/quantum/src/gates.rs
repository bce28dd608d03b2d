use linalg::{CMatrix, C64};

pub fn pauli_x() -> [[C64; 2]; 2] {
    let z = C64::new(0.0, 0.0);
    let o = C64::new(1.0, 0.0);
    [[z, o], [o, z]]
}

pub fn pauli_y() -> [[C64; 2]; 2] {
    let z = C64::new(0.0, 0.0);
    let i = C64::new(0.0, 1.0);
    let ni = C64::new(0.0, -1.0);
    [[z, ni], [i, z]]
}

pub fn pauli_z() -> [[C64; 2]; 2] {
    let z = C64::new(0.0, 0.0);
    let o = C64::new(1.0, 0.0);
    let m = C64::new(-1.0, 0.0);
    [[o, z], [z, m]]
}

pub fn identity() -> [[C64; 2]; 2] {
    let z = C64::new(0.0, 0.0);
    let o = C64::new(1.0, 0.0);
    [[o, z], [z, o]]
}

pub fn ry(theta: f64) -> [[C64; 2]; 2] {
    let c = (theta / 2.0).cos();
    let s = (theta / 2.0).sin();
    [
        [C64::new(c, 0.0), C64::new(-s, 0.0)],
        [C64::new(s, 0.0), C64::new(c, 0.0)],
    ]
}

/// diag(e^{-iφ/2}, e^{iφ/2})
pub fn rz(phi: f64) -> [[C64; 2]; 2] {
    let z = C64::new(0.0, 0.0);
    [
        [C64::from_polar(1.0, -phi / 2.0), z],
        [z, C64::from_polar(1.0, phi / 2.0)],
    ]
}

pub fn apply(u: [[C64; 2]; 2], v: [C64; 2]) -> [C64; 2] {
    [
        u[0][0] * v[0] + u[0][1] * v[1],
        u[1][0] * v[0] + u[1][1] * v[1],
    ]
}

/// ops[0] ⊗ ops[1] ⊗ … with site 0 as the most significant factor.
///
/// Materializes the full 2^N matrix; the reservoir uses the equivalent
/// bitwise kernels instead.
pub fn kron_all(ops: &[[[C64; 2]; 2]]) -> CMatrix {
    let mut out = linalg::identity(1);
    for op in ops {
        let d = out.nrows();
        out = CMatrix::from_fn(d * 2, d * 2, |r, c| out.read(r / 2, c / 2) * op[r % 2][c % 2]);
    }
    out
}

/// Single-site operator `op` on `site`, identity elsewhere.
pub fn embed(op: [[C64; 2]; 2], site: usize, n_qubits: usize) -> CMatrix {
    let ops: Vec<_> = (0..n_qubits)
        .map(|k| if k == site { op } else { identity() })
        .collect();
    kron_all(&ops)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kron_of_x_and_z() {
        let m = kron_all(&[pauli_x(), pauli_z()]);
        assert_eq!(m.nrows(), 4);
        // X ⊗ Z maps |00> -> |10>, |01> -> -|11>
        assert_eq!(m.read(2, 0), C64::new(1.0, 0.0));
        assert_eq!(m.read(3, 1), C64::new(-1.0, 0.0));
        assert_eq!(m.read(0, 0), C64::new(0.0, 0.0));
    }

    #[test]
    fn rotations_are_unitary() {
        for phi in [0.0, 0.3, 1.7, -2.2] {
            assert!(linalg::unitarity_error(kron_all(&[rz(phi), ry(phi)]).as_ref()) < 1e-14);
        }
    }
}
