use crate::C64;
use faer::{Col, Mat, MatRef};

/// Dense complex matrix; faer storage so products go through its matmul.
pub type CMatrix = Mat<C64>;

pub fn identity(dim: usize) -> CMatrix {
    Mat::from_fn(dim, dim, |i, j| {
        if i == j {
            C64::new(1.0, 0.0)
        } else {
            C64::new(0.0, 0.0)
        }
    })
}

/// y = M x
pub fn matvec(m: MatRef<'_, C64>, x: &[C64]) -> Vec<C64> {
    assert_eq!(x.len(), m.ncols(), "matvec dimension mismatch");
    let col = Col::<C64>::from_fn(x.len(), |i| x[i]);
    let y = m * col.as_ref();
    (0..y.nrows()).map(|i| y.read(i)).collect()
}

/// max |(M†M - I)_ij|
pub fn unitarity_error(m: MatRef<'_, C64>) -> f64 {
    let adj = Mat::<C64>::from_fn(m.ncols(), m.nrows(), |i, j| m.read(j, i).conj());
    let gram = adj.as_ref() * m;

    let mut worst = 0.0f64;
    for j in 0..gram.ncols() {
        for i in 0..gram.nrows() {
            let mut v = gram.read(i, j);
            if i == j {
                v -= C64::new(1.0, 0.0);
            }
            worst = worst.max(v.norm());
        }
    }
    worst
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_unitary() {
        assert!(unitarity_error(identity(8).as_ref()) < 1e-15);
    }

    #[test]
    fn scaled_identity_is_not() {
        let mut m = identity(2);
        m.write(0, 0, C64::new(2.0, 0.0));
        assert!((unitarity_error(m.as_ref()) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn complex_phase_matrix_is_unitary() {
        // (1/√2) [[1, i], [i, 1]]
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let mut m = CMatrix::zeros(2, 2);
        m.write(0, 0, C64::new(s, 0.0));
        m.write(0, 1, C64::new(0.0, s));
        m.write(1, 0, C64::new(0.0, s));
        m.write(1, 1, C64::new(s, 0.0));
        assert!(unitarity_error(m.as_ref()) < 1e-15);

        // columns (1, i)/√2 and (1, 1)/√2 overlap by (1 - i)/2
        m.write(0, 1, C64::new(s, 0.0));
        m.write(1, 1, C64::new(s, 0.0));
        assert!((unitarity_error(m.as_ref()) - s).abs() < 1e-12);
    }

    #[test]
    fn matvec_swaps_with_pauli_x() {
        let mut x = CMatrix::zeros(2, 2);
        x.write(0, 1, C64::new(1.0, 0.0));
        x.write(1, 0, C64::new(1.0, 0.0));
        let y = matvec(x.as_ref(), &[C64::new(0.25, 0.0), C64::new(0.0, 0.75)]);
        assert_eq!(y[0], C64::new(0.0, 0.75));
        assert_eq!(y[1], C64::new(0.25, 0.0));
    }
}
