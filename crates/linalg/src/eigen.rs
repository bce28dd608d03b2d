use faer::{Mat, Side};

/// Eigenpairs of a real symmetric matrix. Column k of `vectors` belongs to
/// `values[k]`.
#[derive(Clone)]
pub struct Eigh {
    pub values: Vec<f64>,
    pub vectors: Mat<f64>,
}

/// Self-adjoint eigendecomposition, reading the lower triangle only.
/// Callers check symmetry first; see [`symmetric_deviation`].
pub fn eigh(h: &Mat<f64>) -> Eigh {
    assert_eq!(h.nrows(), h.ncols(), "eigh requires a square matrix");

    let evd = h.selfadjoint_eigendecomposition(Side::Lower);
    let s = evd.s().column_vector();
    let u = evd.u();

    let n = h.nrows();
    let mut values = Vec::with_capacity(n);
    for k in 0..n {
        values.push(s.read(k));
    }

    let mut vectors = Mat::<f64>::zeros(n, n);
    for i in 0..n {
        for k in 0..n {
            vectors.write(i, k, u.read(i, k));
        }
    }

    Eigh { values, vectors }
}

/// max |H_ij - H_ji|; zero for an exactly symmetric matrix.
pub fn symmetric_deviation(h: &Mat<f64>) -> f64 {
    if h.nrows() != h.ncols() {
        return f64::INFINITY;
    }
    let n = h.nrows();
    let mut worst = 0.0f64;
    for i in 0..n {
        for j in (i + 1)..n {
            worst = worst.max((h.read(i, j) - h.read(j, i)).abs());
        }
    }
    worst
}
