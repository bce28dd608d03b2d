use approx::assert_abs_diff_eq;
use faer::Mat;
use quantum::{
    propagator::HERMITIAN_TOLERANCE, Error, Hamiltonian, PropagatorCache, QuantumState,
    SpinChainParameters, C64,
};

fn chain(n: usize, lambda: f64) -> Hamiltonian {
    let p = SpinChainParameters {
        n_qubits: n,
        j: 1.0,
        delta: 0.5,
        ..SpinChainParameters::default()
    }
    .with_field(lambda);
    Hamiltonian::build(&p).unwrap()
}

#[test]
fn propagator_is_unitary() {
    for (n, lambda, tau) in [(2, 0.0, 0.3), (3, 1.0, 2.5), (5, 0.4, 10.0)] {
        let cache = PropagatorCache::new(&chain(n, lambda), tau, 1.0).unwrap();
        assert!(
            cache.unitarity_error() < 1e-10,
            "n = {}, err = {:.3e}",
            n,
            cache.unitarity_error()
        );
    }
}

#[test]
fn zero_time_is_identity() {
    let cache = PropagatorCache::new(&chain(3, 0.0), 0.0, 1.0).unwrap();
    let u = cache.propagator();
    for i in 0..u.nrows() {
        for j in 0..u.ncols() {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert_abs_diff_eq!(u.read(i, j).re, expected, epsilon = 1e-12);
            assert_abs_diff_eq!(u.read(i, j).im, 0.0, epsilon = 1e-12);
        }
    }
}

#[test]
fn single_field_phases() {
    // J = 0 leaves λ Z_1 on two sites: U = diag(e^{-iλτ z})
    let p = SpinChainParameters {
        n_qubits: 2,
        j: 0.0,
        ..SpinChainParameters::default()
    }
    .with_field(1.0);
    let h = Hamiltonian::build(&p).unwrap();
    let tau = 0.8;
    let cache = PropagatorCache::new(&h, tau, 2.0).unwrap();
    let u = cache.propagator();

    let down = C64::from_polar(1.0, -tau / 2.0);
    let up = C64::from_polar(1.0, tau / 2.0);
    assert!((u.read(0, 0) - down).norm() < 1e-12);
    assert!((u.read(1, 1) - up).norm() < 1e-12);
    assert!((u.read(2, 2) - down).norm() < 1e-12);
    assert!((u.read(3, 3) - up).norm() < 1e-12);

    let mut energies = cache.eigenvalues().to_vec();
    energies.sort_by(|a, b| a.total_cmp(b));
    for (e, expected) in energies.iter().zip([-1.0, -1.0, 1.0, 1.0]) {
        assert_abs_diff_eq!(*e, expected, epsilon = 1e-12);
    }
}

#[test]
fn retime_matches_fresh_build() {
    let h = chain(4, 0.6);
    let mut cache = PropagatorCache::new(&h, 0.5, 1.0).unwrap();
    cache.retime(3.0).unwrap();
    let fresh = PropagatorCache::new(&h, 3.0, 1.0).unwrap();

    assert_eq!(cache.tau(), 3.0);
    let (a, b) = (cache.propagator(), fresh.propagator());
    for i in 0..a.nrows() {
        for j in 0..a.ncols() {
            assert!((a.read(i, j) - b.read(i, j)).norm() < 1e-10);
        }
    }
}

#[test]
fn evolution_preserves_norm() {
    let cache = PropagatorCache::new(&chain(4, 0.9), 1.7, 1.0).unwrap();
    let psi = cache.evolve(&QuantumState::initial(4)).unwrap();
    assert_abs_diff_eq!(psi.norm(), 1.0, epsilon = 1e-12);
}

#[test]
fn non_hermitian_input_is_rejected() {
    let mut m = Mat::<f64>::zeros(4, 4);
    m.write(0, 1, 1.0);
    m.write(1, 0, 1.0 + 1e-6);
    let h = Hamiltonian::from_matrix(2, m).unwrap();

    match PropagatorCache::new(&h, 1.0, 1.0) {
        Err(Error::NonHermitianInput { deviation, tolerance }) => {
            assert!(deviation > tolerance);
            assert_eq!(tolerance, HERMITIAN_TOLERANCE);
        }
        Err(e) => panic!("wrong error: {}", e),
        Ok(_) => panic!("asymmetric Hamiltonian accepted"),
    }
}

#[test]
fn wrong_matrix_size_is_rejected() {
    assert!(Hamiltonian::from_matrix(2, Mat::<f64>::zeros(3, 3)).is_err());
}

#[test]
fn negative_time_is_rejected() {
    assert!(PropagatorCache::new(&chain(2, 0.0), -1.0, 1.0).is_err());
}

#[test]
fn propagator_equals_spectral_sum() {
    // U_ij = Σ_k e^{-i E_k τ/ħ} v_ik v_jk, built term by term from a fresh eigh
    let h = chain(3, 0.8);
    let (tau, hbar) = (1.3, 0.7);
    let cache = PropagatorCache::new(&h, tau, hbar).unwrap();
    let eig = linalg::eigh(h.matrix());
    let u = cache.propagator();

    for i in 0..h.dim() {
        for j in 0..h.dim() {
            let mut expected = C64::new(0.0, 0.0);
            for (k, &e) in eig.values.iter().enumerate() {
                expected += C64::from_polar(1.0, -e * tau / hbar)
                    * (eig.vectors.read(i, k) * eig.vectors.read(j, k));
            }
            assert!((u.read(i, j) - expected).norm() < 1e-10, "({}, {})", i, j);
        }
    }
}

#[test]
fn eight_qubit_chain_stays_unitary_after_retime() {
    let mut cache = PropagatorCache::new(&chain(8, 0.5), 2.0, 1.0).unwrap();
    assert!(cache.unitarity_error() < 1e-10);
    cache.retime(7.5).unwrap();
    assert!(cache.unitarity_error() < 1e-10);

    let trace: f64 = cache.eigenvalues().iter().sum();
    assert_abs_diff_eq!(trace, 0.0, epsilon = 1e-9);
}
