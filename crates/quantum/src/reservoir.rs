use crate::encoding::{EncodingMap, Interleaved};
use crate::error::{Error, Result};
use crate::hamiltonian::Hamiltonian;
use crate::measurement::x_probability;
use crate::params::SpinChainParameters;
use crate::propagator::PropagatorCache;
use crate::state::{site_mask, QuantumState};
use faer::Mat;
use linalg::C64;

/// Integer time series, `steps` rows of `channels` values, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Sequence {
    steps: usize,
    channels: usize,
    data: Vec<i64>,
}

impl Sequence {
    pub fn from_rows(rows: &[Vec<i64>]) -> Result<Self> {
        let channels = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(rows.len() * channels);
        for row in rows {
            if row.len() != channels {
                return Err(Error::ShapeMismatch {
                    what: "sequence row",
                    expected: channels,
                    found: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            steps: rows.len(),
            channels,
            data,
        })
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn row(&self, t: usize) -> &[i64] {
        &self.data[t * self.channels..(t + 1) * self.channels]
    }
}

/// T × K real matrix, row-major. K = N for the raw measurement record.
#[derive(Clone, Debug, PartialEq)]
pub struct ObservableMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl ObservableMatrix {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, t: usize, l: usize) -> f64 {
        self.data[t * self.cols + l]
    }

    pub fn row(&self, t: usize) -> &[f64] {
        &self.data[t * self.cols..(t + 1) * self.cols]
    }

    /// Row-major view, which is also the flattened feature layout.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }
}

/// A fixed spin chain used as a feature map.
///
/// Every timestep is an independent shot: the encoded state is
/// Rz(θ·x_t) · U · ψ₀, always starting from ψ₀. Since U · ψ₀ does not depend
/// on the input it is computed once and copied per timestep.
pub struct QuantumReservoir {
    params: SpinChainParameters,
    slots: Vec<usize>,
    initial: QuantumState,
    evolved: QuantumState,
    cache: PropagatorCache,
}

impl QuantumReservoir {
    pub fn new(params: SpinChainParameters) -> Result<Self> {
        Self::with_parts(params, QuantumState::initial(params.n_qubits), &Interleaved)
    }

    pub fn with_encoding(params: SpinChainParameters, encoding: &dyn EncodingMap) -> Result<Self> {
        Self::with_parts(params, QuantumState::initial(params.n_qubits), encoding)
    }

    pub fn with_parts(
        params: SpinChainParameters,
        initial: QuantumState,
        encoding: &dyn EncodingMap,
    ) -> Result<Self> {
        let h = Hamiltonian::build(&params)?;
        if initial.n_qubits() != params.n_qubits {
            return Err(Error::ShapeMismatch {
                what: "initial state qubits",
                expected: params.n_qubits,
                found: initial.n_qubits(),
            });
        }

        let slots = resolve_slots(encoding, params.n_qubits)?;
        let cache = PropagatorCache::new(&h, params.tau, params.hbar)?;
        let evolved = cache.evolve(&initial)?;

        Ok(Self {
            params,
            slots,
            initial,
            evolved,
            cache,
        })
    }

    pub fn params(&self) -> &SpinChainParameters {
        &self.params
    }

    pub fn propagator(&self) -> &PropagatorCache {
        &self.cache
    }

    pub fn initial_state(&self) -> &QuantumState {
        &self.initial
    }

    /// Classical channels expected per timestep.
    pub fn input_width(&self) -> usize {
        self.slots.len()
    }

    /// Switch to a new evolution time without re-diagonalizing.
    pub fn retime(&mut self, tau: f64) -> Result<()> {
        self.cache.retime(tau)?;
        self.evolved = self.cache.evolve(&self.initial)?;
        self.params.tau = tau;
        Ok(())
    }

    /// Rz_full(θ·inputs) · U · ψ₀ for one timestep.
    pub fn encode(&self, inputs: &[i64]) -> Result<QuantumState> {
        if inputs.len() != self.slots.len() {
            return Err(Error::ShapeMismatch {
                what: "input channels",
                expected: self.slots.len(),
                found: inputs.len(),
            });
        }

        let n = self.params.n_qubits;
        let half_angles: Vec<(usize, f64)> = self
            .slots
            .iter()
            .zip(inputs)
            .map(|(&q, &x)| (site_mask(n, q), 0.5 * self.params.theta * x as f64))
            .collect();

        let mut psi = self.evolved.clone();
        for (idx, a) in psi.amplitudes_mut().iter_mut().enumerate() {
            let mut angle = 0.0;
            for &(mask, half) in &half_angles {
                angle += if idx & mask == 0 { -half } else { half };
            }
            *a *= C64::from_polar(1.0, angle);
        }
        Ok(psi)
    }

    /// T × N matrix of |⟨X_l⟩|² per timestep.
    pub fn process(&self, seq: &Sequence) -> Result<ObservableMatrix> {
        if seq.steps() > 0 && seq.channels() != self.slots.len() {
            return Err(Error::ShapeMismatch {
                what: "sequence channels",
                expected: self.slots.len(),
                found: seq.channels(),
            });
        }

        let n = self.params.n_qubits;
        let mut data = Vec::with_capacity(seq.steps() * n);
        for t in 0..seq.steps() {
            let psi = self.encode(seq.row(t))?;
            for l in 0..n {
                data.push(x_probability(&psi, l));
            }
        }

        Ok(ObservableMatrix {
            rows: seq.steps(),
            cols: n,
            data,
        })
    }

    /// `process(seq) · weights`, with `weights` of shape N × K.
    pub fn process_weighted(&self, seq: &Sequence, weights: &Mat<f64>) -> Result<ObservableMatrix> {
        let n = self.params.n_qubits;
        if weights.nrows() != n {
            return Err(Error::ShapeMismatch {
                what: "weighting matrix rows",
                expected: n,
                found: weights.nrows(),
            });
        }

        let raw = self.process(seq)?;
        let k = weights.ncols();
        let mut data = vec![0.0; raw.rows * k];
        for t in 0..raw.rows {
            for c in 0..k {
                let mut acc = 0.0;
                for l in 0..n {
                    acc += raw.get(t, l) * weights.read(l, c);
                }
                data[t * k + c] = acc;
            }
        }

        Ok(ObservableMatrix {
            rows: raw.rows,
            cols: k,
            data,
        })
    }
}

fn resolve_slots(encoding: &dyn EncodingMap, n: usize) -> Result<Vec<usize>> {
    let width = encoding.width(n);
    let mut slots = Vec::with_capacity(width);
    for d in 0..width {
        let q = encoding.qubit(d, n);
        if q >= n {
            return Err(Error::InvalidParameter {
                name: "encoding map",
                reason: format!("channel {} maps to qubit {} on a {}-qubit chain", d, q, n),
            });
        }
        if slots.contains(&q) {
            return Err(Error::InvalidParameter {
                name: "encoding map",
                reason: format!("qubit {} is assigned twice", q),
            });
        }
        slots.push(q);
    }
    Ok(slots)
}
