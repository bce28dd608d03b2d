//! Which qubit carries which classical input channel.

pub trait EncodingMap: Send + Sync {
    /// Channels consumed per timestep on an `n_qubits` chain.
    fn width(&self, n_qubits: usize) -> usize;

    /// Qubit index that receives `channel`. Must be < `n_qubits` and distinct
    /// across channels.
    fn qubit(&self, channel: usize, n_qubits: usize) -> usize;
}

/// Channel d on qubit 2d; odd qubits are left unencoded.
#[derive(Clone, Copy, Debug, Default)]
pub struct Interleaved;

impl EncodingMap for Interleaved {
    fn width(&self, n_qubits: usize) -> usize {
        n_qubits.div_ceil(2)
    }

    fn qubit(&self, channel: usize, _n_qubits: usize) -> usize {
        2 * channel
    }
}

/// Arbitrary channel → qubit table. Range and uniqueness are checked when a
/// reservoir resolves the map, as for any other [`EncodingMap`].
#[derive(Clone, Debug)]
pub struct ExplicitMap {
    qubits: Vec<usize>,
}

impl ExplicitMap {
    pub fn new(qubits: Vec<usize>) -> Self {
        Self { qubits }
    }
}

impl EncodingMap for ExplicitMap {
    fn width(&self, _n_qubits: usize) -> usize {
        self.qubits.len()
    }

    fn qubit(&self, channel: usize, _n_qubits: usize) -> usize {
        self.qubits[channel]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleave_uses_even_slots() {
        let m = Interleaved;
        assert_eq!(m.width(5), 3);
        assert_eq!(m.width(6), 3);
        let slots: Vec<usize> = (0..m.width(5)).map(|d| m.qubit(d, 5)).collect();
        assert_eq!(slots, vec![0, 2, 4]);
    }

    #[test]
    fn explicit_map_reports_its_table() {
        let m = ExplicitMap::new(vec![3, 1]);
        assert_eq!(m.width(4), 2);
        assert_eq!(m.qubit(0, 4), 3);
        assert_eq!(m.qubit(1, 4), 1);
    }
}
