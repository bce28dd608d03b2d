use crate::dataset::SequenceDataset;
use crate::error::{Error, Result};
use quantum::QuantumReservoir;

/// One row per sequence, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Features {
    n_samples: usize,
    n_features: usize,
    data: Vec<f64>,
}

impl Features {
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_features = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(rows.len() * n_features);
        for row in &rows {
            if row.len() != n_features {
                return Err(Error::ShapeMismatch {
                    what: "feature vector length",
                    expected: n_features,
                    found: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            n_samples: rows.len(),
            n_features,
            data,
        })
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n_features..(i + 1) * self.n_features]
    }
}

/// Run every sequence through the reservoir and flatten each T × N record.
pub fn transform(reservoir: &QuantumReservoir, data: &SequenceDataset) -> Result<Features> {
    let rows = data
        .sequences()
        .iter()
        .map(|seq| Ok(reservoir.process(seq)?.into_vec()))
        .collect::<Result<Vec<_>>>()?;
    Features::from_rows(rows)
}
