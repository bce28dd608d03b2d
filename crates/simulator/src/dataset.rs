use crate::error::{Error, Result};
use quantum::Sequence;
use rng::SeedRng;
use serde::Deserialize;
use std::path::Path;

/// Ordered (sequence, label) pairs.
#[derive(Clone, Debug)]
pub struct SequenceDataset {
    sequences: Vec<Sequence>,
    labels: Vec<String>,
}

/// Labels mapped to indices into the sorted list of distinct labels.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelEncoding {
    pub classes: Vec<String>,
    pub indices: Vec<usize>,
}

#[derive(Deserialize)]
struct RawDataset {
    sequences: Vec<Vec<Vec<i64>>>,
    labels: Vec<String>,
}

impl SequenceDataset {
    pub fn new(sequences: Vec<Sequence>, labels: Vec<String>) -> Result<Self> {
        if sequences.len() != labels.len() {
            return Err(Error::ShapeMismatch {
                what: "labels per sequence",
                expected: sequences.len(),
                found: labels.len(),
            });
        }
        Ok(Self { sequences, labels })
    }

    /// `{"sequences": [[[int]]], "labels": [string]}`
    pub fn from_json_str(s: &str) -> Result<Self> {
        let raw: RawDataset = serde_json::from_str(s)?;
        let sequences = raw
            .sequences
            .iter()
            .map(|rows| Sequence::from_rows(rows))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Self::new(sequences, raw.labels)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Seeded toy data: each class repeats its own periodic pattern with
    /// ±1 jitter per entry.
    pub fn synthetic(
        classes: usize,
        per_class: usize,
        steps: usize,
        channels: usize,
        seed: u64,
    ) -> Result<Self> {
        if classes == 0 || per_class == 0 || steps == 0 || channels == 0 {
            return Err(Error::InvalidConfig(
                "synthetic dataset needs at least one class, sample, step and channel".into(),
            ));
        }

        let mut rng = SeedRng::from_u64(seed);
        let mut sequences = Vec::with_capacity(classes * per_class);
        let mut labels = Vec::with_capacity(classes * per_class);

        for c in 0..classes {
            for _ in 0..per_class {
                let rows: Vec<Vec<i64>> = (0..steps)
                    .map(|t| {
                        (0..channels)
                            .map(|d| {
                                let base = ((c + 1) * (t + d + 1) % 5) as i64;
                                base + rng.below(3, b"JITTER") as i64 - 1
                            })
                            .collect()
                    })
                    .collect();
                sequences.push(Sequence::from_rows(&rows)?);
                labels.push(format!("class-{}", c));
            }
        }

        Self::new(sequences, labels)
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn encode_labels(&self) -> LabelEncoding {
        let mut classes = self.labels.clone();
        classes.sort();
        classes.dedup();

        let indices = self
            .labels
            .iter()
            .map(|l| classes.binary_search(l).unwrap_or_default())
            .collect();

        LabelEncoding { classes, indices }
    }
}
