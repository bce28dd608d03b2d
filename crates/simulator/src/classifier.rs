//! Multinomial logistic regression trained by full-batch gradient descent.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticConfig {
    pub iterations: usize,
    pub learning_rate: f64,
    /// inverse L2 strength
    pub c: f64,
}

impl Default for LogisticConfig {
    fn default() -> Self {
        Self {
            iterations: 300,
            learning_rate: 0.5,
            c: 1.0,
        }
    }
}

pub struct LogisticRegression {
    n_classes: usize,
    n_features: usize,
    mean: Vec<f64>,
    scale: Vec<f64>,
    /// n_classes × n_features, row-major
    weights: Vec<f64>,
    bias: Vec<f64>,
}

impl LogisticRegression {
    /// Fit on `rows` with labels in `0..n_classes`. Features are standardized
    /// with training statistics; weights start at zero, so fitting is
    /// deterministic.
    pub fn fit(rows: &[&[f64]], y: &[usize], n_classes: usize, cfg: &LogisticConfig) -> Result<Self> {
        if rows.len() != y.len() {
            return Err(Error::ShapeMismatch {
                what: "training labels",
                expected: rows.len(),
                found: y.len(),
            });
        }
        if rows.is_empty() {
            return Err(Error::InvalidConfig("cannot fit on zero samples".into()));
        }
        if let Some(&bad) = y.iter().find(|&&c| c >= n_classes) {
            return Err(Error::InvalidConfig(format!(
                "label {} out of range for {} classes",
                bad, n_classes
            )));
        }

        let n = rows.len();
        let f = rows[0].len();
        if let Some(r) = rows.iter().find(|r| r.len() != f) {
            return Err(Error::ShapeMismatch {
                what: "training feature length",
                expected: f,
                found: r.len(),
            });
        }

        let (mean, scale) = standardization(rows, f);
        let (m, s) = (&mean, &scale);
        let x: Vec<f64> = rows
            .iter()
            .flat_map(|r| r.iter().enumerate().map(move |(k, v)| (v - m[k]) / s[k]))
            .collect();

        let mut model = Self {
            n_classes,
            n_features: f,
            mean,
            scale,
            weights: vec![0.0; n_classes * f],
            bias: vec![0.0; n_classes],
        };

        let l2 = 1.0 / (cfg.c * n as f64);
        let inv_n = 1.0 / n as f64;
        let mut probs = vec![0.0; n_classes];
        let mut grad_w = vec![0.0; n_classes * f];
        let mut grad_b = vec![0.0; n_classes];

        for _ in 0..cfg.iterations {
            grad_w.iter_mut().for_each(|g| *g = 0.0);
            grad_b.iter_mut().for_each(|g| *g = 0.0);

            for (i, &label) in y.iter().enumerate() {
                let xi = &x[i * f..(i + 1) * f];
                model.softmax(xi, &mut probs);
                for c in 0..n_classes {
                    let err = probs[c] - if c == label { 1.0 } else { 0.0 };
                    grad_b[c] += err;
                    let gw = &mut grad_w[c * f..(c + 1) * f];
                    for (g, v) in gw.iter_mut().zip(xi) {
                        *g += err * v;
                    }
                }
            }

            for (w, g) in model.weights.iter_mut().zip(&grad_w) {
                *w -= cfg.learning_rate * (g * inv_n + l2 * *w);
            }
            for (b, g) in model.bias.iter_mut().zip(&grad_b) {
                *b -= cfg.learning_rate * g * inv_n;
            }
        }

        Ok(model)
    }

    fn softmax(&self, x: &[f64], out: &mut [f64]) {
        let f = self.n_features;
        for (c, o) in out.iter_mut().enumerate() {
            let w = &self.weights[c * f..(c + 1) * f];
            *o = self.bias[c] + w.iter().zip(x).map(|(a, b)| a * b).sum::<f64>();
        }
        let max = out.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mut total = 0.0;
        for o in out.iter_mut() {
            *o = (*o - max).exp();
            total += *o;
        }
        for o in out.iter_mut() {
            *o /= total;
        }
    }

    /// Most probable class; ties go to the lowest index.
    pub fn predict(&self, row: &[f64]) -> usize {
        let x: Vec<f64> = row
            .iter()
            .enumerate()
            .map(|(k, v)| (v - self.mean[k]) / self.scale[k])
            .collect();
        let mut probs = vec![0.0; self.n_classes];
        self.softmax(&x, &mut probs);

        let mut best = 0;
        for c in 1..self.n_classes {
            if probs[c] > probs[best] {
                best = c;
            }
        }
        best
    }

    /// Fraction of `rows` predicted correctly.
    pub fn score(&self, rows: &[&[f64]], y: &[usize]) -> f64 {
        if rows.is_empty() {
            return 0.0;
        }
        let hits = rows
            .iter()
            .zip(y)
            .filter(|(r, label)| self.predict(r) == **label)
            .count();
        hits as f64 / rows.len() as f64
    }
}

/// Per-feature mean and standard deviation; constant columns get scale 1.
fn standardization(rows: &[&[f64]], f: usize) -> (Vec<f64>, Vec<f64>) {
    let n = rows.len() as f64;
    let mut mean = vec![0.0; f];
    for r in rows {
        for (m, v) in mean.iter_mut().zip(r.iter()) {
            *m += v / n;
        }
    }
    let mut scale = vec![0.0; f];
    for r in rows {
        for k in 0..f {
            scale[k] += (r[k] - mean[k]).powi(2) / n;
        }
    }
    for s in scale.iter_mut() {
        *s = s.sqrt();
        if *s < 1e-12 {
            *s = 1.0;
        }
    }
    (mean, scale)
}
