use crate::error::{Error, Result};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum GridCell {
    Unset,
    Accuracy(f64),
    Failed(String),
}

/// Accuracy per (λ index, τ index), row-major over λ.
#[derive(Clone, Debug, Serialize)]
pub struct AccuracyGrid {
    lambdas: Vec<f64>,
    taus: Vec<f64>,
    cells: Vec<GridCell>,
}

impl AccuracyGrid {
    pub fn new(lambdas: Vec<f64>, taus: Vec<f64>) -> Self {
        let cells = vec![GridCell::Unset; lambdas.len() * taus.len()];
        Self {
            lambdas,
            taus,
            cells,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.lambdas.len(), self.taus.len())
    }

    pub fn lambdas(&self) -> &[f64] {
        &self.lambdas
    }

    pub fn taus(&self) -> &[f64] {
        &self.taus
    }

    pub fn get(&self, i: usize, j: usize) -> &GridCell {
        &self.cells[i * self.taus.len() + j]
    }

    pub fn accuracy(&self, i: usize, j: usize) -> Option<f64> {
        match self.get(i, j) {
            GridCell::Accuracy(a) => Some(*a),
            _ => None,
        }
    }

    /// Write a cell exactly once.
    pub fn fill(&mut self, i: usize, j: usize, cell: GridCell) -> Result<()> {
        let (m, n) = self.shape();
        if i >= m || j >= n {
            return Err(Error::ShapeMismatch {
                what: "grid index",
                expected: m * n,
                found: i * n + j,
            });
        }
        let slot = &mut self.cells[i * n + j];
        if *slot != GridCell::Unset {
            return Err(Error::CellAlreadySet { i, j });
        }
        *slot = cell;
        Ok(())
    }

    pub fn unset_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == GridCell::Unset).count()
    }

    pub fn is_complete(&self) -> bool {
        self.unset_count() == 0
    }

    /// (i, j, λ, τ, cell) in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64, f64, &GridCell)> + '_ {
        let n = self.taus.len();
        self.cells.iter().enumerate().map(move |(k, cell)| {
            let (i, j) = (k / n, k % n);
            (i, j, self.lambdas[i], self.taus[j], cell)
        })
    }
}
