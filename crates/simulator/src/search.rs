//! (λ, τ) grid search.
//!
//! Cells are dispatched in batches of at most `batch_limit` tasks onto a pool
//! of the same size. Each batch runs inside one `scope`, whose exit is the
//! barrier; results come back over an unordered channel tagged with their
//! (i, j) and are drained, one per task, before the next batch starts.

use crate::cross_validation::CrossValidation;
use crate::dataset::{LabelEncoding, SequenceDataset};
use crate::error::{Error, Result};
use crate::features;
use crate::grid::{AccuracyGrid, GridCell};
use crossbeam_channel::{unbounded, TryRecvError};
use quantum::{EncodingMap, Interleaved, QuantumReservoir, SpinChainParameters};
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::Serialize;
use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CellFailure {
    pub i: usize,
    pub j: usize,
    pub lambda: f64,
    pub tau: f64,
    pub message: String,
}

impl fmt::Display for CellFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cell ({}, {}) lambda={} tau={}: {}",
            self.i, self.j, self.lambda, self.tau, self.message
        )
    }
}

pub struct SearchOutcome {
    pub grid: AccuracyGrid,
    pub failures: Vec<CellFailure>,
    pub batches: usize,
}

struct CellResult {
    i: usize,
    j: usize,
    accuracy: Result<f64>,
}

pub struct GridSearchEngine {
    base: SpinChainParameters,
    cv: CrossValidation,
    encoding: Arc<dyn EncodingMap>,
    batch_limit: usize,
    pool: ThreadPool,
}

impl GridSearchEngine {
    /// `base` supplies everything except λ and τ, which come from the grid.
    pub fn new(base: SpinChainParameters, cv: CrossValidation, batch_limit: usize) -> Result<Self> {
        base.validate()?;
        if batch_limit == 0 {
            return Err(Error::InvalidConfig("batch limit must be at least 1".into()));
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(batch_limit)
            .thread_name(|k| format!("grid-worker-{}", k))
            .build()?;

        Ok(Self {
            base,
            cv,
            encoding: Arc::new(Interleaved),
            batch_limit,
            pool,
        })
    }

    pub fn with_encoding(mut self, encoding: Arc<dyn EncodingMap>) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn batch_limit(&self) -> usize {
        self.batch_limit
    }

    /// Score every (λ, τ) pair on `data`.
    pub fn run(&self, data: &SequenceDataset, lambdas: &[f64], taus: &[f64]) -> Result<SearchOutcome> {
        if data.is_empty() {
            return Err(Error::InvalidConfig("dataset is empty".into()));
        }
        let labels = data.encode_labels();
        let encoding = self.encoding.as_ref();

        self.run_with(lambdas, taus, |lambda, tau| {
            evaluate_cell(&self.base, encoding, &self.cv, data, &labels, lambda, tau)
        })
    }

    /// Drive the batch schedule with an arbitrary per-cell evaluator.
    pub fn run_with<F>(&self, lambdas: &[f64], taus: &[f64], eval: F) -> Result<SearchOutcome>
    where
        F: Fn(f64, f64) -> Result<f64> + Sync,
    {
        check_axis("lambda", lambdas)?;
        check_axis("tau", taus)?;

        let mut grid = AccuracyGrid::new(lambdas.to_vec(), taus.to_vec());
        let mut failures = Vec::new();
        let tasks: Vec<(usize, usize)> = (0..lambdas.len())
            .flat_map(|i| (0..taus.len()).map(move |j| (i, j)))
            .collect();
        let total_batches = tasks.len().div_ceil(self.batch_limit);

        let (tx, rx) = unbounded::<CellResult>();
        let start = Instant::now();
        let mut batches = 0;

        for batch in tasks.chunks(self.batch_limit) {
            batches += 1;
            info!(batch = batches, of = total_batches, tasks = batch.len(), "dispatching batch");

            let eval = &eval;
            self.pool.scope(|s| {
                for &(i, j) in batch {
                    let tx = tx.clone();
                    let (lambda, tau) = (lambdas[i], taus[j]);
                    s.spawn(move |_| {
                        let accuracy = catch_unwind(AssertUnwindSafe(|| eval(lambda, tau)))
                            .unwrap_or_else(|payload| {
                                Err(Error::WorkerFailure {
                                    i,
                                    j,
                                    message: panic_message(payload.as_ref()),
                                })
                            });
                        // The receiver outlives every batch.
                        let _ = tx.send(CellResult { i, j, accuracy });
                    });
                }
            });

            for drained in 0..batch.len() {
                let msg = match rx.try_recv() {
                    Ok(msg) => msg,
                    Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {
                        return Err(Error::LostResults {
                            batch: batches,
                            missing: batch.len() - drained,
                        });
                    }
                };
                let (lambda, tau) = (lambdas[msg.i], taus[msg.j]);
                match msg.accuracy {
                    Ok(acc) => {
                        debug!(i = msg.i, j = msg.j, lambda, tau, accuracy = acc, "cell done");
                        grid.fill(msg.i, msg.j, GridCell::Accuracy(acc))?;
                    }
                    Err(err) => {
                        let message = err.to_string();
                        warn!(i = msg.i, j = msg.j, lambda, tau, error = %message, "cell failed");
                        grid.fill(msg.i, msg.j, GridCell::Failed(message.clone()))?;
                        failures.push(CellFailure {
                            i: msg.i,
                            j: msg.j,
                            lambda,
                            tau,
                            message,
                        });
                    }
                }
            }
        }

        info!(
            cells = tasks.len(),
            failed = failures.len(),
            batches,
            elapsed_s = start.elapsed().as_secs_f64(),
            "grid search finished"
        );

        Ok(SearchOutcome {
            grid,
            failures,
            batches,
        })
    }
}

/// Fresh Hamiltonian, propagator and reservoir for one (λ, τ), then
/// features and cross-validated accuracy.
pub fn evaluate_cell(
    base: &SpinChainParameters,
    encoding: &dyn EncodingMap,
    cv: &CrossValidation,
    data: &SequenceDataset,
    labels: &LabelEncoding,
    lambda: f64,
    tau: f64,
) -> Result<f64> {
    let params = base.with_field(lambda).with_time(tau);
    let reservoir = QuantumReservoir::with_encoding(params, encoding)?;
    let x = features::transform(&reservoir, data)?;
    let score = cv.evaluate(&x, &labels.indices, labels.classes.len())?;
    Ok(score.mean)
}

fn check_axis(name: &str, values: &[f64]) -> Result<()> {
    if values.is_empty() {
        return Err(Error::InvalidConfig(format!("{} grid is empty", name)));
    }
    if let Some(v) = values.iter().find(|v| !v.is_finite() || **v < 0.0) {
        return Err(Error::InvalidConfig(format!(
            "{} grid values must be finite and >= 0, got {}",
            name, v
        )));
    }
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}
