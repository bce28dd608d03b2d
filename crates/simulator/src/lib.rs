//! Reservoir feature extraction, cross-validated scoring and the (λ, τ)
//! grid search built on top of the `quantum` crate.

pub mod classifier;
pub mod config;
pub mod cross_validation;
pub mod dataset;
pub mod error;
pub mod features;
pub mod grid;
pub mod output;
pub mod report;
pub mod search;

pub use config::SweepConfig;
pub use cross_validation::{CrossValidation, CvScore, FoldPolicy};
pub use dataset::{LabelEncoding, SequenceDataset};
pub use error::{Error, Result};
pub use features::Features;
pub use grid::{AccuracyGrid, GridCell};
pub use report::{rank, Report};
pub use search::{CellFailure, GridSearchEngine, SearchOutcome};
