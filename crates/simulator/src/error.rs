use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Quantum(#[from] quantum::Error),

    #[error("fold {fold} of {folds} has an empty {part} set ({samples} samples)")]
    EmptyFold {
        fold: usize,
        folds: usize,
        part: &'static str,
        samples: usize,
    },

    #[error("shape mismatch in {what}: expected {expected}, found {found}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("worker for cell ({i}, {j}) failed: {message}")]
    WorkerFailure { i: usize, j: usize, message: String },

    #[error("batch {batch} finished with {missing} unreported cells")]
    LostResults { batch: usize, missing: usize },

    #[error("cell ({i}, {j}) was written twice")]
    CellAlreadySet { i: usize, j: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
