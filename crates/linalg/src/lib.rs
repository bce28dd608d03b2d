pub mod dense;
pub mod eigen;

pub use dense::{identity, matvec, unitarity_error, CMatrix};
pub use eigen::{eigh, symmetric_deviation, Eigh};

pub type C64 = num_complex::Complex64;
