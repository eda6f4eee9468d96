//! # Statistics Module
//!
//! The numerical kernels behind every site-wise comparison in DROIDS++. Each submodule is a
//! set of pure functions over slices, vectors or matrices; none of them touch files, logging
//! sinks or random state, so they can be called from any worker thread.
//!
//! ## Key Components
//!
//! - [`normalize`] - Min-max normalization with an explicit degenerate-column policy
//! - [`divergence`] - Generalized and relative-entropy Kullback–Leibler divergences and the
//!   Jensen–Shannon distance, plus the dFLUX sign convention
//! - [`ks`] - Two-sided two-sample Kolmogorov–Smirnov test with exact small-sample p-values
//! - [`kernel`] - Gaussian (RBF) kernel and maximum mean discrepancy
//! - [`reduction`] - Correlation-matrix sparsification and truncated singular value embedding
//!
//! ## Conventions
//!
//! - Functions that can meet undefined inputs (zero mass, empty samples, NaN entries) report
//!   that explicitly, either through a degeneracy flag or a typed error, instead of producing
//!   silent NaNs.
//! - Divergences follow the `0·ln(0/q) = 0` and `p·ln(p/0) = +∞` conventions.

pub mod divergence;
pub mod kernel;
pub mod ks;
pub mod normalize;
pub mod reduction;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatsError {
    #[error("Sample is empty")]
    EmptySample,

    #[error("Non-finite value at index {index}")]
    NonFinite { index: usize },

    #[error("Matrix is not square ({rows}x{cols})")]
    NotSquare { rows: usize, cols: usize },

    #[error("Singular value decomposition did not converge")]
    DidNotConverge,
}
