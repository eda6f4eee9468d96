//! Parallel analysis tasks of a comparative run.
//!
//! Each task reads the shared [`AnalysisContext`](super::context::AnalysisContext), fans its
//! independent units of work (one (state, scope) pair or one site) out over the worker pool
//! and collects the results back in index order before returning.

pub mod discrepancy;
pub mod divergence;
pub mod features;
