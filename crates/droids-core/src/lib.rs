//! # DROIDS++ Core Library
//!
//! A statistics engine for comparative protein dynamics. Given fluctuation series and
//! correlation matrices sampled from molecular dynamics runs of a reference and a query
//! state of the same protein, it identifies the sites whose flexibility or coordinated
//! motion changed significantly between the two states.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture so the statistical core stays
//! testable without any simulation toolkit or viewer installed.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`ResidueType`, `State`, `Scope`,
//!   per-site records), pure statistics (`stats`: normalization, divergences, the two-sample
//!   Kolmogorov–Smirnov test, kernel discrepancy, sparse truncated SVD) and file I/O.
//!
//! - **[`engine`]: The Logic Core.** Run configuration, error taxonomy, progress reporting,
//!   the input layout for every (state, scope) pair, the external command-runner capability,
//!   and the parallel tasks that build features and compute the site-wise statistics.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures (`compare`, `resinfo`) that tie
//!   the engine and core together and export results for the structure viewer.

pub mod core;
pub mod engine;
pub mod workflows;
