//! # Core Module
//!
//! This module provides the fundamental building blocks of DROIDS++: the data models that
//! describe a comparative dynamics run, the statistics that compare two ensembles, and the
//! readers and writers for every file the engine consumes or produces.
//!
//! ## Overview
//!
//! Nothing in this module holds run state. Every function is a pure transformation of its
//! inputs, which keeps the statistics reproducible and lets the engine layer schedule them
//! freely across threads.
//!
//! ## Architecture
//!
//! - **Domain Models** ([`models`]) - Residue codes, simulated states and scopes, feature
//!   values and the immutable per-site result records
//! - **Statistics** ([`stats`]) - Min-max normalization, information divergences, the
//!   two-sample KS test, RBF-kernel maximum mean discrepancy and sparse truncated SVD
//! - **File I/O** ([`io`]) - Whitespace tables produced by the trajectory toolkit, residue
//!   info files, result tables and viewer attribute/control files
//!
//! ## Scientific Foundation
//!
//! - **Atomic fluctuation** profiles summarize per-site flexibility over a trajectory
//! - **Correlation matrices** describe coordinated motion; their sparsified low-rank
//!   embedding gives each site a compact feature vector
//! - **Subsampled ensembles** turn both into per-site empirical distributions that can be
//!   compared between states with divergence, rank and kernel statistics

pub mod io;
pub mod models;
pub mod stats;
