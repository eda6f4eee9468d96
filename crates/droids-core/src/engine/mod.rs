//! # Engine Module
//!
//! This module implements the analysis engine of DROIDS++: everything between reading the
//! toolkit outputs and handing finished per-site records to the exporters.
//!
//! ## Overview
//!
//! A run is described by one immutable [`config::AnalysisConfig`]. The engine resolves the
//! file layout of every (state, scope) pair from it, builds the fluctuation series and
//! reduced features of each pair, and runs the site-wise statistics over the result. Work
//! that is independent per pair or per site is scheduled on the rayon pool when the
//! `parallel` feature is enabled.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Run parameters, defaults and validation
//! - **Layout** ([`layout`]) - Input and output file names for every (state, scope)
//! - **Progress Monitoring** ([`progress`]) - Phase and task events for front ends
//! - **Random Streams** ([`rng`]) - Per-site seeded streams for the bootstrap
//! - **External Commands** ([`runner`]) - The capability used to launch the viewer
//! - **Error Handling** ([`error`]) - The engine error taxonomy
//!
//! ## Failure Model
//!
//! A missing or malformed input only fails the (state, scope) it belongs to. Sites that
//! cannot be computed become sentinel records, so every completed run still emits one row
//! per site.

pub mod config;
pub(crate) mod context;
pub mod error;
pub mod layout;
pub mod progress;
pub mod rng;
pub mod runner;
pub(crate) mod tasks;
