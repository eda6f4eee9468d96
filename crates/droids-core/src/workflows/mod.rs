//! # Workflows Module
//!
//! End-to-end procedures built from the engine and core layers. These are the entry points
//! front ends call.
//!
//! - **Comparison** ([`compare`]) - Builds the features of every (state, scope), runs the
//!   divergence and discrepancy analyses, writes the result tables and viewer inputs, and
//!   optionally launches the viewer. Returns a [`compare::RunSummary`] of what was written
//!   and what was recovered from.
//! - **Residue Info** ([`resinfo`]) - Turns a toolkit atom-info listing into the residue
//!   info file the comparison reads.

pub mod compare;
pub mod resinfo;
