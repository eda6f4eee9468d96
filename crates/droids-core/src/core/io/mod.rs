//! File formats consumed from the simulation toolkit and produced for downstream viewers.
//!
//! Readers implement [`traits::TableSource`] and writers implement [`traits::TableSink`],
//! so every format shares the same path-based entry points and [`error::TableError`].
//! Numeric output goes through [`format::repr_f64`] for a single, stable textual form.

pub mod chimerax;
pub mod error;
pub mod features;
pub mod fluctuation;
pub mod format;
pub mod matrix;
pub mod resinfo;
pub mod tables;
pub mod traits;
