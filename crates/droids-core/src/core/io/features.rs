use super::error::TableError;
use super::format::repr_f64;
use super::traits::TableSink;
use crate::core::models::features::ReducedFeatures;
use itertools::Itertools;
use std::io::Write;

/// Reduced feature vectors, one row per site: a 0-based row index followed by the
/// components, tab-separated.
pub struct FeatureFile;

impl TableSink for FeatureFile {
    type Value = ReducedFeatures;
    type Error = TableError;

    fn write_to(value: &Self::Value, writer: &mut impl Write) -> Result<(), Self::Error> {
        for (index, row) in value.matrix().row_iter().enumerate() {
            writeln!(
                writer,
                "{}\t{}",
                index,
                row.iter().map(|&v| repr_f64(v)).join("\t")
            )?;
        }
        Ok(())
    }
}
