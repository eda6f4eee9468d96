use super::error::TableError;
use super::format::{MISSING, cell};
use super::traits::TableSink;
use crate::core::models::records::{DiscrepancyRecord, ResidueRecord};
use crate::core::models::residue::ResidueType;
use std::io::Write;

pub const DIVERGENCE_COLUMNS: [&str; 9] = [
    "pos",
    "res",
    "dFLUX",
    "KL",
    "D",
    "pvalue",
    "p_value",
    "FLUX_ref",
    "FLUX_query",
];

pub const DISCREPANCY_COLUMNS: [&str; 4] = ["pos", "res", "MMD", "pval"];

fn residue_cell(residue: Option<ResidueType>) -> String {
    residue.map_or_else(|| MISSING.to_string(), |r| r.code().to_string())
}

fn tab_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer)
}

/// `divergenceMetrics.txt`: one row per site; `pvalue` is the KS p-value and `p_value` the
/// significance label.
pub struct DivergenceTable;

impl TableSink for DivergenceTable {
    type Value = [ResidueRecord];
    type Error = TableError;

    fn write_to(value: &Self::Value, writer: &mut impl Write) -> Result<(), Self::Error> {
        let mut table = tab_writer(writer);
        table.write_record(DIVERGENCE_COLUMNS)?;
        for record in value {
            table.write_record([
                record.position.to_string(),
                residue_cell(record.residue),
                cell(record.d_flux),
                cell(record.signed_divergence),
                cell(record.d_statistic),
                cell(record.p_value),
                record.label.to_string(),
                cell(record.ref_flux),
                cell(record.query_flux),
            ])?;
        }
        table.flush()?;
        Ok(())
    }
}

/// `maxMeanDiscrepancy.txt`: one row per site; `pval` is the significance label.
pub struct DiscrepancyTable;

impl TableSink for DiscrepancyTable {
    type Value = [DiscrepancyRecord];
    type Error = TableError;

    fn write_to(value: &Self::Value, writer: &mut impl Write) -> Result<(), Self::Error> {
        let mut table = tab_writer(writer);
        table.write_record(DISCREPANCY_COLUMNS)?;
        for record in value {
            table.write_record([
                record.position.to_string(),
                residue_cell(record.residue),
                cell(record.mmd),
                record.label.to_string(),
            ])?;
        }
        table.flush()?;
        Ok(())
    }
}
