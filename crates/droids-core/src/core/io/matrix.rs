use super::error::{ParseErrorKind, TableError, parse_float};
use super::traits::TableSource;
use nalgebra::DMatrix;
use std::io::BufRead;

/// Pairwise correlation matrix: one whitespace-separated row per line, no header.
///
/// Rows may carry a leading index column (as the subsample matrices do); a table with
/// exactly one more column than rows has that column dropped. Squareness itself is
/// checked by the consumer.
pub struct CorrelationMatrixFile;

impl TableSource for CorrelationMatrixFile {
    type Value = DMatrix<f64>;
    type Error = TableError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Value, Self::Error> {
        let mut rows: Vec<Vec<f64>> = Vec::new();
        let mut width = None;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let row = line
                .split_whitespace()
                .map(|token| parse_float(token, index + 1))
                .collect::<Result<Vec<_>, _>>()?;
            let expected = *width.get_or_insert(row.len());
            if row.len() != expected {
                return Err(TableError::parse(
                    index + 1,
                    ParseErrorKind::ColumnCount {
                        expected,
                        found: row.len(),
                    },
                ));
            }
            rows.push(row);
        }

        let nrows = rows.len();
        if nrows == 0 {
            return Err(TableError::Inconsistency("matrix file has no rows".into()));
        }
        let ncols = width.unwrap_or(0);
        let skip = usize::from(ncols == nrows + 1);

        Ok(DMatrix::from_fn(nrows, ncols - skip, |r, c| rows[r][c + skip]))
    }
}
