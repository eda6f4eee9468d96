use super::error::{ParseErrorKind, TableError, parse_float};
use super::traits::TableSource;
use std::io::BufRead;

/// Non-blank lines after the header, tokenized on whitespace, with their 1-based line numbers.
fn data_rows(reader: &mut impl BufRead) -> Result<Vec<(usize, Vec<String>)>, TableError> {
    let mut rows = Vec::new();
    let mut header_seen = false;
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if !header_seen {
            header_seen = true;
            continue;
        }
        rows.push((
            index + 1,
            line.split_whitespace().map(str::to_string).collect(),
        ));
    }
    Ok(rows)
}

/// Whole-run fluctuation file: a header line, then `<index> <AtomicFlx>` per site.
pub struct WholeFluxFile;

impl TableSource for WholeFluxFile {
    type Value = Vec<f64>;
    type Error = TableError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Value, Self::Error> {
        data_rows(reader)?
            .into_iter()
            .map(|(line, tokens)| match tokens.get(1) {
                Some(token) => parse_float(token, line),
                None => Err(TableError::parse(
                    line,
                    ParseErrorKind::ColumnCount {
                        expected: 2,
                        found: tokens.len(),
                    },
                )),
            })
            .collect()
    }
}

/// Per-subsample fluctuation columns of one state, index column removed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FluxTable {
    columns: Vec<Vec<f64>>,
}

impl FluxTable {
    pub fn from_columns(columns: Vec<Vec<f64>>) -> Self {
        Self { columns }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// The last `count` value columns, which hold the subsample series when the table also
    /// carries leading summary columns. `None` when fewer than `count` columns exist.
    pub fn subsample_columns(&self, count: usize) -> Option<&[Vec<f64>]> {
        let start = self.columns.len().checked_sub(count)?;
        Some(&self.columns[start..])
    }
}

/// Subsample fluctuation table: a header line, then `<index> <v_0> ... <v_m>` per site.
pub struct SubsampleFluxFile;

impl TableSource for SubsampleFluxFile {
    type Value = FluxTable;
    type Error = TableError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Value, Self::Error> {
        let rows = data_rows(reader)?;
        let Some((_, first)) = rows.first() else {
            return Ok(FluxTable::default());
        };
        let width = first.len();
        if width < 2 {
            return Err(TableError::parse(
                rows[0].0,
                ParseErrorKind::ColumnCount {
                    expected: 2,
                    found: width,
                },
            ));
        }

        let mut columns = vec![Vec::with_capacity(rows.len()); width - 1];
        for (line, tokens) in &rows {
            if tokens.len() != width {
                return Err(TableError::parse(
                    *line,
                    ParseErrorKind::ColumnCount {
                        expected: width,
                        found: tokens.len(),
                    },
                ));
            }
            for (column, token) in columns.iter_mut().zip(&tokens[1..]) {
                column.push(parse_float(token, *line)?);
            }
        }
        Ok(FluxTable { columns })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn whole_flux_file_skips_header_and_index_column() {
        let content = "#Atom   AtomicFlx\n1  0.52\n2  0.61\n\n3  1.05\n";
        let values = WholeFluxFile::read_from(&mut Cursor::new(content)).unwrap();
        assert_eq!(values, vec![0.52, 0.61, 1.05]);
    }

    #[test]
    fn whole_flux_file_reports_line_of_bad_value() {
        let content = "#Atom AtomicFlx\n1 0.5\n2 abc\n";
        let err = WholeFluxFile::read_from(&mut Cursor::new(content)).unwrap_err();
        match err {
            TableError::Parse { line, kind } => {
                assert_eq!(line, 3);
                assert_eq!(
                    kind,
                    ParseErrorKind::InvalidFloat {
                        value: "abc".into()
                    }
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn whole_flux_file_requires_a_value_column() {
        let content = "#Atom AtomicFlx\n1\n";
        assert!(matches!(
            WholeFluxFile::read_from(&mut Cursor::new(content)),
            Err(TableError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn subsample_table_is_split_into_value_columns() {
        let content = "#Atom s0 s1 s2\n1 0.1 0.2 0.3\n2 0.4 0.5 0.6\n";
        let table = SubsampleFluxFile::read_from(&mut Cursor::new(content)).unwrap();
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.row_count(), 2);
        let columns = table.subsample_columns(3).unwrap();
        assert_eq!(columns[1], vec![0.2, 0.5]);
    }

    #[test]
    fn subsample_columns_are_taken_from_the_end() {
        let table = FluxTable::from_columns(vec![vec![9.0], vec![1.0], vec![2.0]]);
        let columns = table.subsample_columns(2).unwrap();
        assert_eq!(columns, &[vec![1.0], vec![2.0]]);
        assert!(table.subsample_columns(4).is_none());
    }

    #[test]
    fn ragged_subsample_table_is_rejected() {
        let content = "#Atom s0 s1\n1 0.1 0.2\n2 0.4\n";
        assert!(matches!(
            SubsampleFluxFile::read_from(&mut Cursor::new(content)),
            Err(TableError::Parse { line: 3, .. })
        ));
    }
}
