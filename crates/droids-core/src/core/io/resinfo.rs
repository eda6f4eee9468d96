use super::error::{ParseErrorKind, TableError};
use super::traits::{TableSink, TableSource};
use crate::core::models::residue::ResidueType;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

/// Residue type of every annotated site, keyed by 1-based position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResidueInfo {
    sites: BTreeMap<usize, ResidueType>,
}

impl ResidueInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, position: usize, residue: ResidueType) {
        self.sites.insert(position, residue);
    }

    pub fn residue_at(&self, position: usize) -> Option<ResidueType> {
        self.sites.get(&position).copied()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, ResidueType)> + '_ {
        self.sites.iter().map(|(&position, &residue)| (position, residue))
    }
}

impl FromIterator<(usize, ResidueType)> for ResidueInfo {
    fn from_iter<I: IntoIterator<Item = (usize, ResidueType)>>(iter: I) -> Self {
        Self {
            sites: iter.into_iter().collect(),
        }
    }
}

fn parse_site(token: &str, line: usize) -> Result<usize, TableError> {
    token.parse().map_err(|_| {
        TableError::parse(
            line,
            ParseErrorKind::InvalidIndex {
                value: token.to_string(),
            },
        )
    })
}

/// `cpptraj_resinfo_<ID>.txt`: `<site>\t<code>` per line, no header.
pub struct ResidueInfoFile;

impl TableSource for ResidueInfoFile {
    type Value = ResidueInfo;
    type Error = TableError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Value, Self::Error> {
        let mut info = ResidueInfo::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            match tokens.as_slice() {
                [] => continue,
                [site, code, ..] => {
                    let position = parse_site(site, index + 1)?;
                    let residue = code.parse::<ResidueType>().map_err(|_| {
                        TableError::parse(
                            index + 1,
                            ParseErrorKind::UnknownResidue {
                                value: code.to_string(),
                            },
                        )
                    })?;
                    info.insert(position, residue);
                }
                [_] => {
                    return Err(TableError::parse(
                        index + 1,
                        ParseErrorKind::ColumnCount {
                            expected: 2,
                            found: 1,
                        },
                    ));
                }
            }
        }
        Ok(info)
    }
}

impl TableSink for ResidueInfoFile {
    type Value = ResidueInfo;
    type Error = TableError;

    fn write_to(value: &Self::Value, writer: &mut impl Write) -> Result<(), Self::Error> {
        for (position, residue) in value.iter() {
            writeln!(writer, "{}\t{}", position, residue.code())?;
        }
        Ok(())
    }
}

/// Toolkit residue listing (`cpptraj_atominfo_<ID>.txt`).
///
/// Only the second and third whitespace-separated fields of each line are inspected, counting
/// a leading run of whitespace as an empty first field. Lines whose third field is not an
/// accepted residue code, or whose second field is not a site number, are skipped.
pub struct AtomInfoFile;

impl TableSource for AtomInfoFile {
    type Value = ResidueInfo;
    type Error = TableError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Value, Self::Error> {
        let mut info = ResidueInfo::new();
        for line in reader.lines() {
            let line = line?;
            let leading_gap = line.starts_with(char::is_whitespace);
            let mut fields = line.split_whitespace();
            if !leading_gap {
                fields.next();
            }
            let (Some(site), Some(code)) = (fields.next(), fields.next()) else {
                continue;
            };
            if !ResidueType::is_recognized_code(code) {
                continue;
            }
            let (Ok(position), Ok(residue)) = (site.parse::<usize>(), code.parse::<ResidueType>())
            else {
                continue;
            };
            info.insert(position, residue);
        }
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn residue_info_round_trips_through_tab_format() {
        let content = "1\tSER\n2\tHIE\n3\tGLY\n";
        let info = ResidueInfoFile::read_from(&mut Cursor::new(content)).unwrap();
        assert_eq!(info.len(), 3);
        assert_eq!(info.residue_at(2), Some(ResidueType::HistidineEpsilon));
        assert_eq!(info.residue_at(4), None);

        let mut out = Vec::new();
        ResidueInfoFile::write_to(&info, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), content);
    }

    #[test]
    fn unknown_residue_code_is_a_parse_error() {
        let err = ResidueInfoFile::read_from(&mut Cursor::new("1\tWAT\n")).unwrap_err();
        assert!(matches!(
            err,
            TableError::Parse {
                line: 1,
                kind: ParseErrorKind::UnknownResidue { .. }
            }
        ));
    }

    #[test]
    fn atom_info_keeps_only_protein_residues() {
        let content = "\
#Res  Name   First    Last Molecule
    1 MET        1      19        1
    2 HIP       20      37        1
    3 WAT       38      40        2
    4 NA+       41      41        3
";
        let info = AtomInfoFile::read_from(&mut Cursor::new(content)).unwrap();
        let sites: Vec<_> = info.iter().collect();
        assert_eq!(
            sites,
            vec![
                (1, ResidueType::Methionine),
                (2, ResidueType::HistidineProtonated)
            ]
        );
    }

    #[test]
    fn atom_info_without_leading_whitespace_reads_second_and_third_fields() {
        let content = "ATOM 7 LYS extra\nATOM 8 ALA\n";
        let info = AtomInfoFile::read_from(&mut Cursor::new(content)).unwrap();
        assert_eq!(info.residue_at(7), Some(ResidueType::Lysine));
        assert_eq!(info.residue_at(8), Some(ResidueType::Alanine));
    }
}
