use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// A whitespace- or tab-delimited input file produced by the simulation toolkit.
///
/// Implementors parse one file format into an in-memory value. The path-based method
/// opens the file and delegates to [`TableSource::read_from`].
pub trait TableSource {
    /// The parsed content of the file.
    type Value;

    /// The error type for I/O and parse failures.
    type Error: Error + From<io::Error>;

    /// Reads and parses the file content from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if a line cannot be parsed or the reader fails.
    fn read_from(reader: &mut impl BufRead) -> Result<Self::Value, Self::Error>;

    /// Opens `path` and parses it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self::Value, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}

/// An output file written for downstream consumers (tables, viewer attribute files).
pub trait TableSink {
    /// The value serialized into the file.
    type Value: ?Sized;

    /// The error type for serialization and I/O failures.
    type Error: Error + From<io::Error>;

    /// Serializes `value` into `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(value: &Self::Value, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Creates (or truncates) `path` and serializes `value` into it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(value: &Self::Value, path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(value, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
