use super::file::FileConfig;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LegacyError {
    #[error("line {line}: invalid value '{value}' for '{key}'")]
    InvalidValue {
        line: usize,
        key: String,
        value: String,
    },
}

fn number(line: usize, key: &str, value: &str) -> Result<usize, LegacyError> {
    value.parse().map_err(|_| LegacyError::InvalidValue {
        line,
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn enabled(value: &str) -> bool {
    value.eq_ignore_ascii_case("yes")
}

/// Parses a `DROIDS.ctl` control file: one `key,value[,comment]` entry per line.
///
/// Keys that only drive the simulation toolkit or other analyses (`queryTOP`, `n_frames`,
/// `conservation`, ...) are accepted and ignored, as is `bgcolor`, which styles plots rather
/// than the structure viewer.
pub fn parse(content: &str) -> Result<FileConfig, LegacyError> {
    let mut config = FileConfig::default();
    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        let mut fields = line.split(',').map(str::trim);
        let (Some(key), Some(value)) = (fields.next(), fields.next()) else {
            continue;
        };
        if key.is_empty() || key.starts_with('#') {
            continue;
        }

        match key {
            "queryID" => config.query_id = Some(value.to_string()),
            "referenceID" => config.reference_id = Some(value.to_string()),
            "subsamples" => config.subsamples = Some(number(line_number, key, value)?),
            "length" => config.length = Some(number(line_number, key, value)?),
            "chimerax" => config.visualization_mut().chimerax_dir = Some(PathBuf::from(value)),
            "divergence" => config.divergence_mut().enabled = Some(enabled(value)),
            "discrepancy" => config.discrepancy_mut().enabled = Some(enabled(value)),
            other => debug!(key = other, "Ignoring control file entry."),
        }
    }
    Ok(config)
}
