use crate::core::io::error::TableError;
use crate::core::io::resinfo::{AtomInfoFile, ResidueInfo, ResidueInfoFile};
use crate::core::io::traits::{TableSink, TableSource};
use crate::engine::error::EngineError;
use std::fs;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Extracts the residue listing from a toolkit atom-info file and writes it as a residue
/// info file (`<site>\t<code>` per line).
#[instrument(skip_all, name = "resinfo_workflow")]
pub fn run(atom_info: &Path, output: &Path) -> Result<ResidueInfo, EngineError> {
    let residues = AtomInfoFile::read_from_path(atom_info).map_err(|source| {
        EngineError::ResidueInfo {
            path: atom_info.to_path_buf(),
            source,
        }
    })?;
    if residues.is_empty() {
        warn!(path = %atom_info.display(), "No recognized residues in atom info.");
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| EngineError::io(parent, e))?;
    }
    ResidueInfoFile::write_to_path(&residues, output)
        .map_err(|e: TableError| EngineError::export(output, e))?;

    info!(sites = residues.len(), path = %output.display(), "Residue info written.");
    Ok(residues)
}
