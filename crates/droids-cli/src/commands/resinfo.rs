use crate::cli::ResinfoArgs;
use crate::error::{CliError, Result};
use droidspp::workflows;
use std::path::{Path, PathBuf};
use tracing::info;

const ATOM_INFO_PREFIX: &str = "cpptraj_atominfo_";

pub async fn run(args: ResinfoArgs) -> Result<()> {
    let output = match args.output {
        Some(path) => path,
        None => default_output(&args.atominfo)?,
    };
    info!("Extracting residues from {:?} into {:?}", &args.atominfo, &output);

    let residues = workflows::resinfo::run(&args.atominfo, &output)?;
    println!(
        "✓ Residue info for {} sites written to: {}",
        residues.len(),
        output.display()
    );
    Ok(())
}

/// `<dir>/cpptraj_atominfo_<ID>.txt` maps to `<dir>/resinfo_ref/cpptraj_resinfo_<ID>.txt`.
fn default_output(atom_info: &Path) -> Result<PathBuf> {
    let id = atom_info
        .file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.strip_prefix(ATOM_INFO_PREFIX))
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            CliError::Argument(format!(
                "cannot derive an output name from '{}'; pass --output",
                atom_info.display()
            ))
        })?;
    let dir = atom_info.parent().unwrap_or(Path::new(""));
    Ok(dir
        .join("resinfo_ref")
        .join(format!("cpptraj_resinfo_{id}.txt")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_follows_the_toolkit_layout() {
        let output = default_output(Path::new("/runs/1ubq/cpptraj_atominfo_1ubq_wt.txt")).unwrap();
        assert_eq!(
            output,
            PathBuf::from("/runs/1ubq/resinfo_ref/cpptraj_resinfo_1ubq_wt.txt")
        );
    }

    #[test]
    fn unrecognized_names_require_an_explicit_output() {
        let err = default_output(Path::new("atoms.txt")).unwrap_err();
        assert!(matches!(err, CliError::Argument(_)));
    }
}
