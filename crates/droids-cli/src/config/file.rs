use super::legacy;
use crate::error::{CliError, Result};
use droidspp::core::stats::divergence::DivergenceMeasure;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileFeatureConfig {
    /// Fixed reduced dimension `k`; takes precedence over `dimension-fraction`.
    pub dimension: Option<usize>,
    pub dimension_fraction: Option<f64>,
    pub sparsity_threshold: Option<f64>,
    pub include_flux: Option<bool>,
    pub persist: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileDivergenceConfig {
    pub enabled: Option<bool>,
    pub measure: Option<DivergenceMeasure>,
    pub family_alpha: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileDiscrepancyConfig {
    pub enabled: Option<bool>,
    pub gamma: Option<f64>,
    pub resamples: Option<usize>,
    pub cutoff: Option<f64>,
    pub seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileVisualizationConfig {
    pub write_attributes: Option<bool>,
    pub launch_viewer: Option<bool>,
    pub chimerax_dir: Option<PathBuf>,
    pub lighting: Option<String>,
    pub transparency: Option<u8>,
    pub background: Option<String>,
}

/// Partial run configuration as read from a file; every value is optional.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub reference_id: Option<String>,
    pub query_id: Option<String>,
    pub length: Option<usize>,
    pub subsamples: Option<usize>,
    pub features: Option<FileFeatureConfig>,
    pub divergence: Option<FileDivergenceConfig>,
    pub discrepancy: Option<FileDiscrepancyConfig>,
    pub visualization: Option<FileVisualizationConfig>,
}

impl FileConfig {
    /// Reads a TOML configuration, or a legacy control file when the extension is `.ctl`.
    ///
    /// Relative directories in the file are resolved against the file's own directory, and
    /// a file without `input-dir` reads its inputs from that directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading configuration file: {:?}", path);
        let content = fs::read_to_string(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

        let is_legacy = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ctl"));
        let config = if is_legacy {
            legacy::parse(&content).map_err(|e| CliError::FileParsing {
                path: path.to_path_buf(),
                source: e.into(),
            })?
        } else {
            toml::from_str(&content).map_err(|e| CliError::FileParsing {
                path: path.to_path_buf(),
                source: e.into(),
            })?
        };

        let base = path.parent().unwrap_or(Path::new(""));
        Ok(config.resolved_against(base))
    }

    fn resolved_against(mut self, base: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        self.input_dir = Some(self.input_dir.map_or_else(|| base.to_path_buf(), resolve));
        self.output_dir = self.output_dir.map(resolve);
        if let Some(visualization) = self.visualization.as_mut() {
            visualization.chimerax_dir = visualization.chimerax_dir.take().map(resolve);
        }
        self
    }

    pub fn features_mut(&mut self) -> &mut FileFeatureConfig {
        self.features.get_or_insert_with(Default::default)
    }

    pub fn divergence_mut(&mut self) -> &mut FileDivergenceConfig {
        self.divergence.get_or_insert_with(Default::default)
    }

    pub fn discrepancy_mut(&mut self) -> &mut FileDiscrepancyConfig {
        self.discrepancy.get_or_insert_with(Default::default)
    }

    pub fn visualization_mut(&mut self) -> &mut FileVisualizationConfig {
        self.visualization.get_or_insert_with(Default::default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn toml_file_is_parsed_and_paths_resolved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("droids.toml");
        fs::write(
            &path,
            r#"
            reference-id = "1ubq_wt"
            query-id = "1ubq_mut"
            length = 76
            subsamples = 5
            output-dir = "results"

            [features]
            dimension = 10
            include-flux = true

            [divergence]
            measure = "jensen-shannon"

            [discrepancy]
            resamples = 1000
            seed = 9

            [visualization]
            launch-viewer = true
            chimerax-dir = "/opt/chimerax/bin"
            "#,
        )
        .unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        assert_eq!(config.reference_id.as_deref(), Some("1ubq_wt"));
        assert_eq!(config.length, Some(76));
        assert_eq!(config.input_dir.as_deref(), Some(dir.path()));
        assert_eq!(config.output_dir, Some(dir.path().join("results")));
        let features = config.features.unwrap();
        assert_eq!(features.dimension, Some(10));
        assert_eq!(features.include_flux, Some(true));
        assert_eq!(
            config.divergence.unwrap().measure,
            Some(DivergenceMeasure::JensenShannon)
        );
        assert_eq!(config.discrepancy.unwrap().seed, Some(9));
        assert_eq!(
            config.visualization.unwrap().chimerax_dir,
            Some(PathBuf::from("/opt/chimerax/bin"))
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("droids.toml");
        fs::write(&path, "length = 10\n[discrepancy]\nbandwidth = 2.0\n").unwrap();
        let err = FileConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, CliError::FileParsing { .. }));
    }

    #[test]
    fn ctl_extension_selects_the_legacy_parser() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("DROIDS.ctl");
        fs::write(&path, "queryID,mut,# query\nreferenceID,wt,# ref\nlength,12,\n").unwrap();
        let config = FileConfig::from_file(&path).unwrap();
        assert_eq!(config.query_id.as_deref(), Some("mut"));
        assert_eq!(config.length, Some(12));
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = FileConfig::from_file(Path::new("/nonexistent/droids.toml")).unwrap_err();
        match err {
            CliError::FileParsing { path, .. } => {
                assert_eq!(path, PathBuf::from("/nonexistent/droids.toml"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
