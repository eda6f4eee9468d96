use crate::core::io::chimerax::ViewerStyle;
use crate::core::models::state::State;
use crate::core::stats::divergence::DivergenceMeasure;
use crate::core::stats::kernel::DEFAULT_GAMMA;
use crate::core::stats::reduction::DEFAULT_SPARSITY_THRESHOLD;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_DIMENSION_FRACTION: f64 = 0.25;
pub const DEFAULT_FAMILY_ALPHA: f64 = 0.05;
pub const DEFAULT_RESAMPLES: usize = 500;
pub const DEFAULT_DISCREPANCY_CUTOFF: f64 = 0.99;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
}

fn invalid(parameter: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidParameter {
        parameter,
        reason: reason.into(),
    }
}

/// Where the toolkit outputs live and which system identifiers name them.
#[derive(Debug, Clone, PartialEq)]
pub struct InputConfig {
    pub root: PathBuf,
    pub reference_id: String,
    pub query_id: String,
}

impl InputConfig {
    /// Identifier used in the file names of `state`. The control replicate is named after
    /// the reference system.
    pub fn id_for(&self, state: State) -> &str {
        match state {
            State::Reference | State::ReferenceControl => &self.reference_id,
            State::Query => &self.query_id,
        }
    }
}

/// Size `k` of the reduced feature vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReducedDimension {
    Fixed(usize),
    /// `round(fraction × L)`, at least one.
    Fraction(f64),
}

impl Default for ReducedDimension {
    fn default() -> Self {
        ReducedDimension::Fraction(DEFAULT_DIMENSION_FRACTION)
    }
}

impl ReducedDimension {
    pub fn resolve(&self, protein_length: usize) -> usize {
        match *self {
            ReducedDimension::Fixed(k) => k.max(1),
            ReducedDimension::Fraction(fraction) => {
                ((fraction * protein_length as f64).round() as usize).max(1)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureConfig {
    pub dimension: ReducedDimension,
    pub sparsity_threshold: f64,
    /// Prepend the normalized fluctuation to every reduced row.
    pub include_flux: bool,
    /// Write reduced features under `feature_*_reduced/`.
    pub persist: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            dimension: ReducedDimension::default(),
            sparsity_threshold: DEFAULT_SPARSITY_THRESHOLD,
            include_flux: false,
            persist: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DivergenceConfig {
    pub enabled: bool,
    pub measure: DivergenceMeasure,
    /// Family-wise error rate before the per-site correction.
    pub family_alpha: f64,
}

impl Default for DivergenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            measure: DivergenceMeasure::default(),
            family_alpha: DEFAULT_FAMILY_ALPHA,
        }
    }
}

impl DivergenceConfig {
    /// Per-site KS cutoff `α / (L × 0.5)`.
    pub fn cutoff(&self, protein_length: usize) -> f64 {
        self.family_alpha / (protein_length as f64 * 0.5)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiscrepancyConfig {
    pub enabled: bool,
    pub gamma: f64,
    pub resamples: usize,
    /// Sites whose empirical p exceeds this value are labelled significant.
    pub cutoff: f64,
    /// Bootstrap seed; drawn once per run when absent.
    pub seed: Option<u64>,
}

impl Default for DiscrepancyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            gamma: DEFAULT_GAMMA,
            resamples: DEFAULT_RESAMPLES,
            cutoff: DEFAULT_DISCREPANCY_CUTOFF,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisualizationConfig {
    pub write_attributes: bool,
    pub launch_viewer: bool,
    pub chimerax_dir: Option<PathBuf>,
    pub style: ViewerStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub inputs: InputConfig,
    pub output_dir: PathBuf,
    pub protein_length: usize,
    pub subsamples: usize,
    pub features: FeatureConfig,
    pub divergence: DivergenceConfig,
    pub discrepancy: DiscrepancyConfig,
    pub visualization: VisualizationConfig,
}

impl AnalysisConfig {
    pub fn reduced_dimension(&self) -> usize {
        self.features.dimension.resolve(self.protein_length)
    }
}

#[derive(Default)]
pub struct AnalysisConfigBuilder {
    input_root: Option<PathBuf>,
    reference_id: Option<String>,
    query_id: Option<String>,
    output_dir: Option<PathBuf>,
    protein_length: Option<usize>,
    subsamples: Option<usize>,
    features: FeatureConfig,
    divergence: DivergenceConfig,
    discrepancy: DiscrepancyConfig,
    visualization: Option<VisualizationConfig>,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_root(mut self, path: PathBuf) -> Self {
        self.input_root = Some(path);
        self
    }
    pub fn reference_id(mut self, id: impl Into<String>) -> Self {
        self.reference_id = Some(id.into());
        self
    }
    pub fn query_id(mut self, id: impl Into<String>) -> Self {
        self.query_id = Some(id.into());
        self
    }
    pub fn output_dir(mut self, path: PathBuf) -> Self {
        self.output_dir = Some(path);
        self
    }
    pub fn protein_length(mut self, length: usize) -> Self {
        self.protein_length = Some(length);
        self
    }
    pub fn subsamples(mut self, count: usize) -> Self {
        self.subsamples = Some(count);
        self
    }
    pub fn reduced_dimension(mut self, dimension: ReducedDimension) -> Self {
        self.features.dimension = dimension;
        self
    }
    pub fn sparsity_threshold(mut self, threshold: f64) -> Self {
        self.features.sparsity_threshold = threshold;
        self
    }
    pub fn include_flux(mut self, include: bool) -> Self {
        self.features.include_flux = include;
        self
    }
    pub fn persist_features(mut self, persist: bool) -> Self {
        self.features.persist = persist;
        self
    }
    pub fn divergence_enabled(mut self, enabled: bool) -> Self {
        self.divergence.enabled = enabled;
        self
    }
    pub fn divergence_measure(mut self, measure: DivergenceMeasure) -> Self {
        self.divergence.measure = measure;
        self
    }
    pub fn family_alpha(mut self, alpha: f64) -> Self {
        self.divergence.family_alpha = alpha;
        self
    }
    pub fn discrepancy_enabled(mut self, enabled: bool) -> Self {
        self.discrepancy.enabled = enabled;
        self
    }
    pub fn gamma(mut self, gamma: f64) -> Self {
        self.discrepancy.gamma = gamma;
        self
    }
    pub fn resamples(mut self, resamples: usize) -> Self {
        self.discrepancy.resamples = resamples;
        self
    }
    pub fn discrepancy_cutoff(mut self, cutoff: f64) -> Self {
        self.discrepancy.cutoff = cutoff;
        self
    }
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.discrepancy.seed = seed;
        self
    }
    pub fn visualization(mut self, visualization: VisualizationConfig) -> Self {
        self.visualization = Some(visualization);
        self
    }

    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        let reference_id = self
            .reference_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(ConfigError::MissingParameter("reference_id"))?;
        let query_id = self
            .query_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(ConfigError::MissingParameter("query_id"))?;
        let protein_length = self
            .protein_length
            .ok_or(ConfigError::MissingParameter("protein_length"))?;
        let subsamples = self
            .subsamples
            .ok_or(ConfigError::MissingParameter("subsamples"))?;

        if protein_length == 0 {
            return Err(invalid("protein_length", "must be at least 1"));
        }
        if subsamples == 0 {
            return Err(invalid("subsamples", "must be at least 1"));
        }

        match self.features.dimension {
            ReducedDimension::Fixed(0) => {
                return Err(invalid("reduced_dimension", "must be at least 1"));
            }
            ReducedDimension::Fraction(f) if !(f > 0.0 && f <= 1.0) => {
                return Err(invalid("reduced_dimension", "fraction must be in (0, 1]"));
            }
            _ => {}
        }
        if !(self.features.sparsity_threshold >= 0.0 && self.features.sparsity_threshold.is_finite())
        {
            return Err(invalid("sparsity_threshold", "must be a non-negative number"));
        }
        if !(self.divergence.family_alpha > 0.0 && self.divergence.family_alpha < 1.0) {
            return Err(invalid("family_alpha", "must be in (0, 1)"));
        }
        if !(self.discrepancy.gamma > 0.0 && self.discrepancy.gamma.is_finite()) {
            return Err(invalid("gamma", "must be a positive number"));
        }
        if self.discrepancy.resamples == 0 {
            return Err(invalid("resamples", "must be at least 1"));
        }
        if !(self.discrepancy.cutoff > 0.0 && self.discrepancy.cutoff < 1.0) {
            return Err(invalid("discrepancy_cutoff", "must be in (0, 1)"));
        }

        let visualization = self.visualization.unwrap_or_default();
        if visualization.launch_viewer && visualization.chimerax_dir.is_none() {
            return Err(ConfigError::MissingParameter("chimerax_dir"));
        }
        if visualization.launch_viewer && !visualization.write_attributes {
            return Err(invalid("launch_viewer", "requires attribute files to be written"));
        }

        let input_root = self.input_root.unwrap_or_else(|| PathBuf::from("."));
        let output_dir = self.output_dir.unwrap_or_else(|| input_root.clone());

        Ok(AnalysisConfig {
            inputs: InputConfig {
                root: input_root,
                reference_id,
                query_id,
            },
            output_dir,
            protein_length,
            subsamples,
            features: self.features,
            divergence: self.divergence,
            discrepancy: self.discrepancy,
            visualization,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::new()
            .reference_id("1ubq")
            .query_id("1ubq_mut")
            .protein_length(76)
            .subsamples(10)
    }

    #[test]
    fn builder_applies_defaults() {
        let config = minimal().build().unwrap();
        assert_eq!(config.inputs.root, PathBuf::from("."));
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.reduced_dimension(), 19);
        assert_eq!(config.features.sparsity_threshold, 0.005);
        assert_eq!(config.discrepancy.resamples, 500);
        assert_eq!(config.discrepancy.gamma, 1.0 / 6.0);
        assert_eq!(config.divergence.measure, DivergenceMeasure::Generalized);
        assert!(config.discrepancy.seed.is_none());
    }

    #[test]
    fn builder_reports_first_missing_parameter() {
        let err = AnalysisConfigBuilder::new()
            .reference_id("a")
            .protein_length(10)
            .subsamples(3)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("query_id"));

        let err = AnalysisConfigBuilder::new()
            .reference_id("a")
            .query_id("b")
            .subsamples(3)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("protein_length"));
    }

    #[test]
    fn builder_rejects_out_of_range_values() {
        assert!(matches!(
            minimal().subsamples(0).build(),
            Err(ConfigError::InvalidParameter { parameter: "subsamples", .. })
        ));
        assert!(matches!(
            minimal().gamma(-1.0).build(),
            Err(ConfigError::InvalidParameter { parameter: "gamma", .. })
        ));
        assert!(matches!(
            minimal().reduced_dimension(ReducedDimension::Fraction(1.5)).build(),
            Err(ConfigError::InvalidParameter { parameter: "reduced_dimension", .. })
        ));
        assert!(matches!(
            minimal().discrepancy_cutoff(1.0).build(),
            Err(ConfigError::InvalidParameter { parameter: "discrepancy_cutoff", .. })
        ));
    }

    #[test]
    fn launching_the_viewer_requires_its_location() {
        let visualization = VisualizationConfig {
            launch_viewer: true,
            ..Default::default()
        };
        assert_eq!(
            minimal().visualization(visualization).build().unwrap_err(),
            ConfigError::MissingParameter("chimerax_dir")
        );

        let visualization = VisualizationConfig {
            launch_viewer: true,
            write_attributes: false,
            chimerax_dir: Some(PathBuf::from("/opt/chimerax/bin")),
            ..Default::default()
        };
        assert!(matches!(
            minimal().visualization(visualization).build(),
            Err(ConfigError::InvalidParameter { parameter: "launch_viewer", .. })
        ));
    }

    #[test]
    fn reduced_dimension_rounds_and_never_drops_below_one() {
        assert_eq!(ReducedDimension::Fraction(0.25).resolve(10), 3);
        assert_eq!(ReducedDimension::Fraction(0.25).resolve(2), 1);
        assert_eq!(ReducedDimension::Fraction(0.25).resolve(1), 1);
        assert_eq!(ReducedDimension::Fixed(4).resolve(2), 4);
    }

    #[test]
    fn divergence_cutoff_is_corrected_for_half_the_sites() {
        let config = DivergenceConfig::default();
        assert!((config.cutoff(10) - 0.01).abs() < 1e-15);
    }

    #[test]
    fn control_replicate_uses_reference_identifier() {
        let config = minimal().build().unwrap();
        assert_eq!(config.inputs.id_for(State::ReferenceControl), "1ubq");
        assert_eq!(config.inputs.id_for(State::Query), "1ubq_mut");
    }
}
