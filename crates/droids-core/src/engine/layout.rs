use super::config::{AnalysisConfig, InputConfig};
use crate::core::io::chimerax::{AttributeName, VIS_DIR};
use crate::core::models::state::{FeatureKey, Scope, State};
use std::path::{Path, PathBuf};

/// Resolves toolkit file names for every (state, scope).
#[derive(Debug, Clone)]
pub struct InputLayout<'a> {
    inputs: &'a InputConfig,
}

impl<'a> InputLayout<'a> {
    pub fn new(inputs: &'a InputConfig) -> Self {
        Self { inputs }
    }

    pub fn root(&self) -> &Path {
        &self.inputs.root
    }

    fn id(&self, state: State) -> &str {
        self.inputs.id_for(state)
    }

    /// `fluct_<ID>_all_<state>.txt`
    pub fn whole_flux(&self, state: State) -> PathBuf {
        self.root()
            .join(format!("fluct_{}_all_{}.txt", self.id(state), state.file_tag()))
    }

    /// `corr_<ID>_all_<state>_matrix.txt`
    pub fn whole_matrix(&self, state: State) -> PathBuf {
        self.root().join(format!(
            "corr_{}_all_{}_matrix.txt",
            self.id(state),
            state.file_tag()
        ))
    }

    /// `atomflux_<short>/fluct_<ID>_sub_<state>.txt`
    pub fn subsample_flux_table(&self, state: State) -> PathBuf {
        self.root()
            .join(format!("atomflux_{}", state.short_tag()))
            .join(format!("fluct_{}_sub_{}.txt", self.id(state), state.file_tag()))
    }

    /// `atomcorr_<short>_matrix/corr_<ID>_sub_<state>_matrix_<i>.txt`
    pub fn subsample_matrix(&self, state: State, index: usize) -> PathBuf {
        self.root()
            .join(format!("atomcorr_{}_matrix", state.short_tag()))
            .join(format!(
                "corr_{}_sub_{}_matrix_{}.txt",
                self.id(state),
                state.file_tag(),
                index
            ))
    }

    /// Correlation matrix of one (state, scope).
    pub fn matrix(&self, key: FeatureKey) -> PathBuf {
        match key.scope {
            Scope::Whole => self.whole_matrix(key.state),
            Scope::Subsample(i) => self.subsample_matrix(key.state, i),
        }
    }

    /// `resinfo_ref/cpptraj_resinfo_<refID>.txt`
    pub fn residue_info(&self) -> PathBuf {
        self.root().join("resinfo_ref").join(format!(
            "cpptraj_resinfo_{}.txt",
            self.inputs.reference_id
        ))
    }

    /// `cpptraj_atominfo_<refID>.txt`
    pub fn atom_info(&self) -> PathBuf {
        self.root()
            .join(format!("cpptraj_atominfo_{}.txt", self.inputs.reference_id))
    }

    /// `<queryID>.pdb`
    pub fn query_structure(&self) -> PathBuf {
        self.root().join(format!("{}.pdb", self.inputs.query_id))
    }

    /// `<refID>.pdb`
    pub fn reference_structure(&self) -> PathBuf {
        self.root().join(format!("{}.pdb", self.inputs.reference_id))
    }
}

/// Resolves every file a run writes, relative to the output directory.
#[derive(Debug, Clone)]
pub struct OutputLayout<'a> {
    root: &'a Path,
    inputs: &'a InputConfig,
}

impl<'a> OutputLayout<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self {
            root: &config.output_dir,
            inputs: &config.inputs,
        }
    }

    pub fn root(&self) -> &Path {
        self.root
    }

    pub fn divergence_table(&self) -> PathBuf {
        self.root
            .join("divergenceMetrics")
            .join("divergenceMetrics.txt")
    }

    pub fn discrepancy_table(&self) -> PathBuf {
        self.root
            .join("maxMeanDiscrepancy")
            .join("maxMeanDiscrepancy.txt")
    }

    pub fn visualization_dir(&self) -> PathBuf {
        self.root.join(VIS_DIR)
    }

    pub fn staged_query_structure(&self) -> PathBuf {
        self.visualization_dir().join("query.pdb")
    }

    pub fn staged_reference_structure(&self) -> PathBuf {
        self.visualization_dir().join("reference.pdb")
    }

    pub fn attribute(&self, name: AttributeName) -> PathBuf {
        self.root.join(name.attribute_path())
    }

    pub fn control(&self, name: AttributeName) -> PathBuf {
        self.root.join(name.control_path())
    }

    /// `feature_<scope>_<short>_reduced/feature_<ID>_<scope>_<short>[_<i>].txt`
    pub fn reduced_features(&self, key: FeatureKey) -> PathBuf {
        let scope = key.scope.file_tag();
        let short = key.state.short_tag();
        let id = self.inputs.id_for(key.state);
        let file = match key.scope.sample_index() {
            None => format!("feature_{id}_{scope}_{short}.txt"),
            Some(i) => format!("feature_{id}_{scope}_{short}_{i}.txt"),
        };
        self.root
            .join(format!("feature_{scope}_{short}_reduced"))
            .join(file)
    }
}
