use crate::core::io::chimerax::{
    Attribute, AttributeFile, AttributeName, ControlFile, ViewerControl,
};
use crate::core::io::error::TableError;
use crate::core::io::resinfo::{ResidueInfo, ResidueInfoFile};
use crate::core::io::tables::{DiscrepancyTable, DivergenceTable};
use crate::core::io::traits::{TableSink, TableSource};
use crate::core::models::features::{FeatureError, FeatureStore};
use crate::core::models::records::{DiscrepancyRecord, ResidueRecord};
use crate::core::models::state::{FeatureKey, Scope, State};
use crate::engine::config::AnalysisConfig;
use crate::engine::context::AnalysisContext;
use crate::engine::error::EngineError;
use crate::engine::layout::{InputLayout, OutputLayout};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::rng::SeededStreams;
use crate::engine::runner::CommandRunner;
use crate::engine::tasks;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Everything a completed comparison produced, including the problems it recovered from.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Divergence records for sites `1..=L`; empty when the analysis was disabled.
    pub divergence: Vec<ResidueRecord>,
    /// Discrepancy records for sites `1..L-1`; empty when the analysis was disabled.
    pub discrepancy: Vec<DiscrepancyRecord>,
    /// Every (state, scope) that could not be loaded or reduced.
    pub failures: Vec<(FeatureKey, FeatureError)>,
    /// Fluctuation series that were constant and normalized to zeros.
    pub degenerate_series: Vec<FeatureKey>,
    /// Feature sets whose correlation matrix vanished under sparsification.
    pub empty_feature_sets: Vec<FeatureKey>,
    /// Sites where an undefined divergence was replaced by zero.
    pub degenerate_sites: Vec<usize>,
    /// Subsample indices available in both the reference and the query ensemble.
    pub paired_subsamples: usize,
    /// Seed of the bootstrap streams, when the discrepancy analysis ran.
    pub seed: Option<u64>,
    /// Files written by the run, in write order.
    pub written: Vec<PathBuf>,
}

impl RunSummary {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
            && self.degenerate_series.is_empty()
            && self.empty_feature_sets.is_empty()
            && self.degenerate_sites.is_empty()
    }

    fn record_store(&mut self, store: &FeatureStore) {
        self.failures = store
            .failures()
            .into_iter()
            .map(|(key, e)| (key, e.clone()))
            .collect();
        for state in State::ALL {
            for scope in Scope::all(store.subsamples()) {
                let key = FeatureKey::new(state, scope);
                if let Some(Ok(series)) = store.flux(&key) {
                    if series.is_degenerate() {
                        self.degenerate_series.push(key);
                    }
                }
                if let Some(Ok(features)) = store.features(&key) {
                    if features.is_empty_after_sparsify() {
                        self.empty_feature_sets.push(key);
                    }
                }
            }
        }
    }
}

/// Runs a complete comparison of the reference and query ensembles described by `config`
/// and writes the result tables and viewer inputs under its output directory.
#[instrument(skip_all, name = "compare_workflow")]
pub fn run(
    config: &AnalysisConfig,
    reporter: &ProgressReporter,
    runner: &dyn CommandRunner,
) -> Result<RunSummary, EngineError> {
    info!(
        reference = %config.inputs.reference_id,
        query = %config.inputs.query_id,
        length = config.protein_length,
        subsamples = config.subsamples,
        "Starting comparative dynamics analysis."
    );

    let inputs = InputLayout::new(&config.inputs);
    let residues = reporter.phase("Preparation", || load_residues(&inputs, reporter))?;
    let context = AnalysisContext::new(config, reporter, &residues);
    let outputs = context.outputs();
    let mut summary = RunSummary::default();

    // === Phase 1: Features ===
    let store = reporter.phase("Feature Building", || tasks::features::run(&context));
    summary.record_store(&store);
    for (key, error) in &summary.failures {
        reporter.report(Progress::Warning(format!("{key}: {error}")));
    }
    if config.features.persist {
        let written = tasks::features::persist(&store, &outputs)?;
        info!(files = written, "Reduced features written.");
    }

    // === Phase 2: Divergence ===
    if config.divergence.enabled {
        let outcome = reporter.phase("Divergence", || tasks::divergence::run(&context, &store))?;
        summary.degenerate_sites = outcome.degenerate_sites();
        summary.paired_subsamples = outcome.paired_subsamples;
        summary.divergence = outcome.records;
    } else {
        info!("Divergence analysis disabled.");
    }

    // === Phase 3: Discrepancy ===
    if config.discrepancy.enabled {
        let streams = SeededStreams::from_optional(config.discrepancy.seed);
        info!(seed = streams.seed(), "Seeded bootstrap streams.");
        summary.seed = Some(streams.seed());
        summary.discrepancy = reporter.phase("Discrepancy", || {
            tasks::discrepancy::run(&context, &store, &streams)
        })?;
    } else {
        info!("Discrepancy analysis disabled.");
    }

    // === Phase 4: Export ===
    reporter.phase("Export", || export(config, &outputs, &inputs, &mut summary))?;

    // === Phase 5: Viewer ===
    if config.visualization.launch_viewer {
        reporter.phase("Viewer", || launch_viewer(config, &outputs, &summary, runner))?;
    }

    info!(
        files = summary.written.len(),
        failures = summary.failures.len(),
        "Comparative analysis complete."
    );
    Ok(summary)
}

fn load_residues(
    inputs: &InputLayout,
    reporter: &ProgressReporter,
) -> Result<ResidueInfo, EngineError> {
    let path = inputs.residue_info();
    match ResidueInfoFile::read_from_path(&path) {
        Ok(info) => {
            info!(sites = info.len(), "Loaded residue info.");
            Ok(info)
        }
        Err(TableError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "Residue info not found; residue columns will be NA.");
            reporter.report(Progress::Warning(format!(
                "residue info '{}' not found",
                path.display()
            )));
            Ok(ResidueInfo::new())
        }
        Err(source) => Err(EngineError::ResidueInfo { path, source }),
    }
}

fn write_file<T>(value: &T::Value, path: PathBuf, written: &mut Vec<PathBuf>) -> Result<(), EngineError>
where
    T: TableSink<Error = TableError>,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| EngineError::io(parent, e))?;
    }
    T::write_to_path(value, &path).map_err(|e| EngineError::export(&path, e))?;
    written.push(path);
    Ok(())
}

/// Attributes backed by an analysis that ran in this comparison.
fn attributes(summary: &RunSummary, config: &AnalysisConfig) -> Vec<Attribute> {
    let mut attributes = Vec::with_capacity(AttributeName::ALL.len());
    if config.divergence.enabled {
        attributes.push(Attribute::divergence(&summary.divergence));
        attributes.push(Attribute::significant_divergence(&summary.divergence));
    }
    if config.discrepancy.enabled {
        attributes.push(Attribute::significant_discrepancy(&summary.discrepancy));
    }
    attributes
}

fn stage_structure(source: &Path, target: &Path) -> Result<bool, EngineError> {
    if !source.is_file() {
        return Ok(false);
    }
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| EngineError::io(parent, e))?;
    }
    fs::copy(source, target).map_err(|e| EngineError::io(source, e))?;
    Ok(true)
}

fn export(
    config: &AnalysisConfig,
    outputs: &OutputLayout,
    inputs: &InputLayout,
    summary: &mut RunSummary,
) -> Result<(), EngineError> {
    let mut written = Vec::new();
    if config.divergence.enabled {
        write_file::<DivergenceTable>(&summary.divergence, outputs.divergence_table(), &mut written)?;
    }
    if config.discrepancy.enabled {
        write_file::<DiscrepancyTable>(
            &summary.discrepancy,
            outputs.discrepancy_table(),
            &mut written,
        )?;
    }

    if config.visualization.write_attributes {
        for attribute in attributes(summary, config) {
            let control = ViewerControl {
                attribute: attribute.name,
                length: config.protein_length,
                style: config.visualization.style.clone(),
            };
            write_file::<AttributeFile>(&attribute, outputs.attribute(attribute.name), &mut written)?;
            write_file::<ControlFile>(&control, outputs.control(attribute.name), &mut written)?;
        }

        let staged = [
            (inputs.query_structure(), outputs.staged_query_structure()),
            (inputs.reference_structure(), outputs.staged_reference_structure()),
        ];
        for (source, target) in staged {
            if stage_structure(&source, &target)? {
                written.push(target);
            } else {
                warn!(path = %source.display(), "Structure not found; not staged for the viewer.");
            }
        }
    }

    info!(files = written.len(), "Results exported.");
    summary.written.extend(written);
    Ok(())
}

fn launch_viewer(
    config: &AnalysisConfig,
    outputs: &OutputLayout,
    summary: &RunSummary,
    runner: &dyn CommandRunner,
) -> Result<(), EngineError> {
    let Some(dir) = &config.visualization.chimerax_dir else {
        return Err(EngineError::PhaseFailed {
            phase: "Viewer",
            reason: "no ChimeraX directory configured".to_string(),
        });
    };
    let program = dir.join("ChimeraX");
    for attribute in attributes(summary, config) {
        info!(attribute = %attribute.name, "Launching structure viewer.");
        runner.run(&program, &[attribute.name.script_name()], outputs.root())?;
    }
    Ok(())
}
