use crate::core::io::error::TableError;
use crate::core::io::features::FeatureFile;
use crate::core::io::fluctuation::{SubsampleFluxFile, WholeFluxFile};
use crate::core::io::matrix::CorrelationMatrixFile;
use crate::core::io::traits::{TableSink, TableSource};
use crate::core::models::features::{FeatureError, FeatureStore, FluctuationSeries, ReducedFeatures};
use crate::core::models::state::{FeatureKey, Scope, State};
use crate::core::stats::StatsError;
use crate::core::stats::reduction::sparse_embedding;
use crate::engine::context::AnalysisContext;
use crate::engine::error::EngineError;
use crate::engine::layout::OutputLayout;
use crate::engine::progress::Progress;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

fn read_error(path: &Path, error: TableError) -> FeatureError {
    match error {
        TableError::Io(e) if e.kind() == io::ErrorKind::NotFound => FeatureError::InputNotFound {
            path: path.to_path_buf(),
        },
        other => FeatureError::Unreadable {
            path: path.to_path_buf(),
            message: other.to_string(),
        },
    }
}

fn reduction_error(error: StatsError) -> FeatureError {
    match error {
        StatsError::NotSquare { rows, cols } => {
            FeatureError::ShapeMismatch(format!("correlation matrix is {rows}x{cols}"))
        }
        other => FeatureError::SingularValueFailure(other.to_string()),
    }
}

/// Loads the whole-run series and the `subsamples` subsample series of `state`.
fn load_flux(
    context: &AnalysisContext,
    state: State,
) -> Vec<(FeatureKey, Result<FluctuationSeries, FeatureError>)> {
    let layout = context.inputs();
    let subsamples = context.config.subsamples;
    let mut entries = Vec::with_capacity(subsamples + 1);

    let path = layout.whole_flux(state);
    let whole = WholeFluxFile::read_from_path(&path)
        .map(FluctuationSeries::from_raw)
        .map_err(|e| read_error(&path, e));
    entries.push((FeatureKey::new(state, Scope::Whole), whole));

    let path = layout.subsample_flux_table(state);
    let columns = SubsampleFluxFile::read_from_path(&path)
        .map_err(|e| read_error(&path, e))
        .and_then(|table| {
            table
                .subsample_columns(subsamples)
                .map(|columns| columns.to_vec())
                .ok_or_else(|| {
                    FeatureError::ShapeMismatch(format!(
                        "'{}' has {} value columns, expected {}",
                        path.display(),
                        table.column_count(),
                        subsamples
                    ))
                })
        });

    match columns {
        Ok(columns) => {
            for (i, column) in columns.into_iter().enumerate() {
                entries.push((
                    FeatureKey::new(state, Scope::Subsample(i)),
                    Ok(FluctuationSeries::from_raw(column)),
                ));
            }
        }
        Err(e) => {
            for i in 0..subsamples {
                entries.push((FeatureKey::new(state, Scope::Subsample(i)), Err(e.clone())));
            }
        }
    }
    entries
}

fn build_features(
    context: &AnalysisContext,
    store: &FeatureStore,
    key: FeatureKey,
    k: usize,
) -> Result<ReducedFeatures, FeatureError> {
    let path = context.inputs().matrix(key);
    let matrix = CorrelationMatrixFile::read_from_path(&path).map_err(|e| read_error(&path, e))?;

    let flux = store.flux(&key).and_then(|r| r.as_ref().ok());
    if let Some(series) = flux {
        if series.len() != matrix.nrows() {
            return Err(FeatureError::ShapeMismatch(format!(
                "fluctuation series has {} sites but correlation matrix has {} rows",
                series.len(),
                matrix.nrows()
            )));
        }
    }

    let embedding = sparse_embedding(matrix, context.config.features.sparsity_threshold, k)
        .map_err(reduction_error)?;
    let features = ReducedFeatures::new(
        embedding.rows,
        embedding.informative_components,
        embedding.empty,
    );

    if !context.config.features.include_flux {
        return Ok(features);
    }
    match flux {
        Some(series) => Ok(features.with_leading_column(series.normalized())),
        None => Err(FeatureError::FluxUnavailable(key.to_string())),
    }
}

/// Builds every fluctuation series and reduced feature set of a run.
///
/// Failures are recorded per (state, scope) in the returned store; sibling scopes are
/// unaffected.
#[instrument(skip_all, name = "feature_task")]
pub fn run(context: &AnalysisContext) -> FeatureStore {
    let subsamples = context.config.subsamples;
    let k = context.config.reduced_dimension();
    info!(subsamples, k, "Building per-state features.");

    let mut store = FeatureStore::new(subsamples);
    for state in State::ALL {
        for (key, series) in load_flux(context, state) {
            match &series {
                Ok(s) if s.is_degenerate() => {
                    warn!(%key, "Constant fluctuation series; normalized to zeros.")
                }
                Err(e) => warn!(%key, error = %e, "Fluctuation input unavailable."),
                Ok(s) => debug!(%key, sites = s.len(), "Loaded fluctuations."),
            }
            store.insert_flux(key, series);
        }
    }

    let keys: Vec<FeatureKey> = State::ALL
        .into_iter()
        .flat_map(|state| Scope::all(subsamples).map(move |scope| FeatureKey::new(state, scope)))
        .collect();

    context.reporter.report(Progress::TaskStart {
        total_steps: keys.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = keys.iter();

    #[cfg(feature = "parallel")]
    let iterator = keys.par_iter();

    let built: Vec<(FeatureKey, Result<ReducedFeatures, FeatureError>)> = iterator
        .map(|&key| {
            let result = build_features(context, &store, key, k);
            context.reporter.report(Progress::TaskIncrement);
            (key, result)
        })
        .collect();

    context.reporter.report(Progress::TaskFinish);

    for (key, result) in built {
        match &result {
            Ok(features) if features.is_empty_after_sparsify() => {
                warn!(%key, "Correlation matrix is empty after sparsification; features are zero.")
            }
            Ok(features) => debug!(
                %key,
                informative = features.informative_components(),
                "Reduced correlation features."
            ),
            Err(e) => warn!(%key, error = %e, "Feature build failed."),
        }
        store.insert_features(key, result);
    }

    info!(
        failures = store.failures().len(),
        "Feature building complete."
    );
    store
}

/// Writes every successfully built feature set under the output directory.
///
/// Returns the number of files written.
#[instrument(skip_all, name = "feature_persist")]
pub fn persist(store: &FeatureStore, outputs: &OutputLayout) -> Result<usize, EngineError> {
    let mut written = 0;
    for state in State::ALL {
        for scope in Scope::all(store.subsamples()) {
            let key = FeatureKey::new(state, scope);
            let Some(Ok(features)) = store.features(&key) else {
                continue;
            };
            let path = outputs.reduced_features(key);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| EngineError::io(parent, e))?;
            }
            FeatureFile::write_to_path(features, &path)
                .map_err(|e| EngineError::export(&path, e))?;
            written += 1;
        }
    }
    debug!(files = written, "Persisted reduced features.");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::resinfo::ResidueInfo;
    use crate::engine::config::{AnalysisConfig, AnalysisConfigBuilder};
    use crate::engine::progress::ProgressReporter;
    use tempfile::TempDir;

    const MATRIX: &str = "1.0 0.5 0.2\n0.5 1.0 0.3\n0.2 0.3 1.0\n";

    fn config(root: &Path, include_flux: bool) -> AnalysisConfig {
        AnalysisConfigBuilder::new()
            .input_root(root.to_path_buf())
            .reference_id("wt")
            .query_id("mut")
            .protein_length(3)
            .subsamples(2)
            .include_flux(include_flux)
            .build()
            .unwrap()
    }

    /// Writes complete reference inputs only; query and control files are absent.
    fn write_reference(root: &Path, whole_matrix: &str) {
        let config = config(root, false);
        let layout = crate::engine::layout::InputLayout::new(&config.inputs);
        let state = State::Reference;

        fs::write(layout.whole_flux(state), "Res AtomicFlx\n1 0.5\n2 1.0\n3 0.8\n").unwrap();
        fs::write(layout.whole_matrix(state), whole_matrix).unwrap();

        let table = layout.subsample_flux_table(state);
        fs::create_dir_all(table.parent().unwrap()).unwrap();
        fs::write(&table, "Res s0 s1\n1 0.5 0.6\n2 1.0 1.1\n3 0.8 0.7\n").unwrap();
        for i in 0..2 {
            let path = layout.subsample_matrix(state, i);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, MATRIX).unwrap();
        }
    }

    fn build(config: &AnalysisConfig) -> FeatureStore {
        let reporter = ProgressReporter::new();
        let residues = ResidueInfo::new();
        let context = AnalysisContext::new(config, &reporter, &residues);
        run(&context)
    }

    #[test]
    fn present_state_builds_while_missing_states_fail_independently() {
        let dir = TempDir::new().unwrap();
        write_reference(dir.path(), MATRIX);
        let store = build(&config(dir.path(), false));

        for scope in Scope::all(2) {
            let features = store
                .features(&FeatureKey::new(State::Reference, scope))
                .unwrap()
                .as_ref()
                .unwrap();
            assert_eq!(features.site_count(), 3);
            assert_eq!(features.dimension(), 1);
        }

        let query = store.features(&FeatureKey::new(State::Query, Scope::Whole));
        assert!(matches!(query, Some(Err(FeatureError::InputNotFound { .. }))));
        let failures = store.failures();
        assert!(!failures.is_empty());
        assert!(failures.iter().all(|(key, _)| key.state != State::Reference));
    }

    #[test]
    fn matrix_shorter_than_the_flux_series_is_a_shape_mismatch() {
        let dir = TempDir::new().unwrap();
        write_reference(dir.path(), "1.0 0.5\n0.5 1.0\n");
        let store = build(&config(dir.path(), false));

        let whole = store.features(&FeatureKey::new(State::Reference, Scope::Whole));
        assert!(matches!(whole, Some(Err(FeatureError::ShapeMismatch(_)))));
        let sibling = store.features(&FeatureKey::new(State::Reference, Scope::Subsample(0)));
        assert!(matches!(sibling, Some(Ok(_))));
    }

    #[test]
    fn include_flux_prepends_the_normalized_series() {
        let dir = TempDir::new().unwrap();
        write_reference(dir.path(), MATRIX);
        let store = build(&config(dir.path(), true));

        let features = store
            .features(&FeatureKey::new(State::Reference, Scope::Whole))
            .unwrap()
            .as_ref()
            .unwrap();
        assert_eq!(features.dimension(), 2);
        let leading: Vec<f64> = (0..3).map(|r| features.matrix()[(r, 0)]).collect();
        for (got, want) in leading.iter().zip([0.0, 1.0, 0.6]) {
            assert!((got - want).abs() < 1e-12, "{got} != {want}");
        }
    }

    #[test]
    fn persist_writes_only_built_feature_sets() {
        let dir = TempDir::new().unwrap();
        write_reference(dir.path(), MATRIX);
        let config = config(dir.path(), false);
        let store = build(&config);

        let outputs = OutputLayout::new(&config);
        let written = persist(&store, &outputs).unwrap();
        assert_eq!(written, 3);
        let path = outputs.reduced_features(FeatureKey::new(State::Reference, Scope::Subsample(1)));
        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert!(
            !outputs
                .reduced_features(FeatureKey::new(State::Query, Scope::Whole))
                .exists()
        );
    }
}
