use super::state::{FeatureKey, Scope, State};
use crate::core::stats::normalize::min_max;
use nalgebra::{DMatrix, DVector};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single (state, scope) could not be built. Fatal for that scope only.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FeatureError {
    #[error("Input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Failed to read '{}': {message}", path.display())]
    Unreadable { path: PathBuf, message: String },

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Singular value decomposition failed: {0}")]
    SingularValueFailure(String),

    #[error("Fluctuation input unavailable for this scope: {0}")]
    FluxUnavailable(String),
}

/// A per-site fluctuation profile for one (state, scope).
#[derive(Debug, Clone, PartialEq)]
pub struct FluctuationSeries {
    raw: Vec<f64>,
    normalized: Vec<f64>,
    degenerate: bool,
}

impl FluctuationSeries {
    pub fn from_raw(raw: Vec<f64>) -> Self {
        let (normalized, degenerate) = min_max(&raw);
        Self {
            raw,
            normalized,
            degenerate,
        }
    }

    pub fn raw(&self) -> &[f64] {
        &self.raw
    }

    pub fn normalized(&self) -> &[f64] {
        &self.normalized
    }

    /// `true` when the raw column was constant and normalization produced all zeros.
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// Reduced per-site feature vectors for one (state, scope): one row per matrix row.
#[derive(Debug, Clone, PartialEq)]
pub struct ReducedFeatures {
    pub(crate) rows: DMatrix<f64>,
    pub(crate) informative_components: usize,
    pub(crate) empty_after_sparsify: bool,
}

impl ReducedFeatures {
    pub fn new(rows: DMatrix<f64>, informative_components: usize, empty_after_sparsify: bool) -> Self {
        Self {
            rows,
            informative_components,
            empty_after_sparsify,
        }
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<DVector<f64>> {
        (index < self.rows.nrows()).then(|| self.rows.row(index).transpose())
    }

    pub fn site_count(&self) -> usize {
        self.rows.nrows()
    }

    pub fn dimension(&self) -> usize {
        self.rows.ncols()
    }

    /// Number of components backed by a non-negligible singular value.
    pub fn informative_components(&self) -> usize {
        self.informative_components
    }

    /// `true` when sparsification zeroed the whole correlation matrix.
    pub fn is_empty_after_sparsify(&self) -> bool {
        self.empty_after_sparsify
    }

    /// Returns a copy with `column` prepended to every row.
    pub fn with_leading_column(&self, column: &[f64]) -> Self {
        let nrows = self.rows.nrows();
        let ncols = self.rows.ncols() + 1;
        let rows = DMatrix::from_fn(nrows, ncols, |r, c| {
            if c == 0 {
                column.get(r).copied().unwrap_or(0.0)
            } else {
                self.rows[(r, c - 1)]
            }
        });
        Self {
            rows,
            informative_components: self.informative_components,
            empty_after_sparsify: self.empty_after_sparsify,
        }
    }
}

/// Keyed store of every fluctuation series and reduced feature set built in a run.
///
/// Each entry holds the outcome of its own scope, so a failure in one (state, scope) is
/// recorded next to the successful siblings rather than aborting them.
#[derive(Debug, Default, Clone)]
pub struct FeatureStore {
    subsamples: usize,
    flux: BTreeMap<FeatureKey, Result<FluctuationSeries, FeatureError>>,
    features: BTreeMap<FeatureKey, Result<ReducedFeatures, FeatureError>>,
}

impl FeatureStore {
    pub fn new(subsamples: usize) -> Self {
        Self {
            subsamples,
            ..Default::default()
        }
    }

    pub fn subsamples(&self) -> usize {
        self.subsamples
    }

    pub fn insert_flux(&mut self, key: FeatureKey, series: Result<FluctuationSeries, FeatureError>) {
        self.flux.insert(key, series);
    }

    pub fn insert_features(
        &mut self,
        key: FeatureKey,
        features: Result<ReducedFeatures, FeatureError>,
    ) {
        self.features.insert(key, features);
    }

    pub fn flux(&self, key: &FeatureKey) -> Option<&Result<FluctuationSeries, FeatureError>> {
        self.flux.get(key)
    }

    pub fn features(&self, key: &FeatureKey) -> Option<&Result<ReducedFeatures, FeatureError>> {
        self.features.get(key)
    }

    pub fn whole_flux(&self, state: State) -> Option<&FluctuationSeries> {
        self.flux
            .get(&FeatureKey::new(state, Scope::Whole))
            .and_then(|r| r.as_ref().ok())
    }

    /// Successfully built subsample feature sets of `state`, in sample order.
    pub fn subsample_features(&self, state: State) -> Vec<&ReducedFeatures> {
        (0..self.subsamples)
            .filter_map(|i| {
                self.features
                    .get(&FeatureKey::new(state, Scope::Subsample(i)))
            })
            .filter_map(|r| r.as_ref().ok())
            .collect()
    }

    /// Every failed entry, fluctuation failures first, each group in key order.
    pub fn failures(&self) -> Vec<(FeatureKey, &FeatureError)> {
        let flux_failures = self
            .flux
            .iter()
            .filter_map(|(key, r)| r.as_ref().err().map(|e| (*key, e)));
        let feature_failures = self
            .features
            .iter()
            .filter_map(|(key, r)| r.as_ref().err().map(|e| (*key, e)));
        flux_failures.chain(feature_failures).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features_with_rows(n: usize, k: usize, fill: f64) -> ReducedFeatures {
        ReducedFeatures::new(DMatrix::from_element(n, k, fill), k, false)
    }

    #[test]
    fn fluctuation_series_keeps_raw_and_normalized_values() {
        let series = FluctuationSeries::from_raw(vec![2.0, 4.0, 6.0]);
        assert_eq!(series.raw(), &[2.0, 4.0, 6.0]);
        assert_eq!(series.normalized(), &[0.0, 0.5, 1.0]);
        assert!(!series.is_degenerate());
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn constant_fluctuation_series_is_flagged_degenerate() {
        let series = FluctuationSeries::from_raw(vec![1.5; 4]);
        assert!(series.is_degenerate());
        assert_eq!(series.normalized(), &[0.0; 4]);
    }

    #[test]
    fn row_returns_none_past_the_last_site() {
        let features = features_with_rows(3, 2, 1.0);
        assert_eq!(features.row(2).unwrap().len(), 2);
        assert!(features.row(3).is_none());
    }

    #[test]
    fn with_leading_column_prepends_values() {
        let features = features_with_rows(2, 2, 7.0);
        let extended = features.with_leading_column(&[0.25, 0.75]);
        assert_eq!(extended.dimension(), 3);
        assert_eq!(extended.row(1).unwrap().as_slice(), &[0.75, 7.0, 7.0]);
    }

    #[test]
    fn store_subsample_views_skip_failed_scopes() {
        let mut store = FeatureStore::new(3);
        for i in 0..3 {
            let key = FeatureKey::new(State::Reference, Scope::Subsample(i));
            if i == 1 {
                store.insert_features(
                    key,
                    Err(FeatureError::ShapeMismatch("matrix is 3x4".into())),
                );
            } else {
                store.insert_features(key, Ok(features_with_rows(4, 2, i as f64)));
            }
        }

        let available = store.subsample_features(State::Reference);
        assert_eq!(available.len(), 2);
        assert_eq!(available[1].matrix()[(0, 0)], 2.0);
        assert!(store.subsample_features(State::Query).is_empty());

        let failures = store.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(
            failures[0].0,
            FeatureKey::new(State::Reference, Scope::Subsample(1))
        );
    }

    #[test]
    fn whole_flux_ignores_failed_entries() {
        let mut store = FeatureStore::new(0);
        store.insert_flux(
            FeatureKey::new(State::Query, Scope::Whole),
            Err(FeatureError::InputNotFound {
                path: PathBuf::from("fluct_q_all_query.txt"),
            }),
        );
        store.insert_flux(
            FeatureKey::new(State::Reference, Scope::Whole),
            Ok(FluctuationSeries::from_raw(vec![1.0, 2.0])),
        );
        assert!(store.whole_flux(State::Query).is_none());
        assert_eq!(store.whole_flux(State::Reference).unwrap().raw(), &[1.0, 2.0]);
    }
}
