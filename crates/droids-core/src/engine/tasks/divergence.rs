use crate::core::models::features::{FeatureStore, FluctuationSeries};
use crate::core::models::records::{ResidueRecord, SignificanceLabel};
use crate::core::models::state::{FeatureKey, Scope, State};
use crate::core::stats::divergence::{divergence, signed};
use crate::core::stats::ks;
use crate::engine::context::AnalysisContext;
use crate::engine::error::EngineError;
use crate::engine::progress::Progress;
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct DivergenceOutcome {
    /// One record per site, positions `1..=L` ascending.
    pub records: Vec<ResidueRecord>,
    /// Subsample indices present in both the reference and query ensembles.
    pub paired_subsamples: usize,
}

impl DivergenceOutcome {
    pub fn error_sites(&self) -> usize {
        self.records.iter().filter(|r| r.is_error()).count()
    }

    /// Positions where an undefined divergence was replaced by zero.
    pub fn degenerate_sites(&self) -> Vec<usize> {
        self.records
            .iter()
            .filter(|r| r.degenerate)
            .map(|r| r.position)
            .collect()
    }

    pub fn significant_sites(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.label.is_significant())
            .count()
    }
}

struct SiteInputs<'s> {
    reference_whole: Option<&'s FluctuationSeries>,
    query_whole: Option<&'s FluctuationSeries>,
    /// Reference and query subsample series sharing a subsample index.
    pairs: Vec<(&'s FluctuationSeries, &'s FluctuationSeries)>,
}

impl<'s> SiteInputs<'s> {
    fn gather(store: &'s FeatureStore) -> Self {
        let subsample = move |state: State, i: usize| {
            store
                .flux(&FeatureKey::new(state, Scope::Subsample(i)))
                .and_then(|r| r.as_ref().ok())
        };
        let pairs = (0..store.subsamples())
            .filter_map(|i| Some((subsample(State::Reference, i)?, subsample(State::Query, i)?)))
            .collect();
        Self {
            reference_whole: store.whole_flux(State::Reference),
            query_whole: store.whole_flux(State::Query),
            pairs,
        }
    }
}

/// `sig` only when the KS p-value is strictly below the corrected cutoff.
fn label_for(p_value: f64, cutoff: f64) -> SignificanceLabel {
    if p_value < cutoff {
        SignificanceLabel::Significant
    } else {
        SignificanceLabel::NotSignificant
    }
}

fn analyze_site(
    context: &AnalysisContext,
    inputs: &SiteInputs,
    cutoff: f64,
    site: usize,
) -> ResidueRecord {
    let position = site + 1;
    let residue = context.residue_at(position);

    let whole = inputs
        .reference_whole
        .zip(inputs.query_whole)
        .and_then(|(r, q)| Some((*r.raw().get(site)?, *q.raw().get(site)?)));
    let Some((ref_flux, query_flux)) = whole else {
        return ResidueRecord::error(position, residue);
    };

    let (reference, query): (Vec<f64>, Vec<f64>) = inputs
        .pairs
        .iter()
        .filter_map(|(r, q)| Some((*r.raw().get(site)?, *q.raw().get(site)?)))
        .unzip();
    if reference.is_empty() {
        return ResidueRecord::error(position, residue);
    }

    let ks = match ks::two_sample(&reference, &query) {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(position, error = %e, "KS test failed for site.");
            return ResidueRecord::error(position, residue);
        }
    };

    let d_flux = query_flux - ref_flux;
    let measured = divergence(context.config.divergence.measure, &reference, &query);
    let label = label_for(ks.p_value, cutoff);

    ResidueRecord {
        position,
        residue,
        d_flux,
        signed_divergence: signed(measured.value, d_flux),
        d_statistic: ks.statistic,
        p_value: ks.p_value,
        label,
        ref_flux,
        query_flux,
        degenerate: measured.degenerate,
    }
}

/// Site-wise signed divergence and KS test between the reference and query fluctuation
/// ensembles.
#[instrument(skip_all, name = "divergence_task")]
pub fn run(
    context: &AnalysisContext,
    store: &FeatureStore,
) -> Result<DivergenceOutcome, EngineError> {
    let length = context.protein_length();
    let cutoff = context.config.divergence.cutoff(length);
    let inputs = SiteInputs::gather(store);

    if inputs.reference_whole.is_none() || inputs.query_whole.is_none() {
        warn!("Whole-run fluctuations missing; every site will be an error record.");
    }
    if inputs.pairs.len() < store.subsamples() {
        warn!(
            available = inputs.pairs.len(),
            expected = store.subsamples(),
            "Using the subsamples available for both states."
        );
    }
    info!(
        sites = length,
        cutoff,
        measure = %context.config.divergence.measure,
        "Computing fluctuation divergence."
    );

    context.reporter.report(Progress::TaskStart {
        total_steps: length as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = 0..length;

    #[cfg(feature = "parallel")]
    let iterator = (0..length).into_par_iter();

    let records: Vec<ResidueRecord> = iterator
        .map(|site| {
            let record = analyze_site(context, &inputs, cutoff, site);
            context.reporter.report(Progress::TaskIncrement);
            record
        })
        .collect();

    context.reporter.report(Progress::TaskFinish);

    if records.len() != length {
        return Err(EngineError::Internal(format!(
            "divergence produced {} records for {} sites",
            records.len(),
            length
        )));
    }

    let outcome = DivergenceOutcome {
        records,
        paired_subsamples: inputs.pairs.len(),
    };
    info!(
        significant = outcome.significant_sites(),
        errors = outcome.error_sites(),
        "Divergence analysis complete."
    );
    Ok(outcome)
}
