use crate::core::models::features::FeatureStore;
use crate::core::models::records::{DiscrepancyRecord, SignificanceLabel};
use crate::core::models::state::State;
use crate::core::stats::kernel::{mean_vector, mmd_between};
use crate::engine::context::AnalysisContext;
use crate::engine::error::EngineError;
use crate::engine::progress::Progress;
use crate::engine::rng::SiteRngSource;
use nalgebra::DVector;
use rand::Rng;
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Outcome of the bootstrap comparison at one site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BootstrapOutcome {
    pub observed: f64,
    pub empirical_p: f64,
}

/// Compares the observed MMD against `resamples` neutral draws of one reference and one
/// control vector.
///
/// Both counters start at one, so `p` lies strictly inside `(0, 1)`.
pub fn bootstrap<R: Rng>(
    observed: f64,
    reference: &[DVector<f64>],
    control: &[DVector<f64>],
    gamma: f64,
    resamples: usize,
    rng: &mut R,
) -> BootstrapOutcome {
    let mut less = 1u64;
    let mut greater_or_equal = 1u64;
    for _ in 0..resamples {
        let a = &reference[rng.gen_range(0..reference.len())];
        let b = &control[rng.gen_range(0..control.len())];
        if mmd_between(a, b, gamma) < observed {
            less += 1;
        } else {
            greater_or_equal += 1;
        }
    }
    BootstrapOutcome {
        observed,
        empirical_p: less as f64 / (less + greater_or_equal) as f64,
    }
}

fn site_vectors(store: &FeatureStore, state: State, site: usize) -> Vec<DVector<f64>> {
    store
        .subsample_features(state)
        .into_iter()
        .filter_map(|features| features.row(site))
        .collect()
}

fn analyze_site<S: SiteRngSource>(
    context: &AnalysisContext,
    store: &FeatureStore,
    streams: &S,
    site: usize,
) -> DiscrepancyRecord {
    let position = site + 1;
    let residue = context.residue_at(position);
    let settings = &context.config.discrepancy;

    let reference = site_vectors(store, State::Reference, site);
    let query = site_vectors(store, State::Query, site);
    let control = site_vectors(store, State::ReferenceControl, site);
    if reference.is_empty() || query.is_empty() || control.is_empty() {
        return DiscrepancyRecord::error(position, residue);
    }

    let dimension = reference[0].len();
    if query.iter().chain(&control).any(|v| v.len() != dimension) {
        warn!(position, "Feature dimensions differ between states.");
        return DiscrepancyRecord::error(position, residue);
    }

    let (Some(reference_mean), Some(query_mean)) = (mean_vector(&reference), mean_vector(&query))
    else {
        return DiscrepancyRecord::error(position, residue);
    };

    let observed = mmd_between(&reference_mean, &query_mean, settings.gamma);
    let mut rng = streams.for_site(site);
    let outcome = bootstrap(
        observed,
        &reference,
        &control,
        settings.gamma,
        settings.resamples,
        &mut rng,
    );

    let label = if outcome.empirical_p > settings.cutoff {
        SignificanceLabel::Significant
    } else {
        SignificanceLabel::NotSignificant
    };

    DiscrepancyRecord {
        position,
        residue,
        mmd: outcome.observed,
        empirical_p: outcome.empirical_p,
        label,
    }
}

/// Site-wise MMD between mean reference and mean query features, with a bootstrap null
/// drawn from reference and reference-control features. Covers sites `1..L-1`.
#[instrument(skip_all, name = "discrepancy_task")]
pub fn run<S: SiteRngSource>(
    context: &AnalysisContext,
    store: &FeatureStore,
    streams: &S,
) -> Result<Vec<DiscrepancyRecord>, EngineError> {
    let sites = context.protein_length().saturating_sub(1);
    let settings = &context.config.discrepancy;

    for state in [State::Reference, State::Query, State::ReferenceControl] {
        let available = store.subsample_features(state).len();
        if available < store.subsamples() {
            warn!(
                %state,
                available,
                expected = store.subsamples(),
                "Using the subsample features available for this state."
            );
        }
    }
    info!(
        sites,
        gamma = settings.gamma,
        resamples = settings.resamples,
        "Computing feature discrepancy."
    );

    context.reporter.report(Progress::TaskStart {
        total_steps: sites as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = 0..sites;

    #[cfg(feature = "parallel")]
    let iterator = (0..sites).into_par_iter();

    let records: Vec<DiscrepancyRecord> = iterator
        .map(|site| {
            let record = analyze_site(context, store, streams, site);
            context.reporter.report(Progress::TaskIncrement);
            record
        })
        .collect();

    context.reporter.report(Progress::TaskFinish);

    if records.len() != sites {
        return Err(EngineError::Internal(format!(
            "discrepancy produced {} records for {} sites",
            records.len(),
            sites
        )));
    }

    info!(
        significant = records.iter().filter(|r| r.label.is_significant()).count(),
        errors = records.iter().filter(|r| r.is_error()).count(),
        "Discrepancy analysis complete."
    );
    Ok(records)
}
