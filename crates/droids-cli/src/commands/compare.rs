use crate::cli::CompareArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use droidspp::{
    engine::{progress::ProgressReporter, runner::SystemCommandRunner},
    workflows::{self, compare::RunSummary},
};
use tracing::{info, warn};

pub async fn run(args: CompareArgs) -> Result<()> {
    let app_config = build_config(&args)?;
    if let Some(source) = &app_config.source {
        info!("Configuration loaded from {:?}", source);
    }
    let config = app_config.core_config;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Comparing {} (query) against {} (reference) over {} sites...",
        config.inputs.query_id, config.inputs.reference_id, config.protein_length
    );
    info!("Invoking the comparison workflow...");

    let summary = tokio::task::block_in_place(|| {
        workflows::compare::run(&config, &reporter, &SystemCommandRunner)
    })?;

    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    if let Some(seed) = summary.seed {
        println!("Bootstrap seed: {seed}");
    }

    if !summary.divergence.is_empty() {
        let significant = summary
            .divergence
            .iter()
            .filter(|r| r.label.is_significant())
            .count();
        let errors = summary.divergence.iter().filter(|r| r.is_error()).count();
        println!(
            "Divergence: {significant}/{} sites significant ({errors} unavailable, {} subsample pairs).",
            summary.divergence.len(),
            summary.paired_subsamples
        );
    }

    if !summary.discrepancy.is_empty() {
        let significant = summary
            .discrepancy
            .iter()
            .filter(|r| r.label.is_significant())
            .count();
        let errors = summary.discrepancy.iter().filter(|r| r.is_error()).count();
        println!(
            "Discrepancy: {significant}/{} sites significant ({errors} unavailable).",
            summary.discrepancy.len()
        );
    }

    if !summary.is_clean() {
        warn!(
            failures = summary.failures.len(),
            degenerate_series = summary.degenerate_series.len(),
            empty_feature_sets = summary.empty_feature_sets.len(),
            degenerate_sites = summary.degenerate_sites.len(),
            "Run completed with recovered problems."
        );
        println!("Warning: some inputs were missing or degenerate; rerun with -v for details.");
        if !summary.degenerate_sites.is_empty() {
            let sites: Vec<String> = summary
                .degenerate_sites
                .iter()
                .map(ToString::to_string)
                .collect();
            println!("  Divergence set to zero at sites: {}", sites.join(", "));
        }
    }

    for path in &summary.written {
        println!("  wrote {}", path.display());
    }
}
