mod common;

use common::{
    Fixture, LENGTH, RESIDUES, banded_matrix, base_ensemble, constant_matrix, three_states,
};
use droidspp::core::models::records::SignificanceLabel;
use droidspp::engine::progress::ProgressReporter;
use droidspp::engine::runner::SystemCommandRunner;
use droidspp::workflows::compare::{self, RunSummary};

fn run(fixture: &Fixture) -> RunSummary {
    compare::run(
        &fixture.config(),
        &ProgressReporter::new(),
        &SystemCommandRunner,
    )
    .unwrap()
}

#[test]
fn identical_states_are_neutral_everywhere() {
    let fixture = Fixture::new(&three_states(
        base_ensemble(0.02),
        banded_matrix,
        banded_matrix,
    ));
    let summary = run(&fixture);

    assert!(summary.failures.is_empty(), "{:?}", summary.failures);
    assert_eq!(summary.divergence.len(), LENGTH);
    for (i, record) in summary.divergence.iter().enumerate() {
        assert_eq!(record.position, i + 1);
        assert_eq!(record.d_flux, 0.0);
        assert_eq!(record.signed_divergence, 0.0);
        assert_eq!(record.d_statistic, 0.0);
        assert_eq!(record.p_value, 1.0);
        assert_eq!(record.label, SignificanceLabel::NotSignificant);
    }

    assert_eq!(summary.discrepancy.len(), LENGTH - 1);
    for record in &summary.discrepancy {
        assert_eq!(record.mmd, 0.0);
        assert_eq!(record.label, SignificanceLabel::NotSignificant);
        assert_eq!(record.empirical_p, 1.0 / 502.0);
    }

    let table = fixture.read("divergenceMetrics/divergenceMetrics.txt");
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), LENGTH + 1);
    assert_eq!(
        lines[0],
        "pos\tres\tdFLUX\tKL\tD\tpvalue\tp_value\tFLUX_ref\tFLUX_query"
    );
    assert!(lines[1].starts_with("1\tSER\t0.0\t0.0\t0.0\t1.0\tns\t"));

    let table = fixture.read("maxMeanDiscrepancy/maxMeanDiscrepancy.txt");
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), LENGTH);
    assert_eq!(lines[0], "pos\tres\tMMD\tpval");
    assert_eq!(lines[5], format!("5\t{}\t0.0\tns", RESIDUES[4]));

    let attribute = fixture.read("ChimeraXvis/attributeKL.dat");
    assert!(attribute.starts_with("recipient: residues\nattribute: KL\n\n\t:1\t0.0\n"));
    assert_eq!(attribute.lines().count(), 3 + LENGTH);
    assert!(fixture.root().join("ChimeraXvis/query.pdb").is_file());
}

#[test]
fn a_single_changed_site_is_the_only_divergent_one() {
    const CHANGED: usize = 4;
    let mut query = base_ensemble(0.02);
    for series in query.iter_mut() {
        series[CHANGED] *= 3.0;
    }
    let fixture = Fixture::new(&three_states(query, banded_matrix, banded_matrix));
    let summary = run(&fixture);

    for (site, record) in summary.divergence.iter().enumerate() {
        if site == CHANGED {
            assert!(record.d_flux > 0.0);
            assert!(record.signed_divergence > 0.0);
            assert_eq!(record.d_statistic, 1.0);
        } else {
            assert_eq!(record.signed_divergence, 0.0);
            assert_eq!(record.d_statistic, 0.0);
            assert_eq!(record.label, SignificanceLabel::NotSignificant);
        }
    }

    // Features are built from correlations alone, which did not change.
    assert!(summary.discrepancy.iter().all(|r| r.mmd == 0.0));
}

#[test]
fn fully_sparsified_correlations_give_zero_features() {
    let fixture = Fixture::new(&three_states(
        base_ensemble(0.02),
        |_| constant_matrix(0.001),
        |_| constant_matrix(0.001),
    ));
    let summary = run(&fixture);

    assert!(summary.failures.is_empty(), "{:?}", summary.failures);
    assert_eq!(summary.empty_feature_sets.len(), 3 * 4);
    assert!(!summary.is_clean());
    assert_eq!(summary.discrepancy.len(), LENGTH - 1);
    for record in &summary.discrepancy {
        assert_eq!(record.mmd, 0.0);
        assert_eq!(record.label, SignificanceLabel::NotSignificant);
    }
}

#[test]
fn fixed_seed_reproduces_the_discrepancy_table() {
    let mut query = base_ensemble(0.02);
    query[0][2] = 0.9;
    let fixture = Fixture::new(&three_states(query, banded_matrix, |i| {
        let mut m = banded_matrix(i);
        m[2][3] = 0.2;
        m[3][2] = 0.2;
        m
    }));

    let first = run(&fixture);
    let table = fixture.read("maxMeanDiscrepancy/maxMeanDiscrepancy.txt");
    let second = run(&fixture);

    assert_eq!(first.seed, Some(2024));
    assert_eq!(first.discrepancy, second.discrepancy);
    assert_eq!(
        table,
        fixture.read("maxMeanDiscrepancy/maxMeanDiscrepancy.txt")
    );
}
