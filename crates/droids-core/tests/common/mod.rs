use droidspp::engine::config::{AnalysisConfig, AnalysisConfigBuilder, VisualizationConfig};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const LENGTH: usize = 10;
pub const SUBSAMPLES: usize = 3;
pub const RESIDUES: [&str; LENGTH] = [
    "SER", "GLY", "ALA", "LYS", "HIE", "ASP", "LEU", "VAL", "THR", "PRO",
];

/// Per-subsample fluctuation series of one state, `[subsample][site]`.
pub type Ensemble = [[f64; LENGTH]; SUBSAMPLES];

pub fn base_ensemble(jitter: f64) -> Ensemble {
    let mut ensemble = [[0.0; LENGTH]; SUBSAMPLES];
    for (i, series) in ensemble.iter_mut().enumerate() {
        for (site, value) in series.iter_mut().enumerate() {
            *value = 0.5 + 0.1 * site as f64 + jitter * i as f64;
        }
    }
    ensemble
}

/// Banded correlation with a per-sample perturbation; symmetric with a unit diagonal.
pub fn banded_matrix(sample: usize) -> Vec<Vec<f64>> {
    (0..LENGTH)
        .map(|r| {
            (0..LENGTH)
                .map(|c| {
                    if r == c {
                        1.0
                    } else {
                        let distance = r.abs_diff(c) as f64;
                        (-distance / 2.0).exp() * (1.0 - 0.05 * sample as f64)
                    }
                })
                .collect()
        })
        .collect()
}

pub fn constant_matrix(value: f64) -> Vec<Vec<f64>> {
    vec![vec![value; LENGTH]; LENGTH]
}

pub struct StateInputs {
    pub id: &'static str,
    pub file_tag: &'static str,
    pub short_tag: &'static str,
    pub ensemble: Ensemble,
    pub matrices: Vec<Vec<Vec<f64>>>,
}

/// A toolkit output directory for one comparison.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new(states: &[StateInputs]) -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        for state in states {
            write_state(root, state);
        }

        let resinfo = RESIDUES
            .iter()
            .enumerate()
            .fold(String::new(), |mut out, (i, code)| {
                writeln!(out, "{}\t{}", i + 1, code).unwrap();
                out
            });
        fs::create_dir_all(root.join("resinfo_ref")).unwrap();
        fs::write(root.join("resinfo_ref/cpptraj_resinfo_wt.txt"), resinfo).unwrap();
        fs::write(root.join("mut.pdb"), "END\n").unwrap();
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> AnalysisConfig {
        AnalysisConfigBuilder::new()
            .input_root(self.root().to_path_buf())
            .reference_id("wt")
            .query_id("mut")
            .protein_length(LENGTH)
            .subsamples(SUBSAMPLES)
            .seed(Some(2024))
            .visualization(VisualizationConfig {
                write_attributes: true,
                ..Default::default()
            })
            .build()
            .unwrap()
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.root().join(relative)).unwrap()
    }
}

fn matrix_text(matrix: &[Vec<f64>], with_index: bool) -> String {
    let mut out = String::new();
    for (r, row) in matrix.iter().enumerate() {
        if with_index {
            write!(out, "{r} ").unwrap();
        }
        let cells: Vec<String> = row.iter().map(|v| format!("{v:.6}")).collect();
        writeln!(out, "{}", cells.join(" ")).unwrap();
    }
    out
}

fn write_state(root: &Path, state: &StateInputs) {
    let mut whole = String::from("#Atom   AtomicFlx\n");
    for site in 0..LENGTH {
        let mean = state.ensemble.iter().map(|s| s[site]).sum::<f64>() / SUBSAMPLES as f64;
        writeln!(whole, "{} {mean:.6}", site + 1).unwrap();
    }
    fs::write(
        root.join(format!("fluct_{}_all_{}.txt", state.id, state.file_tag)),
        whole,
    )
    .unwrap();

    let flux_dir = root.join(format!("atomflux_{}", state.short_tag));
    fs::create_dir_all(&flux_dir).unwrap();
    let mut table = String::from("#Atom  sub0  sub1  sub2\n");
    for site in 0..LENGTH {
        let cells: Vec<String> = state
            .ensemble
            .iter()
            .map(|s| format!("{:.6}", s[site]))
            .collect();
        writeln!(table, "{} {}", site + 1, cells.join(" ")).unwrap();
    }
    fs::write(
        flux_dir.join(format!("fluct_{}_sub_{}.txt", state.id, state.file_tag)),
        table,
    )
    .unwrap();

    fs::write(
        root.join(format!("corr_{}_all_{}_matrix.txt", state.id, state.file_tag)),
        matrix_text(&state.matrices[0], false),
    )
    .unwrap();
    let matrix_dir = root.join(format!("atomcorr_{}_matrix", state.short_tag));
    fs::create_dir_all(&matrix_dir).unwrap();
    for i in 0..SUBSAMPLES {
        fs::write(
            matrix_dir.join(format!(
                "corr_{}_sub_{}_matrix_{}.txt",
                state.id, state.file_tag, i
            )),
            matrix_text(&state.matrices[i + 1], true),
        )
        .unwrap();
    }
}

/// Whole-run matrix first, then one per subsample.
fn all_matrices(f: &dyn Fn(usize) -> Vec<Vec<f64>>) -> Vec<Vec<Vec<f64>>> {
    (0..=SUBSAMPLES).map(f).collect()
}

/// Reference, query and control inputs; `query` and `query_matrices` override the
/// reference values for the query state.
pub fn three_states(
    query: Ensemble,
    matrices: impl Fn(usize) -> Vec<Vec<f64>>,
    query_matrices: impl Fn(usize) -> Vec<Vec<f64>>,
) -> Vec<StateInputs> {
    vec![
        StateInputs {
            id: "wt",
            file_tag: "reference",
            short_tag: "ref",
            ensemble: base_ensemble(0.02),
            matrices: all_matrices(&matrices),
        },
        StateInputs {
            id: "mut",
            file_tag: "query",
            short_tag: "query",
            ensemble: query,
            matrices: all_matrices(&query_matrices),
        },
        StateInputs {
            id: "wt",
            file_tag: "referenceCTL",
            short_tag: "refCTL",
            ensemble: base_ensemble(0.03),
            matrices: all_matrices(&|i| matrices(SUBSAMPLES - i)),
        },
    ]
}
