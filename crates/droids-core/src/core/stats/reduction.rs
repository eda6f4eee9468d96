use super::StatsError;
use nalgebra::DMatrix;
use std::cmp::Ordering;

pub const DEFAULT_SPARSITY_THRESHOLD: f64 = 0.005;

/// Singular values below this fraction of the largest one count as numerically zero.
const RANK_RTOL: f64 = 1.0e-10;

/// Per-row embedding of a square matrix onto its leading singular directions.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    /// `n × k` matrix whose row `i` is the reduced vector of matrix row `i`.
    pub rows: DMatrix<f64>,
    /// Singular values of the kept components, descending.
    pub singular_values: Vec<f64>,
    /// Kept components whose singular value is numerically non-zero.
    pub informative_components: usize,
    /// The input had no non-zero entry.
    pub empty: bool,
}

/// Zeroes every entry with `|value| < threshold` in place and returns how many non-zero
/// entries remain. Signs of surviving entries are untouched.
pub fn sparsify(matrix: &mut DMatrix<f64>, threshold: f64) -> usize {
    let mut remaining = 0;
    for value in matrix.iter_mut() {
        if value.abs() < threshold {
            *value = 0.0;
        } else if *value != 0.0 {
            remaining += 1;
        }
    }
    remaining
}

/// Sparsifies `matrix` and embeds it with [`truncated_svd`].
pub fn sparse_embedding(
    mut matrix: DMatrix<f64>,
    threshold: f64,
    k: usize,
) -> Result<Embedding, StatsError> {
    check_input(&matrix)?;
    sparsify(&mut matrix, threshold);
    truncated_svd(&matrix, k)
}

/// Rows of `U_k · Σ_k` for the `k` largest singular values of a square matrix.
///
/// Each right singular vector is oriented so that its largest-magnitude entry is positive.
/// When `k` exceeds the matrix dimension the trailing columns are zero.
pub fn truncated_svd(matrix: &DMatrix<f64>, k: usize) -> Result<Embedding, StatsError> {
    check_input(matrix)?;
    let n = matrix.nrows();
    let mut rows = DMatrix::zeros(n, k);

    if matrix.iter().all(|&v| v == 0.0) {
        return Ok(Embedding {
            rows,
            singular_values: vec![0.0; k.min(n)],
            informative_components: 0,
            empty: true,
        });
    }

    let svd = matrix
        .clone()
        .try_svd(true, true, f64::EPSILON, 0)
        .ok_or(StatsError::DidNotConverge)?;
    let (u, v_t) = match (svd.u.as_ref(), svd.v_t.as_ref()) {
        (Some(u), Some(v_t)) => (u, v_t),
        _ => return Err(StatsError::DidNotConverge),
    };

    let mut order: Vec<usize> = (0..svd.singular_values.len()).collect();
    order.sort_by(|&a, &b| {
        svd.singular_values[b]
            .partial_cmp(&svd.singular_values[a])
            .unwrap_or(Ordering::Equal)
    });

    let largest = order.first().map_or(0.0, |&i| svd.singular_values[i]);
    let tolerance = largest * RANK_RTOL;

    let mut singular_values = Vec::with_capacity(k.min(n));
    let mut informative_components = 0;
    for (component, &index) in order.iter().take(k).enumerate() {
        let sigma = svd.singular_values[index];
        let direction = v_t.row(index);
        let pivot = direction
            .iter()
            .copied()
            .max_by(|a, b| a.abs().partial_cmp(&b.abs()).unwrap_or(Ordering::Equal))
            .unwrap_or(0.0);
        let sign = if pivot < 0.0 { -1.0 } else { 1.0 };

        for r in 0..n {
            rows[(r, component)] = sign * u[(r, index)] * sigma;
        }
        singular_values.push(sigma);
        if sigma > tolerance {
            informative_components += 1;
        }
    }

    Ok(Embedding {
        rows,
        singular_values,
        informative_components,
        empty: false,
    })
}

fn check_input(matrix: &DMatrix<f64>) -> Result<(), StatsError> {
    if matrix.nrows() != matrix.ncols() {
        return Err(StatsError::NotSquare {
            rows: matrix.nrows(),
            cols: matrix.ncols(),
        });
    }
    if let Some(index) = matrix.iter().position(|v| !v.is_finite()) {
        return Err(StatsError::NonFinite { index });
    }
    Ok(())
}
