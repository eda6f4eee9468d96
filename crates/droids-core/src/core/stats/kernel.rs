use super::StatsError;
use nalgebra::DVector;

pub const DEFAULT_GAMMA: f64 = 1.0 / 6.0;

/// Gaussian kernel `exp(−γ‖x−y‖²)`. Both vectors must have the same dimension.
#[inline]
pub fn rbf(x: &DVector<f64>, y: &DVector<f64>, gamma: f64) -> f64 {
    (-gamma * (x - y).norm_squared()).exp()
}

fn mean_kernel(xs: &[DVector<f64>], ys: &[DVector<f64>], gamma: f64) -> f64 {
    let total: f64 = xs
        .iter()
        .flat_map(|x| ys.iter().map(move |y| rbf(x, y, gamma)))
        .sum();
    total / (xs.len() * ys.len()) as f64
}

/// Both sets must be non-empty.
fn biased_mmd(xs: &[DVector<f64>], ys: &[DVector<f64>], gamma: f64) -> f64 {
    mean_kernel(xs, xs, gamma) + mean_kernel(ys, ys, gamma) - 2.0 * mean_kernel(xs, ys, gamma)
}

/// Biased maximum mean discrepancy estimate between two point sets under the RBF kernel.
pub fn mmd(xs: &[DVector<f64>], ys: &[DVector<f64>], gamma: f64) -> Result<f64, StatsError> {
    if xs.is_empty() || ys.is_empty() {
        return Err(StatsError::EmptySample);
    }
    Ok(biased_mmd(xs, ys, gamma))
}

/// MMD between two single points, `2 − 2·k(x, y)`.
pub fn mmd_between(x: &DVector<f64>, y: &DVector<f64>, gamma: f64) -> f64 {
    biased_mmd(std::slice::from_ref(x), std::slice::from_ref(y), gamma)
}

/// Component-wise mean of `vectors`; `None` for an empty set or mixed dimensions.
pub fn mean_vector<'a, I>(vectors: I) -> Option<DVector<f64>>
where
    I: IntoIterator<Item = &'a DVector<f64>>,
{
    let mut iter = vectors.into_iter();
    let first = iter.next()?;
    let mut sum = first.clone();
    let mut count = 1usize;
    for v in iter {
        if v.len() != sum.len() {
            return None;
        }
        sum += v;
        count += 1;
    }
    Some(sum / count as f64)
}
