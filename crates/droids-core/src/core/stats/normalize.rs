use itertools::{Itertools, MinMaxResult};

/// Min-max normalizes `values` to `[0, 1]`.
///
/// Returns the normalized values and a degeneracy flag. A constant column (max == min) has
/// no defined scale; it normalizes to all zeros and the flag is set.
pub fn min_max(values: &[f64]) -> (Vec<f64>, bool) {
    let (min, max) = match values.iter().copied().minmax() {
        MinMaxResult::NoElements => return (Vec::new(), false),
        MinMaxResult::OneElement(v) => (v, v),
        MinMaxResult::MinMax(min, max) => (min, max),
    };

    let range = max - min;
    if range == 0.0 || !range.is_finite() {
        return (vec![0.0; values.len()], true);
    }

    (values.iter().map(|&x| (x - min) / range).collect(), false)
}
