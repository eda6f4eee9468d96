use super::StatsError;

/// Largest `n1 * n2` for which the exact null distribution is enumerated.
pub const EXACT_LIMIT: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KsOutcome {
    /// Supremum distance between the two empirical distribution functions.
    pub statistic: f64,
    /// Two-sided p-value.
    pub p_value: f64,
}

/// Two-sided two-sample Kolmogorov–Smirnov test.
///
/// Small samples (`n1 * n2 <= EXACT_LIMIT`) use the exact permutation distribution of the
/// statistic; larger ones use the asymptotic Kolmogorov distribution with Stephens'
/// small-sample correction.
pub fn two_sample(a: &[f64], b: &[f64]) -> Result<KsOutcome, StatsError> {
    if a.is_empty() || b.is_empty() {
        return Err(StatsError::EmptySample);
    }
    let a = sorted_finite(a)?;
    let b = sorted_finite(b)?;
    let (n1, n2) = (a.len(), b.len());

    let h = scaled_statistic(&a, &b);
    let statistic = h as f64 / (n1 * n2) as f64;

    let p_value = if h == 0 {
        1.0
    } else if n1 * n2 <= EXACT_LIMIT {
        exact_p_value(n1, n2, h)
    } else {
        let en = ((n1 * n2) as f64 / (n1 + n2) as f64).sqrt();
        kolmogorov_survival((en + 0.12 + 0.11 / en) * statistic)
    };

    Ok(KsOutcome { statistic, p_value })
}

fn sorted_finite(values: &[f64]) -> Result<Vec<f64>, StatsError> {
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(StatsError::NonFinite { index });
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(sorted)
}

/// `max |F1·n1·n2 − F2·n1·n2|` over the pooled sample, kept integral to avoid ties
/// between rounding and lattice boundaries.
fn scaled_statistic(a: &[f64], b: &[f64]) -> usize {
    let (n1, n2) = (a.len(), b.len());
    let (mut i, mut j, mut h) = (0, 0, 0);
    while i < n1 && j < n2 {
        let v = a[i].min(b[j]);
        while i < n1 && a[i] <= v {
            i += 1;
        }
        while j < n2 && b[j] <= v {
            j += 1;
        }
        h = h.max((i * n2).abs_diff(j * n1));
    }
    h
}

/// `P(H >= h)` under the null, by counting monotone lattice paths from (0,0) to (n1,n2)
/// that stay strictly inside `|i·n2 − j·n1| < h`.
fn exact_p_value(n1: usize, n2: usize, h: usize) -> f64 {
    let mut row = vec![0.0f64; n2 + 1];
    for i in 0..=n1 {
        for j in 0..=n2 {
            if (i * n2).abs_diff(j * n1) >= h {
                row[j] = 0.0;
            } else if i == 0 && j == 0 {
                row[j] = 1.0;
            } else {
                let left = if j > 0 { row[j - 1] } else { 0.0 };
                row[j] += left;
            }
        }
    }
    let inside = row[n2];
    (1.0 - inside / binomial(n1 + n2, n1)).clamp(0.0, 1.0)
}

fn binomial(n: usize, k: usize) -> f64 {
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

/// Survival function of the Kolmogorov distribution, `Q(λ) = 2 Σ (−1)^{j−1} e^{−2j²λ²}`.
fn kolmogorov_survival(lambda: f64) -> f64 {
    let a2 = -2.0 * lambda * lambda;
    let mut sign = 2.0;
    let mut sum = 0.0;
    let mut previous = 0.0f64;
    for j in 1..=100u32 {
        let term = sign * (a2 * f64::from(j * j)).exp();
        sum += term;
        if term.abs() <= 0.001 * previous || term.abs() <= 1.0e-8 * sum {
            return sum.clamp(0.0, 1.0);
        }
        sign = -sign;
        previous = term.abs();
    }
    // The series did not converge, which only happens for λ near zero.
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_samples_have_zero_statistic_and_unit_p() {
        let sample = [0.3, 0.1, 0.7];
        let outcome = two_sample(&sample, &sample).unwrap();
        assert_eq!(outcome.statistic, 0.0);
        assert_eq!(outcome.p_value, 1.0);
    }

    #[test]
    fn fully_separated_triplets_give_exact_p_of_one_tenth() {
        let outcome = two_sample(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
        assert_eq!(outcome.statistic, 1.0);
        assert!((outcome.p_value - 0.1).abs() < 1e-12);
    }

    #[test]
    fn interleaved_samples_have_partial_statistic() {
        let outcome = two_sample(&[1.0, 3.0, 5.0], &[2.0, 4.0, 6.0]).unwrap();
        assert!((outcome.statistic - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(outcome.p_value, 1.0);
    }

    #[test]
    fn ties_across_samples_are_stepped_together() {
        let outcome = two_sample(&[1.0, 2.0], &[1.0, 2.0, 2.0, 1.0]).unwrap();
        assert_eq!(outcome.statistic, 0.0);
    }

    #[test]
    fn large_samples_use_asymptotic_distribution() {
        let a: Vec<f64> = (0..200).map(|i| i as f64).collect();
        let b: Vec<f64> = (0..200).map(|i| i as f64 + 100.0).collect();
        let outcome = two_sample(&a, &b).unwrap();
        assert!((outcome.statistic - 0.5).abs() < 1e-12);
        assert!(outcome.p_value < 1e-10);
    }

    #[test]
    fn p_value_is_monotone_in_separation() {
        let base = [1.0, 2.0, 3.0, 4.0, 5.0];
        let near = two_sample(&base, &[1.5, 2.5, 3.5, 4.5, 5.5]).unwrap();
        let far = two_sample(&base, &[4.5, 5.5, 6.5, 7.5, 8.5]).unwrap();
        assert!(far.p_value < near.p_value);
    }

    #[test]
    fn empty_and_non_finite_samples_are_rejected() {
        assert_eq!(two_sample(&[], &[1.0]), Err(StatsError::EmptySample));
        assert_eq!(
            two_sample(&[1.0, f64::NAN], &[1.0]),
            Err(StatsError::NonFinite { index: 1 })
        );
    }

    #[test]
    fn kolmogorov_survival_matches_reference_points() {
        assert!((kolmogorov_survival(1.0) - 0.2699996716735).abs() < 1e-6);
        assert_eq!(kolmogorov_survival(0.0), 1.0);
    }
}
