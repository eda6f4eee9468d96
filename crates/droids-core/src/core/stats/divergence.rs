use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Information-divergence functional used by the fluctuation analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DivergenceMeasure {
    /// Generalized Kullback–Leibler (I-)divergence on the raw ensembles.
    #[default]
    Generalized,
    /// Ordinary Kullback–Leibler divergence after normalizing each ensemble to unit mass.
    RelativeEntropy,
    /// Jensen–Shannon distance (natural log).
    JensenShannon,
}

impl fmt::Display for DivergenceMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DivergenceMeasure::Generalized => "generalized",
            DivergenceMeasure::RelativeEntropy => "relative-entropy",
            DivergenceMeasure::JensenShannon => "jensen-shannon",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDivergenceMeasureError(pub String);

impl fmt::Display for ParseDivergenceMeasureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown divergence measure '{}' (expected generalized, relative-entropy or jensen-shannon)",
            self.0
        )
    }
}

impl std::error::Error for ParseDivergenceMeasureError {}

impl FromStr for DivergenceMeasure {
    type Err = ParseDivergenceMeasureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generalized" | "kl" => Ok(DivergenceMeasure::Generalized),
            "relative-entropy" | "entropy" => Ok(DivergenceMeasure::RelativeEntropy),
            "jensen-shannon" | "js" => Ok(DivergenceMeasure::JensenShannon),
            _ => Err(ParseDivergenceMeasureError(s.to_string())),
        }
    }
}

/// Outcome of a divergence evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Divergence {
    pub value: f64,
    /// Set when the functional was undefined and a neutral zero was substituted.
    pub degenerate: bool,
}

impl Divergence {
    fn defined(value: f64) -> Self {
        Self {
            value,
            degenerate: false,
        }
    }

    fn neutral() -> Self {
        Self {
            value: 0.0,
            degenerate: true,
        }
    }
}

/// Divergence of `query` from the `reference` baseline under `measure`.
///
/// Both slices are paired element-wise and must have equal length.
pub fn divergence(measure: DivergenceMeasure, reference: &[f64], query: &[f64]) -> Divergence {
    debug_assert_eq!(reference.len(), query.len());
    match measure {
        DivergenceMeasure::Generalized => Divergence::defined(generalized_kl(reference, query)),
        DivergenceMeasure::RelativeEntropy => relative_entropy(reference, query)
            .map(Divergence::defined)
            .unwrap_or_else(Divergence::neutral),
        DivergenceMeasure::JensenShannon => jensen_shannon(reference, query)
            .map(Divergence::defined)
            .unwrap_or_else(Divergence::neutral),
    }
}

/// Applies the dFLUX sign convention: negative `d_flux` negates, anything else keeps the value.
pub fn signed(value: f64, d_flux: f64) -> f64 {
    if d_flux < 0.0 { -value } else { value }
}

/// `Σ p·ln(p/q) − p + q`, zero exactly when `p == q` element-wise.
pub fn generalized_kl(p: &[f64], q: &[f64]) -> f64 {
    p.iter().zip(q).map(|(&x, &y)| kl_term(x, y)).sum()
}

/// Ordinary KL divergence after normalizing both inputs to unit mass.
///
/// Returns `None` when either input has zero (or non-positive) total mass.
pub fn relative_entropy(p: &[f64], q: &[f64]) -> Option<f64> {
    let p = to_unit_mass(p)?;
    let q = to_unit_mass(q)?;
    Some(p.iter().zip(&q).map(|(&x, &y)| rel_entr(x, y)).sum())
}

/// Jensen–Shannon distance between the unit-mass normalizations of both inputs.
pub fn jensen_shannon(p: &[f64], q: &[f64]) -> Option<f64> {
    let p = to_unit_mass(p)?;
    let q = to_unit_mass(q)?;
    let m: Vec<f64> = p.iter().zip(&q).map(|(&x, &y)| 0.5 * (x + y)).collect();
    let left: f64 = p.iter().zip(&m).map(|(&x, &y)| rel_entr(x, y)).sum();
    let right: f64 = q.iter().zip(&m).map(|(&x, &y)| rel_entr(x, y)).sum();
    Some((0.5 * (left + right)).max(0.0).sqrt())
}

fn to_unit_mass(values: &[f64]) -> Option<Vec<f64>> {
    let total: f64 = values.iter().sum();
    if total > 0.0 && total.is_finite() {
        Some(values.iter().map(|v| v / total).collect())
    } else {
        None
    }
}

fn rel_entr(x: f64, y: f64) -> f64 {
    if x == 0.0 && y >= 0.0 {
        0.0
    } else if x > 0.0 && y > 0.0 {
        x * (x / y).ln()
    } else {
        f64::INFINITY
    }
}

fn kl_term(x: f64, y: f64) -> f64 {
    if x == 0.0 && y >= 0.0 {
        y
    } else if x > 0.0 && y > 0.0 {
        x * (x / y).ln() - x + y
    } else {
        f64::INFINITY
    }
}
