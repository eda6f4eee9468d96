use super::residue::ResidueType;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignificanceLabel {
    Significant,
    NotSignificant,
    /// Sentinel for a site whose statistics could not be computed.
    Error,
}

impl SignificanceLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignificanceLabel::Significant => "sig",
            SignificanceLabel::NotSignificant => "ns",
            SignificanceLabel::Error => "error",
        }
    }

    pub fn is_significant(&self) -> bool {
        matches!(self, SignificanceLabel::Significant)
    }
}

impl fmt::Display for SignificanceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Site-wise result of the fluctuation divergence analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidueRecord {
    pub position: usize,
    pub residue: Option<ResidueType>,
    pub d_flux: f64,
    pub signed_divergence: f64,
    pub d_statistic: f64,
    pub p_value: f64,
    pub label: SignificanceLabel,
    pub ref_flux: f64,
    pub query_flux: f64,
    /// Set when a neutral zero was substituted for an undefined divergence.
    pub degenerate: bool,
}

impl ResidueRecord {
    pub fn error(position: usize, residue: Option<ResidueType>) -> Self {
        Self {
            position,
            residue,
            d_flux: f64::NAN,
            signed_divergence: f64::NAN,
            d_statistic: f64::NAN,
            p_value: f64::NAN,
            label: SignificanceLabel::Error,
            ref_flux: f64::NAN,
            query_flux: f64::NAN,
            degenerate: false,
        }
    }

    pub fn is_error(&self) -> bool {
        self.label == SignificanceLabel::Error
    }
}

/// Site-wise result of the feature discrepancy analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscrepancyRecord {
    pub position: usize,
    pub residue: Option<ResidueType>,
    pub mmd: f64,
    pub empirical_p: f64,
    pub label: SignificanceLabel,
}

impl DiscrepancyRecord {
    pub fn error(position: usize, residue: Option<ResidueType>) -> Self {
        Self {
            position,
            residue,
            mmd: f64::NAN,
            empirical_p: f64::NAN,
            label: SignificanceLabel::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.label == SignificanceLabel::Error
    }
}
