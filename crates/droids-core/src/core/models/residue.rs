use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResidueType {
    // --- Aliphatic, Nonpolar ---
    Alanine,    // ALA
    Glycine,    // GLY
    Isoleucine, // ILE
    Leucine,    // LEU
    Proline,    // PRO
    Valine,     // VAL

    // --- Aromatic ---
    Phenylalanine, // PHE
    Tryptophan,    // TRP
    Tyrosine,      // TYR

    // --- Polar, Uncharged ---
    Asparagine, // ASN
    Cysteine,   // CYS
    Glutamine,  // GLN
    Serine,     // SER
    Threonine,  // THR
    Methionine, // MET

    // --- Positively Charged (Basic) ---
    Arginine, // ARG
    Lysine,   // LYS

    // --- Negatively Charged (Acidic) ---
    AsparticAcid, // ASP
    GlutamicAcid, // GLU

    // --- Histidine and its protonation variants ---
    Histidine,           // HIS
    HistidineEpsilon,    // HIE
    HistidineDelta,      // HID
    HistidineProtonated, // HIP
}

static RESIDUE_CODES: Map<&'static str, ResidueType> = phf_map! {
    "ALA" => ResidueType::Alanine,
    "ARG" => ResidueType::Arginine,
    "ASN" => ResidueType::Asparagine,
    "ASP" => ResidueType::AsparticAcid,
    "CYS" => ResidueType::Cysteine,
    "GLU" => ResidueType::GlutamicAcid,
    "GLN" => ResidueType::Glutamine,
    "GLY" => ResidueType::Glycine,
    "HIS" => ResidueType::Histidine,
    "HIE" => ResidueType::HistidineEpsilon,
    "HID" => ResidueType::HistidineDelta,
    "HIP" => ResidueType::HistidineProtonated,
    "ILE" => ResidueType::Isoleucine,
    "LEU" => ResidueType::Leucine,
    "LYS" => ResidueType::Lysine,
    "MET" => ResidueType::Methionine,
    "PHE" => ResidueType::Phenylalanine,
    "PRO" => ResidueType::Proline,
    "SER" => ResidueType::Serine,
    "THR" => ResidueType::Threonine,
    "TRP" => ResidueType::Tryptophan,
    "TYR" => ResidueType::Tyrosine,
    "VAL" => ResidueType::Valine,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unrecognized residue code: '{0}'")]
pub struct ParseResidueTypeError(pub String);

impl ResidueType {
    pub fn code(&self) -> &'static str {
        match self {
            ResidueType::Alanine => "ALA",
            ResidueType::Arginine => "ARG",
            ResidueType::Asparagine => "ASN",
            ResidueType::AsparticAcid => "ASP",
            ResidueType::Cysteine => "CYS",
            ResidueType::GlutamicAcid => "GLU",
            ResidueType::Glutamine => "GLN",
            ResidueType::Glycine => "GLY",
            ResidueType::Histidine => "HIS",
            ResidueType::HistidineEpsilon => "HIE",
            ResidueType::HistidineDelta => "HID",
            ResidueType::HistidineProtonated => "HIP",
            ResidueType::Isoleucine => "ILE",
            ResidueType::Leucine => "LEU",
            ResidueType::Lysine => "LYS",
            ResidueType::Methionine => "MET",
            ResidueType::Phenylalanine => "PHE",
            ResidueType::Proline => "PRO",
            ResidueType::Serine => "SER",
            ResidueType::Threonine => "THR",
            ResidueType::Tryptophan => "TRP",
            ResidueType::Tyrosine => "TYR",
            ResidueType::Valine => "VAL",
        }
    }

    /// Returns `true` for the histidine family (HIS and its protonation variants).
    pub fn is_histidine(&self) -> bool {
        matches!(
            self,
            ResidueType::Histidine
                | ResidueType::HistidineEpsilon
                | ResidueType::HistidineDelta
                | ResidueType::HistidineProtonated
        )
    }

    pub fn is_recognized_code(code: &str) -> bool {
        RESIDUE_CODES.contains_key(code)
    }
}

impl FromStr for ResidueType {
    type Err = ParseResidueTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RESIDUE_CODES
            .get(s.trim())
            .copied()
            .ok_or_else(|| ParseResidueTypeError(s.to_string()))
    }
}

impl fmt::Display for ResidueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
