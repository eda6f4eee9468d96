use super::error::TableError;
use super::format::repr_f64;
use super::traits::TableSink;
use crate::core::models::records::{DiscrepancyRecord, ResidueRecord};
use std::fmt;
use std::io::Write;
use std::path::PathBuf;

/// Directory (relative to the run output root) holding viewer inputs.
pub const VIS_DIR: &str = "ChimeraXvis";

/// Per-residue attributes exported to the structure viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeName {
    /// Signed divergence at every site.
    Kl,
    /// Signed divergence where significant, else zero.
    KlSig,
    /// Maximum mean discrepancy where significant, else zero.
    MmdSig,
}

impl AttributeName {
    pub const ALL: [AttributeName; 3] = [AttributeName::Kl, AttributeName::KlSig, AttributeName::MmdSig];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeName::Kl => "KL",
            AttributeName::KlSig => "KLsig",
            AttributeName::MmdSig => "MMDsig",
        }
    }

    pub fn palette(&self) -> &'static str {
        match self {
            AttributeName::Kl | AttributeName::KlSig => "bluered",
            AttributeName::MmdSig => "Greens-5",
        }
    }

    /// `ChimeraXvis/attribute<Name>.dat`
    pub fn attribute_path(&self) -> PathBuf {
        PathBuf::from(VIS_DIR).join(format!("attribute{}.dat", self.as_str()))
    }

    /// `ChimeraXvis_<Name>.ctl`
    pub fn control_path(&self) -> PathBuf {
        PathBuf::from(format!("{}_{}.ctl", VIS_DIR, self.as_str()))
    }

    /// Viewer script that maps this attribute onto the structure.
    pub fn script_name(&self) -> String {
        format!("color_by_attr_chimerax_{}.py", self.as_str())
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Site values of one residue attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: AttributeName,
    pub values: Vec<(usize, f64)>,
}

impl Attribute {
    pub fn divergence(records: &[ResidueRecord]) -> Self {
        Self {
            name: AttributeName::Kl,
            values: records
                .iter()
                .map(|r| (r.position, nan_as_zero(r.signed_divergence)))
                .collect(),
        }
    }

    pub fn significant_divergence(records: &[ResidueRecord]) -> Self {
        Self {
            name: AttributeName::KlSig,
            values: records
                .iter()
                .map(|r| {
                    let value = if r.label.is_significant() {
                        nan_as_zero(r.signed_divergence)
                    } else {
                        0.0
                    };
                    (r.position, value)
                })
                .collect(),
        }
    }

    pub fn significant_discrepancy(records: &[DiscrepancyRecord]) -> Self {
        Self {
            name: AttributeName::MmdSig,
            values: records
                .iter()
                .map(|r| {
                    let value = if r.label.is_significant() { r.mmd } else { 0.0 };
                    (r.position, value)
                })
                .collect(),
        }
    }
}

// Error sites carry NaN; the viewer gets a neutral value instead.
fn nan_as_zero(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value }
}

pub struct AttributeFile;

impl TableSink for AttributeFile {
    type Value = Attribute;
    type Error = TableError;

    fn write_to(value: &Self::Value, writer: &mut impl Write) -> Result<(), Self::Error> {
        writeln!(writer, "recipient: residues\nattribute: {}\n", value.name)?;
        for (position, v) in &value.values {
            writeln!(writer, "\t:{}\t{}", position, repr_f64(*v))?;
        }
        Ok(())
    }
}

/// Rendering options written into every viewer control file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerStyle {
    pub lighting: String,
    pub transparency: u8,
    pub background: String,
}

impl Default for ViewerStyle {
    fn default() -> Self {
        Self {
            lighting: "simple".to_string(),
            transparency: 50,
            background: "gray".to_string(),
        }
    }
}

/// Content of a `ChimeraXvis_<Name>.ctl` control file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerControl {
    pub attribute: AttributeName,
    pub length: usize,
    pub style: ViewerStyle,
}

pub struct ControlFile;

impl TableSink for ControlFile {
    type Value = ViewerControl;
    type Error = TableError;

    fn write_to(value: &Self::Value, writer: &mut impl Write) -> Result<(), Self::Error> {
        let name = value.attribute.as_str();
        writeln!(writer, "model\t#1")?;
        writeln!(writer, "structure\t{}/query.pdb", VIS_DIR)?;
        writeln!(writer, "structureADD\t{}/reference.pdb", VIS_DIR)?;
        writeln!(writer, "attr_file\t{}/attribute{}.dat", VIS_DIR, name)?;
        writeln!(writer, "length\t{}", value.length)?;
        writeln!(writer, "attr\t{}", name)?;
        writeln!(writer, "palette\t{}", value.attribute.palette())?;
        writeln!(writer, "lighting\t{}", value.style.lighting)?;
        writeln!(writer, "transparency\t{}", value.style.transparency)?;
        writeln!(writer, "background\t{}", value.style.background)?;
        Ok(())
    }
}
