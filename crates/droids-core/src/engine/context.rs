use super::config::AnalysisConfig;
use super::layout::{InputLayout, OutputLayout};
use super::progress::ProgressReporter;
use crate::core::io::resinfo::ResidueInfo;
use crate::core::models::residue::ResidueType;

/// Shared, read-only inputs of every analysis task.
#[derive(Clone, Copy)]
pub struct AnalysisContext<'a> {
    pub config: &'a AnalysisConfig,
    pub reporter: &'a ProgressReporter<'a>,
    pub residues: &'a ResidueInfo,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(
        config: &'a AnalysisConfig,
        reporter: &'a ProgressReporter<'a>,
        residues: &'a ResidueInfo,
    ) -> Self {
        Self {
            config,
            reporter,
            residues,
        }
    }

    pub fn inputs(&self) -> InputLayout<'a> {
        InputLayout::new(&self.config.inputs)
    }

    pub fn outputs(&self) -> OutputLayout<'a> {
        OutputLayout::new(self.config)
    }

    pub fn protein_length(&self) -> usize {
        self.config.protein_length
    }

    /// Residue type at 1-based `position`, if annotated.
    pub fn residue_at(&self, position: usize) -> Option<ResidueType> {
        self.residues.residue_at(position)
    }
}
