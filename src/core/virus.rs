use crate::config::Parameters;
use crate::core::Phenotype;
use crate::core::sequence::translate_sequence;
use crate::encoding::AminoAcid;

/// A virus lineage as seen by the parameter layer.
///
/// Only the ancestral virus is created here, descendants are created by the simulation from a
/// clone of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Virus {
    phenotype: Phenotype,
    deme: usize,
    birth: f64,
}

impl Virus {
    /// Create the ancestral virus in the deme where the infection starts.
    pub fn ancestral(parameters: &Parameters) -> Self {
        Self {
            phenotype: Phenotype::make_virus_phenotype(parameters),
            deme: parameters.initial_deme.saturating_sub(1),
            birth: 0.,
        }
    }

    pub fn phenotype(&self) -> &Phenotype {
        &self.phenotype
    }

    /// Deme index, 0-based.
    pub fn deme(&self) -> usize {
        self.deme
    }

    /// Day of birth.
    pub fn birth(&self) -> f64 {
        self.birth
    }

    /// Protein of a sequence based virus.
    pub fn protein(&self) -> Option<Vec<AminoAcid>> {
        self.phenotype.sequence().and_then(translate_sequence)
    }
}
