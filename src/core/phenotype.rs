//! Antigenic phenotypes and the space they live in.
//!
//! Cross-immunity between a host and a virus is a function of the distance of their phenotypes.
//! The geometric spaces place phenotypes at points in 2, 3 or 10 dimensions. The sequence based
//! space places them in two dimensions as well, but moves them by mutating the underlying
//! nucleotide sequence.

use serde::{Deserialize, Serialize};

use crate::config::Parameters;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhenotypeSpace {
    #[default]
    #[serde(rename = "geometric")]
    Geometric,
    #[serde(rename = "geometric3d")]
    Geometric3d,
    #[serde(rename = "geometric10d")]
    Geometric10d,
    #[serde(rename = "geometricSeq")]
    GeometricSeq,
}

impl PhenotypeSpace {
    pub fn dimensions(&self) -> usize {
        match self {
            PhenotypeSpace::Geometric | PhenotypeSpace::GeometricSeq => 2,
            PhenotypeSpace::Geometric3d => 3,
            PhenotypeSpace::Geometric10d => 10,
        }
    }

    /// Whether phenotypes are derived from a nucleotide sequence.
    pub fn is_sequence_based(&self) -> bool {
        matches!(self, PhenotypeSpace::GeometricSeq)
    }
}

impl std::fmt::Display for PhenotypeSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            PhenotypeSpace::Geometric => "geometric",
            PhenotypeSpace::Geometric3d => "geometric3d",
            PhenotypeSpace::Geometric10d => "geometric10d",
            PhenotypeSpace::GeometricSeq => "geometricSeq",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Phenotype {
    space: PhenotypeSpace,
    traits: Vec<f64>,
    sequence: Option<String>,
}

impl Phenotype {
    /// Phenotype of the ancestral virus, at the origin of the phenotype space.
    pub fn make_virus_phenotype(parameters: &Parameters) -> Self {
        let space = parameters.phenotype_space;
        let sequence = space
            .is_sequence_based()
            .then(|| parameters.starting_sequence.clone());
        Self {
            space,
            traits: vec![0.; space.dimensions()],
            sequence,
        }
    }

    /// Baseline host immunity, displaced from the origin along the first dimension.
    pub fn make_host_phenotype(parameters: &Parameters) -> Self {
        let space = parameters.phenotype_space;
        let mut traits = vec![0.; space.dimensions()];
        traits[0] = parameters.initial_trait_a;
        Self {
            space,
            traits,
            sequence: None,
        }
    }

    pub fn space(&self) -> PhenotypeSpace {
        self.space
    }

    pub fn traits(&self) -> &[f64] {
        &self.traits
    }

    pub fn sequence(&self) -> Option<&str> {
        self.sequence.as_deref()
    }

    /// Euclidean distance in the phenotype space.
    pub fn distance(&self, other: &Phenotype) -> f64 {
        self.traits
            .iter()
            .zip(other.traits.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    /// Probability that a host carrying this phenotype in its immune history is infected by a
    /// virus with phenotype `other`.
    pub fn risk_of_infection(&self, other: &Phenotype, parameters: &Parameters) -> f64 {
        let risk =
            parameters.smith_conversion * self.distance(other) + parameters.homologous_immunity;
        risk.clamp(0., 1.)
    }
}

impl std::fmt::Display for Phenotype {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let traits: Vec<String> = self.traits.iter().map(|t| format!("{t:.4}")).collect();
        write!(f, "{}", traits.join(","))
    }
}
