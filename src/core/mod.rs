//! This module contains the core datatypes derived from the resolved parameters.

pub mod dms;
pub mod epitope;
pub mod phenotype;
pub mod sequence;
mod snapshot;
mod virus;

pub use dms::DmsMatrix;
pub use epitope::EpitopeTiers;
pub use phenotype::{Phenotype, PhenotypeSpace};
pub use snapshot::ParameterSnapshot;
pub use virus::Virus;
