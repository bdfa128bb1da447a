use derive_more::Deref;

use crate::config::Parameters;
use crate::core::{Phenotype, Virus};

/// Resolved parameters together with the ancestral virus and host immunity.
///
/// The snapshot is created once after resolution and is only read afterwards. It dereferences to
/// the parameter table.
#[derive(Debug, Clone, PartialEq, Deref)]
pub struct ParameterSnapshot {
    #[deref]
    parameters: Parameters,
    ur_virus: Virus,
    ur_immunity: Phenotype,
}

impl ParameterSnapshot {
    pub fn initialize(parameters: Parameters) -> Self {
        let ur_virus = Virus::ancestral(&parameters);
        let ur_immunity = Phenotype::make_host_phenotype(&parameters);
        log::info!(
            "Initialized ancestral virus [{}] in deme {} and host immunity [{}]",
            ur_virus.phenotype(),
            ur_virus.deme(),
            ur_immunity
        );
        Self {
            parameters,
            ur_virus,
            ur_immunity,
        }
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn ur_virus(&self) -> &Virus {
        &self.ur_virus
    }

    pub fn ur_immunity(&self) -> &Phenotype {
        &self.ur_immunity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_from_defaults() {
        let snapshot = ParameterSnapshot::initialize(Parameters::default());
        assert_eq!(snapshot.beta, 0.36);
        assert_eq!(snapshot.ur_immunity().traits(), &[-6., 0.]);
        assert_eq!(snapshot.ur_virus().deme(), 1);
        assert!((snapshot.get_seasonality(2, 0.) - 0.9).abs() < 1e-12);
    }
}
