//! Resolution of the parameter table from defaults and an overlay.
//!
//! Resolution happens in two stages. The overlay values are applied in canonical order first.
//! Afterwards, all structures that depend on several parameters are derived at once:
//!
//! 1. An overridden starting sequence is validated in the sequence based phenotype space.
//! 2. The epitope sites are checked against the sequence and split into mutation tiers.
//! 3. The DMS matrix is loaded and checked against the sequence.
//!
//! `ParameterResolver::resolve` only returns a table when both stages succeed.
//! `ParameterResolver::resolve_lenient` instead reverts overridden values to their defaults,
//! starting from the key where the error was raised, until the table resolves.

use std::path::Path;

use super::overlay::Overlay;
use super::parameters::Parameters;
use crate::core::dms::DmsMatrix;
use crate::core::epitope::EpitopeTiers;
use crate::core::sequence::validate_sequence;
use crate::errors::{ParameterError, Result};
use crate::readwrite::{DmsIO, write_sites};

pub struct ParameterResolver {
    overlay: Overlay,
    unavailable: Option<ParameterError>,
}

impl ParameterResolver {
    pub fn new(overlay: Overlay) -> Self {
        Self {
            overlay,
            unavailable: None,
        }
    }

    /// Create a resolver for the document at `path`.
    ///
    /// A document that cannot be loaded is recorded and resolves to the defaults.
    pub fn from_file(path: &Path) -> Self {
        match Overlay::read_from_file(path) {
            Ok(overlay) => Self::new(overlay),
            Err(error) => {
                log::warn!("{error}");
                Self {
                    overlay: Overlay::new(),
                    unavailable: Some(error),
                }
            }
        }
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// Resolve the overlay as a whole, any error rejects all of its values.
    pub fn resolve(&self) -> Result<Parameters> {
        if let Some(error) = &self.unavailable {
            return Err(error.clone());
        }
        self.resolve_prefix(self.overlay.len())
    }

    /// Resolve the overlay, falling back to defaults from the first failing key on.
    ///
    /// On error, the failing key is the overridden key, latest in canonical order, that the error
    /// depends on. It is reverted together with all keys after it and resolution is repeated.
    /// Returns the resolved parameters and the first error that occurred.
    pub fn resolve_lenient(&self) -> (Parameters, Option<ParameterError>) {
        if let Some(error) = &self.unavailable {
            log::warn!("Using default parameters");
            return (Parameters::default(), Some(error.clone()));
        }

        let mut first_error = None;
        let mut n = self.overlay.len();
        loop {
            let error = match self.resolve_prefix(n) {
                Ok(parameters) => return (parameters, first_error),
                Err(error) => error,
            };

            let failing = error
                .keys()
                .iter()
                .filter_map(|key| self.overlay.position(key))
                .filter(|&position| position < n)
                .max();
            match failing {
                Some(position) => {
                    log::warn!(
                        "{error}\nUsing defaults for `{}` and {} later parameters",
                        self.overlay.keys().nth(position).unwrap_or_default(),
                        n - position - 1
                    );
                    n = position;
                    first_error.get_or_insert(error);
                }
                None => {
                    log::warn!("{error}\nUsing default parameters");
                    first_error.get_or_insert(error);
                    return (Parameters::default(), first_error);
                }
            }
        }
    }

    fn resolve_prefix(&self, n: usize) -> Result<Parameters> {
        let mut parameters = Parameters::default();
        self.overlay.apply_prefix(n, &mut parameters)?;
        let sequence_overridden = self
            .overlay
            .position("startingSequence")
            .is_some_and(|position| position < n);
        derive(&mut parameters, sequence_overridden)?;
        write_epitope_tiers(&parameters)?;
        Ok(parameters)
    }
}

/// Validate the applied values against each other and compute derived structures.
///
/// The built-in starting sequence is a placeholder and only an overridden one is validated.
fn derive(parameters: &mut Parameters, sequence_overridden: bool) -> Result<()> {
    parameters.starting_sequence = parameters.starting_sequence.to_uppercase();

    if parameters.phenotype_space.is_sequence_based() {
        if sequence_overridden {
            validate_sequence(&parameters.starting_sequence)?;
        }
        let codons = parameters.codons();
        if let Some(&site) = parameters
            .epitope_sites
            .iter()
            .find(|&&site| site == 0 || site > codons)
        {
            return Err(ParameterError::InvalidEpitopeSite { site, codons });
        }
    }

    if !(0.0..=1.0).contains(&parameters.proportion_high_sites) {
        return Err(ParameterError::InvalidProportion(parameters.proportion_high_sites));
    }
    parameters.epitope_tiers = EpitopeTiers::stratify(
        &parameters.epitope_sites,
        parameters.proportion_high_sites,
    );

    parameters.dms = match &parameters.dms_file {
        Some(file) => {
            let matrix = DmsMatrix::read_from_file(&parameters.input_path(file))?;
            matrix.check_sites(parameters.codons())?;
            Some(matrix)
        }
        None => None,
    };

    check_demes(parameters);
    Ok(())
}

/// Warn about per deme values that do not match the number of demes.
fn check_demes(parameters: &Parameters) {
    let lengths = [
        ("demeNames", parameters.deme_names.len()),
        ("initialNs", parameters.initial_ns.len()),
        ("demeBaselines", parameters.deme_baselines.len()),
        ("demeAmplitudes", parameters.deme_amplitudes.len()),
        ("demeOffsets", parameters.deme_offsets.len()),
    ];
    for (key, length) in lengths {
        if length != parameters.deme_count {
            log::warn!(
                "`{key}` has {length} entries, but demeCount is {}",
                parameters.deme_count
            );
        }
    }
    if !(1..=parameters.deme_count).contains(&parameters.initial_deme) {
        log::warn!(
            "initialDeme={} is not a deme between 1 and {}",
            parameters.initial_deme,
            parameters.deme_count
        );
    }
}

fn write_epitope_tiers(parameters: &Parameters) -> Result<()> {
    let tiers = parameters.epitope_tiers();
    let outputs = [
        ("epitopeSitesLow", &parameters.epitope_sites_low, tiers.low()),
        ("epitopeSitesHigh", &parameters.epitope_sites_high, tiers.high()),
    ];
    for (key, file, sites) in outputs {
        if let Some(file) = file {
            let path = parameters.input_path(file);
            write_sites(&path, sites, key)?;
            log::info!("Stored {} epitope sites to {}", sites.len(), path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PhenotypeSpace;
    use crate::encoding::AMINO_ACIDS;
    use serial_test::serial;
    use std::fs;
    use std::path::PathBuf;

    fn input_dir() -> PathBuf {
        let dir = std::env::temp_dir().join("antigen_resolver_tests");
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_input(name: &str, content: &str) {
        fs::write(input_dir().join(name), content).unwrap();
    }

    fn write_dms(name: &str, n_sites: usize) {
        let mut content = format!("site,{}\n", AMINO_ACIDS.map(String::from).join(","));
        for site in 1..=n_sites {
            content.push_str(&format!("{site}{}\n", ",0.05".repeat(AMINO_ACIDS.len())));
        }
        write_input(name, &content);
    }

    fn resolver(document: &str) -> ParameterResolver {
        let document = format!("inputDir: {}\n{document}", input_dir().display());
        ParameterResolver::new(Overlay::read(&mut document.as_bytes()).unwrap())
    }

    #[test]
    fn defaults_resolve() {
        let resolver = ParameterResolver::new(Overlay::new());
        assert_eq!(resolver.resolve().unwrap(), Parameters::default());
        let (parameters, error) = resolver.resolve_lenient();
        assert_eq!(parameters, Parameters::default());
        assert_eq!(error, None);
    }

    #[test]
    #[serial]
    fn overridden_and_absent_keys() {
        let parameters = resolver("beta: 0.5\ndemeCount: 2\ninitialNs: [5, 6]\n")
            .resolve()
            .unwrap();
        assert_eq!(parameters.beta, 0.5);
        assert_eq!(parameters.deme_count, 2);
        assert_eq!(parameters.initial_ns, vec![5, 6]);
        assert_eq!(parameters.nu, 0.2);
        assert_eq!(parameters.end_day, 5000);
    }

    #[test]
    #[serial]
    fn partial_commit_on_type_mismatch() {
        let resolver = resolver("outPrefix: test-\nburnin: 10\nbeta: high\nnu: 0.3\nsdStep: 0.1\n");

        assert!(matches!(
            resolver.resolve(),
            Err(ParameterError::TypeMismatch { ref key, .. }) if key == "beta"
        ));

        let (parameters, error) = resolver.resolve_lenient();
        assert!(matches!(
            error,
            Some(ParameterError::TypeMismatch { ref key, .. }) if key == "beta"
        ));
        assert_eq!(parameters.out_prefix, "test-");
        assert_eq!(parameters.burnin, 10);
        assert_eq!(parameters.beta, 0.36);
        assert_eq!(parameters.nu, 0.2);
        assert_eq!(parameters.sd_step, 0.3);
    }

    #[test]
    #[serial]
    fn sequence_with_terminal_stop() {
        write_input("terminal.fasta", ">wt\natgaaataa\n");
        let parameters = resolver("phenotypeSpace: geometricSeq\nstartingSequence: terminal.fasta\n")
            .resolve()
            .unwrap();
        assert_eq!(parameters.starting_sequence, "ATGAAATAA");
        assert_eq!(parameters.codons(), 3);
    }

    #[test]
    #[serial]
    fn sequence_with_internal_stop() {
        write_input("internal.fasta", ">wt\nATGTAAAAA\n");
        let resolver = resolver(
            "beta: 0.4\nphenotypeSpace: geometricSeq\nstartingSequence: internal.fasta\ntipSamplesPerDeme: 5\n",
        );
        assert_eq!(
            resolver.resolve(),
            Err(ParameterError::PrematureStopCodon { site: 1 })
        );

        let (parameters, error) = resolver.resolve_lenient();
        assert_eq!(error, Some(ParameterError::PrematureStopCodon { site: 1 }));
        assert_eq!(parameters.beta, 0.4);
        assert_eq!(parameters.phenotype_space, PhenotypeSpace::GeometricSeq);
        assert_eq!(parameters.starting_sequence, "AGAGTCTAGTCC");
        assert_eq!(parameters.tip_samples_per_deme, 1000);
    }

    #[test]
    #[serial]
    fn default_sequence_is_not_validated() {
        let resolver = resolver("beta: 0.4\nphenotypeSpace: geometricSeq\n");

        let parameters = resolver.resolve().unwrap();
        assert_eq!(parameters.phenotype_space, PhenotypeSpace::GeometricSeq);
        assert_eq!(parameters.starting_sequence, "AGAGTCTAGTCC");
        assert_eq!(parameters.beta, 0.4);

        let (parameters, error) = resolver.resolve_lenient();
        assert_eq!(error, None);
        assert_eq!(parameters.phenotype_space, PhenotypeSpace::GeometricSeq);
    }

    #[test]
    #[serial]
    fn sequence_is_not_validated_in_geometric_space() {
        write_input("short.fasta", ">wt\nATGA\n");
        let parameters = resolver("startingSequence: short.fasta\n")
            .resolve()
            .unwrap();
        assert_eq!(parameters.starting_sequence, "ATGA");
    }

    #[test]
    #[serial]
    fn invalid_sequence_length() {
        write_input("incomplete.fasta", ">wt\nATGAA\n");
        let resolver = resolver("phenotypeSpace: geometricSeq\nstartingSequence: incomplete.fasta\n");
        assert!(matches!(
            resolver.resolve(),
            Err(ParameterError::InvalidSequence(_))
        ));
    }

    #[test]
    #[serial]
    fn stratify_epitope_sites() {
        write_input("epitope.txt", "10,20,30,40,50\n");
        let parameters = resolver(
            "epitopeSites: epitope.txt\nproportionHighSites: 0.4\nepitopeSitesLow: low.txt\nepitopeSitesHigh: high.txt\n",
        )
        .resolve()
        .unwrap();
        assert_eq!(parameters.epitope_tiers().high(), &[10, 20]);
        assert_eq!(parameters.epitope_tiers().low(), &[30, 40, 50]);
        assert_eq!(
            fs::read_to_string(input_dir().join("high.txt")).unwrap(),
            "10,20\n"
        );
        assert_eq!(
            fs::read_to_string(input_dir().join("low.txt")).unwrap(),
            "30,40,50\n"
        );
    }

    #[test]
    #[serial]
    fn stratification_does_not_depend_on_document_order() {
        let parameters = resolver("proportionHighSites: 0.5\nepitopeSites: [3, 1, 2, 4]\n")
            .resolve()
            .unwrap();
        assert_eq!(parameters.epitope_tiers().high(), &[3, 1]);
        assert_eq!(parameters.epitope_tiers().low(), &[2, 4]);
    }

    #[test]
    #[serial]
    fn reject_invalid_proportion() {
        let resolver = resolver("epitopeSites: [1, 2]\nproportionHighSites: 1.5\n");
        assert_eq!(
            resolver.resolve(),
            Err(ParameterError::InvalidProportion(1.5))
        );
        let (parameters, _) = resolver.resolve_lenient();
        assert_eq!(parameters.epitope_sites, vec![1, 2]);
        assert_eq!(parameters.epitope_tiers().low(), &[1, 2]);
    }

    #[test]
    #[serial]
    fn reject_sites_outside_sequence() {
        write_input("three.fasta", ">wt\nATGAAATAA\n");
        let resolver = resolver(
            "phenotypeSpace: geometricSeq\nstartingSequence: three.fasta\nepitopeSites: [1, 4]\n",
        );
        assert_eq!(
            resolver.resolve(),
            Err(ParameterError::InvalidEpitopeSite { site: 4, codons: 3 })
        );
        let (parameters, _) = resolver.resolve_lenient();
        assert_eq!(parameters.starting_sequence, "ATGAAATAA");
        assert!(parameters.epitope_sites.is_empty());
    }

    #[test]
    #[serial]
    fn dms_rows_match_codons() {
        write_input("four.fasta", ">wt\nATGAAACCCTAA\n");
        write_dms("dms4.csv", 4);
        let parameters = resolver("startingSequence: four.fasta\nDMSFile: dms4.csv\n")
            .resolve()
            .unwrap();
        assert_eq!(parameters.dms().map(|dms| dms.n_sites()), Some(4));
    }

    #[test]
    #[serial]
    fn dms_rows_mismatch_codons() {
        write_input("four.fasta", ">wt\nATGAAACCCTAA\n");
        for n_sites in [3, 5] {
            let name = format!("dms{n_sites}.csv");
            write_dms(&name, n_sites);
            let resolver = resolver(&format!(
                "beta: 0.3\nstartingSequence: four.fasta\nDMSFile: {name}\nepitopeSitesLow: unused.txt\ntipSamplingRate: 0.1\n"
            ));
            assert!(matches!(
                resolver.resolve(),
                Err(ParameterError::DmsRowCountMismatch { expected: 4, actual, .. }) if actual == n_sites
            ));

            let (parameters, error) = resolver.resolve_lenient();
            assert!(matches!(
                error,
                Some(ParameterError::DmsRowCountMismatch { .. })
            ));
            assert_eq!(parameters.beta, 0.3);
            assert_eq!(parameters.starting_sequence, "ATGAAACCCTAA");
            assert_eq!(parameters.dms_file, None);
            assert_eq!(parameters.epitope_sites_low, None);
            assert_eq!(parameters.tip_sampling_rate, 0.0002);
        }
    }

    #[test]
    fn missing_document_resolves_to_defaults() {
        let path = std::env::temp_dir().join("antigen_resolver_missing.yml");
        let resolver = ParameterResolver::from_file(&path);
        assert!(matches!(
            resolver.resolve(),
            Err(ParameterError::ConfigUnavailable(_))
        ));
        let (parameters, error) = resolver.resolve_lenient();
        assert_eq!(parameters, Parameters::default());
        assert!(matches!(error, Some(ParameterError::ConfigUnavailable(_))));
    }

    #[test]
    #[serial]
    fn document_from_file() {
        let path = input_dir().join("parameters.yml");
        fs::write(&path, "endDay: 100\ndeltaT: 0.5\n").unwrap();
        let parameters = ParameterResolver::from_file(&path).resolve().unwrap();
        assert_eq!(parameters.end_day, 100);
        assert_eq!(parameters.delta_t, 0.5);
    }
}
