use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::f64::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::PhenotypeSpace;
use crate::core::dms::DmsMatrix;
use crate::core::epitope::EpitopeTiers;
use crate::errors::{ParameterError, Result};

/// Keys of all recognized parameters in canonical order.
///
/// Overlays are applied in this order, which groups the parameters by domain.
pub const PARAMETER_KEYS: [&str; 61] = [
    // input and output
    "inputDir",
    "outPath",
    "outPrefix",
    "reducedOutput",
    "detailedOutput",
    "immunityReconstruction",
    "pcaSamples",
    "memoryProfiling",
    // simulation
    "burnin",
    "endDay",
    "deltaT",
    "printStep",
    "repeatSim",
    "restartFromCheckpoint",
    "yearsFromMK",
    // metapopulation
    "demeCount",
    "demeNames",
    "initialNs",
    // demography
    "birthRate",
    "deathRate",
    "swapDemography",
    // epidemiology
    "initialI",
    "initialDeme",
    "initialPrR",
    "beta",
    "nu",
    "betweenDemePro",
    // transcendental immunity
    "transcendental",
    "immunityLoss",
    "initialPrT",
    // seasonality
    "demeBaselines",
    "demeAmplitudes",
    "demeOffsets",
    // phenotype
    "phenotypeSpace",
    "muPhenotype",
    "waning",
    "waningRate",
    "smithConversion",
    "homologousImmunity",
    "initialTraitA",
    "meanStep",
    "sdStep",
    "mut2D",
    "fixedStep",
    // genetics and epitopes
    "startingSequence",
    "epitopeSites",
    "proportionHighSites",
    "meanStepEpitope",
    "sdStepEpitope",
    "meanStepEpitopeHigh",
    "sdStepEpitopeHigh",
    "transitionTransversionRatio",
    "DMSFile",
    "epitopeSitesLow",
    "epitopeSitesHigh",
    // sampling
    "tipSamplingRate",
    "tipSamplesPerDeme",
    "tipSamplingProportional",
    "treeProportion",
    "diversitySamplingCount",
    "netauWindow",
];

/// The full parameter table of a simulation run.
///
/// `Parameters::default()` is the table of built-in defaults. Resolved tables additionally carry
/// the structures derived from their values, see `ParameterResolver`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Parameters {
    /// Directory that side files referenced by the overlay are relative to.
    pub input_dir: String,
    /// Directory of all output files.
    pub out_path: String,
    /// Prefix of all output files.
    pub out_prefix: String,
    /// Only write the summary and the timeseries.
    pub reduced_output: bool,
    /// Write hosts and viruses, which allows restarting from a checkpoint.
    pub detailed_output: bool,
    pub immunity_reconstruction: bool,
    /// Rotate and flip the virus tree for output.
    pub pca_samples: bool,
    pub memory_profiling: bool,

    /// Days at the start of the simulation that are excluded from the reported date.
    pub burnin: usize,
    /// Number of days to simulate.
    pub end_day: usize,
    /// Number of days to move forward in a single timestep.
    pub delta_t: f64,
    /// Number of days between timeseries records.
    pub print_step: usize,
    /// Repeat the simulation until `end_day` is reached.
    pub repeat_sim: bool,
    pub restart_from_checkpoint: bool,
    #[serde(rename = "yearsFromMK")]
    pub years_from_mk: f64,

    pub deme_count: usize,
    pub deme_names: Vec<String>,
    /// Initial population size per deme.
    pub initial_ns: Vec<usize>,

    /// Births per individual per day.
    pub birth_rate: f64,
    /// Deaths per individual per day.
    pub death_rate: f64,
    /// Keep the overall population size constant.
    pub swap_demography: bool,

    /// Number of initially infected individuals.
    pub initial_i: usize,
    /// Deme where the infection starts, 1-based.
    pub initial_deme: usize,
    /// Initial proportion of recovered individuals.
    pub initial_pr_r: f64,
    /// Contacts per individual per day.
    pub beta: f64,
    /// Recoveries per individual per day.
    pub nu: f64,
    /// Between deme contacts relative to within deme contacts.
    pub between_deme_pro: f64,

    /// Include a general recovered class.
    pub transcendental: bool,
    /// Rate of loss of general immunity per individual per day.
    pub immunity_loss: f64,
    /// Initial proportion of the general recovered class.
    pub initial_pr_t: f64,

    pub deme_baselines: Vec<f64>,
    pub deme_amplitudes: Vec<f64>,
    /// Phase of the seasonal cycle per deme, as a fraction of a year.
    pub deme_offsets: Vec<f64>,

    pub phenotype_space: PhenotypeSpace,
    /// Mutations per individual per day.
    pub mu_phenotype: f64,
    /// Hosts lose random phenotypes from their immune history.
    pub waning: bool,
    pub waning_rate: f64,
    /// Multiplier of antigenic distance to give cross-immunity.
    pub smith_conversion: f64,
    /// Risk of infection by an antigenically identical virus.
    pub homologous_immunity: f64,
    /// First coordinate of the initial host immunity.
    pub initial_trait_a: f64,
    /// Mean mutation size at non-epitope sites.
    pub mean_step: f64,
    /// Standard deviation of the mutation size at non-epitope sites.
    pub sd_step: f64,
    /// Mutate in a full 360 degree arc.
    #[serde(rename = "mut2D")]
    pub mut_2d: bool,
    pub fixed_step: bool,

    /// Nucleotide sequence of the ancestral virus.
    pub starting_sequence: String,
    /// Codon positions of the epitope, 1-based.
    pub epitope_sites: Vec<usize>,
    /// Proportion of epitope sites in the high tier.
    pub proportion_high_sites: f64,
    /// Mean mutation size at low tier epitope sites.
    pub mean_step_epitope: f64,
    pub sd_step_epitope: f64,
    /// Mean mutation size at high tier epitope sites.
    pub mean_step_epitope_high: f64,
    pub sd_step_epitope_high: f64,
    /// Transition/transversion rate ratio.
    pub transition_transversion_ratio: f64,
    /// Amino acid preferences per site (csv file).
    #[serde(rename = "DMSFile")]
    pub dms_file: Option<String>,
    /// Store the low tier epitope sites to this file.
    pub epitope_sites_low: Option<String>,
    /// Store the high tier epitope sites to this file.
    pub epitope_sites_high: Option<String>,

    /// Samples per deme per day.
    pub tip_sampling_rate: f64,
    pub tip_samples_per_deme: usize,
    /// Sample proportional to prevalence.
    pub tip_sampling_proportional: bool,
    /// Proportion of tips used in tree reconstruction.
    pub tree_proportion: f64,
    /// Number of samples for diversity, Ne*tau and serial interval.
    pub diversity_sampling_count: usize,
    /// Window in days to compute Ne*tau.
    pub netau_window: usize,

    #[serde(skip)]
    pub(crate) epitope_tiers: EpitopeTiers,
    #[serde(skip)]
    pub(crate) dms: Option<DmsMatrix>,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            input_dir: "input/".to_string(),
            out_path: "output/".to_string(),
            out_prefix: "run-".to_string(),
            reduced_output: false,
            detailed_output: false,
            immunity_reconstruction: false,
            pca_samples: false,
            memory_profiling: false,

            burnin: 0,
            end_day: 5000,
            delta_t: 0.1,
            print_step: 10,
            repeat_sim: true,
            restart_from_checkpoint: false,
            years_from_mk: 1.0,

            deme_count: 3,
            deme_names: vec!["north".into(), "tropics".into(), "south".into()],
            initial_ns: vec![1_000_000, 1_000_000, 1_000_000],

            // 1/30 years
            birth_rate: 0.000091,
            death_rate: 0.000091,
            swap_demography: true,

            initial_i: 10,
            initial_deme: 2,
            initial_pr_r: 0.5,
            beta: 0.36,
            nu: 0.2,
            between_deme_pro: 0.0005,

            transcendental: false,
            immunity_loss: 0.01,
            initial_pr_t: 0.1,

            deme_baselines: vec![1., 1., 1.],
            deme_amplitudes: vec![0.1, 0., 0.1],
            deme_offsets: vec![0., 0., 0.5],

            phenotype_space: PhenotypeSpace::Geometric,
            mu_phenotype: 0.005,
            waning: false,
            waning_rate: 0.01,
            smith_conversion: 0.1,
            homologous_immunity: 0.05,
            initial_trait_a: -6.,
            mean_step: 0.3,
            sd_step: 0.3,
            mut_2d: false,
            fixed_step: false,

            starting_sequence: "AGAGTCTAGTCC".to_string(),
            epitope_sites: Vec::new(),
            proportion_high_sites: 0.,
            mean_step_epitope: 0.3,
            sd_step_epitope: 0.3,
            mean_step_epitope_high: 0.3,
            sd_step_epitope_high: 0.3,
            transition_transversion_ratio: 5.0,
            dms_file: None,
            epitope_sites_low: None,
            epitope_sites_high: None,

            tip_sampling_rate: 0.0002,
            tip_samples_per_deme: 1000,
            tip_sampling_proportional: true,
            tree_proportion: 0.1,
            diversity_sampling_count: 1000,
            netau_window: 100,

            epitope_tiers: EpitopeTiers::default(),
            dms: None,
        }
    }
}

impl std::fmt::Display for Parameters {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut output = vec![];
        self.write(&mut output).map_err(|_| std::fmt::Error)?;
        write!(formatter, "{}", String::from_utf8_lossy(&output))
    }
}

impl Parameters {
    /// Date in years since the end of the burnin.
    pub fn get_date(&self, day: f64) -> f64 {
        (day - self.burnin as f64) / 365.0
    }

    pub fn day_is_integer(day: f64) -> bool {
        day.ceil() - day.floor() == 0.
    }

    /// Seasonal multiplier of transmission in deme `index` on `day`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below the length of `demeBaselines`, `demeAmplitudes` and
    /// `demeOffsets`. Resolution only warns when these lengths differ from `demeCount`.
    pub fn get_seasonality(&self, index: usize, day: f64) -> f64 {
        let baseline = self.deme_baselines[index];
        let amplitude = self.deme_amplitudes[index];
        let offset = self.deme_offsets[index];
        baseline + amplitude * (2. * PI * self.get_date(day) + 2. * PI * offset).cos()
    }

    /// Number of codons in the starting sequence.
    pub fn codons(&self) -> usize {
        self.starting_sequence.len() / 3
    }

    pub fn epitope_tiers(&self) -> &EpitopeTiers {
        &self.epitope_tiers
    }

    pub fn dms(&self) -> Option<&DmsMatrix> {
        self.dms.as_ref()
    }

    /// Location of a side file within the input directory.
    pub fn input_path(&self, file: &str) -> PathBuf {
        Path::new(&self.input_dir).join(file)
    }

    pub(crate) fn to_mapping(&self) -> Result<Mapping> {
        match serde_yaml::to_value(self) {
            Ok(Value::Mapping(mapping)) => Ok(mapping),
            Ok(_) => Err(ParameterError::ConfigUnavailable(
                "parameters do not serialize to a mapping".to_string(),
            )),
            Err(error) => Err(ParameterError::ConfigUnavailable(format!(
                "unable to serialize parameters: {error}"
            ))),
        }
    }

    /// Rebuild a table from a mapping in which `key` was the last value to change.
    pub(crate) fn from_mapping(mapping: &Mapping, key: &str) -> Result<Parameters> {
        serde_yaml::from_value(Value::Mapping(mapping.clone())).map_err(|error| {
            ParameterError::TypeMismatch {
                key: key.to_string(),
                message: error.to_string(),
            }
        })
    }

    pub fn write(&self, writer: &mut dyn std::io::Write) -> Result<()> {
        serde_yaml::to_writer(writer, self).map_err(|error| ParameterError::FileWriteError {
            key: "parameters".to_string(),
            path: String::new(),
            message: error.to_string(),
        })
    }

    /// Read a complete table, missing keys take their default value.
    ///
    /// No side files are read and nothing is derived, use `ParameterResolver` to resolve an
    /// overlay.
    pub fn read(reader: &mut dyn std::io::Read) -> Result<Parameters> {
        serde_yaml::from_reader(reader)
            .map_err(|error| ParameterError::ConfigUnavailable(error.to_string()))
    }

    pub fn write_to_file(&self, filename: &str) -> Result<()> {
        let file = fs::File::create(filename).map_err(|error| ParameterError::FileWriteError {
            key: "parameters".to_string(),
            path: filename.to_string(),
            message: error.to_string(),
        })?;
        let mut writer = std::io::BufWriter::new(file);
        self.write(&mut writer)
    }

    pub fn read_from_file(filename: &str) -> Result<Parameters> {
        let file = fs::File::open(filename).map_err(|error| {
            ParameterError::ConfigUnavailable(format!("unable to open {filename}: {error}"))
        })?;
        let mut reader = std::io::BufReader::new(file);
        Self::read(&mut reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_follow_field_order() {
        let mapping = Parameters::default().to_mapping().unwrap();
        let keys: Vec<&str> = mapping.keys().map(|key| key.as_str().unwrap()).collect();
        assert_eq!(keys, PARAMETER_KEYS);
    }

    #[test]
    fn read_write() {
        let mut buffer = Vec::new();
        let parameters = Parameters {
            beta: 0.5,
            deme_names: vec!["a".into(), "b".into()],
            dms_file: Some("dms.csv".into()),
            phenotype_space: PhenotypeSpace::Geometric3d,
            ..Default::default()
        };
        parameters.write(&mut buffer).unwrap();
        let read_parameters = Parameters::read(&mut buffer.as_slice()).unwrap();
        assert_eq!(read_parameters, parameters);
    }

    #[test]
    fn read_partial_table() {
        let yaml = "beta: 0.4\nmut2D: true\nyearsFromMK: 2\n";
        let parameters = Parameters::read(&mut yaml.as_bytes()).unwrap();
        assert_eq!(parameters.beta, 0.4);
        assert!(parameters.mut_2d);
        assert_eq!(parameters.years_from_mk, 2.);
        assert_eq!(parameters.nu, 0.2);
    }

    #[test]
    fn read_write_file() {
        let tmp_file = std::env::temp_dir().join("antigen_test_parameters.yml");
        let path = tmp_file.to_str().unwrap();
        let parameters = Parameters {
            end_day: 100,
            ..Default::default()
        };
        parameters.write_to_file(path).unwrap();
        let read_parameters = Parameters::read_from_file(path).unwrap();
        assert_eq!(read_parameters, parameters);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn date_after_burnin() {
        let parameters = Parameters {
            burnin: 365,
            ..Default::default()
        };
        assert_eq!(parameters.get_date(365.), 0.);
        assert_eq!(parameters.get_date(730.), 1.);
        assert_eq!(parameters.get_date(0.), -1.);
    }

    #[test]
    fn integer_days() {
        assert!(Parameters::day_is_integer(3.));
        assert!(!Parameters::day_is_integer(3.1));
        assert!(Parameters::day_is_integer(0.));
    }

    #[test]
    fn seasonality_extremes() {
        let parameters = Parameters {
            deme_baselines: vec![1.],
            deme_amplitudes: vec![0.2],
            deme_offsets: vec![0.],
            ..Default::default()
        };
        assert!((parameters.get_seasonality(0, 0.) - 1.2).abs() < 1e-12);
        assert!((parameters.get_seasonality(0, 365.) - 1.2).abs() < 1e-12);
        assert!((parameters.get_seasonality(0, 182.5) - 0.8).abs() < 1e-12);
        assert!((parameters.get_seasonality(0, 365. * 2.5) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn seasonality_offset() {
        let parameters = Parameters::default();
        // south is half a year out of phase
        assert!((parameters.get_seasonality(2, 0.) - 0.9).abs() < 1e-12);
        assert!((parameters.get_seasonality(0, 0.) - 1.1).abs() < 1e-12);
        assert_eq!(parameters.get_seasonality(1, 100.), 1.);
    }

    #[test]
    #[should_panic]
    fn seasonality_outside_deme_vectors() {
        let parameters = Parameters {
            deme_count: 4,
            ..Default::default()
        };
        parameters.get_seasonality(3, 0.);
    }

    #[test]
    fn input_path() {
        let parameters = Parameters::default();
        assert_eq!(
            parameters.input_path("sequence.fasta"),
            PathBuf::from("input/sequence.fasta")
        );
    }
}
