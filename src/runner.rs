use anyhow::Result;

use std::path::Path;

use crate::args::Args;
use crate::config::{ParameterResolver, Parameters};
use crate::core::ParameterSnapshot;
use crate::errors::ParameterError;

pub struct Runner {
    args: Args,
    snapshot: ParameterSnapshot,
}

impl Runner {
    pub fn new(args: Args) -> Result<Runner> {
        Self::setup_logger(&args);

        let parameters = Self::resolve_parameters(&args)?;
        let snapshot = ParameterSnapshot::initialize(parameters);

        Ok(Self { args, snapshot })
    }

    pub fn snapshot(&self) -> &ParameterSnapshot {
        &self.snapshot
    }

    pub fn start(&self) -> Result<()> {
        log::info!("Resolved parameters\n{}", self.snapshot.parameters());
        println!("{}", self.summary());

        if let Some(dump) = &self.args.dump {
            log::info!("Storing resolved parameters to {dump}...");
            self.snapshot.write_to_file(dump)?;
        }
        Ok(())
    }

    fn summary(&self) -> String {
        let snapshot = &self.snapshot;
        let tiers = snapshot.epitope_tiers();
        format!(
            "Resolved {} demes ({}) in {} phenotype space, {} codons, {} epitope sites ({} high, {} low), DMS matrix: {}",
            snapshot.deme_count,
            snapshot.deme_names.join(", "),
            snapshot.phenotype_space,
            snapshot.codons(),
            tiers.len(),
            tiers.high().len(),
            tiers.low().len(),
            snapshot.dms().map_or("none", |dms| dms.path()),
        )
    }

    /// Setup logging level and file
    fn setup_logger(args: &Args) {
        let log_level = match args.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        simple_logging::log_to_file(args.log_file.as_str(), log_level).unwrap_or_else(|_| {
            eprintln!("Unable to open log file.");
            std::process::exit(1);
        });
    }

    /// Resolve parameters from the overlay document with the policy selected by `args`.
    ///
    /// Lenient resolution is the default. With `--strict` any error is returned, except for a
    /// missing document, which resolves to the defaults.
    fn resolve_parameters(args: &Args) -> Result<Parameters> {
        let path = Path::new(&args.parameters);
        let resolver = ParameterResolver::from_file(path);

        if !args.strict {
            let (parameters, error) = resolver.resolve_lenient();
            if let Some(error) = error {
                eprintln!("{error}");
                eprintln!("Continuing with partially applied parameters, see {}.", args.log_file);
            }
            return Ok(parameters);
        }

        match resolver.resolve() {
            Ok(parameters) => Ok(parameters),
            // a missing document is not an error, the defaults apply
            Err(ParameterError::ConfigUnavailable(_)) if !path.exists() => {
                log::info!("Cannot load {}, using defaults", path.display());
                Ok(Parameters::default())
            }
            Err(error) => Err(error.into()),
        }
    }
}
