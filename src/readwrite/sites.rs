use itertools::Itertools;
use std::fs;
use std::path::Path;

use crate::errors::{ParameterError, Result};

/// Read a comma separated list of 1-based codon positions.
pub fn read_sites(path: &Path) -> Result<Vec<usize>> {
    let read_error = |message: String| ParameterError::FileReadError {
        key: "epitopeSites".to_string(),
        path: path.display().to_string(),
        message,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|error| read_error(format!("unable to open epitope file: {error}")))?;

    let mut sites = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|error| read_error(format!("{error}")))?;
        for field in record.iter().filter(|field| !field.is_empty()) {
            let site = field
                .parse::<usize>()
                .map_err(|_| read_error(format!("invalid epitope site: {field}")))?;
            if site == 0 {
                return Err(read_error("epitope sites are 1-based".to_string()));
            }
            sites.push(site);
        }
    }
    Ok(sites)
}

/// Write sites in the format read by `read_sites`.
pub fn write_sites(path: &Path, sites: &[usize], key: &str) -> Result<()> {
    let line = format!("{}\n", sites.iter().join(","));
    fs::write(path, line).map_err(|error| ParameterError::FileWriteError {
        key: key.to_string(),
        path: path.display().to_string(),
        message: error.to_string(),
    })
}
