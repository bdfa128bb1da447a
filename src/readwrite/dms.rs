use ndarray::Array2;
use std::path::Path;

use crate::core::dms::DmsMatrix;
use crate::encoding::AMINO_ACIDS;
use crate::errors::{ParameterError, Result};

pub trait DmsIO: Sized {
    fn read_from_file(path: &Path) -> Result<Self>;
}

impl DmsIO for DmsMatrix {
    /// Reads a csv file with a header and one row per site.
    ///
    /// Each row holds the site number followed by the preferences of the 20 amino acids in
    /// alphabetical order.
    fn read_from_file(path: &Path) -> Result<DmsMatrix> {
        let path_str = path.display().to_string();
        let read_error = |message: String| ParameterError::FileReadError {
            key: "DMSFile".to_string(),
            path: path_str.clone(),
            message,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|error| read_error(format!("unable to open DMS file: {error}")))?;

        let n_columns = AMINO_ACIDS.len() + 1;
        let mut sites = Vec::new();
        let mut preferences = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(|error| read_error(format!("{error}")))?;
            if record.len() != n_columns {
                return Err(read_error(format!(
                    "row {row} has {} columns instead of {n_columns}",
                    record.len()
                )));
            }
            let site = record[0]
                .parse::<usize>()
                .map_err(|_| read_error(format!("invalid site number in row {row}")))?;
            sites.push(site);
            for field in record.iter().skip(1) {
                let preference = field
                    .parse::<f64>()
                    .map_err(|_| read_error(format!("invalid preference in row {row}")))?;
                preferences.push(preference);
            }
        }

        let preferences = Array2::from_shape_vec((sites.len(), AMINO_ACIDS.len()), preferences)
            .map_err(|error| read_error(format!("{error}")))?;
        log::debug!("Read {} sites from {}", sites.len(), path_str);
        Ok(DmsMatrix::new(path_str.clone(), sites, preferences))
    }
}
