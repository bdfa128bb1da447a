//! Amino acid preferences from deep mutational scanning.

use ndarray::{Array2, ArrayView1};

use crate::encoding::AminoAcid;
use crate::errors::{ParameterError, Result};

/// Per site amino acid preferences.
///
/// Row `i` holds the preferences of codon site `i` (0-based), with columns ordered as in
/// `encoding::AMINO_ACIDS`.
#[derive(Debug, Clone, PartialEq)]
pub struct DmsMatrix {
    path: String,
    sites: Vec<usize>,
    preferences: Array2<f64>,
}

impl DmsMatrix {
    pub fn new(path: String, sites: Vec<usize>, preferences: Array2<f64>) -> Self {
        Self {
            path,
            sites,
            preferences,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn n_sites(&self) -> usize {
        self.preferences.nrows()
    }

    /// Site numbers as given in the first column.
    pub fn sites(&self) -> &[usize] {
        &self.sites
    }

    /// Preferences of site `site` for all amino acids, `None` outside of the matrix.
    pub fn preferences(&self, site: usize) -> Option<ArrayView1<'_, f64>> {
        (site < self.n_sites()).then(|| self.preferences.row(site))
    }

    /// Preference of site `site` for `amino_acid`, `None` for stop codons.
    pub fn preference(&self, site: usize, amino_acid: AminoAcid) -> Option<f64> {
        amino_acid
            .index()
            .and_then(|column| self.preferences.get((site, column)).copied())
    }

    /// Check that the matrix holds one row per codon of the starting sequence.
    pub fn check_sites(&self, codons: usize) -> Result<()> {
        if self.n_sites() != codons {
            log::warn!(
                "The DMS data provided does not have the same number of rows as the length of the protein sequence. Expected # of sites: {}, actual # of sites in {}: {}",
                codons,
                self.path,
                self.n_sites()
            );
            return Err(ParameterError::DmsRowCountMismatch {
                path: self.path.clone(),
                expected: codons,
                actual: self.n_sites(),
            });
        }
        Ok(())
    }
}
