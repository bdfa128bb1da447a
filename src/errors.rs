//! All errors that can occur while resolving simulation parameters.

use std::fmt;

/// Result type of the antigen library.
pub type Result<T> = std::result::Result<T, ParameterError>;

#[derive(Clone, Debug, PartialEq)]
pub enum ParameterError {
    /// The overlay document could not be opened or parsed.
    ConfigUnavailable(String),
    /// A value in the overlay does not have the shape of its parameter.
    TypeMismatch { key: String, message: String },
    /// The starting sequence cannot be split into codons.
    InvalidSequence(String),
    /// A stop codon occurs before the final codon.
    PrematureStopCodon { site: usize },
    /// The DMS matrix does not have one row per codon of the starting sequence.
    DmsRowCountMismatch {
        path: String,
        expected: usize,
        actual: usize,
    },
    /// A side file referenced by the overlay could not be read.
    FileReadError {
        key: String,
        path: String,
        message: String,
    },
    /// A derived side file could not be written.
    FileWriteError {
        key: String,
        path: String,
        message: String,
    },
    /// An epitope site does not address a codon of the starting sequence.
    InvalidEpitopeSite { site: usize, codons: usize },
    /// The proportion of high tier epitope sites lies outside of [0, 1].
    InvalidProportion(f64),
}

impl ParameterError {
    /// Parameter keys whose values together produced the error.
    ///
    /// Overriding any of these keys can cause the error, reverting the one latest in canonical
    /// order removes it. An empty list means that the error is not tied to particular keys.
    pub fn keys(&self) -> Vec<&str> {
        match self {
            ParameterError::ConfigUnavailable(_) => vec![],
            ParameterError::TypeMismatch { key, .. }
            | ParameterError::FileReadError { key, .. }
            | ParameterError::FileWriteError { key, .. } => vec![key.as_str()],
            ParameterError::InvalidSequence(_) | ParameterError::PrematureStopCodon { .. } => {
                vec!["phenotypeSpace", "startingSequence"]
            }
            ParameterError::DmsRowCountMismatch { .. } => vec!["startingSequence", "DMSFile"],
            ParameterError::InvalidEpitopeSite { .. } => {
                vec!["phenotypeSpace", "startingSequence", "epitopeSites"]
            }
            ParameterError::InvalidProportion(_) => vec!["proportionHighSites"],
        }
    }
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParameterError::ConfigUnavailable(message) => {
                write!(f, "ConfigUnavailable: {}", message)
            }
            ParameterError::TypeMismatch { key, message } => {
                write!(f, "TypeMismatch: `{}`: {}", key, message)
            }
            ParameterError::InvalidSequence(message) => {
                write!(f, "InvalidSequence: {}", message)
            }
            ParameterError::PrematureStopCodon { site } => {
                write!(f, "PrematureStopCodon: stop codon at site {}", site)
            }
            ParameterError::DmsRowCountMismatch {
                path,
                expected,
                actual,
            } => write!(
                f,
                "DMSRowCountMismatch: expected {} sites, found {} in {}",
                expected, actual, path
            ),
            ParameterError::FileReadError { key, path, message } => {
                write!(f, "FileReadError: `{}` ({}): {}", key, path, message)
            }
            ParameterError::FileWriteError { key, path, message } => {
                write!(f, "FileWriteError: `{}` ({}): {}", key, path, message)
            }
            ParameterError::InvalidEpitopeSite { site, codons } => write!(
                f,
                "InvalidEpitopeSite: site {} is not between 1 and {}",
                site, codons
            ),
            ParameterError::InvalidProportion(proportion) => write!(
                f,
                "InvalidProportion: proportionHighSites={} is not in [0, 1]",
                proportion
            ),
        }
    }
}

impl std::error::Error for ParameterError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_of_derived_errors() {
        let error = ParameterError::DmsRowCountMismatch {
            path: "dms.csv".to_string(),
            expected: 3,
            actual: 4,
        };
        assert_eq!(error.keys(), vec!["startingSequence", "DMSFile"]);
        assert!(ParameterError::ConfigUnavailable("gone".into()).keys().is_empty());
    }

    #[test]
    fn display_reports_counts() {
        let error = ParameterError::DmsRowCountMismatch {
            path: "dms.csv".to_string(),
            expected: 3,
            actual: 4,
        };
        assert_eq!(
            error.to_string(),
            "DMSRowCountMismatch: expected 3 sites, found 4 in dms.csv"
        );
    }
}
