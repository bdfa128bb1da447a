use seq_io::fasta;
use std::path::Path;

use crate::errors::{ParameterError, Result};

fn read_error(path: &Path, message: String) -> ParameterError {
    ParameterError::FileReadError {
        key: "startingSequence".to_string(),
        path: path.display().to_string(),
        message,
    }
}

/// Read the first record of a fasta file as an uppercase sequence.
///
/// Sequence lines of the record are concatenated. Further records are ignored.
pub fn read_sequence(path: &Path) -> Result<String> {
    let mut reader = fasta::Reader::from_path(path)
        .map_err(|error| read_error(path, format!("unable to open sequence file: {error}")))?;

    let sequence: Vec<u8> = match reader.next() {
        Some(Ok(record)) => record
            .full_seq()
            .iter()
            .filter(|symbol| !symbol.is_ascii_whitespace())
            .map(|symbol| symbol.to_ascii_uppercase())
            .collect(),
        Some(Err(error)) => {
            return Err(read_error(path, format!("unable to read sequence: {error}")));
        }
        None => return Err(read_error(path, "no sequence record".to_string())),
    };

    if reader.next().is_some() {
        log::warn!(
            "{} holds more than one record, only the first sequence is used",
            path.display()
        );
    }

    String::from_utf8(sequence)
        .map_err(|_| read_error(path, "sequence is not valid text".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_fasta(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn read_multiline_record() {
        let path = write_fasta("antigen_test_multiline.fasta", ">ha\natgaaa\nTAA\n");
        assert_eq!(read_sequence(&path).unwrap(), "ATGAAATAA");
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn ignore_further_records() {
        let path = write_fasta(
            "antigen_test_records.fasta",
            ">first\nATGAAA\n>second\nCCCGGG\n",
        );
        assert_eq!(read_sequence(&path).unwrap(), "ATGAAA");
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_file() {
        let path = std::env::temp_dir().join("antigen_test_missing.fasta");
        assert!(matches!(
            read_sequence(&path),
            Err(ParameterError::FileReadError { key, .. }) if key == "startingSequence"
        ));
    }

    #[test]
    fn empty_file() {
        let path = write_fasta("antigen_test_empty.fasta", "");
        assert!(read_sequence(&path).is_err());
        fs::remove_file(path).unwrap();
    }
}
