//! Validation of the starting sequence against the genetic code.

use crate::encoding::{AminoAcid, Nucleotide, translate};
use crate::errors::{ParameterError, Result};

/// Iterate over the complete codon triplets of a sequence.
pub fn codons(sequence: &str) -> impl Iterator<Item = &[u8]> {
    sequence.as_bytes().chunks_exact(3)
}

/// Translate a sequence into amino acids, `None` if a codon is not in the genetic code.
pub fn translate_sequence(sequence: &str) -> Option<Vec<AminoAcid>> {
    codons(sequence)
        .map(|codon| std::str::from_utf8(codon).ok().and_then(translate))
        .collect()
}

/// Check that an uppercase sequence can be used by the sequence based phenotype model.
///
/// The sequence needs to consist of complete codons and must not contain a stop codon, except
/// for the final one.
pub fn validate_sequence(sequence: &str) -> Result<()> {
    if sequence.is_empty() || sequence.len() % 3 != 0 {
        return Err(ParameterError::InvalidSequence(format!(
            "length should be any multiple of 3, except for 0, but is {}",
            sequence.len()
        )));
    }

    if let Some(position) = sequence
        .bytes()
        .position(|symbol| Nucleotide::try_decode(&symbol).is_none())
    {
        return Err(ParameterError::InvalidSequence(format!(
            "unknown nucleotide at position {position}"
        )));
    }

    let n_codons = sequence.len() / 3;
    for (site, codon) in codons(sequence).enumerate() {
        let amino_acid = std::str::from_utf8(codon)
            .ok()
            .and_then(translate)
            .ok_or_else(|| {
                ParameterError::InvalidSequence(format!("unknown codon at site {site}"))
            })?;
        if amino_acid.is_stop() && site + 1 < n_codons {
            log::warn!("There should not be a stop codon at site {site}");
            return Err(ParameterError::PrematureStopCodon { site });
        }
    }

    Ok(())
}
