//! Nucleotide and amino acid encodings, and the standard genetic code.

use phf::phf_map;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nucleotide {
    A,
    C,
    G,
    T,
}

impl Nucleotide {
    pub fn try_decode(s: &u8) -> Option<Self> {
        match s {
            // ACGT | acgt -> Nucleotide
            0x41 | 0x61 => Some(Nucleotide::A),
            0x43 | 0x63 => Some(Nucleotide::C),
            0x47 | 0x67 => Some(Nucleotide::G),
            0x54 | 0x74 => Some(Nucleotide::T),
            _ => None,
        }
    }

    pub fn encode(&self) -> u8 {
        match self {
            Nucleotide::A => 0x41,
            Nucleotide::C => 0x43,
            Nucleotide::G => 0x47,
            Nucleotide::T => 0x54,
        }
    }
}

impl std::fmt::Display for Nucleotide {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.encode() as char)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AminoAcid {
    Ala,
    Arg,
    Asn,
    Asp,
    Cys,
    Gln,
    Glu,
    Gly,
    His,
    Ile,
    Leu,
    Lys,
    Met,
    Phe,
    Pro,
    Ser,
    Thr,
    Trp,
    Tyr,
    Val,
    Stop,
}

/// One letter amino acid codes in alphabetical order.
///
/// This is the column order of preference weights in a DMS matrix.
pub const AMINO_ACIDS: [char; 20] = [
    'A', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'V', 'W',
    'Y',
];

impl AminoAcid {
    pub fn symbol(&self) -> char {
        match self {
            AminoAcid::Ala => 'A',
            AminoAcid::Arg => 'R',
            AminoAcid::Asn => 'N',
            AminoAcid::Asp => 'D',
            AminoAcid::Cys => 'C',
            AminoAcid::Gln => 'Q',
            AminoAcid::Glu => 'E',
            AminoAcid::Gly => 'G',
            AminoAcid::His => 'H',
            AminoAcid::Ile => 'I',
            AminoAcid::Leu => 'L',
            AminoAcid::Lys => 'K',
            AminoAcid::Met => 'M',
            AminoAcid::Phe => 'F',
            AminoAcid::Pro => 'P',
            AminoAcid::Ser => 'S',
            AminoAcid::Thr => 'T',
            AminoAcid::Trp => 'W',
            AminoAcid::Tyr => 'Y',
            AminoAcid::Val => 'V',
            AminoAcid::Stop => '*',
        }
    }

    /// Column of the amino acid in `AMINO_ACIDS`, `None` for the stop signal.
    pub fn index(&self) -> Option<usize> {
        let symbol = self.symbol();
        AMINO_ACIDS.iter().position(|&s| s == symbol)
    }

    pub fn is_stop(&self) -> bool {
        *self == AminoAcid::Stop
    }
}

impl std::fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

pub static CODONS: phf::Map<&'static str, AminoAcid> = phf_map! {
    "TTT" => AminoAcid::Phe, "TTC" => AminoAcid::Phe, "TTA" => AminoAcid::Leu, "TTG" => AminoAcid::Leu,
    "CTT" => AminoAcid::Leu, "CTC" => AminoAcid::Leu, "CTA" => AminoAcid::Leu, "CTG" => AminoAcid::Leu,
    "ATT" => AminoAcid::Ile, "ATC" => AminoAcid::Ile, "ATA" => AminoAcid::Ile, "ATG" => AminoAcid::Met,
    "GTT" => AminoAcid::Val, "GTC" => AminoAcid::Val, "GTA" => AminoAcid::Val, "GTG" => AminoAcid::Val,
    "TCT" => AminoAcid::Ser, "TCC" => AminoAcid::Ser, "TCA" => AminoAcid::Ser, "TCG" => AminoAcid::Ser,
    "CCT" => AminoAcid::Pro, "CCC" => AminoAcid::Pro, "CCA" => AminoAcid::Pro, "CCG" => AminoAcid::Pro,
    "ACT" => AminoAcid::Thr, "ACC" => AminoAcid::Thr, "ACA" => AminoAcid::Thr, "ACG" => AminoAcid::Thr,
    "GCT" => AminoAcid::Ala, "GCC" => AminoAcid::Ala, "GCA" => AminoAcid::Ala, "GCG" => AminoAcid::Ala,
    "TAT" => AminoAcid::Tyr, "TAC" => AminoAcid::Tyr, "TAA" => AminoAcid::Stop, "TAG" => AminoAcid::Stop,
    "CAT" => AminoAcid::His, "CAC" => AminoAcid::His, "CAA" => AminoAcid::Gln, "CAG" => AminoAcid::Gln,
    "AAT" => AminoAcid::Asn, "AAC" => AminoAcid::Asn, "AAA" => AminoAcid::Lys, "AAG" => AminoAcid::Lys,
    "GAT" => AminoAcid::Asp, "GAC" => AminoAcid::Asp, "GAA" => AminoAcid::Glu, "GAG" => AminoAcid::Glu,
    "TGT" => AminoAcid::Cys, "TGC" => AminoAcid::Cys, "TGA" => AminoAcid::Stop, "TGG" => AminoAcid::Trp,
    "CGT" => AminoAcid::Arg, "CGC" => AminoAcid::Arg, "CGA" => AminoAcid::Arg, "CGG" => AminoAcid::Arg,
    "AGT" => AminoAcid::Ser, "AGC" => AminoAcid::Ser, "AGA" => AminoAcid::Arg, "AGG" => AminoAcid::Arg,
    "GGT" => AminoAcid::Gly, "GGC" => AminoAcid::Gly, "GGA" => AminoAcid::Gly, "GGG" => AminoAcid::Gly,
};

/// Translate an uppercase codon triplet.
pub fn translate(codon: &str) -> Option<AminoAcid> {
    CODONS.get(codon).copied()
}
