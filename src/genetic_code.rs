//! NCBI genetic codes.
//!
//! Each table is stored in the NCBI compact form: 64 amino-acid letters and
//! 64 start markers over the codons ordered `TTT, TTC, TTA, TTG, TCT, ...`
//! (bases in `TCAG` order, first base slowest).

use crate::error::AnnonexError;
use std::fmt;

/// Three nucleotides, upper-case.
pub type Codon = [u8; 3];

const BASE_ORDER: &[u8; 4] = b"TCAG";

/// Canonical start codon.
pub const ATG: Codon = *b"ATG";

struct TableDefinition {
    id: u8,
    name: &'static str,
    amino_acids: &'static str,
    starts: &'static str,
}

const TABLES: &[TableDefinition] = &[
    TableDefinition {
        id: 1,
        name: "Standard",
        amino_acids: "FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
        starts: "---M------**--*----M---------------M----------------------------",
    },
    TableDefinition {
        id: 2,
        name: "Vertebrate Mitochondrial",
        amino_acids: "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSS**VVVVAAAADDEEGGGG",
        starts: "----------**--------------------MMMM----------**---M------------",
    },
    TableDefinition {
        id: 3,
        name: "Yeast Mitochondrial",
        amino_acids: "FFLLSSSSYY**CCWWTTTTPPPPHHQQRRRRIIMMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
        starts: "----------**----------------------MM---------------M------------",
    },
    TableDefinition {
        id: 4,
        name: "Mold, Protozoan, and Coelenterate Mitochondrial and Mycoplasma/Spiroplasma",
        amino_acids: "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
        starts: "--MM------**-------M------------MMMM---------------M------------",
    },
    TableDefinition {
        id: 5,
        name: "Invertebrate Mitochondrial",
        amino_acids: "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSSSSVVVVAAAADDEEGGGG",
        starts: "---M------**--------------------MMMM---------------M------------",
    },
    TableDefinition {
        id: 6,
        name: "Ciliate, Dasycladacean and Hexamita Nuclear",
        amino_acids: "FFLLSSSSYYQQCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
        starts: "--------------*--------------------M----------------------------",
    },
    TableDefinition {
        id: 11,
        name: "Bacterial, Archaeal and Plant Plastid",
        amino_acids: "FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
        starts: "---M------**--*----M------------MMMM---------------M------------",
    },
];

/// A translation table, injected wherever codons are interpreted.
#[derive(Clone, Copy)]
pub struct GeneticCode {
    id: u8,
    name: &'static str,
    amino_acids: &'static [u8],
    starts: &'static [u8],
}

impl GeneticCode {
    pub fn from_id(id: u8) -> Result<Self, AnnonexError> {
        TABLES
            .iter()
            .find(|t| t.id == id)
            .map(|t| Self {
                id: t.id,
                name: t.name,
                amino_acids: t.amino_acids.as_bytes(),
                starts: t.starts.as_bytes(),
            })
            .ok_or_else(|| {
                AnnonexError::Configuration(format!(
                    "Unsupported translation table {id}; supported: {}",
                    Self::supported_ids()
                        .iter()
                        .map(|id| id.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }

    /// Parses a translation-table id as given on the command line or in a config file.
    pub fn parse_id(text: &str) -> Result<Self, AnnonexError> {
        let id = text.trim().parse::<u8>().map_err(|_| {
            AnnonexError::Configuration(format!("Malformed translation table id '{text}'"))
        })?;
        Self::from_id(id)
    }

    pub fn supported_ids() -> Vec<u8> {
        TABLES.iter().map(|t| t.id).collect()
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn base_index(base: u8) -> Option<usize> {
        let base = match base.to_ascii_uppercase() {
            b'U' => b'T',
            b => b,
        };
        BASE_ORDER.iter().position(|b| *b == base)
    }

    fn codon_index(codon: &[u8]) -> Option<usize> {
        if codon.len() != 3 {
            return None;
        }
        let mut index = 0;
        for base in codon {
            index = index * 4 + Self::base_index(*base)?;
        }
        Some(index)
    }

    fn codon_at(index: usize) -> Codon {
        [
            BASE_ORDER[index / 16],
            BASE_ORDER[(index / 4) % 4],
            BASE_ORDER[index % 4],
        ]
    }

    /// One-letter amino acid for a codon; `*` for stop, `X` when any base is not A/C/G/T.
    pub fn translate_codon(&self, codon: &[u8]) -> u8 {
        Self::codon_index(codon)
            .map(|i| self.amino_acids[i])
            .unwrap_or(b'X')
    }

    /// Translates complete codons from the first base on; a trailing partial codon is ignored.
    pub fn translate(&self, bases: &[u8]) -> String {
        bases
            .chunks_exact(3)
            .map(|codon| self.translate_codon(codon) as char)
            .collect()
    }

    pub fn is_stop(&self, codon: &[u8]) -> bool {
        self.translate_codon(codon) == b'*'
    }

    pub fn stop_codons(&self) -> Vec<Codon> {
        (0..64)
            .filter(|i| self.amino_acids[*i] == b'*')
            .map(Self::codon_at)
            .collect()
    }

    /// Every codon the table allows as an initiation codon.
    pub fn start_codons(&self) -> Vec<Codon> {
        (0..64)
            .filter(|i| self.starts[*i] == b'M')
            .map(Self::codon_at)
            .collect()
    }
}

impl fmt::Debug for GeneticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GeneticCode({}: {})", self.id, self.name)
    }
}
