//! Translation of coding features and the start/stop checks that decide
//! whether a feature boundary is exact or open.

use crate::{
    error::FeatureFailure,
    feature::Feature,
    genetic_code::{ATG, Codon, GeneticCode},
    sequence::Sequence,
};
use log::debug;

/// The final stop codon plus at most one tandem stop right before it.
const MAX_TERMINAL_STOPS: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodingAssessment {
    pub protein: String,
    pub has_start: bool,
    pub has_stop: bool,
}

pub struct TranslationValidator<'a> {
    code: &'a GeneticCode,
    start_codons: Vec<Codon>,
    stop_codons: Vec<Codon>,
}

impl<'a> TranslationValidator<'a> {
    pub fn new(code: &'a GeneticCode, start_codons: Vec<Codon>, stop_codons: Vec<Codon>) -> Self {
        Self {
            code,
            start_codons,
            stop_codons,
        }
    }

    /// `ATG` as the only start codon and the table's stop codons.
    pub fn canonical(code: &'a GeneticCode) -> Self {
        Self::new(code, vec![ATG], code.stop_codons())
    }

    /// All start and stop codons of the table.
    pub fn from_table(code: &'a GeneticCode) -> Self {
        Self::new(code, code.start_codons(), code.stop_codons())
    }

    /// Translates `bases` in frame 1 and checks both ends.
    ///
    /// A stop codon is internal unless it is the last codon or directly
    /// precedes the last one (`ATG TAG TAA` is accepted, `ATG TAA TAA TAA`
    /// is not).
    pub fn assess(&self, bases: &[u8]) -> Result<CodingAssessment, FeatureFailure> {
        let protein = self.code.translate(bases);
        let terminal_stops = protein
            .bytes()
            .rev()
            .take_while(|aa| *aa == b'*')
            .count()
            .min(MAX_TERMINAL_STOPS);
        if let Some(first_stop) = protein.bytes().position(|aa| aa == b'*') {
            if first_stop < protein.len() - terminal_stops {
                return Err(FeatureFailure::InternalStop {
                    codon: first_stop + 1,
                    protein,
                });
            }
        }

        let has_start = bases
            .get(..3)
            .is_some_and(|first| self.start_codons.iter().any(|c| c[..] == *first));
        let has_stop = bases
            .len()
            .checked_sub(3)
            .map(|i| &bases[i..])
            .is_some_and(|last| self.stop_codons.iter().any(|c| c[..] == *last));

        Ok(CodingAssessment {
            protein,
            has_start,
            has_stop,
        })
    }

    /// Opens the first boundary when no start codon is seen and the last
    /// boundary when no stop codon is seen. Non-coding kinds pass through.
    ///
    /// Only the bases under the final location are inspected; ambiguity
    /// runs that were trimmed off before do not affect the decision.
    pub fn check_and_fuzz(&self, sequence: &Sequence, feature: Feature) -> Result<Feature, FeatureFailure> {
        if !feature.kind.is_coding() {
            return Ok(feature);
        }
        let bases = sequence.extract_segments(feature.location.segments());
        let assessment = self.assess(&bases)?;
        debug!(
            "{} translated to {} (start: {}, stop: {})",
            feature.label(),
            assessment.protein,
            assessment.has_start,
            assessment.has_stop
        );

        let mut location = feature.location;
        if !assessment.has_start {
            location = location.with_fuzzy_start();
        }
        if !assessment.has_stop {
            location = location.with_fuzzy_end();
        }
        Ok(Feature {
            location,
            ..feature
        })
    }
}
