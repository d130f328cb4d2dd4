//! Removal of leading and trailing ambiguity runs.

use crate::{
    coordinate_set::Charsets,
    error::RecordFailure,
    sequence::Sequence,
};
use log::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrimEnd {
    Leading,
    Trailing,
}

/// A trimmed or degapped sequence together with the charsets rewritten for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditOutcome {
    pub sequence: Sequence,
    pub charsets: Charsets,
    pub removed: usize,
}

pub fn trim_leading(
    sequence: &Sequence,
    ambiguity: u8,
    charsets: &Charsets,
) -> Result<EditOutcome, RecordFailure> {
    trim(sequence, ambiguity, charsets, TrimEnd::Leading)
}

pub fn trim_trailing(
    sequence: &Sequence,
    ambiguity: u8,
    charsets: &Charsets,
) -> Result<EditOutcome, RecordFailure> {
    trim(sequence, ambiguity, charsets, TrimEnd::Trailing)
}

fn run_length(sequence: &Sequence, ambiguity: u8, end: TrimEnd) -> usize {
    let symbols = sequence.as_bytes();
    match end {
        TrimEnd::Leading => symbols.iter().take_while(|c| **c == ambiguity).count(),
        TrimEnd::Trailing => symbols.iter().rev().take_while(|c| **c == ambiguity).count(),
    }
}

fn trim(
    sequence: &Sequence,
    ambiguity: u8,
    charsets: &Charsets,
    end: TrimEnd,
) -> Result<EditOutcome, RecordFailure> {
    let len = sequence.len();
    let removed = run_length(sequence, ambiguity, end);
    if removed == len {
        return Err(RecordFailure::EmptyAfterTrim);
    }

    // 1-based columns of the untrimmed sequence; charset columns past its end go too
    let is_deleted = |column: usize| {
        column > len
            || match end {
                TrimEnd::Leading => column <= removed,
                TrimEnd::Trailing => column > len - removed,
            }
    };

    debug!("{end:?} trim removed {removed} of {len} symbols");
    Ok(EditOutcome {
        sequence: sequence.without_positions(is_deleted),
        charsets: charsets
            .iter()
            .map(|(name, set)| (name.clone(), set.remap_through_deletion(is_deleted)))
            .collect(),
        removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate_set::CoordinateSet;

    fn charsets(sets: &[(&str, &[usize])]) -> Charsets {
        sets.iter()
            .map(|(name, positions)| (name.to_string(), CoordinateSet::new(positions.iter().copied())))
            .collect()
    }

    #[test]
    fn test_trim_leading_and_trailing_scenario() {
        let seq = Sequence::from_sequence("NNATGCGATAGNN");
        let sets = charsets(&[("x", &[1, 2, 3, 12, 13])]);

        let lead = trim_leading(&seq, b'N', &sets).unwrap();
        assert_eq!(lead.sequence.to_string(), "ATGCGATAGNN");
        assert_eq!(lead.removed, 2);
        assert_eq!(lead.charsets["x"].positions(), &[1, 10, 11]);

        let trail = trim_trailing(&lead.sequence, b'N', &lead.charsets).unwrap();
        assert_eq!(trail.sequence.to_string(), "ATGCGATAG");
        assert_eq!(trail.removed, 2);
        assert_eq!(trail.charsets["x"].positions(), &[1]);

        assert_eq!(trail.sequence.len() + lead.removed + trail.removed, seq.len());
    }

    #[test]
    fn test_trim_stops_at_first_other_symbol() {
        let seq = Sequence::from_sequence("N-NACGT");
        let out = trim_leading(&seq, b'N', &Charsets::new()).unwrap();
        assert_eq!(out.sequence.to_string(), "-NACGT");
        assert_eq!(out.removed, 1);
    }

    #[test]
    fn test_trim_without_ambiguities_is_identity() {
        let seq = Sequence::from_sequence("ACGT");
        let sets = charsets(&[("x", &[2, 3])]);
        let out = trim_trailing(&seq, b'N', &sets).unwrap();
        assert_eq!(out.sequence, seq);
        assert_eq!(out.charsets, sets);
        assert_eq!(out.removed, 0);
    }

    #[test]
    fn test_trim_all_ambiguous_fails() {
        let seq = Sequence::from_sequence("NNNN");
        assert_eq!(
            trim_leading(&seq, b'N', &Charsets::new()),
            Err(RecordFailure::EmptyAfterTrim)
        );
        assert_eq!(
            trim_trailing(&seq, b'N', &Charsets::new()),
            Err(RecordFailure::EmptyAfterTrim)
        );
    }

    #[test]
    fn test_trim_drops_positions_past_the_sequence() {
        let seq = Sequence::from_sequence("ACGTN");
        let sets = charsets(&[("x", &[3, 4, 5, 6, 7])]);
        let out = trim_trailing(&seq, b'N', &sets).unwrap();
        assert_eq!(out.charsets["x"].positions(), &[3, 4]);
    }

    #[test]
    fn test_trim_leaves_the_shared_charsets_untouched() {
        let seq = Sequence::from_sequence("NACGT");
        let sets = charsets(&[("x", &[1, 2, 3])]);
        let out = trim_leading(&seq, b'N', &sets).unwrap();
        assert_eq!(out.charsets["x"].positions(), &[1, 2]);
        assert_eq!(sets["x"].positions(), &[1, 2, 3]);
    }
}
