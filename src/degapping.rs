//! Gap removal that keeps charset coordinates valid for the degapped sequence.

use crate::{
    coordinate_set::Charsets,
    error::RecordFailure,
    sequence::Sequence,
    trimming::EditOutcome,
};
use log::debug;

/// Removes every `gap` symbol. Charset columns that sat on a gap disappear;
/// a charset whose interior lost columns ends up with several segments.
pub fn degap(sequence: &Sequence, gap: u8, charsets: &Charsets) -> Result<EditOutcome, RecordFailure> {
    let symbols = sequence.as_bytes();
    let is_deleted = |column: usize| {
        column
            .checked_sub(1)
            .and_then(|i| symbols.get(i))
            .is_none_or(|c| *c == gap)
    };

    let degapped = sequence.without_positions(is_deleted);
    if degapped.is_empty() {
        return Err(RecordFailure::EmptyAfterDegap);
    }
    let removed = sequence.len() - degapped.len();
    debug!("degapping removed {removed} of {} symbols", sequence.len());

    Ok(EditOutcome {
        sequence: degapped,
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
    use crate::coordinate_set::{CoordinateSet, Segment};

    fn single(name: &str, positions: impl IntoIterator<Item = usize>) -> Charsets {
        [(name.to_string(), CoordinateSet::new(positions))].into_iter().collect()
    }

    #[test]
    fn test_degap_single_gaps_keep_one_segment() {
        let seq = Sequence::from_sequence("AT-GC-AT");
        let out = degap(&seq, b'-', &single("x", 1..=8)).unwrap();
        assert_eq!(out.sequence.to_string(), "ATGCAT");
        assert_eq!(out.removed, 2);
        assert_eq!(out.charsets["x"].positions(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(out.charsets["x"].segments(), vec![Segment::new(1, 6)]);
    }

    #[test]
    fn test_degap_preserves_length() {
        let seq = Sequence::from_sequence("--AC--GT-");
        let out = degap(&seq, b'-', &Charsets::new()).unwrap();
        assert_eq!(out.sequence.len() + out.removed, seq.len());
        assert_eq!(out.sequence.len() + seq.count(b'-'), seq.len());
    }

    #[test]
    fn test_degap_fragments_charset_with_internal_hole() {
        // the charset skips column 4 which is not a gap; the gap at 6 closes up
        let seq = Sequence::from_sequence("ACGTA-CGT");
        let out = degap(&seq, b'-', &single("x", [1, 2, 3, 5, 6, 7, 8])).unwrap();
        assert_eq!(
            out.charsets["x"].segments(),
            vec![Segment::new(1, 3), Segment::new(5, 7)]
        );
    }

    #[test]
    fn test_degap_positions_stay_within_new_length() {
        let seq = Sequence::from_sequence("A-C-G-T-");
        let out = degap(&seq, b'-', &single("x", 1..=8)).unwrap();
        let last = out.charsets["x"].last().unwrap();
        assert!(last <= out.sequence.len());
        assert_eq!(out.charsets["x"].positions(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_degap_charset_only_on_gaps_becomes_empty() {
        let seq = Sequence::from_sequence("AC---GT");
        let out = degap(&seq, b'-', &single("x", 3..=5)).unwrap();
        assert!(out.charsets["x"].is_empty());
    }

    #[test]
    fn test_degap_all_gaps_fails() {
        let seq = Sequence::from_sequence("----");
        assert_eq!(
            degap(&seq, b'-', &Charsets::new()),
            Err(RecordFailure::EmptyAfterDegap)
        );
    }
}
