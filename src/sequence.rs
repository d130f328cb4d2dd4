use crate::coordinate_set::Segment;
use std::fmt;

type SymbolString = Vec<u8>;

/// An aligned or cleaned nucleotide sequence. Symbols are stored upper-case;
/// edits always produce a new `Sequence`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sequence {
    symbols: SymbolString,
}

impl Sequence {
    pub fn from_sequence(sequence: &str) -> Self {
        Self::from_u8(sequence.as_bytes())
    }

    pub fn from_u8(s: &[u8]) -> Self {
        Self {
            symbols: s
                .iter()
                .filter(|c| !c.is_ascii_whitespace())
                .map(|c| c.to_ascii_uppercase())
                .collect(),
        }
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.symbols
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol at a 1-based position.
    #[inline(always)]
    pub fn get(&self, pos: usize) -> Option<u8> {
        pos.checked_sub(1)
            .and_then(|i| self.symbols.get(i))
            .copied()
    }

    pub fn count(&self, symbol: u8) -> usize {
        self.symbols.iter().filter(|c| **c == symbol).count()
    }

    pub fn replace_symbol(&self, from: u8, to: u8) -> Self {
        Self {
            symbols: self
                .symbols
                .iter()
                .map(|c| if *c == from { to } else { *c })
                .collect(),
        }
    }

    /// Keeps the symbols whose 1-based position is not deleted.
    pub fn without_positions<F>(&self, is_deleted: F) -> Self
    where
        F: Fn(usize) -> bool,
    {
        Self {
            symbols: self
                .symbols
                .iter()
                .enumerate()
                .filter(|(i, _)| !is_deleted(i + 1))
                .map(|(_, c)| *c)
                .collect(),
        }
    }

    /// Concatenates the symbols under the given segments, in segment order.
    /// Positions past the end of the sequence read as `N`.
    pub fn extract_segments(&self, segments: &[Segment]) -> Vec<u8> {
        segments
            .iter()
            .flat_map(|s| s.positions())
            .map(|pos| self.get(pos).unwrap_or(b'N'))
            .collect()
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.symbols))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_sequence_uppercases_and_drops_whitespace() {
        let seq = Sequence::from_sequence("acg t\nNn-");
        assert_eq!(seq.to_string(), "ACGTNN-");
        assert_eq!(seq.len(), 7);
    }

    #[test]
    fn test_get_is_one_based() {
        let seq = Sequence::from_sequence("ATGC");
        assert_eq!(seq.get(0), None);
        assert_eq!(seq.get(1), Some(b'A'));
        assert_eq!(seq.get(4), Some(b'C'));
        assert_eq!(seq.get(5), None);
    }

    #[test]
    fn test_replace_symbol() {
        let seq = Sequence::from_sequence("A?G?");
        assert_eq!(seq.replace_symbol(b'?', b'N').to_string(), "ANGN");
        // the source is left untouched
        assert_eq!(seq.to_string(), "A?G?");
    }

    #[test]
    fn test_extract_segments_follows_segment_order() {
        let seq = Sequence::from_sequence("AACCGGTT");
        let bases = seq.extract_segments(&[Segment::new(7, 8), Segment::new(1, 2)]);
        assert_eq!(bases, b"TTAA");
    }
}
