//! Charset column positions and their contiguous segments.
//!
//! Positions are 1-based and always refer to the current version of the
//! sequence the set was derived for. A set is never edited in place; every
//! sequence edit produces a new set through [`CoordinateSet::remap_through_deletion`].

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, ops::RangeInclusive};

/// Charset name to column positions, as defined by the alignment or derived for one sequence.
pub type Charsets = BTreeMap<String, CoordinateSet>;

/// One maximal contiguous run of positions, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn positions(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateSet {
    positions: Vec<usize>,
}

impl CoordinateSet {
    /// Builds a set from arbitrary positions; order and duplicates do not matter.
    /// Position zero is not a column and is discarded.
    pub fn new(positions: impl IntoIterator<Item = usize>) -> Self {
        let mut positions: Vec<usize> = positions.into_iter().filter(|p| *p > 0).collect();
        positions.sort_unstable();
        positions.dedup();
        Self { positions }
    }

    pub fn from_range(start: usize, end: usize) -> Self {
        Self::new(start..=end)
    }

    pub fn from_segments(segments: &[Segment]) -> Self {
        Self::new(segments.iter().flat_map(|s| s.positions()))
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn first(&self) -> Option<usize> {
        self.positions.first().copied()
    }

    pub fn last(&self) -> Option<usize> {
        self.positions.last().copied()
    }

    /// Splits the set into ordered, non-adjacent segments in a single pass.
    pub fn segments(&self) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut positions = self.positions.iter().copied();
        let Some(first) = positions.next() else {
            return segments;
        };
        let mut current = Segment::new(first, first);
        for pos in positions {
            if pos == current.end + 1 {
                current.end = pos;
            } else {
                segments.push(current);
                current = Segment::new(pos, pos);
            }
        }
        segments.push(current);
        segments
    }

    /// Drops every position for which `is_deleted` holds and shifts each
    /// survivor left by the number of deleted columns strictly before it.
    ///
    /// `is_deleted` is evaluated against the columns of the sequence *before*
    /// the edit. Every column up to the set's last position is visited once.
    pub fn remap_through_deletion<F>(&self, is_deleted: F) -> Self
    where
        F: Fn(usize) -> bool,
    {
        let mut positions = Vec::with_capacity(self.positions.len());
        let mut deleted_before = 0;
        let mut column = 1;
        for &pos in &self.positions {
            while column < pos {
                if is_deleted(column) {
                    deleted_before += 1;
                }
                column += 1;
            }
            if !is_deleted(pos) {
                positions.push(pos - deleted_before);
            }
        }
        Self { positions }
    }

    /// The set without its last `n` positions.
    pub fn without_tail(&self, n: usize) -> Self {
        let keep = self.positions.len().saturating_sub(n);
        Self {
            positions: self.positions[..keep].to_vec(),
        }
    }
}

impl fmt::Display for CoordinateSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parts: Vec<String> = self.segments().iter().map(|s| s.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}
