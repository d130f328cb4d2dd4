//! Features of an output record and their (possibly compound, possibly fuzzy) locations.

use crate::coordinate_set::{CoordinateSet, Segment};
use gb_io::seq::{After, Before, Feature as GbFeature, Location};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeatureType {
    Source,
    Cds,
    Gene,
    RRna,
    TRna,
    MiscFeature,
}

impl FeatureType {
    /// INSDC feature key.
    pub fn key(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Cds => "CDS",
            Self::Gene => "gene",
            Self::RRna => "rRNA",
            Self::TRna => "tRNA",
            Self::MiscFeature => "misc_feature",
        }
    }

    /// Kinds whose extent is a reading frame and gets translated.
    pub fn is_coding(self) -> bool {
        match self {
            Self::Cds | Self::Gene => true,
            Self::Source | Self::RRna | Self::TRna | Self::MiscFeature => false,
        }
    }

    /// Kinds that carry a `/product` qualifier.
    pub fn has_product(self) -> bool {
        match self {
            Self::Cds | Self::RRna | Self::TRna => true,
            Self::Source | Self::Gene | Self::MiscFeature => false,
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Ordered segments plus open-boundary flags. Segment order is reading order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureLocation {
    segments: Vec<Segment>,
    fuzzy_start: bool,
    fuzzy_end: bool,
}

impl FeatureLocation {
    /// `None` when there is nothing to locate.
    pub fn new(segments: Vec<Segment>) -> Option<Self> {
        if segments.is_empty() {
            return None;
        }
        Some(Self {
            segments,
            fuzzy_start: false,
            fuzzy_end: false,
        })
    }

    pub fn span(start: usize, end: usize) -> Self {
        Self {
            segments: vec![Segment::new(start, end)],
            fuzzy_start: false,
            fuzzy_end: false,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn start(&self) -> usize {
        self.segments.first().map(|s| s.start).unwrap_or_default()
    }

    pub fn end(&self) -> usize {
        self.segments.last().map(|s| s.end).unwrap_or_default()
    }

    pub fn is_compound(&self) -> bool {
        self.segments.len() > 1
    }

    pub fn fuzzy_start(&self) -> bool {
        self.fuzzy_start
    }

    pub fn fuzzy_end(&self) -> bool {
        self.fuzzy_end
    }

    pub fn with_fuzzy_start(self) -> Self {
        Self {
            fuzzy_start: true,
            ..self
        }
    }

    pub fn with_fuzzy_end(self) -> Self {
        Self {
            fuzzy_end: true,
            ..self
        }
    }

    /// Number of positions covered.
    pub fn len(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The location without its last `n` positions in reading order; the
    /// boundary flags are kept. `None` if nothing would remain.
    pub fn without_tail(&self, n: usize) -> Option<Self> {
        let segments = CoordinateSet::from_segments(&self.segments)
            .without_tail(n)
            .segments();
        Self::new(segments).map(|location| Self {
            fuzzy_start: self.fuzzy_start,
            fuzzy_end: self.fuzzy_end,
            ..location
        })
    }

    /// gb-io location: 0-based start, exclusive end, `Before`/`After` for open boundaries.
    pub fn to_gb_location(&self) -> Location {
        let last = self.segments.len().saturating_sub(1);
        let mut parts: Vec<Location> = self
            .segments
            .iter()
            .enumerate()
            .map(|(i, segment)| {
                Location::Range(
                    (
                        segment.start as i64 - 1,
                        Before(i == 0 && self.fuzzy_start),
                    ),
                    (segment.end as i64, After(i == last && self.fuzzy_end)),
                )
            })
            .collect();
        if parts.len() == 1 {
            parts.remove(0)
        } else {
            Location::Join(parts)
        }
    }
}

impl fmt::Display for FeatureLocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let last = self.segments.len().saturating_sub(1);
        let parts = self
            .segments
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let open_start = if i == 0 && self.fuzzy_start { "<" } else { "" };
                let open_end = if i == last && self.fuzzy_end { ">" } else { "" };
                format!("{open_start}{}..{open_end}{}", s.start, s.end)
            })
            .join(",");
        if self.is_compound() {
            write!(f, "join({parts})")
        } else {
            write!(f, "{parts}")
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub kind: FeatureType,
    pub location: FeatureLocation,
    pub qualifiers: Vec<(String, String)>,
    /// The charset the feature was built from; `None` for the source feature.
    pub charset_name: Option<String>,
}

impl Feature {
    pub fn qualifier(&self, key: &str) -> Option<&str> {
        self.qualifiers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Name used in log and report messages.
    pub fn label(&self) -> &str {
        self.charset_name.as_deref().unwrap_or(self.kind.key())
    }

    pub fn to_gb_feature(&self) -> GbFeature {
        GbFeature {
            kind: self.kind.key().into(),
            location: self.location.to_gb_location(),
            qualifiers: self
                .qualifiers
                .iter()
                .map(|(k, v)| (k.clone().into(), Some(v.clone())))
                .collect(),
        }
    }
}
