//! Turns degapped charsets and metadata into the ordered feature list of a record.

use crate::{
    charset_name::CharsetClass,
    coordinate_set::Segment,
    error::FeatureFailure,
    feature::{Feature, FeatureLocation, FeatureType},
    metadata::QualifierRecord,
};
use std::cmp::Ordering;

pub const DEFAULT_MOL_TYPE: &str = "genomic DNA";

/// Feature over `[1, sequence_len]` carrying the metadata qualifiers, the
/// translation table and the names of the charsets annotated on the record.
pub fn build_source_feature(
    sequence_len: usize,
    qualifiers: &QualifierRecord,
    child_charset_names: &[String],
    transl_table: u8,
) -> Feature {
    let mut quals: Vec<(String, String)> = qualifiers
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    if qualifiers.get("mol_type").is_none() {
        quals.push(("mol_type".to_string(), DEFAULT_MOL_TYPE.to_string()));
    }
    quals.push(("transl_table".to_string(), transl_table.to_string()));
    if !child_charset_names.is_empty() {
        quals.push((
            "note".to_string(),
            format!("annotated regions: {}", child_charset_names.join(", ")),
        ));
    }
    Feature {
        kind: FeatureType::Source,
        location: FeatureLocation::span(1, sequence_len),
        qualifiers: quals,
        charset_name: None,
    }
}

/// `None` when the charset lost all of its columns in this sequence.
pub fn build_regular_feature(
    charset_name: &str,
    segments: Vec<Segment>,
    class: &CharsetClass,
) -> Option<Feature> {
    let location = FeatureLocation::new(segments)?;
    let mut qualifiers = vec![];
    if class.feature_type != FeatureType::MiscFeature {
        if let Some(symbol) = &class.gene_symbol {
            qualifiers.push(("gene".to_string(), symbol.clone()));
        }
        if let (true, Some(product)) = (class.feature_type.has_product(), &class.product) {
            qualifiers.push(("product".to_string(), product.clone()));
        }
    }
    qualifiers.push(("note".to_string(), charset_name.to_string()));
    Some(Feature {
        kind: class.feature_type,
        location,
        qualifiers,
        charset_name: Some(charset_name.to_string()),
    })
}

/// Source first, then the rest by first-segment start; equal starts are
/// ordered by charset name.
pub fn assemble_ordered(source: Feature, mut regulars: Vec<Feature>) -> Vec<Feature> {
    regulars.sort_by(|a, b| match a.location.start().cmp(&b.location.start()) {
        Ordering::Equal => a.charset_name.cmp(&b.charset_name),
        other => other,
    });
    std::iter::once(source).chain(regulars).collect()
}

/// Drops the three positions of a confirmed stop codon from a coding feature.
/// Features with an open end keep their location.
pub fn truncate_stop_codon(feature: Feature) -> Result<Feature, FeatureFailure> {
    if !feature.kind.is_coding() || feature.location.fuzzy_end() {
        return Ok(feature);
    }
    let location = feature
        .location
        .without_tail(3)
        .ok_or(FeatureFailure::EmptyLocation)?;
    Ok(Feature {
        location,
        ..feature
    })
}
