//! ENA annotation checklists: tab-separated submissions for a fixed marker
//! instead of a full flat file.

use crate::{
    error::AnnonexError,
    feature::{Feature, FeatureType},
    record::Record,
};
use csv::WriterBuilder;
use serde::Serialize;
use std::{io::Write, str::FromStr};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChecklistType {
    /// trnK-matK locus with the matK coding region.
    TrnKMatK,
}

impl FromStr for ChecklistType {
    type Err = AnnonexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trnK_matK" => Ok(Self::TrnKMatK),
            other => Err(AnnonexError::Configuration(format!(
                "Checklist type '{other}' not recognized; supported: trnK_matK"
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
struct TrnKMatKRow<'a> {
    entrynumber: usize,
    organism_name: &'a str,
    isolate: &'a str,
    specimen_voucher: &'a str,
    country: &'a str,
    fiveprime_cds: String,
    threeprime_cds: String,
    fiveprime_partial: &'static str,
    threeprime_partial: &'static str,
    sequence: String,
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn is_matk_cds(feature: &Feature) -> bool {
    feature.kind == FeatureType::Cds
        && feature
            .qualifier("gene")
            .is_some_and(|g| g.eq_ignore_ascii_case("matk"))
}

impl ChecklistType {
    /// One row per record, numbered from 1 in the given order.
    pub fn write_tsv<W: Write>(&self, writer: W, records: &[&Record]) -> Result<(), AnnonexError> {
        match self {
            Self::TrnKMatK => write_trnk_matk(writer, records),
        }
    }
}

fn write_trnk_matk<W: Write>(writer: W, records: &[&Record]) -> Result<(), AnnonexError> {
    let mut wtr = WriterBuilder::new().delimiter(b'\t').from_writer(writer);
    for (index, record) in records.iter().enumerate() {
        let source = record.source();
        let value = |key: &str| source.and_then(|s| s.qualifier(key)).unwrap_or_default();
        let matk = record.regular_features().find(|f| is_matk_cds(f));
        wtr.serialize(TrnKMatKRow {
            entrynumber: index + 1,
            organism_name: value("organism"),
            isolate: value("isolate"),
            specimen_voucher: value("specimen_voucher"),
            country: value("country"),
            fiveprime_cds: matk
                .map(|f| f.location.start().to_string())
                .unwrap_or_default(),
            threeprime_cds: matk
                .map(|f| f.location.end().to_string())
                .unwrap_or_default(),
            fiveprime_partial: yes_no(matk.is_none_or(|f| f.location.fuzzy_start())),
            threeprime_partial: yes_no(matk.is_none_or(|f| f.location.fuzzy_end())),
            sequence: record.sequence.to_string(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::PipelineConfig, feature::FeatureLocation, metadata::QualifierRecord,
        record::RecordHeader, sequence::Sequence,
    };

    #[test]
    fn test_selector() {
        assert_eq!("trnK_matK".parse::<ChecklistType>().unwrap(), ChecklistType::TrnKMatK);
        assert!(matches!(
            "ITS".parse::<ChecklistType>(),
            Err(AnnonexError::Configuration(_))
        ));
    }

    #[test]
    fn test_trnk_matk_rows() {
        let quals = QualifierRecord::new(vec![
            ("isolate".to_string(), "taxon_A".to_string()),
            ("organism".to_string(), "Pyrus communis".to_string()),
        ]);
        let record = Record {
            name: "taxon_A".to_string(),
            sequence: Sequence::from_sequence("CCATGAAATAA"),
            features: vec![
                Feature {
                    kind: FeatureType::Source,
                    location: FeatureLocation::span(1, 11),
                    qualifiers: vec![
                        ("isolate".to_string(), "taxon_A".to_string()),
                        ("organism".to_string(), "Pyrus communis".to_string()),
                    ],
                    charset_name: None,
                },
                Feature {
                    kind: FeatureType::Cds,
                    location: FeatureLocation::span(3, 8).with_fuzzy_start(),
                    qualifiers: vec![("gene".to_string(), "matK".to_string())],
                    charset_name: Some("matK_CDS".to_string()),
                },
            ],
            header: RecordHeader::compose(&PipelineConfig::default(), &quals, "taxon_A"),
        };
        let mut out = vec![];
        ChecklistType::TrnKMatK
            .write_tsv(&mut out, &[&record])
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("entrynumber\torganism_name\tisolate"));
        assert_eq!(
            lines.next().unwrap(),
            "1\tPyrus communis\ttaxon_A\t\t\t3\t8\tyes\tno\tCCATGAAATAA"
        );
    }
}
