//! A finished annotation record and its GenBank serialisation.

use crate::{
    config::{PipelineConfig, Topology},
    feature::{Feature, FeatureType},
    metadata::QualifierRecord,
    sequence::Sequence,
};
use gb_io::seq::{Seq, Source};
use std::io::Write;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordHeader {
    pub definition: String,
    pub organism: Option<String>,
    pub topology: Topology,
    pub division: String,
    pub version: usize,
    pub molecule_type: String,
}

impl RecordHeader {
    /// Definition line `<description> <organism> <identifier>`, skipping missing parts.
    pub fn compose(config: &PipelineConfig, qualifiers: &QualifierRecord, name: &str) -> Self {
        let organism = qualifiers.get("organism").map(str::to_string);
        let identifier = qualifiers.get(&config.uniq_seqid_col).unwrap_or(name);
        let definition = [
            config.description.trim(),
            organism.as_deref().unwrap_or_default(),
            identifier,
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
        Self {
            definition,
            organism,
            topology: config.topology,
            division: config.division.clone(),
            version: config.seq_version,
            molecule_type: "DNA".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub sequence: Sequence,
    /// Source first, then by ascending start.
    pub features: Vec<Feature>,
    pub header: RecordHeader,
}

impl Record {
    pub fn source(&self) -> Option<&Feature> {
        self.features.iter().find(|f| f.kind == FeatureType::Source)
    }

    pub fn regular_features(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter().filter(|f| f.kind != FeatureType::Source)
    }

    pub fn to_gb_seq(&self) -> Seq {
        Seq {
            name: Some(self.name.clone()),
            topology: self.header.topology.into(),
            date: None,
            len: Some(self.sequence.len()),
            molecule_type: Some(self.header.molecule_type.clone()),
            division: self.header.division.clone(),
            definition: Some(self.header.definition.clone()),
            accession: None,
            version: Some(self.header.version.to_string()),
            source: self.header.organism.as_ref().map(|organism| Source {
                source: organism.clone(),
                organism: Some(organism.clone()),
            }),
            dblink: None,
            keywords: None,
            references: vec![],
            comments: vec![],
            seq: self.sequence.as_bytes().to_vec(),
            contig: None,
            features: self.features.iter().map(Feature::to_gb_feature).collect(),
        }
    }

    pub fn write_genbank<W: Write>(&self, writer: W) -> std::io::Result<()> {
        gb_io::writer::write(writer, &self.to_gb_seq())
            .map_err(|e| std::io::Error::other(e.to_string()))
    }
}

/// Writes all records into one flat file, one entry after the other.
pub fn write_genbank_records<W: Write>(mut writer: W, records: &[&Record]) -> std::io::Result<()> {
    for record in records {
        record.write_genbank(&mut writer)?;
    }
    writer.flush()
}
