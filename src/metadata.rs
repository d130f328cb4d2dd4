//! Per-sequence metadata read from a CSV table and the checks it must pass
//! before any record is built.

use crate::{error::AnnonexError, qualifiers::is_insdc_qualifier};
use csv::ReaderBuilder;
use log::{debug, warn};
use serde::Serialize;
use std::{
    collections::{HashMap, HashSet},
    fs::File,
    io::Read,
};

/// Field name to value for one sequence, in column order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct QualifierRecord {
    fields: Vec<(String, String)>,
}

impl QualifierRecord {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn without_empty_values(self) -> Self {
        Self {
            fields: self
                .fields
                .into_iter()
                .filter(|(_, v)| !v.trim().is_empty())
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MetadataTable {
    headers: Vec<String>,
    records: Vec<QualifierRecord>,
}

impl MetadataTable {
    pub fn from_path(path: &str) -> Result<Self, AnnonexError> {
        let file = File::open(path).map_err(|e| {
            AnnonexError::Io(std::io::Error::new(
                e.kind(),
                format!("Could not read metadata file '{path}': {e}"),
            ))
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AnnonexError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(|s| s.to_string()).collect();
        let mut records = vec![];
        for row in rdr.records() {
            let row = row?;
            let fields = headers
                .iter()
                .cloned()
                .zip(row.iter().map(|s| s.to_string()))
                .collect();
            records.push(QualifierRecord::new(fields));
        }
        debug!("read {} metadata records with {} columns", records.len(), headers.len());
        Ok(Self { headers, records })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[QualifierRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Verifies that the identifier column exists with a non-empty, unique
    /// value in every record, that every column is an INSDC qualifier and
    /// that all content is ASCII.
    pub fn check(&self, uniq_col: &str) -> Result<(), AnnonexError> {
        if !self.headers.iter().any(|h| h == uniq_col) {
            return Err(AnnonexError::MetadataQuality(format!(
                "Identifier column '{uniq_col}' not found in metadata"
            )));
        }

        let invalid: Vec<&str> = self
            .headers
            .iter()
            .map(String::as_str)
            .filter(|h| !is_insdc_qualifier(h))
            .collect();
        if !invalid.is_empty() {
            return Err(AnnonexError::MetadataQuality(format!(
                "Column names are not INSDC qualifiers: {}",
                invalid.join(", ")
            )));
        }

        let mut seen = HashSet::new();
        for (row, record) in self.records.iter().enumerate() {
            let id = record.get(uniq_col).unwrap_or_default();
            if id.is_empty() {
                return Err(AnnonexError::MetadataQuality(format!(
                    "Record {} has no value in identifier column '{uniq_col}'",
                    row + 1
                )));
            }
            if !seen.insert(id) {
                return Err(AnnonexError::MetadataQuality(format!(
                    "Identifier '{id}' occurs more than once in column '{uniq_col}'"
                )));
            }
            if let Some((field, _)) = record.iter().find(|(_, v)| !v.is_ascii()) {
                return Err(AnnonexError::MetadataQuality(format!(
                    "Field '{field}' of record '{id}' contains non-ASCII characters"
                )));
            }
        }
        Ok(())
    }

    /// Drops empty values so they never become empty qualifiers.
    pub fn without_empty_values(self) -> Self {
        Self {
            headers: self.headers,
            records: self
                .records
                .into_iter()
                .map(QualifierRecord::without_empty_values)
                .collect(),
        }
    }

    /// Records keyed by their identifier value. Records without one are skipped.
    pub fn index_by(&self, uniq_col: &str) -> HashMap<&str, &QualifierRecord> {
        self.records
            .iter()
            .filter_map(|r| r.get(uniq_col).map(|id| (id, r)))
            .collect()
    }

    /// Logs identifiers that do not name any alignment sequence.
    pub fn warn_unmatched<'a>(&self, uniq_col: &str, names: impl IntoIterator<Item = &'a str>) {
        let names: HashSet<&str> = names.into_iter().collect();
        for id in self.records.iter().filter_map(|r| r.get(uniq_col)) {
            if !names.contains(id) {
                warn!("Metadata record '{id}' matches no sequence of the alignment");
            }
        }
    }
}
