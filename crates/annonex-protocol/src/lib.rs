//! Machine-readable run reports shared by the annonex library and its callers.

use serde::{Deserialize, Serialize};

pub const RUN_REPORT_SCHEMA: &str = "annonex.run_report.v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Emitted,
    EmittedWithWarnings,
    Dropped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSummary {
    pub charset: String,
    pub kind: String,
    /// INSDC location string, e.g. `join(<1..10,15..30)`.
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureWarningSummary {
    pub charset: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub name: String,
    pub status: RecordStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(default)]
    pub features: Vec<FeatureSummary>,
    #[serde(default)]
    pub warnings: Vec<FeatureWarningSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub schema: String,
    pub tool_version: String,
    pub transl_table: u8,
    pub records: Vec<RecordSummary>,
}

impl RunReport {
    pub fn new(tool_version: &str, transl_table: u8, records: Vec<RecordSummary>) -> Self {
        Self {
            schema: RUN_REPORT_SCHEMA.to_string(),
            tool_version: tool_version.to_string(),
            transl_table,
            records,
        }
    }

    pub fn count(&self, status: RecordStatus) -> usize {
        self.records.iter().filter(|r| r.status == status).count()
    }

    /// Records written to the output, with or without warnings.
    pub fn emitted(&self) -> usize {
        self.count(RecordStatus::Emitted) + self.count(RecordStatus::EmittedWithWarnings)
    }

    pub fn dropped(&self) -> usize {
        self.count(RecordStatus::Dropped)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> RunReport {
        RunReport::new(
            "0.1.0",
            11,
            vec![
                RecordSummary {
                    name: "taxon_A".to_string(),
                    status: RecordStatus::EmittedWithWarnings,
                    length: Some(120),
                    features: vec![FeatureSummary {
                        charset: "trnK_intron".to_string(),
                        kind: "misc_feature".to_string(),
                        location: "1..40".to_string(),
                    }],
                    warnings: vec![FeatureWarningSummary {
                        charset: "matK_CDS".to_string(),
                        reason: "internal stop codon at codon 2".to_string(),
                    }],
                    drop_reason: None,
                },
                RecordSummary {
                    name: "taxon_X".to_string(),
                    status: RecordStatus::Dropped,
                    length: None,
                    features: vec![],
                    warnings: vec![],
                    drop_reason: Some("no metadata record".to_string()),
                },
            ],
        )
    }

    #[test]
    fn test_counts() {
        let report = report();
        assert_eq!(report.emitted(), 1);
        assert_eq!(report.dropped(), 1);
        assert_eq!(report.count(RecordStatus::Emitted), 0);
    }

    #[test]
    fn test_json_shape() {
        let json = report().to_json_pretty().unwrap();
        assert!(json.contains("\"schema\": \"annonex.run_report.v1\""));
        assert!(json.contains("\"status\": \"emitted_with_warnings\""));
        let back: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["records"][1].get("length").is_none());
    }
}
