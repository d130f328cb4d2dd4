//! Run configuration, loadable from JSON and overridable from the command line.

use crate::{checklist::ChecklistType, error::AnnonexError, genetic_code::GeneticCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// The first dropped record ends the run.
    FailFast,
    /// Dropped records are reported and the run continues.
    BestEffort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartCodonMode {
    /// `ATG` only.
    Canonical,
    /// Every start codon of the translation table.
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    Linear,
    Circular,
}

impl From<Topology> for gb_io::seq::Topology {
    fn from(topology: Topology) -> Self {
        match topology {
            Topology::Linear => gb_io::seq::Topology::Linear,
            Topology::Circular => gb_io::seq::Topology::Circular,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub ambiguity_symbol: char,
    pub gap_symbol: char,
    /// Normalised to `ambiguity_symbol` before trimming.
    pub missing_symbol: char,
    pub uniq_seqid_col: String,
    pub transl_table: String,
    pub policy: FailurePolicy,
    pub parallel: bool,
    pub truncate_stop_codon: bool,
    pub start_codons: StartCodonMode,
    pub description: String,
    pub topology: Topology,
    pub division: String,
    pub seq_version: usize,
    pub checklist_type: Option<String>,
    pub gene_catalog: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ambiguity_symbol: 'N',
            gap_symbol: '-',
            missing_symbol: '?',
            uniq_seqid_col: "isolate".to_string(),
            transl_table: "11".to_string(),
            policy: FailurePolicy::BestEffort,
            parallel: false,
            truncate_stop_codon: true,
            start_codons: StartCodonMode::Canonical,
            description: String::new(),
            topology: Topology::Linear,
            division: "PLN".to_string(),
            seq_version: 1,
            checklist_type: None,
            gene_catalog: None,
        }
    }
}

impl PipelineConfig {
    pub fn load_from_path(path: &str) -> Result<Self, AnnonexError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AnnonexError::Configuration(format!("Could not read config file '{path}': {e}"))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            AnnonexError::Configuration(format!("Could not parse config JSON '{path}': {e}"))
        })
    }

    pub fn genetic_code(&self) -> Result<GeneticCode, AnnonexError> {
        GeneticCode::parse_id(&self.transl_table)
    }

    pub fn checklist(&self) -> Result<Option<ChecklistType>, AnnonexError> {
        self.checklist_type
            .as_deref()
            .map(str::parse::<ChecklistType>)
            .transpose()
    }

    /// The three sequence symbols as bytes; they must be distinct ASCII characters.
    pub fn symbols(&self) -> Result<Symbols, AnnonexError> {
        let ambiguity = symbol_byte("ambiguity", self.ambiguity_symbol)?;
        let gap = symbol_byte("gap", self.gap_symbol)?;
        let missing = symbol_byte("missing", self.missing_symbol)?;
        if ambiguity == gap || gap == missing {
            return Err(AnnonexError::Configuration(format!(
                "Gap symbol '{}' must differ from the ambiguity and missing symbols",
                self.gap_symbol
            )));
        }
        Ok(Symbols {
            ambiguity,
            gap,
            missing,
        })
    }

    /// Resolves every typed value once so that errors surface before any record is read.
    pub fn validate(&self) -> Result<(), AnnonexError> {
        self.genetic_code()?;
        self.checklist()?;
        self.symbols()?;
        if self.uniq_seqid_col.trim().is_empty() {
            return Err(AnnonexError::Configuration(
                "Identifier column name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbols {
    pub ambiguity: u8,
    pub gap: u8,
    pub missing: u8,
}

fn symbol_byte(role: &str, symbol: char) -> Result<u8, AnnonexError> {
    if symbol.is_ascii() && !symbol.is_ascii_whitespace() {
        Ok(symbol.to_ascii_uppercase() as u8)
    } else {
        Err(AnnonexError::Configuration(format!(
            "The {role} symbol '{symbol}' is not a printable ASCII character"
        )))
    }
}
