//! Conversion of annotated multiple sequence alignments into one flat-file
//! record per sequence, with charset coordinates kept valid through
//! ambiguity trimming and gap removal.

pub mod about;
pub mod charset_name;
pub mod checklist;
pub mod config;
pub mod coordinate_set;
pub mod degapping;
pub mod error;
pub mod feature;
pub mod feature_assembler;
pub mod gene_catalog;
pub mod genetic_code;
pub mod metadata;
pub mod nexus;
pub mod pipeline;
pub mod qualifiers;
pub mod record;
pub mod sequence;
pub mod translation_check;
pub mod trimming;

pub use error::AnnonexError;
pub use pipeline::{RecordOutcome, RecordPipeline};
