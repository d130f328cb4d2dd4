//! Per-sequence orchestration: trim, degap, assemble, translate, order.
//!
//! Each sequence moves through [`RecordStage`]s on its own copy of the
//! charsets; nothing is shared mutably between records, so records may be
//! processed on a rayon pool and are still returned in sorted name order.

use crate::{
    charset_name::{CharsetClass, CharsetNameClassifier},
    config::{FailurePolicy, PipelineConfig, StartCodonMode, Symbols},
    coordinate_set::Charsets,
    degapping::degap,
    error::{AnnonexError, FeatureFailure, RecordFailure},
    feature::Feature,
    feature_assembler::{
        assemble_ordered, build_regular_feature, build_source_feature, truncate_stop_codon,
    },
    gene_catalog::GeneCatalog,
    genetic_code::GeneticCode,
    metadata::{MetadataTable, QualifierRecord},
    nexus::Alignment,
    record::{Record, RecordHeader},
    sequence::Sequence,
    translation_check::TranslationValidator,
    trimming::{trim_leading, trim_trailing},
};
use annonex_protocol::{
    FeatureSummary, FeatureWarningSummary, RecordStatus, RecordSummary, RunReport,
};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordStage {
    Loaded,
    AmbiguityTrimmed,
    Degapped,
    SourceBuilt,
    FeaturesAssembled,
    TranslatedAndFuzzed,
    Sorted,
    Emitted,
}

/// A feature removed from an otherwise emitted record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureWarning {
    pub charset: String,
    pub cause: FeatureFailure,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordOutcome {
    Emitted(Record),
    EmittedWithWarnings(Record, Vec<FeatureWarning>),
    Dropped { name: String, cause: RecordFailure },
}

impl RecordOutcome {
    pub fn name(&self) -> &str {
        match self {
            Self::Emitted(record) | Self::EmittedWithWarnings(record, _) => &record.name,
            Self::Dropped { name, .. } => name,
        }
    }

    pub fn record(&self) -> Option<&Record> {
        match self {
            Self::Emitted(record) | Self::EmittedWithWarnings(record, _) => Some(record),
            Self::Dropped { .. } => None,
        }
    }

    pub fn is_dropped(&self) -> bool {
        matches!(self, Self::Dropped { .. })
    }

    pub fn error(&self) -> Option<AnnonexError> {
        match self {
            Self::Dropped { name, cause } => Some(AnnonexError::RecordUnrecoverable {
                name: name.clone(),
                cause: cause.clone(),
            }),
            Self::Emitted(_) | Self::EmittedWithWarnings(..) => None,
        }
    }

    pub fn summary(&self) -> RecordSummary {
        let features = |record: &Record| -> Vec<FeatureSummary> {
            record
                .regular_features()
                .map(|f| FeatureSummary {
                    charset: f.label().to_string(),
                    kind: f.kind.key().to_string(),
                    location: f.location.to_string(),
                })
                .collect()
        };
        match self {
            Self::Emitted(record) => RecordSummary {
                name: record.name.clone(),
                status: RecordStatus::Emitted,
                length: Some(record.sequence.len()),
                features: features(record),
                warnings: vec![],
                drop_reason: None,
            },
            Self::EmittedWithWarnings(record, warnings) => RecordSummary {
                name: record.name.clone(),
                status: RecordStatus::EmittedWithWarnings,
                length: Some(record.sequence.len()),
                features: features(record),
                warnings: warnings
                    .iter()
                    .map(|w| FeatureWarningSummary {
                        charset: w.charset.clone(),
                        reason: w.cause.to_string(),
                    })
                    .collect(),
                drop_reason: None,
            },
            Self::Dropped { name, cause } => RecordSummary {
                name: name.clone(),
                status: RecordStatus::Dropped,
                length: None,
                features: vec![],
                warnings: vec![],
                drop_reason: Some(cause.to_string()),
            },
        }
    }
}

pub struct RecordPipeline {
    config: PipelineConfig,
    symbols: Symbols,
    code: GeneticCode,
    catalog: GeneCatalog,
}

impl RecordPipeline {
    pub fn new(config: PipelineConfig, catalog: GeneCatalog) -> Result<Self, AnnonexError> {
        config.validate()?;
        Ok(Self {
            symbols: config.symbols()?,
            code: config.genetic_code()?,
            config,
            catalog,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn genetic_code(&self) -> &GeneticCode {
        &self.code
    }

    fn validator(&self) -> TranslationValidator<'_> {
        match self.config.start_codons {
            StartCodonMode::Canonical => TranslationValidator::canonical(&self.code),
            StartCodonMode::Table => TranslationValidator::from_table(&self.code),
        }
    }

    /// Classifies every charset name once for the whole run.
    pub fn classify_charsets(&self, charsets: &Charsets) -> BTreeMap<String, CharsetClass> {
        let classifier = CharsetNameClassifier::new(&self.catalog);
        charsets
            .keys()
            .map(|name| (name.clone(), classifier.classify(name)))
            .collect()
    }

    /// Runs one aligned sequence through every stage. Never fails as a
    /// whole: unusable records come back as [`RecordOutcome::Dropped`].
    pub fn process_record(
        &self,
        name: &str,
        aligned: &Sequence,
        charsets: &Charsets,
        classes: &BTreeMap<String, CharsetClass>,
        qualifiers: Option<&QualifierRecord>,
    ) -> RecordOutcome {
        let dropped = |cause: RecordFailure| {
            warn!("Sequence '{name}' dropped: {cause}");
            RecordOutcome::Dropped {
                name: name.to_string(),
                cause,
            }
        };
        let stage = |reached: RecordStage| debug!("{name}: {reached:?}");

        let Some(qualifiers) = qualifiers else {
            return dropped(RecordFailure::MissingMetadata);
        };
        stage(RecordStage::Loaded);

        let Symbols {
            ambiguity,
            gap,
            missing,
        } = self.symbols;
        let normalised = aligned.replace_symbol(missing, ambiguity);
        let trimmed = match trim_leading(&normalised, ambiguity, charsets)
            .and_then(|lead| trim_trailing(&lead.sequence, ambiguity, &lead.charsets))
        {
            Ok(trimmed) => trimmed,
            Err(cause) => return dropped(cause),
        };
        stage(RecordStage::AmbiguityTrimmed);

        let degapped = match degap(&trimmed.sequence, gap, &trimmed.charsets) {
            Ok(degapped) => degapped,
            Err(cause) => return dropped(cause),
        };
        let sequence = degapped.sequence;
        stage(RecordStage::Degapped);

        let mut warnings = vec![];
        let (present, lost): (Vec<_>, Vec<_>) =
            degapped.charsets.iter().partition(|(_, set)| !set.is_empty());
        for (charset, _) in lost {
            warnings.push(FeatureWarning {
                charset: charset.clone(),
                cause: FeatureFailure::EmptyLocation,
            });
        }

        let child_names: Vec<String> = present.iter().map(|(n, _)| (*n).clone()).collect();
        let source = build_source_feature(sequence.len(), qualifiers, &child_names, self.code.id());
        stage(RecordStage::SourceBuilt);

        let classifier = CharsetNameClassifier::new(&self.catalog);
        let regulars: Vec<Feature> = present
            .iter()
            .filter_map(|(charset, set)| {
                let class = classes
                    .get(*charset)
                    .cloned()
                    .unwrap_or_else(|| classifier.classify(charset));
                build_regular_feature(charset, set.segments(), &class)
            })
            .collect();
        stage(RecordStage::FeaturesAssembled);

        let validator = self.validator();
        let mut kept = vec![];
        for feature in regulars {
            let charset = feature.label().to_string();
            let checked = validator
                .check_and_fuzz(&sequence, feature)
                .and_then(|f| {
                    if self.config.truncate_stop_codon {
                        truncate_stop_codon(f)
                    } else {
                        Ok(f)
                    }
                });
            match checked {
                Ok(feature) => kept.push(feature),
                Err(cause) => warnings.push(FeatureWarning { charset, cause }),
            }
        }
        stage(RecordStage::TranslatedAndFuzzed);

        let features = assemble_ordered(source, kept);
        stage(RecordStage::Sorted);

        for w in &warnings {
            warn!(
                "{}",
                AnnonexError::FeatureQuality {
                    name: name.to_string(),
                    feature: w.charset.clone(),
                    cause: w.cause.clone(),
                }
            );
        }
        let record = Record {
            name: name.to_string(),
            header: RecordHeader::compose(&self.config, qualifiers, name),
            sequence,
            features,
        };
        stage(RecordStage::Emitted);
        if warnings.is_empty() {
            RecordOutcome::Emitted(record)
        } else {
            RecordOutcome::EmittedWithWarnings(record, warnings)
        }
    }

    /// Checks the metadata, then processes every sequence in sorted name
    /// order. Under [`FailurePolicy::FailFast`] the first dropped record in
    /// that order is returned as the error.
    pub fn run(
        &self,
        alignment: &Alignment,
        metadata: &MetadataTable,
    ) -> Result<Vec<RecordOutcome>, AnnonexError> {
        let uniq_col = self.config.uniq_seqid_col.as_str();
        metadata.check(uniq_col)?;
        let metadata = metadata.clone().without_empty_values();
        metadata.warn_unmatched(uniq_col, alignment.names());
        let index = metadata.index_by(uniq_col);
        let classes = self.classify_charsets(&alignment.charsets);
        let policy = self.config.policy;
        let fatal = |outcome: &RecordOutcome| outcome.error().filter(|e| e.is_fatal(policy));

        let names: Vec<&String> = alignment.sequences.keys().collect();
        let process = |name: &&String| {
            self.process_record(
                name,
                &alignment.sequences[*name],
                &alignment.charsets,
                &classes,
                index.get(name.as_str()).copied(),
            )
        };

        let outcomes: Vec<RecordOutcome> = if self.config.parallel {
            names.par_iter().map(process).collect()
        } else {
            let mut outcomes = vec![];
            for name in &names {
                let outcome = process(name);
                let stop = fatal(&outcome).is_some();
                outcomes.push(outcome);
                if stop {
                    break;
                }
            }
            outcomes
        };

        if let Some(err) = outcomes.iter().find_map(fatal) {
            return Err(err);
        }

        let with_warnings = outcomes
            .iter()
            .filter(|o| matches!(o, RecordOutcome::EmittedWithWarnings(..)))
            .count();
        let dropped = outcomes.iter().filter(|o| o.is_dropped()).count();
        info!(
            "{} records emitted ({with_warnings} with warnings), {dropped} dropped",
            outcomes.len() - dropped
        );
        Ok(outcomes)
    }

    pub fn report(&self, outcomes: &[RecordOutcome]) -> RunReport {
        RunReport::new(
            env!("CARGO_PKG_VERSION"),
            self.code.id(),
            outcomes.iter().map(RecordOutcome::summary).collect(),
        )
    }
}
