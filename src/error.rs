use thiserror::Error;

use crate::config::FailurePolicy;

/// Why a whole record had to be discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordFailure {
    #[error("no metadata record carries this sequence name")]
    MissingMetadata,
    #[error("sequence consists only of ambiguity symbols")]
    EmptyAfterTrim,
    #[error("sequence is empty after gap removal")]
    EmptyAfterDegap,
}

/// Why a single feature was removed from an otherwise usable record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureFailure {
    #[error("internal stop codon at codon {codon} (translation: {protein})")]
    InternalStop { codon: usize, protein: String },
    #[error("no alignment columns of the charset survive in this sequence")]
    EmptyLocation,
}

#[derive(Debug, Error)]
pub enum AnnonexError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Metadata error: {0}")]
    MetadataQuality(String),

    #[error("Sequence '{name}' dropped: {cause}")]
    RecordUnrecoverable {
        name: String,
        #[source]
        cause: RecordFailure,
    },

    #[error("Feature '{feature}' of sequence '{name}' dropped: {cause}")]
    FeatureQuality {
        name: String,
        feature: String,
        #[source]
        cause: FeatureFailure,
    },

    #[error("Could not parse {what}: {message}")]
    Parse { what: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl AnnonexError {
    pub fn parse(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            what: what.into(),
            message: message.into(),
        }
    }

    /// Whether the error ends the whole run under the given policy.
    pub fn is_fatal(&self, policy: FailurePolicy) -> bool {
        match self {
            Self::RecordUnrecoverable { .. } => policy == FailurePolicy::FailFast,
            Self::FeatureQuality { .. } => false,
            Self::Configuration(_)
            | Self::MetadataQuality(_)
            | Self::Parse { .. }
            | Self::Io(_)
            | Self::Csv(_)
            | Self::Json(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_failure_is_fatal_only_when_failing_fast() {
        let err = AnnonexError::RecordUnrecoverable {
            name: "taxon_X".to_string(),
            cause: RecordFailure::MissingMetadata,
        };
        assert!(err.is_fatal(FailurePolicy::FailFast));
        assert!(!err.is_fatal(FailurePolicy::BestEffort));
        assert!(err.to_string().contains("taxon_X"));
    }

    #[test]
    fn test_feature_failure_is_never_fatal() {
        let err = AnnonexError::FeatureQuality {
            name: "taxon_A".to_string(),
            feature: "matK_CDS".to_string(),
            cause: FeatureFailure::InternalStop {
                codon: 2,
                protein: "M*K*".to_string(),
            },
        };
        assert!(!err.is_fatal(FailurePolicy::FailFast));
        assert!(err.to_string().contains("matK_CDS"));
    }

    #[test]
    fn test_configuration_error_is_always_fatal() {
        let err = AnnonexError::Configuration("unknown translation table '99'".to_string());
        assert!(err.is_fatal(FailurePolicy::BestEffort));
    }
}
