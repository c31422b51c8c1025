use rust_decimal::Decimal;
use thiserror::Error;

/// A grading policy that cannot be used for calculation.
///
/// Raised once when the policy is built from configuration, never while a
/// cohort is being processed. Messages are meant to be shown to whoever
/// maintains the school's grade scale.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("grading policy has no grade bands")]
    NoBands,

    #[error("{field} is required")]
    Missing { field: String },

    #[error("{field} must be numeric, got {value}")]
    NonNumeric { field: String, value: String },

    #[error("{field} must be an integer, got {value}")]
    NonInteger { field: String, value: String },

    #[error("minSubjectsToPass must not be negative, got {value}")]
    NegativeMinSubjects { value: i64 },

    #[error("policy minScore {min} is greater than maxScore {max}")]
    InvertedDomain { min: Decimal, max: Decimal },

    #[error("band {index} ({grade}): minScore {min} is greater than maxScore {max}")]
    InvertedBand {
        index: usize,
        grade: String,
        min: Decimal,
        max: Decimal,
    },

    #[error("band {index} has a blank grade symbol")]
    BlankGrade { index: usize },

    #[error("grade {grade:?} is used by more than one band")]
    DuplicateGrade { grade: String },
}

impl ConfigurationError {
    /// Error code used in sidecar responses.
    pub fn code(&self) -> &'static str {
        "bad_config"
    }

    pub(crate) fn missing(field: impl Into<String>) -> Self {
        Self::Missing {
            field: field.into(),
        }
    }

    pub(crate) fn non_numeric(field: impl Into<String>, value: &serde_json::Value) -> Self {
        Self::NonNumeric {
            field: field.into(),
            value: value.to_string(),
        }
    }
}
