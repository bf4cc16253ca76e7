use std::fmt::Display;

use thiserror::Error;

/// Errors the matching engine reports to its immediate caller.
///
/// Both kinds are caller mistakes and are never retried internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A résumé or job record breaks a structural invariant.
    #[error("Invalid record: field `{field}` = `{value}`: {reason}")]
    InvalidRecord {
        field: String,
        value: String,
        reason: String,
    },

    /// Engine settings are unusable; raised once at construction.
    #[error("Configuration error: field `{field}` = `{value}`: {reason}")]
    Configuration {
        field: String,
        value: String,
        reason: String,
    },
}

impl EngineError {
    pub fn invalid_record(
        field: impl Into<String>,
        value: impl Display,
        reason: impl Into<String>,
    ) -> Self {
        EngineError::InvalidRecord {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn configuration(
        field: impl Into<String>,
        value: impl Display,
        reason: impl Into<String>,
    ) -> Self {
        EngineError::Configuration {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Re-roots the field path under `prefix`, e.g. `skills[0].weight`
    /// becomes `candidates[3].resume.skills[0].weight`.
    pub fn within(self, prefix: &str) -> Self {
        match self {
            EngineError::InvalidRecord { field, value, reason } => EngineError::InvalidRecord {
                field: format!("{prefix}.{field}"),
                value,
                reason,
            },
            EngineError::Configuration { field, value, reason } => EngineError::Configuration {
                field: format!("{prefix}.{field}"),
                value,
                reason,
            },
        }
    }

    pub fn field(&self) -> &str {
        match self {
            EngineError::InvalidRecord { field, .. } => field,
            EngineError::Configuration { field, .. } => field,
        }
    }
}
