//! Error types for the codec
//!
//! Decode helpers degrade to empty values instead of returning these; the
//! compose path and the batch dispatcher surface them to the caller.

use std::fmt;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors produced while decoding, validating, composing or dispatching mail.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// A draft precondition was violated.
    #[error("validation failed: {0}")]
    Validation(String),

    /// No base64 strategy could decode the input.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// No supported date format matched the input.
    #[error("unrecognized date format: {0}")]
    DateFormat(String),

    /// A provider message carried neither a part tree nor a raw body.
    #[error("message {0} has no payload")]
    MissingPayload(String),

    /// Writing a stage of the outbound message failed.
    #[error("failed to write {stage}: {source}")]
    Compose {
        stage: &'static str,
        #[source]
        source: fmt::Error,
    },

    /// One or more ids in a batch failed.
    #[error("failed to {label} {} messages: {}", .failures.len(), join_failures(.failures))]
    BatchPartialFailure {
        label: String,
        failures: Vec<BatchFailure>,
    },
}

impl CodecError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn compose(stage: &'static str) -> impl FnOnce(fmt::Error) -> Self {
        move |source| Self::Compose { stage, source }
    }

    /// Ids that failed in a batch, in dispatch order. Empty for other kinds.
    pub fn failed_ids(&self) -> Vec<&str> {
        match self {
            Self::BatchPartialFailure { failures, .. } => {
                failures.iter().map(|f| f.id.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// A single failed id within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub id: String,
    pub message: String,
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.message)
    }
}

fn join_failures(failures: &[BatchFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_failure_display() {
        let err = CodecError::BatchPartialFailure {
            label: "trash".to_string(),
            failures: vec![
                BatchFailure {
                    id: "m2".to_string(),
                    message: "not found".to_string(),
                },
                BatchFailure {
                    id: "m5".to_string(),
                    message: "rate limited".to_string(),
                },
            ],
        };

        assert_eq!(
            err.to_string(),
            "failed to trash 2 messages: m2: not found; m5: rate limited"
        );
        assert_eq!(err.failed_ids(), vec!["m2", "m5"]);
    }

    #[test]
    fn test_compose_error_names_stage() {
        let err = CodecError::compose("headers")(fmt::Error);
        assert!(err.to_string().starts_with("failed to write headers"));
        assert!(err.failed_ids().is_empty());
    }
}
