//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a remote mutation rejection.
///
/// The booking service refuses some updates once a cancellation or
/// modification threshold has passed. Those rejections are expected and
/// already covered by the optimistic overlay write, so callers suppress
/// them; everything else is surfaced for explicit operator handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    /// The cancellation/modification window has passed.
    TimeRestriction,
    /// Any other rejection; re-raised to the caller.
    Other,
}

/// Main error type for Bookdesk
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum BookdeskError {
    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Mutation rejected ({kind:?}): {message}")]
    MutationRejected { kind: RejectionKind, message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BookdeskError {
    /// True when the error is a rejection the optimistic overlay already
    /// accounts for.
    pub fn is_time_restriction(&self) -> bool {
        matches!(self, Self::MutationRejected { kind: RejectionKind::TimeRestriction, .. })
    }
}

/// Result type alias for Bookdesk operations
pub type Result<T> = std::result::Result<T, BookdeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_restriction_is_detected() {
        let err = BookdeskError::MutationRejected {
            kind: RejectionKind::TimeRestriction,
            message: "cancellation window passed".into(),
        };
        assert!(err.is_time_restriction());

        let err = BookdeskError::MutationRejected {
            kind: RejectionKind::Other,
            message: "validation failed".into(),
        };
        assert!(!err.is_time_restriction());
        assert!(!BookdeskError::Network("down".into()).is_time_restriction());
    }

    #[test]
    fn errors_serialize_with_tagged_representation() {
        let err = BookdeskError::Network("Failed to fetch bookings".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "Network");
        assert_eq!(json["message"], "Failed to fetch bookings");
    }
}
