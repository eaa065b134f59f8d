//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Tempora
///
/// Variants derive `Clone` so that a single failed fetch can be observed by
/// every caller sharing the same in-flight handle.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum TemporaError {
    /// Transient backing-store failure while loading a month bucket. The
    /// bucket is left absent so a later call can retry.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// The backing store rejected a create/update/delete. The cache is left
    /// untouched; it is only ever patched from a confirmed result.
    #[error("Mutation rejected: {0}")]
    MutationRejected(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Tempora operations
pub type Result<T> = std::result::Result<T, TemporaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_serialize_with_tagged_representation() {
        let err = TemporaError::Fetch("connection reset".into());
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["type"], "Fetch");
        assert_eq!(json["message"], "connection reset");
    }

    #[test]
    fn errors_round_trip_and_clone() {
        let err = TemporaError::MutationRejected("stale id".into());
        let json = serde_json::to_string(&err).unwrap();
        let back: TemporaError = serde_json::from_str(&json).unwrap();

        assert_eq!(back, err.clone());
        assert_eq!(back.to_string(), "Mutation rejected: stale id");
    }
}
