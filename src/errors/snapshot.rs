//! Snapshot import and export error types
//!
//! Three failure classes exist: the document itself is unusable
//! (structural), a flat record names a farm the document does not contain
//! (referential), or the store failed mid-operation (persistence). Only the
//! last one is the server's fault.

use sea_orm::DbErr;
use thiserror::Error;

/// Snapshot operation errors
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Malformed JSON, wrong root type, missing or mistyped fields
    #[error("Invalid snapshot: {0}")]
    Structural(String),

    /// The same id appears twice in one collection
    #[error("Duplicate id {id} in {kind}")]
    DuplicateId { kind: &'static str, id: i64 },

    /// A flat record references a farm absent from the same document
    #[error("Referenced farm not found: {kind} record {record_id} references farm {farm_id}")]
    DanglingFarmReference {
        kind: &'static str,
        record_id: i64,
        farm_id: i64,
    },

    /// The store rejected an operation; the surrounding transaction was rolled back
    #[error("Storage failure while {step}: {source}")]
    Persistence {
        step: String,
        #[source]
        source: DbErr,
    },
}

impl SnapshotError {
    pub fn structural(message: impl Into<String>) -> Self {
        SnapshotError::Structural(message.into())
    }

    pub fn persistence(step: impl Into<String>, source: DbErr) -> Self {
        SnapshotError::Persistence {
            step: step.into(),
            source,
        }
    }

    /// Check if this is a client error (400-series)
    pub fn is_client_error(&self) -> bool {
        !self.is_server_error()
    }

    /// Check if this is a server error (500-series)
    pub fn is_server_error(&self) -> bool {
        matches!(self, SnapshotError::Persistence { .. })
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            SnapshotError::Structural(_) => "STRUCTURAL_ERROR",
            SnapshotError::DuplicateId { .. } => "STRUCTURAL_ERROR",
            SnapshotError::DanglingFarmReference { .. } => "REFERENTIAL_ERROR",
            SnapshotError::Persistence { .. } => "PERSISTENCE_ERROR",
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(err: serde_json::Error) -> Self {
        SnapshotError::Structural(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_error() {
        let err = SnapshotError::structural("snapshot must be a JSON object, found array");
        assert_eq!(
            err.to_string(),
            "Invalid snapshot: snapshot must be a JSON object, found array"
        );
        assert!(err.is_client_error());
        assert_eq!(err.error_code(), "STRUCTURAL_ERROR");
    }

    #[test]
    fn test_duplicate_id_is_structural() {
        let err = SnapshotError::DuplicateId {
            kind: "farms",
            id: 4,
        };
        assert_eq!(err.to_string(), "Duplicate id 4 in farms");
        assert!(err.is_client_error());
        assert_eq!(err.error_code(), "STRUCTURAL_ERROR");
    }

    #[test]
    fn test_dangling_reference_names_kind_and_farm() {
        let err = SnapshotError::DanglingFarmReference {
            kind: "livestock",
            record_id: 2,
            farm_id: 99,
        };
        let message = err.to_string();
        assert!(message.contains("livestock"));
        assert!(message.contains("farm 99"));
        assert!(err.is_client_error());
        assert_eq!(err.error_code(), "REFERENTIAL_ERROR");
    }

    #[test]
    fn test_persistence_is_server_error() {
        let err = SnapshotError::persistence(
            "inserting farms",
            DbErr::Custom("disk I/O error".to_string()),
        );
        assert!(err.is_server_error());
        assert!(!err.is_client_error());
        assert_eq!(err.error_code(), "PERSISTENCE_ERROR");
        assert!(err.to_string().starts_with("Storage failure while inserting farms"));
    }

    #[test]
    fn test_serde_error_converts_to_structural() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = SnapshotError::from(json_err);
        assert_eq!(err.error_code(), "STRUCTURAL_ERROR");
    }
}
