//! Domain-specific error types for farmsync
//!
//! Each subsystem has its own error enum so handlers can map failures to
//! HTTP statuses without string matching.
//!
//! # Error Categories
//!
//! - **SnapshotError**: snapshot parsing, validation, reference resolution and
//!   the transactional store writes of an import or the reads of an export
//! - **BlobError**: per-user sync blob save/load
//! - **AuthError**: account registration, login and token authentication
//!
//! # Examples
//!
//! ```rust
//! use farmsync::errors::SnapshotError;
//!
//! let err = SnapshotError::DanglingFarmReference {
//!     kind: "fuelRecords",
//!     record_id: 3,
//!     farm_id: 7,
//! };
//! assert!(err.is_client_error());
//! assert_eq!(err.error_code(), "REFERENTIAL_ERROR");
//! ```

pub mod auth;
pub mod blob;
pub mod snapshot;

pub use auth::AuthError;
pub use blob::BlobError;
pub use snapshot::SnapshotError;

/// Result type alias for snapshot import/export operations
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Result type alias for blob store operations
pub type BlobResult<T> = Result<T, BlobError>;

/// Result type alias for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_result_alias() {
        let result: SnapshotResult<()> = Err(SnapshotError::Structural("bad".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_blob_result_alias() {
        let result: BlobResult<()> = Err(BlobError::NotAnObject("array"));
        assert!(result.is_err());
    }

    #[test]
    fn test_auth_result_alias() {
        let result: AuthResult<()> = Err(AuthError::InvalidCredentials);
        assert!(result.is_err());
    }
}
