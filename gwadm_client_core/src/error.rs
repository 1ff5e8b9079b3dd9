//! Error types for the gwadm core library
//!
//! This module contains all error types used throughout the library, organized
//! into logical categories for better maintainability and clarity.

use thiserror::Error;

pub mod batch;
pub mod service;
pub mod validation;

pub use self::batch::BatchError;
pub use self::service::{RejectReason, ServiceError};
pub use self::validation::ValidationError;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the gwadm core library
///
/// Errors are categorized into three main types:
/// - Service errors: failures reported by or while talking to the remote
///   provisioning services
/// - Validation errors: input validation and configuration errors
/// - Batch errors: fatal failures of the org-unit membership batcher, with
///   enough context (batch index, members, reason) for manual remediation
#[derive(Error, Debug)]
pub enum Error {
    /// Remote service errors
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Validation related errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Membership batcher errors
    #[error(transparent)]
    Batch(#[from] BatchError),
}

impl From<reqwest::Error> for Error {
    fn from(source: reqwest::Error) -> Self {
        Self::Service(ServiceError::from_reqwest(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_rejection_error_creation() {
        let error = Error::Service(ServiceError::rejected(
            RejectReason::EntityDoesNotExist,
            Some("orgUnitUsersToMove"),
        ));

        match error {
            Error::Service(ServiceError::Rejected { reason, field }) => {
                assert_eq!(reason, RejectReason::EntityDoesNotExist);
                assert_eq!(field.as_deref(), Some("orgUnitUsersToMove"));
            }
            _ => panic!("Expected Service error"),
        }
    }

    #[test]
    fn test_invalid_configuration_error() {
        let message = "batch ceiling must be greater than 0";
        let error = Error::Validation(ValidationError::invalid_configuration(message));

        assert!(matches!(
            error,
            Error::Validation(ValidationError::InvalidConfiguration { .. })
        ));
        assert!(error.to_string().contains("Invalid configuration"));
        assert!(error.to_string().contains("batch ceiling"));
    }

    #[test]
    fn test_server_error_includes_status_code() {
        let error = Error::Service(ServiceError::server_error(503, "Service unavailable"));

        assert!(error.to_string().contains("503"));
        assert!(error.to_string().contains("Service unavailable"));
    }

    #[test]
    fn test_error_display_formatting() {
        let errors = vec![
            Error::Service(ServiceError::server_error(500, "Internal error")),
            Error::Service(ServiceError::transport("connection refused")),
            Error::Validation(ValidationError::invalid_configuration("bad setting")),
            Error::Validation(ValidationError::invalid_member_id("", "empty identifier")),
        ];

        for error in errors {
            let display_string = error.to_string();
            assert!(!display_string.is_empty());
        }
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn test_batch_error_source_chain() {
        let error = Error::Batch(BatchError::retry_exhausted(
            2,
            vec!["alice".to_string(), "bob".to_string()],
            ServiceError::server_error(409, "Conflict"),
        ));

        assert!(error.source().is_some());
        assert!(error.to_string().contains("batch 2"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_error() -> Result<()> {
            Err(Error::Validation(ValidationError::invalid_configuration(
                "test",
            )))
        }

        assert!(returns_error().is_err());
    }
}
