//! Validation related error types

use thiserror::Error;

/// Validation and configuration errors
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// Malformed member identifier
    #[error("Invalid member identifier '{member}': {reason}")]
    InvalidMemberId { member: String, reason: String },

    /// Invalid input parameter
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter { parameter: String, reason: String },

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField { field: String },
}

impl ValidationError {
    /// Create an invalid configuration error
    pub fn invalid_configuration(message: &str) -> Self {
        Self::InvalidConfiguration {
            message: message.to_string(),
        }
    }

    /// Create a malformed member identifier error
    pub fn invalid_member_id(member: &str, reason: &str) -> Self {
        Self::InvalidMemberId {
            member: member.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: &str, reason: &str) -> Self {
        Self::InvalidParameter {
            parameter: parameter.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: &str) -> Self {
        Self::MissingField {
            field: field.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_error() {
        let error = ValidationError::invalid_configuration("Bad config");
        assert!(error.to_string().contains("Invalid configuration"));
        assert!(error.to_string().contains("Bad config"));
    }

    #[test]
    fn test_invalid_member_id_error() {
        let error = ValidationError::invalid_member_id("user@@example.com", "multiple '@'");
        assert!(error.to_string().contains("user@@example.com"));
        assert!(error.to_string().contains("multiple '@'"));
    }

    #[test]
    fn test_invalid_parameter_error() {
        let error = ValidationError::invalid_parameter("batch_ceiling", "must be positive");
        assert!(error.to_string().contains("Invalid parameter"));
        assert!(error.to_string().contains("batch_ceiling"));
        assert!(error.to_string().contains("must be positive"));
    }

    #[test]
    fn test_missing_field_error() {
        let error = ValidationError::missing_field("org_unit");
        assert!(error.to_string().contains("Missing required field"));
        assert!(error.to_string().contains("org_unit"));
    }
}
