//! Remote service error types

use thiserror::Error;

/// The offending-field name the provisioning service reports when a batch of
/// members to move contains an invalid entry.
pub const MEMBER_FIELD: &str = "orgUnitUsersToMove";

/// Reason codes reported by the provisioning services in structured failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The named entity (account, group, org unit) does not exist
    EntityDoesNotExist,
    /// An entity with the requested name already exists
    EntityExists,
    /// The caller is not authorized to operate on the named domain
    DomainNotAuthorized,
    /// The domain itself is not recognized
    InvalidDomain,
    /// Any other reason code, carried verbatim
    Other(String),
}

impl RejectReason {
    /// Parse a reason string from a structured failure body.
    ///
    /// The legacy service spells the authorization failure as a free-form
    /// sentence rather than a code, so that one is matched on its prefix.
    pub fn parse(reason: &str) -> Self {
        match reason {
            "EntityDoesNotExist" => Self::EntityDoesNotExist,
            "EntityExists" => Self::EntityExists,
            "Invalid domain." => Self::InvalidDomain,
            r if r.starts_with("You are not authorized to perform operations on the domain ") => {
                Self::DomainNotAuthorized
            }
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EntityDoesNotExist => write!(f, "EntityDoesNotExist"),
            Self::EntityExists => write!(f, "EntityExists"),
            Self::DomainNotAuthorized => write!(f, "DomainNotAuthorized"),
            Self::InvalidDomain => write!(f, "InvalidDomain"),
            Self::Other(reason) => write!(f, "{reason}"),
        }
    }
}

/// Errors from or while talking to the remote provisioning services
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Structured rejection naming a reason code and optionally the offending
    /// request field
    #[error("request rejected: {reason}{}", .field.as_deref().map(|f| format!(" (field: {f})")).unwrap_or_default())]
    Rejected {
        reason: RejectReason,
        field: Option<String>,
    },

    /// Server-side failure with an HTTP status code
    #[error("provisioning API error: {code} - {message}")]
    ServerError { code: u16, message: String },

    /// Transport-level failure (connection, TLS, timeout)
    #[error("transport error: {message}")]
    Transport { message: String },

    /// Unexpected response shape or other unclassified failure
    #[error("service error: {message}")]
    Other { message: String },
}

impl ServiceError {
    /// Create a structured rejection
    pub fn rejected(reason: RejectReason, field: Option<&str>) -> Self {
        Self::Rejected {
            reason,
            field: field.map(str::to_string),
        }
    }

    /// Create a server error with status code and message
    pub fn server_error(code: u16, message: &str) -> Self {
        Self::ServerError {
            code,
            message: message.to_string(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create an unclassified service error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    pub(crate) fn from_reqwest(source: reqwest::Error) -> Self {
        if source.is_connect() || source.is_timeout() {
            Self::Transport {
                message: source.to_string(),
            }
        } else if let Some(status) = source.status() {
            Self::ServerError {
                code: status.as_u16(),
                message: source.to_string(),
            }
        } else {
            Self::Other {
                message: source.to_string(),
            }
        }
    }

    /// True when this failure is the recoverable invalid-member condition: the
    /// service rejected a membership batch because at least one member in it
    /// does not exist or is outside the caller's authorized domains.
    pub fn is_invalid_member(&self) -> bool {
        matches!(
            self,
            Self::Rejected {
                reason: RejectReason::EntityDoesNotExist
                    | RejectReason::DomainNotAuthorized
                    | RejectReason::InvalidDomain,
                field: Some(field),
            } if field == MEMBER_FIELD
        )
    }
}
