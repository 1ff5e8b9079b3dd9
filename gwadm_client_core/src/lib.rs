//! gwadm Core Library
//!
//! Core library for administering a hosted groupware domain: collaborator
//! service seams over the remote provisioning API, an HTTP/JSON client for
//! them, and the batched org-unit membership updater.

pub mod batcher;
pub mod directory;
pub mod error;
pub mod member;
pub mod orgunit;
pub mod rest;

// Re-export main types
pub use batcher::{
    BatcherConfig, DEFAULT_BATCH_CEILING, DEFAULT_PREFILTER_THRESHOLD, MemberClass, MoveReport,
    OrgUnitBatcher, SkipReason, SkippedMember,
};
pub use directory::{AccountStatus, DirectoryService};
pub use error::{BatchError, Error, RejectReason, Result, ServiceError, ValidationError};
pub use member::MemberId;
pub use orgunit::{OrgUnitChanges, OrgUnitInfo, OrgUnitService};
pub use rest::RestProvisioningClient;

/// Core client configuration
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ClientConfig {
    /// Default domain scoping bare member identifiers
    pub domain: String,
    /// Base URL of the provisioning API
    pub base_url: String,
    /// Per-request timeout
    pub timeout_seconds: u64,
    /// Maximum members per org-unit update call
    pub batch_ceiling: usize,
    /// Request size above which the pre-filter activates
    pub prefilter_threshold: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            base_url: "https://apps.example.com/provisioning/v1".to_string(),
            timeout_seconds: 30,
            batch_ceiling: DEFAULT_BATCH_CEILING,
            prefilter_threshold: DEFAULT_PREFILTER_THRESHOLD,
        }
    }
}

impl ClientConfig {
    /// Batcher limits derived from this configuration
    pub fn batcher_config(&self) -> BatcherConfig {
        BatcherConfig {
            batch_ceiling: self.batch_ceiling,
            prefilter_threshold: self.prefilter_threshold,
        }
    }

    /// Create a test configuration
    pub fn test() -> Self {
        Self {
            domain: "example.com".to_string(),
            base_url: "http://localhost:9099/provisioning/v1".to_string(),
            timeout_seconds: 5,
            batch_ceiling: DEFAULT_BATCH_CEILING,
            prefilter_threshold: DEFAULT_PREFILTER_THRESHOLD,
        }
    }
}
