//! Directory/group service seam
//!
//! Narrow interface over the remote directory: single-account resolution
//! (used by the invalid-member classifier) and the two listing calls the CLI
//! uses to assemble membership requests from groups.

use crate::error::Result;
use crate::member::MemberId;

/// Outcome of resolving one account in one domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    /// The account exists in the queried domain
    Exists,
    /// No such account in the queried domain
    NotFound,
    /// The caller is not authorized for the queried domain, or the domain is
    /// not recognized
    NotAuthorized,
}

/// Service trait for directory and group lookups
#[async_trait::async_trait]
pub trait DirectoryService: Send + Sync {
    /// Resolve a bare local account name within a domain.
    ///
    /// Known ineligibility conditions (no such account, unauthorized domain)
    /// come back as `Ok` statuses; only genuinely unexpected failures are
    /// errors.
    async fn resolve_account(&self, domain: &str, local_part: &str) -> Result<AccountStatus>;

    /// All member identifiers of a named group
    async fn group_members(&self, group: &str) -> Result<Vec<MemberId>>;

    /// All user identifiers in the default domain (paginated internally; may
    /// be slow on large domains)
    async fn all_users(&self) -> Result<Vec<MemberId>>;
}
