//! Org-unit service seam and update types

use crate::error::Result;
use crate::member::MemberId;
use serde::{Deserialize, Serialize};

/// Optional metadata fields of an org-unit update.
///
/// The batcher attaches these to the final membership call only, so a
/// rename/move/inherit change is applied exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgUnitChanges {
    pub new_name: Option<String>,
    pub description: Option<String>,
    pub parent_path: Option<String>,
    pub block_inheritance: Option<bool>,
}

impl OrgUnitChanges {
    /// True when no metadata field is set
    pub fn is_empty(&self) -> bool {
        self.new_name.is_none()
            && self.description.is_none()
            && self.parent_path.is_none()
            && self.block_inheritance.is_none()
    }
}

/// Metadata of an existing org unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgUnitInfo {
    pub name: String,
    pub description: Option<String>,
    pub parent_path: Option<String>,
    pub block_inheritance: bool,
}

/// Service trait for org-unit reads and updates
#[async_trait::async_trait]
pub trait OrgUnitService: Send + Sync {
    /// Metadata of one org unit
    async fn unit_info(&self, unit: &str) -> Result<OrgUnitInfo>;

    /// All current member identifiers of one org unit (paginated internally)
    async fn unit_members(&self, unit: &str) -> Result<Vec<MemberId>>;

    /// Create a new org unit
    async fn create_unit(
        &self,
        name: &str,
        description: Option<&str>,
        parent_path: &str,
        block_inheritance: bool,
    ) -> Result<()>;

    /// Apply metadata changes and/or move a batch of members into a unit.
    ///
    /// The service caps the member batch size; callers go through the batcher
    /// rather than calling this directly with large lists. A structured
    /// rejection names the reason code and the offending field.
    async fn update_unit(
        &self,
        unit: &str,
        changes: &OrgUnitChanges,
        move_members: &[MemberId],
    ) -> Result<()>;
}
