//! Batched org-unit membership updates
//!
//! The provisioning API accepts at most a small fixed number of members per
//! org-unit update call, and fails a whole batch when any single member in it
//! is invalid. This module drains a membership request in bounded windows,
//! classifies and strips invalid members out of a failed window, resubmits the
//! pruned window exactly once, and attaches any metadata changes to the final
//! call only.
//!
//! Submission is strictly sequential: the update API is not safe for
//! concurrent partial updates to the same unit, and one-at-a-time directory
//! probes keep failure attribution unambiguous.

use crate::directory::{AccountStatus, DirectoryService};
use crate::error::{BatchError, Error, Result, ValidationError};
use crate::member::MemberId;
use crate::orgunit::{OrgUnitChanges, OrgUnitService};
use std::collections::{HashSet, VecDeque};

/// Batcher limits.
///
/// Both values encode undocumented, possibly API-version-specific service
/// limits, so they are overridable rather than hard-coded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatcherConfig {
    /// Maximum members per update call
    pub batch_ceiling: usize,
    /// Request size above which current membership is fetched first and
    /// already-present members are dropped before batching
    pub prefilter_threshold: usize,
}

/// Observed cap on members per org-unit update call
pub const DEFAULT_BATCH_CEILING: usize = 20;

/// Observed request size above which pre-filtering pays for itself
pub const DEFAULT_PREFILTER_THRESHOLD: usize = 50;

impl Default for BatcherConfig {
    fn default() -> Self {
        Self {
            batch_ceiling: DEFAULT_BATCH_CEILING,
            prefilter_threshold: DEFAULT_PREFILTER_THRESHOLD,
        }
    }
}

/// Why a member was skipped rather than moved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No such account in the member's domain
    NotFound,
    /// The member's domain is outside the caller's authorized domain set
    ForeignDomain,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "does not exist"),
            Self::ForeignDomain => write!(f, "outside authorized domains"),
        }
    }
}

/// One member skipped during an update, with its reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedMember {
    pub member: MemberId,
    pub reason: SkipReason,
}

/// Classification of one member identifier for org-unit eligibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberClass {
    Valid,
    InvalidNotFound,
    InvalidForeignDomain,
}

/// Aggregate result of one org-unit update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveReport {
    /// Members in the original request, before deduplication and pre-filtering
    pub requested: usize,
    /// Duplicate identifiers dropped from the request
    pub duplicates: usize,
    /// Members dropped by the pre-filter because they were already in the unit
    pub already_present: usize,
    /// Members successfully moved into the unit
    pub moved: usize,
    /// Members skipped as invalid, each with its reason
    pub skipped: Vec<SkippedMember>,
    /// Update calls made, counting failed submissions and resubmissions
    pub calls_made: usize,
    /// Whether metadata changes were applied on the final call
    pub metadata_applied: bool,
}

impl MoveReport {
    /// Members accounted for: moved plus skipped. Always equals the request
    /// size minus duplicates and pre-filtered members.
    pub fn processed(&self) -> usize {
        self.moved + self.skipped.len()
    }
}

/// Batched org-unit membership updater
pub struct OrgUnitBatcher<'a> {
    directory: &'a dyn DirectoryService,
    org_units: &'a dyn OrgUnitService,
    default_domain: String,
    config: BatcherConfig,
}

impl<'a> OrgUnitBatcher<'a> {
    pub fn new(
        directory: &'a dyn DirectoryService,
        org_units: &'a dyn OrgUnitService,
        default_domain: &str,
    ) -> Self {
        Self::with_config(directory, org_units, default_domain, BatcherConfig::default())
    }

    pub fn with_config(
        directory: &'a dyn DirectoryService,
        org_units: &'a dyn OrgUnitService,
        default_domain: &str,
        config: BatcherConfig,
    ) -> Self {
        Self {
            directory,
            org_units,
            default_domain: default_domain.to_string(),
            config,
        }
    }

    /// Move `members` into `unit`, applying `changes` on the final call.
    ///
    /// Completed batches stay committed when a later batch fails; the
    /// operation is atomic per call, not across its full scope. The returned
    /// error names the failing batch and its members.
    pub async fn move_into_unit(
        &self,
        unit: &str,
        members: Vec<MemberId>,
        changes: &OrgUnitChanges,
    ) -> Result<MoveReport> {
        if self.config.batch_ceiling == 0 {
            return Err(Error::Validation(ValidationError::invalid_parameter(
                "batch_ceiling",
                "must be greater than 0",
            )));
        }

        let mut report = MoveReport {
            requested: members.len(),
            ..Default::default()
        };

        // A member must not appear in more than one window
        let mut seen = HashSet::new();
        let mut queue: VecDeque<MemberId> = members
            .into_iter()
            .filter(|m| seen.insert(m.qualified(&self.default_domain)))
            .collect();
        report.duplicates = report.requested - queue.len();
        if report.duplicates > 0 {
            log::debug!(
                "dropped {} duplicate identifiers from the request",
                report.duplicates
            );
        }

        if queue.len() > self.config.prefilter_threshold {
            self.prefilter(unit, &mut queue, &mut report).await?;
        }

        if queue.is_empty() && changes.is_empty() {
            return Ok(report);
        }

        let total = queue.len();
        let no_changes = OrgUnitChanges::default();
        let mut processed = 0usize;
        let mut batch_index = 0usize;

        loop {
            let take = queue.len().min(self.config.batch_ceiling);
            let window: Vec<MemberId> = queue.drain(..take).collect();
            let last = queue.is_empty();
            let call_changes = if last { changes } else { &no_changes };

            if !window.is_empty() {
                log::info!(
                    "moving members {}..{} of {} into org unit '{}'",
                    processed + 1,
                    processed + window.len(),
                    total,
                    unit
                );
            } else {
                log::info!("applying metadata changes to org unit '{unit}'");
            }

            match self.org_units.update_unit(unit, call_changes, &window).await {
                Ok(()) => {
                    report.calls_made += 1;
                    report.moved += window.len();
                    if last {
                        report.metadata_applied = !changes.is_empty();
                    }
                }
                Err(Error::Service(err)) if err.is_invalid_member() && !window.is_empty() => {
                    report.calls_made += 1;
                    self.retry_pruned(unit, &window, call_changes, batch_index, last, &mut report)
                        .await?;
                }
                Err(Error::Service(err)) => {
                    report.calls_made += 1;
                    return Err(BatchError::submission(batch_index, names(&window), err).into());
                }
                Err(other) => return Err(other),
            }

            processed += window.len();
            batch_index += 1;
            if last {
                break;
            }
        }

        Ok(report)
    }

    /// Classify one member for org-unit eligibility via a directory probe.
    ///
    /// Unknown resolution failures are surfaced, never treated as valid:
    /// optimistically keeping an unclassifiable member would resubmit a batch
    /// that fails identically.
    pub async fn classify(&self, member: &MemberId) -> Result<MemberClass> {
        let (domain, local_part) = member.scope(&self.default_domain);
        match self.directory.resolve_account(domain, local_part).await {
            Ok(AccountStatus::Exists) => Ok(MemberClass::Valid),
            Ok(AccountStatus::NotFound) => Ok(MemberClass::InvalidNotFound),
            Ok(AccountStatus::NotAuthorized) => Ok(MemberClass::InvalidForeignDomain),
            Err(Error::Service(err)) => {
                Err(BatchError::classification(member.as_str(), err).into())
            }
            Err(other) => Err(other),
        }
    }

    /// Fetch the unit's current membership and drop already-present members
    /// from the queue. A listing failure is fatal; no partial pre-filtering.
    async fn prefilter(
        &self,
        unit: &str,
        queue: &mut VecDeque<MemberId>,
        report: &mut MoveReport,
    ) -> Result<()> {
        log::info!(
            "{} members requested; fetching current membership of '{unit}' to pre-filter",
            queue.len()
        );
        let present: HashSet<String> = self
            .org_units
            .unit_members(unit)
            .await?
            .into_iter()
            .map(|m| m.qualified(&self.default_domain))
            .collect();

        let before = queue.len();
        queue.retain(|m| !present.contains(&m.qualified(&self.default_domain)));
        report.already_present = before - queue.len();
        if report.already_present > 0 {
            log::info!(
                "{} members already in org unit '{unit}' and won't be re-added",
                report.already_present
            );
        }
        Ok(())
    }

    /// Probe every member of a failed window, record and log the invalid
    /// ones, and resubmit the pruned window once. A second failure is fatal.
    async fn retry_pruned(
        &self,
        unit: &str,
        window: &[MemberId],
        call_changes: &OrgUnitChanges,
        batch_index: usize,
        last: bool,
        report: &mut MoveReport,
    ) -> Result<()> {
        let mut kept = Vec::with_capacity(window.len());
        for member in window {
            match self.classify(member).await? {
                MemberClass::Valid => kept.push(member.clone()),
                MemberClass::InvalidNotFound => {
                    log::warn!("not adding non-existent user {member}");
                    report.skipped.push(SkippedMember {
                        member: member.clone(),
                        reason: SkipReason::NotFound,
                    });
                }
                MemberClass::InvalidForeignDomain => {
                    log::warn!("not adding external user {member}");
                    report.skipped.push(SkippedMember {
                        member: member.clone(),
                        reason: SkipReason::ForeignDomain,
                    });
                }
            }
        }

        if kept.is_empty() && call_changes.is_empty() {
            // Whole window was invalid and nothing else rides on this call
            return Ok(());
        }

        match self.org_units.update_unit(unit, call_changes, &kept).await {
            Ok(()) => {
                report.calls_made += 1;
                report.moved += kept.len();
                if last {
                    report.metadata_applied = !call_changes.is_empty();
                }
                Ok(())
            }
            Err(Error::Service(err)) => {
                report.calls_made += 1;
                Err(BatchError::retry_exhausted(batch_index, names(&kept), err).into())
            }
            Err(other) => Err(other),
        }
    }
}

fn names(members: &[MemberId]) -> Vec<String> {
    members.iter().map(|m| m.as_str().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_observed_limits() {
        let config = BatcherConfig::default();
        assert_eq!(config.batch_ceiling, 20);
        assert_eq!(config.prefilter_threshold, 50);
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::NotFound.to_string(), "does not exist");
        assert_eq!(
            SkipReason::ForeignDomain.to_string(),
            "outside authorized domains"
        );
    }

    #[test]
    fn test_report_processed_counts_moved_and_skipped() {
        let report = MoveReport {
            requested: 5,
            moved: 3,
            skipped: vec![
                SkippedMember {
                    member: MemberId::parse("ghost").unwrap(),
                    reason: SkipReason::NotFound,
                },
                SkippedMember {
                    member: MemberId::parse("ext@other.com").unwrap(),
                    reason: SkipReason::ForeignDomain,
                },
            ],
            ..Default::default()
        };
        assert_eq!(report.processed(), 5);
    }
}
