//! Org-unit command orchestrator
//!
//! Resolves a member source into identifiers, then drives the core batcher
//! and org-unit service. The CLI layer parses arguments; this module owns the
//! business logic between parsed commands and core calls.

use anyhow::{Context, Result};
use gwadm_client_core::{
    ClientConfig, DirectoryService, MemberId, MoveReport, OrgUnitBatcher, OrgUnitChanges,
    OrgUnitInfo, OrgUnitService,
};
use log::debug;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where the members of an org-unit update come from
#[derive(Debug, Clone)]
pub enum MemberSource {
    /// Identifiers given directly on the command line
    Literal(Vec<String>),
    /// A CSV file; the member identifier is the last column of each record
    File(PathBuf),
    /// All members of a group
    Group(String),
    /// All domain users not in a group
    NotInGroup(String),
}

/// Orchestrator for org-unit commands
pub struct OrgOrchestrator {
    directory: Arc<dyn DirectoryService>,
    org_units: Arc<dyn OrgUnitService>,
    config: ClientConfig,
}

impl OrgOrchestrator {
    pub fn new(
        directory: Arc<dyn DirectoryService>,
        org_units: Arc<dyn OrgUnitService>,
        config: ClientConfig,
    ) -> Self {
        Self {
            directory,
            org_units,
            config,
        }
    }

    /// Resolve a member source into a list of identifiers
    pub async fn assemble_members(&self, source: &MemberSource) -> Result<Vec<MemberId>> {
        let raw = match source {
            MemberSource::Literal(ids) => ids.clone(),
            MemberSource::File(path) => read_member_file(path)?,
            MemberSource::Group(group) => {
                debug!("fetching members of group '{group}'");
                return self
                    .directory
                    .group_members(group)
                    .await
                    .with_context(|| format!("Failed to list members of group '{group}'"));
            }
            MemberSource::NotInGroup(group) => {
                debug!("fetching domain users outside group '{group}'");
                let in_group: HashSet<String> = self
                    .directory
                    .group_members(group)
                    .await
                    .with_context(|| format!("Failed to list members of group '{group}'"))?
                    .into_iter()
                    .map(|m| m.qualified(&self.config.domain))
                    .collect();

                let all = self
                    .directory
                    .all_users()
                    .await
                    .context("Failed to list domain users")?;

                return Ok(all
                    .into_iter()
                    .filter(|m| !in_group.contains(&m.qualified(&self.config.domain)))
                    .collect());
            }
        };

        raw.iter()
            .map(|id| {
                MemberId::parse(id).with_context(|| format!("Invalid member identifier '{id}'"))
            })
            .collect()
    }

    /// Update an org unit: move members in and apply metadata changes
    pub async fn update(
        &self,
        unit: &str,
        source: Option<&MemberSource>,
        changes: &OrgUnitChanges,
    ) -> Result<MoveReport> {
        let members = match source {
            Some(source) => self.assemble_members(source).await?,
            None => Vec::new(),
        };

        debug!(
            "updating org unit '{unit}' with {} members, changes: {changes:?}",
            members.len()
        );

        let batcher = OrgUnitBatcher::with_config(
            self.directory.as_ref(),
            self.org_units.as_ref(),
            &self.config.domain,
            self.config.batcher_config(),
        );

        let report = batcher.move_into_unit(unit, members, changes).await?;
        Ok(report)
    }

    /// Create a new org unit
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        parent_path: &str,
        block_inheritance: bool,
    ) -> Result<()> {
        debug!("creating org unit '{name}' under '{parent_path}'");
        self.org_units
            .create_unit(name, description, parent_path, block_inheritance)
            .await
            .with_context(|| format!("Failed to create org unit '{name}'"))
    }

    /// Fetch org-unit metadata
    pub async fn info(&self, unit: &str) -> Result<OrgUnitInfo> {
        self.org_units
            .unit_info(unit)
            .await
            .with_context(|| format!("Failed to fetch org unit '{unit}'"))
    }

    /// Fetch the current membership of an org unit
    pub async fn members(&self, unit: &str) -> Result<Vec<MemberId>> {
        self.org_units
            .unit_members(unit)
            .await
            .with_context(|| format!("Failed to list members of org unit '{unit}'"))
    }
}

/// Read member identifiers from a CSV file, taking the last column of each
/// record. A plain one-identifier-per-line file is the single-column case.
fn read_member_file(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open member file '{}'", path.display()))?;

    let mut members = Vec::new();
    for record in reader.records() {
        let record =
            record.with_context(|| format!("Failed to read member file '{}'", path.display()))?;
        if let Some(last) = record.iter().next_back()
            && !last.is_empty()
        {
            members.push(last.to_string());
        }
    }

    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_single_column_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "alice@example.com").unwrap();
        writeln!(file, "bob").unwrap();
        file.flush().unwrap();

        let members = read_member_file(file.path()).unwrap();
        assert_eq!(members, vec!["alice@example.com", "bob"]);
    }

    #[test]
    fn test_read_multi_column_file_takes_last_column() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Alice,Anderson,alice@example.com").unwrap();
        writeln!(file, "Bob,Brown,bob@example.com").unwrap();
        file.flush().unwrap();

        let members = read_member_file(file.path()).unwrap();
        assert_eq!(members, vec!["alice@example.com", "bob@example.com"]);
    }

    #[test]
    fn test_read_missing_file_is_an_error() {
        let result = read_member_file(Path::new("/nonexistent/members.csv"));
        assert!(result.is_err());
    }
}
