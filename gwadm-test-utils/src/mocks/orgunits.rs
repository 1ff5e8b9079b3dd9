//! Mock implementation of the org-unit service for testing

use gwadm_client_core::error::{Error, Result, ServiceError};
use gwadm_client_core::error::service::MEMBER_FIELD;
use gwadm_client_core::member::MemberId;
use gwadm_client_core::orgunit::{OrgUnitChanges, OrgUnitInfo, OrgUnitService};
use gwadm_client_core::RejectReason;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

/// One recorded org-unit update call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUpdate {
    pub unit: String,
    pub changes: OrgUnitChanges,
    pub members: Vec<MemberId>,
}

/// Mock org-unit service.
///
/// Default behavior mirrors the remote service: an update succeeds and its
/// members join the unit (moving an already-present member is a no-op), but
/// the whole batch is rejected with the structured invalid-member failure
/// when any member of it is in the configured rejected set. Scripted
/// failures, consumed one per update call, take precedence over that.
#[derive(Default)]
pub struct MockOrgUnits {
    members: Mutex<HashMap<String, Vec<MemberId>>>,
    infos: Mutex<HashMap<String, OrgUnitInfo>>,
    rejected_members: Mutex<HashSet<MemberId>>,
    scripted_failures: Mutex<VecDeque<ServiceError>>,
    listing_failure: Mutex<Option<String>>,
    updates: Mutex<Vec<RecordedUpdate>>,
    listing_calls: Mutex<usize>,
    created: Mutex<Vec<String>>,
}

impl MockOrgUnits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a unit's current membership
    pub fn set_members(&self, unit: &str, members: Vec<MemberId>) {
        self.members.lock().unwrap().insert(unit.to_string(), members);
    }

    /// Seed a unit's metadata
    pub fn set_info(&self, unit: &str, info: OrgUnitInfo) {
        self.infos.lock().unwrap().insert(unit.to_string(), info);
    }

    /// Make the service reject any batch containing this member
    pub fn reject_member(&self, member: &MemberId) {
        self.rejected_members.lock().unwrap().insert(member.clone());
    }

    /// Queue a failure for the next update call, ahead of normal behavior
    pub fn push_failure(&self, error: ServiceError) {
        self.scripted_failures.lock().unwrap().push_back(error);
    }

    /// Make membership listing fail with a server error
    pub fn fail_listing(&self, message: &str) {
        *self.listing_failure.lock().unwrap() = Some(message.to_string());
    }

    /// Every update call made so far, in order
    pub fn updates(&self) -> Vec<RecordedUpdate> {
        self.updates.lock().unwrap().clone()
    }

    /// How many membership listing calls were made
    pub fn listing_calls(&self) -> usize {
        *self.listing_calls.lock().unwrap()
    }

    /// Units created so far
    pub fn created(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }

    /// Current membership of a unit
    pub fn members_of(&self, unit: &str) -> Vec<MemberId> {
        self.members
            .lock()
            .unwrap()
            .get(unit)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl OrgUnitService for MockOrgUnits {
    async fn unit_info(&self, unit: &str) -> Result<OrgUnitInfo> {
        self.infos.lock().unwrap().get(unit).cloned().ok_or_else(|| {
            Error::Service(ServiceError::rejected(
                RejectReason::EntityDoesNotExist,
                Some("orgUnitPath"),
            ))
        })
    }

    async fn unit_members(&self, unit: &str) -> Result<Vec<MemberId>> {
        *self.listing_calls.lock().unwrap() += 1;
        if let Some(message) = self.listing_failure.lock().unwrap().as_ref() {
            return Err(Error::Service(ServiceError::server_error(503, message)));
        }
        Ok(self.members_of(unit))
    }

    async fn create_unit(
        &self,
        name: &str,
        description: Option<&str>,
        parent_path: &str,
        block_inheritance: bool,
    ) -> Result<()> {
        self.created.lock().unwrap().push(name.to_string());
        self.infos.lock().unwrap().insert(
            name.to_string(),
            OrgUnitInfo {
                name: name.to_string(),
                description: description.map(str::to_string),
                parent_path: Some(parent_path.to_string()),
                block_inheritance,
            },
        );
        Ok(())
    }

    async fn update_unit(
        &self,
        unit: &str,
        changes: &OrgUnitChanges,
        move_members: &[MemberId],
    ) -> Result<()> {
        self.updates.lock().unwrap().push(RecordedUpdate {
            unit: unit.to_string(),
            changes: changes.clone(),
            members: move_members.to_vec(),
        });

        if let Some(error) = self.scripted_failures.lock().unwrap().pop_front() {
            return Err(Error::Service(error));
        }

        let rejected = self.rejected_members.lock().unwrap();
        if move_members.iter().any(|m| rejected.contains(m)) {
            return Err(Error::Service(ServiceError::rejected(
                RejectReason::EntityDoesNotExist,
                Some(MEMBER_FIELD),
            )));
        }
        drop(rejected);

        let mut all = self.members.lock().unwrap();
        let current = all.entry(unit.to_string()).or_default();
        for member in move_members {
            if !current.contains(member) {
                current.push(member.clone());
            }
        }
        Ok(())
    }
}
