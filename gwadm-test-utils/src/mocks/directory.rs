//! Mock implementation of the directory service for testing

use gwadm_client_core::directory::{AccountStatus, DirectoryService};
use gwadm_client_core::error::{Error, Result, ServiceError};
use gwadm_client_core::member::MemberId;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Mock directory with configurable accounts, authorized domains, group
/// membership, and scriptable resolution failures. Every resolution probe is
/// recorded so tests can assert how many classification lookups were made.
#[derive(Default)]
pub struct MockDirectory {
    accounts: Mutex<HashSet<(String, String)>>,
    authorized_domains: Mutex<HashSet<String>>,
    groups: Mutex<HashMap<String, Vec<MemberId>>>,
    all_users: Mutex<Vec<MemberId>>,
    resolve_failures: Mutex<HashMap<(String, String), String>>,
    resolve_calls: Mutex<Vec<(String, String)>>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a domain as operable by the caller
    pub fn authorize_domain(&self, domain: &str) {
        self.authorized_domains
            .lock()
            .unwrap()
            .insert(domain.to_string());
    }

    /// Register an existing account as "local@domain"
    pub fn add_account(&self, qualified: &str) {
        let (local, domain) = qualified
            .split_once('@')
            .expect("add_account takes a qualified identifier");
        self.accounts
            .lock()
            .unwrap()
            .insert((domain.to_string(), local.to_string()));
    }

    /// Register several accounts at once
    pub fn add_accounts<'a>(&self, qualified: impl IntoIterator<Item = &'a str>) {
        for account in qualified {
            self.add_account(account);
        }
    }

    /// Set the membership of a named group
    pub fn set_group(&self, group: &str, members: Vec<MemberId>) {
        self.groups
            .lock()
            .unwrap()
            .insert(group.to_string(), members);
    }

    /// Set the full domain user population
    pub fn set_all_users(&self, users: Vec<MemberId>) {
        *self.all_users.lock().unwrap() = users;
    }

    /// Make resolution of one account fail with a transport error
    pub fn fail_resolve(&self, domain: &str, local_part: &str, message: &str) {
        self.resolve_failures.lock().unwrap().insert(
            (domain.to_string(), local_part.to_string()),
            message.to_string(),
        );
    }

    /// Every (domain, local_part) pair probed so far
    pub fn resolve_calls(&self) -> Vec<(String, String)> {
        self.resolve_calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DirectoryService for MockDirectory {
    async fn resolve_account(&self, domain: &str, local_part: &str) -> Result<AccountStatus> {
        self.resolve_calls
            .lock()
            .unwrap()
            .push((domain.to_string(), local_part.to_string()));

        if let Some(message) = self
            .resolve_failures
            .lock()
            .unwrap()
            .get(&(domain.to_string(), local_part.to_string()))
        {
            return Err(Error::Service(ServiceError::transport(message.clone())));
        }

        if !self.authorized_domains.lock().unwrap().contains(domain) {
            return Ok(AccountStatus::NotAuthorized);
        }
        let exists = self
            .accounts
            .lock()
            .unwrap()
            .contains(&(domain.to_string(), local_part.to_string()));
        Ok(if exists {
            AccountStatus::Exists
        } else {
            AccountStatus::NotFound
        })
    }

    async fn group_members(&self, group: &str) -> Result<Vec<MemberId>> {
        self.groups
            .lock()
            .unwrap()
            .get(group)
            .cloned()
            .ok_or_else(|| {
                Error::Service(ServiceError::rejected(
                    gwadm_client_core::RejectReason::EntityDoesNotExist,
                    Some("groupId"),
                ))
            })
    }

    async fn all_users(&self) -> Result<Vec<MemberId>> {
        Ok(self.all_users.lock().unwrap().clone())
    }
}
