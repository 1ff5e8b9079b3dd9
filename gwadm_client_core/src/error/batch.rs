//! Membership batcher error types
//!
//! Every fatal batcher failure names the batch it happened in and the members
//! that batch carried, so an operator can correct the source list and re-run.

use super::service::ServiceError;
use thiserror::Error;

/// Fatal failures of the org-unit membership batcher
#[derive(Error, Debug)]
pub enum BatchError {
    /// A batch submission failed with something other than the recoverable
    /// invalid-member condition
    #[error("batch {index} ({} members) failed: {source}; members: {}", .members.len(), .members.join(" "))]
    Submission {
        index: usize,
        members: Vec<String>,
        #[source]
        source: ServiceError,
    },

    /// The pruned batch (invalid members removed) failed a second time; this
    /// signals a conflict unrelated to member validity and is not retried
    #[error("batch {index} failed again after removing invalid members: {source}; members: {}", .members.join(" "))]
    RetryExhausted {
        index: usize,
        members: Vec<String>,
        #[source]
        source: ServiceError,
    },

    /// A classification probe failed in a way that is neither not-found nor
    /// not-authorized; treating it as valid would resubmit a batch doomed to
    /// fail identically, so it is surfaced instead
    #[error("could not classify member '{member}': {source}")]
    Classification {
        member: String,
        #[source]
        source: ServiceError,
    },
}

impl BatchError {
    pub fn submission(index: usize, members: Vec<String>, source: ServiceError) -> Self {
        Self::Submission {
            index,
            members,
            source,
        }
    }

    pub fn retry_exhausted(index: usize, members: Vec<String>, source: ServiceError) -> Self {
        Self::RetryExhausted {
            index,
            members,
            source,
        }
    }

    pub fn classification(member: &str, source: ServiceError) -> Self {
        Self::Classification {
            member: member.to_string(),
            source,
        }
    }

    /// The index of the batch this failure happened in, where applicable
    pub fn batch_index(&self) -> Option<usize> {
        match self {
            Self::Submission { index, .. } | Self::RetryExhausted { index, .. } => Some(*index),
            Self::Classification { .. } => None,
        }
    }
}
