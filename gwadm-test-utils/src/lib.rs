//! Test utilities for the gwadm client
//!
//! This crate provides mock implementations of the directory and org-unit
//! service seams, with call recording and scriptable failures, for testing
//! the membership batcher and the CLI orchestrators without a live
//! provisioning API.

pub mod mocks;

// Re-export commonly used types
pub use mocks::{MockDirectory, MockOrgUnits, RecordedUpdate};
