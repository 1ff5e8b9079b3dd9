//! Command orchestrators for business logic
//!
//! This module provides orchestrators that coordinate between the CLI layer
//! and the core library services.

pub mod org_orchestrator;

pub use org_orchestrator::{MemberSource, OrgOrchestrator};
