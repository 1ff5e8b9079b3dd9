//! gwadm CLI library
//!
//! Command orchestration, configuration, and output rendering for the `gwadm`
//! binary. The heavy lifting lives in `gwadm_client_core`; this crate turns
//! parsed commands into core calls and renders the results.

pub mod config;
pub mod error;
pub mod orchestrators;
pub mod output;
pub mod terminal;
