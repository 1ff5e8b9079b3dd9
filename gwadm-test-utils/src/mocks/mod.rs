//! Mock implementations of the provisioning service seams

pub mod directory;
pub mod orgunits;

pub use directory::MockDirectory;
pub use orgunits::{MockOrgUnits, RecordedUpdate};
