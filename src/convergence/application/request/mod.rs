//! Desired-state descriptions, one per resource concern.

pub mod network_request;
pub mod repository_request;
pub mod server_pool_request;
pub mod virtual_disk_request;
pub mod vm_request;
pub mod vm_state_request;
pub mod vnic_request;

use crate::core::domain::error::ValidationError;

/// Whether a resource or relationship should exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Presence {
    #[default]
    Present,
    Absent,
}

/// Rejects an empty name before any request is made.
pub(crate) fn require_name(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Field {
            field: field.to_string(),
            message: "Name cannot be empty".to_string(),
        });
    }
    Ok(())
}
