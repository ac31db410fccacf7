use super::{Presence, require_name};
use crate::core::domain::error::ValidationError;

/// Membership of a VM in a server pool.
///
/// `Present` moves the VM out of any other pool first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerPoolMembershipRequest {
    pub vm_name: String,
    pub server_pool: String,
    pub presence: Presence,
}

impl ServerPoolMembershipRequest {
    pub fn new(vm_name: impl Into<String>, server_pool: impl Into<String>, presence: Presence) -> Self {
        Self {
            vm_name: vm_name.into(),
            server_pool: server_pool.into(),
            presence,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_name("vm_name", &self.vm_name)?;
        require_name("server_pool", &self.server_pool)
    }
}
