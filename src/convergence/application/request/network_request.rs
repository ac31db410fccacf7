use super::require_name;
use crate::core::domain::error::ValidationError;

/// Attaches a VM's vNIC to a network.
///
/// `vnic_name` may be left out when the VM has exactly one vNIC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkAttachmentRequest {
    pub vm_name: String,
    pub network: String,
    pub vnic_name: Option<String>,
}

impl NetworkAttachmentRequest {
    pub fn new(vm_name: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            vm_name: vm_name.into(),
            network: network.into(),
            vnic_name: None,
        }
    }

    #[must_use]
    pub fn on_vnic(mut self, vnic_name: impl Into<String>) -> Self {
        self.vnic_name = Some(vnic_name.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_name("vm_name", &self.vm_name)?;
        require_name("network", &self.network)?;
        if let Some(name) = &self.vnic_name {
            require_name("vnic_name", name)?;
        }
        Ok(())
    }
}
