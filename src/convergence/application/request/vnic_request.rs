use super::{Presence, require_name};
use crate::core::domain::error::ValidationError;

/// Presence of a vNIC on a VM.
///
/// Without a `vnic_name`, `Present` is satisfied by any vNIC and creates
/// `{vm_name}_VNIC` if the VM has none; `Absent` removes every vNIC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VnicRequest {
    pub vm_name: String,
    pub presence: Presence,
    pub vnic_name: Option<String>,
}

impl VnicRequest {
    pub fn new(vm_name: impl Into<String>, presence: Presence) -> Self {
        Self {
            vm_name: vm_name.into(),
            presence,
            vnic_name: None,
        }
    }

    #[must_use]
    pub fn named(mut self, vnic_name: impl Into<String>) -> Self {
        self.vnic_name = Some(vnic_name.into());
        self
    }

    /// Name used when a vNIC has to be created.
    pub fn effective_name(&self) -> String {
        self.vnic_name
            .clone()
            .unwrap_or_else(|| format!("{}_VNIC", self.vm_name))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_name("vm_name", &self.vm_name)?;
        if let Some(name) = &self.vnic_name {
            require_name("vnic_name", name)?;
        }
        Ok(())
    }
}
