use super::require_name;
use crate::core::domain::error::ValidationError;

/// Renames a virtual disk attached to a VM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskRenameRequest {
    pub vm_name: String,
    pub disk_name: String,
    pub new_name: String,
}

impl DiskRenameRequest {
    pub fn new(
        vm_name: impl Into<String>,
        disk_name: impl Into<String>,
        new_name: impl Into<String>,
    ) -> Self {
        Self {
            vm_name: vm_name.into(),
            disk_name: disk_name.into(),
            new_name: new_name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_name("vm_name", &self.vm_name)?;
        require_name("disk_name", &self.disk_name)?;
        require_name("new_name", &self.new_name)
    }
}
