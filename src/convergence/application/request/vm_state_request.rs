use super::require_name;
use crate::core::domain::{error::ValidationError, model::vm::VmRunState};

/// Run state a VM should end up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmRunTarget {
    Started,
    Stopped,
    Suspended,
    Resumed,
}

impl VmRunTarget {
    /// Returns `true` if a VM in `state` needs no action.
    pub fn satisfied_by(&self, state: &VmRunState) -> bool {
        matches!(
            (self, state),
            (VmRunTarget::Started, VmRunState::Running)
                | (VmRunTarget::Resumed, VmRunState::Running)
                | (VmRunTarget::Stopped, VmRunState::Stopped)
                | (VmRunTarget::Suspended, VmRunState::Suspended)
        )
    }

    /// The verb appended to `/Vm/{id}/`.
    pub fn action(&self) -> &'static str {
        match self {
            VmRunTarget::Started => "start",
            VmRunTarget::Stopped => "stop",
            VmRunTarget::Suspended => "suspend",
            VmRunTarget::Resumed => "resume",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmStateRequest {
    pub vm_name: String,
    pub target: VmRunTarget,
}

impl VmStateRequest {
    pub fn new(vm_name: impl Into<String>, target: VmRunTarget) -> Self {
        Self {
            vm_name: vm_name.into(),
            target,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_name("vm_name", &self.vm_name)
    }
}
