use super::{Presence, require_name};
use crate::core::domain::{
    error::ValidationError,
    model::vm::{Vm, VmDomainType},
};
use crate::orchestration::application::request::{clone_request::CloneSource, disk_request::DiskSpec};
use serde::Serialize;

/// Memory sizes must be whole GiB expressed in MiB.
pub const MEMORY_ALIGNMENT: u64 = 1024;

/// CPU and memory sizing of a VM.
#[derive(Debug, Clone, PartialEq)]
pub struct VmSizing {
    pub cpu_count: u32,
    /// Defaults to `cpu_count`.
    pub cpu_count_limit: Option<u32>,
    /// Memory in MiB.
    pub memory: u64,
    /// Defaults to `memory`.
    pub memory_limit: Option<u64>,
    pub domain_type: VmDomainType,
}

impl VmSizing {
    pub fn effective_cpu_count_limit(&self) -> u32 {
        self.cpu_count_limit.unwrap_or(self.cpu_count)
    }

    pub fn effective_memory_limit(&self) -> u64 {
        self.memory_limit.unwrap_or(self.memory)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.cpu_count == 0 {
            return Err(ValidationError::Field {
                field: "cpu_count".to_string(),
                message: "A VM needs at least one virtual CPU".to_string(),
            });
        }
        if self.effective_cpu_count_limit() < self.cpu_count {
            return Err(ValidationError::ConstraintViolation(
                "cpu_count_limit < cpu_count".to_string(),
            ));
        }
        validate_memory(Some(self.memory), self.memory_limit)
    }

    /// Fields compared against an existing VM.
    ///
    /// Unset limits are left alone unless `current` holds one below the new
    /// base value; then the effective limit is sent, as on creation.
    pub(crate) fn as_properties(&self, current: &Vm) -> VmProperties {
        let cpu_count_limit = self.cpu_count_limit.or_else(|| {
            current
                .cpu_count_limit
                .filter(|limit| *limit < self.cpu_count)
                .map(|_| self.cpu_count)
        });
        let memory_limit = self.memory_limit.or_else(|| {
            current
                .memory_limit
                .filter(|limit| *limit < self.memory)
                .map(|_| self.memory)
        });
        VmProperties {
            cpu_count: Some(self.cpu_count),
            cpu_count_limit,
            memory: Some(self.memory),
            memory_limit,
            ..Default::default()
        }
    }
}

impl Default for VmSizing {
    fn default() -> Self {
        Self {
            cpu_count: 2,
            cpu_count_limit: None,
            memory: 4096,
            memory_limit: None,
            domain_type: VmDomainType::default(),
        }
    }
}

/// Checks memory alignment and ordering for whichever values are given.
pub fn validate_memory(memory: Option<u64>, memory_limit: Option<u64>) -> Result<(), ValidationError> {
    if let Some(memory) = memory {
        if memory == 0 || memory % MEMORY_ALIGNMENT != 0 {
            return Err(ValidationError::Field {
                field: "memory".to_string(),
                message: format!("memory must be a multiple of {} (got {})", MEMORY_ALIGNMENT, memory),
            });
        }
    }
    if let Some(limit) = memory_limit {
        if let Some(memory) = memory {
            if limit < memory {
                return Err(ValidationError::ConstraintViolation(format!(
                    "memory_limit ({}) < memory ({})",
                    limit, memory
                )));
            }
        }
        if limit % MEMORY_ALIGNMENT != 0 {
            return Err(ValidationError::Field {
                field: "memory_limit".to_string(),
                message: format!(
                    "memory_limit must be a multiple of {} (got {})",
                    MEMORY_ALIGNMENT, limit
                ),
            });
        }
    }
    Ok(())
}

/// Partial set of VM properties; unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VmProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_count_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_limit: Option<u64>,
    /// Any other manager-side property, by its wire name.
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl VmProperties {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require_name("name", name)?;
        }
        if let (Some(count), Some(limit)) = (self.cpu_count, self.cpu_count_limit) {
            if limit < count {
                return Err(ValidationError::ConstraintViolation(
                    "cpu_count_limit < cpu_count".to_string(),
                ));
            }
        }
        validate_memory(self.memory, self.memory_limit)
    }
}

/// Desired state of a whole VM: presence, sizing, disks and vNICs.
#[derive(Debug, Clone, PartialEq)]
pub struct VmRequest {
    pub name: String,
    pub presence: Presence,
    /// Pool the VM is created in.
    pub server_pool: String,
    /// Repository holding the VM configuration.
    pub repository: String,
    /// Sizing applied on creation; when set, also converged on an existing VM.
    pub sizing: Option<VmSizing>,
    /// Clone from a template instead of creating an empty VM.
    pub clone_from: Option<CloneSource>,
    pub disks: Vec<DiskSpec>,
    /// Names of vNICs the VM must carry.
    pub networks: Vec<String>,
}

impl VmRequest {
    pub fn new(
        name: impl Into<String>,
        server_pool: impl Into<String>,
        repository: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            presence: Presence::Present,
            server_pool: server_pool.into(),
            repository: repository.into(),
            sizing: None,
            clone_from: None,
            disks: Vec::new(),
            networks: Vec::new(),
        }
    }

    #[must_use]
    pub fn absent(mut self) -> Self {
        self.presence = Presence::Absent;
        self
    }

    #[must_use]
    pub fn with_sizing(mut self, sizing: VmSizing) -> Self {
        self.sizing = Some(sizing);
        self
    }

    #[must_use]
    pub fn cloned_from(mut self, source: CloneSource) -> Self {
        self.clone_from = Some(source);
        self
    }

    #[must_use]
    pub fn with_disk(mut self, disk: DiskSpec) -> Self {
        self.disks.push(disk);
        self
    }

    #[must_use]
    pub fn with_network(mut self, vnic_name: impl Into<String>) -> Self {
        self.networks.push(vnic_name.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_name("name", &self.name)?;
        if self.presence == Presence::Absent {
            return Ok(());
        }
        require_name("server_pool", &self.server_pool)?;
        require_name("repository", &self.repository)?;
        if let Some(sizing) = &self.sizing {
            sizing.validate()?;
        }
        if let Some(source) = &self.clone_from {
            source.validate()?;
        }
        for disk in &self.disks {
            disk.validate()?;
        }
        for network in &self.networks {
            require_name("networks", network)?;
        }
        Ok(())
    }
}

/// Partial update of an existing VM.
#[derive(Debug, Clone, PartialEq)]
pub struct VmModifyRequest {
    pub name: String,
    pub properties: VmProperties,
}

impl VmModifyRequest {
    pub fn new(name: impl Into<String>, properties: VmProperties) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_name("name", &self.name)?;
        self.properties.validate()
    }
}
