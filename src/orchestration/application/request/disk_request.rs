use crate::convergence::application::request::require_name;
use crate::core::domain::{error::ValidationError, model::virtual_disk::GIB};

/// A virtual disk to create in a repository and attach to a VM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskSpec {
    pub name: String,
    pub size_gib: u64,
    pub sparse: bool,
    pub repository: String,
}

impl DiskSpec {
    pub fn new(name: impl Into<String>, size_gib: u64, repository: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size_gib,
            sparse: true,
            repository: repository.into(),
        }
    }

    /// Requests a fully allocated disk.
    #[must_use]
    pub fn non_sparse(mut self) -> Self {
        self.sparse = false;
        self
    }

    /// Size on the wire, in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.size_gib.saturating_mul(GIB)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_name("disk name", &self.name)?;
        require_name("repository", &self.repository)?;
        if self.size_gib == 0 {
            return Err(ValidationError::Field {
                field: "size_gib".to_string(),
                message: format!("Disk '{}' must be at least 1 GiB", self.name),
            });
        }
        if self.size_gib.checked_mul(GIB).is_none() {
            return Err(ValidationError::ConstraintViolation(format!(
                "Disk '{}' size overflows",
                self.name
            )));
        }
        Ok(())
    }
}
