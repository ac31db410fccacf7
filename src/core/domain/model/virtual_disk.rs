//! Domain models for virtual disks and their VM mappings.

use super::identifier::Identifier;
use serde::{Deserialize, Serialize};

/// Bytes per GiB; disk sizes are declared in GiB and sent in bytes.
pub const GIB: u64 = 1 << 30;

/// `diskType` of a plain virtual disk (as opposed to a CD-ROM image).
pub const VIRTUAL_DISK_TYPE: &str = "VIRTUAL_DISK";

/// A virtual disk as returned by `/VirtualDisk/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualDisk {
    /// The disk identifier.
    pub id: Identifier,
    /// Human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Disk type (`VIRTUAL_DISK`, `VIRTUAL_CDROM`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_type: Option<String>,
    /// Repository storing the disk image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_id: Option<Identifier>,
    /// Fields not modelled by this crate.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl VirtualDisk {
    /// Returns `true` for plain virtual disks.
    pub fn is_virtual_disk(&self) -> bool {
        self.disk_type.as_deref() == Some(VIRTUAL_DISK_TYPE)
    }
}

/// A disk-to-VM mapping as returned by `/Vm/{id}/VmDiskMapping`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VmDiskMapping {
    /// The mapping identifier.
    pub id: Identifier,
    /// The mapped disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_disk_id: Option<Identifier>,
    /// Slot on the VM.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_target: Option<u32>,
    /// Fields not modelled by this crate.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Body of `POST /Repository/{id}/VirtualDisk`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateVirtualDiskParams {
    pub name: String,
    /// Size in bytes.
    pub size: u64,
}

/// Body of `POST /Vm/{id}/VmDiskMapping`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiskMappingParams {
    pub vm_id: Identifier,
    pub virtual_disk_id: Identifier,
    pub disk_target: u32,
}
