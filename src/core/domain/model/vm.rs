//! Domain models for virtual machine operations.
//!
//! This module defines the structures used when interacting with VMs via the
//! `/Vm` collection of the manager API.

use super::identifier::Identifier;
use serde::{Deserialize, Serialize};

/// Run-state of a VM as reported in `vmRunState`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum VmRunState {
    Running,
    Stopped,
    Suspended,
    /// Transitional or unmodelled states (`STARTING`, `STOPPING`, ...).
    Other(String),
}

impl From<String> for VmRunState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "RUNNING" => VmRunState::Running,
            "STOPPED" => VmRunState::Stopped,
            "SUSPENDED" => VmRunState::Suspended,
            _ => VmRunState::Other(value),
        }
    }
}

impl From<VmRunState> for String {
    fn from(value: VmRunState) -> Self {
        match value {
            VmRunState::Running => "RUNNING".to_string(),
            VmRunState::Stopped => "STOPPED".to_string(),
            VmRunState::Suspended => "SUSPENDED".to_string(),
            VmRunState::Other(other) => other,
        }
    }
}

/// Virtualization mode of a VM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VmDomainType {
    #[default]
    XenHvm,
    XenHvmPvDrivers,
    XenPvm,
    LdomsPvm,
    Unknown,
}

/// A virtual machine as returned by `/Vm/{id}`.
///
/// Fields the crate does not model are kept in `extra` so that a
/// read-merge-write update sends them back untouched.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vm {
    /// The VM identifier.
    pub id: Identifier,
    /// Human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Current run-state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_run_state: Option<VmRunState>,
    /// Number of virtual CPUs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_count: Option<u32>,
    /// Maximum number of virtual CPUs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_count_limit: Option<u32>,
    /// Memory in MiB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,
    /// Maximum memory in MiB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limit: Option<u64>,
    /// Server pool the VM belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_pool_id: Option<Identifier>,
    /// Repository holding the VM configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_id: Option<Identifier>,
    /// Virtualization mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_domain_type: Option<VmDomainType>,
    /// Fields not modelled by this crate.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Body of `POST /Vm`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVmParams {
    pub repository_id: Identifier,
    pub server_pool_id: Identifier,
    pub vm_domain_type: VmDomainType,
    pub name: String,
    pub cpu_count: u32,
    pub cpu_count_limit: u32,
    /// Memory in MiB.
    pub memory: u64,
    /// Maximum memory in MiB.
    pub memory_limit: u64,
}
