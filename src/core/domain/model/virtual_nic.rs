//! Domain models for virtual network interfaces.

use super::identifier::Identifier;
use serde::{Deserialize, Serialize};

/// An address reported for a vNIC by the guest agent.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VnicIpAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A virtual NIC as returned by `/VirtualNic`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNic {
    /// The vNIC identifier.
    pub id: Identifier,
    /// Human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// VM the vNIC is plugged into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_id: Option<Identifier>,
    /// Network the vNIC is attached to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<Identifier>,
    /// MAC address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    /// Addresses reported by the guest.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ip_addresses: Vec<VnicIpAddress>,
    /// Fields not modelled by this crate.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl VirtualNic {
    /// Returns `true` if the vNIC is plugged into the given VM.
    pub fn belongs_to(&self, vm: &Identifier) -> bool {
        self.vm_id.as_ref().is_some_and(|id| id.value == vm.value)
    }

    /// Returns the name of the attached network, if any.
    pub fn network_name(&self) -> Option<&str> {
        self.network_id.as_ref().and_then(|id| id.name.as_deref())
    }

    /// Returns the first reported IP address.
    pub fn first_ip_address(&self) -> Option<&str> {
        self.ip_addresses
            .iter()
            .find_map(|entry| entry.address.as_deref())
    }
}

/// Body of `POST /Vm/{id}/VirtualNic`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateVirtualNicParams {
    pub name: String,
}
