//! Identifiers and resource kinds of the Oracle VM Manager object model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A category of object exposed by the manager's REST API.
///
/// The `Display` form is the path segment used by the API (`/Vm`, `/ServerPool`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Vm,
    VirtualDisk,
    VirtualNic,
    Network,
    Repository,
    ServerPool,
    Server,
    Manager,
    Job,
    VmCloneDefinition,
    VmDiskMapping,
}

impl ResourceKind {
    /// Returns the API path segment for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Vm => "Vm",
            ResourceKind::VirtualDisk => "VirtualDisk",
            ResourceKind::VirtualNic => "VirtualNic",
            ResourceKind::Network => "Network",
            ResourceKind::Repository => "Repository",
            ResourceKind::ServerPool => "ServerPool",
            ResourceKind::Server => "Server",
            ResourceKind::Manager => "Manager",
            ResourceKind::Job => "Job",
            ResourceKind::VmCloneDefinition => "VmCloneDefinition",
            ResourceKind::VmDiskMapping => "VmDiskMapping",
        }
    }

    /// Returns the API path of one object of this kind (`Vm/{id}`).
    pub fn path_of(&self, id: &Identifier) -> String {
        format!("{}/{}", self.as_str(), id.value)
    }

    /// Returns the API path of a verb or nested collection (`Vm/{id}/start`).
    pub fn action_path(&self, id: &Identifier, action: &str) -> String {
        format!("{}/{}/{}", self.as_str(), id.value, action)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An opaque object reference as handed out by the manager.
///
/// The manager serializes every reference as `{"type": .., "value": .., "uri": .., "name": ..}`.
/// Only `value` is mandatory; the other members are carried back unchanged
/// whenever an identifier is sent in a request body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Identifier {
    /// The opaque id.
    pub value: String,
    /// Human-readable name, if the manager included one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Fully-qualified manager type (e.g. `com.oracle.ovm.mgr.ws.model.Vm`).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    /// Canonical REST location of the object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl Identifier {
    /// Wraps an id the caller already obtained from the manager.
    ///
    /// Useful to address an object directly when its name is ambiguous.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            name: None,
            object_type: None,
            uri: None,
        }
    }

    /// Attaches a display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the name, or an empty string when the manager sent none.
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Returns `true` if the identifier carries exactly this name.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}
