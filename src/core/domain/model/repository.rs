//! Domain model for storage repositories.

use super::identifier::Identifier;
use serde::{Deserialize, Serialize};

/// A repository as returned by `/Repository/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    /// The repository identifier.
    pub id: Identifier,
    /// Human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Id of the manager owning the repository; absent when released.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_uuid: Option<String>,
    /// Servers the repository is presented to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub presented_server_ids: Vec<Identifier>,
    /// Fields not modelled by this crate.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Repository {
    /// Returns `true` if a server with this name is in the presented list.
    pub fn is_presented_to(&self, server_name: &str) -> bool {
        self.presented_server_ids
            .iter()
            .any(|id| id.has_name(server_name))
    }
}
