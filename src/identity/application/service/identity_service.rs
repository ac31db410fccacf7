use crate::core::{
    domain::{
        error::{OvmError, OvmResult},
        model::identifier::{Identifier, ResourceKind},
    },
    infrastructure::api_client::ApiClient,
};
use tracing::debug;

/// Maps human-readable names to the manager's identifiers.
///
/// Nothing is cached: names can change within one invocation (a clone is
/// renamed, a disk is renamed), so every lookup re-reads `/{Kind}/id`.
#[derive(Debug, Clone, Copy)]
pub struct IdentityResolver<'a> {
    api: &'a ApiClient,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Looks up an object by exact name.
    ///
    /// Returns `Ok(None)` when nothing matches.
    ///
    /// # Errors
    /// * `OvmError::Ambiguous` if several objects share the name
    /// * transport errors from the listing request
    pub async fn find(&self, kind: ResourceKind, name: &str) -> OvmResult<Option<Identifier>> {
        let ids: Vec<Identifier> = self.api.get(&format!("{}/id", kind)).await?;
        let mut matches: Vec<Identifier> = ids.into_iter().filter(|id| id.has_name(name)).collect();
        debug!(%kind, name, matches = matches.len(), "resolved name");

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            count => Err(OvmError::Ambiguous {
                kind,
                name: name.to_string(),
                count,
            }),
        }
    }

    /// Resolves a name that must exist.
    ///
    /// # Errors
    /// * `OvmError::NotFound` if nothing matches
    /// * everything [`IdentityResolver::find`] returns
    pub async fn resolve(&self, kind: ResourceKind, name: &str) -> OvmResult<Identifier> {
        self.find(kind, name)
            .await?
            .ok_or_else(|| OvmError::NotFound {
                kind,
                name: name.to_string(),
            })
    }
}
