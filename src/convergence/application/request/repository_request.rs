use super::{Presence, require_name};
use crate::core::domain::error::ValidationError;

/// Who should own a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnershipTarget {
    /// Owned by this manager, optionally on behalf of a server pool.
    Owned { server_pool: Option<String> },
    Released,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwnershipRequest {
    pub repository: String,
    pub target: OwnershipTarget,
}

impl RepositoryOwnershipRequest {
    pub fn owned(repository: impl Into<String>, server_pool: Option<String>) -> Self {
        Self {
            repository: repository.into(),
            target: OwnershipTarget::Owned { server_pool },
        }
    }

    pub fn released(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            target: OwnershipTarget::Released,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_name("repository", &self.repository)?;
        if let OwnershipTarget::Owned {
            server_pool: Some(pool),
        } = &self.target
        {
            require_name("server_pool", pool)?;
        }
        Ok(())
    }
}

/// Whether a repository is presented to a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryPresentationRequest {
    pub repository: String,
    pub server: String,
    pub presence: Presence,
}

impl RepositoryPresentationRequest {
    pub fn new(repository: impl Into<String>, server: impl Into<String>, presence: Presence) -> Self {
        Self {
            repository: repository.into(),
            server: server.into(),
            presence,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_name("repository", &self.repository)?;
        require_name("server", &self.server)
    }
}
