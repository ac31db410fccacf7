use crate::convergence::application::request::require_name;
use crate::core::domain::error::ValidationError;

/// Template and clone definition a new VM is cloned from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneSource {
    pub template: String,
    pub clone_definition: String,
}

impl CloneSource {
    pub fn new(template: impl Into<String>, clone_definition: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            clone_definition: clone_definition.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_name("template", &self.template)?;
        require_name("clone_definition", &self.clone_definition)
    }
}

/// Clones a template into a new VM named `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneRequest {
    pub name: String,
    pub source: CloneSource,
    pub server_pool: String,
    pub repository: String,
}

impl CloneRequest {
    pub fn new(
        name: impl Into<String>,
        source: CloneSource,
        server_pool: impl Into<String>,
        repository: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source,
            server_pool: server_pool.into(),
            repository: repository.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_name("name", &self.name)?;
        self.source.validate()?;
        require_name("server_pool", &self.server_pool)?;
        require_name("repository", &self.repository)
    }
}
