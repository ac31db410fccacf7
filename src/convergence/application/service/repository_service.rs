use super::{Converge, ServiceContext};
use crate::{
    convergence::application::{
        request::{
            Presence,
            repository_request::{
                OwnershipTarget, RepositoryOwnershipRequest, RepositoryPresentationRequest,
            },
        },
        response::change_report::ChangeReport,
    },
    core::domain::{
        error::OvmResult,
        model::{
            identifier::{Identifier, ResourceKind},
            repository::Repository,
        },
    },
    job::application::response::job_response::JobHandle,
};
use async_trait::async_trait;
use tracing::{debug, info};

async fn read_repository(ctx: &ServiceContext<'_>, name: &str) -> OvmResult<Repository> {
    let id = ctx.resolver.resolve(ResourceKind::Repository, name).await?;
    ctx.api.get(&ResourceKind::Repository.path_of(&id)).await
}

/// Takes or releases ownership of a repository for this manager.
pub struct RepositoryOwnershipService<'a> {
    ctx: ServiceContext<'a>,
}

impl<'a> RepositoryOwnershipService<'a> {
    pub fn new(ctx: ServiceContext<'a>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl<'a> Converge for RepositoryOwnershipService<'a> {
    type Desired = RepositoryOwnershipRequest;

    async fn converge(&self, desired: &RepositoryOwnershipRequest) -> OvmResult<ChangeReport> {
        desired.validate()?;
        let repository = read_repository(&self.ctx, &desired.repository).await?;
        let owner = repository.manager_uuid.as_deref().filter(|uuid| !uuid.is_empty());

        match &desired.target {
            OwnershipTarget::Owned { server_pool } => {
                let manager = self
                    .ctx
                    .resolver
                    .resolve(ResourceKind::Manager, &self.ctx.config.manager_name)
                    .await?;
                if owner == Some(manager.value.as_str()) {
                    debug!(repository = %desired.repository, "repository already owned");
                    return Ok(ChangeReport::unchanged());
                }

                let pool: Option<Identifier> = match server_pool {
                    Some(name) => Some(
                        self.ctx
                            .resolver
                            .resolve(ResourceKind::ServerPool, name)
                            .await?,
                    ),
                    None => None,
                };
                let query: Vec<(&str, &str)> = pool
                    .as_ref()
                    .map(|id| ("serverPoolId", id.value.as_str()))
                    .into_iter()
                    .collect();

                info!(repository = %desired.repository, previous_owner = ?owner, "taking repository ownership");
                let path = ResourceKind::Repository.action_path(&repository.id, "takeOwnership");
                self.ctx
                    .jobs
                    .submit(self.ctx.api.put_action::<JobHandle>(&path, &query))
                    .await?;
                Ok(ChangeReport::changed(["managerUuid"]))
            }
            OwnershipTarget::Released => {
                if owner.is_none() {
                    debug!(repository = %desired.repository, "repository already released");
                    return Ok(ChangeReport::unchanged());
                }
                info!(repository = %desired.repository, "releasing repository ownership");
                let path =
                    ResourceKind::Repository.action_path(&repository.id, "releaseOwnership");
                self.ctx
                    .jobs
                    .submit(self.ctx.api.put_action::<JobHandle>(&path, &[]))
                    .await?;
                Ok(ChangeReport::changed(["managerUuid"]))
            }
        }
    }
}

/// Presents a repository to a server, or withdraws it.
pub struct RepositoryPresentationService<'a> {
    ctx: ServiceContext<'a>,
}

impl<'a> RepositoryPresentationService<'a> {
    pub fn new(ctx: ServiceContext<'a>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl<'a> Converge for RepositoryPresentationService<'a> {
    type Desired = RepositoryPresentationRequest;

    async fn converge(&self, desired: &RepositoryPresentationRequest) -> OvmResult<ChangeReport> {
        desired.validate()?;
        let server = self
            .ctx
            .resolver
            .resolve(ResourceKind::Server, &desired.server)
            .await?;
        let repository = read_repository(&self.ctx, &desired.repository).await?;
        let presented = repository.is_presented_to(&desired.server);

        let action = match (desired.presence, presented) {
            (Presence::Present, true) | (Presence::Absent, false) => {
                debug!(repository = %desired.repository, server = %desired.server, presented, "presentation already converged");
                return Ok(ChangeReport::unchanged());
            }
            (Presence::Present, false) => "present",
            (Presence::Absent, true) => "unpresent",
        };

        info!(repository = %desired.repository, server = %desired.server, action, "changing repository presentation");
        let path = ResourceKind::Repository.action_path(&repository.id, action);
        self.ctx
            .jobs
            .submit(self.ctx.api.put::<_, JobHandle>(&path, &server))
            .await?;
        Ok(ChangeReport::changed(["presentedServerIds"]))
    }
}
