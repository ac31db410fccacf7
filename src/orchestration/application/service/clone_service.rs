//! Clone a template, then rename the clone.

use crate::{
    convergence::application::{
        response::change_report::ChangeReport,
        service::{Converge, ServiceContext},
    },
    core::domain::{
        error::{OvmError, OvmResult},
        model::{
            identifier::{Identifier, ResourceKind},
            representation::overlay,
        },
    },
    job::application::response::job_response::JobHandle,
    orchestration::application::request::clone_request::CloneRequest,
};
use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Two-step clone: the clone job names the new VM, a second job renames it.
///
/// The manager gives a clone a generated name, so the rename is the step
/// that makes the VM findable by the caller's name. If the clone succeeds
/// and the rename fails, the clone stays behind under its generated name.
pub struct CloneService<'a> {
    ctx: ServiceContext<'a>,
}

impl<'a> CloneService<'a> {
    pub fn new(ctx: ServiceContext<'a>) -> Self {
        Self { ctx }
    }

    /// Clones `request.source.template` and renames the clone to `request.name`.
    ///
    /// Returns the clone's identifier.
    ///
    /// # Errors
    /// * `OvmError::NotFound` / `OvmError::Ambiguous` for any reference
    /// * `OvmError::JobFailure` from either job; the rename is never sent
    ///   when the clone job fails
    /// * `OvmError::UnexpectedResponse` if the clone job names no result
    pub async fn clone_and_rename(&self, request: &CloneRequest) -> OvmResult<Identifier> {
        request.validate()?;
        let resolver = self.ctx.resolver;
        let template = resolver
            .resolve(ResourceKind::Vm, &request.source.template)
            .await?;
        let pool = resolver
            .resolve(ResourceKind::ServerPool, &request.server_pool)
            .await?;
        let repository = resolver
            .resolve(ResourceKind::Repository, &request.repository)
            .await?;
        let definition = resolver
            .resolve(ResourceKind::VmCloneDefinition, &request.source.clone_definition)
            .await?;

        info!(template = %request.source.template, name = %request.name, "cloning vm");
        let path = ResourceKind::Vm.action_path(&template, "clone");
        let query = [
            ("serverPoolId", pool.value.as_str()),
            ("repositoryId", repository.value.as_str()),
            ("vmCloneDefinitionId", definition.value.as_str()),
            ("createTemplate", "false"),
        ];
        let clone = self
            .ctx
            .jobs
            .submit(self.ctx.api.put_action::<JobHandle>(&path, &query))
            .await?
            .into_result_id()
            .ok_or_else(|| {
                OvmError::UnexpectedResponse("clone job finished without a result id".to_string())
            })?;

        self.rename(&clone, &request.name).await?;
        Ok(clone)
    }

    async fn rename(&self, vm: &Identifier, name: &str) -> OvmResult<()> {
        let mut document = self.ctx.read_vm_document(vm).await?.fields;
        let mut desired = Map::new();
        desired.insert("name".to_string(), Value::String(name.to_string()));
        overlay(&mut document, &desired);

        info!(vm = %vm.value, name, "renaming clone");
        self.ctx
            .jobs
            .submit(
                self.ctx
                    .api
                    .put::<_, JobHandle>(&ResourceKind::Vm.path_of(vm), &document),
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl<'a> Converge for CloneService<'a> {
    type Desired = CloneRequest;

    async fn converge(&self, desired: &CloneRequest) -> OvmResult<ChangeReport> {
        desired.validate()?;
        if self
            .ctx
            .resolver
            .find(ResourceKind::Vm, &desired.name)
            .await?
            .is_some()
        {
            debug!(name = %desired.name, "vm already exists, nothing to clone");
            return Ok(ChangeReport::unchanged());
        }
        self.clone_and_rename(desired).await?;
        Ok(ChangeReport::changed(["vm"]))
    }
}
