use super::{Converge, ServiceContext};
use crate::{
    convergence::application::{
        request::{Presence, server_pool_request::ServerPoolMembershipRequest},
        response::change_report::ChangeReport,
    },
    core::domain::{
        error::OvmResult,
        model::identifier::{Identifier, ResourceKind},
    },
    job::application::response::job_response::JobHandle,
};
use async_trait::async_trait;
use tracing::{debug, info};

/// Adds VMs to server pools and removes them.
pub struct ServerPoolService<'a> {
    ctx: ServiceContext<'a>,
}

impl<'a> ServerPoolService<'a> {
    pub fn new(ctx: ServiceContext<'a>) -> Self {
        Self { ctx }
    }

    async fn pool_action(&self, pool: &Identifier, action: &str, vm: &Identifier) -> OvmResult<()> {
        info!(pool = %pool.value, vm = %vm.value, action, "changing pool membership");
        let path = ResourceKind::ServerPool.action_path(pool, action);
        self.ctx
            .jobs
            .submit(self.ctx.api.put::<_, JobHandle>(&path, vm))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl<'a> Converge for ServerPoolService<'a> {
    type Desired = ServerPoolMembershipRequest;

    async fn converge(&self, desired: &ServerPoolMembershipRequest) -> OvmResult<ChangeReport> {
        desired.validate()?;
        let pool = self
            .ctx
            .resolver
            .resolve(ResourceKind::ServerPool, &desired.server_pool)
            .await?;
        let vm = self.ctx.resolve_vm(&desired.vm_name).await?;
        let current = vm.server_pool_id.as_ref();
        let in_pool = current.is_some_and(|id| id.value == pool.value);

        match desired.presence {
            Presence::Present if in_pool => {
                debug!(vm = %desired.vm_name, pool = %desired.server_pool, "vm already in pool");
                Ok(ChangeReport::unchanged())
            }
            Presence::Present => {
                if let Some(previous) = current {
                    self.pool_action(previous, "removeVm", &vm.id).await?;
                }
                self.pool_action(&pool, "addVm", &vm.id).await?;
                Ok(ChangeReport::changed(["serverPoolId"]))
            }
            Presence::Absent if in_pool => {
                self.pool_action(&pool, "removeVm", &vm.id).await?;
                Ok(ChangeReport::changed(["serverPoolId"]))
            }
            Presence::Absent => Ok(ChangeReport::unchanged()),
        }
    }
}
