use super::{Converge, ServiceContext};
use crate::{
    convergence::application::{
        request::vm_state_request::VmStateRequest, response::change_report::ChangeReport,
    },
    core::domain::{error::OvmResult, model::identifier::ResourceKind},
    job::application::response::job_response::JobHandle,
};
use async_trait::async_trait;
use tracing::{debug, info};

/// Starts, stops, suspends or resumes a VM.
pub struct VmStateService<'a> {
    ctx: ServiceContext<'a>,
}

impl<'a> VmStateService<'a> {
    pub fn new(ctx: ServiceContext<'a>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl<'a> Converge for VmStateService<'a> {
    type Desired = VmStateRequest;

    async fn converge(&self, desired: &VmStateRequest) -> OvmResult<ChangeReport> {
        desired.validate()?;
        let vm = self.ctx.resolve_vm(&desired.vm_name).await?;

        if let Some(state) = &vm.vm_run_state {
            if desired.target.satisfied_by(state) {
                debug!(vm = %desired.vm_name, ?state, "vm already in requested state");
                return Ok(ChangeReport::unchanged());
            }
        }

        let action = desired.target.action();
        info!(vm = %desired.vm_name, action, "changing vm run state");
        let path = ResourceKind::Vm.action_path(&vm.id, action);
        self.ctx
            .jobs
            .submit(self.ctx.api.put_action::<JobHandle>(&path, &[]))
            .await?;
        Ok(ChangeReport::changed(["vmRunState"]))
    }
}
