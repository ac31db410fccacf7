use super::{
    Converge, ServiceContext, vm_modify_service::VmModifyService, vnic_service::VnicService,
};
use crate::{
    convergence::application::{
        request::{Presence, vm_request::VmRequest},
        response::change_report::ChangeReport,
    },
    core::domain::{
        error::OvmResult,
        model::{
            identifier::{Identifier, ResourceKind},
            vm::CreateVmParams,
        },
    },
    job::application::response::job_response::JobHandle,
    orchestration::application::{
        request::clone_request::CloneRequest,
        service::{clone_service::CloneService, disk_provision_service::DiskProvisionService},
    },
};
use async_trait::async_trait;
use tracing::{debug, info};

/// Creates, clones, resizes or deletes a VM, then provisions its disks and vNICs.
pub struct VmService<'a> {
    ctx: ServiceContext<'a>,
}

impl<'a> VmService<'a> {
    pub fn new(ctx: ServiceContext<'a>) -> Self {
        Self { ctx }
    }

    /// Creates the VM and returns its id and whether sizing still has to be applied.
    async fn create(&self, desired: &VmRequest) -> OvmResult<(Identifier, bool)> {
        if let Some(source) = &desired.clone_from {
            let request = CloneRequest::new(
                desired.name.clone(),
                source.clone(),
                desired.server_pool.clone(),
                desired.repository.clone(),
            );
            let id = CloneService::new(self.ctx).clone_and_rename(&request).await?;
            return Ok((id, desired.sizing.is_some()));
        }

        let resolver = self.ctx.resolver;
        let repository = resolver
            .resolve(ResourceKind::Repository, &desired.repository)
            .await?;
        let pool = resolver
            .resolve(ResourceKind::ServerPool, &desired.server_pool)
            .await?;
        let sizing = desired.sizing.clone().unwrap_or_default();
        let params = CreateVmParams {
            repository_id: repository,
            server_pool_id: pool,
            vm_domain_type: sizing.domain_type,
            name: desired.name.clone(),
            cpu_count: sizing.cpu_count,
            cpu_count_limit: sizing.effective_cpu_count_limit(),
            memory: sizing.memory,
            memory_limit: sizing.effective_memory_limit(),
        };

        info!(vm = %desired.name, cpus = params.cpu_count, memory = params.memory, "creating vm");
        let outcome = self
            .ctx
            .jobs
            .submit(
                self.ctx
                    .api
                    .post::<_, JobHandle>(ResourceKind::Vm.as_str(), &[], &params),
            )
            .await?;
        let id = match outcome.into_result_id() {
            Some(id) => id,
            None => resolver.resolve(ResourceKind::Vm, &desired.name).await?,
        };
        Ok((id, false))
    }
}

#[async_trait]
impl<'a> Converge for VmService<'a> {
    type Desired = VmRequest;

    async fn converge(&self, desired: &VmRequest) -> OvmResult<ChangeReport> {
        desired.validate()?;
        let existing = self.ctx.resolver.find(ResourceKind::Vm, &desired.name).await?;

        if desired.presence == Presence::Absent {
            let Some(id) = existing else {
                debug!(vm = %desired.name, "vm already absent");
                return Ok(ChangeReport::unchanged());
            };
            info!(vm = %desired.name, "deleting vm");
            self.ctx
                .jobs
                .submit(self.ctx.api.delete::<JobHandle>(&ResourceKind::Vm.path_of(&id)))
                .await?;
            return Ok(ChangeReport::changed(["vm"]));
        }

        let mut report = ChangeReport::unchanged();
        let (vm_id, resize) = match existing {
            Some(id) => (id, desired.sizing.is_some()),
            None => {
                let created = self.create(desired).await?;
                report.merge(ChangeReport::changed(["vm"]));
                created
            }
        };

        if let (true, Some(sizing)) = (resize, &desired.sizing) {
            let vm = self.ctx.read_vm_document(&vm_id).await?;
            report.merge(
                VmModifyService::new(self.ctx)
                    .apply(&vm, &sizing.as_properties(&vm.record))
                    .await?,
            );
        }

        report.merge(
            DiskProvisionService::new(self.ctx)
                .provision(&vm_id, &desired.disks)
                .await?,
        );

        let vnics = VnicService::new(self.ctx);
        for network in &desired.networks {
            report.merge(vnics.ensure_named(&vm_id, network).await?);
        }
        Ok(report)
    }
}
