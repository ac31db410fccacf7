use crate::{
    convergence::application::{
        response::change_report::ChangeReport, service::ServiceContext,
    },
    core::domain::{
        error::{OvmError, OvmResult},
        model::{
            identifier::{Identifier, ResourceKind},
            virtual_disk::{CreateDiskMappingParams, CreateVirtualDiskParams},
        },
    },
    job::application::response::job_response::JobHandle,
    orchestration::application::request::disk_request::DiskSpec,
};
use tracing::{debug, info};

/// Creates missing virtual disks and maps each onto the next free slot of a VM.
pub struct DiskProvisionService<'a> {
    ctx: ServiceContext<'a>,
}

impl<'a> DiskProvisionService<'a> {
    pub fn new(ctx: ServiceContext<'a>) -> Self {
        Self { ctx }
    }

    /// Provisions `disks` on `vm`, in order.
    ///
    /// Disks that already exist by name are skipped. The first failure
    /// stops the sequence; disks created before it stay in place and are
    /// skipped on the next call.
    pub async fn provision(&self, vm: &Identifier, disks: &[DiskSpec]) -> OvmResult<ChangeReport> {
        for disk in disks {
            disk.validate()?;
        }

        let mut report = ChangeReport::unchanged();
        for disk in disks {
            if self
                .ctx
                .resolver
                .find(ResourceKind::VirtualDisk, &disk.name)
                .await?
                .is_some()
            {
                debug!(disk = %disk.name, "virtual disk already exists");
                continue;
            }
            let disk_id = self.create(disk).await?;
            self.attach(vm, &disk_id).await?;
            report.merge(ChangeReport::changed([disk.name.as_str()]));
        }
        Ok(report)
    }

    async fn create(&self, disk: &DiskSpec) -> OvmResult<Identifier> {
        let repository = self
            .ctx
            .resolver
            .resolve(ResourceKind::Repository, &disk.repository)
            .await?;
        let path = ResourceKind::Repository.action_path(&repository, ResourceKind::VirtualDisk.as_str());
        let params = CreateVirtualDiskParams {
            name: disk.name.clone(),
            size: disk.size_bytes(),
        };
        let sparse = if disk.sparse { "true" } else { "false" };

        info!(disk = %disk.name, size_gib = disk.size_gib, sparse, "creating virtual disk");
        let outcome = self
            .ctx
            .jobs
            .submit(
                self.ctx
                    .api
                    .post::<_, JobHandle>(&path, &[("sparse", sparse)], &params),
            )
            .await?;
        match outcome.into_result_id() {
            Some(id) => Ok(id),
            None => {
                self.ctx
                    .resolver
                    .resolve(ResourceKind::VirtualDisk, &disk.name)
                    .await
            }
        }
    }

    async fn attach(&self, vm: &Identifier, disk: &Identifier) -> OvmResult<()> {
        let mappings_path = ResourceKind::Vm.action_path(vm, ResourceKind::VmDiskMapping.as_str());
        let existing: Vec<Identifier> = self.ctx.api.get(&format!("{}/id", mappings_path)).await?;
        let params = CreateDiskMappingParams {
            vm_id: vm.clone(),
            virtual_disk_id: disk.clone(),
            disk_target: disk_target(existing.len())?,
        };

        info!(vm = %vm.value, disk = %disk.value, target = params.disk_target, "mapping virtual disk");
        self.ctx
            .jobs
            .submit(self.ctx.api.post::<_, JobHandle>(&mappings_path, &[], &params))
            .await?;
        Ok(())
    }
}

fn disk_target(mapped: usize) -> OvmResult<u32> {
    u32::try_from(mapped).map_err(|_| {
        OvmError::UnexpectedResponse(format!("VM reports {} disk mappings", mapped))
    })
}
