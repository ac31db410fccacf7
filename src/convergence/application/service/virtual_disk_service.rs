use super::{Converge, ServiceContext};
use crate::{
    convergence::application::{
        request::virtual_disk_request::DiskRenameRequest, response::change_report::ChangeReport,
    },
    core::domain::{
        error::{OvmError, OvmResult},
        model::{
            identifier::{Identifier, ResourceKind},
            representation::{Document, overlay},
            virtual_disk::{VirtualDisk, VmDiskMapping},
        },
    },
    job::application::response::job_response::JobHandle,
};
use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Renames virtual disks mapped to a VM.
pub struct VirtualDiskService<'a> {
    ctx: ServiceContext<'a>,
}

impl<'a> VirtualDiskService<'a> {
    pub fn new(ctx: ServiceContext<'a>) -> Self {
        Self { ctx }
    }

    /// Reads every `VIRTUAL_DISK` mapped to the VM; CD-ROMs and empty slots are skipped.
    async fn mapped_disks(&self, vm: &Identifier) -> OvmResult<Vec<Document<VirtualDisk>>> {
        let mappings: Vec<VmDiskMapping> = self
            .ctx
            .api
            .get(&ResourceKind::Vm.action_path(vm, ResourceKind::VmDiskMapping.as_str()))
            .await?;

        let mut disks = Vec::with_capacity(mappings.len());
        for disk_id in mappings.iter().filter_map(|m| m.virtual_disk_id.as_ref()) {
            let disk: Document<VirtualDisk> = self
                .ctx
                .api
                .get(&ResourceKind::VirtualDisk.path_of(disk_id))
                .await?;
            if disk.record.is_virtual_disk() {
                disks.push(disk);
            }
        }
        Ok(disks)
    }
}

fn single_named<'d>(
    disks: &'d [Document<VirtualDisk>],
    name: &str,
) -> OvmResult<Option<&'d Document<VirtualDisk>>> {
    let matches: Vec<&Document<VirtualDisk>> = disks
        .iter()
        .filter(|d| d.record.name.as_deref() == Some(name))
        .collect();
    match matches.as_slice() {
        [] => Ok(None),
        [disk] => Ok(Some(*disk)),
        many => Err(OvmError::Ambiguous {
            kind: ResourceKind::VirtualDisk,
            name: name.to_string(),
            count: many.len(),
        }),
    }
}

#[async_trait]
impl<'a> Converge for VirtualDiskService<'a> {
    type Desired = DiskRenameRequest;

    async fn converge(&self, desired: &DiskRenameRequest) -> OvmResult<ChangeReport> {
        desired.validate()?;
        let vm = self.ctx.resolver.resolve(ResourceKind::Vm, &desired.vm_name).await?;
        let disks = self.mapped_disks(&vm).await?;

        let Some(disk) = single_named(&disks, &desired.disk_name)? else {
            if single_named(&disks, &desired.new_name)?.is_some() {
                debug!(disk = %desired.new_name, "virtual disk already renamed");
                return Ok(ChangeReport::unchanged());
            }
            return Err(OvmError::NotFound {
                kind: ResourceKind::VirtualDisk,
                name: desired.disk_name.clone(),
            });
        };

        if desired.disk_name == desired.new_name {
            return Ok(ChangeReport::unchanged());
        }

        let mut document = disk.fields.clone();
        let mut rename = Map::new();
        rename.insert("name".to_string(), Value::String(desired.new_name.clone()));
        overlay(&mut document, &rename);

        let id = &disk.record.id;
        info!(disk = %id.value, from = %desired.disk_name, to = %desired.new_name, "renaming virtual disk");
        self.ctx
            .jobs
            .submit(
                self.ctx
                    .api
                    .put::<_, JobHandle>(&ResourceKind::VirtualDisk.path_of(id), &document),
            )
            .await?;
        Ok(ChangeReport::changed(["name"]))
    }
}
