use super::{Converge, ServiceContext};
use crate::{
    convergence::application::{
        request::{Presence, vnic_request::VnicRequest},
        response::change_report::ChangeReport,
    },
    core::domain::{
        error::{OvmError, OvmResult},
        model::{
            identifier::{Identifier, ResourceKind},
            virtual_nic::{CreateVirtualNicParams, VirtualNic},
        },
    },
    job::application::response::job_response::JobHandle,
};
use async_trait::async_trait;
use tracing::{debug, info};

/// Manages the virtual NICs of a VM.
pub struct VnicService<'a> {
    ctx: ServiceContext<'a>,
}

impl<'a> VnicService<'a> {
    pub fn new(ctx: ServiceContext<'a>) -> Self {
        Self { ctx }
    }

    /// Lists the vNICs attached to `vm`.
    pub(crate) async fn vnics_of(&self, vm: &Identifier) -> OvmResult<Vec<VirtualNic>> {
        let all: Vec<VirtualNic> = self.ctx.api.get(ResourceKind::VirtualNic.as_str()).await?;
        Ok(all.into_iter().filter(|nic| nic.belongs_to(vm)).collect())
    }

    /// Makes sure `vm` carries a vNIC named `name`.
    pub(crate) async fn ensure_named(&self, vm: &Identifier, name: &str) -> OvmResult<ChangeReport> {
        let vnics = self.vnics_of(vm).await?;
        if vnics.iter().any(|nic| nic.name.as_deref() == Some(name)) {
            debug!(vm = %vm.value, vnic = name, "vnic already present");
            return Ok(ChangeReport::unchanged());
        }
        self.create(vm, name).await?;
        Ok(ChangeReport::changed([name]))
    }

    /// Returns the first IP address reported on any of the VM's vNICs.
    ///
    /// `Ok(None)` means the VM has vNICs but the manager knows no address yet.
    ///
    /// # Errors
    /// * `OvmError::NotFound` if the VM does not exist or has no vNIC
    pub async fn ip_address(&self, vm_name: &str) -> OvmResult<Option<String>> {
        let vm = self.ctx.resolver.resolve(ResourceKind::Vm, vm_name).await?;
        let vnics = self.vnics_of(&vm).await?;
        if vnics.is_empty() {
            return Err(OvmError::NotFound {
                kind: ResourceKind::VirtualNic,
                name: format!("{}_VNIC", vm_name),
            });
        }
        Ok(vnics
            .iter()
            .find_map(VirtualNic::first_ip_address)
            .map(str::to_string))
    }

    async fn create(&self, vm: &Identifier, name: &str) -> OvmResult<()> {
        info!(vm = %vm.value, vnic = name, "creating vnic");
        let path = ResourceKind::Vm.action_path(vm, ResourceKind::VirtualNic.as_str());
        let params = CreateVirtualNicParams {
            name: name.to_string(),
        };
        self.ctx
            .jobs
            .submit(self.ctx.api.post::<_, JobHandle>(&path, &[], &params))
            .await?;
        Ok(())
    }

    async fn delete(&self, vm: &Identifier, vnic: &Identifier) -> OvmResult<()> {
        info!(vm = %vm.value, vnic = %vnic.value, "deleting vnic");
        let path = format!(
            "{}/{}",
            ResourceKind::Vm.action_path(vm, ResourceKind::VirtualNic.as_str()),
            vnic.value
        );
        self.ctx
            .jobs
            .submit(self.ctx.api.delete::<JobHandle>(&path))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl<'a> Converge for VnicService<'a> {
    type Desired = VnicRequest;

    async fn converge(&self, desired: &VnicRequest) -> OvmResult<ChangeReport> {
        desired.validate()?;
        let vm = self.ctx.resolver.resolve(ResourceKind::Vm, &desired.vm_name).await?;

        match (desired.presence, &desired.vnic_name) {
            (Presence::Present, Some(name)) => self.ensure_named(&vm, name).await,
            (Presence::Present, None) => {
                if !self.vnics_of(&vm).await?.is_empty() {
                    return Ok(ChangeReport::unchanged());
                }
                let name = desired.effective_name();
                self.create(&vm, &name).await?;
                Ok(ChangeReport::changed([name]))
            }
            (Presence::Absent, wanted) => {
                let doomed: Vec<VirtualNic> = self
                    .vnics_of(&vm)
                    .await?
                    .into_iter()
                    .filter(|nic| match wanted {
                        Some(name) => nic.name.as_deref() == Some(name.as_str()),
                        None => true,
                    })
                    .collect();

                let mut report = ChangeReport::unchanged();
                for nic in &doomed {
                    self.delete(&vm, &nic.id).await?;
                    let label = nic.name.clone().unwrap_or_else(|| nic.id.value.clone());
                    report.merge(ChangeReport::changed([label]));
                }
                Ok(report)
            }
        }
    }
}
