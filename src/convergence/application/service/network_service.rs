use super::{Converge, ServiceContext, vnic_service::VnicService};
use crate::{
    convergence::application::{
        request::network_request::NetworkAttachmentRequest, response::change_report::ChangeReport,
    },
    core::domain::{
        error::{OvmError, OvmResult},
        model::{identifier::ResourceKind, virtual_nic::VirtualNic},
    },
    job::application::response::job_response::JobHandle,
};
use async_trait::async_trait;
use tracing::{debug, info};

/// Plugs a VM's vNIC into a network.
pub struct NetworkService<'a> {
    ctx: ServiceContext<'a>,
}

impl<'a> NetworkService<'a> {
    pub fn new(ctx: ServiceContext<'a>) -> Self {
        Self { ctx }
    }
}

/// Picks the vNIC a request refers to.
///
/// Without a name the VM must have exactly one vNIC.
fn select_vnic(
    vnics: Vec<VirtualNic>,
    vm_name: &str,
    wanted: Option<&str>,
) -> OvmResult<VirtualNic> {
    let label = wanted.map_or_else(|| format!("{}_VNIC", vm_name), str::to_string);
    let mut candidates: Vec<VirtualNic> = match wanted {
        Some(name) => vnics
            .into_iter()
            .filter(|nic| nic.name.as_deref() == Some(name))
            .collect(),
        None => vnics,
    };
    match candidates.len() {
        0 => Err(OvmError::NotFound {
            kind: ResourceKind::VirtualNic,
            name: label,
        }),
        1 => candidates.pop().ok_or(OvmError::NotFound {
            kind: ResourceKind::VirtualNic,
            name: label,
        }),
        count => Err(OvmError::Ambiguous {
            kind: ResourceKind::VirtualNic,
            name: label,
            count,
        }),
    }
}

#[async_trait]
impl<'a> Converge for NetworkService<'a> {
    type Desired = NetworkAttachmentRequest;

    async fn converge(&self, desired: &NetworkAttachmentRequest) -> OvmResult<ChangeReport> {
        desired.validate()?;
        let vm = self.ctx.resolver.resolve(ResourceKind::Vm, &desired.vm_name).await?;
        let network = self
            .ctx
            .resolver
            .resolve(ResourceKind::Network, &desired.network)
            .await?;

        let vnics = VnicService::new(self.ctx).vnics_of(&vm).await?;
        let vnic = select_vnic(vnics, &desired.vm_name, desired.vnic_name.as_deref())?;

        let attached = vnic.network_name() == Some(desired.network.as_str())
            || vnic
                .network_id
                .as_ref()
                .is_some_and(|id| id.value == network.value);
        if attached {
            debug!(vnic = %vnic.id.value, network = %desired.network, "vnic already attached");
            return Ok(ChangeReport::unchanged());
        }

        info!(
            vnic = %vnic.id.value,
            from = vnic.network_name().unwrap_or("none"),
            to = %desired.network,
            "attaching vnic to network"
        );
        let path = ResourceKind::Network.action_path(&network, "addVirtualNic");
        self.ctx
            .jobs
            .submit(self.ctx.api.put::<_, JobHandle>(&path, &vnic.id))
            .await?;
        Ok(ChangeReport::changed(["networkId"]))
    }
}
