//! Read-compare-mutate services, one per resource concern.

pub mod network_service;
pub mod repository_service;
pub mod server_pool_service;
pub mod virtual_disk_service;
pub mod vm_modify_service;
pub mod vm_service;
pub mod vm_state_service;
pub mod vnic_service;

use crate::{
    convergence::application::response::change_report::ChangeReport,
    core::{
        domain::{
            error::OvmResult,
            model::{
                identifier::{Identifier, ResourceKind},
                ovm_config::OvmConfig,
                representation::Document,
                vm::Vm,
            },
        },
        infrastructure::api_client::ApiClient,
    },
    identity::application::service::identity_service::IdentityResolver,
    job::application::service::job_service::JobService,
};
use async_trait::async_trait;

/// Brings one resource into a desired state.
///
/// Implementations read the current state first and send a mutation only
/// when it differs; a second call with the same input reports no change.
#[async_trait]
pub trait Converge: Send + Sync {
    /// The desired-state description this service accepts.
    type Desired: Send + Sync;

    async fn converge(&self, desired: &Self::Desired) -> OvmResult<ChangeReport>;
}

/// Everything a service needs to talk to one manager.
#[derive(Debug, Clone, Copy)]
pub struct ServiceContext<'a> {
    pub api: &'a ApiClient,
    pub resolver: IdentityResolver<'a>,
    pub jobs: JobService<'a>,
    pub config: &'a OvmConfig,
}

impl<'a> ServiceContext<'a> {
    pub fn new(api: &'a ApiClient, config: &'a OvmConfig) -> Self {
        Self {
            api,
            resolver: IdentityResolver::new(api),
            jobs: JobService::new(api, config.polling),
            config,
        }
    }

    /// Reads the full representation of a VM.
    pub(crate) async fn read_vm(&self, id: &Identifier) -> OvmResult<Vm> {
        self.api.get(&ResourceKind::Vm.path_of(id)).await
    }

    /// Reads a VM for a read-merge-write update.
    pub(crate) async fn read_vm_document(&self, id: &Identifier) -> OvmResult<Document<Vm>> {
        self.api.get(&ResourceKind::Vm.path_of(id)).await
    }

    /// Resolves a VM by name and reads it.
    pub(crate) async fn resolve_vm(&self, name: &str) -> OvmResult<Vm> {
        let id = self.resolver.resolve(ResourceKind::Vm, name).await?;
        self.read_vm(&id).await
    }
}
