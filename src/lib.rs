mod convergence;
mod core;
mod identity;
mod job;
mod orchestration;

pub use crate::convergence::application::{
    request::{
        Presence,
        network_request::NetworkAttachmentRequest,
        repository_request::{
            OwnershipTarget, RepositoryOwnershipRequest, RepositoryPresentationRequest,
        },
        server_pool_request::ServerPoolMembershipRequest,
        virtual_disk_request::DiskRenameRequest,
        vm_request::{VmModifyRequest, VmProperties, VmRequest, VmSizing},
        vm_state_request::{VmRunTarget, VmStateRequest},
        vnic_request::VnicRequest,
    },
    response::change_report::ChangeReport,
    service::{Converge, ServiceContext},
};
pub use crate::core::domain::{
    error::{OvmError, OvmResult, ValidationError},
    model::{
        identifier::{Identifier, ResourceKind},
        job::JobOutcome,
        ovm_config::{DEFAULT_MANAGER_NAME, OvmConfig, PollingConfig, RateLimitConfig},
        ovm_connection::OvmConnection,
        repository::Repository,
        virtual_disk::{VirtualDisk, VmDiskMapping},
        virtual_nic::VirtualNic,
        vm::{Vm, VmDomainType, VmRunState},
    },
    value_object::{OvmPassword, OvmUrl, OvmUsername},
};
pub use crate::identity::application::service::identity_service::IdentityResolver;
pub use crate::job::application::service::job_service::JobService;
pub use crate::orchestration::application::request::{
    clone_request::{CloneRequest, CloneSource},
    disk_request::DiskSpec,
};

use crate::{
    convergence::application::service::{
        network_service::NetworkService,
        repository_service::{RepositoryOwnershipService, RepositoryPresentationService},
        server_pool_service::ServerPoolService,
        virtual_disk_service::VirtualDiskService,
        vm_modify_service::VmModifyService,
        vm_service::VmService,
        vm_state_service::VmStateService,
        vnic_service::VnicService,
    },
    core::{
        domain::value_object::{validate_password, validate_url, validate_username},
        infrastructure::api_client::ApiClient,
    },
    orchestration::application::service::clone_service::CloneService,
};
use std::time::Duration;

/// A client that converges Oracle VM Manager resources to a desired state.
///
/// Every operation reads the manager's current state, sends a mutation only
/// when something differs, and waits for the job that mutation queued.
///
/// # Examples
///
/// ```no_run
/// use leeca_ovm::{OvmClient, OvmResult, VmRequest, VmSizing, DiskSpec};
///
/// #[tokio::main]
/// async fn main() -> OvmResult<()> {
///     let client = OvmClient::builder()
///         .url("https://ovm.example.com:7002")
///         .credentials("admin", "Welcome1")
///         .accept_invalid_certs(true)
///         .build()?;
///
///     let report = client
///         .converge_vm(
///             &VmRequest::new("web01", "pool1", "repo1")
///                 .with_sizing(VmSizing { cpu_count: 4, memory: 8192, ..Default::default() })
///                 .with_disk(DiskSpec::new("web01_data", 20, "repo1"))
///                 .with_network("web01_VNIC"),
///         )
///         .await?;
///     println!("changed: {}", report.changed);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct OvmClient {
    pub(crate) api_client: ApiClient,
    pub(crate) config: OvmConfig,
}

/// Builder for [`OvmClient`] configuration
#[derive(Debug, Default)]
pub struct OvmClientBuilder {
    url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    config: OvmConfig,
}

impl OvmClientBuilder {
    /// Sets the manager address, e.g. `https://ovm.example.com:7002`.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Accepts self-signed manager certificates. Off by default.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.config.accept_invalid_certs = accept;
        self
    }

    pub fn polling(mut self, polling: PollingConfig) -> Self {
        self.config.polling = polling;
        self
    }

    pub fn rate_limit(mut self, requests_per_second: u32, burst_size: u32) -> Self {
        self.config.rate_limit = Some(RateLimitConfig {
            requests_per_second,
            burst_size,
        });
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Name of the manager's own `Manager` object, used to decide repository ownership.
    pub fn manager_name(mut self, name: impl Into<String>) -> Self {
        self.config.manager_name = name.into();
        self
    }

    /// Rejects passwords below this zxcvbn score.
    pub fn password_min_score(mut self, score: zxcvbn::Score) -> Self {
        self.config.password_min_score = Some(score);
        self
    }

    /// Validates the configuration and builds the client.
    ///
    /// No request is sent; credentials are checked by the first call.
    ///
    /// # Errors
    /// Returns `OvmError::Validation` for a missing or malformed setting and
    /// `OvmError::Connection` if the HTTP client cannot be built.
    pub fn build(self) -> OvmResult<OvmClient> {
        let url = self.url.ok_or_else(|| ValidationError::Field {
            field: "url".to_string(),
            message: "URL is required".to_string(),
        })?;
        let username = self.username.ok_or_else(|| ValidationError::Field {
            field: "username".to_string(),
            message: "Username is required".to_string(),
        })?;
        let password = self.password.ok_or_else(|| ValidationError::Field {
            field: "password".to_string(),
            message: "Password is required".to_string(),
        })?;

        self.config.validate()?;
        let url = OvmUrl::new_unchecked(validate_url(&url)?);
        validate_username(&username)?;
        validate_password(&password, self.config.password_min_score)?;

        let connection = OvmConnection::new(
            url,
            OvmUsername::new_unchecked(username),
            OvmPassword::new_unchecked(password),
        );
        let api_client = ApiClient::new(connection, &self.config)?;

        Ok(OvmClient {
            api_client,
            config: self.config,
        })
    }
}

impl OvmClient {
    /// Creates a new builder for OvmClient configuration
    pub fn builder() -> OvmClientBuilder {
        OvmClientBuilder::default()
    }

    /// Returns the effective configuration.
    pub fn config(&self) -> &OvmConfig {
        &self.config
    }

    /// Returns the shared context services run in.
    pub fn context(&self) -> ServiceContext<'_> {
        ServiceContext::new(&self.api_client, &self.config)
    }

    /// Looks up an object by exact name; `Ok(None)` if nothing matches.
    ///
    /// # Errors
    /// `OvmError::Ambiguous` when several objects share the name.
    pub async fn find(&self, kind: ResourceKind, name: &str) -> OvmResult<Option<Identifier>> {
        self.context().resolver.find(kind, name).await
    }

    /// Resolves a name that must exist.
    ///
    /// # Errors
    /// `OvmError::NotFound` or `OvmError::Ambiguous`.
    pub async fn resolve(&self, kind: ResourceKind, name: &str) -> OvmResult<Identifier> {
        self.context().resolver.resolve(kind, name).await
    }

    /// Creates, clones or deletes a VM, converges its sizing, then
    /// provisions the declared disks and vNICs.
    pub async fn converge_vm(&self, request: &VmRequest) -> OvmResult<ChangeReport> {
        VmService::new(self.context()).converge(request).await
    }

    /// Merges a set of properties into an existing VM.
    pub async fn modify_vm(&self, request: &VmModifyRequest) -> OvmResult<ChangeReport> {
        VmModifyService::new(self.context()).converge(request).await
    }

    /// Starts, stops, suspends or resumes a VM.
    pub async fn set_vm_state(&self, request: &VmStateRequest) -> OvmResult<ChangeReport> {
        VmStateService::new(self.context()).converge(request).await
    }

    /// Clones a template into a new VM with the requested name.
    ///
    /// Reports no change when a VM with that name already exists.
    pub async fn clone_vm(&self, request: &CloneRequest) -> OvmResult<ChangeReport> {
        CloneService::new(self.context()).converge(request).await
    }

    pub async fn rename_virtual_disk(&self, request: &DiskRenameRequest) -> OvmResult<ChangeReport> {
        VirtualDiskService::new(self.context()).converge(request).await
    }

    pub async fn converge_vnic(&self, request: &VnicRequest) -> OvmResult<ChangeReport> {
        VnicService::new(self.context()).converge(request).await
    }

    pub async fn attach_network(
        &self,
        request: &NetworkAttachmentRequest,
    ) -> OvmResult<ChangeReport> {
        NetworkService::new(self.context()).converge(request).await
    }

    pub async fn converge_repository_ownership(
        &self,
        request: &RepositoryOwnershipRequest,
    ) -> OvmResult<ChangeReport> {
        RepositoryOwnershipService::new(self.context())
            .converge(request)
            .await
    }

    pub async fn converge_repository_presentation(
        &self,
        request: &RepositoryPresentationRequest,
    ) -> OvmResult<ChangeReport> {
        RepositoryPresentationService::new(self.context())
            .converge(request)
            .await
    }

    pub async fn converge_server_pool_membership(
        &self,
        request: &ServerPoolMembershipRequest,
    ) -> OvmResult<ChangeReport> {
        ServerPoolService::new(self.context()).converge(request).await
    }

    /// Reads the first IP address the manager reports for a VM.
    ///
    /// # Errors
    /// `OvmError::NotFound` if the VM does not exist or has no vNIC.
    pub async fn vm_ip_address(&self, vm_name: &str) -> OvmResult<Option<String>> {
        VnicService::new(self.context()).ip_address(vm_name).await
    }
}
