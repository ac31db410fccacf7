use super::{Converge, ServiceContext};
use crate::{
    convergence::application::{
        request::vm_request::{VmModifyRequest, VmProperties},
        response::change_report::ChangeReport,
    },
    core::domain::{
        error::{OvmResult, ValidationError},
        model::{
            identifier::ResourceKind,
            representation::{Document, overlay, to_document},
            vm::Vm,
        },
    },
    job::application::response::job_response::JobHandle,
};
use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Merges a property subset into a VM and writes the full document back.
pub struct VmModifyService<'a> {
    ctx: ServiceContext<'a>,
}

impl<'a> VmModifyService<'a> {
    pub fn new(ctx: ServiceContext<'a>) -> Self {
        Self { ctx }
    }

    /// Applies `properties` to an already-read VM.
    ///
    /// Sends nothing when every requested property already has its value.
    pub(crate) async fn apply(
        &self,
        vm: &Document<Vm>,
        properties: &VmProperties,
    ) -> OvmResult<ChangeReport> {
        let desired = to_document(properties)?;
        if desired.is_empty() {
            return Ok(ChangeReport::unchanged());
        }

        let id = &vm.record.id;
        let mut document = vm.fields.clone();
        let modified = overlay(&mut document, &desired);
        if modified.is_empty() {
            debug!(vm = %id.value, "vm properties already converged");
            return Ok(ChangeReport::unchanged());
        }

        // The merge can pair a new value with an old limit.
        check_limit(&document, "memory", "memoryLimit")?;
        check_limit(&document, "cpuCount", "cpuCountLimit")?;

        info!(vm = %id.value, ?modified, "updating vm");
        let path = ResourceKind::Vm.path_of(id);
        self.ctx
            .jobs
            .submit(self.ctx.api.put::<_, JobHandle>(&path, &document))
            .await?;
        Ok(ChangeReport::changed(modified))
    }
}

fn check_limit(document: &Map<String, Value>, base: &str, limit: &str) -> Result<(), ValidationError> {
    let value = document.get(base).and_then(Value::as_u64);
    let max = document.get(limit).and_then(Value::as_u64);
    match (value, max) {
        (Some(value), Some(max)) if max < value => Err(ValidationError::ConstraintViolation(
            format!("{} ({}) < {} ({}) after merge", limit, max, base, value),
        )),
        _ => Ok(()),
    }
}

#[async_trait]
impl<'a> Converge for VmModifyService<'a> {
    type Desired = VmModifyRequest;

    async fn converge(&self, desired: &VmModifyRequest) -> OvmResult<ChangeReport> {
        desired.validate()?;
        let id = self.ctx.resolver.resolve(ResourceKind::Vm, &desired.name).await?;
        let vm = self.ctx.read_vm_document(&id).await?;
        self.apply(&vm, &desired.properties).await
    }
}
