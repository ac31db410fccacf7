use crate::core::domain::{
    error::{OvmError, OvmResult},
    model::identifier::Identifier,
};
use serde::Deserialize;

/// What a mutating call answers with: the freshly queued job document.
///
/// Only the job id is needed to track it; the rest of the document is
/// re-read by polling.
#[derive(Debug, Deserialize)]
pub struct JobHandle {
    #[serde(default)]
    pub id: Option<Identifier>,
}

impl JobHandle {
    /// Extracts the job id, failing if the manager did not return one.
    pub fn into_job_id(self) -> OvmResult<Identifier> {
        self.id.ok_or_else(|| {
            OvmError::UnexpectedResponse("mutation response carries no job id".to_string())
        })
    }
}
