//! Domain models for the manager's asynchronous jobs.
//!
//! Every mutating call returns a job; its effect is only known once the job
//! document served by `/Job/{id}` reports `summaryDone`.

use super::identifier::Identifier;
use serde::{Deserialize, Serialize};

/// Run-state reported in a job document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum JobRunState {
    Success,
    Failure,
    Running,
    /// Any state this crate does not distinguish (e.g. `ABORTED`).
    Other(String),
}

impl From<String> for JobRunState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "SUCCESS" => JobRunState::Success,
            "FAILURE" => JobRunState::Failure,
            "RUNNING" => JobRunState::Running,
            _ => JobRunState::Other(value),
        }
    }
}

impl From<JobRunState> for String {
    fn from(value: JobRunState) -> Self {
        match value {
            JobRunState::Success => "SUCCESS".to_string(),
            JobRunState::Failure => "FAILURE".to_string(),
            JobRunState::Running => "RUNNING".to_string(),
            JobRunState::Other(other) => other,
        }
    }
}

/// A job as returned by `/Job/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// The job identifier.
    pub id: Identifier,
    /// Set once the manager stopped working on the job.
    #[serde(default)]
    pub summary_done: bool,
    /// Current run-state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_run_state: Option<JobRunState>,
    /// Object produced by the job (e.g. the VM created by a clone).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_id: Option<Identifier>,
    /// Manager-supplied failure detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<serde_json::Value>,
}

impl Job {
    /// Renders the manager's error detail as text.
    pub fn error_detail(&self) -> String {
        match &self.error {
            Some(serde_json::Value::String(message)) => message.clone(),
            Some(serde_json::Value::Object(fields)) => fields
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| serde_json::Value::Object(fields.clone()).to_string()),
            Some(other) => other.to_string(),
            None => "no error detail supplied".to_string(),
        }
    }
}

/// Terminal, successful result of a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// The job produced a new object.
    Succeeded(Identifier),
    /// The job finished without a result object.
    SucceededNoResult,
}

impl JobOutcome {
    /// Returns the produced object, if any.
    pub fn result_id(&self) -> Option<&Identifier> {
        match self {
            JobOutcome::Succeeded(id) => Some(id),
            JobOutcome::SucceededNoResult => None,
        }
    }

    /// Consumes the outcome and returns the produced object, if any.
    pub fn into_result_id(self) -> Option<Identifier> {
        match self {
            JobOutcome::Succeeded(id) => Some(id),
            JobOutcome::SucceededNoResult => None,
        }
    }
}
