//! Drives a mutation's job to a terminal state.

use crate::{
    core::{
        domain::{
            error::{OvmError, OvmResult},
            model::{
                identifier::{Identifier, ResourceKind},
                job::{Job, JobOutcome, JobRunState},
                ovm_config::PollingConfig,
            },
        },
        infrastructure::api_client::ApiClient,
    },
    job::application::response::job_response::JobHandle,
};
use std::future::Future;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

/// Submits mutations and polls their jobs until the manager reports them done.
///
/// Every state-changing call in the crate goes through [`JobService::submit`];
/// a mutation is not considered applied before its job is terminal.
#[derive(Debug, Clone, Copy)]
pub struct JobService<'a> {
    api: &'a ApiClient,
    polling: PollingConfig,
}

impl<'a> JobService<'a> {
    pub fn new(api: &'a ApiClient, polling: PollingConfig) -> Self {
        Self { api, polling }
    }

    /// Sends a mutation and waits for the job it queued.
    ///
    /// # Errors
    /// * the mutation's own transport error
    /// * `OvmError::UnexpectedResponse` if the response names no job
    /// * `OvmError::JobFailure` / `OvmError::Timeout` from [`JobService::wait`]
    pub async fn submit<F>(&self, mutation: F) -> OvmResult<JobOutcome>
    where
        F: Future<Output = OvmResult<JobHandle>>,
    {
        let job = mutation.await?.into_job_id()?;
        info!(job = %job.value, name = job.name_or_empty(), "job submitted");
        self.wait(&job).await
    }

    /// Polls `/Job/{id}` with exponential backoff until the job is done.
    ///
    /// A job flagged done but still `RUNNING` keeps being polled. `FAILURE`
    /// becomes `OvmError::JobFailure`; `SUCCESS` yields the result id when
    /// the job has one; any other terminal state counts as a success
    /// without result.
    pub async fn wait(&self, job: &Identifier) -> OvmResult<JobOutcome> {
        let started = Instant::now();
        let path = ResourceKind::Job.path_of(job);
        let mut interval = self.polling.initial_interval;
        let mut polls: u32 = 0;

        loop {
            let current: Job = self.api.get(&path).await?;
            polls += 1;

            if current.summary_done {
                match &current.job_run_state {
                    Some(JobRunState::Failure) => {
                        let detail = current.error_detail();
                        warn!(job = %job.value, polls, %detail, "job failed");
                        return Err(OvmError::JobFailure {
                            job: current.id,
                            detail,
                        });
                    }
                    Some(JobRunState::Success) => {
                        info!(job = %job.value, polls, "job succeeded");
                        return Ok(match current.result_id {
                            Some(result) => JobOutcome::Succeeded(result),
                            None => JobOutcome::SucceededNoResult,
                        });
                    }
                    Some(JobRunState::Running) => {}
                    other => {
                        info!(job = %job.value, polls, state = ?other, "job finished");
                        return Ok(JobOutcome::SucceededNoResult);
                    }
                }
            }

            let elapsed = started.elapsed();
            if elapsed >= self.polling.max_wait {
                warn!(job = %job.value, polls, ?elapsed, "gave up waiting for job");
                return Err(OvmError::Timeout {
                    job: job.clone(),
                    waited: elapsed,
                });
            }

            debug!(job = %job.value, polls, ?interval, "job still running");
            sleep(interval.min(self.polling.max_wait - elapsed)).await;
            interval = self.polling.next_interval(interval);
        }
    }
}
