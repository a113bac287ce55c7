//! Job supervisor: validates submissions and launches pipeline workers.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::media::{MediaFetcher, Transcoder};

use super::id::extract_source_id;
use super::models::JobRecord;
use super::store::JobStore;
use super::worker::{LinkResolver, PipelineWorker};

/// Errors surfaced to callers of the job API.
///
/// Pipeline failures are not part of this taxonomy: they happen inside the
/// worker after `submit` has already returned, and their only observable
/// effect is the record's disappearance from the store.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Invalid source: {0}")]
    InvalidSource(String),

    #[error("Job is already being processed: {0}")]
    DuplicateJob(String),

    #[error("Job not found: {0}")]
    NotFound(String),

    #[error("Failed to launch pipeline worker: {0}")]
    WorkerLaunch(String),
}

/// The single entry point that creates ripping work.
///
/// Owns the [`JobStore`] and the capability collaborators, and exposes the
/// surface the HTTP layer builds on: [`submit`](Self::submit),
/// [`get_job`](Self::get_job), [`get_owner_jobs`](Self::get_owner_jobs) and
/// [`delete_job`](Self::delete_job).
pub struct JobManager {
    store: Arc<JobStore>,
    fetcher: Arc<dyn MediaFetcher>,
    transcoder: Arc<dyn Transcoder>,
    link_resolver: Arc<dyn LinkResolver>,
    config: PipelineConfig,
}

impl JobManager {
    pub fn new(
        fetcher: Arc<dyn MediaFetcher>,
        transcoder: Arc<dyn Transcoder>,
        link_resolver: Arc<dyn LinkResolver>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store: Arc::new(JobStore::new()),
            fetcher,
            transcoder,
            link_resolver,
            config,
        }
    }

    /// Validate a submitted link, register the job and launch its worker.
    ///
    /// Fails synchronously with [`JobError::InvalidSource`] when no source
    /// token can be extracted and [`JobError::DuplicateJob`] when the owner
    /// already has an active job for that source. If the worker cannot be
    /// launched the freshly created record is rolled back so the store never
    /// holds an Init job with nothing driving it.
    pub fn submit(&self, owner_id: usize, link: &str) -> Result<String, JobError> {
        let source_id = extract_source_id(link).ok_or_else(|| {
            JobError::InvalidSource(format!("unable to extract source id from '{}'", link))
        })?;

        let (job_id, created_at) = self.store.create_job(owner_id, &source_id)?;
        debug!(
            "Registered job {} for owner {} at {}",
            job_id, owner_id, created_at
        );

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!(
                    "No runtime to launch worker for job {}, rolling back: {}",
                    job_id, e
                );
                self.store.delete_job(owner_id, &job_id);
                return Err(JobError::WorkerLaunch(e.to_string()));
            }
        };

        let worker = PipelineWorker::new(
            Arc::clone(&self.store),
            Arc::clone(&self.fetcher),
            Arc::clone(&self.transcoder),
            Arc::clone(&self.link_resolver),
            self.config.clone(),
            owner_id,
            job_id.clone(),
            source_id,
        );
        runtime.spawn(worker.run());
        info!("Launched pipeline worker for job {} (owner {})", job_id, owner_id);

        Ok(job_id)
    }

    /// Snapshot of a single job, if present.
    pub fn get_job(&self, owner_id: usize, job_id: &str) -> Option<JobRecord> {
        self.store.get_job(owner_id, job_id)
    }

    /// Snapshot of all jobs of an owner.
    pub fn get_owner_jobs(&self, owner_id: usize) -> HashMap<String, JobRecord> {
        self.store.get_owner_jobs(owner_id)
    }

    /// Remove a job, returning the removed record.
    pub fn delete_job(&self, owner_id: usize, job_id: &str) -> Result<JobRecord, JobError> {
        self.store
            .delete_job(owner_id, job_id)
            .ok_or_else(|| JobError::NotFound(job_id.to_string()))
    }
}
