//! Concurrency-safe job store.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::id::derive_job_id;
use super::models::{JobAttr, JobRecord, JobStage};
use super::JobError;

/// In-memory store of every in-flight and completed job, keyed owner → job.
///
/// The store is the exclusive owner of all [`JobRecord`]s: reads hand out
/// cloned snapshots and mutation goes through [`JobStore::set_attribute`] and
/// the transition helpers, so no caller can ever observe or hold a
/// half-updated record. A single store-wide mutex serializes every
/// operation; none of them block or await while holding it.
///
/// Job state is process-lifetime only. There is no persistence and no
/// failure stage: a job that fails is deleted (see
/// [`super::PipelineWorker`]).
pub struct JobStore {
    jobs: Mutex<HashMap<usize, HashMap<String, JobRecord>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self {
            jobs: Mutex::new(HashMap::new()),
        }
    }

    /// Register a new job for `(owner_id, source_id)`.
    ///
    /// Derives the job id and inserts a fresh Init record. Fails with
    /// [`JobError::DuplicateJob`] if a record for the derived id already
    /// exists; under concurrent calls for the same key exactly one caller
    /// succeeds. Returns the job id and the creation timestamp.
    pub fn create_job(
        &self,
        owner_id: usize,
        source_id: &str,
    ) -> Result<(String, DateTime<Utc>), JobError> {
        let job_id = derive_job_id(source_id)?;
        let mut jobs = self.jobs.lock().unwrap();
        let owner_jobs = jobs.entry(owner_id).or_default();
        if owner_jobs.contains_key(&job_id) {
            return Err(JobError::DuplicateJob(job_id));
        }
        let now = Utc::now();
        owner_jobs.insert(
            job_id.clone(),
            JobRecord::new(job_id.clone(), source_id.to_string(), now),
        );
        debug!("Created job {} for owner {}", job_id, owner_id);
        Ok((job_id, now))
    }

    /// Point-in-time snapshot of a single job.
    pub fn get_job(&self, owner_id: usize, job_id: &str) -> Option<JobRecord> {
        let jobs = self.jobs.lock().unwrap();
        jobs.get(&owner_id).and_then(|m| m.get(job_id)).cloned()
    }

    /// Snapshot of all jobs of an owner. Empty map for an unknown owner.
    pub fn get_owner_jobs(&self, owner_id: usize) -> HashMap<String, JobRecord> {
        let jobs = self.jobs.lock().unwrap();
        jobs.get(&owner_id).cloned().unwrap_or_default()
    }

    /// Set one field of a job and refresh its `updated_at`.
    ///
    /// Returns `false` without doing anything if the job is gone; workers
    /// rely on this when racing with a caller-initiated delete. Progress
    /// values are clamped into `[0.0, 1.0]`.
    pub fn set_attribute(&self, owner_id: usize, job_id: &str, attr: JobAttr) -> bool {
        let mut jobs = self.jobs.lock().unwrap();
        let Some(record) = jobs.get_mut(&owner_id).and_then(|m| m.get_mut(job_id)) else {
            return false;
        };
        match attr {
            JobAttr::Label(label) => record.label = label,
            JobAttr::Stage(stage) => record.stage = stage,
            JobAttr::Progress(ratio) => record.progress = ratio.clamp(0.0, 1.0),
            JobAttr::ResultLink(link) => record.result_link = link,
        }
        record.updated_at = Utc::now();
        true
    }

    /// Move a job to `stage` and reset its progress to 0.0 in one step.
    ///
    /// Stage ordering is the worker's responsibility; the store only applies
    /// the transition atomically so readers never see a new stage with the
    /// previous stage's progress.
    pub fn advance_stage(&self, owner_id: usize, job_id: &str, stage: JobStage) -> bool {
        let mut jobs = self.jobs.lock().unwrap();
        let Some(record) = jobs.get_mut(&owner_id).and_then(|m| m.get_mut(job_id)) else {
            return false;
        };
        record.stage = stage;
        record.progress = 0.0;
        record.updated_at = Utc::now();
        true
    }

    /// Terminal success transition: Done, full progress and the result link,
    /// applied under one lock so `result_link` is never visible outside the
    /// Done stage.
    pub fn complete_job(&self, owner_id: usize, job_id: &str, result_link: String) -> bool {
        let mut jobs = self.jobs.lock().unwrap();
        let Some(record) = jobs.get_mut(&owner_id).and_then(|m| m.get_mut(job_id)) else {
            return false;
        };
        record.stage = JobStage::Done;
        record.progress = 1.0;
        record.result_link = result_link;
        record.updated_at = Utc::now();
        true
    }

    /// Remove a job, returning the prior record if it existed.
    pub fn delete_job(&self, owner_id: usize, job_id: &str) -> Option<JobRecord> {
        let mut jobs = self.jobs.lock().unwrap();
        let removed = jobs.get_mut(&owner_id).and_then(|m| m.remove(job_id));
        if removed.is_some() {
            debug!("Deleted job {} for owner {}", job_id, owner_id);
        }
        removed
    }
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const SOURCE: &str = "11111111111";
    const JOB_ID: &str = "4949494949494949494949";

    #[test]
    fn test_create_and_get() {
        let store = JobStore::new();
        let (job_id, created_at) = store.create_job(1, SOURCE).unwrap();
        assert_eq!(job_id, JOB_ID);

        let record = store.get_job(1, &job_id).unwrap();
        assert_eq!(record.source_id, SOURCE);
        assert_eq!(record.stage, JobStage::Init);
        assert_eq!(record.created_at, created_at);
    }

    #[test]
    fn test_create_rejects_duplicate() {
        let store = JobStore::new();
        store.create_job(1, SOURCE).unwrap();
        assert!(matches!(
            store.create_job(1, SOURCE),
            Err(JobError::DuplicateJob(_))
        ));
    }

    #[test]
    fn test_same_source_different_owners_coexist() {
        let store = JobStore::new();
        store.create_job(1, SOURCE).unwrap();
        store.create_job(2, SOURCE).unwrap();
        assert!(store.get_job(1, JOB_ID).is_some());
        assert!(store.get_job(2, JOB_ID).is_some());
    }

    #[test]
    fn test_get_owner_jobs_snapshot() {
        let store = JobStore::new();
        assert!(store.get_owner_jobs(7).is_empty());

        store.create_job(7, SOURCE).unwrap();
        store.create_job(7, "dQw4w9WgXcQ").unwrap();
        let snapshot = store.get_owner_jobs(7);
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.contains_key(JOB_ID));

        // Mutating the store after the fact does not change the snapshot.
        store.delete_job(7, JOB_ID);
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_set_attribute_on_missing_job_is_noop() {
        let store = JobStore::new();
        assert!(!store.set_attribute(1, JOB_ID, JobAttr::Progress(0.5)));
        assert!(!store.advance_stage(1, JOB_ID, JobStage::Downloading));
        assert!(!store.complete_job(1, JOB_ID, "link".to_string()));
    }

    #[test]
    fn test_progress_is_clamped() {
        let store = JobStore::new();
        let (job_id, _) = store.create_job(1, SOURCE).unwrap();

        store.set_attribute(1, &job_id, JobAttr::Progress(1.7));
        assert_eq!(store.get_job(1, &job_id).unwrap().progress, 1.0);

        store.set_attribute(1, &job_id, JobAttr::Progress(-0.3));
        assert_eq!(store.get_job(1, &job_id).unwrap().progress, 0.0);
    }

    #[test]
    fn test_updated_at_is_non_decreasing() {
        let store = JobStore::new();
        let (job_id, created_at) = store.create_job(1, SOURCE).unwrap();
        store.set_attribute(1, &job_id, JobAttr::Progress(0.5));
        let after_first = store.get_job(1, &job_id).unwrap().updated_at;
        store.set_attribute(1, &job_id, JobAttr::Progress(0.6));
        let after_second = store.get_job(1, &job_id).unwrap().updated_at;
        assert!(after_first >= created_at);
        assert!(after_second >= after_first);
    }

    #[test]
    fn test_advance_stage_resets_progress() {
        let store = JobStore::new();
        let (job_id, _) = store.create_job(1, SOURCE).unwrap();
        store.advance_stage(1, &job_id, JobStage::Downloading);
        store.set_attribute(1, &job_id, JobAttr::Progress(0.9));

        store.advance_stage(1, &job_id, JobStage::Converting);
        let record = store.get_job(1, &job_id).unwrap();
        assert_eq!(record.stage, JobStage::Converting);
        assert_eq!(record.progress, 0.0);
    }

    #[test]
    fn test_complete_job_sets_link_and_full_progress() {
        let store = JobStore::new();
        let (job_id, _) = store.create_job(1, SOURCE).unwrap();
        store.advance_stage(1, &job_id, JobStage::Downloading);

        assert!(store.complete_job(1, &job_id, "http://example/file".to_string()));
        let record = store.get_job(1, &job_id).unwrap();
        assert_eq!(record.stage, JobStage::Done);
        assert_eq!(record.progress, 1.0);
        assert_eq!(record.result_link, "http://example/file");
    }

    #[test]
    fn test_delete_returns_prior_record() {
        let store = JobStore::new();
        let (job_id, _) = store.create_job(1, SOURCE).unwrap();

        let removed = store.delete_job(1, &job_id).unwrap();
        assert_eq!(removed.id, job_id);
        assert!(store.get_job(1, &job_id).is_none());
        assert!(store.delete_job(1, &job_id).is_none());
    }

    #[test]
    fn test_concurrent_create_has_exactly_one_winner() {
        let store = Arc::new(JobStore::new());
        let threads: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.create_job(1, SOURCE).is_ok())
            })
            .collect();

        let successes = threads
            .into_iter()
            .map(|t| t.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(successes, 1);
        assert_eq!(store.get_owner_jobs(1).len(), 1);
    }
}
