//! Job tracking and the ripping pipeline.
//!
//! One job per (owner, source) pair, driven through
//! Init → Downloading → Converting → Done by a background worker. The store
//! is the single owner of all job records; everything else holds ids and
//! goes through its API.

mod id;
mod manager;
mod models;
mod store;
mod worker;

pub use id::{derive_job_id, extract_source_id, SOURCE_ID_LEN};
pub use manager::{JobError, JobManager};
pub use models::{JobAttr, JobRecord, JobStage};
pub use store::JobStore;
pub use worker::{LinkResolver, PipelineWorker};
