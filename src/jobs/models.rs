//! Data models for ripping jobs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stage of a ripping job.
///
/// Stages only ever advance (Init → Downloading → Converting → Done);
/// Converting is skipped when the source is already in the target format.
/// There is no failure stage: a failed job is removed from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStage {
    /// Job created, worker not yet started.
    Init,
    /// Fetching the audio stream from the remote source.
    Downloading,
    /// Transcoding the fetched file to the target format.
    Converting,
    /// Finished, result link available.
    Done,
}

impl JobStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::Downloading => "DOWNLOADING",
            Self::Converting => "CONVERTING",
            Self::Done => "DONE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "INIT" => Some(Self::Init),
            "DOWNLOADING" => Some(Self::Downloading),
            "CONVERTING" => Some(Self::Converting),
            "DONE" => Some(Self::Done),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// One unit of ripping work and its live progress.
///
/// Records live exclusively inside [`super::JobStore`]; reads hand out
/// clones, never references into the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    /// Job id, derived from the source id (see [`super::derive_job_id`]).
    pub id: String,
    /// External token identifying the media to fetch.
    pub source_id: String,
    /// Human-readable name, resolved from source metadata once the fetch
    /// stage has looked it up. Empty until then.
    pub label: String,
    /// Current pipeline stage.
    pub stage: JobStage,
    /// Progress ratio in [0.0, 1.0]; reset to 0.0 on stage entry and only
    /// meaningful while downloading or converting.
    pub progress: f64,
    /// Download URL for the finished file. Non-empty exactly when the stage
    /// is [`JobStage::Done`].
    pub result_link: String,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Instant of the last mutation, non-decreasing.
    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    /// A fresh record as the supervisor registers it: Init stage, zero
    /// progress, label and link not yet known.
    pub fn new(id: String, source_id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            source_id,
            label: String::new(),
            stage: JobStage::Init,
            progress: 0.0,
            result_link: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// The settable fields of a job record.
///
/// A closed enum instead of stringly-typed keys: workers report progress
/// through these, and the store applies them without knowing about stage
/// ordering (the worker is the only place that validates transitions).
#[derive(Debug, Clone)]
pub enum JobAttr {
    Label(String),
    Stage(JobStage),
    Progress(f64),
    ResultLink(String),
}
