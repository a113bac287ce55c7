//! Pipeline worker: drives one job through fetch and transcode.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::media::{clean_title, MediaFetcher, TranscodeOptions, Transcoder};

use super::models::{JobAttr, JobStage};
use super::store::JobStore;

/// Produces the externally-dereferenceable download URL for a finished job.
///
/// Supplied by the HTTP layer; the worker calls it exactly once, at the
/// transition into [`JobStage::Done`], because only the routing layer knows
/// how job files are addressed.
pub trait LinkResolver: Send + Sync {
    fn resolve(&self, owner_id: usize, job_id: &str) -> String;
}

/// Drives a single job through Init → Downloading → Converting → Done.
///
/// The worker holds only `(owner_id, job_id)` and reports through the
/// store's API; it never keeps a record across an await. Every capability
/// error takes the same path: the record is deleted and the worker stops.
/// There is no retry and no retained failure state, so to later readers a
/// failed job is indistinguishable from one that never existed.
pub struct PipelineWorker {
    store: Arc<JobStore>,
    fetcher: Arc<dyn MediaFetcher>,
    transcoder: Arc<dyn Transcoder>,
    link_resolver: Arc<dyn LinkResolver>,
    config: PipelineConfig,
    owner_id: usize,
    job_id: String,
    source_id: String,
}

impl PipelineWorker {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<JobStore>,
        fetcher: Arc<dyn MediaFetcher>,
        transcoder: Arc<dyn Transcoder>,
        link_resolver: Arc<dyn LinkResolver>,
        config: PipelineConfig,
        owner_id: usize,
        job_id: String,
        source_id: String,
    ) -> Self {
        Self {
            store,
            fetcher,
            transcoder,
            link_resolver,
            config,
            owner_id,
            job_id,
            source_id,
        }
    }

    /// Run the pipeline to completion or failure.
    pub async fn run(self) {
        if let Err(e) = self.drive().await {
            warn!(
                "Job {} (owner {}) failed, removing record: {:#}",
                self.job_id, self.owner_id, e
            );
            if self.store.delete_job(self.owner_id, &self.job_id).is_none() {
                debug!("Job {} was already gone on failure cleanup", self.job_id);
            }
        }
    }

    async fn drive(&self) -> Result<()> {
        self.store
            .advance_stage(self.owner_id, &self.job_id, JobStage::Downloading);

        let source = self
            .fetcher
            .fetch(&self.source_id)
            .await
            .context("fetching source metadata")?;

        let label = clean_title(source.title());
        let extension = source.extension().to_string();
        self.store
            .set_attribute(self.owner_id, &self.job_id, JobAttr::Label(label.clone()));

        let download_path = self
            .config
            .download_dir
            .join(format!("{}.{}", label, extension));

        info!(
            "Job {} downloading {:?} ({})",
            self.job_id, download_path, self.source_id
        );
        let on_download = self.progress_reporter();
        let download_cb = move |p: crate::media::DownloadProgress| on_download(p.ratio);
        source
            .download(&download_path, &download_cb)
            .await
            .context("downloading audio stream")?;

        let final_path = if extension == self.config.target_format {
            debug!(
                "Job {} already in target format {}, skipping conversion",
                self.job_id, self.config.target_format
            );
            download_path
        } else {
            self.convert(&download_path).await?
        };
        debug!("Job {} produced {:?}", self.job_id, final_path);

        let link = self.link_resolver.resolve(self.owner_id, &self.job_id);
        if !self
            .store
            .complete_job(self.owner_id, &self.job_id, link)
        {
            debug!("Job {} deleted before completion", self.job_id);
        } else {
            info!("Job {} done", self.job_id);
        }
        Ok(())
    }

    async fn convert(&self, input: &Path) -> Result<PathBuf> {
        self.store
            .advance_stage(self.owner_id, &self.job_id, JobStage::Converting);

        let output = input.with_extension(&self.config.target_format);
        let options = TranscodeOptions {
            format: self.config.target_format.clone(),
            channels: self.config.channels,
        };
        info!("Job {} converting to {:?}", self.job_id, output);
        let on_convert = self.progress_reporter();
        self.transcoder
            .transcode(input, &output, &options, &on_convert)
            .await
            .context("transcoding audio file")?;
        Ok(output)
    }

    /// A ratio callback that reports into the store. Once the job has been
    /// deleted `set_attribute` degrades to a no-op.
    fn progress_reporter(&self) -> impl Fn(f64) + Send + Sync {
        let store = Arc::clone(&self.store);
        let owner_id = self.owner_id;
        let job_id = self.job_id.clone();
        move |ratio: f64| {
            store.set_attribute(owner_id, &job_id, JobAttr::Progress(ratio));
        }
    }
}
