//! Fetch capability: resolving a source id to a downloadable audio stream.

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

/// One download progress report from the fetch backend.
///
/// The callback cadence is up to the backend; reports may arrive zero or
/// more times and no ordering between the reported ratios is guaranteed.
#[derive(Debug, Clone, Copy)]
pub struct DownloadProgress {
    /// Total size in bytes, when the backend knows it.
    pub total_bytes: u64,
    /// Bytes received so far.
    pub received_bytes: u64,
    /// Completion ratio in [0.0, 1.0].
    pub ratio: f64,
    /// Transfer rate in KB/s.
    pub rate_kbps: f64,
    /// Estimated seconds remaining.
    pub eta_secs: f64,
}

/// Resolves source ids to audio streams.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Look up the source and return its best audio stream, with metadata.
    /// Fails if the source id is unknown to the backend.
    async fn fetch(&self, source_id: &str) -> Result<Box<dyn AudioSource>>;
}

/// A fetched audio stream plus the metadata needed to name its file.
#[async_trait]
pub trait AudioSource: Send + Sync {
    /// Raw title as reported by the source.
    fn title(&self) -> &str;

    /// File extension of the stream (e.g. "m4a", "webm", "mp3").
    fn extension(&self) -> &str;

    /// Download the stream to `dest`, invoking `on_progress` zero or more
    /// times along the way.
    async fn download(
        &self,
        dest: &Path,
        on_progress: &(dyn Fn(DownloadProgress) + Send + Sync),
    ) -> Result<()>;
}
