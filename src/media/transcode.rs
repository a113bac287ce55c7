//! Transcode capability: converting a downloaded file to the target format.

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

/// Options passed to the transcode backend.
#[derive(Debug, Clone)]
pub struct TranscodeOptions {
    /// Target container/codec format.
    pub format: String,
    /// Number of audio channels in the output.
    pub channels: u32,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        Self {
            format: "mp3".to_string(),
            channels: 2,
        }
    }
}

/// Converts audio files between formats.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Transcode `input` into `output` with the given options, invoking
    /// `on_progress` with a completion ratio in [0.0, 1.0] zero or more
    /// times.
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        options: &TranscodeOptions,
        on_progress: &(dyn Fn(f64) + Send + Sync),
    ) -> Result<()>;
}
