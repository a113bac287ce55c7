//! Media capabilities consumed by the pipeline.
//!
//! The actual network download and audio transcoding implementations live
//! outside this crate; the pipeline only sees the traits defined here.

mod fetch;
mod naming;
mod transcode;

pub use fetch::{AudioSource, DownloadProgress, MediaFetcher};
pub use naming::{clean_channel, clean_title};
pub use transcode::{TranscodeOptions, Transcoder};
