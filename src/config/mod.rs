//! Pipeline configuration.

use serde::Deserialize;
use std::path::PathBuf;

/// Configuration for the ripping pipeline.
///
/// Deserializable so the process bootstrap can load it from a TOML section;
/// every field has a working default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory downloaded audio files are written to.
    pub download_dir: PathBuf,
    /// Target audio format. Sources already in this format skip the
    /// transcoding stage entirely.
    pub target_format: String,
    /// Number of audio channels in transcoded output.
    pub channels: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("/tmp/infinote-downloads"),
            target_format: "mp3".to_string(),
            channels: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.target_format, "mp3");
        assert_eq!(config.channels, 2);
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let config: PipelineConfig = toml::from_str(
            r#"
            download_dir = "/var/lib/infinote/downloads"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.download_dir,
            PathBuf::from("/var/lib/infinote/downloads")
        );
        assert_eq!(config.target_format, "mp3");
        assert_eq!(config.channels, 2);
    }
}
