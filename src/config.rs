//! Configuration structures for audio-transcribe

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub stt: SttConfig,
    pub batch: BatchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stt: SttConfig::default(),
            batch: BatchConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, crate::error::ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| {
            crate::error::ConfigError::FileNotFound(path.display().to_string())
        })?;

        toml::from_str(&content)
            .map_err(|e| crate::error::ConfigError::Parse(e.to_string()))
    }
}

/// STT engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SttConfig {
    /// Directory holding ggml model files
    pub models_dir: PathBuf,
    /// Model size to load when none is given on the command line
    pub model_size: ModelSize,
    /// Default language hint (None = auto-detect)
    pub language: Option<String>,
    /// Number of threads for inference
    pub threads: u32,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("./models"),
            model_size: ModelSize::Base,
            language: None,
            threads: 4,
        }
    }
}

/// Batch mode configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Audio file extensions to process
    pub extensions: Vec<String>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            extensions: ["mp3", "wav", "m4a", "ogg", "flac"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Whisper model sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelSize {
    Tiny,
    Base,
    Small,
    Medium,
    Large,
}

impl ModelSize {
    /// File name of the ggml weights for this size
    pub fn ggml_file(self, english_only: bool) -> String {
        let suffix = if english_only { ".en" } else { "" };
        format!("ggml-{}{}.bin", self, suffix)
    }
}

impl std::fmt::Display for ModelSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelSize::Tiny => write!(f, "tiny"),
            ModelSize::Base => write!(f, "base"),
            ModelSize::Small => write!(f, "small"),
            ModelSize::Medium => write!(f, "medium"),
            ModelSize::Large => write!(f, "large"),
        }
    }
}

/// Transcription task mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TaskMode {
    /// Transcribe in the source language
    Transcribe,
    /// Translate to English
    Translate,
}

impl std::fmt::Display for TaskMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskMode::Transcribe => write!(f, "transcribe"),
            TaskMode::Translate => write!(f, "translate"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.stt.model_size, ModelSize::Base);
        assert_eq!(config.stt.models_dir, PathBuf::from("./models"));
        assert_eq!(config.stt.threads, 4);
        assert!(config.stt.language.is_none());
        assert_eq!(
            config.batch.extensions,
            vec!["mp3", "wav", "m4a", "ogg", "flac"]
        );
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
            [stt]
            models_dir = "/opt/models"
            model_size = "small"
            language = "de"
            threads = 8

            [batch]
            extensions = ["wav"]
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.stt.models_dir, PathBuf::from("/opt/models"));
        assert_eq!(config.stt.model_size, ModelSize::Small);
        assert_eq!(config.stt.language.as_deref(), Some("de"));
        assert_eq!(config.stt.threads, 8);
        assert_eq!(config.batch.extensions, vec!["wav"]);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let toml_str = r#"
            [stt]
            model_size = "tiny"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.stt.model_size, ModelSize::Tiny);
        assert_eq!(config.stt.threads, 4);
        assert_eq!(config.batch.extensions.len(), 5);
    }

    #[test]
    fn test_ggml_file_names() {
        assert_eq!(ModelSize::Base.ggml_file(false), "ggml-base.bin");
        assert_eq!(ModelSize::Base.ggml_file(true), "ggml-base.en.bin");
        assert_eq!(ModelSize::Large.ggml_file(false), "ggml-large.bin");
    }

    #[test]
    fn test_model_size_display() {
        assert_eq!(ModelSize::Tiny.to_string(), "tiny");
        assert_eq!(ModelSize::Medium.to_string(), "medium");
        assert_eq!(TaskMode::Translate.to_string(), "translate");
    }
}
