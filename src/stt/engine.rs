//! Whisper-based model handle

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio;
use crate::config::{ModelSize, SttConfig, TaskMode};
use crate::error::{EngineError, Result};

/// Transcription result for one audio input
#[derive(Debug, Clone)]
pub struct TranscriptionResult {
    /// Transcribed text
    pub text: String,
    /// Language the audio was transcribed as (requested or detected)
    pub language: Option<String>,
    /// Individual segments
    pub segments: Vec<TranscriptionSegment>,
}

/// Individual transcription segment
#[derive(Debug, Clone)]
pub struct TranscriptionSegment {
    /// Segment text
    pub text: String,
    /// Start time in milliseconds
    pub start_ms: i64,
    /// End time in milliseconds
    pub end_ms: i64,
}

/// Handle to the Whisper model
///
/// Constructed unloaded; the model weights are loaded on the first
/// [`ensure_loaded`](ModelHandle::ensure_loaded) call and held for the rest
/// of the process. A handle never reloads a different size within one run.
pub struct ModelHandle {
    config: SttConfig,
    ctx: Option<WhisperContext>,
}

impl ModelHandle {
    /// Create an unloaded handle for the configured model size
    pub fn new(config: SttConfig) -> Self {
        Self { config, ctx: None }
    }

    /// The model size this handle serves
    pub fn size(&self) -> ModelSize {
        self.config.model_size
    }

    /// Whether the model weights are resident
    pub fn is_loaded(&self) -> bool {
        self.ctx.is_some()
    }

    /// Locate the ggml weights file for the configured size
    ///
    /// Prefers the multilingual file, falling back to the English-only
    /// variant when only that one has been downloaded.
    pub fn locate_model(&self) -> std::result::Result<PathBuf, EngineError> {
        let primary = self
            .config
            .models_dir
            .join(self.config.model_size.ggml_file(false));
        if primary.exists() {
            return Ok(primary);
        }

        let english_only = self
            .config
            .models_dir
            .join(self.config.model_size.ggml_file(true));
        if english_only.exists() {
            return Ok(english_only);
        }

        Err(EngineError::ModelNotFound(primary.display().to_string()))
    }

    /// Load the model weights if they are not resident yet
    ///
    /// Idempotent; subsequent calls are no-ops.
    pub fn ensure_loaded(&mut self) -> Result<()> {
        if self.ctx.is_some() {
            return Ok(());
        }

        let model_path = self.locate_model()?;
        info!("Loading Whisper model from: {}", model_path.display());

        let path_str = model_path.to_str().ok_or_else(|| {
            EngineError::ModelLoad("model path contains invalid UTF-8".to_string())
        })?;

        let ctx_params = WhisperContextParameters::default();
        let ctx = WhisperContext::new_with_params(path_str, ctx_params)
            .map_err(|e| EngineError::ModelLoad(e.to_string()))?;

        info!("Whisper model loaded ({})", self.config.model_size);
        self.ctx = Some(ctx);
        Ok(())
    }

    /// Transcribe one audio file
    ///
    /// Requires a prior successful [`ensure_loaded`](ModelHandle::ensure_loaded).
    /// The language hint is passed through to Whisper; with no hint the
    /// language is auto-detected and reported in the result.
    pub fn run(
        &self,
        path: &Path,
        language: Option<&str>,
        task: TaskMode,
    ) -> Result<TranscriptionResult> {
        let ctx = self.ctx.as_ref().ok_or(EngineError::NotLoaded)?;

        let samples = audio::load_samples(path)?;
        if samples.is_empty() {
            return Err(EngineError::InvalidAudioData.into());
        }

        debug!(
            "Transcribing {} samples ({:.2}s)",
            samples.len(),
            samples.len() as f32 / audio::SAMPLE_RATE as f32
        );

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_n_threads(self.config.threads as i32);
        params.set_language(language);
        params.set_translate(task == TaskMode::Translate);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_no_context(true);

        let mut state = ctx
            .create_state()
            .map_err(|e| EngineError::Whisper(e.to_string()))?;

        state
            .full(params, &samples)
            .map_err(|e| EngineError::Transcription(e.to_string()))?;

        let num_segments = state
            .full_n_segments()
            .map_err(|e| EngineError::Transcription(e.to_string()))?;

        let mut segments = Vec::with_capacity(num_segments as usize);
        let mut full_text = String::new();

        for i in 0..num_segments {
            let text = state
                .full_get_segment_text(i)
                .map_err(|e| EngineError::Transcription(e.to_string()))?;

            let start = state
                .full_get_segment_t0(i)
                .map_err(|e| EngineError::Transcription(e.to_string()))?
                * 10; // Centiseconds to ms

            let end = state
                .full_get_segment_t1(i)
                .map_err(|e| EngineError::Transcription(e.to_string()))?
                * 10;

            if !full_text.is_empty() && !text.starts_with(' ') {
                full_text.push(' ');
            }
            full_text.push_str(text.trim());

            segments.push(TranscriptionSegment {
                text: text.trim().to_string(),
                start_ms: start,
                end_ms: end,
            });
        }

        let language = match language {
            Some(lang) => Some(lang.to_string()),
            None => state
                .full_lang_id()
                .ok()
                .and_then(whisper_rs::get_lang_str)
                .map(|s| s.to_string()),
        };

        debug!(
            "Transcription complete: {} segments, {} chars",
            segments.len(),
            full_text.len()
        );

        Ok(TranscriptionResult {
            text: full_text.trim().to_string(),
            language,
            segments,
        })
    }
}

// Safety: WhisperContext is thread-safe for inference
unsafe impl Send for ModelHandle {}
unsafe impl Sync for ModelHandle {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn handle_with_dir(dir: PathBuf) -> ModelHandle {
        ModelHandle::new(SttConfig {
            models_dir: dir,
            ..Default::default()
        })
    }

    fn test_model_path() -> Option<PathBuf> {
        let path = PathBuf::from("./models/ggml-tiny.bin");
        path.exists().then_some(path)
    }

    #[test]
    fn test_handle_starts_unloaded() {
        let handle = handle_with_dir(PathBuf::from("/nonexistent"));
        assert!(!handle.is_loaded());
        assert_eq!(handle.size(), ModelSize::Base);
    }

    #[test]
    fn test_ensure_loaded_missing_model() {
        let mut handle = handle_with_dir(PathBuf::from("/nonexistent"));
        let result = handle.ensure_loaded();
        assert!(matches!(
            result,
            Err(crate::error::TranscribeError::Engine(
                EngineError::ModelNotFound(_)
            ))
        ));
        assert!(!handle.is_loaded());
    }

    #[test]
    fn test_run_before_load() {
        let dir = tempfile::tempdir().unwrap();
        let handle = handle_with_dir(dir.path().to_path_buf());
        let result = handle.run(Path::new("a.wav"), None, TaskMode::Transcribe);
        assert!(matches!(
            result,
            Err(crate::error::TranscribeError::Engine(EngineError::NotLoaded))
        ));
    }

    #[test]
    fn test_locate_model_prefers_multilingual() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ggml-base.bin"), b"x").unwrap();
        std::fs::write(dir.path().join("ggml-base.en.bin"), b"x").unwrap();

        let handle = handle_with_dir(dir.path().to_path_buf());
        let located = handle.locate_model().unwrap();
        assert_eq!(located, dir.path().join("ggml-base.bin"));
    }

    #[test]
    fn test_locate_model_falls_back_to_english_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ggml-base.en.bin"), b"x").unwrap();

        let handle = handle_with_dir(dir.path().to_path_buf());
        let located = handle.locate_model().unwrap();
        assert_eq!(located, dir.path().join("ggml-base.en.bin"));
    }

    #[test]
    #[ignore = "requires actual model file"]
    fn test_ensure_loaded_is_idempotent() {
        let Some(model_path) = test_model_path() else {
            eprintln!("Skipping test: no model found at ./models/ggml-tiny.bin");
            return;
        };

        let mut handle = ModelHandle::new(SttConfig {
            models_dir: model_path.parent().unwrap().to_path_buf(),
            model_size: ModelSize::Tiny,
            ..Default::default()
        });

        handle.ensure_loaded().unwrap();
        assert!(handle.is_loaded());
        handle.ensure_loaded().unwrap();
        assert!(handle.is_loaded());
    }
}
