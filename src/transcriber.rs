//! Transcription orchestration over single files and directories

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, warn};

use crate::config::TaskMode;
use crate::error::Result;
use crate::output;
use crate::progress::StatusSink;
use crate::resolver;
use crate::stt::{ModelHandle, TranscriptionResult};

/// One transcription invocation
#[derive(Debug, Clone)]
pub struct TranscribeRequest {
    /// Audio file to transcribe
    pub audio_path: PathBuf,
    /// Directory the outputs are written to
    pub output_dir: PathBuf,
    /// Language hint (None = auto-detect)
    pub language: Option<String>,
    /// Task to perform
    pub task: TaskMode,
    /// Also persist the full result as JSON
    pub save_json: bool,
}

/// Outcome of a batch run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    /// Files matched by the resolver
    pub found: usize,
    /// Files transcribed and written
    pub transcribed: usize,
    /// Files that failed
    pub failed: usize,
}

/// Drives the model handle over one or many inputs
///
/// Owns the [`ModelHandle`] for its lifetime; the model is loaded once on
/// first use and reused for every file.
pub struct Transcriber<S: StatusSink> {
    handle: ModelHandle,
    status: S,
}

impl<S: StatusSink> Transcriber<S> {
    pub fn new(handle: ModelHandle, status: S) -> Self {
        Self { handle, status }
    }

    fn ensure_loaded(&mut self) -> Result<()> {
        if self.handle.is_loaded() {
            return Ok(());
        }
        self.status.model_loading(self.handle.size());
        let start = Instant::now();
        self.handle.ensure_loaded()?;
        self.status.model_loaded(start.elapsed());
        Ok(())
    }

    /// Transcribe a single file, writing text and (optionally) JSON output
    pub fn process_one(&mut self, request: &TranscribeRequest) -> Result<TranscriptionResult> {
        self.ensure_loaded()?;

        self.status.file_started(&request.audio_path, 0, 1);
        let start = Instant::now();

        let result = self.handle.run(
            &request.audio_path,
            request.language.as_deref(),
            request.task,
        )?;

        let (text_path, json_path) =
            output::single_output_paths(&request.audio_path, &request.output_dir);
        output::write_text(&result.text, &text_path)?;
        self.status
            .file_finished(&request.audio_path, &text_path, start.elapsed());

        if request.save_json {
            output::write_record(&result, &json_path)?;
            self.status
                .note(&format!("JSON record saved to: {}", json_path.display()));
        }

        Ok(result)
    }

    /// Transcribe every matching file under `audio_dir`, text output only
    ///
    /// A failing file is reported and counted but does not stop the batch;
    /// the caller decides what a non-zero `failed` count means.
    pub fn process_many(
        &mut self,
        audio_dir: &Path,
        output_dir: &Path,
        extensions: &[String],
    ) -> Result<BatchSummary> {
        let files = resolver::resolve(audio_dir, extensions)?;
        let mut summary = BatchSummary {
            found: files.len(),
            ..BatchSummary::default()
        };

        if files.is_empty() {
            self.status
                .note("No audio files found with the requested extensions");
            return Ok(summary);
        }

        self.status
            .note(&format!("Found {} audio files to process", files.len()));
        self.ensure_loaded()?;

        for (index, file) in files.iter().enumerate() {
            self.status.file_started(file, index, files.len());
            let start = Instant::now();

            let outcome = self
                .handle
                .run(file, None, TaskMode::Transcribe)
                .and_then(|result| {
                    let out_path = output::batch_output_path(file, output_dir);
                    output::write_text(&result.text, &out_path)?;
                    Ok(out_path)
                });

            match outcome {
                Ok(out_path) => {
                    summary.transcribed += 1;
                    self.status.file_finished(file, &out_path, start.elapsed());
                }
                Err(e) => {
                    summary.failed += 1;
                    warn!("Transcription failed for {}: {}", file.display(), e);
                    self.status.file_failed(file, &e.to_string());
                }
            }
        }

        info!(
            "Batch complete: {} transcribed, {} failed",
            summary.transcribed, summary.failed
        );
        self.status.note(&format!(
            "Batch complete: {} transcribed, {} failed",
            summary.transcribed, summary.failed
        ));

        Ok(summary)
    }
}
