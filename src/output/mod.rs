//! Transcript output writing
//!
//! Single-file mode embeds a second-resolution timestamp in the output name
//! so repeated runs never collide; batch mode writes a bare
//! `<stem>_transcript.txt`, so repeated batch runs overwrite prior output
//! for the same input.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::stt::TranscriptionResult;

/// Serializable record of a full transcription result
#[derive(Debug, Serialize)]
struct JsonRecord<'a> {
    text: &'a str,
    language: Option<&'a str>,
    segments: Vec<JsonSegment<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonSegment<'a> {
    text: &'a str,
    start_ms: i64,
    end_ms: i64,
}

impl<'a> From<&'a TranscriptionResult> for JsonRecord<'a> {
    fn from(result: &'a TranscriptionResult) -> Self {
        Self {
            text: &result.text,
            language: result.language.as_deref(),
            segments: result
                .segments
                .iter()
                .map(|s| JsonSegment {
                    text: &s.text,
                    start_ms: s.start_ms,
                    end_ms: s.end_ms,
                })
                .collect(),
        }
    }
}

/// Timestamp string for output file names (second resolution, local time)
pub fn timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Output paths for single-file mode: `<stem>_transcript_<ts>.{txt,json}`
pub fn single_output_paths(audio_path: &Path, output_dir: &Path) -> (PathBuf, PathBuf) {
    let stem = file_stem(audio_path);
    let ts = timestamp();
    (
        output_dir.join(format!("{}_transcript_{}.txt", stem, ts)),
        output_dir.join(format!("{}_transcript_{}.json", stem, ts)),
    )
}

/// Output path for batch mode: `<stem>_transcript.txt`, no timestamp
pub fn batch_output_path(audio_path: &Path, output_dir: &Path) -> PathBuf {
    output_dir.join(format!("{}_transcript.txt", file_stem(audio_path)))
}

/// Write transcription text, creating parent directories as needed
///
/// Overwrites an existing file at `path`.
pub fn write_text(text: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)?;
    debug!("Transcription written to {}", path.display());
    Ok(())
}

/// Write the full result as a pretty-printed JSON document
///
/// Same creation and overwrite semantics as [`write_text`].
pub fn write_record(result: &TranscriptionResult, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let record = JsonRecord::from(result);
    let json = serde_json::to_string_pretty(&record).map_err(std::io::Error::other)?;
    fs::write(path, json)?;
    debug!("JSON record written to {}", path.display());
    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio".to_string())
}
