//! Coarse status reporting
//!
//! The orchestrator reports progress through the [`StatusSink`] trait so it
//! can run without a terminal attached. Sinks are presentation only and must
//! not alter data flow or results.

use std::path::Path;
use std::time::Duration;

use crate::config::ModelSize;

/// Narrow interface for surfacing run status
pub trait StatusSink {
    /// Model load started
    fn model_loading(&self, size: ModelSize);
    /// Model load finished
    fn model_loaded(&self, elapsed: Duration);
    /// Transcription of one file started
    fn file_started(&self, path: &Path, index: usize, total: usize);
    /// Transcription of one file finished and its output was written
    fn file_finished(&self, path: &Path, output: &Path, elapsed: Duration);
    /// Transcription of one file failed
    fn file_failed(&self, path: &Path, message: &str);
    /// Free-form status line
    fn note(&self, message: &str);
}

/// Terminal status sink
pub struct ConsoleStatus;

impl StatusSink for ConsoleStatus {
    fn model_loading(&self, size: ModelSize) {
        println!("Loading Whisper model ({})...", size);
    }

    fn model_loaded(&self, elapsed: Duration) {
        println!("Model loaded in {:.1}s", elapsed.as_secs_f32());
    }

    fn file_started(&self, path: &Path, index: usize, total: usize) {
        if total > 1 {
            println!("[{}/{}] Transcribing {}", index + 1, total, display_name(path));
        } else {
            println!("Transcribing {}", display_name(path));
        }
    }

    fn file_finished(&self, _path: &Path, output: &Path, elapsed: Duration) {
        println!(
            "Transcription saved to: {} ({:.1}s)",
            output.display(),
            elapsed.as_secs_f32()
        );
    }

    fn file_failed(&self, path: &Path, message: &str) {
        eprintln!("Failed to transcribe {}: {}", display_name(path), message);
    }

    fn note(&self, message: &str) {
        println!("{}", message);
    }
}

/// No-op sink for tests and embedding
pub struct SilentStatus;

impl StatusSink for SilentStatus {
    fn model_loading(&self, _size: ModelSize) {}
    fn model_loaded(&self, _elapsed: Duration) {}
    fn file_started(&self, _path: &Path, _index: usize, _total: usize) {}
    fn file_finished(&self, _path: &Path, _output: &Path, _elapsed: Duration) {}
    fn file_failed(&self, _path: &Path, _message: &str) {}
    fn note(&self, _message: &str) {}
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_sink_does_nothing() {
        let sink = SilentStatus;
        sink.model_loading(ModelSize::Base);
        sink.model_loaded(Duration::from_secs(1));
        sink.file_started(Path::new("a.wav"), 0, 2);
        sink.file_finished(Path::new("a.wav"), Path::new("a.txt"), Duration::ZERO);
        sink.file_failed(Path::new("a.wav"), "nope");
        sink.note("note");
    }

    #[test]
    fn test_display_name_uses_file_name() {
        assert_eq!(display_name(Path::new("/x/y/talk.mp3")), "talk.mp3");
    }
}
