//! Audio file transcription with a local Whisper model
//!
//! A thin command-line wrapper that feeds audio files into a pre-trained
//! Whisper model (via `whisper-rs`) and writes the transcribed text, singly
//! or in batch over a directory.
//!
//! # Architecture
//!
//! - `audio`: audio file decoding into 16 kHz mono samples
//! - `stt`: the Whisper model handle
//! - `resolver`: batch-mode input file enumeration
//! - `transcriber`: orchestration over one or many inputs
//! - `output`: transcript file naming and writing
//! - `progress`: status reporting
//! - `config`: configuration structures
//! - `error`: error types
//!
//! # Example
//!
//! ```no_run
//! use audio_transcribe::{
//!     Config, ConsoleStatus, ModelHandle, TaskMode, TranscribeRequest, Transcriber,
//! };
//!
//! let config = Config::default();
//! let handle = ModelHandle::new(config.stt);
//! let mut transcriber = Transcriber::new(handle, ConsoleStatus);
//!
//! let request = TranscribeRequest {
//!     audio_path: "talk.mp3".into(),
//!     output_dir: ".".into(),
//!     language: None,
//!     task: TaskMode::Transcribe,
//!     save_json: false,
//! };
//! let result = transcriber.process_one(&request).unwrap();
//! println!("{}", result.text);
//! ```

pub mod audio;
pub mod config;
pub mod error;
pub mod output;
pub mod progress;
pub mod resolver;
pub mod stt;
pub mod transcriber;

// Re-exports for convenience
pub use config::{BatchConfig, Config, ModelSize, SttConfig, TaskMode};
pub use error::{AudioError, ConfigError, EngineError, Result, TranscribeError};
pub use progress::{ConsoleStatus, SilentStatus, StatusSink};
pub use stt::{ModelHandle, TranscriptionResult, TranscriptionSegment};
pub use transcriber::{BatchSummary, TranscribeRequest, Transcriber};
