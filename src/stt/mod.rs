//! Speech-to-text engine modules

pub mod engine;

pub use engine::{ModelHandle, TranscriptionResult, TranscriptionSegment};
