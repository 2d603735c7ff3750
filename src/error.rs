//! Custom error types for audio-transcribe

use thiserror::Error;

/// Main error type for the audio-transcribe crate
#[derive(Error, Debug)]
pub enum TranscribeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Audio decoding errors
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Failed to open audio file {path}: {reason}")]
    Open { path: String, reason: String },

    #[error("Unsupported bit depth: {0}")]
    UnsupportedBitDepth(u16),

    #[error("No audio track found in: {0}")]
    NoAudioTrack(String),

    #[error("Failed to decode audio: {0}")]
    Decode(String),
}

/// Model handle errors
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Model file not found: {0} (fetch it with the download-model subcommand)")]
    ModelNotFound(String),

    #[error("Failed to load model: {0}")]
    ModelLoad(String),

    #[error("Model is not loaded")]
    NotLoaded,

    #[error("Invalid audio data for transcription")]
    InvalidAudioData,

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Whisper error: {0}")]
    Whisper(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, TranscribeError>;
