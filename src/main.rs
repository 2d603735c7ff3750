//! Audio transcription CLI

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use audio_transcribe::{
    Config, ConsoleStatus, ModelHandle, ModelSize, TaskMode, TranscribeError, TranscribeRequest,
    Transcriber,
};

/// Transcribe audio files using a local Whisper model
#[derive(Parser)]
#[command(name = "audio-transcribe")]
#[command(about = "Transcribe audio files using a local Whisper model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Transcribe a single audio file
    Transcribe {
        /// Path to the audio file to transcribe
        audio_path: PathBuf,

        /// Directory to save the transcription (default: same as the audio file)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Whisper model size to use
        #[arg(short, long)]
        model: Option<ModelSize>,

        /// Language of the audio (e.g. "en", "fr", "zh"); auto-detected when omitted
        #[arg(short, long)]
        language: Option<String>,

        /// Task to perform: transcribe, or translate to English
        #[arg(short, long, default_value = "transcribe")]
        task: TaskMode,

        /// Also save the full transcription result as JSON
        #[arg(short = 'j', long)]
        save_json: bool,
    },

    /// Batch transcribe all matching audio files in a directory
    Batch {
        /// Directory containing audio files to transcribe
        audio_dir: PathBuf,

        /// Directory to save the transcriptions (default: <audio_dir>/transcriptions)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Whisper model size to use
        #[arg(short, long)]
        model: Option<ModelSize>,

        /// Audio file extensions to process
        #[arg(short, long)]
        extensions: Vec<String>,
    },

    /// Download a Whisper model
    DownloadModel {
        /// Model size
        #[arg(short, long, default_value = "base")]
        size: ModelSize,

        /// Download the English-only model (smaller, faster)
        #[arg(long)]
        english_only: bool,

        /// Directory to store the model (default: the configured models dir)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Setup logging - quiet by default, use -v for more
    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(log_level.into()))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let mut config = if let Some(ref config_path) = cli.config {
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        Config::default()
    };

    match cli.command {
        Commands::Transcribe {
            audio_path,
            output_dir,
            model,
            language,
            task,
            save_json,
        } => {
            if !audio_path.is_file() {
                return Err(TranscribeError::InvalidInput(format!(
                    "audio file not found: {}",
                    audio_path.display()
                ))
                .into());
            }

            // Apply CLI overrides
            if let Some(model) = model {
                config.stt.model_size = model;
            }
            let language = language.or_else(|| config.stt.language.clone());
            let output_dir = output_dir.unwrap_or_else(|| parent_dir(&audio_path));

            let handle = ModelHandle::new(config.stt);
            let mut transcriber = Transcriber::new(handle, ConsoleStatus);

            let request = TranscribeRequest {
                audio_path,
                output_dir,
                language,
                task,
                save_json,
            };

            let start = Instant::now();
            transcriber.process_one(&request)?;
            println!(
                "Total processing time: {:.2} seconds",
                start.elapsed().as_secs_f32()
            );
            Ok(())
        }

        Commands::Batch {
            audio_dir,
            output_dir,
            model,
            extensions,
        } => {
            if !audio_dir.is_dir() {
                return Err(TranscribeError::InvalidInput(format!(
                    "audio directory not found: {}",
                    audio_dir.display()
                ))
                .into());
            }

            // Apply CLI overrides
            if let Some(model) = model {
                config.stt.model_size = model;
            }
            if !extensions.is_empty() {
                config.batch.extensions = extensions;
            }
            let output_dir = output_dir.unwrap_or_else(|| audio_dir.join("transcriptions"));

            let handle = ModelHandle::new(config.stt);
            let mut transcriber = Transcriber::new(handle, ConsoleStatus);

            let summary =
                transcriber.process_many(&audio_dir, &output_dir, &config.batch.extensions)?;
            if summary.failed > 0 {
                anyhow::bail!(
                    "{} of {} files failed to transcribe",
                    summary.failed,
                    summary.found
                );
            }
            Ok(())
        }

        Commands::DownloadModel {
            size,
            english_only,
            output_dir,
        } => {
            let dir = output_dir.unwrap_or_else(|| config.stt.models_dir.clone());
            download_model(size, english_only, &dir)
        }
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if p.as_os_str().is_empty() => PathBuf::from("."),
        Some(p) => p.to_path_buf(),
        None => PathBuf::from("."),
    }
}

/// Download a Whisper model from Hugging Face
fn download_model(size: ModelSize, english_only: bool, output_dir: &Path) -> Result<()> {
    let filename = size.ggml_file(english_only);
    let url = format!(
        "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/{}",
        filename
    );

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    let output_path = output_dir.join(&filename);

    if output_path.exists() {
        println!("Model already exists: {}", output_path.display());
        println!("Delete it first if you want to re-download.");
        return Ok(());
    }

    println!("Downloading {} model...", size);
    println!("URL: {}", url);
    println!("Destination: {}", output_path.display());
    println!();

    let output_path_str = output_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Output path contains invalid UTF-8 characters"))?;

    // Use curl for download with progress
    let status = std::process::Command::new("curl")
        .args(["-L", "--progress-bar", "-o", output_path_str, &url])
        .status()
        .context("Failed to execute curl. Make sure curl is installed.")?;

    if !status.success() {
        anyhow::bail!("Download failed with exit code: {:?}", status.code());
    }

    // Verify file exists and has reasonable size
    let metadata = std::fs::metadata(&output_path)
        .with_context(|| format!("Failed to read downloaded file: {}", output_path.display()))?;

    let size_mb = metadata.len() as f64 / 1_000_000.0;
    if size_mb < 10.0 {
        std::fs::remove_file(&output_path)?;
        anyhow::bail!(
            "Downloaded file is too small ({:.1} MB). Download may have failed.",
            size_mb
        );
    }

    println!();
    println!("Download complete: {:.1} MB", size_mb);
    println!();
    println!("To use this model:");
    println!("  audio-transcribe transcribe <audio> -m {}", size);

    Ok(())
}
