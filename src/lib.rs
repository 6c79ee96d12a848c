//! YT Transcriptor - A Rust CLI tool for batch-fetching YouTube transcripts
//!
//! This library reads a delimited list of videos (title, link, creator), resolves a
//! caption transcript for each one from YouTube, and writes a results file with the
//! transcript text and a per-row status.

use std::path::PathBuf;

pub mod batch;
pub mod cli;
pub mod config;
pub mod extractors;
pub mod output;
pub mod transcribe;
pub mod utils;

pub use batch::{BatchProcessor, ResultRecord, RowOutcome, VideoRecord};
pub use cli::{Cli, Commands};
pub use config::Config;
pub use extractors::extract_video_id;
pub use output::Summary;
pub use transcribe::client::{ServiceError, TranscriptService, YoutubeTranscriptClient};
pub use transcribe::{TranscriptKind, TranscriptResolver, TranscriptVariant};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to the transcriptor
#[derive(thiserror::Error, Debug)]
pub enum TranscriptorError {
    #[error("Video identification failed: could not extract video ID from URL: {0}")]
    VideoIdentification(String),

    #[error("Transcript retrieval failed: {0}")]
    TranscriptRetrieval(String),

    #[error("No {language} transcript found for video {video_id}")]
    TranscriptNotFound { video_id: String, language: String },

    #[error("Unexpected transcript format for video {0}")]
    Format(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),
}
