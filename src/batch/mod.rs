use csv::{ReaderBuilder, StringRecord, Trim};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::Path;

use crate::config::InputConfig;
use crate::extractors::extract_video_id;
use crate::transcribe::client::TranscriptService;
use crate::transcribe::TranscriptResolver;
use crate::utils;
use crate::TranscriptorError;

pub mod split;

/// Status recorded for a row whose transcript was resolved
pub const STATUS_SUCCESS: &str = "Success";

/// Columns every video list must provide
pub const REQUIRED_COLUMNS: [&str; 3] = ["Title", "Link", "Creator"];

/// One row of the video list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRecord {
    pub title: String,
    pub link: String,
    pub creator: String,
}

/// One row of the results file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResultRecord {
    pub title: String,
    pub link: String,
    pub creator: String,
    pub transcript: String,
    pub status: String,
}

impl ResultRecord {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

/// Outcome of processing a single row
#[derive(Debug)]
pub enum RowOutcome {
    Success(String),
    Failure(TranscriptorError),
}

impl From<Result<String, TranscriptorError>> for RowOutcome {
    fn from(result: Result<String, TranscriptorError>) -> Self {
        match result {
            Ok(transcript) => RowOutcome::Success(transcript),
            Err(err) => RowOutcome::Failure(err),
        }
    }
}

impl RowOutcome {
    /// Attach the outcome to its input row
    pub fn into_record(self, video: VideoRecord) -> ResultRecord {
        let (transcript, status) = match self {
            RowOutcome::Success(transcript) => (transcript, STATUS_SUCCESS.to_string()),
            RowOutcome::Failure(err) => (String::new(), format!("Error: {}", err)),
        };

        ResultRecord {
            title: video.title,
            link: video.link,
            creator: video.creator,
            transcript,
            status,
        }
    }
}

/// Header and data rows of a delimited input file
pub(crate) struct Table {
    pub headers: StringRecord,
    pub rows: Vec<StringRecord>,
}

/// Read a delimited file with the configured delimiter and encoding
pub(crate) fn load_table(path: &Path, input: &InputConfig) -> Result<Table, TranscriptorError> {
    utils::check_file_accessible(path)?;

    let bytes = fs_err::read(path)?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(TranscriptorError::Validation(format!(
            "Input file is empty: {}",
            path.display()
        )));
    }

    let text = utils::decode_text(bytes, input.encoding)?;

    let mut reader = ReaderBuilder::new()
        .delimiter(input.delimiter_byte()?)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let rows = reader.records().collect::<Result<Vec<_>, _>>()?;

    Ok(Table { headers, rows })
}

/// Read and validate the video list
pub fn read_videos(path: &Path, input: &InputConfig) -> Result<Vec<VideoRecord>, TranscriptorError> {
    let table = load_table(path, input)?;

    let mut indices = [0usize; 3];
    let mut missing = Vec::new();
    for (slot, column) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        match table.headers.iter().position(|header| header == column) {
            Some(index) => *slot = index,
            None => missing.push(column),
        }
    }

    if !missing.is_empty() {
        return Err(TranscriptorError::Validation(format!(
            "Missing required columns: {}. Required: {}",
            missing.join(", "),
            REQUIRED_COLUMNS.join(", ")
        )));
    }

    if table.rows.is_empty() {
        return Err(TranscriptorError::Validation(format!(
            "Input file has no video rows: {}",
            path.display()
        )));
    }

    table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| -> Result<VideoRecord, TranscriptorError> {
            let field = |index: usize, column: &str| {
                row.get(index)
                    .filter(|value| !value.trim().is_empty())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        let line = row.position().map(|p| p.line()).unwrap_or(i as u64 + 2);
                        TranscriptorError::Validation(format!("Line {} is missing the {} field", line, column))
                    })
            };

            Ok(VideoRecord {
                title: field(indices[0], REQUIRED_COLUMNS[0])?,
                link: field(indices[1], REQUIRED_COLUMNS[1])?,
                creator: field(indices[2], REQUIRED_COLUMNS[2])?,
            })
        })
        .collect()
}

/// Drives identifier extraction and transcript resolution over a video list
pub struct BatchProcessor<S> {
    resolver: TranscriptResolver<S>,
    input: InputConfig,
    show_progress: bool,
}

impl<S: TranscriptService> BatchProcessor<S> {
    pub fn new(service: S, input: InputConfig) -> Self {
        Self {
            resolver: TranscriptResolver::new(service),
            input,
            show_progress: false,
        }
    }

    /// Draw a progress bar while processing
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Read the video list at `input_path` and process every row
    pub async fn run(&self, input_path: &Path, language: &str) -> Result<Vec<ResultRecord>, TranscriptorError> {
        let videos = read_videos(input_path, &self.input)?;

        tracing::info!(
            "Processing {} videos from {} (language: {})",
            videos.len(),
            input_path.display(),
            language
        );

        Ok(self.process(videos, language).await)
    }

    /// Process rows one after another, keeping input order
    pub async fn process(&self, videos: Vec<VideoRecord>, language: &str) -> Vec<ResultRecord> {
        let progress = self.progress_bar(videos.len() as u64);
        let mut results = Vec::with_capacity(videos.len());

        for video in videos {
            progress.set_message(utils::truncate_for_display(&video.title, 40));

            let outcome = self.process_row(&video, language).await;
            match &outcome {
                RowOutcome::Success(transcript) => {
                    tracing::debug!("Transcribed '{}' ({} chars)", video.title, transcript.len());
                }
                RowOutcome::Failure(err) => {
                    progress.suspend(|| tracing::warn!("Failed '{}': {}", video.title, err));
                }
            }

            results.push(outcome.into_record(video));
            progress.inc(1);
        }

        progress.finish_and_clear();
        results
    }

    async fn process_row(&self, video: &VideoRecord, language: &str) -> RowOutcome {
        let video_id = match extract_video_id(&video.link) {
            Ok(video_id) => video_id,
            Err(err) => return RowOutcome::Failure(err),
        };

        self.resolver.resolve(&video_id, language).await.into()
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress = ProgressBar::new(len);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        progress
    }
}
