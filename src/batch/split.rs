use csv::WriterBuilder;
use std::path::{Path, PathBuf};

use super::load_table;
use crate::config::InputConfig;
use crate::TranscriptorError;

/// Options for splitting a video list into chunk files
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Data rows per chunk
    pub chunk_size: usize,

    /// Directory receiving the chunks
    pub out_dir: PathBuf,
}

/// A chunk file written by [`split_input`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkInfo {
    pub path: PathBuf,
    pub rows: usize,
}

/// File name of the n-th chunk (1-based)
pub fn chunk_file_name(index: usize) -> String {
    format!("videos_{:04}.csv", index)
}

/// Split a video list into UTF-8 chunk files of at most `chunk_size` rows, each
/// carrying the original header
pub fn split_input(
    input_path: &Path,
    input: &InputConfig,
    options: &SplitOptions,
) -> Result<Vec<ChunkInfo>, TranscriptorError> {
    if options.chunk_size == 0 {
        return Err(TranscriptorError::Validation("Chunk size must be at least 1".to_string()));
    }

    let table = load_table(input_path, input)?;
    let delimiter = input.delimiter_byte()?;

    fs_err::create_dir_all(&options.out_dir)?;

    let mut chunks = Vec::new();
    for (i, rows) in table.rows.chunks(options.chunk_size).enumerate() {
        let path = options.out_dir.join(chunk_file_name(i + 1));

        let file = fs_err::File::create(&path)?;
        let mut writer = WriterBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_writer(file);

        writer.write_record(&table.headers)?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        tracing::info!("Saved {} ({} videos)", path.display(), rows.len());
        chunks.push(ChunkInfo {
            path,
            rows: rows.len(),
        });
    }

    Ok(chunks)
}
