use console::style;
use csv::{QuoteStyle, WriterBuilder};
use std::path::Path;
use std::time::Duration;

use crate::batch::ResultRecord;
use crate::config::{OutputConfig, OutputStyle};
use crate::utils::format_duration;
use crate::TranscriptorError;

/// Header row of the results file
pub const RESULT_COLUMNS: [&str; 5] = ["Title", "Link", "Creator", "Transcript", "Status"];

/// Outcome counts of a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub success: usize,
    pub failure: usize,
}

impl Summary {
    pub fn from_results(results: &[ResultRecord]) -> Self {
        let success = results.iter().filter(|r| r.is_success()).count();
        Self {
            total: results.len(),
            success,
            failure: results.len() - success,
        }
    }
}

impl OutputStyle {
    /// CSV writer configured for this style
    pub fn writer_builder(&self) -> WriterBuilder {
        let mut builder = WriterBuilder::new();
        builder.has_headers(false);
        match self {
            OutputStyle::Quoted => {
                builder.delimiter(b',').quote_style(QuoteStyle::Always);
            }
            OutputStyle::TabEscaped => {
                builder
                    .delimiter(b'\t')
                    .quote_style(QuoteStyle::Necessary)
                    .double_quote(false)
                    .escape(b'\\');
            }
        }
        builder
    }
}

/// Save results to a delimited file and return the counts
pub fn write_results(
    results: &[ResultRecord],
    path: &Path,
    config: &OutputConfig,
) -> Result<Summary, TranscriptorError> {
    let file = fs_err::File::create(path)?;
    let mut writer = config.style.writer_builder().from_writer(file);

    writer.write_record(RESULT_COLUMNS)?;
    for record in results {
        writer.serialize(record)?;
    }
    writer.flush()?;

    tracing::debug!("Wrote {} results to {}", results.len(), path.display());
    Ok(Summary::from_results(results))
}

/// Print the end-of-run report
pub fn print_summary(summary: &Summary, output_path: &Path, elapsed: Duration) {
    println!();
    println!("{}", style("Processing complete!").green().bold());
    println!("Total videos processed: {}", summary.total);
    println!("Successfully transcribed: {}", style(summary.success).green());
    if summary.failure > 0 {
        println!("Failed: {}", style(summary.failure).red());
    } else {
        println!("Failed: {}", summary.failure);
    }
    println!("Elapsed: {}", format_duration(elapsed.as_secs_f64()));
    println!();
    println!("Results saved to: {}", output_path.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, transcript: &str, status: &str) -> ResultRecord {
        ResultRecord {
            title: title.to_string(),
            link: "https://youtu.be/aaaaaaaaaaa".to_string(),
            creator: "Alice".to_string(),
            transcript: transcript.to_string(),
            status: status.to_string(),
        }
    }

    #[test]
    fn test_summary_counts() {
        let results = vec![
            record("a", "text", "Success"),
            record("b", "", "Error: Video identification failed: x"),
            record("c", "", "Error: Transcript retrieval failed: y"),
        ];
        assert_eq!(
            Summary::from_results(&results),
            Summary {
                total: 3,
                success: 1,
                failure: 2
            }
        );
        assert_eq!(Summary::from_results(&[]), Summary::default());
    }

    #[test]
    fn test_write_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let results = vec![record("Say \"hi\"", "one, two", "Success")];

        let summary = write_results(&results, &path, &OutputConfig::default()).unwrap();
        assert_eq!(summary.total, 1);

        let content = fs_err::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "\"Title\",\"Link\",\"Creator\",\"Transcript\",\"Status\"\n\
             \"Say \"\"hi\"\"\",\"https://youtu.be/aaaaaaaaaaa\",\"Alice\",\"one, two\",\"Success\"\n"
        );
    }

    #[test]
    fn test_write_tab_escaped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        let results = vec![record("Plain", "words here", "Success")];
        let config = OutputConfig {
            style: OutputStyle::TabEscaped,
        };

        write_results(&results, &path, &config).unwrap();

        let content = fs_err::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "Title\tLink\tCreator\tTranscript\tStatus\n\
             Plain\thttps://youtu.be/aaaaaaaaaaa\tAlice\twords here\tSuccess\n"
        );
    }

    #[test]
    fn test_write_tab_escaped_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        let results = vec![record("Tab\there \"quoted\"", "", "Error: x")];
        let config = OutputConfig {
            style: OutputStyle::TabEscaped,
        };
        write_results(&results, &path, &config).unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .double_quote(false)
            .escape(Some(b'\\'))
            .from_path(&path)
            .unwrap();
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[0], "Tab\there \"quoted\"");
        assert_eq!(&row[4], "Error: x");
    }

    #[test]
    fn test_header_written_for_empty_results() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let summary = write_results(&[], &path, &OutputConfig::default()).unwrap();
        assert_eq!(summary, Summary::default());
        assert_eq!(
            fs_err::read_to_string(&path).unwrap(),
            "\"Title\",\"Link\",\"Creator\",\"Transcript\",\"Status\"\n"
        );
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        assert!(matches!(
            write_results(&[], &path, &OutputConfig::default()),
            Err(TranscriptorError::Io(_))
        ));
    }
}
