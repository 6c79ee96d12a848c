use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{OutputStyle, TextEncoding};

#[derive(Parser)]
#[command(
    name = "transcriptor",
    about = "YT Transcriptor - Fetch YouTube transcripts for a CSV list of videos",
    version,
    long_about = "A CLI tool that reads a delimited list of videos (Title, Link, Creator), fetches the caption transcript of each one from YouTube, and writes a results file with the transcript text and a per-row status.",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Arguments of the default `transcribe` command
    #[command(flatten)]
    pub transcribe: TranscribeArgs,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (defaults to ./transcriptor.yaml or the user config directory)
    #[arg(short, long, global = true, value_name = "FILE", env = "TRANSCRIPTOR_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// The requested subcommand; bare invocations run `transcribe`
    pub fn into_command(self) -> Commands {
        self.command.unwrap_or(Commands::Transcribe(self.transcribe))
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct TranscribeArgs {
    /// Input video list [default: videos.csv]
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Results file [default: transcripts.csv]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Preferred transcript language code [default: en]
    #[arg(short, long, value_name = "LANG")]
    pub language: Option<String>,

    /// Input field delimiter (a single character, or "tab")
    #[arg(long, value_name = "CHAR", value_parser = parse_delimiter)]
    pub delimiter: Option<char>,

    /// Input text encoding
    #[arg(long, value_enum)]
    pub encoding: Option<TextEncoding>,

    /// Results file delimiter/escaping convention
    #[arg(long, value_enum)]
    pub output_style: Option<OutputStyle>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch transcripts for every video in a list (the default)
    Transcribe(TranscribeArgs),

    /// Split a large video list into smaller chunk files
    Split {
        /// Input video list [default: videos.csv]
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Videos per chunk [default: 1000]
        #[arg(long, value_name = "ROWS")]
        chunk_size: Option<usize>,

        /// Directory receiving the chunks [default: chunks]
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Input field delimiter (a single character, or "tab")
        #[arg(long, value_name = "CHAR", value_parser = parse_delimiter)]
        delimiter: Option<char>,

        /// Input text encoding
        #[arg(long, value_enum)]
        encoding: Option<TextEncoding>,
    },

    /// Show or initialize the configuration file
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}

/// Parse a delimiter argument; accepts a single character, `\t` or `tab`
pub fn parse_delimiter(value: &str) -> Result<char, String> {
    match value {
        "\\t" | "tab" | "TAB" => return Ok('\t'),
        _ => {}
    }

    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c),
        _ => Err(format!("expected a single ASCII character, got {:?}", value)),
    }
}
