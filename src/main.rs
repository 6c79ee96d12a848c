use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yt_transcriptor::batch::split::{split_input, SplitOptions};
use yt_transcriptor::cli::{Cli, Commands, TranscribeArgs};
use yt_transcriptor::config::Config;
use yt_transcriptor::{output, BatchProcessor, TranscriptorError, YoutubeTranscriptClient};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "yt_transcriptor=debug,transcriptor=debug"
    } else {
        "yt_transcriptor=info,transcriptor=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<TranscriptorError>() {
                Some(e @ (TranscriptorError::Validation(_) | TranscriptorError::FileNotFound(_))) => {
                    eprintln!("Error: {}", e);
                }
                _ => eprintln!("Unexpected error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;

    let quiet = cli.quiet;

    match cli.into_command() {
        Commands::Transcribe(TranscribeArgs {
            input,
            output: output_path,
            language,
            delimiter,
            encoding,
            output_style,
        }) => {
            if let Some(delimiter) = delimiter {
                config.input.delimiter = delimiter;
            }
            if let Some(encoding) = encoding {
                config.input.encoding = encoding;
            }
            if let Some(style) = output_style {
                config.output.style = style;
            }
            config.validate()?;

            let input = input.unwrap_or_else(|| config.batch.input_path.clone());
            let output_path = output_path.unwrap_or_else(|| config.batch.output_path.clone());
            let language = language.unwrap_or_else(|| config.batch.default_language.clone());

            let started = Instant::now();
            let client = YoutubeTranscriptClient::new(&config.service)?;
            let processor = BatchProcessor::new(client, config.input.clone()).with_progress(!quiet);

            let results = processor.run(&input, &language).await?;
            let summary = output::write_results(&results, &output_path, &config.output)?;

            tracing::info!(
                "Finished: {} total, {} succeeded, {} failed",
                summary.total,
                summary.success,
                summary.failure
            );
            output::print_summary(&summary, &output_path, started.elapsed());
        }
        Commands::Split {
            input,
            chunk_size,
            out_dir,
            delimiter,
            encoding,
        } => {
            if let Some(delimiter) = delimiter {
                config.input.delimiter = delimiter;
            }
            if let Some(encoding) = encoding {
                config.input.encoding = encoding;
            }
            if let Some(chunk_size) = chunk_size {
                config.batch.chunk_size = chunk_size;
            }
            config.validate()?;

            let input = input.unwrap_or_else(|| config.batch.input_path.clone());
            let options = SplitOptions {
                chunk_size: config.batch.chunk_size,
                out_dir: out_dir.unwrap_or_else(|| config.batch.chunk_dir.clone()),
            };

            let chunks = split_input(&input, &config.input, &options)?;
            let videos: usize = chunks.iter().map(|chunk| chunk.rows).sum();
            println!(
                "Split {} videos into {} files in {}",
                videos,
                chunks.len(),
                options.out_dir.display()
            );
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                let path = Config::default_path()?;
                if path.exists() {
                    println!("Config file already exists: {}", path.display());
                } else {
                    config.save(&path)?;
                    println!("Wrote default config to: {}", path.display());
                }
            }
        }
    }

    Ok(())
}
