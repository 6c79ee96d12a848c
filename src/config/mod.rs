use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::TranscriptorError;

/// File name looked up in the working directory
const LOCAL_CONFIG_FILE: &str = "transcriptor.yaml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How the video list is read
    pub input: InputConfig,

    /// How the results file is written
    pub output: OutputConfig,

    /// Remote transcript service settings
    pub service: ServiceConfig,

    /// Batch defaults
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Field delimiter of the input file
    pub delimiter: char,

    /// Text encoding of the input file
    pub encoding: TextEncoding,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Delimiter and escaping convention of the results file
    pub style: OutputStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the YouTube site
    pub base_url: String,

    /// User agent sent with every request
    pub user_agent: String,

    /// Accept-Language header value
    pub accept_language: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Preferred transcript language
    pub default_language: String,

    /// Default video list
    pub input_path: PathBuf,

    /// Default results file
    pub output_path: PathBuf,

    /// Rows per file when splitting a video list
    pub chunk_size: usize,

    /// Directory receiving split chunks
    pub chunk_dir: PathBuf,
}

/// Supported input encodings
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    /// UTF-8 (a leading byte order mark is ignored)
    #[value(name = "utf-8", alias = "utf8")]
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    /// ISO-8859-1
    #[default]
    #[value(name = "latin-1", alias = "latin1")]
    #[serde(rename = "latin-1", alias = "latin1")]
    Latin1,
}

/// Output delimiter/escaping conventions
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputStyle {
    /// Comma separated, every field quoted
    #[default]
    Quoted,
    /// Tab separated, special characters escaped with a backslash
    TabEscaped,
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextEncoding::Utf8 => write!(f, "utf-8"),
            TextEncoding::Latin1 => write!(f, "latin-1"),
        }
    }
}

impl std::fmt::Display for OutputStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputStyle::Quoted => write!(f, "quoted"),
            OutputStyle::TabEscaped => write!(f, "tab-escaped"),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: ';',
            encoding: TextEncoding::Latin1,
        }
    }
}

impl InputConfig {
    /// Delimiter as a single byte, as the CSV reader expects it
    pub fn delimiter_byte(&self) -> Result<u8, TranscriptorError> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(|b| b.is_ascii() && !matches!(*b, b'"' | b'\n' | b'\r'))
            .ok_or_else(|| {
                TranscriptorError::Validation(format!(
                    "Delimiter must be a single ASCII character other than a quote or newline, got {:?}",
                    self.delimiter
                ))
            })
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.youtube.com".to_string(),
            user_agent: concat!("yt-transcriptor/", env!("CARGO_PKG_VERSION")).to_string(),
            accept_language: "en-US".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            default_language: "en".to_string(),
            input_path: PathBuf::from("videos.csv"),
            output_path: PathBuf::from("transcripts.csv"),
            chunk_size: 1000,
            chunk_dir: PathBuf::from("chunks"),
        }
    }
}

impl Config {
    /// Load configuration from an explicit path, the working directory, the user
    /// config directory, or fall back to defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover(),
        };

        let Some(path) = path else {
            tracing::debug!("No config file found, using defaults");
            return Ok(Self::default());
        };

        tracing::debug!("Loading config from {}", path.display());
        Self::load_from(&path)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path).context("Failed to read config file")?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs_err::create_dir_all(parent)?;
            }
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        fs_err::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Default location of the user config file
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("yt-transcriptor").join("config.yaml"))
    }

    fn discover() -> Option<PathBuf> {
        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        Self::default_path().ok().filter(|path| path.exists())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.input.delimiter_byte()?;

        if self.service.timeout_secs == 0 {
            return Err(TranscriptorError::Validation(
                "Service timeout must be at least one second".to_string(),
            )
            .into());
        }

        if self.batch.chunk_size == 0 {
            return Err(TranscriptorError::Validation("Chunk size must be at least 1".to_string()).into());
        }

        if self.batch.default_language.trim().is_empty() {
            return Err(TranscriptorError::Validation("Default language must not be empty".to_string()).into());
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Input delimiter: {:?}", self.input.delimiter);
        println!("  Input encoding: {}", self.input.encoding);
        println!("  Output style: {}", self.output.style);
        println!("  Default language: {}", self.batch.default_language);
        println!("  Default input: {}", self.batch.input_path.display());
        println!("  Default output: {}", self.batch.output_path.display());
        println!("  Chunk size: {}", self.batch.chunk_size);
        println!("  Service URL: {}", self.service.base_url);
        println!("  Timeout: {}s", self.service.timeout_secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.input.delimiter, ';');
        assert_eq!(config.input.encoding, TextEncoding::Latin1);
        assert_eq!(config.output.style, OutputStyle::Quoted);
        assert_eq!(config.batch.default_language, "en");
        assert_eq!(config.batch.input_path, PathBuf::from("videos.csv"));
        assert_eq!(config.batch.output_path, PathBuf::from("transcripts.csv"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let mut config = Config::default();
        config.input.delimiter = '\t';
        config.input.encoding = TextEncoding::Utf8;
        config.output.style = OutputStyle::TabEscaped;
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs_err::write(&path, "input:\n  delimiter: ','\noutput:\n  style: tab-escaped\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.input.delimiter, ',');
        assert_eq!(config.input.encoding, TextEncoding::Latin1);
        assert_eq!(config.output.style, OutputStyle::TabEscaped);
        assert_eq!(config.service, ServiceConfig::default());
    }

    #[test]
    fn test_rejects_bad_delimiter() {
        let mut config = Config::default();
        config.input.delimiter = 'é';
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TranscriptorError>(),
            Some(TranscriptorError::Validation(_))
        ));

        config.input.delimiter = '"';
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_timeout_and_chunk() {
        let mut config = Config::default();
        config.service.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.batch.chunk_size = 0;
        assert!(config.validate().is_err());
    }
}
