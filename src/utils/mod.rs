use std::path::Path;

use crate::config::TextEncoding;
use crate::TranscriptorError;

/// UTF-8 byte order mark
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Check that an input path points at an existing file
pub fn check_file_accessible(path: &Path) -> Result<(), TranscriptorError> {
    if !path.exists() {
        return Err(TranscriptorError::FileNotFound(path.to_path_buf()));
    }

    if !path.is_file() {
        return Err(TranscriptorError::Validation(format!(
            "Path is not a file: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Decode raw file bytes using the configured encoding
pub fn decode_text(bytes: Vec<u8>, encoding: TextEncoding) -> Result<String, TranscriptorError> {
    match encoding {
        TextEncoding::Utf8 => {
            let bytes = match bytes.strip_prefix(UTF8_BOM) {
                Some(rest) => rest.to_vec(),
                None => bytes,
            };
            String::from_utf8(bytes).map_err(|e| {
                TranscriptorError::Validation(format!(
                    "Input is not valid UTF-8 (byte {}); try --encoding latin-1",
                    e.utf8_error().valid_up_to()
                ))
            })
        }
        // Every ISO-8859-1 byte maps to the code point of the same value
        TextEncoding::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
    }
}

/// Format duration in human-readable format
pub fn format_duration(seconds: f64) -> String {
    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Shorten text for log lines
pub fn truncate_for_display(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(30.0), "30s");
        assert_eq!(format_duration(90.0), "1m 30s");
        assert_eq!(format_duration(3661.0), "1h 1m 1s");
    }

    #[test]
    fn test_decode_latin1() {
        let bytes = b"Caf\xe9;Se\xf1or".to_vec();
        assert_eq!(decode_text(bytes, TextEncoding::Latin1).unwrap(), "Café;Señor");
    }

    #[test]
    fn test_decode_utf8_strips_bom() {
        let bytes = b"\xEF\xBB\xBFTitle;Link".to_vec();
        assert_eq!(decode_text(bytes, TextEncoding::Utf8).unwrap(), "Title;Link");
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let err = decode_text(b"Caf\xe9".to_vec(), TextEncoding::Utf8).unwrap_err();
        assert!(matches!(err, TranscriptorError::Validation(_)));
    }

    #[test]
    fn test_check_file_accessible() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.csv");
        assert!(matches!(
            check_file_accessible(&missing),
            Err(TranscriptorError::FileNotFound(ref p)) if *p == missing
        ));
        assert!(matches!(
            check_file_accessible(dir.path()),
            Err(TranscriptorError::Validation(_))
        ));
    }

    #[test]
    fn test_truncate_for_display() {
        assert_eq!(truncate_for_display("short", 10), "short");
        assert_eq!(truncate_for_display("a longer title here", 10), "a longe...");
    }
}
