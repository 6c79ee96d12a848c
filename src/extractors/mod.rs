use once_cell::sync::Lazy;
use regex::Regex;

use crate::TranscriptorError;

/// Video ID patterns, tried in order. The first match wins.
static ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Standard watch URLs (?v=ID) and path-style shares (/embed/ID, /shorts/ID)
        r"(?:v=|/)([0-9A-Za-z_-]{11})",
        // Short URLs
        r"youtu\.be/([0-9A-Za-z_-]{11})",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("video ID pattern must compile"))
    .collect()
});

/// Length of a YouTube video ID
pub const VIDEO_ID_LEN: usize = 11;

/// Extract the 11-character video ID embedded in a YouTube URL
pub fn extract_video_id(url: &str) -> Result<String, TranscriptorError> {
    let input = url.trim();

    ID_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(input))
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str().to_string())
        .ok_or_else(|| TranscriptorError::VideoIdentification(url.to_string()))
}

/// Check whether a string already looks like a bare video ID
pub fn is_video_id(candidate: &str) -> bool {
    candidate.len() == VIDEO_ID_LEN
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
