use serde_json::Value;

use crate::TranscriptorError;

pub mod client;

use client::TranscriptService;

/// How a caption track was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptKind {
    /// Automatic speech recognition track
    Generated,
    /// Uploaded by the video owner
    ManuallyCreated,
}

impl std::fmt::Display for TranscriptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptKind::Generated => write!(f, "auto-generated"),
            TranscriptKind::ManuallyCreated => write!(f, "manually created"),
        }
    }
}

/// One caption track available for a video
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptVariant {
    /// Language code (en, es, pt-BR, ...)
    pub language_code: String,

    /// Human-readable language name
    pub language: String,

    /// Generation kind
    pub kind: TranscriptKind,

    /// URL the caption segments are fetched from
    pub base_url: String,
}

/// Selection order: the first kind with a track in the requested language wins
const SELECTION_ORDER: [TranscriptKind; 2] =
    [TranscriptKind::Generated, TranscriptKind::ManuallyCreated];

/// Pick the preferred variant for a language
pub fn select_variant<'a>(
    variants: &'a [TranscriptVariant],
    language: &str,
) -> Option<&'a TranscriptVariant> {
    SELECTION_ORDER.iter().find_map(|kind| {
        variants
            .iter()
            .find(|variant| variant.kind == *kind && variant.language_code == language)
    })
}

/// Flatten a caption payload into a single space-joined string.
///
/// Accepted shapes are a list of `{"text": ...}` segments, a single `{"text": ...}`
/// object, or a `json3` document whose `events[].segs[].utf8` pieces form the segments.
pub fn materialize(video_id: &str, payload: &Value) -> Result<String, TranscriptorError> {
    let format_error = || TranscriptorError::Format(video_id.to_string());

    match payload {
        Value::Array(segments) => segments
            .iter()
            .map(|segment| segment.get("text").and_then(Value::as_str).ok_or_else(format_error))
            .collect::<Result<Vec<_>, _>>()
            .map(|texts| texts.join(" ")),
        Value::Object(object) => {
            if let Some(text) = object.get("text").and_then(Value::as_str) {
                return Ok(text.to_string());
            }
            match object.get("events").and_then(Value::as_array) {
                Some(events) => Ok(json3_segments(events).join(" ")),
                None => Err(format_error()),
            }
        }
        _ => Err(format_error()),
    }
}

/// Text of each caption event, skipping timing-only and line-break events
fn json3_segments(events: &[Value]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| event.get("segs").and_then(Value::as_array))
        .map(|segs| {
            segs.iter()
                .filter_map(|seg| seg.get("utf8").and_then(Value::as_str))
                .collect::<String>()
        })
        .filter(|text| !text.trim().is_empty())
        .collect()
}

/// Resolves a video ID into transcript text using a transcript service
pub struct TranscriptResolver<S> {
    service: S,
}

impl<S: TranscriptService> TranscriptResolver<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// List the variants, pick one by preference and flatten its segments
    pub async fn resolve(&self, video_id: &str, language: &str) -> Result<String, TranscriptorError> {
        tracing::debug!("Listing transcripts for video: {}", video_id);

        let variants = self
            .service
            .list_variants(video_id)
            .await
            .map_err(|e| TranscriptorError::TranscriptRetrieval(e.to_string()))?;

        let variant = select_variant(&variants, language).ok_or_else(|| {
            TranscriptorError::TranscriptNotFound {
                video_id: video_id.to_string(),
                language: language.to_string(),
            }
        })?;

        tracing::debug!(
            "Using {} {} transcript for video {}",
            variant.kind,
            variant.language_code,
            video_id
        );

        let payload = self
            .service
            .fetch_payload(variant)
            .await
            .map_err(|e| TranscriptorError::TranscriptRetrieval(e.to_string()))?;

        materialize(video_id, &payload)
    }
}
