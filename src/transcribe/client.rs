use anyhow::Context;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use super::{TranscriptKind, TranscriptVariant};
use crate::config::ServiceConfig;
use crate::extractors::is_video_id;

static API_KEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).expect("api key pattern must compile")
});

/// Client identity sent to the innertube player endpoint
const INNERTUBE_CLIENT_NAME: &str = "ANDROID";
const INNERTUBE_CLIENT_VERSION: &str = "20.10.38";

/// Failures reported by a transcript service
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("Invalid video ID: {0}")]
    InvalidVideoId(String),

    #[error("Subtitles are disabled for video {0}")]
    TranscriptsDisabled(String),

    #[error("Video {0} is unavailable")]
    VideoUnavailable(String),

    #[error("Video {video_id} is unplayable: {reason}")]
    VideoUnplayable { video_id: String, reason: String },

    #[error("Requests for {0} are being blocked by YouTube")]
    RequestBlocked(String),

    #[error("Caption track {0} requires a PO token")]
    PoTokenRequired(String),

    #[error("Could not parse YouTube response for video {0}")]
    Unparsable(String),

    #[error("HTTP request failed: {0}")]
    Http(String),
}

/// Remote source of caption tracks
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptService: Send + Sync {
    /// List every caption track available for a video
    async fn list_variants(&self, video_id: &str) -> Result<Vec<TranscriptVariant>, ServiceError>;

    /// Fetch the raw caption payload of one track
    async fn fetch_payload(&self, variant: &TranscriptVariant) -> Result<Value, ServiceError>;
}

#[async_trait]
impl<T: TranscriptService + ?Sized> TranscriptService for Arc<T> {
    async fn list_variants(&self, video_id: &str) -> Result<Vec<TranscriptVariant>, ServiceError> {
        (**self).list_variants(video_id).await
    }

    async fn fetch_payload(&self, variant: &TranscriptVariant) -> Result<Value, ServiceError> {
        (**self).fetch_payload(variant).await
    }
}

/// YouTube caption client using the watch page and the innertube player API
pub struct YoutubeTranscriptClient {
    client: Client,
    base_url: Url,
}

impl YoutubeTranscriptClient {
    pub fn new(config: &ServiceConfig) -> crate::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language)
                .context("Invalid accept-language header value")?,
        );

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid service base URL: {}", config.base_url))?;

        Ok(Self { client, base_url })
    }

    async fn fetch_watch_page(&self, video_id: &str) -> Result<String, ServiceError> {
        let url = self
            .base_url
            .join(&format!("watch?v={}", urlencoding::encode(video_id)))
            .map_err(|e| ServiceError::Http(format!("Invalid watch URL: {}", e)))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ServiceError::Http(format!("Failed to fetch watch page: {}", e)))?;

        check_status(&response, video_id)?;

        response
            .text()
            .await
            .map_err(|e| ServiceError::Http(format!("Failed to read watch page: {}", e)))
    }

    async fn fetch_player(&self, video_id: &str, api_key: &str) -> Result<Value, ServiceError> {
        let mut url = self
            .base_url
            .join("youtubei/v1/player")
            .map_err(|e| ServiceError::Http(format!("Invalid player URL: {}", e)))?;
        url.query_pairs_mut().append_pair("key", api_key);

        let body = json!({
            "context": {
                "client": {
                    "clientName": INNERTUBE_CLIENT_NAME,
                    "clientVersion": INNERTUBE_CLIENT_VERSION
                }
            },
            "videoId": video_id
        });

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::Http(format!("Failed to fetch player data: {}", e)))?;

        check_status(&response, video_id)?;

        response
            .json()
            .await
            .map_err(|_| ServiceError::Unparsable(video_id.to_string()))
    }
}

#[async_trait]
impl TranscriptService for YoutubeTranscriptClient {
    async fn list_variants(&self, video_id: &str) -> Result<Vec<TranscriptVariant>, ServiceError> {
        if !is_video_id(video_id) {
            return Err(ServiceError::InvalidVideoId(video_id.to_string()));
        }

        let html = self.fetch_watch_page(video_id).await?;
        let api_key = extract_api_key(&html, video_id)?;
        let player = self.fetch_player(video_id, &api_key).await?;

        parse_caption_tracks(video_id, &player)
    }

    async fn fetch_payload(&self, variant: &TranscriptVariant) -> Result<Value, ServiceError> {
        if variant.base_url.contains("&exp=xpe") {
            return Err(ServiceError::PoTokenRequired(variant.language.clone()));
        }

        let url = json3_url(&variant.base_url)?;
        tracing::debug!("Fetching captions: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ServiceError::Http(format!("Failed to fetch captions: {}", e)))?;

        check_status(&response, &caption_subject(variant))?;

        response
            .json()
            .await
            .map_err(|e| ServiceError::Http(format!("Failed to read captions: {}", e)))
    }
}

/// Human-readable name of a caption track for error messages
fn caption_subject(variant: &TranscriptVariant) -> String {
    format!("{} captions ({})", variant.language, variant.kind)
}

/// Rewrite a caption track URL to request the `json3` format
fn json3_url(base_url: &str) -> Result<Url, ServiceError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| ServiceError::Http(format!("Invalid caption URL {}: {}", base_url, e)))?;

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "fmt")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("fmt", "json3");

    Ok(url)
}

fn check_status(response: &Response, subject: &str) -> Result<(), ServiceError> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ServiceError::RequestBlocked(subject.to_string()));
    }
    if !status.is_success() {
        return Err(ServiceError::Http(format!(
            "HTTP {}: {}",
            status,
            status.canonical_reason().unwrap_or("Unknown error")
        )));
    }
    Ok(())
}

/// Pull the innertube API key out of a watch page
pub fn extract_api_key(html: &str, video_id: &str) -> Result<String, ServiceError> {
    if html.contains("g-recaptcha") {
        return Err(ServiceError::RequestBlocked(video_id.to_string()));
    }

    API_KEY_PATTERN
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|key| key.as_str().to_string())
        .ok_or_else(|| ServiceError::Unparsable(video_id.to_string()))
}

fn check_playability(video_id: &str, player: &Value) -> Result<(), ServiceError> {
    let Some(playability) = player.get("playabilityStatus") else {
        return Ok(());
    };

    let status = playability.get("status").and_then(Value::as_str).unwrap_or("");
    if status == "OK" {
        return Ok(());
    }

    let reason = playability.get("reason").and_then(Value::as_str).unwrap_or("");
    match status {
        "LOGIN_REQUIRED" if reason.contains("not a bot") => {
            Err(ServiceError::RequestBlocked(video_id.to_string()))
        }
        "ERROR" if reason.contains("unavailable") => {
            Err(ServiceError::VideoUnavailable(video_id.to_string()))
        }
        _ => Err(ServiceError::VideoUnplayable {
            video_id: video_id.to_string(),
            reason: reason.to_string(),
        }),
    }
}

/// Read the caption tracks out of an innertube player response
pub fn parse_caption_tracks(video_id: &str, player: &Value) -> Result<Vec<TranscriptVariant>, ServiceError> {
    check_playability(video_id, player)?;

    let tracks = player
        .get("captions")
        .and_then(|c| c.get("playerCaptionsTracklistRenderer"))
        .and_then(|r| r.get("captionTracks"))
        .and_then(Value::as_array)
        .ok_or_else(|| ServiceError::TranscriptsDisabled(video_id.to_string()))?;

    let variants: Vec<TranscriptVariant> = tracks
        .iter()
        .filter_map(|track| {
            let language_code = track.get("languageCode")?.as_str()?.to_string();
            let base_url = track.get("baseUrl")?.as_str()?.to_string();

            let language = track
                .get("name")
                .and_then(|n| n.get("runs"))
                .and_then(Value::as_array)
                .and_then(|runs| runs.first())
                .and_then(|run| run.get("text"))
                .and_then(Value::as_str)
                .or_else(|| track.get("name").and_then(|n| n.get("simpleText")).and_then(Value::as_str))
                .unwrap_or(&language_code)
                .to_string();

            let kind = match track.get("kind").and_then(Value::as_str) {
                Some("asr") => TranscriptKind::Generated,
                _ => TranscriptKind::ManuallyCreated,
            };

            Some(TranscriptVariant {
                language_code,
                language,
                kind,
                base_url,
            })
        })
        .collect();

    if variants.is_empty() {
        return Err(ServiceError::TranscriptsDisabled(video_id.to_string()));
    }

    Ok(variants)
}
