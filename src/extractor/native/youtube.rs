use crate::extractor::models::{LiveStreamData, RenditionDescriptor, VideoDetails, VideoMetadata};
use crate::extractor::traits::MetadataSource;
use crate::stream::StreamOptions;
use crate::utils::config::ResolverSettings;
use crate::utils::error::StreamError;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

const PLAYER_RESPONSE_MARKER: &str = "ytInitialPlayerResponse = ";

/// Extract the 11-character video id from a YouTube URL or a bare id
pub fn extract_video_id(url: &str) -> Option<String> {
    let url = url.trim();
    if is_video_id(url) {
        return Some(url.to_string());
    }

    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.trim_start_matches("www.");
    let mut segments = parsed.path_segments()?.filter(|s| !s.is_empty());

    let candidate = if host == "youtu.be" {
        segments.next().map(str::to_string)
    } else if host == "youtube.com" || host.ends_with(".youtube.com") {
        match segments.next()? {
            "watch" => parsed
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned()),
            "shorts" | "embed" | "live" | "v" => segments.next().map(str::to_string),
            _ => None,
        }
    } else {
        None
    };

    candidate.filter(|id| is_video_id(id))
}

fn is_video_id(text: &str) -> bool {
    text.len() == 11
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Metadata source that scrapes the player response embedded in the watch page
pub struct WatchPageSource {
    settings: ResolverSettings,
}

impl Default for WatchPageSource {
    fn default() -> Self {
        Self::new(ResolverSettings::default())
    }
}

impl WatchPageSource {
    pub fn new(settings: ResolverSettings) -> Self {
        Self { settings }
    }

    /// Build an HTTP client; per-call proxies win over configured ones
    fn client(&self, options: &StreamOptions) -> Result<Client> {
        let mut builder = Client::builder()
            .user_agent(&self.settings.user_agent)
            .timeout(Duration::from_secs(self.settings.request_timeout_secs));

        let proxy = options
            .proxies
            .first()
            .or_else(|| self.settings.proxies.first());
        if let Some(proxy) = proxy {
            debug!("Using proxy {}", proxy);
            builder = builder.proxy(reqwest::Proxy::all(proxy.as_str()).map_err(StreamError::from)?);
        }

        Ok(builder.build().map_err(StreamError::from)?)
    }
}

#[async_trait]
impl MetadataSource for WatchPageSource {
    fn id(&self) -> &'static str {
        "youtube-watch-page"
    }

    fn supports(&self, url: &str) -> bool {
        extract_video_id(url).is_some()
    }

    async fn fetch(&self, url: &str, options: &StreamOptions) -> Result<VideoMetadata> {
        let video_id =
            extract_video_id(url).ok_or_else(|| StreamError::InvalidUrl(url.to_string()))?;
        let page_url = format!("https://www.youtube.com/watch?v={}&has_verified=1", video_id);
        info!("Fetching watch page for {}", video_id);

        let body = self
            .client(options)?
            .get(&page_url)
            .header("accept-language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(StreamError::from)?
            .error_for_status()
            .map_err(StreamError::from)?
            .text()
            .await
            .map_err(StreamError::from)?;

        Ok(parse_watch_page(&body)?)
    }
}

/// Parse the embedded player response out of a watch page body
pub fn parse_watch_page(body: &str) -> Result<VideoMetadata, StreamError> {
    let start = body
        .find(PLAYER_RESPONSE_MARKER)
        .ok_or(StreamError::PlayerResponseNotFound)?
        + PLAYER_RESPONSE_MARKER.len();

    // The JSON object is followed by more script; read only the first value.
    let response = serde_json::Deserializer::from_str(&body[start..])
        .into_iter::<PlayerResponse>()
        .next()
        .ok_or(StreamError::PlayerResponseNotFound)??;

    response.into_metadata()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    #[serde(default)]
    playability_status: Option<PlayabilityStatus>,
    #[serde(default)]
    video_details: Option<PlayerVideoDetails>,
    #[serde(default)]
    streaming_data: Option<StreamingData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayabilityStatus {
    status: String,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerVideoDetails {
    video_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    length_seconds: Option<String>,
    #[serde(default)]
    is_live_content: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StreamingData {
    #[serde(default)]
    formats: Vec<PlayerFormat>,
    #[serde(default)]
    adaptive_formats: Vec<PlayerFormat>,
    #[serde(default)]
    dash_manifest_url: Option<String>,
    #[serde(default)]
    hls_manifest_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerFormat {
    mime_type: String,
    /// Absent for signature-ciphered formats
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    content_length: Option<String>,
    #[serde(default)]
    target_duration_sec: Option<f64>,
    #[serde(default)]
    itag: Option<u32>,
    #[serde(default)]
    bitrate: Option<u64>,
    #[serde(default)]
    audio_quality: Option<String>,
}

impl PlayerFormat {
    fn into_rendition(self) -> Option<RenditionDescriptor> {
        let url = self.url?;
        Some(RenditionDescriptor {
            mime_type: self.mime_type,
            url,
            content_length: self.content_length,
            target_duration_sec: self
                .target_duration_sec
                .filter(|secs| secs.is_finite() && *secs >= 0.0),
            itag: self.itag,
            bitrate: self.bitrate,
            audio_quality: self.audio_quality,
        })
    }
}

impl PlayerResponse {
    fn into_metadata(self) -> Result<VideoMetadata, StreamError> {
        if let Some(playability) = &self.playability_status {
            if playability.status != "OK" {
                return Err(StreamError::Unavailable(
                    playability
                        .reason
                        .clone()
                        .unwrap_or_else(|| playability.status.clone()),
                ));
            }
        }

        let details = self
            .video_details
            .ok_or_else(|| StreamError::Unavailable("missing video details".to_string()))?;
        let streaming = self.streaming_data.unwrap_or_default();

        let total = streaming.formats.len() + streaming.adaptive_formats.len();
        let renditions: Vec<RenditionDescriptor> = streaming
            .formats
            .into_iter()
            .chain(streaming.adaptive_formats)
            .filter_map(PlayerFormat::into_rendition)
            .collect();
        if renditions.len() < total {
            debug!(
                "Skipped {} ciphered formats for {}",
                total - renditions.len(),
                details.video_id
            );
        }

        let duration_in_sec = details
            .length_seconds
            .as_deref()
            .and_then(|secs| secs.trim().parse::<f64>().ok())
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .unwrap_or(0.0);

        Ok(VideoMetadata {
            live_stream_data: LiveStreamData {
                is_live: details.is_live_content,
                dash_manifest_url: streaming.dash_manifest_url,
                hls_manifest_url: streaming.hls_manifest_url,
            },
            renditions,
            video_details: VideoDetails {
                url: format!("https://www.youtube.com/watch?v={}", details.video_id),
                id: details.video_id,
                title: details.title,
                duration_in_sec,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(player_response: &str) -> String {
        format!(
            "<html><script>var ytInitialPlayerResponse = {};var meta = document.createElement('meta');</script></html>",
            player_response
        )
    }

    #[test]
    fn video_id_from_common_urls() {
        let expected = Some("dQw4w9WgXcQ".to_string());
        assert_eq!(extract_video_id("dQw4w9WgXcQ"), expected);
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10"), expected);
        assert_eq!(extract_video_id("https://m.youtube.com/watch?feature=share&v=dQw4w9WgXcQ"), expected);
        assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXcQ?si=abc"), expected);
        assert_eq!(extract_video_id("https://youtube.com/shorts/dQw4w9WgXcQ"), expected);
        assert_eq!(extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"), expected);
        assert_eq!(extract_video_id("https://www.youtube.com/live/dQw4w9WgXcQ"), expected);
    }

    #[test]
    fn video_id_rejects_other_urls() {
        assert_eq!(extract_video_id("https://example.com/watch?v=dQw4w9WgXcQ"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=short"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/feed/trending"), None);
        assert_eq!(extract_video_id("not a url"), None);
        assert!(!WatchPageSource::default().supports("https://vimeo.com/12345"));
    }

    #[test]
    fn parses_static_video() {
        let body = page(
            r#"{
                "playabilityStatus": { "status": "OK" },
                "videoDetails": { "videoId": "dQw4w9WgXcQ", "title": "Song", "lengthSeconds": "212", "isLiveContent": false },
                "streamingData": {
                    "formats": [
                        { "itag": 18, "mimeType": "video/mp4; codecs=\"avc1.42001E, mp4a.40.2\"", "url": "https://r/18" }
                    ],
                    "adaptiveFormats": [
                        { "itag": 140, "mimeType": "audio/mp4; codecs=\"mp4a.40.2\"", "url": "https://r/140", "contentLength": "3433514" },
                        { "itag": 251, "mimeType": "audio/webm; codecs=\"opus\"", "signatureCipher": "s=abc&url=https%3A%2F%2Fr%2F251" }
                    ]
                }
            }"#,
        );

        let metadata = parse_watch_page(&body).expect("metadata");
        assert!(!metadata.live_stream_data.is_live);
        assert_eq!(metadata.video_details.duration_in_sec, 212.0);
        assert_eq!(metadata.video_details.url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(metadata.renditions.len(), 2);
        assert_eq!(metadata.renditions[0].itag, Some(18));
        assert_eq!(metadata.renditions[1].content_length.as_deref(), Some("3433514"));
    }

    #[test]
    fn parses_live_manifests() {
        let body = page(
            r#"{
                "playabilityStatus": { "status": "OK" },
                "videoDetails": { "videoId": "jfKfPfyJRdk", "lengthSeconds": "0", "isLiveContent": true },
                "streamingData": {
                    "dashManifestUrl": "https://m/dash.mpd",
                    "hlsManifestUrl": "https://m/hls.m3u8",
                    "adaptiveFormats": [
                        { "mimeType": "audio/mp4; codecs=\"mp4a.40.2\"", "url": "https://r/140", "targetDurationSec": 2.5 }
                    ]
                }
            }"#,
        );

        let metadata = parse_watch_page(&body).expect("metadata");
        assert!(metadata.live_stream_data.is_live);
        assert!(metadata.has_zero_duration());
        assert_eq!(metadata.live_stream_data.hls_manifest_url.as_deref(), Some("https://m/hls.m3u8"));
        assert_eq!(metadata.renditions[0].target_duration_sec, Some(2.5));
    }

    #[test]
    fn unplayable_video_is_an_error() {
        let body = page(r#"{ "playabilityStatus": { "status": "ERROR", "reason": "Video unavailable" } }"#);
        let err = parse_watch_page(&body).unwrap_err();
        assert!(matches!(err, StreamError::Unavailable(ref reason) if reason == "Video unavailable"));
    }

    #[test]
    fn missing_player_response_is_an_error() {
        let err = parse_watch_page("<html></html>").unwrap_err();
        assert!(matches!(err, StreamError::PlayerResponseNotFound));
    }
}
