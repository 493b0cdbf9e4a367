//! Data structures for video metadata

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use tokio::fs;

/// Resolved metadata for one video
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    #[serde(alias = "LiveStreamData")]
    pub live_stream_data: LiveStreamData,
    /// Quality ladder order: index 0 is the lowest rendition
    #[serde(alias = "format", default)]
    pub renditions: Vec<RenditionDescriptor>,
    #[serde(alias = "video_details")]
    pub video_details: VideoDetails,
}

impl VideoMetadata {
    /// Parse a pre-fetched info document
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to deserialize video metadata")
    }

    /// Load a pre-fetched info document from disk
    pub async fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read info file {}", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Reported duration is zero
    pub fn has_zero_duration(&self) -> bool {
        self.video_details.duration_in_sec == 0.0
    }
}

/// Live broadcast state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStreamData {
    #[serde(default)]
    pub is_live: bool,
    #[serde(default)]
    pub dash_manifest_url: Option<String>,
    #[serde(default)]
    pub hls_manifest_url: Option<String>,
}

/// One encoded audio or video track option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenditionDescriptor {
    /// e.g. `audio/webm; codecs="opus"`
    pub mime_type: String,
    pub url: String,
    #[serde(
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub content_length: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_seconds",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_duration_sec: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub itag: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_quality: Option<String>,
}

/// Video details needed for stream resolution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Playback page URL
    pub url: String,
    /// Seconds; numeric strings are accepted and normalized here
    #[serde(default, deserialize_with = "seconds")]
    pub duration_in_sec: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Int(u64),
    Float(f64),
    Text(String),
}

impl NumberOrText {
    fn into_seconds<E: serde::de::Error>(self) -> std::result::Result<f64, E> {
        let float = match self {
            NumberOrText::Int(n) => n as f64,
            NumberOrText::Float(f) => f,
            NumberOrText::Text(s) => {
                let s = s.trim();
                s.parse::<f64>()
                    .map_err(|_| E::custom(format!("invalid seconds value: {:?}", s)))?
            }
        };

        if float.is_finite() && float >= 0.0 {
            Ok(float)
        } else {
            Err(E::custom(format!("invalid seconds value: {}", float)))
        }
    }
}

fn seconds<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    NumberOrText::deserialize(deserializer)?.into_seconds()
}

fn optional_seconds<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NumberOrText>::deserialize(deserializer)?
        .map(NumberOrText::into_seconds::<D::Error>)
        .transpose()
}

fn text_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<NumberOrText>::deserialize(deserializer)?.map(|value| match value {
            NumberOrText::Int(n) => n.to_string(),
            NumberOrText::Float(f) => f.to_string(),
            NumberOrText::Text(s) => s,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(duration: &str) -> VideoDetails {
        serde_json::from_str(&format!(
            r#"{{ "url": "https://www.youtube.com/watch?v=abc", "durationInSec": {} }}"#,
            duration
        ))
        .expect("details")
    }

    #[test]
    fn duration_accepts_numbers_and_text() {
        assert_eq!(details("0").duration_in_sec, 0.0);
        assert_eq!(details("\"0\"").duration_in_sec, 0.0);
        assert_eq!(details("\"0.0\"").duration_in_sec, 0.0);
        assert_eq!(details("212").duration_in_sec, 212.0);
        assert_eq!(details("\" 212 \"").duration_in_sec, 212.0);
        assert_eq!(details("212.9").duration_in_sec, 212.9);
        assert_eq!(details("\"0.4\"").duration_in_sec, 0.4);
    }

    #[test]
    fn fractional_segment_duration_is_kept() {
        let rendition: RenditionDescriptor = serde_json::from_str(
            r#"{ "mimeType": "audio/mp4; codecs=\"mp4a.40.2\"", "url": "u", "targetDurationSec": 2.5 }"#,
        )
        .expect("rendition");
        assert_eq!(rendition.target_duration_sec, Some(2.5));
    }

    #[tokio::test]
    async fn missing_info_file_names_the_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing.json");
        let err = VideoMetadata::load(&path).await.unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn duration_rejects_garbage() {
        let result: std::result::Result<VideoDetails, _> = serde_json::from_str(
            r#"{ "url": "https://www.youtube.com/watch?v=abc", "durationInSec": "soon" }"#,
        );
        assert!(result.is_err());

        let result: std::result::Result<VideoDetails, _> = serde_json::from_str(
            r#"{ "url": "https://www.youtube.com/watch?v=abc", "durationInSec": -3 }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn accepts_original_key_names() {
        let json = r#"{
            "LiveStreamData": { "isLive": false, "dashManifestUrl": null, "hlsManifestUrl": null },
            "format": [
                { "mimeType": "audio/webm; codecs=\"opus\"", "url": "u0", "contentLength": 100 }
            ],
            "video_details": { "url": "https://www.youtube.com/watch?v=abc", "durationInSec": "60" }
        }"#;

        let metadata = VideoMetadata::from_json_str(json).expect("metadata");
        assert!(!metadata.live_stream_data.is_live);
        assert_eq!(metadata.renditions.len(), 1);
        assert_eq!(metadata.renditions[0].content_length.as_deref(), Some("100"));
        assert_eq!(metadata.video_details.duration_in_sec, 60.0);
        assert!(!metadata.has_zero_duration());
    }
}
