//! Stream descriptors handed to downstream players

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire-type tag of a static stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamType {
    #[serde(rename = "arbitrary")]
    Arbitrary,
    #[serde(rename = "raw")]
    Raw,
    #[serde(rename = "ogg/opus")]
    OggOpus,
    #[serde(rename = "webm/opus")]
    WebmOpus,
    #[serde(rename = "opus")]
    Opus,
}

impl StreamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamType::Arbitrary => "arbitrary",
            StreamType::Raw => "raw",
            StreamType::OggOpus => "ogg/opus",
            StreamType::WebmOpus => "webm/opus",
            StreamType::Opus => "opus",
        }
    }
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied selection parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamOptions {
    /// Index into the audio ladder; `None` selects the highest rendition
    #[serde(default)]
    pub quality: Option<i64>,
    /// Proxy URLs, passed through to transports
    #[serde(default)]
    pub proxies: Vec<String>,
}

/// Arguments for a manifest-driven live player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveStream {
    pub manifest_url: String,
    pub target_duration_sec: f64,
    pub video_url: String,
}

/// Arguments for a byte-range stream player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticStream {
    pub url: String,
    pub stream_type: StreamType,
    pub duration_in_sec: f64,
    pub content_length: u64,
    pub video_url: String,
    /// Effective ladder index after clamping
    pub quality: usize,
    /// Options exactly as the caller passed them
    pub options: StreamOptions,
}

/// Resolution result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StreamDescriptor {
    Live(LiveStream),
    Static(StaticStream),
}

impl StreamDescriptor {
    pub fn is_live(&self) -> bool {
        matches!(self, StreamDescriptor::Live(_))
    }

    /// Source page URL, present on both variants
    pub fn video_url(&self) -> &str {
        match self {
            StreamDescriptor::Live(live) => &live.video_url,
            StreamDescriptor::Static(stat) => &stat.video_url,
        }
    }
}
