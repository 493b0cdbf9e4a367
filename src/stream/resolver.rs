//! Stream resolution: live vs. static branching and quality selection

use crate::extractor::models::{RenditionDescriptor, VideoMetadata};
use crate::extractor::traits::MetadataSource;
use crate::stream::classifier::parse_audio_formats;
use crate::stream::types::{LiveStream, StaticStream, StreamDescriptor, StreamOptions, StreamType};
use crate::utils::error::StreamError;
use anyhow::Result;
use tracing::{debug, info, warn};

/// Snap a requested quality onto a ladder of `len` renditions.
///
/// `None` picks the highest index, anything `<= 0` the lowest and anything
/// past the end the highest. Returns `None` only for an empty ladder.
pub fn clamp_quality(quality: Option<i64>, len: usize) -> Option<usize> {
    let highest = len.checked_sub(1)?;
    let index = match quality {
        None => highest,
        Some(q) if q <= 0 => 0,
        Some(q) => usize::try_from(q).map_or(highest, |q| q.min(highest)),
    };
    Some(index)
}

/// Fetch metadata for `url` from `source`, then resolve it
pub async fn stream(
    source: &dyn MetadataSource,
    url: &str,
    options: &StreamOptions,
) -> Result<StreamDescriptor> {
    info!("Resolving {} via {}", url, source.id());
    let metadata = source.fetch(url, options).await?;
    Ok(stream_from_info(&metadata, options)?)
}

/// Resolve already fetched metadata into a stream descriptor
pub fn stream_from_info(
    metadata: &VideoMetadata,
    options: &StreamOptions,
) -> Result<StreamDescriptor, StreamError> {
    let live = &metadata.live_stream_data;
    if let Some(hls_manifest_url) = live.hls_manifest_url.as_deref() {
        if live.is_live && metadata.has_zero_duration() {
            return live_stream(metadata, hls_manifest_url).map(StreamDescriptor::Live);
        }
    }

    let ladder = parse_audio_formats(&metadata.renditions)?;
    let index = clamp_quality(options.quality, ladder.len()).ok_or(StreamError::EmptyAudioLadder)?;
    let selected = &ladder[index];

    let stream_type = if selected.is_webm_opus() {
        StreamType::WebmOpus
    } else {
        StreamType::Arbitrary
    };
    debug!(
        "Selected audio rendition {}/{} ({}/{}) as {}",
        index,
        ladder.len(),
        selected.container,
        selected.codec,
        stream_type
    );

    Ok(StreamDescriptor::Static(StaticStream {
        url: selected.rendition.url.clone(),
        stream_type,
        duration_in_sec: metadata.video_details.duration_in_sec,
        content_length: content_length(&selected.rendition),
        video_url: metadata.video_details.url.clone(),
        quality: index,
        options: options.clone(),
    }))
}

fn live_stream(metadata: &VideoMetadata, hls_manifest_url: &str) -> Result<LiveStream, StreamError> {
    // DASH first, HLS when DASH is absent.
    let manifest_url = metadata
        .live_stream_data
        .dash_manifest_url
        .as_deref()
        .unwrap_or(hls_manifest_url)
        .to_string();

    let target_duration_sec = metadata
        .renditions
        .last()
        .and_then(|rendition| rendition.target_duration_sec)
        .ok_or(StreamError::MissingSegmentDuration)?;

    debug!(
        "Live broadcast, using manifest {} ({}s segments)",
        manifest_url, target_duration_sec
    );

    Ok(LiveStream {
        manifest_url,
        target_duration_sec,
        video_url: metadata.video_details.url.clone(),
    })
}

/// Absent or non-numeric lengths are accepted as 0
fn content_length(rendition: &RenditionDescriptor) -> u64 {
    match rendition.content_length.as_deref().map(str::trim) {
        Some(text) => text.parse().unwrap_or_else(|_| {
            warn!(
                "Non-numeric content length {:?} for {}, using 0",
                text, rendition.url
            );
            0
        }),
        None => {
            warn!("Missing content length for {}, using 0", rendition.url);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp_quality(None, 3), Some(2));
        assert_eq!(clamp_quality(Some(-5), 3), Some(0));
        assert_eq!(clamp_quality(Some(0), 3), Some(0));
        assert_eq!(clamp_quality(Some(1), 3), Some(1));
        assert_eq!(clamp_quality(Some(3), 3), Some(2));
        assert_eq!(clamp_quality(Some(i64::MAX), 3), Some(2));
        assert_eq!(clamp_quality(Some(i64::MIN), 1), Some(0));
        assert_eq!(clamp_quality(None, 0), None);
        assert_eq!(clamp_quality(Some(0), 0), None);
    }

    fn with_length(content_length: Option<&str>) -> RenditionDescriptor {
        RenditionDescriptor {
            mime_type: "audio/mp4; codecs=\"mp4a.40.2\"".to_string(),
            url: "u".to_string(),
            content_length: content_length.map(str::to_string),
            target_duration_sec: None,
            itag: None,
            bitrate: None,
            audio_quality: None,
        }
    }

    #[test]
    fn content_length_coercion() {
        assert_eq!(content_length(&with_length(Some("3433514"))), 3_433_514);
        assert_eq!(content_length(&with_length(Some(" 42 "))), 42);
        assert_eq!(content_length(&with_length(Some("n/a"))), 0);
        assert_eq!(content_length(&with_length(Some(""))), 0);
        assert_eq!(content_length(&with_length(None)), 0);
    }
}
