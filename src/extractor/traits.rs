use crate::extractor::models::VideoMetadata;
use crate::stream::StreamOptions;
use anyhow::Result;
use async_trait::async_trait;

/// Core trait for video metadata sources
///
/// This trait isolates stream resolution from how the metadata is obtained
/// (watch page scraping, a pre-fetched document, a test fixture, etc.).
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Returns a unique identifier for this source (e.g., "youtube-watch-page")
    fn id(&self) -> &'static str;

    /// Checks if this source can handle the given URL
    fn supports(&self, url: &str) -> bool;

    /// Fetches metadata for one video.
    ///
    /// Transport settings (proxies) are taken from `options`; quality is ignored.
    async fn fetch(&self, url: &str, options: &StreamOptions) -> Result<VideoMetadata>;
}
