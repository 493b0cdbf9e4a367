pub mod models;
pub mod native;
pub mod traits;

pub use models::{LiveStreamData, RenditionDescriptor, VideoDetails, VideoMetadata};
pub use native::youtube::{extract_video_id, WatchPageSource};
pub use traits::MetadataSource;
