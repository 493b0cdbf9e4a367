//! Audio stream selection

pub mod classifier;
pub mod resolver;
pub mod types;

// Re-export for convenience
pub use classifier::{parse_audio_formats, ClassifiedRendition};
pub use resolver::{clamp_quality, stream, stream_from_info};
pub use types::{LiveStream, StaticStream, StreamDescriptor, StreamOptions, StreamType};
