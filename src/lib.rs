//! tubestream library
//!
//! Resolves video metadata into a playable audio stream descriptor: a live
//! manifest for ongoing broadcasts, or a single audio rendition picked from
//! the quality ladder for everything else.

pub mod extractor;
pub mod stream;
pub mod utils;

// Re-export main types for easier use
pub use extractor::{MetadataSource, RenditionDescriptor, VideoMetadata, WatchPageSource};
pub use stream::{stream, stream_from_info, StreamDescriptor, StreamOptions, StreamType};
pub use utils::{ResolverSettings, StreamError};
