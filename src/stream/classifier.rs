//! Audio rendition classification

use crate::extractor::models::RenditionDescriptor;
use crate::utils::error::StreamError;
use serde::Serialize;

/// Audio rendition with codec and container parsed out of its MIME type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedRendition {
    #[serde(flatten)]
    pub rendition: RenditionDescriptor,
    pub codec: String,
    pub container: String,
}

impl ClassifiedRendition {
    pub fn is_webm_opus(&self) -> bool {
        self.codec == "opus" && self.container == "webm"
    }
}

/// Whether the MIME type's major component is `audio`
pub fn is_audio(mime_type: &str) -> bool {
    mime_type
        .split_once('/')
        .is_some_and(|(major, _)| major == "audio")
}

/// Keep audio renditions, in input order, and label their codec and container
pub fn parse_audio_formats(
    renditions: &[RenditionDescriptor],
) -> Result<Vec<ClassifiedRendition>, StreamError> {
    renditions
        .iter()
        .filter(|rendition| is_audio(&rendition.mime_type))
        .map(|rendition| {
            let malformed = || StreamError::MalformedRendition {
                mime_type: rendition.mime_type.clone(),
            };
            let codec = between(&rendition.mime_type, "codecs=\"", "\"").ok_or_else(malformed)?;
            let container = between(&rendition.mime_type, "audio/", ";").ok_or_else(malformed)?;

            Ok(ClassifiedRendition {
                rendition: rendition.clone(),
                codec: codec.to_string(),
                container: container.to_string(),
            })
        })
        .collect()
}

/// Substring after the first `start` and before the next `end`; both must exist
fn between<'a>(text: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let (_, rest) = text.split_once(start)?;
    let (inner, _) = rest.split_once(end)?;
    Some(inner)
}
