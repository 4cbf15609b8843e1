#![forbid(unsafe_code)]

use thiserror::Error;

pub type VideoResult<T> = std::result::Result<T, VideoError>;

/// Failures surfaced by the video feed pipeline.
///
/// `InvalidUpstreamResponse` never reaches callers of
/// [`VideoFeed::videos_for`](crate::feed::VideoFeed::videos_for): it is logged
/// and turned into an empty result. Transport problems are reported as
/// `UpstreamUnavailable` so pages can tell "no videos" apart from "provider
/// down".
#[derive(Debug, Error)]
pub enum VideoError {
    #[error("unsupported subject kind: {0:?}")]
    UnsupportedSubjectKind(String),
    #[error("invalid upstream response: {0}")]
    InvalidUpstreamResponse(String),
    #[error("video feed unavailable at {url}: {reason}")]
    UpstreamUnavailable { url: String, reason: String },
}

impl VideoError {
    pub(crate) fn unavailable(url: &str, reason: impl Into<String>) -> Self {
        VideoError::UpstreamUnavailable {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}
