#![forbid(unsafe_code)]

//! Fetches feed videos for a [`Subject`] from the video provider.

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::FeedSettings;
use crate::error::{VideoError, VideoResult};
use crate::request::{build_request_for_project_videos, build_request_for_user_videos};
use crate::subject::{Project, Subject, User};
use crate::video::{VideoRecord, filter_response, parse_response};

/// Issues a GET and hands back the response body.
///
/// Transport failures and non-success statuses must be reported as
/// [`VideoError::UpstreamUnavailable`].
pub trait FeedTransport {
    fn get(&self, url: &str) -> VideoResult<String>;
}

/// Blocking `ureq` transport with a bounded timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { agent }
    }
}

impl FeedTransport for HttpTransport {
    fn get(&self, url: &str) -> VideoResult<String> {
        let response = self.agent.get(url).call().map_err(|err| match err {
            ureq::Error::Status(code, _) => VideoError::unavailable(url, format!("HTTP status {code}")),
            ureq::Error::Transport(transport) => VideoError::unavailable(url, transport.to_string()),
        })?;
        response
            .into_string()
            .map_err(|err| VideoError::unavailable(url, format!("reading response body: {err}")))
    }
}

pub struct VideoFeed<T = HttpTransport> {
    base_url: String,
    transport: T,
}

impl VideoFeed<HttpTransport> {
    pub fn from_settings(settings: &FeedSettings) -> Self {
        Self::new(&settings.base_url, HttpTransport::new(settings.timeout))
    }
}

impl<T: FeedTransport> VideoFeed<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Videos for a profile page, newest first.
    ///
    /// Users get every upload of their linked account, or nothing without
    /// one. Projects get search results narrowed to videos whose title names
    /// the project and whose author is a video-enabled member.
    pub fn videos_for(&self, subject: &Subject) -> VideoResult<Vec<VideoRecord>> {
        match subject {
            Subject::User(user) => self.user_videos(user),
            Subject::Project(project) => self.project_videos(project),
        }
    }

    fn user_videos(&self, user: &User) -> VideoResult<Vec<VideoRecord>> {
        let Some(external_id) = user.video_account() else {
            debug!(user = %user.display_name, "no video account linked");
            return Ok(Vec::new());
        };
        let url = build_request_for_user_videos(&self.base_url, external_id);
        self.fetch_and_parse(&url)
    }

    fn project_videos(&self, project: &Project) -> VideoResult<Vec<VideoRecord>> {
        let tags = project.search_tags();
        let members = project.member_names();
        let url = build_request_for_project_videos(&self.base_url, &tags, &members);
        let videos = self.fetch_and_parse(&url)?;
        Ok(filter_response(videos, &tags, &members))
    }

    /// Fetches `url` and parses the feed. Bodies that cannot be decoded are
    /// logged and yield no videos; transport errors are returned.
    pub fn fetch_and_parse(&self, url: &str) -> VideoResult<Vec<VideoRecord>> {
        debug!(url, "requesting video feed");
        let body = self.transport.get(url)?;
        match parse_response(&body) {
            Ok(videos) => Ok(videos),
            Err(err) => {
                warn!(url, error = %err, "Attempted to decode invalid JSON");
                Ok(Vec::new())
            }
        }
    }
}
