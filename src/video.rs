#![forbid(unsafe_code)]

//! Normalized video records and the provider feed format they are read from.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{VideoError, VideoResult};

/// One video as shown on a profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub author: String,
    /// Provider video id, e.g. `3Hi41S5Tp54`.
    pub id: String,
    pub published: NaiveDate,
    pub title: String,
    /// Description as returned by the provider, HTML or plain text.
    pub content: String,
    /// Watch page URL.
    pub url: String,
}

/// Top level of the provider's JSON feed. Only `feed.entry` is read.
#[derive(Deserialize)]
struct FeedDocument {
    #[serde(default)]
    feed: Option<FeedBody>,
}

#[derive(Deserialize)]
struct FeedBody {
    // Kept as raw values so one odd entry cannot fail the whole document.
    #[serde(default)]
    entry: Vec<Value>,
}

/// Provider text nodes look like `{"$t": "...", "type": "text"}`.
#[derive(Deserialize)]
struct TextNode {
    #[serde(rename = "$t")]
    text: String,
}

#[derive(Deserialize)]
struct FeedAuthor {
    name: Option<TextNode>,
}

#[derive(Deserialize)]
struct FeedLink {
    rel: Option<String>,
    href: Option<String>,
}

#[derive(Deserialize)]
struct FeedEntry {
    #[serde(default)]
    author: Vec<FeedAuthor>,
    id: Option<TextNode>,
    published: Option<TextNode>,
    title: Option<TextNode>,
    content: Option<TextNode>,
    #[serde(default)]
    link: Vec<FeedLink>,
}

impl FeedEntry {
    /// Returns `None` when a required field is missing or unusable.
    fn into_record(self) -> Option<VideoRecord> {
        let author = self
            .author
            .into_iter()
            .find_map(|author| author.name)
            .map(|name| name.text)?;
        let id = self.id.as_ref().and_then(|id| video_id_from(&id.text))?;
        let published = self
            .published
            .as_ref()
            .and_then(|published| parse_published(&published.text))?;
        let title = self.title?.text;
        let url = watch_url(&self.link)?;
        let content = self.content.map(|content| content.text).unwrap_or_default();
        Some(VideoRecord {
            author,
            id,
            published,
            title,
            content,
            url,
        })
    }
}

/// Entry ids are URIs such as `http://.../videos/3Hi41S5Tp54`; the video id is
/// the last path segment.
fn video_id_from(raw: &str) -> Option<String> {
    raw.trim()
        .trim_end_matches('/')
        .rsplit(['/', ':'])
        .next()
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
}

/// Keeps the calendar date of an RFC 3339 timestamp as written, without
/// shifting it to UTC. Bare `YYYY-MM-DD` values are accepted too.
fn parse_published(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(datetime.date_naive());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

/// Prefers the `alternate` link (the watch page), else the first usable href.
fn watch_url(links: &[FeedLink]) -> Option<String> {
    let usable = |link: &&FeedLink| link.href.as_deref().is_some_and(|href| !href.is_empty());
    links
        .iter()
        .filter(usable)
        .find(|link| link.rel.as_deref() == Some("alternate"))
        .or_else(|| links.iter().find(usable))
        .and_then(|link| link.href.clone())
}

/// Decodes a feed body into records sorted by publication date, newest first.
///
/// Entries lacking an author, id, publication date, title or link are skipped.
/// A body that is not JSON, or not shaped like a feed, is an
/// [`VideoError::InvalidUpstreamResponse`].
pub(crate) fn parse_response(body: &str) -> VideoResult<Vec<VideoRecord>> {
    let document: FeedDocument = serde_json::from_str(body)
        .map_err(|err| VideoError::InvalidUpstreamResponse(err.to_string()))?;
    let entries = document.feed.map(|feed| feed.entry).unwrap_or_default();

    let mut records = Vec::with_capacity(entries.len());
    for (index, value) in entries.into_iter().enumerate() {
        let record = serde_json::from_value::<FeedEntry>(value)
            .ok()
            .and_then(FeedEntry::into_record);
        match record {
            Some(record) => records.push(record),
            None => debug!(index, "skipping malformed feed entry"),
        }
    }

    records.sort_by(|a, b| b.published.cmp(&a.published));
    Ok(records)
}

/// Keeps records whose title mentions any tag (case-insensitive) and whose
/// author is one of `allowed_authors` (exact match). Input order is kept.
pub(crate) fn filter_response<S: AsRef<str>>(
    records: Vec<VideoRecord>,
    tags: &[S],
    allowed_authors: &[S],
) -> Vec<VideoRecord> {
    let tags: Vec<String> = tags
        .iter()
        .map(|tag| tag.as_ref().trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect();
    records
        .into_iter()
        .filter(|record| {
            let title = record.title.to_lowercase();
            tags.iter().any(|tag| title.contains(tag.as_str()))
        })
        .filter(|record| {
            allowed_authors
                .iter()
                .any(|author| author.as_ref() == record.author)
        })
        .collect()
}
