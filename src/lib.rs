#![forbid(unsafe_code)]

//! Aggregates the feed videos shown on user and project profiles.
//!
//! A [`Subject`] is turned into a single feed query, the provider's JSON is
//! normalized into [`VideoRecord`]s sorted newest first, and project results
//! are narrowed to videos that mention the project and were uploaded by one
//! of its members.

pub mod config;
pub mod error;
pub mod feed;
pub mod request;
pub mod roster;
pub mod subject;
pub mod video;

pub use error::{VideoError, VideoResult};
pub use feed::{FeedTransport, HttpTransport, VideoFeed};
pub use subject::{Project, Subject, SubjectKind, SubjectRecord, User};
pub use video::VideoRecord;
