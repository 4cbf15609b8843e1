#![forbid(unsafe_code)]

//! Users and projects whose profiles list feed videos.

use std::collections::HashSet;
use std::str::FromStr;

use crate::error::VideoError;

/// A site user, possibly linked to an account on the video provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    /// Author name the provider reports for this user's uploads.
    pub display_name: String,
    /// Provider account identifier, `None` when the user never connected one.
    pub external_id: Option<String>,
}

impl User {
    pub fn new(display_name: impl Into<String>, external_id: Option<&str>) -> Self {
        Self {
            display_name: display_name.into(),
            external_id: external_id.map(str::to_owned),
        }
    }

    /// Returns the trimmed provider id, treating blank ids as absent.
    pub fn video_account(&self) -> Option<&str> {
        self.external_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Project {
    pub title: String,
    pub tags: Vec<String>,
    pub members: Vec<User>,
}

impl Project {
    /// Members that have a provider account configured.
    pub fn members_with_video_accounts(&self) -> impl Iterator<Item = &User> {
        self.members
            .iter()
            .filter(|member| member.video_account().is_some())
    }

    /// Display names of the video-enabled members, in membership order.
    pub fn member_names(&self) -> Vec<String> {
        self.members_with_video_accounts()
            .map(|member| member.display_name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// The project tags followed by its title. Blank entries are skipped and
    /// later case-insensitive duplicates dropped.
    pub fn search_tags(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.tags
            .iter()
            .chain(std::iter::once(&self.title))
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .filter(|tag| seen.insert(tag.to_lowercase()))
            .map(str::to_owned)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectKind {
    User,
    Project,
}

impl FromStr for SubjectKind {
    type Err = VideoError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(SubjectKind::User),
            "project" => Ok(SubjectKind::Project),
            _ => Err(VideoError::UnsupportedSubjectKind(value.to_string())),
        }
    }
}

/// The profile owner whose videos are aggregated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    User(User),
    Project(Project),
}

impl Subject {
    pub fn kind(&self) -> SubjectKind {
        match self {
            Subject::User(_) => SubjectKind::User,
            Subject::Project(_) => SubjectKind::Project,
        }
    }
}

/// Untyped record as handed over by the data layer. Only the fields relevant
/// to `kind` are read when converting into a [`Subject`].
#[derive(Debug, Clone, Default)]
pub struct SubjectRecord {
    pub kind: String,
    pub display_name: String,
    pub external_id: Option<String>,
    pub title: String,
    pub tags: Vec<String>,
    pub members: Vec<User>,
}

impl TryFrom<SubjectRecord> for Subject {
    type Error = VideoError;

    fn try_from(record: SubjectRecord) -> Result<Self, Self::Error> {
        match record.kind.parse::<SubjectKind>()? {
            SubjectKind::User => Ok(Subject::User(User {
                display_name: record.display_name,
                external_id: record.external_id,
            })),
            SubjectKind::Project => Ok(Subject::Project(Project {
                title: record.title,
                tags: record.tags,
                members: record.members,
            })),
        }
    }
}
