#![forbid(unsafe_code)]

//! TOML roster of users and projects, standing in for the site database when
//! the feed is queried from the command line.
//!
//! ```toml
//! [[users]]
//! slug = "john"
//! display_name = "John Doe"
//! external_id = "test_id"
//!
//! [[projects]]
//! slug = "websiteone"
//! title = "WebsiteOne"
//! tags = ["WSO"]
//! members = ["john"]
//! ```

use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use tracing::warn;

use crate::subject::{Subject, SubjectKind, SubjectRecord, User};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub users: Vec<UserEntry>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserEntry {
    pub slug: String,
    pub display_name: String,
    #[serde(default)]
    pub external_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectEntry {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// User slugs.
    #[serde(default)]
    pub members: Vec<String>,
}

impl UserEntry {
    fn to_user(&self) -> User {
        User {
            display_name: self.display_name.clone(),
            external_id: self.external_id.clone(),
        }
    }
}

impl Roster {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Reading roster {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("Parsing roster {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    fn user(&self, slug: &str) -> Option<&UserEntry> {
        self.users.iter().find(|user| user.slug == slug)
    }

    /// Looks up `slug` among the records of `kind`. Project members are
    /// resolved to users; unknown member slugs are skipped.
    pub fn record(&self, kind: &str, slug: &str) -> Result<SubjectRecord> {
        match kind.parse::<SubjectKind>()? {
            SubjectKind::User => {
                let user = self
                    .user(slug)
                    .ok_or_else(|| anyhow!("no user with slug {slug:?} in roster"))?;
                Ok(SubjectRecord {
                    kind: kind.to_string(),
                    display_name: user.display_name.clone(),
                    external_id: user.external_id.clone(),
                    ..SubjectRecord::default()
                })
            }
            SubjectKind::Project => {
                let project = self
                    .projects
                    .iter()
                    .find(|project| project.slug == slug)
                    .ok_or_else(|| anyhow!("no project with slug {slug:?} in roster"))?;
                let members = project
                    .members
                    .iter()
                    .filter_map(|member| {
                        let user = self.user(member);
                        if user.is_none() {
                            warn!(project = %slug, member = %member, "unknown project member");
                        }
                        user.map(UserEntry::to_user)
                    })
                    .collect();
                Ok(SubjectRecord {
                    kind: kind.to_string(),
                    title: project.title.clone(),
                    tags: project.tags.clone(),
                    members,
                    ..SubjectRecord::default()
                })
            }
        }
    }

    pub fn subject(&self, kind: &str, slug: &str) -> Result<Subject> {
        Ok(Subject::try_from(self.record(kind, slug)?)?)
    }
}
