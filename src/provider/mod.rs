//! Provider abstraction for release sources.
//!
//! The release fetcher talks to a [`Provider`] so the GitHub API can be
//! replaced by a mock in tests or pointed at a different API host.

mod github;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use github::{DEFAULT_API_URL, GitHubProvider};

/// Repository identifier (owner/repo format).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            anyhow::bail!("Invalid repository format. Expected 'owner/repo'.")
        } else {
            Ok(RepoId {
                owner: parts[0].to_string(),
                repo: parts[1].to_string(),
            })
        }
    }
}

/// A downloadable asset attached to a release.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ReleaseAsset {
    pub id: u64,
    pub name: String,
    pub content_type: String,
    pub size: u64,
    pub download_count: u64,
    pub download_url: String,
    pub label: Option<String>,
}

/// Account that published a release.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Author {
    pub login: String,
    pub avatar_url: String,
}

/// A release from the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Release {
    pub id: u64,
    /// Version tag (e.g., "v1.0.0")
    pub tag: String,
    /// Release name/title
    pub name: Option<String>,
    /// Release notes (markdown)
    pub body: String,
    /// Publication date (ISO 8601)
    pub published_at: Option<String>,
    pub prerelease: bool,
    pub draft: bool,
    /// Web page of the release
    pub html_url: String,
    pub author: Option<Author>,
    pub assets: Vec<ReleaseAsset>,
}

impl Release {
    /// Sum of the download counters of every asset.
    pub fn download_count(&self) -> u64 {
        self.assets.iter().map(|a| a.download_count).sum()
    }

    /// Release title, falling back to the tag.
    pub fn title(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.tag,
        }
    }
}

/// Trait for release providers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Fetch the most recent published release.
    async fn get_latest_release(&self, repo: &RepoId) -> Result<Release>;

    /// Fetch up to `limit` releases, most recent first.
    async fn get_releases(&self, repo: &RepoId, limit: usize) -> Result<Vec<Release>>;
}
