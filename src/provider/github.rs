//! GitHub provider implementation.

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
#[cfg(test)]
use reqwest::Client;

use crate::http::HttpClient;

use super::{Author, Provider, Release, ReleaseAsset, RepoId};

/// GitHub caps `per_page` at this value.
const MAX_PER_PAGE: usize = 100;

/// GitHub API response types (internal).
mod api {
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct Release {
        #[serde(default)]
        pub id: u64,
        pub tag_name: String,
        pub name: Option<String>,
        pub body: Option<String>,
        pub published_at: Option<String>,
        #[serde(default)]
        pub prerelease: bool,
        #[serde(default)]
        pub draft: bool,
        #[serde(default)]
        pub html_url: String,
        pub author: Option<Author>,
        #[serde(default)]
        pub assets: Vec<Asset>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Author {
        pub login: String,
        #[serde(default)]
        pub avatar_url: String,
    }

    #[derive(Deserialize, Debug)]
    pub struct Asset {
        #[serde(default)]
        pub id: u64,
        pub name: String,
        #[serde(default)]
        pub content_type: String,
        #[serde(default)]
        pub size: u64,
        #[serde(default)]
        pub download_count: u64,
        pub browser_download_url: String,
        pub label: Option<String>,
    }
}

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub provider implementation.
pub struct GitHubProvider {
    http_client: HttpClient,
    api_url: String,
}

impl GitHubProvider {
    /// Create a new GitHub provider with custom API URL.
    /// Used primarily for testing.
    #[cfg(test)]
    pub fn with_api_url(client: Client, api_url: &str) -> Self {
        Self::from_http_client(HttpClient::new(client), api_url)
    }

    /// Create from an existing HttpClient.
    pub fn from_http_client(http_client: HttpClient, api_url: &str) -> Self {
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn releases_url(&self, repo: &RepoId) -> String {
        format!("{}/repos/{}/{}/releases", self.api_url, repo.owner, repo.repo)
    }
}

#[async_trait]
impl Provider for GitHubProvider {
    #[tracing::instrument(skip(self))]
    async fn get_latest_release(&self, repo: &RepoId) -> Result<Release> {
        let url = format!("{}/latest", self.releases_url(repo));
        debug!("Fetching latest release from {}...", url);

        let release: api::Release = self.http_client.get_json(&url).await?;
        Ok(release.into())
    }

    #[tracing::instrument(skip(self))]
    async fn get_releases(&self, repo: &RepoId, limit: usize) -> Result<Vec<Release>> {
        let url = self.releases_url(repo);
        let per_page = limit.clamp(1, MAX_PER_PAGE).to_string();
        debug!("Fetching up to {} releases from {}...", limit, url);

        let releases: Vec<api::Release> = self
            .http_client
            .get_json_with_query(&url, &[("per_page", &per_page)])
            .await?;

        Ok(releases.into_iter().take(limit).map(|r| r.into()).collect())
    }
}

impl From<api::Release> for Release {
    fn from(r: api::Release) -> Self {
        Release {
            id: r.id,
            tag: r.tag_name,
            name: r.name,
            body: r.body.unwrap_or_default(),
            published_at: r.published_at,
            prerelease: r.prerelease,
            draft: r.draft,
            html_url: r.html_url,
            author: r.author.map(|a| a.into()),
            assets: r.assets.into_iter().map(|a| a.into()).collect(),
        }
    }
}

impl From<api::Author> for Author {
    fn from(a: api::Author) -> Self {
        Author {
            login: a.login,
            avatar_url: a.avatar_url,
        }
    }
}

impl From<api::Asset> for ReleaseAsset {
    fn from(a: api::Asset) -> Self {
        ReleaseAsset {
            id: a.id,
            name: a.name,
            content_type: a.content_type,
            size: a.size,
            download_count: a.download_count,
            download_url: a.browser_download_url,
            label: a.label,
        }
    }
}
