use anyhow::{Context, Result};
use log::debug;
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue},
};
use std::path::PathBuf;
use std::time::Duration;

use crate::{
    asset::{DEFAULT_CDN_BASE, DEFAULT_MIRROR_PATTERNS, MirrorConfig},
    http::HttpClient,
    provider::{DEFAULT_API_URL, GitHubProvider, Provider, RepoId},
    release::{DEFAULT_TTL, FallbackRelease, ReleaseCache, ReleaseService, ServiceSettings},
    runtime::Runtime,
};

pub const DEFAULT_REPO: &str = "chenqi92/inflowave";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("inflowave-dl/", env!("INFLOWAVE_DL_VERSION"));
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// User-facing knobs, filled from CLI flags and their environment fallbacks.
#[derive(Debug, Clone)]
pub struct Settings {
    pub repo: RepoId,
    pub api_url: String,
    pub web_url: String,
    pub cdn_base: String,
    pub mirror_patterns: Vec<String>,
    pub fallback: FallbackRelease,
    pub ttl: Duration,
    pub timeout: Duration,
    pub config_dir: Option<PathBuf>,
    /// Print machine-readable JSON instead of text
    pub json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            repo: RepoId {
                owner: "chenqi92".to_string(),
                repo: "inflowave".to_string(),
            },
            api_url: DEFAULT_API_URL.to_string(),
            web_url: "https://github.com".to_string(),
            cdn_base: DEFAULT_CDN_BASE.to_string(),
            mirror_patterns: DEFAULT_MIRROR_PATTERNS.iter().map(|p| p.to_string()).collect(),
            fallback: FallbackRelease::default(),
            ttl: DEFAULT_TTL,
            timeout: DEFAULT_TIMEOUT,
            config_dir: None,
            json: false,
        }
    }
}

impl Settings {
    fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            repo: self.repo.clone(),
            web_url: self.web_url.trim_end_matches('/').to_string(),
            mirrors: MirrorConfig::new(self.cdn_base.clone(), self.mirror_patterns.clone()),
            fallback: self.fallback.clone(),
        }
    }
}

pub struct Config<P: Provider> {
    pub service: ReleaseService<P>,
    pub settings: Settings,
}

impl Config<GitHubProvider> {
    pub fn new<R: Runtime>(runtime: &R, settings: Settings) -> Result<Self> {
        let client = build_client(runtime, &settings)?;
        let provider = GitHubProvider::from_http_client(HttpClient::new(client), &settings.api_url);
        Ok(Self::with_provider(provider, settings))
    }
}

impl<P: Provider> Config<P> {
    pub fn with_provider(provider: P, settings: Settings) -> Self {
        let service = ReleaseService::new(provider, settings.service_settings())
            .with_cache(ReleaseCache::new(settings.ttl));
        Self { service, settings }
    }
}

/// Build the HTTP client used for every API request.
pub fn build_client<R: Runtime>(runtime: &R, settings: &Settings) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));

    if let Ok(token) = runtime.env_var("GITHUB_TOKEN") {
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .context("GITHUB_TOKEN contains invalid characters")?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        debug!("Using GITHUB_TOKEN for authentication: {}", mask_token(&token));
    }

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(settings.timeout)
        .build()
        .context("Failed to build HTTP client")
}

fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 12 {
        return "*********".to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}
