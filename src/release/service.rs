use log::{debug, info, warn};
use std::sync::Arc;

use crate::asset::{MirrorConfig, classify_all};
use crate::provider::{Provider, Release, RepoId};

use super::cache::{Clock, ReleaseCache, SystemClock};
use super::summary::{
    DownloadStats, FallbackRelease, ReleaseSummary, release_date, version_from_tag,
};

/// How many releases are summed for download statistics.
pub const STATS_HISTORY_LIMIT: usize = 50;

/// What the service needs to know about the project it serves.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub repo: RepoId,
    /// Web host of the repository, used for fallback links
    pub web_url: String,
    pub mirrors: MirrorConfig,
    pub fallback: FallbackRelease,
}

impl ServiceSettings {
    pub fn new(repo: RepoId) -> Self {
        Self {
            repo,
            web_url: "https://github.com".to_string(),
            mirrors: MirrorConfig::default(),
            fallback: FallbackRelease::default(),
        }
    }
}

/// Fetches releases and resolves them into downloadable artifacts.
///
/// None of the fetch operations fail: network and API errors are logged and
/// turned into a fallback summary or an empty result.
pub struct ReleaseService<P: Provider, C: Clock = SystemClock> {
    provider: P,
    clock: C,
    cache: ReleaseCache,
    settings: ServiceSettings,
}

impl<P: Provider> ReleaseService<P, SystemClock> {
    pub fn new(provider: P, settings: ServiceSettings) -> Self {
        Self {
            provider,
            clock: SystemClock,
            cache: ReleaseCache::default(),
            settings,
        }
    }
}

impl<P: Provider, C: Clock> ReleaseService<P, C> {
    pub fn with_clock<C2: Clock>(self, clock: C2) -> ReleaseService<P, C2> {
        ReleaseService {
            provider: self.provider,
            clock,
            cache: self.cache,
            settings: self.settings,
        }
    }

    pub fn with_cache(mut self, cache: ReleaseCache) -> Self {
        self.cache = cache;
        self
    }

    /// The latest release, served from cache while fresh.
    ///
    /// On failure a fallback summary with no downloads is returned and the
    /// cache is left untouched.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_latest_release(&self) -> Arc<ReleaseSummary> {
        let now = self.clock.now();
        if let Some(cached) = self.cache.get(now) {
            debug!("Using cached release {}", cached.version);
            return cached;
        }

        match self.provider.get_latest_release(&self.settings.repo).await {
            Ok(release) => {
                let summary = Arc::new(self.summarize(release));
                info!(
                    "Fetched release {} with {} download(s)",
                    summary.version,
                    summary.downloads.len()
                );
                self.cache.put(Arc::clone(&summary), now);
                summary
            }
            Err(e) => {
                warn!("Failed to fetch latest release: {:#}", e);
                Arc::new(self.fallback_summary())
            }
        }
    }

    /// Drop the cached summary and fetch again.
    pub async fn refresh(&self) -> Arc<ReleaseSummary> {
        self.clear_cache();
        self.fetch_latest_release().await
    }

    pub fn clear_cache(&self) {
        debug!("Clearing release cache");
        self.cache.clear();
    }

    /// Up to `limit` releases, most recent first. Never cached.
    ///
    /// Failures yield an empty list.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_all_releases(&self, limit: usize) -> Vec<Release> {
        if limit == 0 {
            return Vec::new();
        }

        match self.provider.get_releases(&self.settings.repo, limit).await {
            Ok(mut releases) => {
                releases.truncate(limit);
                debug!("Fetched {} release(s)", releases.len());
                releases
            }
            Err(e) => {
                warn!("Failed to fetch releases: {:#}", e);
                Vec::new()
            }
        }
    }

    /// Download counters summed over the recent release history.
    #[tracing::instrument(skip(self))]
    pub async fn download_stats(&self) -> DownloadStats {
        let releases = self.fetch_all_releases(STATS_HISTORY_LIMIT).await;

        DownloadStats {
            total_downloads: releases.iter().map(Release::download_count).sum(),
            latest_release_downloads: releases
                .first()
                .map(Release::download_count)
                .unwrap_or(0),
        }
    }

    fn summarize(&self, release: Release) -> ReleaseSummary {
        let version = version_from_tag(&release.tag).to_string();
        let downloads = classify_all(&release.assets, &version, &self.settings.mirrors);

        ReleaseSummary {
            release_date: release_date(release.published_at.as_deref()),
            release_notes: release.body,
            downloads,
            html_url: release.html_url,
            version,
            is_fallback: false,
        }
    }

    fn fallback_summary(&self) -> ReleaseSummary {
        let fallback = &self.settings.fallback;
        ReleaseSummary {
            version: fallback.version.clone(),
            release_date: fallback.release_date.clone(),
            release_notes: fallback.notes.clone(),
            downloads: Vec::new(),
            html_url: format!(
                "{}/{}/releases/latest",
                self.settings.web_url.trim_end_matches('/'),
                self.settings.repo
            ),
            is_fallback: true,
        }
    }
}
