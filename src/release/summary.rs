use chrono::{DateTime, Utc};
use log::warn;
use serde::Serialize;

use crate::asset::ClassifiedDownload;

/// What the download page shows for the latest release.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseSummary {
    /// Tag without the leading "v"
    pub version: String,
    /// `YYYY-MM-DD`
    pub release_date: String,
    pub release_notes: String,
    /// Platform-major, recommended first
    pub downloads: Vec<ClassifiedDownload>,
    pub html_url: String,
    /// Set when the API was unreachable and this summary was synthesized
    pub is_fallback: bool,
}

impl ReleaseSummary {
    /// True when there is nothing to offer for download.
    pub fn downloads_unavailable(&self) -> bool {
        self.downloads.is_empty()
    }
}

/// Values used when the latest release cannot be fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackRelease {
    pub version: String,
    pub release_date: String,
    pub notes: String,
}

impl Default for FallbackRelease {
    fn default() -> Self {
        Self {
            version: "0.1.5".to_string(),
            release_date: "2024-12-20".to_string(),
            notes: "Release information temporarily unavailable. Please visit GitHub for the latest updates."
                .to_string(),
        }
    }
}

/// Aggregated download counters across the release history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadStats {
    pub total_downloads: u64,
    pub latest_release_downloads: u64,
}

/// Strip one leading "v" from a release tag.
pub fn version_from_tag(tag: &str) -> &str {
    tag.strip_prefix('v').unwrap_or(tag)
}

/// Parse an RFC 3339 timestamp.
pub fn parse_published_at(published_at: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(published_at)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Render a publication timestamp as a UTC calendar date.
///
/// Unparsable input is passed through unchanged; a missing date is empty.
pub fn release_date(published_at: Option<&str>) -> String {
    let Some(raw) = published_at else {
        return String::new();
    };

    match parse_published_at(raw) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => {
            warn!("Unparsable release date {:?}", raw);
            raw.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_from_tag() {
        assert_eq!(version_from_tag("v0.2.0"), "0.2.0");
        assert_eq!(version_from_tag("0.2.0"), "0.2.0");
        assert_eq!(version_from_tag("vv1"), "v1");
    }

    #[test]
    fn test_release_date_normalizes_to_utc() {
        assert_eq!(release_date(Some("2025-01-15T08:30:00Z")), "2025-01-15");
        assert_eq!(release_date(Some("2025-01-15T23:30:00-02:00")), "2025-01-16");
    }

    #[test]
    fn test_release_date_missing_or_invalid() {
        assert_eq!(release_date(None), "");
        assert_eq!(release_date(Some("yesterday")), "yesterday");
    }

    #[test]
    fn test_fallback_defaults() {
        let fallback = FallbackRelease::default();
        assert_eq!(fallback.version, "0.1.5");
        assert_eq!(fallback.release_date, "2024-12-20");
        assert!(fallback.notes.contains("temporarily unavailable"));
    }
}
