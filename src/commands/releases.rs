use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::{
    provider::{Provider, Release},
    release::{filter_releases, group_by_year, release_date},
};

use super::config::Config;
use super::print_json;

pub const DEFAULT_RELEASE_LIMIT: usize = 10;

/// How the `releases` command narrows the history.
#[derive(Debug, Clone)]
pub struct ReleaseQuery {
    pub limit: usize,
    pub include_prereleases: bool,
    pub search: Option<String>,
    pub by_year: bool,
}

impl Default for ReleaseQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_RELEASE_LIMIT,
            include_prereleases: false,
            search: None,
            by_year: false,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReleaseEntry<'a> {
    version: &'a str,
    title: &'a str,
    release_date: String,
    prerelease: bool,
    download_count: u64,
    html_url: &'a str,
}

impl<'a> From<&'a Release> for ReleaseEntry<'a> {
    fn from(release: &'a Release) -> Self {
        Self {
            version: &release.tag,
            title: release.title(),
            release_date: release_date(release.published_at.as_deref()),
            prerelease: release.prerelease,
            download_count: release.download_count(),
            html_url: &release.html_url,
        }
    }
}

/// List the release history, most recent first.
#[tracing::instrument(skip(config))]
pub async fn releases<P: Provider>(
    config: &Config<P>,
    query: &ReleaseQuery,
) -> Result<()> {
    let all = config.service.fetch_all_releases(query.limit).await;
    let shown = filter_releases(&all, query.search.as_deref(), query.include_prereleases);

    if config.settings.json {
        return if query.by_year {
            let grouped: BTreeMap<String, Vec<ReleaseEntry>> = group_by_year(&shown)
                .into_iter()
                .map(|(year, list)| (year_label(year), list.into_iter().map(Into::into).collect()))
                .collect();
            print_json(&grouped)
        } else {
            let entries: Vec<ReleaseEntry> = shown.into_iter().map(Into::into).collect();
            print_json(&entries)
        };
    }

    print!("{}", render_releases(&shown, query.by_year));
    Ok(())
}

fn year_label(year: Option<i32>) -> String {
    year.map(|y| y.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn render_line(release: &Release) -> String {
    let entry = ReleaseEntry::from(release);
    let mut line = format!("{}  {}", entry.version, entry.title);
    if !entry.release_date.is_empty() {
        line.push_str(&format!("  {}", entry.release_date));
    }
    if entry.prerelease {
        line.push_str("  [pre-release]");
    }
    line.push_str(&format!("  ({} downloads)", entry.download_count));
    line
}

pub(crate) fn render_releases(releases: &[&Release], by_year: bool) -> String {
    if releases.is_empty() {
        return "No releases found.\n".to_string();
    }

    let mut lines = Vec::new();
    if by_year {
        // Newest year first, undated releases last
        let groups = group_by_year(releases);
        let dated = groups.iter().rev().filter(|(year, _)| year.is_some());
        let undated = groups.iter().filter(|(year, _)| year.is_none());
        for (year, list) in dated.chain(undated) {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(year_label(*year));
            lines.extend(list.iter().map(|r| format!("  {}", render_line(r))));
        }
    } else {
        lines.extend(releases.iter().map(|r| render_line(r)));
    }

    lines.join("\n") + "\n"
}
