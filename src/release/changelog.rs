use chrono::Datelike;
use std::collections::BTreeMap;

use crate::provider::Release;

use super::summary::parse_published_at;

/// Releases worth listing in a changelog.
///
/// Drafts are always dropped, prereleases unless `include_prereleases` is
/// set. A non-empty `search` term must appear (case-insensitively) in the
/// release name, tag, or notes.
pub fn filter_releases<'a>(
    releases: &'a [Release],
    search: Option<&str>,
    include_prereleases: bool,
) -> Vec<&'a Release> {
    let term = search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    releases
        .iter()
        .filter(|r| !r.draft)
        .filter(|r| include_prereleases || !r.prerelease)
        .filter(|r| match &term {
            Some(term) => {
                r.name
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(term))
                    || r.tag.to_lowercase().contains(term)
                    || r.body.to_lowercase().contains(term)
            }
            None => true,
        })
        .collect()
}

/// Group releases by the year they were published, keeping input order.
///
/// Releases without a parsable date are keyed by `None`.
pub fn group_by_year<'a>(releases: &[&'a Release]) -> BTreeMap<Option<i32>, Vec<&'a Release>> {
    let mut groups: BTreeMap<Option<i32>, Vec<&'a Release>> = BTreeMap::new();
    for release in releases {
        let year = release
            .published_at
            .as_deref()
            .and_then(parse_published_at)
            .map(|dt| dt.year());
        groups.entry(year).or_default().push(*release);
    }
    groups
}
