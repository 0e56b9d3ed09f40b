//! Release fetching
//!
//! [`ReleaseService`] fetches the latest release and the release history
//! through a [`Provider`](crate::provider::Provider), classifies assets into
//! downloads, and keeps the latest summary in a short-lived [`ReleaseCache`].

mod cache;
mod changelog;
mod service;
mod summary;

pub use cache::{Clock, DEFAULT_TTL, ReleaseCache, SystemClock};
pub use changelog::{filter_releases, group_by_year};
pub use service::{ReleaseService, STATS_HISTORY_LIMIT, ServiceSettings};
pub use summary::{DownloadStats, FallbackRelease, ReleaseSummary, release_date, version_from_tag};
