//! Release asset classification
//!
//! This module turns raw release asset filenames into structured download
//! descriptors (platform, architecture, package type) and provides the small
//! helpers the download listing needs, like human-readable sizes and
//! per-platform grouping.

mod classify;
mod kind;
mod mirror;
mod size;

pub use classify::{ClassifiedDownload, classify, classify_all, group_by_platform};
pub use kind::{Arch, PackageType, Platform};
pub use mirror::{DEFAULT_CDN_BASE, DEFAULT_MIRROR_PATTERNS, MirrorConfig};
pub use size::format_size;
