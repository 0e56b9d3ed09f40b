use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::provider::ReleaseAsset;

use super::format_size;
use super::kind::{Arch, PackageType, Platform};
use super::mirror::MirrorConfig;

/// A release asset recognised as an installable download.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedDownload {
    pub package_type: PackageType,
    pub platform: Platform,
    pub arch: Arch,
    pub display_name: String,
    pub human_size: String,
    pub download_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirror_url: Option<String>,
    pub is_recommended: bool,
}

struct PlatformRule {
    matches: fn(&str) -> bool,
    platform: Platform,
    package_type: fn(&str) -> PackageType,
}

struct ArchRule {
    matches: fn(&str) -> bool,
    arch: Arch,
}

/// Evaluated in order against the lower-cased filename; first match wins.
const PLATFORM_RULES: &[PlatformRule] = &[
    PlatformRule {
        matches: |n| n.contains(".msi") || has_token_prefix(n, "win"),
        platform: Platform::Windows,
        package_type: |n| {
            if n.contains("portable") {
                PackageType::Portable
            } else {
                PackageType::Installer
            }
        },
    },
    PlatformRule {
        matches: |n| n.contains(".dmg") || n.contains("macos") || n.contains("darwin"),
        platform: Platform::Macos,
        package_type: |_| PackageType::DiskImage,
    },
    PlatformRule {
        matches: |n| n.contains(".appimage"),
        platform: Platform::Linux,
        package_type: |_| PackageType::AppImage,
    },
    PlatformRule {
        matches: |n| n.contains(".deb"),
        platform: Platform::Linux,
        package_type: |_| PackageType::DebianPackage,
    },
    PlatformRule {
        matches: |n| n.contains(".rpm"),
        platform: Platform::Linux,
        package_type: |_| PackageType::RpmPackage,
    },
];

/// Evaluated in order; names matching none of these are x64.
const ARCH_RULES: &[ArchRule] = &[
    ArchRule {
        matches: |n| has_token(n, "universal"),
        arch: Arch::Universal,
    },
    ArchRule {
        matches: |n| n.contains("aarch64") || n.contains("arm64"),
        arch: Arch::Arm64,
    },
    ArchRule {
        matches: |n| n.contains("x86_64") || n.contains("_x64"),
        arch: Arch::X64,
    },
    ArchRule {
        matches: |n| n.contains("i686") || n.contains("_x86"),
        arch: Arch::X86,
    },
];

fn letter_runs(name: &str) -> impl Iterator<Item = &str> {
    name.split(|c: char| !c.is_ascii_alphabetic())
}

/// True when `token` appears as a whole run of ASCII letters in `name`.
fn has_token(name: &str, token: &str) -> bool {
    letter_runs(name).any(|t| t == token)
}

/// True when some run of ASCII letters in `name` starts with `prefix`.
///
/// "winportable" matches "win" but "darwin" does not.
fn has_token_prefix(name: &str, prefix: &str) -> bool {
    letter_runs(name).any(|t| t.starts_with(prefix))
}

fn detect_arch(lower_name: &str) -> Arch {
    ARCH_RULES
        .iter()
        .find(|rule| (rule.matches)(lower_name))
        .map(|rule| rule.arch)
        .unwrap_or(Arch::X64)
}

fn is_default_pick(platform: Platform, package_type: PackageType, arch: Arch) -> bool {
    match platform {
        Platform::Windows => package_type == PackageType::Installer && arch == Arch::X64,
        Platform::Macos => package_type == PackageType::DiskImage,
        Platform::Linux => package_type == PackageType::AppImage,
    }
}

/// Classify one release asset, or `None` when its filename carries no known
/// package marker.
pub fn classify(
    asset: &ReleaseAsset,
    version: &str,
    mirrors: &MirrorConfig,
) -> Option<ClassifiedDownload> {
    let lower_name = asset.name.to_lowercase();

    let Some(rule) = PLATFORM_RULES.iter().find(|r| (r.matches)(&lower_name)) else {
        debug!("Skipping unrecognized asset {}", asset.name);
        return None;
    };

    let platform = rule.platform;
    let package_type = (rule.package_type)(&lower_name);
    let arch = detect_arch(&lower_name);

    Some(ClassifiedDownload {
        package_type,
        platform,
        arch,
        display_name: asset.name.clone(),
        human_size: format_size(asset.size),
        download_url: asset.download_url.clone(),
        mirror_url: mirrors.mirror_url(&asset.name, version),
        is_recommended: is_default_pick(platform, package_type, arch),
    })
}

/// Classify every asset, dropping unrecognized ones, and order the result
/// platform-major with recommended entries first inside each platform.
pub fn classify_all(
    assets: &[ReleaseAsset],
    version: &str,
    mirrors: &MirrorConfig,
) -> Vec<ClassifiedDownload> {
    let mut downloads: Vec<_> = assets
        .iter()
        .filter_map(|asset| classify(asset, version, mirrors))
        .collect();

    downloads.sort_by_key(|d| (d.platform, !d.is_recommended));
    downloads
}

/// Group downloads by platform, keeping list order inside each group.
pub fn group_by_platform(
    downloads: &[ClassifiedDownload],
) -> BTreeMap<Platform, Vec<&ClassifiedDownload>> {
    let mut groups: BTreeMap<Platform, Vec<&ClassifiedDownload>> = BTreeMap::new();
    for download in downloads {
        groups.entry(download.platform).or_default().push(download);
    }
    groups
}
