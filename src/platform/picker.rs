use std::cmp::Reverse;

use crate::asset::{Arch, ClassifiedDownload, PackageType, Platform};

use super::DeviceProfile;

/// Trait for selecting a download from a list of classified downloads
pub trait DownloadPicker: Send + Sync {
    /// Pick the most appropriate download from the given list
    ///
    /// Returns `None` if no suitable download is found
    fn pick<'a>(&self, downloads: &'a [ClassifiedDownload]) -> Option<&'a ClassifiedDownload>;
}

/// Picks the best download for a detected (or user-chosen) device.
pub struct DefaultDownloadPicker {
    device: DeviceProfile,
}

impl DefaultDownloadPicker {
    pub fn new(device: DeviceProfile) -> Self {
        Self { device }
    }

    fn type_preference(&self, package_type: PackageType) -> u8 {
        match (self.device.os, package_type) {
            (Some(Platform::Windows), PackageType::Installer) => 1,
            (Some(Platform::Linux), PackageType::AppImage) => 1,
            _ => 0,
        }
    }
}

/// Whether `download` can run on `device`. Unknown OS or arch is never
/// compatible.
pub fn is_compatible(device: &DeviceProfile, download: &ClassifiedDownload) -> bool {
    let (Some(os), Some(arch)) = (device.os, device.arch) else {
        return false;
    };
    if download.platform != os {
        return false;
    }

    download.arch == arch
        || (arch == Arch::X64 && download.arch == Arch::X86)
        || (os == Platform::Macos && download.arch == Arch::Universal)
}

impl DownloadPicker for DefaultDownloadPicker {
    fn pick<'a>(&self, downloads: &'a [ClassifiedDownload]) -> Option<&'a ClassifiedDownload> {
        let mut candidates: Vec<&ClassifiedDownload> = downloads
            .iter()
            .filter(|d| is_compatible(&self.device, d))
            .collect();

        // Stable, so ties keep input order
        candidates.sort_by_key(|d| {
            Reverse((
                Some(d.arch) == self.device.arch,
                d.is_recommended,
                self.type_preference(d.package_type),
            ))
        });

        candidates.into_iter().next()
    }
}

/// Recommend a single download for `device`.
pub fn recommend<'a>(
    device: &DeviceProfile,
    downloads: &'a [ClassifiedDownload],
) -> Option<&'a ClassifiedDownload> {
    DefaultDownloadPicker::new(device.clone()).pick(downloads)
}
