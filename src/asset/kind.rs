use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operating system a download targets.
///
/// The declaration order is the display order of the download list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Macos,
    Linux,
}

impl Platform {
    /// Human-readable name, e.g. "macOS".
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Windows => "Windows",
            Platform::Macos => "macOS",
            Platform::Linux => "Linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => write!(f, "windows"),
            Platform::Macos => write!(f, "macos"),
            Platform::Linux => write!(f, "linux"),
        }
    }
}

impl FromStr for Platform {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "windows" | "win" => Ok(Platform::Windows),
            "macos" | "mac" | "darwin" | "osx" => Ok(Platform::Macos),
            "linux" => Ok(Platform::Linux),
            _ => anyhow::bail!(
                "Unknown platform: {}. Expected windows, macos, or linux.",
                s
            ),
        }
    }
}

/// CPU architecture of a download or a device.
///
/// `aarch64` and `arm64` are the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    X64,
    X86,
    Arm64,
    Universal,
}

impl Arch {
    /// Human-readable name, e.g. "64-bit".
    pub fn display_name(&self) -> &'static str {
        match self {
            Arch::X64 => "64-bit",
            Arch::X86 => "32-bit",
            Arch::Arm64 => "ARM64",
            Arch::Universal => "Universal",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arch::X64 => write!(f, "x64"),
            Arch::X86 => write!(f, "x86"),
            Arch::Arm64 => write!(f, "arm64"),
            Arch::Universal => write!(f, "universal"),
        }
    }
}

impl FromStr for Arch {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "x64" | "x86_64" | "amd64" => Ok(Arch::X64),
            "x86" | "i386" | "i686" => Ok(Arch::X86),
            "arm64" | "aarch64" => Ok(Arch::Arm64),
            "universal" => Ok(Arch::Universal),
            _ => anyhow::bail!(
                "Unknown architecture: {}. Expected x64, x86, arm64, or universal.",
                s
            ),
        }
    }
}

/// Packaging format of a download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PackageType {
    Installer,
    Portable,
    AppImage,
    DebianPackage,
    RpmPackage,
    DiskImage,
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageType::Installer => write!(f, "installer"),
            PackageType::Portable => write!(f, "portable"),
            PackageType::AppImage => write!(f, "appimage"),
            PackageType::DebianPackage => write!(f, "deb"),
            PackageType::RpmPackage => write!(f, "rpm"),
            PackageType::DiskImage => write!(f, "dmg"),
        }
    }
}
