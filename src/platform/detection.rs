use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;
use std::str::FromStr;

use crate::asset::{Arch, Platform};

/// Physical resolutions of Apple silicon displays (either orientation).
const APPLE_SILICON_RESOLUTIONS: &[(u32, u32)] = &[
    (2560, 1600), // 13" MacBook Air/Pro
    (3024, 1964), // 14" MacBook Pro
    (3456, 2234), // 16" MacBook Pro
    (4480, 2520), // 24" iMac
    (5120, 2880), // 27" Studio Display
    (6016, 3384), // 32" Pro Display XDR
];

/// Renderer tokens of Apple silicon GPUs.
const APPLE_SILICON_CHIPS: &[&str] = &["m1", "m2", "m3", "m4"];

/// Logical screen size and device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Screen {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f64,
}

impl Screen {
    fn physical_size(&self) -> Result<(u32, u32)> {
        if !self.pixel_ratio.is_finite() || self.pixel_ratio <= 0.0 {
            anyhow::bail!("invalid pixel ratio {}", self.pixel_ratio);
        }
        let scale = |v: u32| (v as f64 * self.pixel_ratio).round() as u32;
        Ok((scale(self.width), scale(self.height)))
    }
}

impl FromStr for Screen {
    type Err = anyhow::Error;

    /// Parses `WIDTHxHEIGHT` or `WIDTHxHEIGHT@RATIO`, e.g. `1512x982@2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (size, ratio) = match s.split_once('@') {
            Some((size, ratio)) => (size, Some(ratio)),
            None => (s, None),
        };
        let (width, height) = size
            .split_once(['x', 'X'])
            .context("Invalid screen format. Expected 'WIDTHxHEIGHT[@RATIO]'.")?;

        Ok(Screen {
            width: width.trim().parse().context("Invalid screen width")?,
            height: height.trim().parse().context("Invalid screen height")?,
            pixel_ratio: match ratio {
                Some(r) => r.trim().parse().context("Invalid pixel ratio")?,
                None => 1.0,
            },
        })
    }
}

/// The signals a visitor's browser exposes about its device.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    pub user_agent: String,
    /// `navigator.platform`-style hint, e.g. "MacIntel"
    pub platform: Option<String>,
    /// Unmasked graphics renderer string
    pub renderer: Option<String>,
    pub screen: Option<Screen>,
}

impl Environment {
    pub fn from_user_agent(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            ..Default::default()
        }
    }

    /// Signature of the machine this program runs on.
    pub fn host() -> Self {
        Self::for_target(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Browser-like signature for a Rust target OS/arch pair.
    pub fn for_target(os: &str, arch: &str) -> Self {
        let user_agent = match (os, arch) {
            ("windows", "x86_64") => "Mozilla/5.0 (Windows NT 10.0; Win64; x64)",
            ("windows", "aarch64") => "Mozilla/5.0 (Windows NT 10.0; ARM64)",
            ("windows", _) => "Mozilla/5.0 (Windows NT 10.0; i686)",
            ("macos", _) => "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)",
            ("linux", "x86_64") => "Mozilla/5.0 (X11; Linux x86_64)",
            ("linux", "aarch64") => "Mozilla/5.0 (X11; Linux aarch64)",
            ("linux", "x86") => "Mozilla/5.0 (X11; Linux i686)",
            (os, arch) => return Self::from_user_agent(format!("Mozilla/5.0 ({}; {})", os, arch)),
        };

        // Browsers on Apple silicon still report an Intel user agent, so the
        // real architecture goes into the platform hint.
        let platform = match (os, arch) {
            ("macos", "aarch64") => Some("arm64".to_string()),
            ("macos", _) => Some("MacIntel".to_string()),
            _ => None,
        };

        Self {
            user_agent: user_agent.to_string(),
            platform,
            ..Default::default()
        }
    }
}

/// Best-effort guess of the visitor's device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceProfile {
    /// `None` when the OS is not recognized
    pub os: Option<Platform>,
    /// `None` when the architecture could not be inferred
    pub arch: Option<Arch>,
    /// Raw user agent, for diagnostics
    pub signature: String,
}

impl DeviceProfile {
    pub fn new(os: Option<Platform>, arch: Option<Arch>) -> Self {
        Self {
            os,
            arch,
            signature: String::new(),
        }
    }

    /// Replace detected values with user-chosen ones, where given.
    pub fn with_override(mut self, os: Option<Platform>, arch: Option<Arch>) -> Self {
        if os.is_some() {
            self.os = os;
        }
        if arch.is_some() {
            self.arch = arch;
        }
        self
    }

    /// E.g. "macOS ARM64" or "Windows 64-bit".
    pub fn description(&self) -> String {
        let os = self.os.map(|o| o.display_name()).unwrap_or("Unknown OS");
        let arch = self
            .arch
            .map(|a| a.display_name())
            .unwrap_or("Unknown Architecture");
        format!("{} {}", os, arch)
    }
}

struct Signals<'a> {
    /// Lower-cased user agent
    ua: String,
    os: Option<Platform>,
    env: &'a Environment,
}

type ArchCheck = fn(&Signals) -> Result<Option<Arch>>;

/// Evaluated top to bottom; the first check that returns an arch wins.
/// A check error only skips that check.
const ARCH_CHECKS: &[(&str, ArchCheck)] = &[
    ("explicit 64-bit marker", explicit_x64),
    ("explicit ARM marker", explicit_arm),
    ("explicit 32-bit marker", explicit_x86),
    ("windows default", windows_default),
    ("mac platform hint", mac_platform_hint),
    ("mac renderer", mac_renderer),
    ("mac screen", mac_screen),
    ("mac default", mac_default),
    ("linux default", linux_default),
];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn explicit_x64(s: &Signals) -> Result<Option<Arch>> {
    Ok(contains_any(&s.ua, &["wow64", "win64", "x86_64", "amd64"]).then_some(Arch::X64))
}

fn explicit_arm(s: &Signals) -> Result<Option<Arch>> {
    Ok(contains_any(&s.ua, &["arm64", "aarch64"]).then_some(Arch::Arm64))
}

fn explicit_x86(s: &Signals) -> Result<Option<Arch>> {
    Ok(contains_any(&s.ua, &["x86", "i386", "i686"]).then_some(Arch::X86))
}

fn windows_default(s: &Signals) -> Result<Option<Arch>> {
    Ok((s.os == Some(Platform::Windows)).then_some(Arch::X64))
}

fn mac_platform_hint(s: &Signals) -> Result<Option<Arch>> {
    if s.os != Some(Platform::Macos) {
        return Ok(None);
    }
    let Some(hint) = s.env.platform.as_deref().map(str::to_lowercase) else {
        return Ok(None);
    };

    if contains_any(&hint, &["arm", "aarch64"]) {
        Ok(Some(Arch::Arm64))
    } else if contains_any(&hint, &["intel", "x86"]) {
        Ok(Some(Arch::X64))
    } else {
        Ok(None)
    }
}

fn mac_renderer(s: &Signals) -> Result<Option<Arch>> {
    if s.os != Some(Platform::Macos) {
        return Ok(None);
    }
    let Some(renderer) = s.env.renderer.as_deref().map(str::to_lowercase) else {
        return Ok(None);
    };

    if renderer.contains("apple") && contains_any(&renderer, APPLE_SILICON_CHIPS) {
        Ok(Some(Arch::Arm64))
    } else if contains_any(&renderer, &["intel", "amd"]) {
        Ok(Some(Arch::X64))
    } else {
        Ok(None)
    }
}

fn mac_screen(s: &Signals) -> Result<Option<Arch>> {
    if s.os != Some(Platform::Macos) {
        return Ok(None);
    }
    let Some(screen) = s.env.screen else {
        return Ok(None);
    };

    let (w, h) = screen.physical_size()?;
    let known = APPLE_SILICON_RESOLUTIONS
        .iter()
        .any(|&(rw, rh)| (w, h) == (rw, rh) || (w, h) == (rh, rw));

    if known && screen.pixel_ratio >= 2.0 {
        Ok(Some(Arch::Arm64))
    } else {
        Ok(Some(Arch::X64))
    }
}

fn mac_default(s: &Signals) -> Result<Option<Arch>> {
    Ok((s.os == Some(Platform::Macos)).then_some(Arch::Arm64))
}

fn linux_default(s: &Signals) -> Result<Option<Arch>> {
    Ok((s.os == Some(Platform::Linux)).then_some(Arch::X64))
}

fn detect_os(ua: &str) -> Option<Platform> {
    if ua.contains("windows nt") {
        Some(Platform::Windows)
    } else if ua.contains("mac os x") || ua.contains("macintosh") {
        Some(Platform::Macos)
    } else if ua.contains("linux") && !ua.contains("android") {
        Some(Platform::Linux)
    } else {
        None
    }
}

fn detect_arch(signals: &Signals) -> Option<Arch> {
    for (name, check) in ARCH_CHECKS {
        match check(signals) {
            Ok(Some(arch)) => {
                debug!("Architecture {} from {}", arch, name);
                return Some(arch);
            }
            Ok(None) => {}
            Err(e) => debug!("Arch check {} failed: {:#}", name, e),
        }
    }
    None
}

/// Detect OS and architecture from an environment signature. Never fails;
/// unrecognized signals leave the fields as `None`.
#[tracing::instrument(skip(env))]
pub fn detect_device(env: &Environment) -> DeviceProfile {
    let ua = env.user_agent.to_lowercase();
    let os = detect_os(&ua);
    let signals = Signals { ua, os, env };

    DeviceProfile {
        os,
        arch: detect_arch(&signals),
        signature: env.user_agent.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOWS_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";
    const WINDOWS_NO_ARCH_UA: &str = "Mozilla/5.0 (Windows NT 10.0) AppleWebKit/537.36";
    const WINDOWS_32_UA: &str = "Mozilla/5.0 (Windows NT 6.1; i686; rv:40.0) Gecko/20100101 Firefox/40.0";
    const MAC_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.1 Safari/605.1.15";
    const LINUX_UA: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:133.0) Gecko/20100101 Firefox/133.0";
    const LINUX_ARM_UA: &str = "Mozilla/5.0 (X11; Linux aarch64) AppleWebKit/537.36";
    const LINUX_BARE_UA: &str = "Mozilla/5.0 (X11; Linux) Gecko/20100101";
    const ANDROID_UA: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36";

    fn mac(platform: Option<&str>, renderer: Option<&str>, screen: Option<Screen>) -> Environment {
        Environment {
            user_agent: MAC_UA.to_string(),
            platform: platform.map(String::from),
            renderer: renderer.map(String::from),
            screen,
        }
    }

    fn screen(width: u32, height: u32, pixel_ratio: f64) -> Option<Screen> {
        Some(Screen {
            width,
            height,
            pixel_ratio,
        })
    }

    #[test]
    fn test_detect_windows() {
        let device = detect_device(&Environment::from_user_agent(WINDOWS_UA));
        assert_eq!(device.os, Some(Platform::Windows));
        assert_eq!(device.arch, Some(Arch::X64));
        assert_eq!(device.signature, WINDOWS_UA);
    }

    #[test]
    fn test_windows_without_marker_defaults_to_x64() {
        let device = detect_device(&Environment::from_user_agent(WINDOWS_NO_ARCH_UA));
        assert_eq!(device.arch, Some(Arch::X64));
    }

    #[test]
    fn test_windows_32_bit_marker() {
        let device = detect_device(&Environment::from_user_agent(WINDOWS_32_UA));
        assert_eq!(device.os, Some(Platform::Windows));
        assert_eq!(device.arch, Some(Arch::X86));
    }

    #[test]
    fn test_detect_linux() {
        let device = detect_device(&Environment::from_user_agent(LINUX_UA));
        assert_eq!(device.os, Some(Platform::Linux));
        assert_eq!(device.arch, Some(Arch::X64));

        let device = detect_device(&Environment::from_user_agent(LINUX_ARM_UA));
        assert_eq!(device.arch, Some(Arch::Arm64));

        let device = detect_device(&Environment::from_user_agent(LINUX_BARE_UA));
        assert_eq!(device.arch, Some(Arch::X64));
    }

    #[test]
    fn test_android_is_unknown() {
        let device = detect_device(&Environment::from_user_agent(ANDROID_UA));
        assert_eq!(device.os, None);
        assert_eq!(device.arch, None);
        assert_eq!(device.description(), "Unknown OS Unknown Architecture");
    }

    #[test]
    fn test_mac_platform_hint() {
        let device = detect_device(&mac(Some("arm64"), Some("Intel Iris"), None));
        assert_eq!(device.os, Some(Platform::Macos));
        assert_eq!(device.arch, Some(Arch::Arm64));

        let device = detect_device(&mac(Some("MacIntel"), None, None));
        assert_eq!(device.arch, Some(Arch::X64));
    }

    #[test]
    fn test_mac_renderer_chip() {
        let device = detect_device(&mac(Some("Mac"), Some("Apple M2 Pro"), None));
        assert_eq!(device.arch, Some(Arch::Arm64));

        let device = detect_device(&mac(None, Some("AMD Radeon Pro 5500M"), None));
        assert_eq!(device.arch, Some(Arch::X64));
    }

    #[test]
    fn test_mac_screen_heuristic() {
        // 14" MacBook Pro: 1512x982 logical at 2x
        let device = detect_device(&mac(None, None, screen(1512, 982, 2.0)));
        assert_eq!(device.arch, Some(Arch::Arm64));

        // Portrait orientation
        let device = detect_device(&mac(None, None, screen(982, 1512, 2.0)));
        assert_eq!(device.arch, Some(Arch::Arm64));

        // Known size but at 1x density
        let device = detect_device(&mac(None, None, screen(2560, 1600, 1.0)));
        assert_eq!(device.arch, Some(Arch::X64));

        let device = detect_device(&mac(None, None, screen(1440, 900, 2.0)));
        assert_eq!(device.arch, Some(Arch::X64));
    }

    #[test]
    fn test_mac_renderer_wins_over_screen() {
        // The screen alone would say arm64
        let env = mac(None, Some("Intel Iris Plus Graphics"), screen(1512, 982, 2.0));
        let device = detect_device(&env);
        assert_eq!(device.arch, Some(Arch::X64));
    }

    #[test]
    fn test_mac_renderer_without_chip_falls_back_to_screen() {
        let device = detect_device(&mac(None, Some("Apple GPU"), screen(1512, 982, 2.0)));
        assert_eq!(device.arch, Some(Arch::Arm64));

        let device = detect_device(&mac(None, Some("Apple GPU"), screen(1440, 900, 2.0)));
        assert_eq!(device.arch, Some(Arch::X64));
    }

    #[test]
    fn test_mac_screen_error_falls_through_to_default() {
        let device = detect_device(&mac(None, None, screen(1512, 982, f64::NAN)));
        assert_eq!(device.arch, Some(Arch::Arm64));
    }

    #[test]
    fn test_mac_without_signals_defaults_to_arm64() {
        let device = detect_device(&mac(None, Some("Unknown GPU"), None));
        assert_eq!(device.arch, Some(Arch::Arm64));
        assert_eq!(device.description(), "macOS ARM64");
    }

    #[test]
    fn test_signals_ignored_outside_mac() {
        let env = Environment {
            user_agent: "Mozilla/5.0 (X11; FreeBSD)".to_string(),
            platform: Some("arm".to_string()),
            renderer: Some("Apple M1".to_string()),
            screen: screen(1512, 982, 2.0),
        };
        let device = detect_device(&env);
        assert_eq!(device.os, None);
        assert_eq!(device.arch, None);
    }

    #[test]
    fn test_host_targets() {
        let cases = [
            ("windows", "x86_64", Platform::Windows, Arch::X64),
            ("windows", "aarch64", Platform::Windows, Arch::Arm64),
            ("windows", "x86", Platform::Windows, Arch::X86),
            ("macos", "aarch64", Platform::Macos, Arch::Arm64),
            ("macos", "x86_64", Platform::Macos, Arch::X64),
            ("linux", "x86_64", Platform::Linux, Arch::X64),
            ("linux", "aarch64", Platform::Linux, Arch::Arm64),
        ];
        for (os, arch, expected_os, expected_arch) in cases {
            let device = detect_device(&Environment::for_target(os, arch));
            assert_eq!(device.os, Some(expected_os), "{}/{}", os, arch);
            assert_eq!(device.arch, Some(expected_arch), "{}/{}", os, arch);
        }

        let device = detect_device(&Environment::for_target("freebsd", "x86_64"));
        assert_eq!(device.os, None);
    }

    #[test]
    fn test_override() {
        let device = detect_device(&Environment::from_user_agent(ANDROID_UA))
            .with_override(Some(Platform::Linux), None);
        assert_eq!(device.os, Some(Platform::Linux));
        assert_eq!(device.arch, None);

        let device = DeviceProfile::new(Some(Platform::Windows), Some(Arch::X64))
            .with_override(None, Some(Arch::Arm64));
        assert_eq!(device.description(), "Windows ARM64");
    }

    #[test]
    fn test_screen_parse() {
        assert_eq!(
            "1512x982@2".parse::<Screen>().unwrap(),
            Screen {
                width: 1512,
                height: 982,
                pixel_ratio: 2.0
            }
        );
        assert_eq!("1920X1080".parse::<Screen>().unwrap().pixel_ratio, 1.0);
        assert!("1920".parse::<Screen>().is_err());
        assert!("axb".parse::<Screen>().is_err());
        assert!("10x10@fast".parse::<Screen>().is_err());
    }
}
