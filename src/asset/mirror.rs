/// Base URL of the CDN that mirrors selected release assets.
pub const DEFAULT_CDN_BASE: &str = "https://inflowave.download.kkape.com/releases";

/// Filename fragments that are known to be mirrored on the CDN.
pub const DEFAULT_MIRROR_PATTERNS: &[&str] = &["aarch64.dmg", "x64_zh-cn.msi"];

/// Allow-list of assets that get a CDN mirror URL.
///
/// Only assets whose lower-cased name contains one of `patterns` are
/// mirrored; everything else is served from the release host alone.
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorConfig {
    pub base: String,
    pub patterns: Vec<String>,
}

impl MirrorConfig {
    pub fn new(base: impl Into<String>, patterns: Vec<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            patterns: patterns.into_iter().map(|p| p.to_lowercase()).collect(),
        }
    }

    /// Mirror URL for `filename` in release `version`, if allow-listed.
    pub fn mirror_url(&self, filename: &str, version: &str) -> Option<String> {
        let lower = filename.to_lowercase();
        self.patterns
            .iter()
            .any(|p| lower.contains(p.as_str()))
            .then(|| format!("{}/v{}/{}", self.base, version, filename))
    }
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_CDN_BASE,
            DEFAULT_MIRROR_PATTERNS.iter().map(|p| p.to_string()).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mirrors_allow_listed_names() {
        let mirrors = MirrorConfig::default();
        assert_eq!(
            mirrors.mirror_url("InfloWave_0.2.0_aarch64.dmg", "0.2.0"),
            Some(
                "https://inflowave.download.kkape.com/releases/v0.2.0/InfloWave_0.2.0_aarch64.dmg"
                    .to_string()
            )
        );
        assert!(
            mirrors
                .mirror_url("InfloWave_0.2.0_x64_zh-CN.msi", "0.2.0")
                .is_some()
        );
    }

    #[test]
    fn test_default_skips_other_names() {
        let mirrors = MirrorConfig::default();
        assert_eq!(mirrors.mirror_url("InfloWave_0.2.0_x64.dmg", "0.2.0"), None);
        assert_eq!(
            mirrors.mirror_url("InfloWave_0.2.0_amd64.AppImage", "0.2.0"),
            None
        );
    }

    #[test]
    fn test_custom_base_trailing_slash() {
        let mirrors = MirrorConfig::new("https://cdn.example.com/", vec![".deb".into()]);
        assert_eq!(
            mirrors.mirror_url("app_1.0_amd64.deb", "1.0"),
            Some("https://cdn.example.com/v1.0/app_1.0_amd64.deb".to_string())
        );
    }
}
