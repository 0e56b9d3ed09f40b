//! Persisted user preferences.

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::runtime::Runtime;

pub const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Language::En => "en",
            Language::Zh => "zh",
        })
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "zh" => Ok(Language::Zh),
            other => anyhow::bail!("Unsupported language '{}'. Expected 'en' or 'zh'.", other),
        }
    }
}

/// On-disk form. Unknown values are tolerated and fall back to the default.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PreferencesFile {
    #[serde(
        rename = "inflowave-website-language",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    language: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    pub language: Language,
}

impl Preferences {
    pub fn path(dir: &Path) -> PathBuf {
        dir.join(PREFERENCES_FILE)
    }

    /// Load preferences from `dir`. A missing or unreadable file yields the
    /// defaults.
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, dir: &Path) -> Self {
        let path = Self::path(dir);
        if !runtime.exists(&path) {
            debug!("No preferences at {:?}, using defaults", path);
            return Self::default();
        }

        let parsed = runtime.read_to_string(&path).and_then(|content| {
            serde_json::from_str::<PreferencesFile>(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))
        });

        match parsed {
            Ok(file) => Self {
                language: file
                    .language
                    .as_deref()
                    .and_then(|l| l.parse().ok())
                    .unwrap_or_default(),
            },
            Err(e) => {
                warn!("Ignoring preferences: {:#}", e);
                Self::default()
            }
        }
    }

    #[tracing::instrument(skip(runtime))]
    pub fn save<R: Runtime>(&self, runtime: &R, dir: &Path) -> Result<()> {
        runtime.create_dir_all(dir)?;
        let file = PreferencesFile {
            language: Some(self.language.to_string()),
        };
        let json = serde_json::to_string_pretty(&file)?;
        runtime.write(&Self::path(dir), json.as_bytes())?;
        debug!("Saved preferences to {:?}", dir);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MockRuntime, RealRuntime};
    use mockall::predicate::eq;
    use tempfile::tempdir;

    fn runtime_with_file(content: &str) -> MockRuntime {
        let mut runtime = MockRuntime::new();
        let content = content.to_string();
        runtime
            .expect_exists()
            .with(eq(PathBuf::from("/config/preferences.json")))
            .returning(|_| true);
        runtime
            .expect_read_to_string()
            .returning(move |_| Ok(content.clone()));
        runtime
    }

    #[test]
    fn test_language_parse() {
        assert_eq!("zh".parse::<Language>().unwrap(), Language::Zh);
        assert_eq!(" EN ".parse::<Language>().unwrap(), Language::En);
        assert!("fr".parse::<Language>().is_err());
        assert_eq!(Language::Zh.to_string(), "zh");
    }

    #[test]
    fn test_load_saved_language() {
        let runtime = runtime_with_file(r#"{"inflowave-website-language": "zh"}"#);
        let prefs = Preferences::load(&runtime, Path::new("/config"));
        assert_eq!(prefs.language, Language::Zh);
    }

    #[test]
    fn test_load_missing_file_defaults_to_english() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);
        runtime.expect_read_to_string().never();

        let prefs = Preferences::load(&runtime, Path::new("/config"));
        assert_eq!(prefs.language, Language::En);
    }

    #[test]
    fn test_load_invalid_contents_defaults_to_english() {
        for content in ["not json", r#"{"inflowave-website-language": "fr"}"#, "{}"] {
            let runtime = runtime_with_file(content);
            let prefs = Preferences::load(&runtime, Path::new("/config"));
            assert_eq!(prefs.language, Language::En, "content: {}", content);
        }
    }

    #[test]
    fn test_save_creates_directory() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_create_dir_all()
            .with(eq(PathBuf::from("/config")))
            .times(1)
            .returning(|_| Ok(()));
        runtime
            .expect_write()
            .withf(|path, contents| {
                path == Path::new("/config/preferences.json")
                    && String::from_utf8_lossy(contents).contains(r#""inflowave-website-language": "zh""#)
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let prefs = Preferences {
            language: Language::Zh,
        };
        prefs.save(&runtime, Path::new("/config")).unwrap();
    }

    #[test]
    fn test_save_then_load_on_disk() {
        let dir = tempdir().unwrap();
        let config_dir = dir.path().join("inflowave-dl");
        let runtime = RealRuntime;

        Preferences {
            language: Language::Zh,
        }
        .save(&runtime, &config_dir)
        .unwrap();

        assert_eq!(Preferences::load(&runtime, &config_dir).language, Language::Zh);
    }
}
