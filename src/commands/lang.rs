use anyhow::Result;
use log::info;
use std::path::PathBuf;

use crate::{
    preferences::{Language, Preferences},
    runtime::Runtime,
};

use super::paths::config_dir;

/// Show the saved language, or save a new one.
#[tracing::instrument(skip(runtime))]
pub fn lang<R: Runtime>(
    runtime: &R,
    config_dir_override: Option<PathBuf>,
    language: Option<Language>,
    json: bool,
) -> Result<()> {
    let dir = config_dir(runtime, config_dir_override)?;
    let mut prefs = Preferences::load(runtime, &dir);

    if let Some(language) = language {
        prefs.language = language;
        prefs.save(runtime, &dir)?;
        info!("Language set to {}", language);
    }

    if json {
        println!("{}", serde_json::json!({ "language": prefs.language }));
    } else {
        println!("{}", prefs.language);
    }
    Ok(())
}
