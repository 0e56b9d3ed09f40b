use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;

use crate::runtime::Runtime;

const APP_DIR: &str = "inflowave-dl";

/// Directory holding `preferences.json`.
///
/// An explicit directory (from `--config-dir` or `INFLOWAVE_CONFIG_DIR`)
/// wins over the platform config directory.
#[tracing::instrument(skip(runtime))]
pub fn config_dir<R: Runtime>(runtime: &R, explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        debug!("Using config dir {:?}", dir);
        return Ok(dir);
    }

    let base = runtime
        .config_dir()
        .context("Could not find the user config directory; pass --config-dir")?;
    Ok(base.join(APP_DIR))
}
