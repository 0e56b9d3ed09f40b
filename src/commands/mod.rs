use anyhow::Result;
use serde::Serialize;

pub mod config;
mod device;
mod lang;
mod latest;
mod paths;
mod releases;
mod stats;

pub use device::{DeviceHints, detect, recommend_download};
pub use lang::lang;
pub use latest::latest;
pub use paths::config_dir;
pub use releases::{DEFAULT_RELEASE_LIMIT, ReleaseQuery, releases};
pub use stats::stats;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
