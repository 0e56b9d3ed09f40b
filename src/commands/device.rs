use anyhow::Result;
use serde::Serialize;

use crate::{
    asset::{Arch, ClassifiedDownload, Platform},
    platform::{DeviceProfile, Environment, Screen, detect_device, recommend},
    provider::Provider,
    release::ReleaseSummary,
};

use super::config::Config;
use super::print_json;

/// Environment signals supplied on the command line. Anything left out is
/// taken from the machine running the command.
#[derive(Debug, Clone, Default)]
pub struct DeviceHints {
    pub user_agent: Option<String>,
    pub platform: Option<String>,
    pub renderer: Option<String>,
    pub screen: Option<Screen>,
}

impl DeviceHints {
    pub fn environment(&self) -> Environment {
        let mut env = match &self.user_agent {
            Some(ua) => Environment::from_user_agent(ua.clone()),
            None => Environment::host(),
        };
        if self.platform.is_some() {
            env.platform = self.platform.clone();
        }
        if self.renderer.is_some() {
            env.renderer = self.renderer.clone();
        }
        if self.screen.is_some() {
            env.screen = self.screen;
        }
        env
    }
}

/// Print the detected OS and architecture.
#[tracing::instrument]
pub fn detect(hints: &DeviceHints, json: bool) -> Result<()> {
    let device = detect_device(&hints.environment());
    if json {
        return print_json(&device);
    }
    println!("Detected: {}", device.description());
    println!("Signature: {}", device.signature);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Recommendation<'a> {
    device: &'a DeviceProfile,
    version: &'a str,
    recommended: Option<&'a ClassifiedDownload>,
    downloads_unavailable: bool,
}

/// Detect the device (or take the overrides) and print the best download
/// from the latest release.
#[tracing::instrument(skip(config))]
pub async fn recommend_download<P: Provider>(
    config: &Config<P>,
    hints: &DeviceHints,
    os: Option<Platform>,
    arch: Option<Arch>,
) -> Result<()> {
    let device = detect_device(&hints.environment()).with_override(os, arch);
    let summary = config.service.fetch_latest_release().await;
    let picked = recommend(&device, &summary.downloads);

    if config.settings.json {
        return print_json(&Recommendation {
            device: &device,
            version: &summary.version,
            recommended: picked,
            downloads_unavailable: summary.downloads_unavailable(),
        });
    }
    print!("{}", render_recommendation(&device, &summary, picked));
    Ok(())
}

pub(crate) fn render_recommendation(
    device: &DeviceProfile,
    summary: &ReleaseSummary,
    picked: Option<&ClassifiedDownload>,
) -> String {
    let mut lines = vec![format!("Device: {}", device.description())];

    if summary.downloads_unavailable() {
        lines.push(format!(
            "Downloads unavailable. Visit {} for the latest release.",
            summary.html_url
        ));
        return lines.join("\n") + "\n";
    }

    match picked {
        Some(d) => {
            lines.push(format!("Recommended for InfloWave {}:", summary.version));
            lines.push(format!("  {} ({})", d.display_name, d.human_size));
            lines.push(format!("  {}", d.download_url));
            if let Some(mirror) = &d.mirror_url {
                lines.push(format!("  mirror: {}", mirror));
            }
        }
        None => {
            lines.push(format!(
                "No compatible download for {} in InfloWave {}.",
                device.description(),
                summary.version
            ));
            lines.push("Use --os and --arch to choose a download manually.".to_string());
        }
    }

    lines.join("\n") + "\n"
}
