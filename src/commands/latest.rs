use anyhow::Result;
use log::debug;

use crate::{asset::group_by_platform, provider::Provider, release::ReleaseSummary};

use super::config::Config;
use super::print_json;

/// Show the latest release and its downloads, grouped by platform.
#[tracing::instrument(skip(config))]
pub async fn latest<P: Provider>(config: &Config<P>, refresh: bool) -> Result<()> {
    let summary = if refresh {
        debug!("Bypassing release cache");
        config.service.refresh().await
    } else {
        config.service.fetch_latest_release().await
    };

    if config.settings.json {
        return print_json(&*summary);
    }
    print!("{}", render_summary(&summary));
    Ok(())
}

pub(crate) fn render_summary(summary: &ReleaseSummary) -> String {
    let mut lines = Vec::new();

    if summary.is_fallback {
        lines.push(summary.release_notes.clone());
        lines.push(format!(
            "Last known version: {} ({})",
            summary.version, summary.release_date
        ));
        lines.push(format!(
            "Downloads unavailable. Visit {} for the latest release.",
            summary.html_url
        ));
        return lines.join("\n") + "\n";
    }

    lines.push(format!("InfloWave {}", summary.version));
    if !summary.release_date.is_empty() {
        lines.push(format!("Released: {}", summary.release_date));
    }
    lines.push(summary.html_url.clone());

    if summary.downloads_unavailable() {
        lines.push(String::new());
        lines.push("No downloads found for this release.".to_string());
    }

    for (platform, downloads) in group_by_platform(&summary.downloads) {
        lines.push(String::new());
        lines.push(platform.display_name().to_string());
        for d in downloads {
            let marker = if d.is_recommended { "*" } else { " " };
            lines.push(format!(
                "  {} {} ({} {}, {})",
                marker,
                d.display_name,
                d.arch.display_name(),
                d.package_type,
                d.human_size
            ));
            lines.push(format!("      {}", d.download_url));
            if let Some(mirror) = &d.mirror_url {
                lines.push(format!("      mirror: {}", mirror));
            }
        }
    }

    let notes = summary.release_notes.trim();
    if !notes.is_empty() {
        lines.push(String::new());
        lines.push(notes.to_string());
    }

    lines.join("\n") + "\n"
}
