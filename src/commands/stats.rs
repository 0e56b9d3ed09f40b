use anyhow::Result;

use crate::{provider::Provider, release::DownloadStats};

use super::config::Config;
use super::print_json;

/// Print download totals across the recent release history.
#[tracing::instrument(skip(config))]
pub async fn stats<P: Provider>(config: &Config<P>) -> Result<()> {
    let stats = config.service.download_stats().await;
    if config.settings.json {
        return print_json(&stats);
    }
    print!("{}", render_stats(&stats));
    Ok(())
}

fn render_stats(stats: &DownloadStats) -> String {
    format!(
        "Total downloads: {}\nLatest release downloads: {}\n",
        stats.total_downloads, stats.latest_release_downloads
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::config::Settings;
    use crate::provider::MockProvider;
    use crate::release::STATS_HISTORY_LIMIT;

    #[test]
    fn test_render_stats() {
        let stats = DownloadStats {
            total_downloads: 1234,
            latest_release_downloads: 56,
        };
        assert_eq!(
            render_stats(&stats),
            "Total downloads: 1234\nLatest release downloads: 56\n"
        );
    }

    #[tokio::test]
    async fn test_stats_uses_history_limit() {
        let mut provider = MockProvider::new();
        provider
            .expect_get_releases()
            .withf(|_, limit| *limit == STATS_HISTORY_LIMIT)
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("offline")));

        let config = Config::with_provider(provider, Settings::default());
        stats(&config).await.unwrap();
    }
}
