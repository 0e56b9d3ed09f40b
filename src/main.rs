use anyhow::Result;
use clap::Parser;
use inflowave_dl::asset::{Arch, Platform};
use inflowave_dl::commands::{self, DEFAULT_RELEASE_LIMIT, DeviceHints, ReleaseQuery, config};
use inflowave_dl::platform::Screen;
use inflowave_dl::preferences::Language;
use inflowave_dl::provider::RepoId;
use inflowave_dl::runtime::RealRuntime;
use std::path::PathBuf;
use std::time::Duration;

/// inflowave-dl - InfloWave release and download resolver
///
/// Looks up InfloWave releases, classifies their assets into downloads and
/// recommends the right one for a device.
///
/// If the GITHUB_TOKEN environment variable is set, it will be used for authentication.
/// This is useful for avoiding rate limits.
///
/// Examples:
///   inflowave-dl latest              # Latest release and its downloads
///   inflowave-dl recommend           # Best download for this machine
///   inflowave-dl recommend --os macos --arch arm64
#[derive(Parser, Debug)]
#[command(author, about, version = env!("INFLOWAVE_DL_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Repository publishing the releases
    #[arg(
        long,
        env = "INFLOWAVE_REPO",
        value_name = "OWNER/REPO",
        default_value = config::DEFAULT_REPO,
        global = true
    )]
    pub repo: RepoId,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", env = "INFLOWAVE_API_URL", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Base URL of the download mirror
    #[arg(long = "cdn-base", env = "INFLOWAVE_CDN_BASE", value_name = "URL", global = true)]
    pub cdn_base: Option<String>,

    /// Directory holding preferences.json
    #[arg(
        long = "config-dir",
        env = "INFLOWAVE_CONFIG_DIR",
        value_name = "PATH",
        global = true
    )]
    pub config_dir: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(
        long,
        value_name = "SECONDS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    pub timeout: u64,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Show the latest release and its downloads
    Latest(LatestArgs),

    /// List past releases
    Releases(ReleasesArgs),

    /// Show download totals
    Stats,

    /// Detect OS and architecture
    Detect(DetectArgs),

    /// Recommend a download for a device
    Recommend(RecommendArgs),

    /// Show or set the preferred language
    Lang(LangArgs),
}

#[derive(clap::Args, Debug)]
pub struct LatestArgs {
    /// Ignore the cached release
    #[arg(long)]
    pub refresh: bool,
}

#[derive(clap::Args, Debug)]
pub struct ReleasesArgs {
    /// Maximum number of releases to fetch
    #[arg(long, default_value_t = DEFAULT_RELEASE_LIMIT)]
    pub limit: usize,

    /// Include pre-releases
    #[arg(long)]
    pub prerelease: bool,

    /// Only releases whose name, tag or notes contain TERM
    #[arg(long, value_name = "TERM")]
    pub search: Option<String>,

    /// Group releases by year
    #[arg(long = "by-year")]
    pub by_year: bool,
}

#[derive(clap::Args, Debug)]
pub struct DetectArgs {
    /// Browser user agent (defaults to this machine)
    #[arg(long = "user-agent", value_name = "UA")]
    pub user_agent: Option<String>,

    /// Platform hint, e.g. "MacIntel"
    #[arg(long)]
    pub platform: Option<String>,

    /// Graphics renderer, e.g. "Apple M2"
    #[arg(long)]
    pub renderer: Option<String>,

    /// Logical screen size and pixel ratio
    #[arg(long, value_name = "WxH[@RATIO]")]
    pub screen: Option<Screen>,
}

impl From<DetectArgs> for DeviceHints {
    fn from(args: DetectArgs) -> Self {
        Self {
            user_agent: args.user_agent,
            platform: args.platform,
            renderer: args.renderer,
            screen: args.screen,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct RecommendArgs {
    #[command(flatten)]
    pub detect: DetectArgs,

    /// Use this OS instead of the detected one
    #[arg(long)]
    pub os: Option<Platform>,

    /// Use this architecture instead of the detected one
    #[arg(long, value_parser = parse_device_arch)]
    pub arch: Option<Arch>,
}

/// A device runs one concrete architecture, so `universal` is refused.
fn parse_device_arch(s: &str) -> Result<Arch> {
    match s.parse()? {
        Arch::Universal => {
            anyhow::bail!("universal is not a device architecture; use x64, x86 or arm64")
        }
        arch => Ok(arch),
    }
}

#[derive(clap::Args, Debug)]
pub struct LangArgs {
    /// New language (en or zh); omit to show the current one
    pub language: Option<Language>,
}

impl Cli {
    fn settings(&self) -> config::Settings {
        let defaults = config::Settings::default();
        config::Settings {
            repo: self.repo.clone(),
            api_url: self.api_url.clone().unwrap_or(defaults.api_url),
            cdn_base: self.cdn_base.clone().unwrap_or(defaults.cdn_base),
            timeout: Duration::from_secs(self.timeout),
            config_dir: self.config_dir.clone(),
            json: self.json,
            ..defaults
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let settings = cli.settings();
    let connect = move || config::Config::new(&RealRuntime, settings);

    match cli.command {
        Commands::Latest(args) => commands::latest(&connect()?, args.refresh).await?,
        Commands::Releases(args) => {
            let query = ReleaseQuery {
                limit: args.limit,
                include_prereleases: args.prerelease,
                search: args.search,
                by_year: args.by_year,
            };
            commands::releases(&connect()?, &query).await?
        }
        Commands::Stats => commands::stats(&connect()?).await?,
        Commands::Detect(args) => commands::detect(&args.into(), cli.json)?,
        Commands::Recommend(args) => {
            commands::recommend_download(&connect()?, &args.detect.into(), args.os, args.arch)
                .await?
        }
        Commands::Lang(args) => commands::lang(&RealRuntime, cli.config_dir, args.language, cli.json)?,
    }
    Ok(())
}
