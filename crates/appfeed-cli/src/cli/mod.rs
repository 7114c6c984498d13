//! CLI for appfeed: regenerate the app catalogs from GitHub releases.

use anyhow::Result;
use appfeed_core::config;
use appfeed_core::github::GithubClient;
use appfeed_core::pipeline;
use appfeed_core::resolver::IpaResolver;
use clap::Parser;

/// Rebuild `apps.json` and `apps_esign.json` from the configured repository's releases.
///
/// Input and output paths, the repository and the icon CDN are read from
/// `~/.config/appfeed/config.toml` (created with defaults on first run).
#[derive(Debug, Parser)]
#[command(name = "appfeed", version)]
#[command(about = "Build IPA app catalogs from GitHub release assets", long_about = None)]
pub struct Cli {
    /// GitHub access token used for the release API.
    #[arg(short, long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        cli.run()
    }

    pub fn run(self) -> Result<()> {
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let client = GithubClient::new(&cfg.source.api_base, &cfg.source.repository, self.token);
        let summary = pipeline::run(&cfg, &client, IpaResolver::new())?;

        println!(
            "{} packages, {} apps written to {} and {} ({} new bundle ids, {} unresolved)",
            summary.assets,
            summary.apps,
            cfg.paths.catalog.display(),
            cfg.paths.flat_catalog.display(),
            summary.stats.resolved,
            summary.stats.resolve_failures,
        );
        Ok(())
    }
}
