use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::asset_name::NamePolicy;
use crate::descriptions::TableSelector;

/// Where releases come from and which assets count as packages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// `owner/name` of the GitHub repository whose releases are harvested.
    pub repository: String,
    /// Base URL of the GitHub REST API (overridable for GitHub Enterprise or tests).
    pub api_base: String,
    /// Assets whose filename does not end with this suffix are skipped.
    pub package_extension: String,
    /// How an asset filename is split into app name and version.
    pub name_policy: NamePolicy,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            repository: "swaggyP36000/TrollStore-IPAs".to_string(),
            api_base: "https://api.github.com".to_string(),
            package_extension: ".ipa".to_string(),
            name_policy: NamePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    /// CDN URL with a `{bundle_id}` placeholder.
    pub url_template: String,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            url_template:
                "https://cdn.jsdelivr.net/gh/xinkeji/TrollStore-IPAs@main/icons/{bundle_id}.png"
                    .to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptionConfig {
    /// Which readme table holds the app descriptions.
    pub table: TableSelector,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Persist failed resolutions to the identifier cache as
    /// `unknown.bundle.identifier`. Off by default so a failure is retried next run.
    pub cache_failures: bool,
}

/// Input and output files, relative to the working directory unless absolute.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Grouped catalog: read for its top-level shape, then overwritten.
    pub catalog: PathBuf,
    /// Flat catalog (current run only).
    pub flat_catalog: PathBuf,
    /// Identifier cache CSV (`name,bundleId`).
    pub bundle_cache: PathBuf,
    /// Readme holding the description table. Optional.
    pub readme: PathBuf,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from("apps.json"),
            flat_catalog: PathBuf::from("apps_esign.json"),
            bundle_cache: PathBuf::from("bundleId.csv"),
            readme: PathBuf::from("README.md"),
        }
    }
}

/// Global configuration loaded from `~/.config/appfeed/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub source: SourceConfig,
    pub icons: IconConfig,
    pub descriptions: DescriptionConfig,
    pub resolver: ResolverConfig,
    pub paths: PathConfig,
}

impl FeedConfig {
    /// Icon URL for a bundle identifier.
    pub fn icon_url(&self, bundle_id: &str) -> String {
        self.icons.url_template.replace("{bundle_id}", bundle_id)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("appfeed")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FeedConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FeedConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit path. Missing keys take their defaults.
pub fn load_from_path(path: &Path) -> Result<FeedConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: FeedConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
