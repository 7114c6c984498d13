//! Walk every release and keep the package assets.

use anyhow::Result;

use crate::asset_name::{parse_asset_name, NamePolicy};
use crate::catalog::DEFAULT_VERSION_DATE;
use crate::github::ReleaseSource;

/// A package asset with the name and version derived from its filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestedAsset {
    pub app_name: String,
    pub version: String,
    /// `YYYY-MM-DD` of the release the asset belongs to.
    pub date: String,
    pub size: u64,
    pub download_url: String,
}

/// Collect package assets of every release, in release order then asset order.
pub fn harvest<S: ReleaseSource + ?Sized>(
    source: &S,
    extension: &str,
    policy: NamePolicy,
) -> Result<Vec<HarvestedAsset>> {
    let mut out = Vec::new();
    let releases = source.list_releases()?;
    tracing::info!("found {} releases", releases.len());

    for release in &releases {
        tracing::info!("release: {}", release.title());
        let date = release.date().unwrap_or(DEFAULT_VERSION_DATE);

        for asset in source.list_assets(release)? {
            let Some(parsed) = parse_asset_name(&asset.name, extension, policy) else {
                tracing::debug!("skip non-package asset {}", asset.name);
                continue;
            };
            out.push(HarvestedAsset {
                app_name: parsed.name,
                version: parsed.version,
                date: date.to_string(),
                size: asset.size,
                download_url: asset.browser_download_url,
            });
        }
    }
    Ok(out)
}
