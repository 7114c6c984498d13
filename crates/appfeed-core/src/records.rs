//! Turn harvested assets into flat catalog records.
//!
//! Bundle identifiers come from the identifier cache when present, otherwise
//! from the resolver (and are then appended to the cache). Descriptions and
//! developer names come from the readme table when it has a row for the app.

use std::collections::HashSet;

use crate::bundle_cache::IdentifierCache;
use crate::catalog::{FlatApp, DEFAULT_BUNDLE_ID};
use crate::descriptions::{normalize_app_name, DescriptionTable};
use crate::harvest::HarvestedAsset;
use crate::resolver::BundleIdResolver;

/// Counters for the run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub cache_hits: usize,
    pub resolved: usize,
    pub resolve_failures: usize,
    pub described: usize,
}

pub struct RecordBuilder<'a, R: BundleIdResolver> {
    resolver: R,
    descriptions: Option<&'a DescriptionTable>,
    icon_template: &'a str,
    cache_failures: bool,
    /// Names whose resolution failed this run; not retried until the next run.
    failed: HashSet<String>,
    stats: BuildStats,
}

impl<'a, R: BundleIdResolver> RecordBuilder<'a, R> {
    /// `icon_template` must contain `{bundle_id}`.
    pub fn new(resolver: R, descriptions: Option<&'a DescriptionTable>, icon_template: &'a str) -> Self {
        Self {
            resolver,
            descriptions,
            icon_template,
            cache_failures: false,
            failed: HashSet::new(),
            stats: BuildStats::default(),
        }
    }

    /// Also append failed resolutions to the cache (as `unknown.bundle.identifier`).
    pub fn cache_failures(mut self, yes: bool) -> Self {
        self.cache_failures = yes;
        self
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    /// Build one record per asset, in order.
    pub fn build_all(&mut self, assets: &[HarvestedAsset], cache: &mut IdentifierCache) -> Vec<FlatApp> {
        assets.iter().map(|a| self.build(a, cache)).collect()
    }

    pub fn build(&mut self, asset: &HarvestedAsset, cache: &mut IdentifierCache) -> FlatApp {
        let bundle_id = self.bundle_id(asset, cache);

        let (localized_description, developer_name) = match self
            .descriptions
            .and_then(|t| t.find(&normalize_app_name(&asset.app_name)))
        {
            Some(row) => {
                self.stats.described += 1;
                (row.localized_description(), row.maintainer.clone())
            }
            None => (String::new(), String::new()),
        };

        FlatApp {
            name: asset.app_name.clone(),
            icon_url: self.icon_template.replace("{bundle_id}", &bundle_id),
            bundle_identifier: bundle_id,
            version: asset.version.clone(),
            version_date: asset.date.clone(),
            size: asset.size,
            download_url: asset.download_url.clone(),
            developer_name,
            localized_description,
        }
    }

    fn bundle_id(&mut self, asset: &HarvestedAsset, cache: &mut IdentifierCache) -> String {
        let name = asset.app_name.as_str();
        if let Some(id) = cache.lookup(name) {
            self.stats.cache_hits += 1;
            return id.to_string();
        }
        if self.failed.contains(name) {
            return DEFAULT_BUNDLE_ID.to_string();
        }

        match self.resolver.resolve(&asset.download_url) {
            Ok(id) => {
                tracing::info!("resolved {} -> {}", name, id);
                self.stats.resolved += 1;
                cache.record(name, &id);
                id
            }
            Err(e) => {
                tracing::warn!("could not resolve bundle id for {}: {}", name, e);
                self.stats.resolve_failures += 1;
                if self.cache_failures {
                    cache.record(name, DEFAULT_BUNDLE_ID);
                } else {
                    self.failed.insert(name.to_string());
                }
                DEFAULT_BUNDLE_ID.to_string()
            }
        }
    }
}
