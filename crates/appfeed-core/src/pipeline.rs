//! One full run: load inputs, harvest releases, build records, persist.
//!
//! All run state (identifier cache, records) is owned here and handed to each
//! stage explicitly. Nothing is written until every stage has succeeded, so a
//! network failure leaves all three output files untouched.

use anyhow::{Context, Result};

use crate::bundle_cache::IdentifierCache;
use crate::catalog::{self, Catalog, FlatApp};
use crate::config::FeedConfig;
use crate::descriptions::DescriptionTable;
use crate::github::ReleaseSource;
use crate::harvest;
use crate::records::{BuildStats, RecordBuilder};
use crate::resolver::BundleIdResolver;

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Package assets seen this run (= flat catalog length).
    pub assets: usize,
    /// Distinct app names (= grouped catalog length).
    pub apps: usize,
    /// Rows in the identifier cache after the run.
    pub cache_rows: usize,
    pub stats: BuildStats,
}

/// Inputs loaded before any network access.
pub struct Inputs {
    pub catalog: Catalog,
    pub cache: IdentifierCache,
    pub descriptions: Option<DescriptionTable>,
}

impl Inputs {
    pub fn load(cfg: &FeedConfig) -> Result<Self> {
        let catalog = catalog::read_catalog(&cfg.paths.catalog)?;
        let cache = IdentifierCache::load(&cfg.paths.bundle_cache)?;
        let descriptions = DescriptionTable::load(&cfg.paths.readme, &cfg.descriptions.table)?;
        if let Some(d) = &descriptions {
            tracing::info!("loaded {} description rows", d.len());
        }
        Ok(Self {
            catalog,
            cache,
            descriptions,
        })
    }
}

/// Outputs of a run, ready to be persisted.
pub struct Outputs {
    pub cache: IdentifierCache,
    pub flat: Catalog,
    pub grouped: Catalog,
}

impl Outputs {
    /// Write the identifier cache, flat catalog and grouped catalog, in that order.
    pub fn persist(&self, cfg: &FeedConfig) -> Result<()> {
        self.cache.persist(&cfg.paths.bundle_cache)?;
        catalog::write_catalog(&cfg.paths.flat_catalog, &self.flat)?;
        catalog::write_catalog(&cfg.paths.catalog, &self.grouped)?;
        Ok(())
    }
}

/// Harvest and build without touching the filesystem.
pub fn transform<S, R>(
    cfg: &FeedConfig,
    inputs: Inputs,
    source: &S,
    resolver: R,
) -> Result<(Outputs, RunSummary)>
where
    S: ReleaseSource + ?Sized,
    R: BundleIdResolver,
{
    let Inputs {
        catalog,
        mut cache,
        descriptions,
    } = inputs;

    let assets = harvest::harvest(
        source,
        &cfg.source.package_extension,
        cfg.source.name_policy,
    )?;
    tracing::info!("harvested {} package assets", assets.len());

    let mut builder = RecordBuilder::new(resolver, descriptions.as_ref(), &cfg.icons.url_template)
        .cache_failures(cfg.resolver.cache_failures);
    let records = builder.build_all(&assets, &mut cache);
    let stats = builder.stats();

    let flat = catalog::with_apps(&catalog, to_values(&records)?);
    let grouped = catalog::group_catalog(&flat)?;
    let apps = grouped
        .get("apps")
        .and_then(|v| v.as_array())
        .map_or(0, Vec::len);

    let summary = RunSummary {
        assets: records.len(),
        apps,
        cache_rows: cache.len(),
        stats,
    };
    Ok((Outputs { cache, flat, grouped }, summary))
}

/// Full run against the configured files.
pub fn run<S, R>(cfg: &FeedConfig, source: &S, resolver: R) -> Result<RunSummary>
where
    S: ReleaseSource + ?Sized,
    R: BundleIdResolver,
{
    let inputs = Inputs::load(cfg)?;
    let (outputs, summary) = transform(cfg, inputs, source, resolver)?;
    outputs.persist(cfg)?;
    tracing::info!(
        assets = summary.assets,
        apps = summary.apps,
        cache_rows = summary.cache_rows,
        resolved = summary.stats.resolved,
        resolve_failures = summary.stats.resolve_failures,
        "run complete"
    );
    Ok(summary)
}

fn to_values(records: &[FlatApp]) -> Result<Vec<serde_json::Value>> {
    records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .context("serialize flat records")
}
