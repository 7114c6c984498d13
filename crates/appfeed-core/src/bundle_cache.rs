//! Identifier cache: app name → bundle identifier, persisted as `bundleId.csv`.
//!
//! Rows are only ever appended. Lookups return the first match, so a duplicate
//! appended later never shadows an earlier row.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub name: String,
    #[serde(rename = "bundleId")]
    pub bundle_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct IdentifierCache {
    rows: Vec<CacheEntry>,
}

impl IdentifierCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the cache from `path`. A missing file is a cold start and yields an empty cache.
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = match csv::Reader::from_path(path) {
            Ok(r) => r,
            Err(e) if is_not_found(&e) => {
                tracing::info!("no identifier cache at {}, starting empty", path.display());
                return Ok(Self::new());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("open identifier cache: {}", path.display()))
            }
        };

        let mut rows = Vec::new();
        for row in reader.deserialize() {
            let entry: CacheEntry =
                row.with_context(|| format!("parse identifier cache: {}", path.display()))?;
            rows.push(entry);
        }
        tracing::debug!("loaded {} identifier cache rows from {}", rows.len(), path.display());
        Ok(Self { rows })
    }

    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.bundle_id.as_str())
    }

    /// Appends a row. Existing rows with the same name are left alone.
    pub fn record(&mut self, name: &str, bundle_id: &str) {
        self.rows.push(CacheEntry {
            name: name.to_string(),
            bundle_id: bundle_id.to_string(),
        });
    }

    /// Overwrite `path` with the full row set (header `name,bundleId`).
    pub fn persist(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("create identifier cache: {}", path.display()))?;
        // serialize() only emits the header with the first record.
        if self.rows.is_empty() {
            writer.write_record(["name", "bundleId"])?;
        }
        for row in &self.rows {
            writer
                .serialize(row)
                .with_context(|| format!("write identifier cache: {}", path.display()))?;
        }
        writer
            .flush()
            .with_context(|| format!("flush identifier cache: {}", path.display()))?;
        tracing::debug!("wrote {} identifier cache rows to {}", self.rows.len(), path.display());
        Ok(())
    }

    pub fn rows(&self) -> &[CacheEntry] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn is_not_found(err: &csv::Error) -> bool {
    matches!(err.kind(), csv::ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::NotFound)
}
