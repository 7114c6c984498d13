//! Description table: per-app description, status and maintainer parsed from
//! a table in the project readme.
//!
//! Which table is used is a [`TableSelector`]. The default picks the second
//! table in the document; a readme that gains or loses a table before it
//! silently changes what is matched, so [`TableSelector::Header`] exists to pin
//! the table by a column label instead.

mod markdown;

pub use markdown::MarkdownTable;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const COL_APP_NAME: &str = "App Name";
const COL_DESCRIPTION: &str = "Description";
const COL_LAST_UPDATED: &str = "Last Updated";
const COL_STATUS: &str = "Status";
const COL_MAINTAINER: &str = "Source/Maintainer";

/// How the description table is picked out of the readme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableSelector {
    /// Zero-based position among all tables in the document.
    Position(usize),
    /// First table with a header cell equal to this label.
    Header(String),
}

impl Default for TableSelector {
    fn default() -> Self {
        TableSelector::Position(1)
    }
}

impl TableSelector {
    pub fn select(&self, tables: Vec<MarkdownTable>) -> Option<MarkdownTable> {
        match self {
            TableSelector::Position(index) => tables.into_iter().nth(*index),
            TableSelector::Header(label) => tables.into_iter().find(|t| t.column(label).is_some()),
        }
    }
}

/// Lookup key: every ASCII space removed (not just the ends), then lowercased.
pub fn normalize_app_name(name: &str) -> String {
    name.replace(' ', "").to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionRow {
    /// Already normalized with [`normalize_app_name`].
    pub app_name: String,
    pub description: String,
    pub last_updated: String,
    pub status: String,
    pub maintainer: String,
}

impl DescriptionRow {
    /// Text used as `localizedDescription` in the catalogs.
    pub fn localized_description(&self) -> String {
        format!(
            "{}\nLast updated: {}\nStatus: {}",
            self.description, self.last_updated, self.status
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct DescriptionTable {
    rows: Vec<DescriptionRow>,
}

impl DescriptionTable {
    /// Parse the readme at `path` and pick a table with `selector`.
    ///
    /// Returns `Ok(None)` when the readme does not exist or no table matches.
    pub fn load(path: &Path, selector: &TableSelector) -> Result<Option<Self>> {
        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no readme at {}, descriptions unavailable", path.display());
                return Ok(None);
            }
            Err(e) => return Err(e).with_context(|| format!("read readme: {}", path.display())),
        };
        let table = Self::from_markdown(&text, selector);
        if table.is_none() {
            tracing::warn!(
                "readme {} has no description table for {:?}",
                path.display(),
                selector
            );
        }
        Ok(table)
    }

    pub fn from_markdown(markdown: &str, selector: &TableSelector) -> Option<Self> {
        let tables = markdown::extract_tables(markdown);
        let table = selector.select(tables)?;
        Some(Self::from_table(&table))
    }

    /// Build from an already extracted table. Missing columns read as empty strings.
    pub fn from_table(table: &MarkdownTable) -> Self {
        let col = |label: &str| table.column(label);
        let (name, desc, updated, status, maintainer) = (
            col(COL_APP_NAME),
            col(COL_DESCRIPTION),
            col(COL_LAST_UPDATED),
            col(COL_STATUS),
            col(COL_MAINTAINER),
        );
        let cell = |row: &[String], idx: Option<usize>| {
            idx.and_then(|i| row.get(i)).cloned().unwrap_or_default()
        };

        let rows = table
            .rows
            .iter()
            .map(|row| DescriptionRow {
                app_name: normalize_app_name(&cell(row, name)),
                description: cell(row, desc),
                last_updated: cell(row, updated),
                status: cell(row, status),
                maintainer: cell(row, maintainer),
            })
            .collect();
        Self { rows }
    }

    /// First row whose normalized app name equals `normalized`.
    pub fn find(&self, normalized: &str) -> Option<&DescriptionRow> {
        self.rows.iter().find(|r| r.app_name == normalized)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
