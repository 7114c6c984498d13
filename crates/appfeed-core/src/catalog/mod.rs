//! Catalog records: the flat per-asset list and the name-grouped list.
//!
//! Both catalogs share the same top-level JSON object (whatever keys the input
//! `apps.json` carries); only `apps` differs.

mod group;
mod io;

pub use group::{flatten_apps, group_apps, group_catalog};
pub use io::{read_catalog, with_apps, write_catalog, Catalog};

use serde::{Deserialize, Serialize};

pub const DEFAULT_NAME: &str = "Unknown";
pub const DEFAULT_BUNDLE_ID: &str = "unknown.bundle.identifier";
pub const DEFAULT_VERSION_DATE: &str = "1970-01-01";
pub const DEFAULT_DEVELOPER: &str = "Unknown Developer";

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

fn default_bundle_id() -> String {
    DEFAULT_BUNDLE_ID.to_string()
}

fn default_version() -> String {
    crate::asset_name::DEFAULT_VERSION.to_string()
}

fn default_version_date() -> String {
    DEFAULT_VERSION_DATE.to_string()
}

fn default_developer() -> String {
    DEFAULT_DEVELOPER.to_string()
}

/// One package in the flat catalog. Every field has a default so any object
/// in an `apps` list deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatApp {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_bundle_id")]
    pub bundle_identifier: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_version_date")]
    pub version_date: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default, rename = "downloadURL")]
    pub download_url: String,
    #[serde(default = "default_developer")]
    pub developer_name: String,
    #[serde(default)]
    pub localized_description: String,
    #[serde(default, rename = "iconURL")]
    pub icon_url: String,
}

impl Default for FlatApp {
    fn default() -> Self {
        Self {
            name: default_name(),
            bundle_identifier: default_bundle_id(),
            version: default_version(),
            version_date: default_version_date(),
            size: 0,
            download_url: String::new(),
            developer_name: default_developer(),
            localized_description: String::new(),
            icon_url: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    pub version: String,
    pub date: String,
    pub size: u64,
    #[serde(rename = "downloadURL")]
    pub download_url: String,
    pub localized_description: String,
}

/// One app in the grouped catalog with its versions, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedApp {
    pub name: String,
    pub bundle_identifier: String,
    pub developer_name: String,
    #[serde(rename = "iconURL")]
    pub icon_url: String,
    pub versions: Vec<VersionEntry>,
}
