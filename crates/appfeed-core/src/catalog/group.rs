//! Flat list → name-grouped list, and back.

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;

use super::io::{with_apps, Catalog, APPS_KEY};
use super::{FlatApp, GroupedApp, VersionEntry};

/// Group flat records by name.
///
/// Entries appear in the order their name is first seen, and the first record
/// for a name supplies the entry's bundle identifier, developer and icon.
/// Versions are ordered by date, newest first; equal dates keep input order.
pub fn group_apps(apps: &[FlatApp]) -> Vec<GroupedApp> {
    let mut grouped: Vec<GroupedApp> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for app in apps {
        let slot = *index.entry(app.name.as_str()).or_insert_with(|| {
            grouped.push(GroupedApp {
                name: app.name.clone(),
                bundle_identifier: app.bundle_identifier.clone(),
                developer_name: app.developer_name.clone(),
                icon_url: app.icon_url.clone(),
                versions: Vec::new(),
            });
            grouped.len() - 1
        });
        grouped[slot].versions.push(VersionEntry {
            version: app.version.clone(),
            date: app.version_date.clone(),
            size: app.size,
            download_url: app.download_url.clone(),
            localized_description: app.localized_description.clone(),
        });
    }

    for entry in &mut grouped {
        // sort_by is stable.
        entry.versions.sort_by(|a, b| b.date.cmp(&a.date));
    }
    grouped
}

/// One flat record per version, carrying its entry's top-level fields.
pub fn flatten_apps(grouped: &[GroupedApp]) -> Vec<FlatApp> {
    grouped
        .iter()
        .flat_map(|entry| {
            entry.versions.iter().map(move |v| FlatApp {
                name: entry.name.clone(),
                bundle_identifier: entry.bundle_identifier.clone(),
                version: v.version.clone(),
                version_date: v.date.clone(),
                size: v.size,
                download_url: v.download_url.clone(),
                developer_name: entry.developer_name.clone(),
                localized_description: v.localized_description.clone(),
                icon_url: entry.icon_url.clone(),
            })
        })
        .collect()
}

/// Regroup the `apps` list of an arbitrary catalog object.
///
/// Missing fields on each app take their defaults; a missing `apps` key is an
/// empty list. Every other top-level key is carried over unchanged.
pub fn group_catalog(catalog: &Catalog) -> Result<Catalog> {
    let apps: Vec<FlatApp> = match catalog.get(APPS_KEY) {
        Some(v) => serde_json::from_value(v.clone()).context("parse catalog apps")?,
        None => Vec::new(),
    };
    let grouped = group_apps(&apps);
    let grouped = grouped
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<Value>, _>>()
        .context("serialize grouped apps")?;
    Ok(with_apps(catalog, grouped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flat(name: &str, version: &str, date: &str) -> FlatApp {
        FlatApp {
            name: name.into(),
            version: version.into(),
            version_date: date.into(),
            ..FlatApp::default()
        }
    }

    #[test]
    fn versions_sorted_newest_first() {
        let apps = vec![
            flat("A", "1", "2023-01-01"),
            flat("A", "3", "2024-06-01"),
            flat("A", "2", "2023-06-01"),
        ];
        let grouped = group_apps(&apps);
        assert_eq!(grouped.len(), 1);
        let dates: Vec<&str> = grouped[0].versions.iter().map(|v| v.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-06-01", "2023-06-01", "2023-01-01"]);
    }

    #[test]
    fn equal_dates_keep_insertion_order() {
        let apps = vec![
            flat("A", "first", "2024-01-01"),
            flat("A", "newer", "2024-02-01"),
            flat("A", "second", "2024-01-01"),
        ];
        let grouped = group_apps(&apps);
        let versions: Vec<&str> = grouped[0]
            .versions
            .iter()
            .map(|v| v.version.as_str())
            .collect();
        assert_eq!(versions, vec!["newer", "first", "second"]);
    }

    #[test]
    fn first_record_wins_top_level_fields() {
        let mut a1 = flat("A", "1", "2023-01-01");
        a1.bundle_identifier = "com.first".into();
        a1.developer_name = "alice".into();
        a1.icon_url = "https://cdn/first.png".into();
        let mut a2 = flat("A", "2", "2024-01-01");
        a2.bundle_identifier = "com.second".into();
        a2.developer_name = "bob".into();

        let grouped = group_apps(&[a1, flat("B", "1", "2020-01-01"), a2]);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].name, "A");
        assert_eq!(grouped[1].name, "B");
        assert_eq!(grouped[0].bundle_identifier, "com.first");
        assert_eq!(grouped[0].developer_name, "alice");
        assert_eq!(grouped[0].icon_url, "https://cdn/first.png");
        assert_eq!(grouped[0].versions.len(), 2);
    }

    #[test]
    fn regrouping_flattened_output_is_identity() {
        let apps = vec![
            flat("A", "1", "2023-01-01"),
            flat("B", "9", "2022-01-01"),
            flat("A", "2", "2024-01-01"),
            flat("A", "1b", "2023-01-01"),
        ];
        let once = group_apps(&apps);
        let twice = group_apps(&flatten_apps(&once));
        assert_eq!(once, twice);
    }

    #[test]
    fn group_catalog_applies_defaults_and_keeps_top_level() {
        let catalog = json!({
            "name": "My Source",
            "identifier": "com.example.source",
            "apps": [
                {"name": "A", "downloadURL": "https://dl/a1.ipa", "versionDate": "2023-01-01"},
                {},
                {"name": "A", "downloadURL": "https://dl/a2.ipa", "versionDate": "2024-01-01", "size": 10}
            ],
            "news": []
        });
        let catalog = catalog.as_object().unwrap().clone();
        let out = group_catalog(&catalog).unwrap();

        let keys: Vec<&str> = out.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "identifier", "apps", "news"]);
        assert_eq!(out["name"], "My Source");

        let apps = out["apps"].as_array().unwrap();
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0]["name"], "A");
        assert_eq!(apps[0]["bundleIdentifier"], "unknown.bundle.identifier");
        assert_eq!(apps[0]["developerName"], "Unknown Developer");
        assert_eq!(apps[0]["versions"][0]["downloadURL"], "https://dl/a2.ipa");
        assert_eq!(apps[0]["versions"][0]["size"], 10);
        assert_eq!(apps[0]["versions"][1]["version"], "1.0");
        assert_eq!(apps[1]["name"], "Unknown");
        assert_eq!(apps[1]["versions"][0]["date"], "1970-01-01");
    }

    #[test]
    fn group_catalog_without_apps_key() {
        let catalog = json!({"name": "Empty"}).as_object().unwrap().clone();
        let out = group_catalog(&catalog).unwrap();
        assert_eq!(out["apps"], json!([]));
        assert_eq!(out["name"], "Empty");
    }
}
