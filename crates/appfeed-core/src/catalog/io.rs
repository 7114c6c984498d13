//! Read and write catalog JSON files.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::Path;

pub(crate) const APPS_KEY: &str = "apps";

/// Top-level catalog object. Key order is preserved.
pub type Catalog = Map<String, Value>;

/// Read a catalog. The file must exist and hold a JSON object.
pub fn read_catalog(path: &Path) -> Result<Catalog> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read catalog: {}", path.display()))?;
    let value: Value = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse catalog: {}", path.display()))?;
    match value {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!(
            "catalog {} is not a JSON object (found {})",
            path.display(),
            json_kind(&other)
        ),
    }
}

/// Copy of `catalog` with `apps` replaced. An existing `apps` key keeps its position.
pub fn with_apps(catalog: &Catalog, apps: Vec<Value>) -> Catalog {
    let mut out = catalog.clone();
    out.insert(APPS_KEY.to_string(), Value::Array(apps));
    out
}

/// Overwrite `path` with pretty-printed JSON (two-space indent, trailing newline).
pub fn write_catalog(path: &Path, catalog: &Catalog) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir: {}", parent.display()))?;
    }
    let mut json = serde_json::to_string_pretty(catalog).context("serialize catalog")?;
    json.push('\n');
    std::fs::write(path, json).with_context(|| format!("write catalog: {}", path.display()))?;
    tracing::debug!("wrote {}", path.display());
    Ok(())
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn read_missing_catalog_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_catalog(&dir.path().join("apps.json")).is_err());
    }

    #[test]
    fn read_non_object_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apps.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        let err = read_catalog(&path).unwrap_err();
        assert!(format!("{err:#}").contains("not a JSON object"));
    }

    #[test]
    fn write_then_read_keeps_key_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("apps.json");
        let catalog = json!({"zeta": 1, "apps": [], "alpha": "x"})
            .as_object()
            .unwrap()
            .clone();
        write_catalog(&path, &catalog).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n  \"zeta\": 1,"));
        assert!(text.ends_with("}\n"));

        let back = read_catalog(&path).unwrap();
        let keys: Vec<&str> = back.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "apps", "alpha"]);
    }

    #[test]
    fn with_apps_appends_when_missing() {
        let catalog = json!({"name": "S"}).as_object().unwrap().clone();
        let out = with_apps(&catalog, vec![json!({"name": "A"})]);
        let keys: Vec<&str> = out.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "apps"]);
        assert_eq!(out["apps"][0]["name"], "A");
    }
}
