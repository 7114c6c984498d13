//! App name and version derivation from package filenames.
//!
//! `Foo-Bar-1.2.ipa` becomes name `Foo-Bar`, version `1.2`. Filenames without a
//! hyphen get version [`DEFAULT_VERSION`].

use serde::{Deserialize, Serialize};

/// Version used when the filename carries none.
pub const DEFAULT_VERSION: &str = "1.0";

/// How the stem of a package filename is split into name and version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamePolicy {
    /// The last hyphen-delimited segment is always the version.
    #[default]
    LastSegment,
    /// The last segment is the version only if it looks like one
    /// (optional `v`, then a digit). Otherwise the whole stem is the name.
    NumericSuffix,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub name: String,
    pub version: String,
}

/// Returns `None` if `filename` does not end with `extension`.
pub fn parse_asset_name(filename: &str, extension: &str, policy: NamePolicy) -> Option<ParsedName> {
    let stem = filename.strip_suffix(extension)?;
    Some(split_stem(stem, policy))
}

fn split_stem(stem: &str, policy: NamePolicy) -> ParsedName {
    let whole = || ParsedName {
        name: stem.to_string(),
        version: DEFAULT_VERSION.to_string(),
    };

    let Some((name, version)) = stem.rsplit_once('-') else {
        return whole();
    };

    match policy {
        NamePolicy::LastSegment => ParsedName {
            name: name.to_string(),
            version: version.to_string(),
        },
        NamePolicy::NumericSuffix if looks_like_version(version) => ParsedName {
            name: name.to_string(),
            version: version.to_string(),
        },
        NamePolicy::NumericSuffix => whole(),
    }
}

fn looks_like_version(segment: &str) -> bool {
    let s = segment
        .strip_prefix('v')
        .or_else(|| segment.strip_prefix('V'))
        .unwrap_or(segment);
    s.chars().next().is_some_and(|c| c.is_ascii_digit())
}
