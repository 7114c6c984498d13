//! Minimal GitHub REST structures and `Link` header parsing.

use serde::Deserialize;

/// A release as returned by `GET /repos/{owner}/{repo}/releases`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    pub id: u64,
    #[serde(default)]
    pub tag_name: String,
    /// Release title; GitHub sends `null` when it was left blank.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Release {
    /// Title for display: the release name, falling back to the tag.
    pub fn title(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.tag_name)
    }

    /// `YYYY-MM-DD` of publication (or creation for drafts), if known.
    pub fn date(&self) -> Option<&str> {
        self.published_at
            .as_deref()
            .or(self.created_at.as_deref())
            .and_then(|ts| ts.get(..10))
    }
}

/// A release asset as returned by `GET /repos/{owner}/{repo}/releases/{id}/assets`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Asset {
    pub name: String,
    pub browser_download_url: String,
    #[serde(default)]
    pub size: u64,
}

/// Extract the `rel="next"` target from an RFC 8288 `Link` header value.
pub(crate) fn next_link(header_value: &str) -> Option<String> {
    header_value.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let target = pieces.next()?.trim();
        let is_next = pieces.any(|p| {
            let p = p.trim();
            p == "rel=\"next\"" || p == "rel=next"
        });
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(String::from)
    })
}

/// Find the `Link` header among raw response header lines.
pub(crate) fn link_header(lines: &[String]) -> Option<&str> {
    lines.iter().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name.trim()
            .eq_ignore_ascii_case("link")
            .then(|| value.trim())
    })
}
