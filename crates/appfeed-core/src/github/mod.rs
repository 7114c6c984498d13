//! GitHub release listing over the REST API.
//!
//! Uses the curl crate (libcurl) in blocking mode. List endpoints are walked
//! page by page following the `Link: rel="next"` header.

mod parse;

pub use parse::{Asset, Release};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::str;
use std::time::Duration;

const PER_PAGE: &str = "100";
const USER_AGENT: &str = concat!("appfeed/", env!("CARGO_PKG_VERSION"));

/// Anything that can list releases and their assets.
pub trait ReleaseSource {
    /// All releases in the host's default order (newest first on GitHub).
    fn list_releases(&self) -> Result<Vec<Release>>;

    fn list_assets(&self, release: &Release) -> Result<Vec<Asset>>;
}

/// Client for one repository.
#[derive(Debug, Clone)]
pub struct GithubClient {
    api_base: String,
    repository: String,
    token: Option<String>,
}

impl GithubClient {
    /// `repository` is `owner/name`. `token` is sent as a bearer token when present.
    pub fn new(api_base: &str, repository: &str, token: Option<String>) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            repository: repository.trim_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    fn endpoint(&self, path: &str) -> Result<String> {
        let raw = format!("{}/repos/{}/{}", self.api_base, self.repository, path);
        let mut url = url::Url::parse(&raw).with_context(|| format!("invalid API URL: {raw}"))?;
        url.query_pairs_mut().append_pair("per_page", PER_PAGE);
        Ok(url.into())
    }

    /// GET every page starting at `first_url` and concatenate the JSON arrays.
    fn get_all<T: DeserializeOwned>(&self, first_url: String) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(first_url);
        while let Some(url) = next.take() {
            let page = self.get(&url)?;
            let mut batch: Vec<T> = serde_json::from_slice(&page.body)
                .with_context(|| format!("parse JSON from {url}"))?;
            tracing::debug!("GET {} -> {} items", url, batch.len());
            let empty = batch.is_empty();
            items.append(&mut batch);
            if !empty {
                next = parse::link_header(&page.headers).and_then(parse::next_link);
            }
        }
        Ok(items)
    }

    fn get(&self, url: &str) -> Result<Page> {
        let mut headers: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url).context("invalid URL")?;
        easy.follow_location(true)?;
        easy.useragent(USER_AGENT)?;
        easy.connect_timeout(Duration::from_secs(15))?;
        easy.timeout(Duration::from_secs(60))?;

        let mut list = curl::easy::List::new();
        list.append("Accept: application/vnd.github+json")?;
        list.append("X-GitHub-Api-Version: 2022-11-28")?;
        if let Some(token) = &self.token {
            list.append(&format!("Authorization: Bearer {}", token.trim()))?;
        }
        easy.http_headers(list)?;

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    // A new status line starts a new response (redirects).
                    if s.starts_with("HTTP/") {
                        headers.clear();
                    }
                    headers.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer
                .perform()
                .with_context(|| format!("GET {url} failed"))?;
        }

        let code = easy.response_code().context("no response code")?;
        if !(200..300).contains(&code) {
            let snippet = String::from_utf8_lossy(&body[..body.len().min(200)]).into_owned();
            anyhow::bail!("GET {} returned HTTP {}: {}", url, code, snippet.trim());
        }

        Ok(Page { headers, body })
    }
}

struct Page {
    headers: Vec<String>,
    body: Vec<u8>,
}

impl ReleaseSource for GithubClient {
    fn list_releases(&self) -> Result<Vec<Release>> {
        let url = self.endpoint("releases")?;
        self.get_all(url)
            .with_context(|| format!("list releases of {}", self.repository))
    }

    fn list_assets(&self, release: &Release) -> Result<Vec<Asset>> {
        let url = self.endpoint(&format!("releases/{}/assets", release.id))?;
        self.get_all(url)
            .with_context(|| format!("list assets of release {}", release.id))
    }
}
