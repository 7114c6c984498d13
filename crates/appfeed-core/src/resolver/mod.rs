//! Bundle identifier resolution for packages missing from the identifier cache.
//!
//! The record builder only depends on [`BundleIdResolver`]; [`IpaResolver`] is
//! the implementation used by the CLI.

mod ipa;

pub use ipa::{bundle_id_from_archive, IpaResolver};

use thiserror::Error;

/// Why a package's bundle identifier could not be determined.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: curl::Error,
    },
    #[error("download {url}: HTTP {status}")]
    Http { url: String, status: u32 },
    #[error("spool package to disk: {0}")]
    Io(#[from] std::io::Error),
    #[error("read package archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("no Payload/*.app/Info.plist in package")]
    MissingInfoPlist,
    #[error("parse Info.plist: {0}")]
    Plist(#[from] plist::Error),
    #[error("Info.plist has no CFBundleIdentifier")]
    MissingBundleId,
}

/// Resolves a bundle identifier from a package's direct download URL.
pub trait BundleIdResolver {
    fn resolve(&self, download_url: &str) -> Result<String, ResolveError>;
}

impl<R: BundleIdResolver + ?Sized> BundleIdResolver for &R {
    fn resolve(&self, download_url: &str) -> Result<String, ResolveError> {
        (**self).resolve(download_url)
    }
}
