//! Resolve a bundle identifier by downloading the `.ipa` and reading
//! `CFBundleIdentifier` from `Payload/<App>.app/Info.plist`.

use std::fs::File;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use std::time::Duration;

use super::{BundleIdResolver, ResolveError};

/// Downloads each package to a temp file and inspects it. Blocking.
#[derive(Debug, Clone, Default)]
pub struct IpaResolver;

impl IpaResolver {
    pub fn new() -> Self {
        Self
    }

    fn download(&self, url: &str, dest: &mut File) -> Result<(), ResolveError> {
        let curl_err = |source: curl::Error| ResolveError::Download {
            url: url.to_string(),
            source,
        };
        let mut write_err: Option<std::io::Error> = None;

        let mut easy = curl::easy::Easy::new();
        easy.url(url).map_err(curl_err)?;
        easy.follow_location(true).map_err(curl_err)?;
        easy.max_redirections(10).map_err(curl_err)?;
        easy.connect_timeout(Duration::from_secs(30)).map_err(curl_err)?;
        easy.low_speed_limit(1024).map_err(curl_err)?;
        easy.low_speed_time(Duration::from_secs(60)).map_err(curl_err)?;

        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| match dest.write_all(data) {
                    Ok(()) => Ok(data.len()),
                    Err(e) => {
                        write_err = Some(e);
                        Ok(0) // abort transfer
                    }
                })
                .map_err(curl_err)?;
            let performed = transfer.perform();
            drop(transfer);
            if let Some(e) = write_err.take() {
                return Err(ResolveError::Io(e));
            }
            performed.map_err(curl_err)?;
        }

        let status = easy.response_code().map_err(curl_err)?;
        if !(200..300).contains(&status) {
            return Err(ResolveError::Http {
                url: url.to_string(),
                status,
            });
        }
        dest.flush()?;
        Ok(())
    }
}

impl BundleIdResolver for IpaResolver {
    fn resolve(&self, download_url: &str) -> Result<String, ResolveError> {
        let mut spool = tempfile::tempfile()?;
        self.download(download_url, &mut spool)?;
        spool.rewind()?;
        let id = bundle_id_from_reader(spool)?;
        tracing::debug!("resolved {} from {}", id, download_url);
        Ok(id)
    }
}

/// Read the bundle identifier from an `.ipa` on disk.
pub fn bundle_id_from_archive(path: &Path) -> Result<String, ResolveError> {
    bundle_id_from_reader(File::open(path)?)
}

fn bundle_id_from_reader<R: Read + Seek>(reader: R) -> Result<String, ResolveError> {
    let mut archive = zip::ZipArchive::new(reader)?;
    let mut found = None;
    for i in 0..archive.len() {
        if is_app_info_plist(archive.by_index(i)?.name()) {
            found = Some(i);
            break;
        }
    }
    let index = found.ok_or(ResolveError::MissingInfoPlist)?;

    let mut bytes = Vec::new();
    archive.by_index(index)?.read_to_end(&mut bytes)?;

    let value = plist::Value::from_reader(Cursor::new(bytes))?;
    value
        .as_dictionary()
        .and_then(|d| d.get("CFBundleIdentifier"))
        .and_then(|v| v.as_string())
        .map(str::to_string)
        .ok_or(ResolveError::MissingBundleId)
}

/// `Payload/<Name>.app/Info.plist`, not a nested bundle's plist.
fn is_app_info_plist(entry: &str) -> bool {
    let parts: Vec<&str> = entry.split('/').collect();
    matches!(parts.as_slice(), ["Payload", app, "Info.plist"] if app.ends_with(".app"))
}
