use std::path::{Component, Path};
use tracing::{debug, error, info};
use crate::catalog::{resolve_catalog, Catalog, CatalogEntry};
use crate::config::{GistConfig, Layout};
use crate::error::{GistError, GistResult};
use crate::fetch::Fetcher;
use crate::manifest::{CacheManifest, MANIFEST_FILE_NAME};
use crate::scan::scan_tree;

/// What to do when a single gist fails to download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Log the failure, leave its manifest entry untouched and carry on.
    #[default]
    Continue,
    /// Abort the run at the first failure.
    FailFast,
}

/// Outcome of one sync run. Identifiers keep the order they were required in.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub downloaded: Vec<String>,
    pub up_to_date: Vec<String>,
    pub missing: Vec<String>,
    pub failed: Vec<(String, GistError)>,
}

impl SyncReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Performs one full sync run for the project described by `layout`:
/// scan the sources, prepare the cache, resolve the catalog, then sync.
///
/// Scan roots are checked before any network traffic, so a bad project root
/// fails without contacting the gist service.
pub fn run<F: Fetcher + ?Sized>(
    layout: &Layout,
    config: &GistConfig,
    fetcher: &F,
) -> GistResult<SyncReport> {
    let required = scan_tree(&layout.scan_roots, &layout.exclude)?;
    let mut manifest = CacheManifest::load(&layout.manifest_path)?;
    let catalog = resolve_catalog(
        fetcher,
        &config.listing_url(),
        config.group_policy(),
        &required,
    )?;
    sync_cache(
        &required,
        &catalog,
        &mut manifest,
        &layout.cache_dir,
        fetcher,
        config.failure_mode(),
    )
}

/// Brings the cache directory up to date with the catalog.
///
/// For each required identifier, in order: skip it if the catalog does not
/// know it; otherwise download it to `cache_dir/<identifier>` if the manifest
/// considers it stale, and record the new version in the manifest once the
/// download has returned. Up-to-date identifiers are left alone, so a second
/// run against an unchanged catalog downloads nothing.
///
/// A download interrupted halfway may leave a truncated file behind, but its
/// manifest entry is not updated, so the next run fetches it again in full.
///
/// # Errors
///
/// Manifest write failures always abort. Download failures abort only under
/// [`FailureMode::FailFast`]; otherwise they are collected in the report.
pub fn sync_cache<F: Fetcher + ?Sized>(
    required: &[String],
    catalog: &Catalog,
    manifest: &mut CacheManifest,
    cache_dir: &Path,
    fetcher: &F,
    mode: FailureMode,
) -> GistResult<SyncReport> {
    let mut report = SyncReport::default();

    for identifier in required {
        let Some(entry) = catalog.get(identifier) else {
            debug!("skipping {}", identifier);
            report.missing.push(identifier.clone());
            continue;
        };

        if !manifest.is_stale(identifier, &entry.version_marker) {
            info!("no update needed for {}", identifier);
            report.up_to_date.push(identifier.clone());
            continue;
        }

        match download_entry(entry, cache_dir, fetcher) {
            Ok(bytes) => {
                manifest.update(identifier, &entry.version_marker)?;
                debug!("recorded {} in {}", identifier, manifest.path().display());
                info!("downloaded {} ({} bytes) at {}", identifier, bytes, entry.version_marker);
                report.downloaded.push(identifier.clone());
            }
            Err(e) if mode == FailureMode::FailFast => return Err(e),
            Err(e) => {
                error!("{}", e);
                report.failed.push((identifier.clone(), e));
            }
        }
    }

    Ok(report)
}

fn download_entry<F: Fetcher + ?Sized>(
    entry: &CatalogEntry,
    cache_dir: &Path,
    fetcher: &F,
) -> GistResult<u64> {
    if !is_plain_file_name(&entry.identifier) {
        return Err(GistError::InvalidIdentifier(entry.identifier.clone()));
    }
    let dest = cache_dir.join(&entry.identifier);
    info!("downloading {} to {}", entry.identifier, cache_dir.display());
    fetcher
        .download(&entry.content_url, &dest)
        .map_err(|e| GistError::Download {
            identifier: entry.identifier.clone(),
            url: entry.content_url.clone(),
            reason: e.to_string(),
        })
}

/// Artifacts live flat in the cache directory next to the manifest.
fn is_plain_file_name(identifier: &str) -> bool {
    if identifier == MANIFEST_FILE_NAME || identifier.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(identifier).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_file_names() {
        assert!(is_plain_file_name("foo.h"));
        assert!(is_plain_file_name("stb_image.hpp"));
        assert!(!is_plain_file_name("../foo.h"));
        assert!(!is_plain_file_name("dir/foo.h"));
        assert!(!is_plain_file_name("dir\\foo.h"));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name("."));
        assert!(!is_plain_file_name(MANIFEST_FILE_NAME));
    }
}
