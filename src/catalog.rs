use std::collections::{BTreeMap, HashMap};
use serde::Deserialize;
use tracing::{info, warn};
use crate::error::{GistError, GistResult};
use crate::fetch::Fetcher;

/// One gist as returned by the GitHub listing endpoint.
///
/// A gist groups one or more files that share a single `updated_at` marker.
#[derive(Debug, Deserialize)]
pub struct GistListing {
    /// Clone URL of the gist. Not used for syncing.
    #[serde(default)]
    pub git_pull_url: Option<String>,
    /// Last-modified marker shared by every file in the gist.
    pub updated_at: String,
    /// Files keyed by file name. Ordered, so the first key is the
    /// lexically-first file name.
    pub files: BTreeMap<String, GistFile>,
}

/// A single file inside a gist.
#[derive(Debug, Deserialize)]
pub struct GistFile {
    /// URL serving the raw file content.
    pub raw_url: String,
}

/// How the files of a multi-file gist are indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupPolicy {
    /// Only the lexically-first file of each gist is addressable.
    ///
    /// Gists used as includes are expected to hold exactly one file; extra
    /// files are ignored.
    #[default]
    FirstFileOnly,
    /// Every file of a gist is addressable under its own name.
    AllFiles,
}

/// A resolved artifact: where to fetch it and which version it is at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub identifier: String,
    pub content_url: String,
    pub version_marker: String,
}

/// Identifier to [`CatalogEntry`] mapping for one run. Never persisted.
#[derive(Debug, Default)]
pub struct Catalog {
    entries: HashMap<String, CatalogEntry>,
}

impl Catalog {
    /// Builds a catalog from parsed listings.
    ///
    /// When two gists expose the same file name the later one in the listing
    /// wins. Gists without files are skipped.
    pub fn from_listings(listings: Vec<GistListing>, policy: GroupPolicy) -> Self {
        let mut entries = HashMap::new();
        for listing in listings {
            let take = match policy {
                GroupPolicy::FirstFileOnly => 1,
                GroupPolicy::AllFiles => listing.files.len(),
            };
            for (name, file) in listing.files.into_iter().take(take) {
                let entry = CatalogEntry {
                    identifier: name.clone(),
                    content_url: file.raw_url,
                    version_marker: listing.updated_at.clone(),
                };
                entries.insert(name, entry);
            }
        }
        Catalog { entries }
    }

    /// Parses a listing document (a JSON array of gists).
    pub fn parse(body: &str, policy: GroupPolicy) -> GistResult<Self> {
        let listings: Vec<GistListing> =
            serde_json::from_str(body).map_err(|source| GistError::Malformed {
                document: "gist listing".to_string(),
                source,
            })?;
        Ok(Self::from_listings(listings, policy))
    }

    pub fn get(&self, identifier: &str) -> Option<&CatalogEntry> {
        self.entries.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the required identifiers that the catalog does not know,
    /// preserving the order of `required`.
    pub fn missing<'a>(&self, required: &'a [String]) -> Vec<&'a str> {
        required
            .iter()
            .filter(|id| !self.entries.contains_key(id.as_str()))
            .map(String::as_str)
            .collect()
    }
}

/// Fetches the listing at `url` once and builds the catalog.
///
/// Identifiers from `required` that are not published are reported as
/// warnings; they are not an error.
///
/// # Errors
///
/// Any transport failure or an unparseable listing aborts the run. There is
/// no fallback to a partial catalog.
pub fn resolve_catalog<F: Fetcher + ?Sized>(
    fetcher: &F,
    url: &str,
    policy: GroupPolicy,
    required: &[String],
) -> GistResult<Catalog> {
    let body = fetcher.fetch_listing(url).map_err(|e| GistError::Fetch {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let catalog = Catalog::parse(&body, policy)?;
    info!("catalog lists {} gist file(s)", catalog.len());

    for identifier in catalog.missing(required) {
        warn!("{} not in catalog", identifier);
    }
    Ok(catalog)
}
