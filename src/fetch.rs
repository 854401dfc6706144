use std::fs::File;
use std::path::Path;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use thiserror::Error;
use tracing::debug;

/// Media type the GitHub REST API expects for the gist listing.
pub const GITHUB_JSON: &str = "application/vnd.github.v3+json";

/// Failure of a single transfer.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(String),
}

/// The transport used to talk to the gist service.
///
/// Everything the sync run needs from the network goes through this trait so
/// the engine can be driven by an in-memory implementation in tests.
pub trait Fetcher {
    /// Fetches the listing document at `url` as text.
    fn fetch_listing(&self, url: &str) -> Result<String, FetchError>;

    /// Downloads `url` into `dest`, replacing whatever is there.
    ///
    /// Returns the number of bytes written. On failure `dest` may be left
    /// truncated; callers rely on the manifest to retry it later.
    fn download(&self, url: &str, dest: &Path) -> Result<u64, FetchError>;
}

/// [`Fetcher`] backed by a blocking `reqwest` client.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("gisthook/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_listing(&self, url: &str) -> Result<String, FetchError> {
        debug!("GET {}", url);
        let resp = self
            .client
            .get(url)
            .header(ACCEPT, GITHUB_JSON)
            .send()?
            .error_for_status()?;
        Ok(resp.text()?)
    }

    fn download(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        debug!("GET {} -> {}", url, dest.display());
        let mut resp = self.client.get(url).send()?.error_for_status()?;
        let mut file = File::create(dest)?;
        let written = resp.copy_to(&mut file)?;
        file.sync_all()?;
        Ok(written)
    }
}
