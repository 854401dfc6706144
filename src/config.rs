use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::catalog::GroupPolicy;
use crate::error::{GistError, GistResult};
use crate::manifest::MANIFEST_FILE_NAME;
use crate::sync::FailureMode;

/// Name of the optional per-project configuration file.
pub const CONFIG_FILE_NAME: &str = "gisthook.toml";

/// Account whose gists are listed when nothing else is configured.
pub const DEFAULT_USER: &str = "BluBloos";

/// Contents of `gisthook.toml`. Every field is optional.
///
/// ```toml
/// [catalog]
/// user = "octocat"
/// expand_groups = false
///
/// [scan]
/// dirs = ["src", "include"]
/// exclude = ["src/third_party"]
///
/// [sync]
/// fail_fast = false
/// ```
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GistConfig {
    pub catalog: CatalogConfig,
    pub scan: ScanConfig,
    pub sync: SyncConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// GitHub user whose public gists form the catalog.
    pub user: String,
    /// Full listing URL. Takes precedence over `user`.
    pub listing_url: Option<String>,
    /// Index every file of a multi-file gist instead of only the first.
    pub expand_groups: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            user: DEFAULT_USER.to_string(),
            listing_url: None,
            expand_groups: false,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Directories to scan, relative to the project root.
    pub dirs: Vec<PathBuf>,
    /// Directories to skip, relative to the project root.
    pub exclude: Vec<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            dirs: vec![PathBuf::from("src"), PathBuf::from("include")],
            exclude: Vec::new(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Abort on the first failed download.
    pub fail_fast: bool,
}

impl GistConfig {
    /// Loads `gisthook.toml` from `root`, or the defaults if there is none.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(root: P) -> GistResult<GistConfig> {
        let path = root.as_ref().join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(GistConfig::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|e| GistError::io(&path, e))?;
        toml::from_str(&content).map_err(|source| GistError::Config { path, source })
    }

    pub fn listing_url(&self) -> String {
        match &self.catalog.listing_url {
            Some(url) => url.clone(),
            None => listing_url_for(&self.catalog.user),
        }
    }

    pub fn group_policy(&self) -> GroupPolicy {
        if self.catalog.expand_groups {
            GroupPolicy::AllFiles
        } else {
            GroupPolicy::FirstFileOnly
        }
    }

    pub fn failure_mode(&self) -> FailureMode {
        if self.sync.fail_fast {
            FailureMode::FailFast
        } else {
            FailureMode::Continue
        }
    }
}

/// The GitHub API endpoint listing the public gists of `user`.
pub fn listing_url_for(user: &str) -> String {
    format!("https://api.github.com/users/{}/gists", user)
}

/// Where a project's sources, cache and manifest live.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub root: PathBuf,
    pub scan_roots: Vec<PathBuf>,
    pub exclude: Vec<PathBuf>,
    pub cache_dir: PathBuf,
    pub manifest_path: PathBuf,
}

impl Layout {
    /// Derives the layout of `root`: sources are scanned under the configured
    /// directories and gists are cached in `root/gist/github`.
    pub fn new<P: AsRef<Path>>(root: P, scan: &ScanConfig) -> Layout {
        let root = root.as_ref().to_path_buf();
        let cache_dir = root.join("gist").join("github");
        Layout {
            scan_roots: scan.dirs.iter().map(|d| root.join(d)).collect(),
            exclude: scan.exclude.iter().map(|d| root.join(d)).collect(),
            manifest_path: cache_dir.join(MANIFEST_FILE_NAME),
            cache_dir,
            root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_config_file() {
        let dir = tempdir().unwrap();
        let config = GistConfig::load(dir.path()).unwrap();
        assert_eq!(config, GistConfig::default());
        assert_eq!(config.listing_url(), "https://api.github.com/users/BluBloos/gists");
        assert_eq!(config.group_policy(), GroupPolicy::FirstFileOnly);
        assert_eq!(config.failure_mode(), FailureMode::Continue);
    }

    #[test]
    fn test_partial_config_file() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[catalog]\nuser = \"octocat\"\n\n[scan]\nexclude = [\"src/vendor\"]\n",
        )
        .unwrap();
        let config = GistConfig::load(dir.path()).unwrap();
        assert_eq!(config.listing_url(), "https://api.github.com/users/octocat/gists");
        assert_eq!(config.scan.dirs, ScanConfig::default().dirs);
        assert_eq!(config.scan.exclude, vec![PathBuf::from("src/vendor")]);
    }

    #[test]
    fn test_listing_url_overrides_user() {
        let mut config = GistConfig::default();
        config.catalog.listing_url = Some("http://127.0.0.1:9/gists".to_string());
        assert_eq!(config.listing_url(), "http://127.0.0.1:9/gists");
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[catalog]\nusr = 1\n").unwrap();
        let err = GistConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, GistError::Config { .. }));
    }

    #[test]
    fn test_layout_paths() {
        let layout = Layout::new("/proj", &ScanConfig::default());
        assert_eq!(
            layout.scan_roots,
            vec![PathBuf::from("/proj/src"), PathBuf::from("/proj/include")]
        );
        assert_eq!(layout.cache_dir, PathBuf::from("/proj/gist/github"));
        assert_eq!(layout.manifest_path, PathBuf::from("/proj/gist/github/desc.json"));
    }
}
