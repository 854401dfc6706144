use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;
use crate::error::{GistError, GistResult};

/// File name of the manifest inside the cache directory.
pub const MANIFEST_FILE_NAME: &str = "desc.json";

/// The version of one identifier that was last synced successfully.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub updated_at: String,
}

/// The persisted document: identifier -> [`ManifestEntry`].
///
/// Serialized as a bare JSON object, e.g.
/// `{"foo.h": {"updated_at": "2024-01-01T00:00:00Z"}}`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct ManifestDocument {
    pub entries: BTreeMap<String, ManifestEntry>,
}

impl ManifestDocument {
    pub fn get(&self, identifier: &str) -> Option<&ManifestEntry> {
        self.entries.get(identifier)
    }
}

/// Handle on the manifest of one cache directory.
///
/// The sync engine owns this for the length of a run. Entries are never
/// removed, so identifiers that stop being referenced linger in the document.
///
/// There is no locking: two runs against the same cache race and the last
/// writer wins.
#[derive(Debug)]
pub struct CacheManifest {
    path: PathBuf,
    document: ManifestDocument,
}

impl CacheManifest {
    /// Loads the manifest at `path`, creating its parent directories and an
    /// empty document first if they are missing.
    ///
    /// # Errors
    ///
    /// Fails if the directories or file cannot be created or read, or if the
    /// existing document is not a valid manifest.
    pub fn load<P: AsRef<Path>>(path: P) -> GistResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| GistError::io(parent, e))?;
        }
        if !path.exists() {
            debug!("initializing empty manifest at {}", path.display());
            write_document(&path, &ManifestDocument::default())?;
        }
        let document = read_document(&path)?;
        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The document as last loaded or written.
    pub fn document(&self) -> &ManifestDocument {
        &self.document
    }

    /// True if `identifier` has never been synced, or was synced at a version
    /// other than `remote_version`. Versions are compared as exact strings.
    pub fn is_stale(&self, identifier: &str, remote_version: &str) -> bool {
        match self.document.get(identifier) {
            Some(entry) => entry.updated_at != remote_version,
            None => true,
        }
    }

    /// Records `identifier` as synced at `new_version`.
    ///
    /// The document is re-read from disk, the entry inserted or overwritten,
    /// and the whole document written back before returning, so the file on
    /// disk always reflects every update made so far.
    pub fn update(&mut self, identifier: &str, new_version: &str) -> GistResult<()> {
        let mut document = read_document(&self.path)?;
        document.entries.insert(
            identifier.to_string(),
            ManifestEntry {
                updated_at: new_version.to_string(),
            },
        );
        write_document(&self.path, &document)?;
        self.document = document;
        Ok(())
    }
}

fn read_document(path: &Path) -> GistResult<ManifestDocument> {
    let content = fs::read_to_string(path).map_err(|e| GistError::io(path, e))?;
    serde_json::from_str(&content).map_err(|source| GistError::Malformed {
        document: format!("manifest {}", path.display()),
        source,
    })
}

/// Writes to a sibling temp file and renames it over `path`.
fn write_document(path: &Path, document: &ManifestDocument) -> GistResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let content = serde_json::to_string_pretty(document).map_err(|source| GistError::Malformed {
        document: format!("manifest {}", path.display()),
        source,
    })?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| GistError::io(dir, e))?;
    tmp.write_all(content.as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| GistError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| GistError::io(path, e.error))?;
    Ok(())
}
