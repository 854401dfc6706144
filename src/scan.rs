use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;
use crate::error::{GistError, GistResult};
use crate::extract::extract_references;

/// Checks that every scan root exists and is a directory.
///
/// Run this before touching the network so a bad root aborts early.
pub fn validate_roots(roots: &[PathBuf]) -> GistResult<()> {
    for root in roots {
        if !root.is_dir() {
            return Err(GistError::MissingRoot(root.clone()));
        }
    }
    Ok(())
}

/// Walks every root recursively and collects the gist identifiers referenced
/// by any regular file, de-duplicated in first-seen order.
///
/// Directories listed in `exclude` are skipped together with their contents.
/// Symlinks to files and directories are followed; a symlink loop is a walk
/// error. Entries are visited in file-name order so the result is stable
/// between runs.
///
/// # Errors
///
/// A missing root, a failed directory read, or an unreadable file aborts the
/// whole scan.
pub fn scan_tree(roots: &[PathBuf], exclude: &[PathBuf]) -> GistResult<Vec<String>> {
    validate_roots(roots)?;
    info!("scanning source in {:?}", roots);

    let mut seen = HashSet::new();
    let mut required = Vec::new();
    for root in roots {
        let walker = WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_excluded(entry.path(), exclude));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            for identifier in scan_file(entry.path())? {
                if seen.insert(identifier.clone()) {
                    required.push(identifier);
                }
            }
        }
    }

    info!("generated download list of {:?}", required);
    Ok(required)
}

/// Reads one file and extracts its references.
///
/// Bytes that are not valid UTF-8 are replaced, so binary files in the tree
/// simply yield nothing.
pub fn scan_file(path: &Path) -> GistResult<Vec<String>> {
    let bytes = std::fs::read(path).map_err(|e| GistError::io(path, e))?;
    let refs = extract_references(&String::from_utf8_lossy(&bytes));
    if !refs.is_empty() {
        debug!("{} references {:?}", path.display(), refs);
    }
    Ok(refs)
}

fn is_excluded(path: &Path, exclude: &[PathBuf]) -> bool {
    exclude.iter().any(|ex| ex == path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("src");
        let err = scan_tree(&[missing.clone()], &[]).unwrap_err();
        assert!(matches!(err, GistError::MissingRoot(p) if p == missing));
    }

    #[test]
    fn test_duplicates_across_files_appear_once() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let include = dir.path().join("include");
        fs::create_dir_all(src.join("nested")).unwrap();
        fs::create_dir_all(&include).unwrap();
        fs::write(src.join("a.cpp"), "#include <gist/github/foo.h>\n").unwrap();
        fs::write(src.join("nested").join("b.cpp"), "#include <gist/github/bar.h>\n#include <gist/github/foo.h>\n").unwrap();
        fs::write(include.join("c.h"), "#include <gist/github/foo.h>\n").unwrap();

        let required = scan_tree(&[src, include], &[]).unwrap();
        assert_eq!(required, vec!["foo.h", "bar.h"]);
    }

    #[test]
    fn test_excluded_directory_is_skipped() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let vendor = src.join("vendor");
        fs::create_dir_all(&vendor).unwrap();
        fs::write(src.join("main.cpp"), "#include <gist/github/keep.h>").unwrap();
        fs::write(vendor.join("third.cpp"), "#include <gist/github/skip.h>").unwrap();

        let required = scan_tree(&[src], &[vendor]).unwrap();
        assert_eq!(required, vec!["keep.h"]);
    }

    #[test]
    fn test_non_utf8_file_does_not_abort() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("blob.bin"), [0xff, 0xfe, 0x00, 0x80]).unwrap();
        fs::write(src.join("main.cpp"), "#include <gist/github/x.h>").unwrap();

        assert_eq!(scan_tree(&[src], &[]).unwrap(), vec!["x.h"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_files_and_dirs_are_scanned() {
        use std::os::unix::fs::symlink;
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let shared = dir.path().join("shared");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(shared.join("more")).unwrap();
        fs::write(shared.join("common.h"), "#include <gist/github/linked.h>\n").unwrap();
        fs::write(shared.join("more").join("deep.h"), "#include <gist/github/deep.h>\n").unwrap();
        fs::write(src.join("main.cpp"), "#include <gist/github/direct.h>\n").unwrap();
        symlink(shared.join("common.h"), src.join("common.h")).unwrap();
        symlink(shared.join("more"), src.join("linked_dir")).unwrap();

        let required = scan_tree(&[src], &[]).unwrap();
        assert_eq!(required, vec!["linked.h", "deep.h", "direct.h"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_loop_is_an_error() {
        use std::os::unix::fs::symlink;
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(&src).unwrap();
        symlink(&src, src.join("self")).unwrap();

        let err = scan_tree(&[src], &[]).unwrap_err();
        assert!(matches!(err, GistError::Walk(_)));
    }

    #[test]
    fn test_empty_tree_yields_nothing() {
        let dir = tempdir().unwrap();
        assert!(scan_tree(&[dir.path().to_path_buf()], &[]).unwrap().is_empty());
    }
}
