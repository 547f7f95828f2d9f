//! Source root resolution
//!
//! Turns configured and host-registered source directories into the ordered list of
//! existing, canonical directories that the file matcher scans. Directories that do
//! not exist are dropped silently: a project without Yeti sources is valid.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Canonicalize a path, falling back to the absolute (non symlink-resolved) path when
/// canonicalization fails, e.g. because the path does not exist.
pub fn normalize(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| absolute(path))
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Keep the candidates that exist on disk, normalized, each canonical path once.
/// Order of first appearance is preserved.
pub fn existing_roots<P: AsRef<Path>>(candidates: &[P]) -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let root = normalize(candidate.as_ref());
        if !root.exists() {
            debug!("Skipping missing source directory {}", root.display());
            continue;
        }
        if !roots.contains(&root) {
            roots.push(root);
        }
    }
    roots
}

/// Resolve the directories to scan from the host's registered source roots plus the
/// primary Yeti source directory, which is appended when the host does not already
/// know about it.
pub fn locate_source_roots(primary: &Path, registered: &[PathBuf]) -> Vec<PathBuf> {
    let primary = normalize(primary);
    let mut candidates = registered.to_vec();
    if !registered.iter().any(|root| normalize(root) == primary) {
        candidates.push(primary);
    }
    existing_roots(&candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_falls_back_to_absolute_path_for_missing_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("does-not-exist");

        let normalized = normalize(&missing);

        assert!(normalized.is_absolute());
        assert!(normalized.ends_with("does-not-exist"));
    }

    #[test]
    fn duplicate_canonical_paths_are_kept_once() {
        let temp_dir = tempfile::tempdir().unwrap();
        let yeti = temp_dir.path().join("src/main/yeti");
        std::fs::create_dir_all(&yeti).unwrap();
        let detour = temp_dir.path().join("src/main/java/../yeti");
        std::fs::create_dir_all(temp_dir.path().join("src/main/java")).unwrap();

        let roots = existing_roots(&[yeti.clone(), detour]);

        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0], yeti.canonicalize().unwrap());
    }

    #[test]
    fn missing_directories_are_dropped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let present = temp_dir.path().join("present");
        std::fs::create_dir_all(&present).unwrap();

        let roots = existing_roots(&[temp_dir.path().join("absent"), present.clone()]);

        assert_eq!(roots, vec![present.canonicalize().unwrap()]);
    }

    #[test]
    fn primary_directory_is_appended_after_registered_roots() {
        let temp_dir = tempfile::tempdir().unwrap();
        let java = temp_dir.path().join("src/main/java");
        let yeti = temp_dir.path().join("src/main/yeti");
        std::fs::create_dir_all(&java).unwrap();
        std::fs::create_dir_all(&yeti).unwrap();

        let roots = locate_source_roots(&yeti, &[java.clone()]);

        assert_eq!(
            roots,
            vec![java.canonicalize().unwrap(), yeti.canonicalize().unwrap()]
        );
    }

    #[test]
    fn primary_directory_already_registered_is_not_repeated() {
        let temp_dir = tempfile::tempdir().unwrap();
        let yeti = temp_dir.path().join("src/main/yeti");
        std::fs::create_dir_all(&yeti).unwrap();

        let roots = locate_source_roots(&yeti, &[yeti.canonicalize().unwrap()]);

        assert_eq!(roots.len(), 1);
    }

    #[test]
    fn project_without_sources_yields_no_roots() {
        let temp_dir = tempfile::tempdir().unwrap();
        let roots = locate_source_roots(&temp_dir.path().join("src/main/yeti"), &[]);
        assert!(roots.is_empty());
    }
}
