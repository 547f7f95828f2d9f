//! Include/exclude matching of source files under one or more roots
//!
//! Patterns use glob semantics where `*` stays within a path segment and `**` spans
//! segments. Results are sorted globally so that the compiler sees files in the same
//! order on every run.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::debug;

use crate::types::{YetiError, YetiResult};

/// Pattern substituted when no include pattern is configured
pub const DEFAULT_INCLUDE_GLOB: &str = "**/*.yeti";

/// The include and exclude patterns of one goal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFilter {
    includes: Vec<String>,
    excludes: Vec<String>,
}

impl SourceFilter {
    pub fn new(includes: Vec<String>, excludes: Vec<String>) -> Self {
        let mut filter = Self { includes, excludes };
        filter.prepare_includes();
        filter
    }

    /// Substitute the default include when none was given. Calling it again is a no-op.
    pub fn prepare_includes(&mut self) {
        if self.includes.is_empty() {
            self.includes.push(DEFAULT_INCLUDE_GLOB.to_string());
        }
    }

    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    fn compile(&self) -> YetiResult<CompiledFilter> {
        Ok(CompiledFilter {
            includes: build_glob_set(&self.includes)?,
            excludes: build_glob_set(&self.excludes)?,
        })
    }
}

struct CompiledFilter {
    includes: GlobSet,
    excludes: GlobSet,
}

impl CompiledFilter {
    fn is_match(&self, relative_path: &Path) -> bool {
        self.includes.is_match(relative_path) && !self.excludes.is_match(relative_path)
    }
}

fn build_glob_set(patterns: &[String]) -> YetiResult<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        // A trailing separator means "everything below this directory"
        let pattern = if pattern.ends_with('/') {
            format!("{}**", pattern)
        } else {
            pattern.clone()
        };
        let glob = GlobBuilder::new(&pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| YetiError::Pattern(format!("'{}': {}", pattern, e)))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| YetiError::Pattern(e.to_string()))
}

/// A matched source file
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceFile {
    /// Path relative to `root`, always `/`-separated
    pub relative: String,
    /// The source root the file was found under
    pub root: PathBuf,
}

impl SourceFile {
    pub fn full_path(&self) -> PathBuf {
        self.root.join(&self.relative)
    }
}

/// Files under `root` matching `filter`, sorted by relative path.
///
/// Symlinked directories are followed unless they lead back into a directory already
/// scanned, so link cycles terminate.
pub fn find_files(root: &Path, filter: &SourceFilter) -> YetiResult<Vec<SourceFile>> {
    let compiled = filter.compile()?;
    let mut files = scan_root(root, &compiled);
    files.sort();
    Ok(files)
}

/// Match files under every root and merge them into one sorted list.
///
/// Files are re-checked for existence when matched; a file deleted while the scan
/// runs is skipped. A file reachable under two roots appears twice.
pub fn match_sources(roots: &[PathBuf], filter: &SourceFilter) -> YetiResult<Vec<SourceFile>> {
    let mut files = Vec::new();
    for root in roots {
        files.extend(find_files(root, filter)?);
    }
    files.sort();
    Ok(files)
}

fn scan_root(root: &Path, filter: &CompiledFilter) -> Vec<SourceFile> {
    let mut files = Vec::new();
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    if let Ok(canonical_root) = root.canonicalize() {
        visited.insert(canonical_root);
    }
    queue.push_back(root.to_path_buf());

    while let Some(current_dir) = queue.pop_front() {
        let Ok(entries) = std::fs::read_dir(&current_dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };

            if file_type.is_dir() {
                if let Ok(canonical) = path.canonicalize() {
                    visited.insert(canonical);
                }
                queue.push_back(path);
                continue;
            }
            if file_type.is_symlink() && path.is_dir() {
                match path.canonicalize() {
                    Ok(canonical) if visited.insert(canonical.clone()) => queue.push_back(path),
                    _ => debug!("Not following {}, already scanned", path.display()),
                }
                continue;
            }

            let Ok(relative_path) = path.strip_prefix(root) else {
                continue;
            };
            if !filter.is_match(relative_path) || !path.exists() {
                continue;
            }

            files.push(SourceFile {
                relative: to_slash(relative_path),
                root: root.to_path_buf(),
            });
        }
    }

    files
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
