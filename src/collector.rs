use crate::errors::CollyError;
use crate::ignore::ExclusionSet;
use crate::utils::{has_glob_metachars, normalize_path};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};
use walkdir::WalkDir;

/// Expands patterns and directories into an ordered, deduplicated file list.
///
/// Exclusions are matched against each path relative to the root the user
/// named, so the ancestors of that root never exclude it.
pub struct FileCollector<'a> {
    exclusions: &'a ExclusionSet,
    follow_symlinks: bool,
    strict: bool,
}

/// A file to load, with its path relative to the root the user named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedFile {
    pub path: PathBuf,
    pub relative: PathBuf,
}

/// Accumulates collected paths, dropping any already seen.
#[derive(Default)]
struct Collected {
    seen: HashSet<PathBuf>,
    files: Vec<CollectedFile>,
}

impl Collected {
    fn push(&mut self, path: PathBuf, relative: PathBuf) {
        let key = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
        if self.seen.insert(key) {
            trace!("Collected {}", path.display());
            self.files.push(CollectedFile { path, relative });
        } else {
            trace!("Skipping duplicate {}", path.display());
        }
    }
}

impl<'a> FileCollector<'a> {
    pub fn new(exclusions: &'a ExclusionSet, follow_symlinks: bool, strict: bool) -> Self {
        FileCollector {
            exclusions,
            follow_symlinks,
            strict,
        }
    }

    pub fn collect(&self, patterns: &[String]) -> Result<Vec<CollectedFile>, CollyError> {
        let mut collected = Collected::default();

        for pattern in patterns {
            let normalized = normalize_path(pattern);
            let normalized = if normalized.is_empty() {
                ".".to_string()
            } else {
                normalized
            };
            let path = Path::new(&normalized);
            debug!("Expanding pattern: {}", pattern);

            if path.is_dir() {
                self.walk_directory(path, path, &mut collected);
            } else if path.is_file() {
                self.add_explicit_file(path, &mut collected);
            } else if has_glob_metachars(&normalized) {
                self.expand_glob(&normalized, &mut collected)?;
            } else if self.strict {
                return Err(CollyError::CollectionError(format!(
                    "Path does not exist: {}",
                    pattern
                )));
            } else {
                warn!("Path does not exist, skipping: {}", pattern);
            }
        }

        if collected.files.is_empty() {
            return Err(CollyError::CollectionError(
                "No files matched the provided patterns".to_string(),
            ));
        }

        info!("Collected {} file(s)", collected.files.len());
        Ok(collected.files)
    }

    fn add_explicit_file(&self, path: &Path, collected: &mut Collected) {
        let name = path.file_name().map(PathBuf::from).unwrap_or_default();
        if self.exclusions.is_excluded(&name) {
            debug!("Excluded {}", path.display());
            return;
        }
        collected.push(path.to_path_buf(), name);
    }

    fn expand_glob(&self, pattern: &str, collected: &mut Collected) -> Result<(), CollyError> {
        let base = glob_base(pattern);
        let mut matched_any = false;

        for entry in glob::glob(pattern)? {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!("Error processing pattern {}: {}", pattern, e);
                    continue;
                }
            };
            matched_any = true;

            let relative = path.strip_prefix(&base).unwrap_or(&path).to_path_buf();
            if self.exclusions.is_excluded(&relative) {
                debug!("Excluded {}", path.display());
                continue;
            }
            if !self.follow_symlinks && is_symlink(&path) {
                debug!("Not following symlink {}", path.display());
                continue;
            }

            if path.is_dir() {
                self.walk_directory(&path, &base, collected);
            } else if path.is_file() {
                collected.push(path, relative);
            }
        }

        if !matched_any {
            warn!("No files matched pattern: {}", pattern);
        }
        Ok(())
    }

    /// Walks `root`, matching exclusions on paths relative to `base`.
    fn walk_directory(&self, root: &Path, base: &Path, collected: &mut Collected) {
        let walker = WalkDir::new(root)
            .follow_links(self.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let relative = entry.path().strip_prefix(base).unwrap_or(entry.path());
                let excluded = self.exclusions.is_excluded(relative);
                if excluded {
                    debug!("Excluded {}", entry.path().display());
                }
                !excluded
            });

        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_file() => {
                    let relative = relative_to(entry.path(), base);
                    collected.push(entry.into_path(), relative);
                }
                Ok(entry) if entry.path_is_symlink() && !self.follow_symlinks => {
                    debug!("Not following symlink {}", entry.path().display());
                }
                Ok(_) => {}
                Err(e) => warn!("Error walking {}: {}", root.display(), e),
            }
        }
    }
}

fn relative_to(path: &Path, base: &Path) -> PathBuf {
    match path.strip_prefix(base) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative.to_path_buf(),
        _ => path.file_name().map(PathBuf::from).unwrap_or_else(|| path.to_path_buf()),
    }
}

/// The leading components of a glob that contain no wildcard.
fn glob_base(pattern: &str) -> PathBuf {
    let mut base = PathBuf::new();
    for component in Path::new(pattern).components() {
        if has_glob_metachars(&component.as_os_str().to_string_lossy()) {
            break;
        }
        base.push(component);
    }
    base
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}
