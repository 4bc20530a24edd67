use crate::utils::normalize_path;
use glob::Pattern;
use std::path::{Component, Path};
use tracing::{debug, warn};

pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    "node_modules",
    ".git",
    ".vscode",
    ".venv",
    "venv",
    "env",
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    ".tox",
    ".coverage",
    ".cache",
    ".vs",
    ".idea",
    ".history",
    ".next",
    ".gradle",
    ".ipynb_checkpoints",
    // Build output
    "build",
    "dist",
    "bin",
    "obj",
    "packages",
    "lib",
    "include",
    "target",
    "out",
    // Scratch directories
    "backup",
    "temp",
    "tmp",
    "logs",
    "test",
    "downloads",
    "releases",
    // Binaries and packages
    "*.pyc",
    "*.pkl",
    "*.exe",
    "*.dll",
    "*.so",
    "*.dylib",
    "*.whl",
    "*.egg",
    "*.egg-info",
    // Locks, logs, editor leftovers
    "*.lock",
    "*.log",
    "*.bak",
    "*.old",
    "*.tmp",
    "*.swp",
    "*.swo",
    "*.swn",
    // Archives
    "*.zip",
    "*.tar",
    "*.gz",
    "*.tgz",
    "*.bz2",
    "*.xz",
    "*.7z",
    "*.rar",
];

/// True when `pattern` matches the whole normalized path or any one of its
/// normal components.
pub fn matches<P: AsRef<Path>>(path: P, pattern: &Pattern) -> bool {
    let path = path.as_ref();
    if pattern.matches(&normalize_path(path)) {
        return true;
    }
    path.components().any(|component| match component {
        Component::Normal(name) => pattern.matches(&name.to_string_lossy()),
        _ => false,
    })
}

/// Compiled exclusion patterns: the defaults followed by user patterns.
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    sources: Vec<String>,
    patterns: Vec<Pattern>,
}

impl ExclusionSet {
    pub fn new(user_patterns: &[String]) -> Self {
        let sources: Vec<String> = DEFAULT_EXCLUSIONS
            .iter()
            .map(|s| s.to_string())
            .chain(user_patterns.iter().cloned())
            .collect();
        Self::from_patterns(sources)
    }

    /// Builds a set from exactly the given patterns, without the defaults.
    pub fn from_patterns(sources: Vec<String>) -> Self {
        let mut kept = Vec::with_capacity(sources.len());
        let mut patterns = Vec::with_capacity(sources.len());
        for source in sources {
            if kept.contains(&source) {
                continue;
            }
            match Pattern::new(&source) {
                Ok(pattern) => {
                    patterns.push(pattern);
                    kept.push(source);
                }
                Err(e) => warn!("Invalid exclusion pattern '{}': {}", source, e),
            }
        }

        debug!("Using exclusion patterns: {:?}", kept);

        ExclusionSet {
            sources: kept,
            patterns,
        }
    }

    pub fn is_excluded<P: AsRef<Path>>(&self, path: P) -> bool {
        let path = path.as_ref();
        self.patterns.iter().any(|pattern| matches(path, pattern))
    }

    pub fn patterns(&self) -> &[String] {
        &self.sources
    }
}
