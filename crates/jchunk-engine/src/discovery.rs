//! Java source discovery.

use regex::Regex;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("project path does not exist: {}", .0.display())]
    NotFound(PathBuf),
    #[error("project path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("failed to walk {}: {source}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: ignore::Error,
    },
}

/// Which files a run looks at.
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
    excluded_dirs: Vec<String>,
}

impl FileFilter {
    /// Compile include/exclude patterns. Each pattern must match the whole path string.
    pub fn new(
        include: &[String],
        exclude: &[String],
        excluded_dirs: &[String],
    ) -> Result<Self, DiscoveryError> {
        Ok(Self {
            include: compile_all(include)?,
            exclude: compile_all(exclude)?,
            excluded_dirs: excluded_dirs.to_vec(),
        })
    }

    /// Include patterns empty means everything is included.
    pub fn accepts(&self, path: &Path) -> bool {
        let text = path.to_string_lossy();
        if !self.include.is_empty() && !self.include.iter().any(|re| re.is_match(&text)) {
            return false;
        }
        !self.exclude.iter().any(|re| re.is_match(&text))
    }

    fn prunes(&self, dir_name: &str) -> bool {
        self.excluded_dirs.iter().any(|d| d == dir_name)
    }
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>, DiscoveryError> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(&format!("^(?:{p})$")).map_err(|source| DiscoveryError::Pattern {
                pattern: p.clone(),
                source,
            })
        })
        .collect()
}

fn is_java_file(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "java")
}

/// All `.java` files under `root` accepted by `filter`, sorted by path within each
/// directory.
pub fn find_java_files(root: &Path, filter: &FileFilter) -> Result<Vec<PathBuf>, DiscoveryError> {
    if !root.exists() {
        return Err(DiscoveryError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(DiscoveryError::NotADirectory(root.to_path_buf()));
    }

    let pruning = filter.clone();
    let walker = ignore::WalkBuilder::new(root)
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            // never prune the root itself
            if !is_dir || entry.depth() == 0 {
                return true;
            }
            !pruning.prunes(&entry.file_name().to_string_lossy())
        })
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| DiscoveryError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !entry.file_type().is_some_and(|t| t.is_file()) || !is_java_file(path) {
            continue;
        }
        if filter.accepts(path) {
            files.push(path.to_path_buf());
        }
    }
    tracing::debug!("discovered {} Java files under {}", files.len(), root.display());
    Ok(files)
}
