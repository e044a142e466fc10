use super::FanartError;
use globset::{GlobBuilder, GlobMatcher};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Filesystem access used by the fanart cache.
pub trait FanartDiscovery: Send + Sync {
    /// Files under `root` whose name matches the glob `pattern`, sorted by
    /// path. A missing root yields an empty list.
    fn list_files(
        &self,
        root: &Path,
        pattern: &str,
        recursive: bool,
    ) -> Result<Vec<PathBuf>, FanartError>;

    fn exists(&self, path: &Path) -> bool;

    fn delete(&self, path: &Path) -> Result<(), FanartError>;
}

pub struct LocalFilesystem;

fn file_name_matcher(pattern: &str) -> Result<GlobMatcher, FanartError> {
    Ok(GlobBuilder::new(pattern)
        .case_insensitive(true)
        .literal_separator(true)
        .build()?
        .compile_matcher())
}

impl FanartDiscovery for LocalFilesystem {
    fn list_files(
        &self,
        root: &Path,
        pattern: &str,
        recursive: bool,
    ) -> Result<Vec<PathBuf>, FanartError> {
        if !root.is_dir() {
            return Ok(Vec::new());
        }
        let matcher = file_name_matcher(pattern)?;
        let max_depth = if recursive { usize::MAX } else { 1 };

        let mut files = Vec::new();
        for entry in WalkDir::new(root).max_depth(max_depth) {
            let entry = entry?;
            if entry.file_type().is_file() && matcher.is_match(entry.file_name()) {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn delete(&self, path: &Path) -> Result<(), FanartError> {
        std::fs::remove_file(path).map_err(|source| FanartError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
