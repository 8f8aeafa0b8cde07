//! Copying of images and static files, and cleaning of the output directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, info};

/// Asset copy errors.
#[derive(Debug, Error)]
pub enum AssetError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid asset path.
    #[error("invalid asset path: {0}")]
    InvalidPath(PathBuf),

    /// Invalid glob pattern.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Unreadable glob match.
    #[error("glob error: {0}")]
    Glob(#[from] glob::GlobError),
}

/// Result type for asset operations.
pub type Result<T> = std::result::Result<T, AssetError>;

/// Copies asset trees and pattern-selected files into the output.
#[derive(Debug, Default)]
pub struct AssetCopier {
    /// Whether dot-files are copied too.
    include_hidden: bool,
}

impl AssetCopier {
    /// Create a copier that skips hidden files.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy hidden files and directories as well.
    #[must_use]
    pub fn with_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    /// Copy every file under `source_dir` to `dest_dir`, preserving structure.
    ///
    /// A missing source directory copies nothing.
    pub fn copy_tree(&self, source_dir: &Path, dest_dir: &Path) -> Result<usize> {
        info!(
            source = %source_dir.display(),
            dest = %dest_dir.display(),
            "copying assets"
        );

        if !source_dir.exists() {
            debug!("source directory does not exist, skipping");
            return Ok(0);
        }

        let count = self.copy_dir(source_dir, source_dir, dest_dir)?;

        info!(count, "assets copied");
        Ok(count)
    }

    /// Copy the files under `base` matched by any of `patterns` to `dest_base`,
    /// keeping their path relative to `base`. Files matched twice are copied once.
    pub fn copy_matching(&self, base: &Path, patterns: &[String], dest_base: &Path) -> Result<usize> {
        let mut copied: Vec<PathBuf> = Vec::new();

        for pattern in patterns {
            for entry in glob::glob(&pattern_under(base, pattern))? {
                let path = entry?;
                if !path.is_file() || copied.contains(&path) || self.is_skipped(&path) {
                    continue;
                }

                let relative = path
                    .strip_prefix(base)
                    .map_err(|_| AssetError::InvalidPath(path.clone()))?;
                copy_file(&path, &dest_base.join(relative))?;
                debug!(src = %path.display(), "copied static file");
                copied.push(path);
            }
        }

        info!(count = copied.len(), "static files copied");
        Ok(copied.len())
    }

    /// Recursively copy a directory.
    fn copy_dir(&self, base_dir: &Path, current_dir: &Path, dest_base: &Path) -> Result<usize> {
        let mut count = 0;

        for entry in fs::read_dir(current_dir)? {
            let entry = entry?;
            let path = entry.path();

            if self.is_skipped(&path) {
                continue;
            }

            if path.is_dir() {
                count += self.copy_dir(base_dir, &path, dest_base)?;
            } else if path.is_file() {
                let relative = path
                    .strip_prefix(base_dir)
                    .map_err(|_| AssetError::InvalidPath(path.clone()))?;
                let dest_path = dest_base.join(relative);
                copy_file(&path, &dest_path)?;

                debug!(
                    src = %path.display(),
                    dest = %dest_path.display(),
                    "copied asset"
                );
                count += 1;
            }
        }

        Ok(count)
    }

    fn is_skipped(&self, path: &Path) -> bool {
        !self.include_hidden
            && path
                .file_name()
                .is_some_and(|n| n.to_string_lossy().starts_with('.'))
    }
}

/// `pattern` anchored at the literal directory `base`.
///
/// Glob metacharacters in `base` are escaped so they match themselves.
#[must_use]
pub fn pattern_under(base: &Path, pattern: &str) -> String {
    let base = glob::Pattern::escape(&base.to_string_lossy());
    Path::new(&base).join(pattern).to_string_lossy().into_owned()
}

/// Copy a single file, creating parent directories.
pub fn copy_file(source: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, dest)?;
    Ok(())
}

/// Write `contents` to `dest`, creating parent directories.
pub fn write_file(dest: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(dest, contents)?;
    Ok(())
}

/// Remove everything inside `dir` but keep the directory itself.
///
/// Returns the number of top-level entries removed. A missing directory is created.
pub fn clean_dir(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
        removed += 1;
    }

    debug!(dir = %dir.display(), removed, "cleaned directory");
    Ok(removed)
}
