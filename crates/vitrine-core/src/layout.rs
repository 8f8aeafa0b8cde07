//! Resolution of configured paths against a project root.

use std::path::{Component, Path, PathBuf};

use crate::{Config, CoreError, Result};

/// Absolute source and output directories of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
    source: PathBuf,
    output: PathBuf,
}

impl ProjectLayout {
    /// Resolve the configured directories against `root`.
    ///
    /// `.` and `..` components are folded away without touching the file system.
    pub fn new(root: impl Into<PathBuf>, config: &Config) -> Self {
        let root = root.into();
        let source = normalize(&root.join(&config.paths.source));
        let output = normalize(&root.join(&config.paths.output));
        Self {
            root,
            source,
            output,
        }
    }

    /// Check that cleaning the output directory cannot remove any source.
    ///
    /// Fails when the output directory is the source directory or one of its
    /// ancestors, the project root included.
    pub fn validate(&self) -> Result<()> {
        let source = normalize(&std::path::absolute(&self.source)?);
        let output = normalize(&std::path::absolute(&self.output)?);
        if source.starts_with(&output) {
            return Err(CoreError::config(format!(
                "output directory {} contains the source directory {}",
                output.display(),
                source.display()
            )));
        }
        Ok(())
    }

    /// Project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Source directory.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source
    }

    /// Output directory.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output
    }

    /// Join a source-relative path.
    #[must_use]
    pub fn source_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.source.join(relative)
    }

    /// Join an output-relative path.
    #[must_use]
    pub fn output_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.output.join(relative)
    }

    /// Path of `path` relative to the source directory, if it lies inside it.
    ///
    /// Relative inputs are taken relative to the project root.
    #[must_use]
    pub fn relative_to_source(&self, path: &Path) -> Option<PathBuf> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        absolute
            .strip_prefix(&self.source)
            .ok()
            .map(Path::to_path_buf)
    }
}

/// Fold `.` and `..` components of `path` lexically.
///
/// A leading `..` of a relative path is kept; `..` at the root stays at the root.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other),
        }
    }
    normalized
}
