//! SCSS compilation.

use std::path::{Path, PathBuf};

use grass::{Options, OutputStyle};
use thiserror::Error;
use tracing::{debug, info};

use crate::assets::{self, AssetError};

/// Style compilation errors.
#[derive(Debug, Error)]
pub enum StyleError {
    /// The entry stylesheet does not exist.
    #[error("stylesheet not found: {0}")]
    NotFound(PathBuf),

    /// Sass compilation failed.
    #[error("failed to compile {path}: {message}")]
    Compile { path: PathBuf, message: String },

    /// Writing the result failed.
    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Result type for style operations.
pub type Result<T> = std::result::Result<T, StyleError>;

/// Compiles an entry stylesheet into a single CSS file.
#[derive(Debug, Clone)]
pub struct StyleCompiler {
    compressed: bool,
    load_paths: Vec<PathBuf>,
}

impl StyleCompiler {
    /// Create a compiler producing compressed or expanded CSS.
    #[must_use]
    pub fn new(compressed: bool) -> Self {
        Self {
            compressed,
            load_paths: Vec::new(),
        }
    }

    /// Add directories searched by `@use` and `@import`.
    #[must_use]
    pub fn with_load_paths(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.load_paths.extend(paths);
        self
    }

    /// Compile `entry` and return the CSS.
    ///
    /// Imports resolve against the entry's directory first, then the load paths.
    pub fn compile(&self, entry: &Path) -> Result<String> {
        if !entry.is_file() {
            return Err(StyleError::NotFound(entry.to_path_buf()));
        }

        let mut load_paths = Vec::with_capacity(self.load_paths.len() + 1);
        if let Some(parent) = entry.parent() {
            load_paths.push(parent.to_path_buf());
        }
        load_paths.extend(self.load_paths.iter().cloned());

        let style = if self.compressed {
            OutputStyle::Compressed
        } else {
            OutputStyle::Expanded
        };

        let options = Options::default()
            .load_paths(load_paths.as_slice())
            .style(style);

        debug!(entry = %entry.display(), compressed = self.compressed, "compiling stylesheet");
        grass::from_path(entry, &options).map_err(|e| StyleError::Compile {
            path: entry.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Compile `entry` and write the result to `output`. Returns the CSS size in bytes.
    pub fn compile_to(&self, entry: &Path, output: &Path) -> Result<usize> {
        let css = self.compile(entry)?;
        assets::write_file(output, &css)?;

        info!(
            entry = %entry.display(),
            output = %output.display(),
            bytes = css.len(),
            "compiled stylesheet"
        );
        Ok(css.len())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_compile_nested_rules() {
        let dir = TempDir::new().unwrap();
        let entry = dir.path().join("style.scss");
        fs::write(&entry, "$c: red;\n.a { .b { color: $c; } }\n").unwrap();

        let css = StyleCompiler::new(false).compile(&entry).unwrap();
        assert!(css.contains(".a .b"));
        assert!(css.contains("color: red"));
    }

    #[test]
    fn test_compile_compressed() {
        let dir = TempDir::new().unwrap();
        let entry = dir.path().join("style.scss");
        fs::write(&entry, ".a {\n  color: blue;\n}\n").unwrap();

        let css = StyleCompiler::new(true).compile(&entry).unwrap();
        assert_eq!(css.trim_end(), ".a{color:blue}");
    }

    #[test]
    fn test_compile_resolves_partials() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("_vars.scss"), "$gap: 10px;\n").unwrap();
        let entry = dir.path().join("style.scss");
        fs::write(&entry, "@import 'vars';\n.grid { gap: $gap; }\n").unwrap();

        let css = StyleCompiler::new(false).compile(&entry).unwrap();
        assert!(css.contains("gap: 10px"));
    }

    #[test]
    fn test_compile_uses_load_paths() {
        let dir = TempDir::new().unwrap();
        let vendor = dir.path().join("vendor");
        fs::create_dir_all(&vendor).unwrap();
        fs::write(vendor.join("_reset.scss"), "html { margin: 0; }\n").unwrap();
        let entry = dir.path().join("scss/style.scss");
        fs::create_dir_all(entry.parent().unwrap()).unwrap();
        fs::write(&entry, "@import 'reset';\n").unwrap();

        let css = StyleCompiler::new(false)
            .with_load_paths([vendor])
            .compile(&entry)
            .unwrap();
        assert!(css.contains("margin: 0"));
    }

    #[test]
    fn test_compile_missing_entry() {
        let dir = TempDir::new().unwrap();
        let err = StyleCompiler::new(true)
            .compile(&dir.path().join("missing.scss"))
            .unwrap_err();
        assert!(matches!(err, StyleError::NotFound(_)));
    }

    #[test]
    fn test_compile_syntax_error_names_file() {
        let dir = TempDir::new().unwrap();
        let entry = dir.path().join("broken.scss");
        fs::write(&entry, ".a { color: ; ").unwrap();

        let err = StyleCompiler::new(true).compile(&entry).unwrap_err();
        assert!(err.to_string().contains("broken.scss"));
    }

    #[test]
    fn test_compile_to_writes_output() {
        let dir = TempDir::new().unwrap();
        let entry = dir.path().join("style.scss");
        fs::write(&entry, "body { padding: 0; }\n").unwrap();
        let output = dir.path().join("dist/css/style.min.css");

        let bytes = StyleCompiler::new(true).compile_to(&entry, &output).unwrap();
        assert!(bytes > 0);
        assert!(output.exists());
    }
}
