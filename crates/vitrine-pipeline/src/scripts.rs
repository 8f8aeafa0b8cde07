//! Script concatenation.

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::assets::{self, AssetError};

/// Script bundling errors.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// A listed source could not be read.
    #[error("failed to read script {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the bundle failed.
    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Result type for script operations.
pub type Result<T> = std::result::Result<T, ScriptError>;

/// Summary of a bundle write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bundle {
    /// Number of sources concatenated.
    pub sources: usize,

    /// Bundle size in bytes.
    pub bytes: usize,
}

/// Concatenate `sources` in order into `output`.
///
/// Previously bundled files (`*.min.js`) and the output itself are never read back in.
pub fn bundle(sources: &[PathBuf], output: &Path) -> Result<Bundle> {
    let mut body = String::new();
    let mut count = 0;

    for path in sources {
        if path == output || is_minified(path) {
            warn!(path = %path.display(), "skipping bundled script in sources");
            continue;
        }

        let text = fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.clone(),
            source,
        })?;

        if !body.is_empty() && !body.ends_with('\n') {
            body.push('\n');
        }
        body.push_str(&text);
        count += 1;

        debug!(path = %path.display(), bytes = text.len(), "appended script");
    }

    assets::write_file(output, &body)?;

    info!(
        output = %output.display(),
        sources = count,
        bytes = body.len(),
        "bundled scripts"
    );

    Ok(Bundle {
        sources: count,
        bytes: body.len(),
    })
}

fn is_minified(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|n| n.to_string_lossy().ends_with(".min.js"))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_bundle_concatenates_in_order() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.js");
        let b = dir.path().join("b.js");
        fs::write(&a, "const a = 1;").unwrap();
        fs::write(&b, "const b = 2;\n").unwrap();
        let output = dir.path().join("out/main.min.js");

        let result = bundle(&[b.clone(), a.clone()], &output).unwrap();

        assert_eq!(result.sources, 2);
        let text = fs::read_to_string(&output).unwrap();
        assert_eq!(text, "const b = 2;\nconst a = 1;");
        assert_eq!(result.bytes, text.len());
    }

    #[test]
    fn test_bundle_separates_sources_with_newline() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.js");
        let b = dir.path().join("b.js");
        fs::write(&a, "// a").unwrap();
        fs::write(&b, "// b").unwrap();
        let output = dir.path().join("bundle.js");

        bundle(&[a, b], &output).unwrap();

        assert_eq!(fs::read_to_string(&output).unwrap(), "// a\n// b");
    }

    #[test]
    fn test_bundle_skips_minified_sources() {
        let dir = TempDir::new().unwrap();
        let main = dir.path().join("main.js");
        let stale = dir.path().join("main.min.js");
        fs::write(&main, "run();").unwrap();
        fs::write(&stale, "old();").unwrap();
        let output = dir.path().join("dist/main.min.js");

        let result = bundle(&[main, stale], &output).unwrap();

        assert_eq!(result.sources, 1);
        assert_eq!(fs::read_to_string(&output).unwrap(), "run();");
    }

    #[test]
    fn test_bundle_missing_source_names_path() {
        let dir = TempDir::new().unwrap();
        let err = bundle(
            &[dir.path().join("gone.js")],
            &dir.path().join("main.min.js"),
        )
        .unwrap_err();

        assert!(err.to_string().contains("gone.js"));
    }

    #[test]
    fn test_bundle_empty_sources_writes_empty_file() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("main.min.js");

        let result = bundle(&[], &output).unwrap();

        assert_eq!(result, Bundle::default());
        assert!(output.exists());
    }
}
