//! Command implementations.

pub mod build;
pub mod check;
pub mod dev;
pub mod run;

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use vitrine_core::Config;
use vitrine_pipeline::BuildStats;

/// Load the configuration at `config_path` with `VITRINE__*` overrides.
///
/// A missing file is not an error: every setting has a default.
pub fn load_config(config_path: &Path) -> Result<Config> {
    if !config_path.exists() {
        tracing::warn!(
            path = %config_path.display(),
            "configuration file not found, using defaults"
        );
    }
    Config::load_with_env(config_path).wrap_err("Failed to load configuration")
}

/// Directory the configured paths are relative to: the one holding the config file.
pub fn project_root(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Print non-fatal warnings, if any.
pub fn print_warnings(warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    println!();
    println!("  Warnings:");
    for warn in warnings {
        println!("  ⚠ {warn}");
    }
    println!();
}

/// Print build statistics in a user-friendly format.
pub fn print_build_stats(stats: &BuildStats) {
    println!();
    println!("  Build Statistics:");
    println!("  ─────────────────────────────────");
    println!("  Pages:        {:>6}", stats.pages);
    println!("  Stylesheets:  {:>6}", stats.stylesheets);
    println!("  Scripts:      {:>6}", stats.scripts);
    println!("  Icons:        {:>6}", stats.icons);
    println!("  Images:       {:>6}", stats.images);
    println!("  Static files: {:>6}", stats.static_files);
    println!("  ─────────────────────────────────");
    println!("  Total:        {:>6} files", stats.files_written());
    println!("  Duration:     {:>6}ms", stats.duration_ms);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_root() {
        assert_eq!(project_root(Path::new("vitrine.toml")), PathBuf::from("."));
        assert_eq!(
            project_root(Path::new("site/vitrine.toml")),
            PathBuf::from("site")
        );
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = load_config(&dir.path().join("vitrine.toml")).unwrap();
        assert_eq!(config.paths.source, "app");
        assert_eq!(config.server.port, 3000);
    }
}
