//! Build command - production build of the landing page

use std::{
    path::{self, Path},
    time::Instant,
};

use color_eyre::eyre::{Result, WrapErr};
use vitrine_pipeline::Pipeline;

use super::{check::quick_validate, load_config, print_build_stats, print_warnings, project_root};

/// Run the build command.
///
/// Cleans the output directory and runs every task in build order.
pub fn run(config_path: &Path, output: Option<&Path>) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?output, "Starting build");

    let mut config = load_config(config_path)?;

    // Override output directory if specified
    if let Some(output) = output {
        config.paths.output = output_override(output)?;
    }
    tracing::debug!(?config, "Loaded configuration");

    let pipeline =
        Pipeline::new(config, project_root(config_path)).wrap_err("Invalid configuration")?;
    print_warnings(&quick_validate(pipeline.config(), pipeline.layout()));

    let stats = pipeline.build().wrap_err("Build failed")?;
    print_build_stats(&stats);

    let duration = start.elapsed();
    println!("  Build completed in {:.2}s", duration.as_secs_f64());
    println!("  Output: {}", pipeline.layout().output_dir().display());
    println!();

    tracing::info!(?stats, ?duration, "Build completed successfully");
    Ok(())
}

/// `--output` as given on the command line: relative to the current directory, not to
/// the config file.
fn output_override(output: &Path) -> Result<String> {
    let absolute = path::absolute(output)
        .wrap_err_with(|| format!("Failed to resolve {}", output.display()))?;
    Ok(absolute.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_override_is_relative_to_cwd() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            output_override(Path::new("public")).unwrap(),
            cwd.join("public").to_string_lossy()
        );
        assert_eq!(output_override(Path::new("/tmp/site")).unwrap(), "/tmp/site");
    }

    #[test]
    fn test_output_over_source_fails_without_deleting() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = dir.path().join("vitrine.toml");
        std::fs::write(&config_path, "").unwrap();
        std::fs::create_dir_all(dir.path().join("app")).unwrap();
        std::fs::write(dir.path().join("app/index.html"), "<p>keep</p>").unwrap();

        assert!(run(&config_path, Some(dir.path())).is_err());
        assert!(run(&config_path, Some(&dir.path().join("app/."))).is_err());
        assert!(dir.path().join("app/index.html").exists());
    }
}
