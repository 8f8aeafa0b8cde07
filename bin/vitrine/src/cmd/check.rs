//! Check command - validate configuration and source layout

use std::path::Path;

use color_eyre::eyre::{Result, bail};
use vitrine_core::{Config, ProjectLayout};
use vitrine_pipeline::{Includer, build::expand_glob};

use super::{load_config, project_root};

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Validates the configuration, the source layout and every page's includes.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and sources");

    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    let config = match load_config(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            Some(c)
        }
        Err(e) => {
            result.add_error(format!("Configuration error: {e:#}"));
            println!("  ✗ Configuration invalid: {e:#}");
            None
        }
    };

    if let Some(config) = &config {
        let layout = ProjectLayout::new(project_root(config_path), config);
        if let Err(e) = layout.validate() {
            result.add_error(e.to_string());
            println!("  ✗ {e}");
        }

        println!("\nChecking sources...");
        if layout.source_dir().is_dir() {
            for warn in quick_validate(config, &layout) {
                result.add_warning(warn);
            }
            println!("  ✓ Source layout checked");

            println!("\nChecking includes...");
            check_includes(config, &layout, &mut result);
        } else {
            result.add_error(format!(
                "Source directory missing: {}",
                layout.source_dir().display()
            ));
            println!("  ✗ {} missing", layout.source_dir().display());
        }

        let output = layout.output_dir();
        if output.exists() && !output.is_dir() {
            result.add_error(format!(
                "Output path exists but is not a directory: {}",
                output.display()
            ));
        }
    }

    // Print summary
    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Quick validation for build/dev commands.
///
/// Returns warnings for inputs that are missing; a build still runs without them
/// but will fail or produce an incomplete page.
pub fn quick_validate(config: &Config, layout: &ProjectLayout) -> Vec<String> {
    let mut warnings = Vec::new();

    let entry = layout.source_path(&config.styles.entry);
    if !entry.is_file() {
        warnings.push(format!("Stylesheet entry missing: {}", entry.display()));
    }

    for source in &config.scripts.sources {
        let path = layout.source_path(source);
        if !path.is_file() {
            warnings.push(format!("Script source missing: {}", path.display()));
        }
    }

    match expand_glob(layout.source_dir(), &config.html.pages) {
        Ok(pages) if pages.is_empty() => warnings.push(format!(
            "No pages match `{}` in {}",
            config.html.pages,
            layout.source_dir().display()
        )),
        Ok(_) => {}
        Err(e) => warnings.push(format!("Invalid html.pages pattern: {e}")),
    }

    warnings
}

/// Expand every page so include errors surface before a build.
fn check_includes(config: &Config, layout: &ProjectLayout, result: &mut ValidationResult) {
    let includer = match Includer::new(&config.html.prefix) {
        Ok(i) => i,
        Err(e) => {
            result.add_error(format!("html.prefix: {e}"));
            return;
        }
    };
    let Ok(pages) = expand_glob(layout.source_dir(), &config.html.pages) else {
        return;
    };

    let mut failed = 0;
    for page in &pages {
        if let Err(e) = includer.expand_file(page) {
            result.add_error(format!("{}: {e}", page.display()));
            failed += 1;
        }
    }

    if failed == 0 {
        println!("  ✓ All {} page(s) expand", pages.len());
    } else {
        println!("  ✗ {failed}/{} page(s) have include errors", pages.len());
    }
}
