//! Run command - a single named task

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use vitrine_pipeline::{Pipeline, Task};

use super::{load_config, project_root};

/// Run one task, e.g. `vitrine run styles`.
pub fn run(config_path: &Path, task: Task) -> Result<()> {
    tracing::info!(?config_path, %task, "Running task");

    let config = load_config(config_path)?;
    let pipeline =
        Pipeline::new(config, project_root(config_path)).wrap_err("Invalid configuration")?;

    let outcome = pipeline
        .run(task)
        .wrap_err_with(|| format!("Task `{task}` failed"))?;

    let unit = if task == Task::Clean { "removed" } else { "written" };
    println!(
        "  ✓ {task}: {} {unit} in {}ms",
        outcome.count, outcome.duration_ms
    );
    Ok(())
}
