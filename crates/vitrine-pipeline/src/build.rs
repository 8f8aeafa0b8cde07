//! Pipeline orchestration.
//!
//! Runs named tasks alone, in series for the production build, or concurrently for the
//! development warm-up.

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use vitrine_core::{Config, CoreError, ProjectLayout};

use crate::{
    assets::{self, AssetCopier, AssetError},
    include::{IncludeError, Includer},
    pages::PageRenderer,
    scripts::{self, ScriptError},
    sprite::{self, SpriteError},
    styles::{StyleCompiler, StyleError},
    task::Task,
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Asset copy error.
    #[error("asset error: {0}")]
    Asset(#[from] AssetError),

    /// Stylesheet error.
    #[error("style error: {0}")]
    Style(#[from] StyleError),

    /// Script bundling error.
    #[error("script error: {0}")]
    Script(#[from] ScriptError),

    /// Sprite error.
    #[error("sprite error: {0}")]
    Sprite(#[from] SpriteError),

    /// HTML include error.
    #[error("include error: {0}")]
    Include(#[from] IncludeError),

    /// Invalid glob in the configuration.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Unreadable glob match.
    #[error("glob error: {0}")]
    Glob(#[from] glob::GlobError),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] CoreError),

    /// A matched file lies outside the source directory.
    #[error("{0} is outside the source directory")]
    OutsideSource(PathBuf),

    /// A task failed; carries the task name.
    #[error("task `{task}` failed: {source}")]
    Task {
        task: Task,
        #[source]
        source: Box<BuildError>,
    },
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// What a single task produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskOutcome {
    /// The task that ran.
    pub task: Task,

    /// Files written (or entries removed, for clean).
    pub count: usize,

    /// Duration in milliseconds.
    pub duration_ms: u64,
}

/// Build statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Entries removed from the output directory.
    pub cleaned: usize,

    /// Number of pages rendered.
    pub pages: usize,

    /// Number of images copied.
    pub images: usize,

    /// Number of icons in the sprite.
    pub icons: usize,

    /// Number of stylesheets compiled.
    pub stylesheets: usize,

    /// Number of scripts bundled.
    pub scripts: usize,

    /// Number of static files copied.
    pub static_files: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

impl BuildStats {
    /// Fold a task outcome into the statistics.
    pub fn record(&mut self, outcome: &TaskOutcome) {
        let slot = match outcome.task {
            Task::Clean => &mut self.cleaned,
            Task::Html => &mut self.pages,
            Task::Images => &mut self.images,
            Task::Sprites => &mut self.icons,
            Task::Styles => &mut self.stylesheets,
            Task::Scripts => &mut self.scripts,
            Task::Static => &mut self.static_files,
        };
        *slot += outcome.count;
    }

    /// Total number of files written to the output.
    #[must_use]
    pub fn files_written(&self) -> usize {
        let bundle = usize::from(self.scripts > 0);
        self.pages + self.images + self.stylesheets + self.static_files + bundle
    }
}

/// Runs pipeline tasks for one project.
#[derive(Debug)]
pub struct Pipeline {
    config: Config,
    layout: ProjectLayout,
    renderer: PageRenderer,
}

impl Pipeline {
    /// Create a pipeline for the project rooted at `root`.
    pub fn new(config: Config, root: impl Into<PathBuf>) -> Result<Self> {
        config.validate()?;
        let layout = ProjectLayout::new(root, &config);
        layout.validate()?;
        let includer = Includer::new(&config.html.prefix)?;
        let renderer = PageRenderer::new(includer, layout.source_path(&config.html.partials));

        Ok(Self {
            config,
            layout,
            renderer,
        })
    }

    /// Inject `snippet` into every rendered page (used for live reload).
    #[must_use]
    pub fn with_page_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.renderer = self.renderer.with_injection(Some(snippet.into()));
        self
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolved project directories.
    #[must_use]
    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Run the production build.
    pub fn build(&self) -> Result<BuildStats> {
        info!(
            source = %self.layout.source_dir().display(),
            output = %self.layout.output_dir().display(),
            "starting build"
        );
        let stats = self.run_series(&Task::BUILD)?;

        info!(
            pages = stats.pages,
            images = stats.images,
            icons = stats.icons,
            scripts = stats.scripts,
            static_files = stats.static_files,
            duration_ms = stats.duration_ms,
            "build complete"
        );
        Ok(stats)
    }

    /// Run `tasks` one after another, stopping at the first failure.
    pub fn run_series(&self, tasks: &[Task]) -> Result<BuildStats> {
        let start = Instant::now();
        let mut stats = BuildStats::default();

        for task in tasks {
            let outcome = self.run(*task)?;
            stats.record(&outcome);
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;
        Ok(stats)
    }

    /// Run `tasks` concurrently. Every task runs to completion; the first failure in
    /// task order is returned and the others are logged.
    pub fn run_parallel(&self, tasks: &[Task]) -> Result<BuildStats> {
        let start = Instant::now();

        let results: Vec<_> = tasks.par_iter().map(|task| self.run(*task)).collect();

        let mut stats = BuildStats::default();
        let mut first_error = None;
        for result in results {
            match result {
                Ok(outcome) => stats.record(&outcome),
                Err(e) if first_error.is_none() => first_error = Some(e),
                Err(e) => warn!(error = %e, "additional task failure"),
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;
        Ok(stats)
    }

    /// Run a single task.
    pub fn run(&self, task: Task) -> Result<TaskOutcome> {
        let start = Instant::now();
        debug!(%task, "running task");

        let count = self.execute(task).map_err(|source| {
            error!(%task, error = %source, "task failed");
            BuildError::Task {
                task,
                source: Box::new(source),
            }
        })?;

        let outcome = TaskOutcome {
            task,
            count,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        debug!(%task, count, duration_ms = outcome.duration_ms, "task finished");
        Ok(outcome)
    }

    fn execute(&self, task: Task) -> Result<usize> {
        let layout = &self.layout;
        match task {
            Task::Clean => Ok(assets::clean_dir(layout.output_dir())?),
            Task::Html => {
                let pages = self.source_glob(&self.config.html.pages)?;
                self.renderer
                    .render(&pages, layout.source_dir(), layout.output_dir())
            }
            Task::Images => Ok(AssetCopier::new().copy_tree(
                &layout.source_path(&self.config.images.source),
                &layout.output_path(&self.config.images.output),
            )?),
            Task::Sprites => {
                let icons = self.source_glob(&self.config.sprite.sources)?;
                let output = layout.source_path(&self.config.sprite.output);
                if icons.is_empty() {
                    debug!("no icons matched, sprite left as is");
                    return Ok(0);
                }
                Ok(sprite::build_sprite(&icons, &output)?)
            }
            Task::Styles => {
                let styles = &self.config.styles;
                let load_paths = styles.load_paths.iter().map(|p| layout.source_path(p));
                StyleCompiler::new(styles.compressed)
                    .with_load_paths(load_paths)
                    .compile_to(
                        &layout.source_path(&styles.entry),
                        &layout.output_path(&styles.output),
                    )?;
                Ok(1)
            }
            Task::Scripts => {
                let sources: Vec<_> = self
                    .config
                    .scripts
                    .sources
                    .iter()
                    .map(|s| layout.source_path(s))
                    .collect();
                let bundle =
                    scripts::bundle(&sources, &layout.output_path(&self.config.scripts.output))?;
                Ok(bundle.sources)
            }
            Task::Static => Ok(AssetCopier::new().copy_matching(
                layout.source_dir(),
                &self.config.static_files.patterns,
                layout.output_dir(),
            )?),
        }
    }

    /// Files under the source directory matching `pattern`, sorted.
    fn source_glob(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        expand_glob(self.layout.source_dir(), pattern)
    }
}

/// Files under `base` matching `pattern`, sorted.
pub fn expand_glob(base: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in glob::glob(&assets::pattern_under(base, pattern))? {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
