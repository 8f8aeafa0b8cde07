//! Mapping of changed source files to the tasks they invalidate.

use std::{collections::BTreeSet, path::Path};

use glob::{MatchOptions, Pattern};
use vitrine_core::Config;

use crate::{build::Result, task::Task};

/// What the browser should do once the tasks of a batch have run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Reload {
    /// Nothing visible changed.
    #[default]
    None,
    /// Swap stylesheets in place.
    Css,
    /// Reload the page.
    Full,
}

/// Effect of a matching rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchAction {
    /// Re-run a task, then reload as given.
    Run(Task, Reload),
    /// Reload the browser without running anything.
    Reload,
}

/// A source-relative glob with an optional exclusion.
#[derive(Debug, Clone)]
pub struct WatchRule {
    pattern: Pattern,
    exclude: Option<Pattern>,
    action: WatchAction,
}

impl WatchRule {
    /// Create a rule.
    pub fn new(pattern: &str, action: WatchAction) -> Result<Self> {
        Ok(Self {
            pattern: Pattern::new(pattern)?,
            exclude: None,
            action,
        })
    }

    /// Skip paths matching `pattern`.
    pub fn excluding(mut self, pattern: &str) -> Result<Self> {
        self.exclude = Some(Pattern::new(pattern)?);
        Ok(self)
    }

    fn matches(&self, relative: &Path) -> bool {
        let options = MatchOptions {
            require_literal_separator: true,
            ..MatchOptions::new()
        };
        self.pattern.matches_path_with(relative, options)
            && !self
                .exclude
                .as_ref()
                .is_some_and(|e| e.matches_path_with(relative, options))
    }
}

/// Tasks and reload triggered by a batch of changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Affected {
    /// Tasks to run, in a stable order.
    pub tasks: BTreeSet<Task>,

    /// Strongest reload requested.
    pub reload: Reload,
}

impl Affected {
    /// Whether the batch requires any work.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && self.reload == Reload::None
    }
}

/// The watch rules of a project.
#[derive(Debug, Clone)]
pub struct WatchPlan {
    rules: Vec<WatchRule>,
}

impl WatchPlan {
    /// Derive the rules from the configured sources.
    pub fn from_config(config: &Config) -> Result<Self> {
        let styles_dir = parent_dir(&config.styles.entry);
        let mut scripts_dirs: BTreeSet<String> =
            config.scripts.sources.iter().map(|s| parent_dir(s)).collect();
        if scripts_dirs.is_empty() {
            scripts_dirs.insert("js".to_string());
        }

        let mut rules = vec![
            WatchRule::new(
                &join_glob(&styles_dir, "**/*.scss"),
                WatchAction::Run(Task::Styles, Reload::Css),
            )?,
            WatchRule::new(
                &config.sprite.sources,
                WatchAction::Run(Task::Sprites, Reload::None),
            )?,
            WatchRule::new(
                &join_glob(&config.images.source, "**/*"),
                WatchAction::Run(Task::Images, Reload::None),
            )?,
        ];
        for dir in &scripts_dirs {
            rules.push(
                WatchRule::new(
                    &join_glob(dir, "**/*.js"),
                    WatchAction::Run(Task::Scripts, Reload::Full),
                )?
                .excluding("**/*.min.js")?,
            );
        }
        rules.extend([
            WatchRule::new(
                &config.html.pages,
                WatchAction::Run(Task::Html, Reload::Full),
            )?,
            WatchRule::new(
                &join_glob(&config.html.partials, "*.html"),
                WatchAction::Run(Task::Html, Reload::Full),
            )?,
            WatchRule::new("**/*.html", WatchAction::Reload)?,
        ]);

        Ok(Self { rules })
    }

    /// Create a plan from explicit rules.
    #[must_use]
    pub fn with_rules(rules: Vec<WatchRule>) -> Self {
        Self { rules }
    }

    /// Collect what a batch of source-relative paths affects.
    pub fn affected<'a>(&self, paths: impl IntoIterator<Item = &'a Path>) -> Affected {
        let mut affected = Affected::default();

        for path in paths {
            for rule in self.rules.iter().filter(|r| r.matches(path)) {
                match rule.action {
                    WatchAction::Run(task, reload) => {
                        affected.tasks.insert(task);
                        affected.reload = affected.reload.max(reload);
                    }
                    WatchAction::Reload => affected.reload = Reload::Full,
                }
            }
        }

        affected
    }
}

fn parent_dir(path: &str) -> String {
    Path::new(path)
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `pattern` under the literal directory `dir`.
fn join_glob(dir: &str, pattern: &str) -> String {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() {
        pattern.to_string()
    } else {
        format!("{}/{pattern}", Pattern::escape(dir))
    }
}
