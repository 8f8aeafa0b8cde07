//! Vitrine Pipeline Library
//!
//! Asset tasks that turn a source tree into a deployable site.
//!
//! # Modules
//!
//! - [`task`] - Named tasks and the fixed build/dev compositions
//! - [`build`] - Task orchestration and build statistics
//! - [`styles`] - SCSS compilation
//! - [`scripts`] - Script concatenation
//! - [`sprite`] - SVG stack sprite generation
//! - [`include`] - HTML include and variable expansion
//! - [`pages`] - Page rendering with snippet injection
//! - [`assets`] - Image and static file copying, output cleaning
//! - [`watch`] - Mapping of changed files to tasks

pub mod assets;
pub mod build;
pub mod include;
pub mod pages;
pub mod scripts;
pub mod sprite;
pub mod styles;
pub mod task;
pub mod watch;

pub use assets::{AssetCopier, AssetError};
pub use build::{BuildError, BuildStats, Pipeline, TaskOutcome};
pub use include::{IncludeError, Includer};
pub use pages::{PageRenderer, inject_before_body};
pub use sprite::{SpriteError, SpriteIcon};
pub use styles::{StyleCompiler, StyleError};
pub use task::{Task, UnknownTask};
pub use watch::{Affected, Reload, WatchAction, WatchPlan, WatchRule};
