//! Named pipeline tasks and their fixed compositions.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// A single pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Task {
    /// Empty the output directory.
    Clean,
    /// Expand includes in pages and write them to the output.
    Html,
    /// Copy images to the output.
    Images,
    /// Combine icons into the stack sprite (written into the source tree).
    Sprites,
    /// Compile the entry stylesheet.
    Styles,
    /// Concatenate scripts into the bundle.
    Scripts,
    /// Copy fonts and other static files.
    Static,
}

/// Unknown task name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown task `{0}` (expected one of: clean, html, images, sprites, styles, scripts, static)")]
pub struct UnknownTask(pub String);

impl Task {
    /// Every task, in declaration order.
    pub const ALL: [Task; 7] = [
        Task::Clean,
        Task::Html,
        Task::Images,
        Task::Sprites,
        Task::Styles,
        Task::Scripts,
        Task::Static,
    ];

    /// The one-shot production build, run in this order.
    ///
    /// Sprites precede images so the fresh sprite is copied in the same build.
    pub const BUILD: [Task; 7] = [
        Task::Clean,
        Task::Html,
        Task::Sprites,
        Task::Images,
        Task::Styles,
        Task::Scripts,
        Task::Static,
    ];

    /// Tasks run concurrently before the dev server starts. Sprites run first on their
    /// own since images copies the sprite.
    pub const DEV_PARALLEL: [Task; 4] = [Task::Html, Task::Scripts, Task::Styles, Task::Images];

    /// Name used on the command line and in logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Task::Clean => "clean",
            Task::Html => "html",
            Task::Images => "images",
            Task::Sprites => "sprites",
            Task::Styles => "styles",
            Task::Scripts => "scripts",
            Task::Static => "static",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Task {
    type Err = UnknownTask;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Task::ALL
            .into_iter()
            .find(|task| task.name() == normalized)
            .or(match normalized.as_str() {
                // camelCase aliases
                "cleandist" => Some(Task::Clean),
                "htmlinclude" => Some(Task::Html),
                "svgsprites" => Some(Task::Sprites),
                _ => None,
            })
            .ok_or_else(|| UnknownTask(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for task in Task::ALL {
            assert_eq!(task.name().parse::<Task>(), Ok(task));
            assert_eq!(task.to_string(), task.name());
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Styles".parse::<Task>(), Ok(Task::Styles));
        assert_eq!(" sprites ".parse::<Task>(), Ok(Task::Sprites));
    }

    #[test]
    fn test_parse_camel_case_aliases() {
        assert_eq!("cleanDist".parse::<Task>(), Ok(Task::Clean));
        assert_eq!("htmlInclude".parse::<Task>(), Ok(Task::Html));
        assert_eq!("svgSprites".parse::<Task>(), Ok(Task::Sprites));
    }

    #[test]
    fn test_parse_unknown() {
        let err = "minify".parse::<Task>().unwrap_err();
        assert_eq!(err, UnknownTask("minify".to_string()));
        assert!(err.to_string().contains("minify"));
    }

    #[test]
    fn test_build_starts_with_clean_and_covers_every_task() {
        assert_eq!(Task::BUILD[0], Task::Clean);
        let mut build = Task::BUILD.to_vec();
        build.sort();
        assert_eq!(build, Task::ALL.to_vec());
    }

    #[test]
    fn test_sprites_before_images_in_build() {
        let position = |task| Task::BUILD.iter().position(|t| *t == task).unwrap();
        assert!(position(Task::Sprites) < position(Task::Images));
    }

    #[test]
    fn test_dev_parallel_excludes_clean_and_sprites() {
        assert!(!Task::DEV_PARALLEL.contains(&Task::Clean));
        assert!(!Task::DEV_PARALLEL.contains(&Task::Sprites));
    }
}
