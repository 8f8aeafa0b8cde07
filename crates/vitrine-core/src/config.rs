//! Project configuration management.
//!
//! Every section has defaults matching the conventional `app/` → `dist/` layout, so a
//! project without a `vitrine.toml` still builds.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    error::{CoreError, Result},
    layout::normalize,
};

/// Main configuration structure for Vitrine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Source and output directories.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Stylesheet compilation settings.
    #[serde(default)]
    pub styles: StylesConfig,

    /// Script concatenation settings.
    #[serde(default)]
    pub scripts: ScriptsConfig,

    /// Image copy settings.
    #[serde(default)]
    pub images: ImagesConfig,

    /// SVG sprite settings.
    #[serde(default)]
    pub sprite: SpriteConfig,

    /// HTML include settings.
    #[serde(default)]
    pub html: HtmlConfig,

    /// Static files copied verbatim.
    #[serde(default)]
    pub static_files: StaticFilesConfig,

    /// Development server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Source and output directories, relative to the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding the editable sources.
    #[serde(default = "default_source_dir")]
    pub source: String,

    /// Directory receiving the built site. Emptied by `clean`.
    #[serde(default = "default_output_dir")]
    pub output: String,
}

/// Stylesheet compilation settings. Paths are relative to the source/output dirs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StylesConfig {
    /// Entry stylesheet.
    #[serde(default = "default_style_entry")]
    pub entry: String,

    /// Compiled stylesheet.
    #[serde(default = "default_style_output")]
    pub output: String,

    /// Whether to emit compressed CSS.
    #[serde(default = "default_true")]
    pub compressed: bool,

    /// Extra directories searched by `@use` and `@import`, relative to source.
    #[serde(default)]
    pub load_paths: Vec<String>,
}

/// Script concatenation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptsConfig {
    /// Scripts concatenated in this order, relative to source.
    #[serde(default = "default_script_sources")]
    pub sources: Vec<String>,

    /// Concatenated bundle, relative to output.
    #[serde(default = "default_script_output")]
    pub output: String,
}

/// Image copy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesConfig {
    /// Image directory, relative to source.
    #[serde(default = "default_images_dir")]
    pub source: String,

    /// Image directory, relative to output.
    #[serde(default = "default_images_dir")]
    pub output: String,
}

/// SVG sprite settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteConfig {
    /// Glob selecting the icons, relative to source.
    #[serde(default = "default_sprite_sources")]
    pub sources: String,

    /// Sprite file, relative to source. Picked up by the images task.
    #[serde(default = "default_sprite_output")]
    pub output: String,
}

/// HTML include settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HtmlConfig {
    /// Glob selecting the pages, relative to source.
    #[serde(default = "default_html_pages")]
    pub pages: String,

    /// Directory of partials, relative to source. Never emitted.
    #[serde(default = "default_html_partials")]
    pub partials: String,

    /// Directive prefix, `@` gives `@include(...)` and `@name`.
    #[serde(default = "default_include_prefix")]
    pub prefix: String,
}

/// Files copied verbatim with their source-relative path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticFilesConfig {
    /// Globs relative to source.
    #[serde(default = "default_static_patterns")]
    pub patterns: Vec<String>,
}

/// Development server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Open the browser once the server is up.
    #[serde(default)]
    pub open: bool,

    /// Quiet period before a batch of file events triggers a rebuild.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

// Default value functions
fn default_source_dir() -> String {
    "app".to_string()
}

fn default_output_dir() -> String {
    "dist".to_string()
}

fn default_style_entry() -> String {
    "scss/style.scss".to_string()
}

fn default_style_output() -> String {
    "css/style.min.css".to_string()
}

fn default_true() -> bool {
    true
}

fn default_script_sources() -> Vec<String> {
    vec!["js/main.js".to_string()]
}

fn default_script_output() -> String {
    "js/main.min.js".to_string()
}

fn default_images_dir() -> String {
    "images".to_string()
}

fn default_sprite_sources() -> String {
    "images/svg/*.svg".to_string()
}

fn default_sprite_output() -> String {
    "images/sprite.svg".to_string()
}

fn default_html_pages() -> String {
    "*.html".to_string()
}

fn default_html_partials() -> String {
    "html".to_string()
}

fn default_include_prefix() -> String {
    "@".to_string()
}

fn default_static_patterns() -> Vec<String> {
    vec!["fonts/*.woff".to_string(), "fonts/*.woff2".to_string()]
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_debounce_ms() -> u64 {
    200
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: default_source_dir(),
            output: default_output_dir(),
        }
    }
}

impl Default for StylesConfig {
    fn default() -> Self {
        Self {
            entry: default_style_entry(),
            output: default_style_output(),
            compressed: true,
            load_paths: Vec::new(),
        }
    }
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            sources: default_script_sources(),
            output: default_script_output(),
        }
    }
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            source: default_images_dir(),
            output: default_images_dir(),
        }
    }
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            sources: default_sprite_sources(),
            output: default_sprite_output(),
        }
    }
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            pages: default_html_pages(),
            partials: default_html_partials(),
            prefix: default_include_prefix(),
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            patterns: default_static_patterns(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            open: false,
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }

        tracing::warn!(path = %path.display(), "configuration file not found, using defaults");
        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration using the config crate, layering `VITRINE__*` environment
    /// variables over the file.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix("VITRINE").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.paths.output.trim().is_empty() {
            return Err(CoreError::config("paths.output cannot be empty"));
        }

        if self.paths.source.trim().is_empty() {
            return Err(CoreError::config("paths.source cannot be empty"));
        }

        // `clean` empties the output directory
        let output = normalize(Path::new(&self.paths.output));
        if normalize(Path::new(&self.paths.source)).starts_with(&output) {
            return Err(CoreError::config(
                "paths.output must differ from paths.source and not contain it",
            ));
        }

        if self.html.prefix.is_empty() {
            return Err(CoreError::config("html.prefix cannot be empty"));
        }

        if self.server.port == 0 {
            return Err(CoreError::config("server.port cannot be 0"));
        }

        if self.scripts.sources.is_empty() {
            tracing::warn!("scripts.sources is empty, the script bundle will be empty");
        }

        Ok(())
    }

    /// Address the development server binds to.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
