//! Configuration management for orgflow.
//!
//! Parses `orgflow.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].

use std::path::{Path, PathBuf};

use orgflow_renderer::{RenderOptions, Verbosity};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the one-shot title class.
    pub decorate_title: Option<bool>,
    /// Override table output.
    pub skip_tables: Option<bool>,
    /// Override heading numbers.
    pub export_heading_number: Option<bool>,
    /// Override syntax highlighting.
    pub highlight_enabled: Option<bool>,
    /// Override the diagnostics level.
    pub verbosity: Option<Verbosity>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "orgflow.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTML output options.
    pub render: RenderOptions,
    pub diagnostics: DiagnosticsConfig,
    pub highlight: HighlightConfig,
    /// Line classification settings.
    pub parse: ParseConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Diagnostics configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// How much the renderer reports: `quiet`, `warn`, `info` or `debug`.
    pub level: Verbosity,
}

/// Syntax highlighting configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Whether `src` blocks are highlighted.
    pub enabled: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Line classification configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Words recognized as headline keywords.
    pub todo_keywords: Vec<String>,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            todo_keywords: vec!["TODO".to_owned(), "DONE".to_owned()],
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `orgflow.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_from(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(decorate_title) = settings.decorate_title {
            self.render.decorate_title = decorate_title;
        }
        if let Some(skip_tables) = settings.skip_tables {
            self.render.skip_tables = skip_tables;
        }
        if let Some(export_heading_number) = settings.export_heading_number {
            self.render.export_heading_number = export_heading_number;
        }
        if let Some(enabled) = settings.highlight_enabled {
            self.highlight.enabled = enabled;
        }
        if let Some(level) = settings.verbosity {
            self.diagnostics.level = level;
        }
    }

    /// Search for a config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for keyword in &self.parse.todo_keywords {
            if keyword.is_empty() {
                return Err(ConfigError::Validation(
                    "parse.todo_keywords cannot contain empty keywords".to_owned(),
                ));
            }
            if keyword.contains(char::is_whitespace) {
                return Err(ConfigError::Validation(format!(
                    "parse.todo_keywords entry {keyword:?} cannot contain whitespace"
                )));
            }
        }
        Ok(())
    }
}
