//! Application settings loaded from `settings.toml`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::ConfigError;

/// Environment variable pointing at an explicit settings file.
pub const CONFIG_ENV: &str = "LITE_VIEWER_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dialog: DialogConfig,
    pub viewer: ViewerConfig,
    pub logging: LoggingConfig,
}

/// File picker options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DialogConfig {
    /// Extensions offered by the open-file filter, without the dot.
    pub extensions: Vec<String>,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            extensions: ["db", "sqlite", "sqlite3", "db3"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Above this many rows the delete confirmation shows `first-last`.
    pub summary_limit: usize,
    /// Persist committed cell edits with an UPDATE. When false edits only
    /// change the grid.
    pub write_back: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            summary_limit: 25,
            write_back: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

impl LoggingConfig {
    /// Install the global tracing subscriber. `RUST_LOG` wins over `level`.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        let result = match self.format.as_str() {
            "json" => fmt().json().with_env_filter(filter).try_init(),
            _ => fmt().with_env_filter(filter).try_init(),
        };
        if result.is_err() {
            tracing::debug!("tracing subscriber already installed");
        }
    }
}

impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(text).map_err(ConfigError::Parse)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::ReadFile {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// `$LITE_VIEWER_CONFIG`, else `<config dir>/lite-viewer/settings.toml`.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(p) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(p));
        }
        dirs::config_dir().map(|d| d.join("lite-viewer").join("settings.toml"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.dialog.extensions.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "dialog.extensions",
                reason: "at least one extension is required".into(),
            });
        }
        if let Some(ext) = self.dialog.extensions.iter().find(|e| e.starts_with('.')) {
            return Err(ConfigError::InvalidValue {
                field: "dialog.extensions",
                reason: format!("{ext:?} must not start with a dot"),
            });
        }
        if self.viewer.summary_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "viewer.summary_limit",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
