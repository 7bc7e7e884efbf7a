//! TOML-backed settings for the trial flow.
//!
//! The backend base URL is injected here instead of being compiled in. The
//! `CANCERNA_BACKEND_URL` environment variable wins over the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::api::{BackendEndpoint, EndpointError};
use crate::app_dirs;

/// File name of the settings file inside the `.cancerna` directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Environment variable overriding `backend.base_url`.
pub const BACKEND_URL_ENV: &str = "CANCERNA_BACKEND_URL";
/// Backend used when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000/";

/// Errors that may occur while loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The application directory could not be prepared.
    #[error("Config directory unavailable: {0}")]
    AppDir(#[from] app_dirs::AppDirError),
    /// Failed to read the settings file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write the settings file.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The settings file is not valid TOML for [`AppSettings`].
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Settings could not be serialized.
    #[error("Failed to serialize config for {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
    /// The configured backend URL is unusable.
    #[error(transparent)]
    InvalidBackendUrl(#[from] EndpointError),
}

/// All persisted settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Inference backend location.
    pub backend: BackendSettings,
    /// Trial flow presentation settings.
    pub trial: TrialSettings,
}

/// Inference backend location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Base URL; `predict/` and image paths are resolved against it.
    pub base_url: String,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
        }
    }
}

/// Trial flow presentation settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialSettings {
    /// Local image shown when the backend returns no segmentation image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_image: Option<PathBuf>,
}

impl AppSettings {
    /// Validate and return the backend endpoint.
    pub fn endpoint(&self) -> Result<BackendEndpoint, ConfigError> {
        Ok(BackendEndpoint::parse(&self.backend.base_url)?)
    }

    fn apply_backend_override(&mut self, value: Option<String>) {
        let Some(value) = value else {
            return;
        };
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        tracing::debug!("Backend URL overridden by {BACKEND_URL_ENV}");
        self.backend.base_url = value.to_string();
    }
}

/// Resolve the settings file path, ensuring the parent directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load settings from disk, falling back to defaults when the file is missing.
///
/// The environment override is applied and the backend URL validated before
/// returning.
pub fn load_or_default() -> Result<AppSettings, ConfigError> {
    let path = config_path()?;
    let mut settings = load_from(&path)?;
    settings.apply_backend_override(std::env::var(BACKEND_URL_ENV).ok());
    settings.endpoint()?;
    Ok(settings)
}

/// Load settings from a specific file; a missing file yields defaults.
pub fn load_from(path: &Path) -> Result<AppSettings, ConfigError> {
    if !path.exists() {
        return Ok(AppSettings::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Write settings to a specific file.
pub fn save_to(settings: &AppSettings, path: &Path) -> Result<(), ConfigError> {
    let text = toml::to_string_pretty(settings).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, text).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the default settings file if none exists yet and return its path.
pub fn ensure_config_file() -> Result<PathBuf, ConfigError> {
    let path = config_path()?;
    if !path.exists() {
        save_to(&AppSettings::default(), &path)?;
        tracing::info!("Wrote default settings to {}", path.display());
    }
    Ok(path)
}
