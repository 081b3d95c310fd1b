//! Settings for the tool itself, not for the kubeconfig files it stores.
//! Those stay opaque byte blobs end to end.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding the kube directory. Takes precedence
/// over the settings file. Used by the integration tests and by users who
/// keep their kube state outside `~/.kube`.
pub const KUBE_DIR_ENV: &str = "KUBECTL_CO_HOME";

/// Errors that can occur when loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("could not determine the home directory")]
    NoHomeDir,
}

/// Optional on-disk settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding the kube state (defaults to `~/.kube`).
    #[serde(default)]
    pub kube_dir: Option<PathBuf>,
}

impl Settings {
    /// Returns the path to the settings file.
    ///
    /// Uses `~/.config/kubectl-co/config.toml` on Unix, or the platform
    /// equivalent via `dirs::config_dir()`. Falls back to the current
    /// directory if no config dir is available.
    pub fn settings_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("kubectl-co").join("config.toml")
    }

    /// Loads settings from the default settings file.
    ///
    /// A missing file yields `Settings::default()`; reading or parsing
    /// failures are errors.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&Self::settings_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| SettingsError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| SettingsError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Resolve the kube directory: the [`KUBE_DIR_ENV`] override first,
    /// then the settings file, then `~/.kube`.
    pub fn kube_dir(&self) -> Result<PathBuf, SettingsError> {
        if let Some(dir) = std::env::var_os(KUBE_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }
        if let Some(dir) = &self.kube_dir {
            return Ok(dir.clone());
        }
        dirs::home_dir()
            .map(|home| home.join(".kube"))
            .ok_or(SettingsError::NoHomeDir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_settings_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load_from(&dir.path().join("config.toml")).unwrap();
        assert!(settings.kube_dir.is_none());
    }

    #[test]
    fn kube_dir_from_settings_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "kube_dir = \"/tmp/elsewhere/.kube\"\n").unwrap();
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(
            settings.kube_dir.as_deref(),
            Some(Path::new("/tmp/elsewhere/.kube"))
        );
    }

    #[test]
    fn malformed_settings_file_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "kube_dir = [not toml").unwrap();
        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, SettingsError::ParseError { .. }));
    }
}
