use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::network::DEFAULT_PROGRAM;
use crate::runner::DEFAULT_TIMEOUT;

pub const CONFIG_DIR_NAME: &str = ".nmterm";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DEBUG_LOG_NAME: &str = "debug.ui.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Show the debug tab and write the debug log.
    pub debug: bool,
    pub poll_interval_ms: u64,
    pub command_timeout_secs: u64,
    /// Path or name of the nmcli binary.
    pub nmcli: String,
    /// Interface handed to `ifname` when connecting.
    pub interface: Option<String>,
    pub private: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            poll_interval_ms: 1000,
            command_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            nmcli: DEFAULT_PROGRAM.to_string(),
            interface: None,
            private: false,
        }
    }
}

impl Config {
    /// Read a config file. A missing file is not an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(100))
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs.max(1))
    }
}

/// `~/.nmterm`, or `None` when no home directory can be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_DIR_NAME))
}

/// Create the config directory if possible; failure is ignored.
pub fn ensure_config_dir() -> Option<PathBuf> {
    let dir = config_dir()?;
    if let Err(e) = fs::create_dir_all(&dir) {
        tracing::debug!("cannot create {}: {}", dir.display(), e);
    }
    Some(dir)
}

pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

pub fn debug_log_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(DEBUG_LOG_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.nmcli, "nmcli");
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.command_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "debug": true, "interface": "wlp2s0" }}"#).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert!(config.debug);
        assert_eq!(config.interface.as_deref(), Some("wlp2s0"));
        assert_eq!(config.poll_interval_ms, 1000);
    }

    #[test]
    fn malformed_file_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn intervals_have_floors() {
        let config = Config {
            poll_interval_ms: 0,
            command_timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
        assert_eq!(config.command_timeout(), Duration::from_secs(1));
    }
}
