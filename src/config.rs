use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Dependency plugin version used for `tree` when not configured
pub const DEFAULT_PLUGIN_VERSION: &str = "3.8.1";

/// CSV file receiving one row per summarized pull request
pub const DEFAULT_CSV_PATH: &str = "rq2_semantic_differences.csv";

/// JSON store of per-module counts keyed by pull request
pub const DEFAULT_STORE_PATH: &str = "semantic_differences_per_module.json";

const APP_DIR: &str = "dep-conflicts";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub maven: MavenConfig,
    pub output: OutputConfig,
}

/// How the dependency tree is produced
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct MavenConfig {
    /// Maven executable (`mvn`, `mvnw`, or an absolute path)
    pub command: String,
    pub plugin_version: String,
    pub verbose: bool,
    pub fail_never: bool,
    pub extra_args: Vec<String>,
}

impl Default for MavenConfig {
    fn default() -> Self {
        Self {
            command: "mvn".to_string(),
            plugin_version: DEFAULT_PLUGIN_VERSION.to_string(),
            verbose: true,
            fail_never: true,
            extra_args: Vec::new(),
        }
    }
}

/// Where summaries are written
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputConfig {
    pub csv_path: PathBuf,
    pub store_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
        }
    }
}

impl AppConfig {
    /// Load the config from `path`, or from the default location.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = config_path();
                if default_path.exists() {
                    Self::from_file(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Returns the path to the data directory for dep-conflicts.
/// Uses $XDG_DATA_HOME/dep-conflicts if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/dep-conflicts,
/// or ./dep-conflicts if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the default config file.
pub fn config_path() -> PathBuf {
    data_dir().join("config.json")
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("dep-conflicts.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join(APP_DIR)
}
