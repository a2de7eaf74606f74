//! Configuration loading and root folder resolution
//!
//! Bootstrap settings come from an optional TOML file. A missing file is not
//! an error: every field has a built-in default. Settings sources, highest
//! priority first:
//!
//! 1. Command-line arguments
//! 2. Environment variables (`ROLLCALL_ROOT_FOLDER`, `ROLLCALL_NETWORK_DB`,
//!    `ROLLCALL_SERVER_URL`)
//! 3. TOML configuration file (`ROLLCALL_CONFIG` or
//!    `<config dir>/rollcall/config.toml`)
//! 4. Compiled defaults

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::api::DEFAULT_PORT;
use crate::store::remote::DEFAULT_TIMEOUT;
use crate::time::millis_to_duration;
use crate::{Error, Result};

pub const CONFIG_ENV: &str = "ROLLCALL_CONFIG";
pub const ROOT_FOLDER_ENV: &str = "ROLLCALL_ROOT_FOLDER";
pub const NETWORK_MODE_ENV: &str = "ROLLCALL_NETWORK_DB";
pub const SERVER_URL_ENV: &str = "ROLLCALL_SERVER_URL";

/// Database file name inside the root folder
pub const DEFAULT_DATABASE_FILE: &str = "rollcall.db";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Folder holding the database (optional)
    pub root_folder: Option<PathBuf>,

    /// Database file name inside the root folder
    pub database_file: Option<String>,

    pub server: ServerConfig,
    pub remote: RemoteConfig,
    pub logging: LoggingConfig,
}

/// rollcall-server listen address
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Shared-backend client settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of rollcall-server, e.g. `http://10.0.0.5:5740`
    pub url: Option<String>,

    /// Bound on a single request
    pub timeout_ms: u64,

    /// Interval of the background refresh
    pub poll_interval_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            poll_interval_ms: 450,
        }
    }
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        millis_to_duration(self.timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        millis_to_duration(self.poll_interval_ms.max(1))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl TomlConfig {
    /// Load from the default location; a missing file yields defaults
    pub fn load() -> Result<Self> {
        match config_file_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            Some(path) => {
                info!("No config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => {
                warn!("Could not determine config directory, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        info!("Loaded config file: {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn database_file(&self) -> &str {
        self.database_file.as_deref().unwrap_or(DEFAULT_DATABASE_FILE)
    }

    /// URL a desk client uses when networked mode is on but no URL is given
    pub fn local_server_url(&self) -> String {
        format!("http://{}:{}", self.server.host, self.server.port)
    }
}

/// `ROLLCALL_CONFIG`, else `<config dir>/rollcall/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|d| d.join("rollcall").join("config.toml"))
}

/// Built-in fallbacks
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        let root_folder = dirs::data_local_dir()
            .map(|d| d.join("rollcall"))
            .unwrap_or_else(|| PathBuf::from("./rollcall_data"));
        Self {
            root_folder,
            log_level: "info".to_string(),
        }
    }
}

/// Resolves the root folder for a module
pub struct RootFolderResolver {
    module_name: String,
}

impl RootFolderResolver {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
        }
    }

    pub fn resolve(&self, cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
        if let Some(path) = cli_arg {
            info!("[{}] Root folder from command line: {}", self.module_name, path.display());
            return path.to_path_buf();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.is_empty() {
                info!("[{}] Root folder from {}: {}", self.module_name, ROOT_FOLDER_ENV, path);
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &config.root_folder {
            info!("[{}] Root folder from config file: {}", self.module_name, path.display());
            return path.clone();
        }

        let path = CompiledDefaults::for_current_platform().root_folder;
        info!("[{}] Root folder (default): {}", self.module_name, path.display());
        path
    }
}

/// Creates the root folder and locates the database inside it
pub struct RootFolderInitializer {
    root_folder: PathBuf,
    database_file: String,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self {
            root_folder,
            database_file: DEFAULT_DATABASE_FILE.to_string(),
        }
    }

    pub fn with_database_file(mut self, name: impl Into<String>) -> Self {
        self.database_file = name.into();
        self
    }

    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            info!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(&self.database_file)
    }
}

/// Which store a desk client talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreMode {
    Local,
    Remote(String),
}

impl StoreMode {
    /// `--server` wins; otherwise `ROLLCALL_NETWORK_DB=1` turns on networked
    /// mode with `ROLLCALL_SERVER_URL`, the TOML remote url, or the configured
    /// server address
    pub fn select(cli_server: Option<&str>, config: &TomlConfig) -> Self {
        if let Some(url) = cli_server {
            return StoreMode::Remote(url.to_string());
        }

        let network = std::env::var(NETWORK_MODE_ENV)
            .map(|v| v.trim() == "1")
            .unwrap_or(false);
        if !network {
            return StoreMode::Local;
        }

        let url = std::env::var(SERVER_URL_ENV)
            .ok()
            .filter(|u| !u.is_empty())
            .or_else(|| config.remote.url.clone())
            .unwrap_or_else(|| config.local_server_url());
        StoreMode::Remote(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.remote.poll_interval_ms, 450);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.database_file(), DEFAULT_DATABASE_FILE);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TomlConfig::from_toml_str(
            r#"
            root_folder = "/srv/rollcall"

            [remote]
            url = "http://10.0.0.5:5740"
            "#,
        )
        .unwrap();
        assert_eq!(config.root_folder, Some(PathBuf::from("/srv/rollcall")));
        assert_eq!(config.remote.url.as_deref(), Some("http://10.0.0.5:5740"));
        assert_eq!(config.remote.timeout_ms, 5000);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let result = TomlConfig::from_toml_str("server = [");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_initializer_database_path() {
        let init = RootFolderInitializer::new(PathBuf::from("/tmp/rc")).with_database_file("x.db");
        assert_eq!(init.database_path(), PathBuf::from("/tmp/rc/x.db"));
    }
}
