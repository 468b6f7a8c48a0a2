//! Configuration management for rota
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (ROTA_*)
//! 3. Config file (~/.config/rota/config.toml)
//! 4. Default values

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Database-related configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Path to the SQLite database file
    pub path: PathBuf,

    /// Maximum number of pooled connections
    pub max_connections: u32,

    /// How long a transaction waits for the write lock
    #[serde(with = "humantime_serde")]
    pub busy_timeout: Duration,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: 5,
            busy_timeout: Duration::from_secs(5),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address the API listens on
    pub listen: SocketAddr,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Upper bound for one assignment, reassignment or merge transaction
    #[serde(with = "humantime_serde")]
    pub operation_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            operation_timeout: Duration::from_secs(10),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Database configuration
    pub database: DatabaseSettings,

    /// HTTP server configuration
    pub server: ServerSettings,

    /// Engine configuration
    pub engine: EngineSettings,
}

/// Overrides passed on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub database_path: Option<PathBuf>,
    pub listen: Option<SocketAddr>,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/rota/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("rota").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - ROTA_DATABASE_PATH: SQLite database file
    /// - ROTA_MAX_CONNECTIONS: pool size
    /// - ROTA_LISTEN: API listen address
    /// - ROTA_OPERATION_TIMEOUT: engine deadline, e.g. `5s`
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(path) = lookup("ROTA_DATABASE_PATH") {
            self.database.path = PathBuf::from(path);
        }

        if let Some(max) = lookup("ROTA_MAX_CONNECTIONS") {
            self.database.max_connections = max
                .parse()
                .map_err(|e| Error::Config(format!("Invalid ROTA_MAX_CONNECTIONS: {}", e)))?;
        }

        if let Some(listen) = lookup("ROTA_LISTEN") {
            self.server.listen = listen
                .parse()
                .map_err(|e| Error::Config(format!("Invalid ROTA_LISTEN: {}", e)))?;
        }

        if let Some(timeout) = lookup("ROTA_OPERATION_TIMEOUT") {
            self.engine.operation_timeout = humantime_serde::re::humantime::parse_duration(
                &timeout,
            )
            .map_err(|e| Error::Config(format!("Invalid ROTA_OPERATION_TIMEOUT: {}", e)))?;
        }

        Ok(self)
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, overrides: CliOverrides) -> Self {
        if let Some(path) = overrides.database_path {
            self.database.path = path;
        }

        if let Some(listen) = overrides.listen {
            self.server.listen = listen;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(overrides: CliOverrides) -> Result<Self> {
        Ok(Self::load()?
            .with_env_overrides()?
            .with_cli_overrides(overrides))
    }
}

/// Get the default database path (~/.cache/rota/rota.db)
pub fn default_database_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rota")
        .join("rota.db")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.server.listen.port(), 8080);
        assert_eq!(config.engine.operation_timeout, Duration::from_secs(10));
        assert!(config.database.path.ends_with("rota/rota.db"));
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::default().with_cli_overrides(CliOverrides {
            database_path: Some(PathBuf::from("/tmp/custom.db")),
            listen: Some("127.0.0.1:9000".parse().unwrap()),
        });

        assert_eq!(config.database.path, PathBuf::from("/tmp/custom.db"));
        assert_eq!(config.server.listen.port(), 9000);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("ROTA_MAX_CONNECTIONS", "2"),
            ("ROTA_OPERATION_TIMEOUT", "750ms"),
        ]
        .into_iter()
        .collect();

        let config = Config::default()
            .with_overrides_from(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.database.max_connections, 2);
        assert_eq!(config.engine.operation_timeout, Duration::from_millis(750));
    }

    #[test]
    fn test_invalid_env_override() {
        let result = Config::default().with_overrides_from(|key| {
            (key == "ROTA_LISTEN").then(|| "not-an-address".to_string())
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[database]
path = "/var/lib/rota/rota.db"
busy_timeout = "2s"

[server]
listen = "127.0.0.1:8081"

[engine]
operation_timeout = "30s"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.database.path, PathBuf::from("/var/lib/rota/rota.db"));
        assert_eq!(config.database.busy_timeout, Duration::from_secs(2));
        assert_eq!(config.server.listen.port(), 8081);
        assert_eq!(config.engine.operation_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_partial_toml() {
        let toml = r#"
[engine]
operation_timeout = "1m"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        // database settings should use defaults
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.engine.operation_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[database]\nmax_connections = 3\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.database.max_connections, 3);
    }
}
