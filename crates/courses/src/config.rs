//! Configuration management for courses.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "courses";

/// Default document file name.
const DOCUMENT_FILE_NAME: &str = "courses.json";

/// Prefix for environment overrides.
const ENV_PREFIX: &str = "COURSES_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `COURSES_`, sections split on `__`)
/// 2. TOML config file at `~/.config/courses/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// HTTP server configuration.
    pub server: ServerConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the course document.
    /// Defaults to `~/.local/share/courses/courses.json`
    pub document_path: Option<PathBuf>,
    /// Create an empty document on startup if none exists.
    pub initialize: bool,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Origins allowed to make cross-origin requests.
    /// Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            document_path: None, // Will be resolved to default at runtime
            initialize: true,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cors_origins: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "server host must not be empty".to_string(),
            });
        }

        if self.server.port == 0 {
            return Err(Error::ConfigValidation {
                message: "server port must be greater than 0".to_string(),
            });
        }

        for origin in &self.server.cors_origins {
            if origin.trim() == "*" {
                return Err(Error::ConfigValidation {
                    message: "leave cors_origins empty to allow any origin instead of \"*\""
                        .to_string(),
                });
            }
            if axum::http::HeaderValue::from_str(origin).is_err() {
                return Err(Error::ConfigValidation {
                    message: format!("invalid CORS origin: {origin}"),
                });
            }
        }

        Ok(())
    }

    /// Get the document path, resolving defaults if not set.
    #[must_use]
    pub fn document_path(&self) -> PathBuf {
        self.storage
            .document_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DOCUMENT_FILE_NAME))
    }

    /// Get the `host:port` the server binds to.
    #[must_use]
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.initialize);
        assert_eq!(config.server.port, 3000);
        assert!(config.server.cors_origins.is_empty());
    }

    #[test]
    fn test_default_storage_config() {
        let storage = StorageConfig::default();

        assert!(storage.document_path.is_none());
        assert!(storage.initialize);
    }

    #[test]
    fn test_default_server_config() {
        let server = ServerConfig::default();

        assert_eq!(server.host, "127.0.0.1");
        assert_eq!(server.port, 3000);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("port"));
    }

    #[test]
    fn test_validate_empty_host() {
        let mut config = Config::default();
        config.server.host = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("host"));
    }

    #[test]
    fn test_validate_invalid_origin() {
        let mut config = Config::default();
        config.server.cors_origins = vec![
            "http://ok.example".to_string(),
            "bad\norigin".to_string(),
        ];

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("invalid CORS origin"));
    }

    #[test]
    fn test_validate_wildcard_origin() {
        let mut config = Config::default();
        config.server.cors_origins = vec!["*".to_string()];

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("cors_origins empty"));
    }

    #[test]
    fn test_document_path_default() {
        let config = Config::default();
        let path = config.document_path();

        assert!(path.to_string_lossy().contains("courses.json"));
    }

    #[test]
    fn test_document_path_custom() {
        let mut config = Config::default();
        config.storage.document_path = Some(PathBuf::from("/srv/currentDb.json"));

        assert_eq!(config.document_path(), PathBuf::from("/srv/currentDb.json"));
    }

    #[test]
    fn test_socket_addr() {
        let mut config = Config::default();
        assert_eq!(config.socket_addr(), "127.0.0.1:3000");

        config.server.host = "0.0.0.0".to_string();
        config.server.port = 8080;
        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("courses"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults)
        figment::Jail::expect_with(|_jail| {
            let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_from_toml_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "courses.toml",
                r#"
                [storage]
                document_path = "/srv/courses.json"
                initialize = false

                [server]
                port = 8080
                cors_origins = ["http://localhost:5173"]
                "#,
            )?;

            let config = Config::load_from(Some(PathBuf::from("courses.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.document_path(), PathBuf::from("/srv/courses.json"));
            assert!(!config.storage.initialize);
            assert_eq!(config.server.port, 8080);
            assert_eq!(config.server.host, "127.0.0.1");
            assert_eq!(config.server.cors_origins, vec!["http://localhost:5173"]);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("courses.toml", "[server]\nport = 8080\n")?;
            jail.set_env("COURSES_SERVER__PORT", "9090");
            jail.set_env("COURSES_STORAGE__DOCUMENT_PATH", "/tmp/env.json");

            let config = Config::load_from(Some(PathBuf::from("courses.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.server.port, 9090);
            assert_eq!(config.document_path(), PathBuf::from("/tmp/env.json"));
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("courses.toml", "[server]\nport = 0\n")?;

            let result = Config::load_from(Some(PathBuf::from("courses.toml")));
            assert!(matches!(result, Err(Error::ConfigValidation { .. })));
            Ok(())
        });
    }

    #[test]
    fn test_storage_config_deserialize() {
        let json = r#"{"document_path": "/data/db.json"}"#;
        let storage: StorageConfig = serde_json::from_str(json).unwrap();
        assert_eq!(storage.document_path, Some(PathBuf::from("/data/db.json")));
        assert!(storage.initialize);
    }

    #[test]
    fn test_server_config_serialize() {
        let server = ServerConfig::default();
        let json = serde_json::to_string(&server).unwrap();
        assert!(json.contains("cors_origins"));
    }
}
