use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3024;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_DB_FILE: &str = "db_card.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

fn validate_storage_path(path: &str) -> Result<PathBuf, ConfigError> {
    if path.contains('\0') {
        return Err(ConfigError::InvalidConfig(
            "Path contains invalid characters".to_string(),
        ));
    }

    let path = shellexpand::tilde(path);
    let path = PathBuf::from(path.as_ref());

    if path.as_os_str().is_empty() {
        return Err(ConfigError::InvalidConfig(
            "Path cannot be empty".to_string(),
        ));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(ConfigError::InvalidConfig(format!(
                "Parent directory does not exist: {}",
                parent.display()
            )));
        }
    }

    Ok(path)
}

fn validate_host(value: &str) -> Result<IpAddr, ConfigError> {
    value.parse().map_err(|_| {
        ConfigError::InvalidConfig(format!("host must be an IP address, got '{}'", value))
    })
}

fn validate_port(value: u16) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidConfig(
            "port must be between 1 and 65535".to_string(),
        ));
    }
    Ok(())
}

/// Process-wide settings, built once at startup.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub storage_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            storage_path: default_storage_path(),
        }
    }
}

impl Config {
    /// Reads a JSON config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_host(&self.host)?;
        validate_port(self.port)?;
        validate_storage_path(&self.storage_path)?;
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        Ok(SocketAddr::new(validate_host(&self.host)?, self.port))
    }

    /// The category database path with `~` expanded.
    pub fn storage_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.storage_path).as_ref())
    }
}

// Next to the executable, falling back to the working directory.
fn default_storage_path() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_DB_FILE)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 3024);
        assert_eq!(config.host, "0.0.0.0");
        assert!(config.storage_path.ends_with("db_card.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"port": 8080}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, DEFAULT_HOST);
    }

    #[test]
    fn test_load_empty_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "  \n").unwrap();

        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_load_invalid_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "port = 1").unwrap();

        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::Serialization(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config {
            host: "localhost:80".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidConfig(_))));

        let config = Config {
            port: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            storage_path: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            storage_path: "/definitely/not/here/db_card.json".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_storage_path_expands_tilde() {
        let config = Config {
            storage_path: "~/cards.json".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.storage_path(),
            PathBuf::from(shellexpand::tilde("~/cards.json").as_ref())
        );
    }

    #[test]
    fn test_socket_addr() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 4000,
            ..Default::default()
        };
        assert_eq!(
            config.socket_addr().unwrap(),
            "127.0.0.1:4000".parse::<SocketAddr>().unwrap()
        );
    }
}
