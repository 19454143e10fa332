use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::store::{StoreLimits, DEFAULT_TTL, MAX_BLOB_BYTES, MAX_TTL, TTL_CEILING};
use crate::sweeper::DEFAULT_SWEEP_INTERVAL;

pub const APP_NAME: &str = "logbook";
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct Config {
    // http server configuration
    /// address for the share API to listen on
    pub listen_addr: SocketAddr,

    // store configuration
    /// TTL applied when a client does not send `expiresIn`
    pub default_ttl: Duration,
    /// longest TTL a client may request
    pub max_ttl: Duration,
    /// largest accepted `encryptedData`, in bytes
    pub max_blob_bytes: usize,
    /// how often expired records are swept from memory
    pub sweep_interval: Duration,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            default_ttl: DEFAULT_TTL,
            max_ttl: MAX_TTL,
            max_blob_bytes: MAX_BLOB_BYTES,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            log_level: tracing::Level::INFO,
            log_dir: None,
        }
    }
}

impl Config {
    pub fn store_limits(&self) -> StoreLimits {
        StoreLimits {
            default_ttl: self.default_ttl,
            max_ttl: self.max_ttl,
            max_blob_bytes: self.max_blob_bytes,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_ttl.is_zero() {
            return Err(ConfigError::Invalid("default_ttl must be positive".into()));
        }
        if self.default_ttl > self.max_ttl {
            return Err(ConfigError::Invalid(
                "default_ttl must not exceed max_ttl".into(),
            ));
        }
        if self.max_ttl > TTL_CEILING {
            return Err(ConfigError::Invalid(format!(
                "max_ttl must not exceed {} seconds",
                TTL_CEILING.as_secs()
            )));
        }
        if self.max_blob_bytes == 0 {
            return Err(ConfigError::Invalid("max_blob_bytes must be positive".into()));
        }
        if self.sweep_interval.is_zero() {
            return Err(ConfigError::Invalid("sweep_interval must be positive".into()));
        }
        Ok(())
    }
}

/// On-disk configuration (`~/.logbook/config.toml`)
///
/// Every field is optional in the file; missing ones fall back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,
    #[serde(default = "max_ttl_secs")]
    pub max_ttl_secs: u64,
    #[serde(default = "max_blob_bytes")]
    pub max_blob_bytes: usize,
    #[serde(default = "sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    #[serde(default = "log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_listen_addr() -> SocketAddr {
    Config::default().listen_addr
}

fn default_ttl_secs() -> u64 {
    DEFAULT_TTL.as_secs()
}

fn max_ttl_secs() -> u64 {
    MAX_TTL.as_secs()
}

fn max_blob_bytes() -> usize {
    MAX_BLOB_BYTES
}

fn sweep_interval_secs() -> u64 {
    DEFAULT_SWEEP_INTERVAL.as_secs()
}

fn log_level() -> String {
    "info".to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            default_ttl_secs: default_ttl_secs(),
            max_ttl_secs: max_ttl_secs(),
            max_blob_bytes: max_blob_bytes(),
            sweep_interval_secs: sweep_interval_secs(),
            log_level: log_level(),
            log_dir: None,
        }
    }
}

impl ConfigFile {
    /// Default config location: `~/.logbook/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)).join(CONFIG_FILE_NAME))
    }

    /// Load from `path`, or from the default location when `None`
    ///
    /// A missing file yields the defaults; a present but broken file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path)?;
        Ok(toml::from_str(&raw)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

impl TryFrom<ConfigFile> for Config {
    type Error = ConfigError;

    fn try_from(file: ConfigFile) -> Result<Self, Self::Error> {
        let log_level = file
            .log_level
            .parse::<tracing::Level>()
            .map_err(|_| ConfigError::InvalidLogLevel(file.log_level.clone()))?;
        let config = Config {
            listen_addr: file.listen_addr,
            default_ttl: Duration::from_secs(file.default_ttl_secs),
            max_ttl: Duration::from_secs(file.max_ttl_secs),
            max_blob_bytes: file.max_blob_bytes,
            sweep_interval: Duration::from_secs(file.sweep_interval_secs),
            log_level,
            log_dir: file.log_dir,
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no home directory found")]
    NoHomeDirectory,
    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = ConfigFile::load(Some(&dir.path().join("absent.toml"))).unwrap();
        let config = Config::try_from(file).unwrap();
        assert_eq!(config.listen_addr.port(), DEFAULT_PORT);
        assert_eq!(config.default_ttl, DEFAULT_TTL);
        assert_eq!(config.sweep_interval, DEFAULT_SWEEP_INTERVAL);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "listen_addr = \"127.0.0.1:8088\"\nsweep_interval_secs = 60\nlog_level = \"debug\"\n",
        )
        .unwrap();

        let config = Config::try_from(ConfigFile::load(Some(&path)).unwrap()).unwrap();
        assert_eq!(config.listen_addr.to_string(), "127.0.0.1:8088");
        assert_eq!(config.sweep_interval, Duration::from_secs(60));
        assert_eq!(config.log_level, tracing::Level::DEBUG);
        assert_eq!(config.max_blob_bytes, MAX_BLOB_BYTES);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let file = ConfigFile {
            max_blob_bytes: 1024,
            ..ConfigFile::default()
        };
        file.save(&path).unwrap();

        let loaded = ConfigFile::load(Some(&path)).unwrap();
        assert_eq!(loaded.max_blob_bytes, 1024);
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad_level = ConfigFile {
            log_level: "loud".to_string(),
            ..ConfigFile::default()
        };
        assert!(matches!(
            Config::try_from(bad_level),
            Err(ConfigError::InvalidLogLevel(_))
        ));

        let inverted = ConfigFile {
            default_ttl_secs: 100,
            max_ttl_secs: 10,
            ..ConfigFile::default()
        };
        assert!(matches!(
            Config::try_from(inverted),
            Err(ConfigError::Invalid(_))
        ));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "listen_addr = 12").unwrap();
        assert!(matches!(
            ConfigFile::load(Some(&path)),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_ttl_beyond_ceiling() {
        let config = Config {
            default_ttl: Duration::from_secs(1_000_000_000_000_000),
            max_ttl: Duration::from_secs(1_000_000_000_000_000),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = Config {
            max_ttl: TTL_CEILING,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }
}
