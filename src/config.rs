use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;

use crate::error::{FtpsError, Result};

/// Config file looked up in the working directory when `FTPS_CONFIG` is unset
const DEFAULT_CONFIG_FILE: &str = "ftps.toml";

/// Configuration for the ftps client
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// FTP control port, used when the host argument carries none
    pub port: u16,

    /// Connect and read/write timeout in seconds
    pub connect_timeout: u64,

    /// Seconds without a command before the session is recycled
    pub idle_timeout: u64,

    /// Local directory for downloads and relative uploads
    pub local_directory: String,
}

impl ClientConfig {
    /// Load configuration: defaults, then the config file, then `FTPS_*` variables
    pub fn load() -> Result<Self> {
        let path = env::var("FTPS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::from_file(&path)
    }

    /// Load configuration from an optional TOML file with environment overrides
    pub fn from_file(config_path: &str) -> Result<Self> {
        let defaults = Self::default();

        let settings = Config::builder()
            .set_default("port", i64::from(defaults.port))?
            .set_default("connect_timeout", defaults.connect_timeout as i64)?
            .set_default("idle_timeout", defaults.idle_timeout as i64)?
            .set_default("local_directory", defaults.local_directory)?
            .add_source(File::new(config_path, FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix("FTPS"))
            .build()?;

        let config: ClientConfig = settings.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout)
    }

    pub fn local_directory(&self) -> &Path {
        Path::new(&self.local_directory)
    }

    /// Split `host[:port]` into host and port, falling back to the configured port
    pub fn resolve_endpoint(&self, host: &str) -> Result<(String, u16)> {
        if host.is_empty() {
            return Err(FtpsError::InvalidHost("Host cannot be empty".to_string()));
        }

        // Bare IPv6 literals contain colons but no port
        if host.matches(':').count() > 1 && !host.starts_with('[') {
            return Ok((host.to_string(), self.port));
        }

        match host.rsplit_once(':') {
            Some((name, port)) => {
                let port = port.parse::<u16>().map_err(|_| {
                    FtpsError::InvalidHost(format!("Invalid port in '{}'", host))
                })?;
                let name = name.trim_start_matches('[').trim_end_matches(']');
                if name.is_empty() {
                    return Err(FtpsError::InvalidHost(format!("Missing host in '{}'", host)));
                }
                Ok((name.to_string(), port))
            }
            None => Ok((host.to_string(), self.port)),
        }
    }

    /// Validate the basic configuration
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(FtpsError::InvalidConfigValue(
                "Port cannot be 0".to_string(),
            ));
        }

        if self.connect_timeout == 0 {
            return Err(FtpsError::InvalidConfigValue(
                "Connect timeout cannot be 0".to_string(),
            ));
        }

        if self.idle_timeout == 0 {
            return Err(FtpsError::InvalidConfigValue(
                "Idle timeout cannot be 0".to_string(),
            ));
        }

        if !self.local_directory().is_dir() {
            return Err(FtpsError::InvalidConfigValue(format!(
                "Local directory '{}' does not exist",
                self.local_directory
            )));
        }

        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            port: 21,
            connect_timeout: 10,
            idle_timeout: 60,
            local_directory: ".".to_string(),
        }
    }
}

impl std::fmt::Display for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ftps config - Port: {}, Connect timeout: {}s, Idle timeout: {}s, Local Dir: {}",
            self.port, self.connect_timeout, self.idle_timeout, self.local_directory
        )
    }
}
