use crate::core_tls::TlsConfig;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_address: Ipv4Addr,
    pub listen_port: u16,
    pub external_ip: Ipv4Addr, // Reported to clients in PASV replies
    pub base_dir: PathBuf,
    pub passwd_file: PathBuf,
    pub allow_anonymous: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    pub bind_address: Ipv4Addr,
    pub min_port: u16,
    pub max_port: u16, // Exclusive
    pub passive_retries: u32,
    pub retry_delay_ms: u64,
    pub accept_timeout_secs: u64,
    pub min_buffer_size: usize,
    pub max_buffer_size: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QuotaConfig {
    pub default_total_bytes: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub tls: TlsConfig,
    #[serde(default)]
    pub quota: QuotaConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: Ipv4Addr::UNSPECIFIED,
            listen_port: 21,
            external_ip: Ipv4Addr::LOCALHOST,
            base_dir: PathBuf::from("/var/cloudftp"),
            passwd_file: PathBuf::from("/etc/cloudftpd.passwd"),
            allow_anonymous: true,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            bind_address: Ipv4Addr::UNSPECIFIED,
            min_port: 50000,
            max_port: 50100,
            passive_retries: 3,
            retry_delay_ms: 250,
            accept_timeout_secs: 30,
            min_buffer_size: 4 * 1024,     // 4 KB
            max_buffer_size: 256 * 1024,   // 256 KB
        }
    }
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            default_total_bytes: 100 * 1024 * 1024, // 100 MB
        }
    }
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path))?;
        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path))?;
        Ok(config)
    }

    /// Checks the values that cannot be fixed up at runtime.
    pub fn validate(&self) -> Result<()> {
        let data = &self.data;
        if data.min_port == 0 || data.max_port <= data.min_port {
            bail!(
                "Wrong port range: [{}, {}) must contain at least one port",
                data.min_port,
                data.max_port
            );
        }
        if data.min_buffer_size == 0 || data.min_buffer_size > data.max_buffer_size {
            bail!(
                "Wrong buffer bounds: min {} / max {}",
                data.min_buffer_size,
                data.max_buffer_size
            );
        }
        if !self.server.base_dir.is_dir() {
            bail!("{:?} was not found.", self.server.base_dir);
        }
        self.tls
            .validate()
            .context("Invalid TLS configuration")?;
        Ok(())
    }
}
